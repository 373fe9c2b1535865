//! # Decision Benchmarks
//!
//! Per-call cost of the root check as the argument list grows.
//!
//! Run with: `cargo bench -p rootok-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rootok_core::{CallContext, FixedIdentity, NoPolicy, NullSink, RootOkService, parse_options};
use std::hint::black_box;

/// Module arguments: one `debug` followed by `size - 1` unknown options.
fn make_arguments(size: usize) -> Vec<String> {
    let mut args = vec!["debug".to_string()];
    args.extend((1..size).map(|i| format!("unknown_{}", i)));
    args
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_parse_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_options");

    for size in [1, 16, 256].iter() {
        let args = make_arguments(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| black_box(parse_options(&args, &NullSink)));
        });
    }

    group.finish();
}

fn bench_authenticate(c: &mut Criterion) {
    let mut group = c.benchmark_group("authenticate");
    let service = RootOkService::new(NoPolicy);
    let identity = FixedIdentity::root();

    for size in [1, 16, 256].iter() {
        let args = make_arguments(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let ctx = CallContext::new(&identity, &NullSink);
                black_box(service.authenticate(&ctx, args.as_slice()))
            });
        });
    }

    group.finish();
}

/// `setcred` must stay flat regardless of argument count.
fn bench_set_credentials(c: &mut Criterion) {
    let mut group = c.benchmark_group("set_credentials");
    let service = RootOkService::new(NoPolicy);
    let identity = FixedIdentity::user(1000);

    for size in [1, 256, 65536].iter() {
        let args = make_arguments(*size);

        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                let ctx = CallContext::new(&identity, &NullSink);
                black_box(service.set_credentials(&ctx, args.as_slice()))
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_parse_options,
    bench_authenticate,
    bench_set_credentials,
);

criterion_main!(benches);
