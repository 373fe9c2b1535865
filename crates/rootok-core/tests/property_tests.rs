//! # Property-Based Tests
//!
//! Parser and override invariants checked with proptest.

use proptest::collection::vec;
use proptest::prelude::*;
use rootok_core::{
    CallContext, ControlFlags, Decision, FixedIdentity, MemorySink, NoPolicy, NullSink, Phase,
    PolicyError, RootCheck, RootOkService, Severity, StaticPolicy, parse_options,
};

/// Either the recognized keyword or an arbitrary string.
fn token() -> impl Strategy<Value = String> {
    prop_oneof![
        1 => Just("debug".to_string()),
        3 => ".{0,12}",
    ]
}

/// Every policy shape the gate distinguishes.
fn policy() -> impl Strategy<Value = StaticPolicy> {
    prop_oneof![
        Just(StaticPolicy::inactive()),
        Just(StaticPolicy::allowing()),
        any::<bool>().prop_map(StaticPolicy::denying),
        Just(StaticPolicy::failing(PolicyError::Unavailable("down".into()))),
        Just(StaticPolicy::failing(PolicyError::Label("none".into()))),
        Just(StaticPolicy::failing(PolicyError::Query("broken".into()))),
    ]
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// The debug bit is set iff some token is exactly "debug".
    #[test]
    fn debug_bit_iff_keyword_present(tokens in vec(token(), 0..20)) {
        let flags = parse_options(&tokens, &NullSink);
        let expected = tokens.iter().any(|t| t == "debug");

        prop_assert_eq!(flags.debug(), expected);
    }

    /// Token order never changes the parsed flags.
    #[test]
    fn parsing_ignores_order(tokens in vec(token(), 0..20)) {
        let mut reversed = tokens.clone();
        reversed.reverse();
        let mut sorted = tokens.clone();
        sorted.sort();

        let flags = parse_options(&tokens, &NullSink);
        prop_assert_eq!(flags, parse_options(&reversed, &NullSink));
        prop_assert_eq!(flags, parse_options(&sorted, &NullSink));
    }

    /// One error entry per unrecognized token, nothing else.
    #[test]
    fn one_error_per_unknown_token(tokens in vec(token(), 0..20)) {
        let sink = MemorySink::new();
        let _ = parse_options(&tokens, &sink);
        let unknown = tokens.iter().filter(|t| *t != "debug").count();

        prop_assert_eq!(sink.count(Severity::Error), unknown);
        prop_assert_eq!(sink.entries().len(), unknown);
    }

    /// Whatever the caller, flags and policy, the host sees success.
    #[test]
    fn returned_decision_is_always_success(
        uid in prop_oneof![Just(0u32), any::<u32>()],
        debug in any::<bool>(),
        policy in policy(),
    ) {
        let engine = RootCheck::new(policy);
        let identity = FixedIdentity::user(uid);
        let sink = MemorySink::new();
        let ctx = CallContext::new(&identity, &sink);

        let mut flags = ControlFlags::empty();
        if debug {
            flags.insert(ControlFlags::DEBUG);
        }

        let assessment = engine.assess(&ctx, flags);
        prop_assert_eq!(assessment.returned, Decision::Success);
        prop_assert_eq!(engine.decide(&ctx, flags), Decision::Success);

        // Non-root callers always fail the tentative check.
        if uid != 0 {
            prop_assert_eq!(assessment.tentative, Decision::AuthError);
        }

        // Debug produces one line per decision, otherwise nothing.
        let expected_lines = if debug { 2 } else { 0 };
        prop_assert_eq!(sink.count(Severity::Debug), expected_lines);
    }

    /// setcred succeeds silently for any arguments.
    #[test]
    fn setcred_is_silent(tokens in vec(token(), 0..50), uid in any::<u32>()) {
        let service = RootOkService::new(NoPolicy);
        let identity = FixedIdentity::user(uid);
        let sink = MemorySink::new();
        let ctx = CallContext::new(&identity, &sink);

        prop_assert_eq!(service.dispatch(Phase::SetCredentials, &ctx, tokens.as_slice()), Decision::Success);
        prop_assert!(sink.is_empty());
    }
}
