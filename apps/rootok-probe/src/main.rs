//! # rootok-probe
//!
//! Runs the pam_rootok root check for the current process and reports the
//! tentative and returned results.
//!
//! Logging goes to stderr; the report goes to stdout.
//! - `ROOTOK_LOG`: tracing filter (default: `rootok_probe=info,rootok_core=debug`)
//! - `ROOTOK_LOG_FORMAT=json`: machine-parseable log lines

mod cli;

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `ROOTOK_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "rootok_probe=info,rootok_core=debug";

fn main() {
    let log_format = std::env::var("ROOTOK_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = EnvFilter::try_from_env("ROOTOK_LOG")
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    match cli::execute(&cli) {
        Ok(report) => println!("{}", report),
        Err(e) => {
            tracing::error!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
