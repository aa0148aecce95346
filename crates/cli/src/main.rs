//! Shop Probe CLI - smoke-test a shop API from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Probe the default target (http://localhost:5000)
//! shop-probe
//!
//! # Probe another deployment
//! shop-probe http://staging.shop:8080
//! ```
//!
//! # Output
//!
//! One line per step on stdout, `✅` or `❌` followed by the step label and
//! any detail. Diagnostics go to stderr through `tracing`; set `RUST_LOG`
//! to see them (e.g. `RUST_LOG=shop_probe=debug`).
//!
//! # Exit codes
//!
//! - `0` - every step ran, whatever its outcome
//! - `1` - a step errored (network, timeout, malformed body) and the run stopped
//! - `2` - the base URL is invalid

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::Parser;
use shop_probe::{ProbeConfig, ProbeRunner, config::DEFAULT_BASE_URL};
use shop_probe_core::ProbeReport;

#[derive(Parser)]
#[command(name = "shop-probe")]
#[command(author, version, about = "Smoke-test a shop API's auth and cart endpoints")]
struct Cli {
    /// Base URL of the API under test
    #[arg(default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the report
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shop_probe=warn,shop_probe_cli=warn".into());

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match ProbeConfig::new(&cli.base_url) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            return ExitCode::from(2);
        }
    };

    let runner = match ProbeRunner::new(&config) {
        Ok(runner) => runner,
        Err(e) => {
            tracing::error!("Probe setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    print_header(&config);
    let report = runner.run().await;
    print_report(&report);

    if report.aborted {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[allow(clippy::print_stdout)]
fn print_header(config: &ProbeConfig) {
    println!("Probing API at {}", config.base_url());
}

#[allow(clippy::print_stdout)]
fn print_report(report: &ProbeReport) {
    for step in &report.steps {
        println!("{step}");
    }
    println!("Probe complete");
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_base_url() {
        let cli = Cli::parse_from(["shop-probe"]);
        assert_eq!(cli.base_url, "http://localhost:5000");
    }

    #[test]
    fn test_positional_base_url() {
        let cli = Cli::parse_from(["shop-probe", "http://staging.shop:8080/"]);
        assert_eq!(cli.base_url, "http://staging.shop:8080/");
    }

    #[test]
    fn test_rejects_flags() {
        assert!(Cli::try_parse_from(["shop-probe", "--strict"]).is_err());
    }
}
