//! TUIO Test Suite Runner
//!
//! This binary runs all integration tests against a live client on loopback.
//! Tests verify:
//!
//! 1. Frames from a simulated tracker are reconciled atomically
//! 2. Stale frames, restarts and named sources behave as trackers expect
//! 3. Touch batches and catch-all forwarding reach subscribers
//! 4. The client keeps up with sustained tracker frame rates

use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use tuio_test_suite::{tests, TestSuite};

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("tracing subscriber already installed");
    }

    println!("\n  TUIO Integration Test Suite v{}\n", env!("CARGO_PKG_VERSION"));

    let mut suite = TestSuite::new();

    info!("Starting TUIO integration tests...");
    tests::tuio::run_tests(&mut suite).await;

    info!("Starting load tests...");
    tests::load::run_tests(&mut suite).await;

    suite.print_summary();

    if suite.all_passed() {
        info!("All tests passed");
        ExitCode::SUCCESS
    } else {
        error!("{} tests failed", suite.failed());
        ExitCode::FAILURE
    }
}
