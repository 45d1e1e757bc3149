//! Standalone TUIO Integration Test Runner

use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use tuio_test_suite::tests;
use tuio_test_suite::TestSuite;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    println!("Running TUIO Integration Tests...\n");

    let mut suite = TestSuite::new();
    tests::tuio::run_tests(&mut suite).await;
    suite.print_summary();

    std::process::exit(if suite.all_passed() { 0 } else { 1 });
}
