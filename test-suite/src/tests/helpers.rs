//! Common test helpers and utilities

use crate::{Category, TestResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tuio_client::{TuioClient, TuioClientBuilder};
use tuio_core::FixedViewport;

/// Run a check with a timeout and record its outcome under `category`
pub async fn run_test<F, Fut>(
    category: Category,
    name: &str,
    timeout_duration: Duration,
    test_fn: F,
) -> TestResult
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<(), String>>,
{
    let start = Instant::now();

    let failure = match timeout(timeout_duration, test_fn()).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(_) => Some(format!("timed out after {:?}", timeout_duration)),
    };

    TestResult {
        category,
        name: name.to_string(),
        duration: start.elapsed(),
        failure,
    }
}

/// Client on an ephemeral loopback port with a 1000x1000 viewport
pub async fn loopback_client() -> Result<TuioClient, String> {
    TuioClientBuilder::new()
        .bind_addr("127.0.0.1")
        .port(0)
        .viewport(Arc::new(FixedViewport::new(1000.0, 1000.0)))
        .connect()
        .await
        .map_err(|e| format!("Failed to connect client: {}", e))
}
