//! Shared helpers for streambed integration tests.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

/// Maximum time to wait for asynchronously forwarded events.
const TIMEOUT: Duration = Duration::from_secs(5);

/// Assert that a condition becomes true within the timeout.
///
/// Polls with exponential backoff, starting at 10ms and capped at 200ms.
pub async fn assert_eventually<F, Fut>(mut condition: F, what: &str)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let mut delay = Duration::from_millis(10);
    let start = std::time::Instant::now();

    loop {
        if condition().await {
            return;
        }

        if start.elapsed() >= TIMEOUT {
            panic!("Condition not met within {TIMEOUT:?}: {what}");
        }

        sleep(delay).await;
        delay = (delay * 2).min(Duration::from_millis(200));
    }
}
