//! Bounded retry for fallible device operations

use std::future::Future;
use std::time::Duration;

use tracing::{error, info, warn};

/// Invoke `op` until it reports success, up to `max_retries + 1` times,
/// sleeping `retry_interval` between attempts but never after the last.
/// Fallible operations surface their faults as a `false` result; the
/// wrapper treats that like any other failed attempt.
pub async fn retry<F, Fut>(mut op: F, max_retries: u32, retry_interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    for attempt in 0..=max_retries {
        if op().await {
            if attempt > 0 {
                info!("Operation succeeded on attempt {}", attempt + 1);
            }
            return true;
        }
        if attempt < max_retries {
            warn!(
                "Attempt {} failed, retrying in {:.1}s...",
                attempt + 1,
                retry_interval.as_secs_f64()
            );
            tokio::time::sleep(retry_interval).await;
        }
    }

    error!("Operation still failing after {} attempts", max_retries + 1);
    false
}
