//! Long-running video job polling.

use std::future::Future;
use std::time::Duration;
use studybro_core::{Result, StudyError};

/// Polls a job until `fetch` reports it finished.
///
/// Waits `interval` before every fetch. `fetch` returns `Ok(None)` while the
/// job is still running. After `max_attempts` unfinished fetches the job is
/// abandoned with [`StudyError::GenerationTimedOut`]; a fetch error ends
/// polling immediately.
pub async fn poll_until_done<T, F, Fut>(
    interval: Duration,
    max_attempts: u32,
    mut fetch: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    for attempt in 1..=max_attempts {
        tokio::time::sleep(interval).await;

        if let Some(finished) = fetch().await? {
            tracing::debug!(attempt, "[VideoJob] Job finished");
            return Ok(finished);
        }

        tracing::debug!(attempt, max_attempts, "[VideoJob] Job still running");
    }

    tracing::warn!(max_attempts, "[VideoJob] Giving up on unfinished job");
    Err(StudyError::GenerationTimedOut {
        attempts: max_attempts,
    })
}
