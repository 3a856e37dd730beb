use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::{Error, Result};

/// Runs `work` until it finishes, the token fires or `limit` elapses.
/// Nothing in the engine writes, so dropping the future is always safe.
pub async fn guarded<T, F>(token: &CancellationToken, limit: Duration, work: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = token.cancelled() => {
            tracing::warn!("Query cancelled");
            Err(Error::Cancelled)
        }
        outcome = tokio::time::timeout(limit, work) => match outcome {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(limit_secs = limit.as_secs(), "Query timed out");
                Err(Error::Timeout(limit))
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let outcome: Result<u32> = tokio_test::block_on(guarded(&token, Duration::from_secs(1), async {
            Ok(7)
        }));
        assert!(matches!(outcome, Err(Error::Cancelled)));
    }

    #[tokio::test]
    async fn slow_work_times_out() {
        let token = CancellationToken::new();
        let outcome: Result<()> = guarded(&token, Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(())
        })
        .await;
        assert!(matches!(outcome, Err(Error::Timeout(_))));
    }

    #[tokio::test]
    async fn finished_work_passes_through() {
        let token = CancellationToken::new();
        let outcome = guarded(&token, Duration::from_secs(1), async { Ok("done") }).await;
        assert_eq!(outcome.ok(), Some("done"));
    }
}
