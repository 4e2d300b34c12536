use std::time::Duration;

use tracing::{error, warn};

use crate::error::Result;

const DEFAULT_MAX_RETRIES: u32 = 3;
const INITIAL_BACKOFF_MS: u64 = 500;
const MAX_BACKOFF_MS: u64 = 5_000;

/// Run a platform call, retrying transient failures with exponential
/// backoff. Non-retryable errors (malformed output, bad configuration)
/// escalate immediately.
pub async fn with_retry<T, F, Fut>(operation: F, operation_name: &str) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut retries = 0;
    let mut backoff_ms = INITIAL_BACKOFF_MS;

    loop {
        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() => {
                if retries >= DEFAULT_MAX_RETRIES {
                    error!(
                        "{} failed after {} retries: {}",
                        operation_name, retries, e
                    );
                    return Err(e);
                }

                warn!(
                    "{} failed, retrying in {}ms (attempt {}/{}): {}",
                    operation_name,
                    backoff_ms,
                    retries + 1,
                    DEFAULT_MAX_RETRIES,
                    e
                );

                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                retries += 1;
                backoff_ms = (backoff_ms * 2).min(MAX_BACKOFF_MS);
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GitHubError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test(start_paused = true)]
    async fn test_retries_transient_failures_until_success() {
        let attempts = AtomicU32::new(0);

        let result = with_retry(
            || async {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n < 2 {
                    Err(GitHubError::Command("transient".to_string()))
                } else {
                    Ok(n)
                }
            },
            "test operation",
        )
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);

        let result: Result<()> = with_retry(
            || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(GitHubError::Command("still failing".to_string()))
            },
            "test operation",
        )
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), DEFAULT_MAX_RETRIES + 1);
    }

    #[tokio::test]
    async fn test_parse_errors_escalate_immediately() {
        let attempts = AtomicU32::new(0);

        let result: Result<()> = with_retry(
            || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err(GitHubError::Parse("bad json".to_string()))
            },
            "test operation",
        )
        .await;

        assert!(matches!(result, Err(GitHubError::Parse(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
