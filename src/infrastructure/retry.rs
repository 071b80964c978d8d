// Bounded retry with exponential backoff for outbound calls
use std::future::Future;
use std::time::Duration;

/// Failure classification for a single attempt.
#[derive(Debug)]
pub enum RetryError {
    /// Connection failures, timeouts, 5xx and 429 responses
    Retryable(anyhow::Error),
    /// Everything else; returned immediately
    Permanent(anyhow::Error),
}

impl RetryError {
    pub fn into_inner(self) -> anyhow::Error {
        match self {
            RetryError::Retryable(e) | RetryError::Permanent(e) => e,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Delay before retry number `attempt` (0-based): base * 2^attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, mut func: F) -> anyhow::Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RetryError>>,
{
    let mut attempt = 0;
    loop {
        match func().await {
            Ok(result) => return Ok(result),
            Err(RetryError::Retryable(err)) if attempt < policy.max_retries => {
                let delay = policy.backoff(attempt);
                tracing::warn!(
                    "Retry attempt {}/{} after {:?}: {:#}",
                    attempt + 1,
                    policy.max_retries,
                    delay,
                    err
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err.into_inner()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy::new(max_retries, Duration::from_millis(1))
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = RetryPolicy::new(4, Duration::from_millis(500));
        assert_eq!(policy.backoff(0), Duration::from_millis(500));
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(3), Duration::from_millis(4000));
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let attempts = AtomicU32::new(0);
        let result = with_retry(&policy(3), || async {
            if attempts.fetch_add(1, Ordering::SeqCst) < 2 {
                Err(RetryError::Retryable(anyhow::anyhow!("503")))
            } else {
                Ok("ok")
            }
        })
        .await;

        assert_eq!(result.unwrap(), "ok");
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let attempts = AtomicU32::new(0);
        let result: anyhow::Result<()> = with_retry(&policy(2), || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(RetryError::Retryable(anyhow::anyhow!("timeout")))
        })
        .await;

        assert!(result.is_err());
        assert_eq!(attempts.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_is_not_retried() {
        let attempts = AtomicU32::new(0);
        let result: anyhow::Result<()> = with_retry(&policy(5), || async {
            attempts.fetch_add(1, Ordering::SeqCst);
            Err(RetryError::Permanent(anyhow::anyhow!("404")))
        })
        .await;

        assert_eq!(result.unwrap_err().to_string(), "404");
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }
}
