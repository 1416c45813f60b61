use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Bounded retry with linearly increasing backoff.
///
/// Wraps an abstract effect: the policy knows nothing about the provider, so
/// it can be exercised with a fake that fails a chosen number of times.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first call
    pub max_attempts: u32,

    /// Delay before attempt n+1 is `base_delay * n`
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }

    /// Run `op` until it succeeds or attempts are exhausted; the final
    /// error is returned as-is.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 1;
        loop {
            match op(attempt).await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= self.max_attempts => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        "attempt {}/{} failed, retrying: {}",
                        attempt,
                        self.max_attempts,
                        err
                    );
                    tokio::time::sleep(self.delay_after(attempt)).await;
                    attempt += 1;
                }
            }
        }
    }
}
