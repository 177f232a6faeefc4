//! Bounded timeout and retry for external calls

use std::future::Future;
use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};

/// Per-attempt timeout and backoff settings
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Upper bound for a single attempt
    pub timeout: Duration,
    /// Extra attempts after the first failure
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each further retry
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(timeout: Duration, max_retries: u32, base_delay: Duration) -> Self {
        Self {
            timeout,
            max_retries,
            base_delay,
        }
    }

    /// Policy for completion calls
    pub fn for_completion(config: &LlmConfig) -> Self {
        Self::new(
            Duration::from_secs(config.timeout_secs),
            config.max_retries,
            Duration::from_millis(config.retry_base_delay_ms),
        )
    }

    /// Policy for embedding calls
    pub fn for_embeddings(embeddings: &EmbeddingConfig, llm: &LlmConfig) -> Self {
        Self::new(
            Duration::from_secs(embeddings.timeout_secs),
            llm.max_retries,
            Duration::from_millis(llm.retry_base_delay_ms),
        )
    }

    fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Run `operation` under the policy's timeout, retrying transient failures
/// with exponential backoff
pub async fn with_retry<F, Fut, T>(policy: &RetryPolicy, name: &str, operation: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0u32;

    loop {
        let result = match timeout(policy.timeout, operation()).await {
            Ok(result) => result,
            Err(_) => Err(Error::timeout(name, policy.timeout.as_secs())),
        };

        match result {
            Ok(value) => return Ok(value),
            Err(e) if e.is_transient() && attempt < policy.max_retries => {
                let delay = policy.delay_for(attempt);
                tracing::warn!(
                    "{} failed (attempt {}/{}): {}; retrying in {:?}",
                    name,
                    attempt + 1,
                    policy.max_retries + 1,
                    e,
                    delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
