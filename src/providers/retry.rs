use log::{error, info, warn};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::{Config, RetryConfig};
use crate::errors::{ClientError, LocalizationError};
use crate::translation::BatchPayload;

use super::{DryRunBackend, HttpBackend, TranslationBackend};

/// Upper bound of a single backoff delay
pub const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry, doubled for every further one
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self { max_retries, base_delay }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(config.max_retries, Duration::from_millis(config.base_delay_ms))
    }

    /// Total number of attempts
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after the failed attempt number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let base_ms = u64::try_from(self.base_delay.as_millis()).unwrap_or(u64::MAX);
        let delay_ms = base_ms.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(delay_ms).min(MAX_BACKOFF)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Sends batches through a backend, retrying failed calls
#[derive(Debug, Clone)]
pub struct TranslationClient {
    backend: Arc<dyn TranslationBackend>,
    policy: RetryPolicy,
}

impl TranslationClient {
    pub fn new(backend: Arc<dyn TranslationBackend>, policy: RetryPolicy) -> Self {
        Self { backend, policy }
    }

    /// Dry-run or HTTP client, depending on the configuration
    pub fn from_config(config: &Config) -> Result<Self, LocalizationError> {
        let backend: Arc<dyn TranslationBackend> = if config.dry_run {
            info!("Dry run: responses are simulated, no request leaves this machine");
            Arc::new(DryRunBackend::new())
        } else {
            Arc::new(HttpBackend::from_config(config)?)
        };
        Ok(Self::new(backend, RetryPolicy::from_config(&config.retry)))
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Send one batch, retrying with exponential backoff
    ///
    /// The backoff sleeps inline: the run does nothing else while waiting.
    /// After the last attempt the last error is returned.
    pub async fn send(&self, payload: &BatchPayload) -> Result<Value, ClientError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            match self.backend.send_batch(payload).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt + 1 < max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        "{} request failed: {} - attempt {}/{}, retrying in {:?}",
                        self.backend.name(),
                        e,
                        attempt + 1,
                        max_attempts,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!(
                        "{} request failed after {} attempt(s): {}",
                        self.backend.name(),
                        max_attempts,
                        e
                    );
                    return Err(e);
                }
            }
        }
    }
}
