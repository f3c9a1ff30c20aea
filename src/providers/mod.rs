/*!
 * Backends for the batch translation API.
 *
 * This module contains the implementations a run can send batches to:
 * - `http`: the configured HTTP endpoint
 * - `dry_run`: deterministic offline stub for pipeline verification
 * - `retry`: the client that wraps a backend with bounded exponential backoff
 */

use async_trait::async_trait;
use serde_json::Value;
use std::fmt::Debug;

use crate::errors::ClientError;
use crate::translation::BatchPayload;

/// Common trait for all translation backends
///
/// One call sends one batch and returns the parsed response document;
/// shape validation happens later, in the validator.
#[async_trait]
pub trait TranslationBackend: Send + Sync + Debug {
    /// Send a batch and return the parsed JSON response
    async fn send_batch(&self, payload: &BatchPayload) -> Result<Value, ClientError>;

    /// Short name used in log messages
    fn name(&self) -> &str;
}

pub mod dry_run;
pub mod http;
pub mod retry;

pub use self::dry_run::DryRunBackend;
pub use self::http::HttpBackend;
pub use self::retry::{RetryPolicy, TranslationClient};
