use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::errors::ClientError;
use crate::translation::BatchPayload;

use super::TranslationBackend;

/// Backend that never touches the network
///
/// Every requested language is answered with `[SIM:<code>] <source text>`,
/// so a run can be exercised end to end without an endpoint.
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunBackend;

impl DryRunBackend {
    pub fn new() -> Self {
        Self
    }

    /// Text fabricated for one language
    pub fn simulated_text(code: &str, source_text: &str) -> String {
        format!("[SIM:{}] {}", code, source_text)
    }

    /// Response document for a payload
    pub fn simulate(payload: &BatchPayload) -> Value {
        let data: Vec<Value> = payload
            .batch
            .iter()
            .map(|item| {
                let localization: Map<String, Value> = item
                    .languages
                    .iter()
                    .map(|code| (code.clone(), Value::String(Self::simulated_text(code, &item.en))))
                    .collect();
                json!({ "label": item.label, "localization": localization })
            })
            .collect();
        json!({ "data": data })
    }
}

#[async_trait]
impl TranslationBackend for DryRunBackend {
    async fn send_batch(&self, payload: &BatchPayload) -> Result<Value, ClientError> {
        Ok(Self::simulate(payload))
    }

    fn name(&self) -> &str {
        "dry-run"
    }
}
