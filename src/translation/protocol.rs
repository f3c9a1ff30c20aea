/*!
 * Wire format of the batch translation API.
 *
 * Request:  `{ "batch": [ { label, description, meta, en, languages } ] }`
 * Response: `{ "data": [ { label, localization: { code: text | { text } } } ] }`
 *
 * Response bodies are parsed leniently: a JSON document wrapped in a fenced
 * code block or carrying trailing commas is still accepted.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ClientError;
use crate::planner::TranslationRequest;

use super::prompts;

/// Maximum characters of a body quoted in parse errors
const SNIPPET_CHARS: usize = 400;

static FENCED_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)```(?:json)?\s*(.*?)```").expect("valid fence regex"));

static TRAILING_COMMA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*([}\]])").expect("valid trailing comma regex"));

/// One row of a batch request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItem {
    pub label: String,
    pub description: String,
    /// Parsed meta cell, `{}` when the cell is empty
    pub meta: Value,
    /// Source text
    pub en: String,
    pub languages: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl BatchItem {
    pub fn from_request(request: &TranslationRequest, include_prompt: bool) -> Self {
        Self {
            label: request.label.clone(),
            description: request.description.clone(),
            meta: request.meta.clone().unwrap_or_else(|| Value::Object(Default::default())),
            en: request.source_text.clone(),
            languages: request.languages.clone(),
            prompt: include_prompt.then(|| prompts::build_prompt(request)),
        }
    }
}

/// Body of one API call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchPayload {
    pub batch: Vec<BatchItem>,
}

impl BatchPayload {
    pub fn from_requests(requests: &[TranslationRequest], include_prompt: bool) -> Self {
        Self {
            batch: requests
                .iter()
                .map(|request| BatchItem::from_request(request, include_prompt))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_CHARS).collect()
}

/// Parse a response body, recovering from fences and trailing commas
pub fn parse_response_body(body: &str) -> Result<Value, ClientError> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return Err(ClientError::ParseError("empty response body".to_string()));
    }

    let first_error = match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let core = FENCED_BLOCK_RE
        .captures(trimmed)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim())
        .unwrap_or(trimmed);

    if let Ok(value) = serde_json::from_str::<Value>(core) {
        return Ok(value);
    }

    let cleaned = TRAILING_COMMA_RE.replace_all(core, "$1");
    serde_json::from_str::<Value>(&cleaned)
        .map_err(|_| ClientError::ParseError(format!("{} (body starts with: {})", first_error, snippet(core))))
}
