/*!
 * Response validation and normalization.
 *
 * A response is checked against the `RequestIndex` before anything is
 * written: it must be a `{ "data": [...] }` document, labels must be unique,
 * and every label it answers must come with every language that row asked
 * for. Values may be plain strings or `{ "text": ... }` objects; both are
 * reduced to trimmed text here and nothing else leaves this module.
 */

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::errors::{LocalizationError, LocalizationResult};
use crate::planner::{RequestIndex, TranslationRequest};
use crate::sheet::{self, SheetStore};

/// Translations for one label, complete for every requested language
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedResult {
    pub label: String,
    /// Requested language code to trimmed, non-empty text
    pub localization: BTreeMap<String, String>,
    pub ui_position: usize,
}

/// Accepted shapes of a localization entry
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LocalizedValue {
    Text(String),
    Object { text: String },
}

impl LocalizedValue {
    fn into_text(self) -> String {
        match self {
            Self::Text(text) | Self::Object { text } => text.trim().to_string(),
        }
    }
}

/// Normalized text of an entry, `None` when missing, malformed or blank
fn normalize_entry(value: Option<&Value>) -> Option<String> {
    let value = value?;
    let text = LocalizedValue::deserialize(value).ok()?.into_text();
    (!text.is_empty()).then_some(text)
}

/// Label of a response item, `None` for items to drop
fn item_label(item: &Value) -> Option<String> {
    let label = match item.as_object()?.get("label")? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!label.is_empty()).then_some(label)
}

/// Checks responses against what the run asked for
#[derive(Debug, Clone, Copy)]
pub struct ResponseValidator<'a> {
    index: &'a RequestIndex,
    /// Column receiving diagnostic notes
    label_column: usize,
}

impl<'a> ResponseValidator<'a> {
    pub fn new(index: &'a RequestIndex, label_column: usize) -> Self {
        Self { index, label_column }
    }

    /// Validate one response and normalize the labels it answers
    ///
    /// `slice` is the batch that produced the response; its labels may be
    /// answered by a later response, so their absence is not an error.
    pub fn validate<S: SheetStore + ?Sized>(
        &self,
        response: &Value,
        slice: &[TranslationRequest],
        sheet: &mut S,
    ) -> LocalizationResult<Vec<NormalizedResult>> {
        let items = response
            .as_object()
            .and_then(|object| object.get("data"))
            .and_then(Value::as_array)
            .ok_or_else(|| {
                LocalizationError::MalformedResponse("response has no \"data\" array".to_string())
            })?;

        let mut by_label: HashMap<String, &Map<String, Value>> = HashMap::new();
        for item in items {
            let Some(label) = item_label(item) else {
                debug!("Dropping response item without label: {}", item);
                continue;
            };
            if by_label.contains_key(&label) {
                return Err(LocalizationError::DuplicateLabelInResponse(label));
            }
            if let Some(object) = item.as_object() {
                by_label.insert(label, object);
            }
        }

        for label in by_label.keys().filter(|label| !self.index.contains(label)) {
            warn!("Ignoring response item for unrequested label \"{}\"", label);
        }
        for request in slice.iter().filter(|r| !by_label.contains_key(&r.label)) {
            debug!("Label \"{}\" is not answered by this response", request.label);
        }

        let mut results = Vec::new();
        for (label, entry) in self.index.iter() {
            let Some(item) = by_label.get(label) else {
                continue;
            };

            let localization = item
                .get("localization")
                .and_then(Value::as_object)
                .ok_or_else(|| LocalizationError::MissingLocalizationObject(label.to_string()))?;

            let mut normalized = BTreeMap::new();
            let mut missing = Vec::new();
            for code in &entry.requested_languages {
                match normalize_entry(localization.get(code)) {
                    Some(text) => {
                        normalized.insert(code.clone(), text);
                    }
                    None => missing.push(code.clone()),
                }
            }

            if !missing.is_empty() {
                sheet::annotate(
                    sheet,
                    entry.row(),
                    self.label_column,
                    &format!("Missing languages: {}", missing.join(", ")),
                );
                return Err(LocalizationError::IncompleteTranslation {
                    label: label.to_string(),
                    missing,
                });
            }

            results.push(NormalizedResult {
                label: label.to_string(),
                localization: normalized,
                ui_position: entry.ui_position,
            });
        }

        Ok(results)
    }
}
