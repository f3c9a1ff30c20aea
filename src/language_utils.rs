use isolang::Language;
use once_cell::sync::Lazy;
use regex::Regex;

/// Language utilities for target column headers
///
/// Target columns are recognized by their header: a two or three letter
/// lowercase base code with an optional uppercase region (`ru`, `fil`,
/// `es_MX`, `pt-BR`).
static LANGUAGE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]{2,3}(?:[_-][A-Z]{2})?$").expect("valid language code regex"));

/// Check whether a header cell looks like a language code
pub fn is_language_code(raw: &str) -> bool {
    LANGUAGE_CODE_RE.is_match(raw.trim())
}

/// Normalize a language code to lowercase base and uppercase region joined by `_`
pub fn normalize_language_code(raw: &str) -> String {
    let mut parts = raw.trim().split(['_', '-']);
    let base = parts.next().unwrap_or_default().to_lowercase();
    match parts.next() {
        Some(region) if !region.is_empty() => format!("{}_{}", base, region.to_uppercase()),
        _ => base,
    }
}

/// Whether the base of a normalized code is a known ISO 639-1 or ISO 639-3 language
pub fn is_known_language(code: &str) -> bool {
    language_name(code).is_some()
}

/// English name of the base language, when known
pub fn language_name(code: &str) -> Option<&'static str> {
    let base = code.split('_').next().unwrap_or_default();
    let language = match base.len() {
        2 => Language::from_639_1(base),
        3 => Language::from_639_3(base),
        _ => None,
    }?;
    Some(language.to_name())
}
