/*!
 * Prompt construction for batch items.
 *
 * When enabled, every batch item carries a ready-made instruction so that a
 * thin LLM relay behind the endpoint does not need its own template.
 */

use crate::planner::TranslationRequest;

/// Localization rules appended to every prompt
const RULES: &[&str] = &[
    "Output only JSON.",
    "Keys: label, localization.",
    "localization contains exactly the target languages.",
    "Each language object: {\"text\": \"<translation>\"}.",
    "Do not include description, meta, or extra metadata fields.",
    "Do not translate placeholders or modify their braces.",
    "Keep punctuation style consistent with source.",
    "Keep resulting JSON compact (no unnecessary whitespace).",
    "Use UTF-8 characters directly (no HTML entities).",
];

/// Output skeleton listing one empty entry per requested language
fn skeleton(label: &str, languages: &[String]) -> String {
    let mut lines = vec![
        "{".to_string(),
        format!("  \"label\": {},", serde_json::Value::String(label.to_string())),
        "  \"localization\": {".to_string(),
    ];
    for (i, code) in languages.iter().enumerate() {
        let comma = if i + 1 == languages.len() { "" } else { "," };
        lines.push(format!("    \"{}\": {{ \"text\": \"\" }}{}", code, comma));
    }
    lines.push("  }".to_string());
    lines.push("}".to_string());
    lines.join("\n")
}

/// Build the translation instruction for one request
pub fn build_prompt(request: &TranslationRequest) -> String {
    let mut p: Vec<String> = Vec::new();
    p.push("You are a professional localization engine.".to_string());
    p.push("Localize the item below into the target languages.".to_string());

    p.push("--- CONTEXT INPUT ---".to_string());
    p.push(format!("label: {}", request.label));
    if !request.description.is_empty() {
        p.push(format!("description: {}", request.description));
    }
    if let Some(meta) = &request.meta {
        p.push(format!("meta_placeholders (ICU / intl format): {}", meta));
    }
    p.push(format!("en_source: {}", request.source_text));
    p.push(format!("target_languages: {}", request.languages.join(", ")));

    p.push("--- OUTPUT REQUIREMENTS ---".to_string());
    p.push("Return ONLY valid minified JSON (no comments, no markdown fences).".to_string());
    p.push("All requested languages MUST be present, no additional keys.".to_string());
    p.push("Preserve ICU/intl placeholders exactly (e.g., {name}, {count}).".to_string());
    p.push("Preserve HTML-like or XML-like tags verbatim if present.".to_string());
    p.push("If the translation would be identical to the source, repeat the source text.".to_string());
    p.push("No leading/trailing spaces in values.".to_string());

    p.push("--- OUTPUT SKELETON (structure to follow) ---".to_string());
    p.push(skeleton(&request.label, &request.languages));

    p.push("--- RULES SUMMARY ---".to_string());
    for (i, rule) in RULES.iter().enumerate() {
        p.push(format!("{}. {}", i + 1, rule));
    }

    p.join("\n")
}
