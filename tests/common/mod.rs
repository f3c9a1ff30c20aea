/*!
 * Common test utilities for the sheet-localizer test suite
 */

use anyhow::Result;
use serde_json::{Value, json};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use sheet_localizer::app_config::{Config, HighlightConfig, RetryConfig};
use sheet_localizer::sheet::MemorySheet;


/// Default highlight color used by the tests
pub const HIGHLIGHT: &str = "255,242,204";

/// Route library logs to the test output once
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Writes a JSON sheet document holding `rows`
pub fn create_sheet_document(dir: &Path, filename: &str, rows: Value) -> Result<PathBuf> {
    let document = json!({ "rows": rows });
    create_test_file(dir, filename, &serde_json::to_string_pretty(&document)?)
}

/// In-memory sheet from string rows
pub fn memory_sheet(rows: &[&[&str]]) -> MemorySheet {
    MemorySheet::from_rows(rows.iter().map(|row| row.to_vec()).collect::<Vec<_>>())
}

/// Sheet with the standard header and `count` rows missing `es` and `de`
pub fn sheet_with_rows(count: usize) -> MemorySheet {
    let mut rows = vec![vec![
        "label".to_string(),
        "description".to_string(),
        "meta".to_string(),
        "en".to_string(),
        "es".to_string(),
        "de".to_string(),
    ]];
    for i in 1..=count {
        rows.push(vec![
            format!("key{}", i),
            String::new(),
            String::new(),
            format!("Text {}", i),
            String::new(),
            String::new(),
        ]);
    }
    MemorySheet::from_rows(rows)
}

/// Dry-run configuration with highlighting and fast retries
pub fn dry_run_config() -> Config {
    Config {
        dry_run: true,
        highlight: HighlightConfig {
            color: HIGHLIGHT.to_string(),
            auto_clear_minutes: 0,
        },
        retry: RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
        },
        ..Config::default()
    }
}

/// HTTP configuration pointing at `api_url` with fast retries
pub fn http_config(api_url: &str) -> Config {
    Config {
        api_url: api_url.to_string(),
        timeout_ms: 5_000,
        retry: RetryConfig {
            max_retries: 2,
            base_delay_ms: 1,
        },
        ..Config::default()
    }
}
