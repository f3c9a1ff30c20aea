/*!
 * Tests for application configuration functionality
 */

use sheet_localizer::app_config::{Config, LogLevel};
use sheet_localizer::errors::LocalizationError;
use sheet_localizer::sheet::Rgb;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.api_url, "");
    assert_eq!(config.auth_header, "Authorization");
    assert_eq!(config.timeout_ms, 360_000);
    assert_eq!(config.batch_size, 3);
    assert_eq!(config.retry.max_retries, 2);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.highlight.color, "");
    assert_eq!(config.highlight.auto_clear_minutes, 0);
    assert!(!config.dry_run);
    assert_eq!(config.source_column, "en");
    assert!(!config.overwrite);
    assert!(!config.include_prompt);
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Partial documents are completed with defaults
#[test]
fn test_deserialize_withPartialJson_shouldFillDefaults() {
    let config: Config = serde_json::from_str(
        r#"{ "api_url": "https://example.test/translate", "retry": { "max_retries": 5 }, "log_level": "debug" }"#,
    )
    .unwrap();

    assert_eq!(config.api_url, "https://example.test/translate");
    assert_eq!(config.retry.max_retries, 5);
    assert_eq!(config.retry.base_delay_ms, 1000);
    assert_eq!(config.batch_size, 3);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test configuration validation
#[test]
fn test_validate_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(matches!(config.validate(), Err(LocalizationError::Config(_))));

    config.dry_run = true;
    assert!(config.validate().is_ok());

    config.dry_run = false;
    config.api_url = "not a url".to_string();
    assert!(config.validate().is_err());

    config.api_url = "https://example.test/translate".to_string();
    assert!(config.validate().is_ok());

    config.source_column = "  ".to_string();
    assert!(config.validate().is_err());
    config.source_column = "en".to_string();

    config.highlight.color = "300,0,0".to_string();
    assert!(config.validate().is_err());
    config.highlight.color = "255,242,204".to_string();
    assert!(config.validate().is_ok());

    config.api_key = "secret".to_string();
    config.auth_header = String::new();
    assert!(config.validate().is_err());
}

/// Legacy overwrite flag only warns
#[test]
fn test_validate_withOverwriteFlag_shouldStillPass() {
    let config = Config {
        overwrite: true,
        ..common::dry_run_config()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_effective_batch_size_withNonPositiveValue_shouldFallBackToDefault() {
    let mut config = Config::default();
    for (configured, expected) in [(7, 7), (1, 1), (0, 3), (-4, 3)] {
        config.batch_size = configured;
        assert_eq!(config.effective_batch_size(), expected);
    }
}

#[test]
fn test_auth_header_value_withKey_shouldPrefixBearerOnlyForAuthorization() {
    let mut config = Config::default();
    assert_eq!(config.auth_header_value(), None);

    config.api_key = "secret".to_string();
    assert_eq!(config.auth_header_value().as_deref(), Some("Bearer secret"));

    config.api_key = "Bearer already".to_string();
    assert_eq!(config.auth_header_value().as_deref(), Some("Bearer already"));

    config.api_key = "secret".to_string();
    config.auth_header = "X-Api-Key".to_string();
    assert_eq!(config.auth_header_value().as_deref(), Some("secret"));
}

#[test]
fn test_highlight_rgb_withEmptyColor_shouldDisableHighlight() {
    let mut config = Config::default();
    assert_eq!(config.highlight.rgb().unwrap(), None);

    config.highlight.color = " 255, 242, 204 ".to_string();
    assert_eq!(config.highlight.rgb().unwrap(), Some(Rgb::new(255, 242, 204)));
}

/// Missing files are created with defaults, existing ones are read
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let created = Config::load_or_create(&path).unwrap();
    assert!(path.exists());
    assert_eq!(created.batch_size, 3);

    common::create_test_file(dir.path(), "conf.json", r#"{ "batch_size": 10, "dry_run": true }"#).unwrap();
    let loaded = Config::load_or_create(&path).unwrap();
    assert_eq!(loaded.batch_size, 10);
    assert!(loaded.dry_run);
}

#[test]
fn test_load_or_create_withInvalidJson_shouldReportPath() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    let error = Config::load_or_create(&path).unwrap_err();
    assert!(format!("{:#}", error).contains("Failed to parse config file"));
}
