/*!
 * Full app lifecycle tests over a JSON sheet document
 */

use serde_json::{Value, json};
use std::fs;

use sheet_localizer::app_config::Config;
use sheet_localizer::errors::LocalizationError;
use sheet_localizer::sheet::{self, JsonFileSheet, Rgb, SheetStore};
use sheet_localizer::Controller;

use crate::common;

fn read_document(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_run_withJsonSheet_shouldPersistTranslationsAndHighlight() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_sheet_document(
        dir.path(),
        "strings.json",
        json!([
            ["label", "description", "meta", "en", "es", "de"],
            ["btn1", "", "", "Save", "", "Speichern"],
            ["count", "", "{\"n\": 1}", 42, null, ""]
        ]),
    )
    .unwrap();

    let shared = sheet::shared(JsonFileSheet::open(&path).unwrap());
    let controller = Controller::with_config(common::dry_run_config()).unwrap();
    let summary = controller.run(&shared).await.unwrap();
    assert_eq!(summary.cells_written, 3);

    let document = read_document(&path);
    assert_eq!(document["rows"][1][4], "[SIM:es] Save");
    assert_eq!(document["rows"][1][5], "Speichern");
    assert_eq!(document["rows"][2][3], 42);
    assert_eq!(document["rows"][2][5], "[SIM:de] 42");
    assert_eq!(document["rows"][2][4], "[SIM:es] 42");
    assert_eq!(document["backgrounds"]["1:4"], "#fff2cc");
    assert!(document["backgrounds"].get("1:5").is_none());

    let reopened = JsonFileSheet::open(&path).unwrap();
    assert_eq!(reopened.background(2, 5).unwrap(), Some(Rgb::new(255, 242, 204)));
}

#[tokio::test]
async fn test_run_withDuplicateLabels_shouldPersistNoteEvenThoughRunFails() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_sheet_document(
        dir.path(),
        "strings.json",
        json!([
            ["label", "description", "meta", "en", "es"],
            ["dup", "", "", "One", ""],
            ["dup", "", "", "Two", ""]
        ]),
    )
    .unwrap();

    let shared = sheet::shared(JsonFileSheet::open(&path).unwrap());
    let controller = Controller::with_config(common::dry_run_config()).unwrap();
    let error = controller.run(&shared).await.unwrap_err();
    assert!(matches!(error, LocalizationError::DuplicateLabel { .. }));

    let document = read_document(&path);
    assert!(document["notes"]["2:0"].as_str().unwrap_or_default().contains("Duplicate label"));
    assert_eq!(document["rows"][1][4], "");
}

#[tokio::test]
async fn test_clear_highlights_afterRun_shouldResetOnlyHighlightColor() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "strings.json",
        &json!({
            "rows": [
                ["label", "description", "meta", "en", "es"],
                ["a", "", "", "Alpha", ""]
            ],
            "backgrounds": { "1:0": "#ff0000" }
        })
        .to_string(),
    )
    .unwrap();

    let config = Config {
        highlight: sheet_localizer::app_config::HighlightConfig {
            color: common::HIGHLIGHT.to_string(),
            auto_clear_minutes: 30,
        },
        ..common::dry_run_config()
    };
    let shared = sheet::shared(JsonFileSheet::open(&path).unwrap());
    let controller = Controller::with_config(config).unwrap();

    let summary = controller.run(&shared).await.unwrap();
    assert!(summary.clear_scheduled);
    assert!(controller.clear_slot().is_pending());

    assert_eq!(controller.clear_highlights(&shared).unwrap(), 1);
    assert!(!controller.clear_slot().is_pending());

    let document = read_document(&path);
    assert!(document["backgrounds"].get("1:4").is_none());
    assert_eq!(document["backgrounds"]["1:0"], "#ff0000");
}

#[tokio::test]
async fn test_wait_for_clear_withPausedClock_shouldClearAfterDelay() {
    tokio::time::pause();
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_sheet_document(
        dir.path(),
        "strings.json",
        json!([
            ["label", "description", "meta", "en", "es"],
            ["a", "", "", "Alpha", ""]
        ]),
    )
    .unwrap();

    let mut config = common::dry_run_config();
    config.highlight.auto_clear_minutes = 1;
    let shared = sheet::shared(JsonFileSheet::open(&path).unwrap());
    let controller = Controller::with_config(config).unwrap();

    controller.run(&shared).await.unwrap();
    assert_eq!(read_document(&path)["backgrounds"]["1:4"], "#fff2cc");

    let start = tokio::time::Instant::now();
    controller.wait_for_clear().await;
    assert!(start.elapsed() >= std::time::Duration::from_secs(60));

    let document = read_document(&path);
    assert_eq!(document["rows"][1][4], "[SIM:es] Alpha");
    assert!(document["backgrounds"].get("1:4").is_none());
}

#[tokio::test]
async fn test_second_run_withAutoClear_shouldReplacePendingJob() {
    let shared = sheet::shared(common::sheet_with_rows(1));
    let mut config = common::dry_run_config();
    config.highlight.auto_clear_minutes = 10;
    let controller = Controller::with_config(config).unwrap();

    assert!(controller.run(&shared).await.unwrap().clear_scheduled);
    shared.lock().set_value(1, 5, "").unwrap();
    assert!(controller.run(&shared).await.unwrap().clear_scheduled);
    assert!(controller.clear_slot().is_pending());
    assert!(controller.clear_slot().cancel());
    assert!(!controller.clear_slot().cancel());
}

#[tokio::test]
async fn test_plan_withJsonSheet_shouldNotModifyDocument() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_sheet_document(
        dir.path(),
        "strings.json",
        json!([
            ["label", "description", "meta", "en", "es", "fr"],
            ["a", "", "", "Alpha", "", "Alpha-fr"]
        ]),
    )
    .unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let shared = sheet::shared(JsonFileSheet::open(&path).unwrap());
    let controller = Controller::with_config(common::dry_run_config()).unwrap();
    let plan = controller.plan(&shared).unwrap();

    assert_eq!(plan.requests.len(), 1);
    assert_eq!(plan.requests[0].languages, vec!["es"]);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}
