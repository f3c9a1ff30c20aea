/*!
 * Tests for request planning through the public API
 */

use serde_json::json;
use sheet_localizer::errors::LocalizationError;
use sheet_localizer::planner;
use sheet_localizer::sheet::{MemorySheet, SheetStore};

use crate::common;

#[test]
fn test_plan_withScenarioSheet_shouldRequestEmptyLanguagesInHeaderOrder() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "en", "es", "de"],
        &["btn1", "", "", "Save", "", ""],
    ]);

    let plan = planner::plan(&mut sheet, "en").unwrap();
    assert_eq!(plan.requests.len(), 1);
    assert_eq!(plan.requests[0].label, "btn1");
    assert_eq!(plan.requests[0].source_text, "Save");
    assert_eq!(plan.requests[0].languages, vec!["es", "de"]);
    assert_eq!(plan.requests[0].meta, None);
}

#[test]
fn test_plan_withWhitespaceCells_shouldTreatThemAsEmpty() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "en", "es", "de"],
        &["a", "", "", "Alpha", "   ", "Alpha-de"],
    ]);

    let plan = planner::plan(&mut sheet, "en").unwrap();
    assert_eq!(plan.requests[0].languages, vec!["es"]);
}

#[test]
fn test_plan_withFullyTranslatedSheet_shouldBeEmpty() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "en", "es"],
        &["a", "", "", "Alpha", "Alfa"],
        &["b", "", "", "Beta", "Beta"],
    ]);

    let plan = planner::plan(&mut sheet, "en").unwrap();
    assert!(plan.is_empty());
    assert!(plan.index.is_empty());
    assert_eq!(plan.rows_considered, 2);
}

#[test]
fn test_plan_withHeaderOnly_shouldFailStructure() {
    let mut sheet = common::memory_sheet(&[&["label", "description", "meta", "en", "es"]]);
    assert!(matches!(
        planner::plan(&mut sheet, "en"),
        Err(LocalizationError::SheetStructure(_))
    ));
}

#[test]
fn test_plan_withCustomSourceColumn_shouldDetectLanguagesAfterIt() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "source", "fr", "it"],
        &["a", "", "", "Alpha", "", "Alfa"],
    ]);

    let plan = planner::plan(&mut sheet, "Source").unwrap();
    assert_eq!(plan.layout.header.source, 3);
    assert_eq!(plan.requests[0].languages, vec!["fr"]);
}

#[test]
fn test_plan_withInvalidMeta_shouldAnnotateMetaCellAndFail() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "en", "es"],
        &["a", "", "{\"ok\": true}", "Alpha", ""],
        &["b", "", "{broken", "Beta", ""],
    ]);

    let result = planner::plan(&mut sheet, "en");
    assert!(matches!(result, Err(LocalizationError::MetaParse { row: 3, .. })));
    assert_eq!(sheet.note(2, 2).unwrap().as_deref(), Some("meta: invalid JSON"));
}

#[test]
fn test_plan_withDuplicateLabel_shouldAnnotateLabelCell() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "en", "es"],
        &["dup", "", "", "One", "Uno"],
        &["dup", "", "", "Two", ""],
    ]);

    let result = planner::plan(&mut sheet, "en");
    assert!(matches!(result, Err(LocalizationError::DuplicateLabel { ref label, row: 3 }) if label == "dup"));
    let note = sheet.note(2, 0).unwrap().unwrap_or_default();
    assert!(note.contains("Duplicate label"));
}

#[test]
fn test_plan_withMeta_shouldKeepParsedValue() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "en", "es"],
        &["a", "Toolbar", "{\"maxLength\": 12}", "Alpha", ""],
    ]);

    let plan = planner::plan(&mut sheet, "en").unwrap();
    assert_eq!(plan.requests[0].description, "Toolbar");
    assert_eq!(plan.requests[0].meta, Some(json!({"maxLength": 12})));
}

#[test]
fn test_plan_index_withManyRows_shouldKeepPlanningOrder() {
    let mut sheet: MemorySheet = common::sheet_with_rows(5);

    let plan = planner::plan(&mut sheet, "en").unwrap();
    let labels: Vec<&str> = plan.index.iter().map(|(label, _)| label).collect();
    assert_eq!(labels, vec!["key1", "key2", "key3", "key4", "key5"]);
    assert_eq!(plan.index.len(), 5);
}
