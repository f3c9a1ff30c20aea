/*!
 * Tests for batch scheduling, payloads and prompts
 */

use serde_json::json;
use sheet_localizer::errors::ClientError;
use sheet_localizer::planner;
use sheet_localizer::translation::protocol::parse_response_body;
use sheet_localizer::translation::{BatchPayload, BatchScheduler, prompts};

use crate::common;

#[test]
fn test_batches_withSevenRequests_shouldSliceThreeThreeOne() {
    let mut sheet = common::sheet_with_rows(7);
    let plan = planner::plan(&mut sheet, "en").unwrap();
    let scheduler = BatchScheduler::new(3);

    let slices: Vec<Vec<&str>> = scheduler
        .batches(&plan.requests)
        .map(|slice| slice.iter().map(|r| r.label.as_str()).collect())
        .collect();

    assert_eq!(scheduler.batch_count(plan.requests.len()), 3);
    assert_eq!(
        slices,
        vec![
            vec!["key1", "key2", "key3"],
            vec!["key4", "key5", "key6"],
            vec!["key7"],
        ]
    );
}

#[test]
fn test_payload_withPromptEnabled_shouldCarryPromptPerItem() {
    let mut sheet = common::memory_sheet(&[
        &["label", "description", "meta", "en", "es", "de"],
        &["welcome", "Greeting on the home page", "{\"tone\": \"friendly\"}", "Hello {name}", "", ""],
    ]);
    let plan = planner::plan(&mut sheet, "en").unwrap();

    let payload = BatchPayload::from_requests(&plan.requests, true);
    let prompt = payload.batch[0].prompt.as_deref().unwrap();
    assert!(prompt.contains("welcome"));
    assert!(prompt.contains("Hello {name}"));
    assert!(prompt.contains("\"es\": { \"text\": \"\" }"));
    assert!(prompt.contains("\"de\": { \"text\": \"\" }"));
    assert_eq!(prompt, prompts::build_prompt(&plan.requests[0]));

    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(value["batch"][0]["meta"], json!({"tone": "friendly"}));
    assert_eq!(value["batch"][0]["languages"], json!(["es", "de"]));
}

#[test]
fn test_payload_withPromptDisabled_shouldOmitPromptKey() {
    let mut sheet = common::sheet_with_rows(1);
    let plan = planner::plan(&mut sheet, "en").unwrap();

    let value = serde_json::to_value(BatchPayload::from_requests(&plan.requests, false)).unwrap();
    assert!(value["batch"][0].get("prompt").is_none());
    assert_eq!(value["batch"][0]["meta"], json!({}));
}

#[test]
fn test_parse_response_body_withFencedJson_shouldRecover() {
    let body = "Here you go:\n```json\n{\"data\": [{\"label\": \"a\", \"localization\": {\"es\": \"x\"},}]}\n```";
    let value = parse_response_body(body).unwrap();
    assert_eq!(value["data"][0]["label"], "a");
}

#[test]
fn test_parse_response_body_withGarbage_shouldFailWithSnippet() {
    match parse_response_body("<html>Bad gateway</html>") {
        Err(ClientError::ParseError(message)) => assert!(message.contains("<html>Bad gateway")),
        other => panic!("expected ParseError, got {:?}", other),
    }
}
