//! Integration tests for the tool abstractor: both extraction strategies,
//! branch observability, and totality.

mod common;

use abstraction::{AbstractionOutcome, ExtractionStrategy, ToolAbstractor};
use common::{MockLlmClient, StructuredBehavior};
use serde_json::json;
use std::sync::Arc;

fn structured_abstractor(behavior: StructuredBehavior) -> ToolAbstractor {
    ToolAbstractor::new(Arc::new(MockLlmClient::structured(behavior)))
}

#[tokio::test]
async fn structured_record_produces_parsed_entry() {
    let abstractor = structured_abstractor(StructuredBehavior::Value(json!({
        "name": "csv_summarizer",
        "description": "Summarizes numeric columns of a CSV file.",
        "use_case": "Quick statistics for tabular data.",
        "code": "def summarize(path, columns=None): ...",
    })));

    let outcome = abstractor
        .try_generalize("def f(): print(open('ages.csv'))", "summarize ages.csv")
        .await;

    match outcome {
        AbstractionOutcome::Parsed(entry) => {
            assert_eq!(entry.name, "csv_summarizer");
            assert_eq!(entry.use_case, "Quick statistics for tabular data.");
            assert!(entry.code.starts_with("def summarize"));
            assert!(entry.embedding.is_none());
        }
        AbstractionOutcome::Fallback(_) => panic!("expected the parsed branch"),
    }
}

#[tokio::test]
async fn structured_none_falls_back() {
    let abstractor = structured_abstractor(StructuredBehavior::Empty);
    let outcome = abstractor.try_generalize("raw code", "the task").await;
    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn structured_failure_falls_back() {
    let abstractor = structured_abstractor(StructuredBehavior::Fail);
    let outcome = abstractor.try_generalize("raw code", "the task").await;
    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn non_conforming_record_falls_back() {
    // Missing the required "code" field.
    let abstractor = structured_abstractor(StructuredBehavior::Value(json!({
        "name": "t",
        "description": "d",
        "use_case": "u",
    })));
    let outcome = abstractor.try_generalize("raw code", "the task").await;
    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn empty_name_in_record_falls_back() {
    let abstractor = structured_abstractor(StructuredBehavior::Value(json!({
        "name": "  ",
        "description": "d",
        "use_case": "u",
        "code": "c",
    })));
    let outcome = abstractor.try_generalize("raw code", "the task").await;
    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn free_text_reply_produces_parsed_entry() {
    let reply = "NAME: url_fetcher\n\
                 DESCRIPTION: Fetches a URL and returns the body.\n\
                 USE_CASE: Downloading web resources.\n\
                 CODE:\n```python\ndef fetch(url, timeout=30): ...\n```";
    let abstractor = ToolAbstractor::new(Arc::new(MockLlmClient::completing(reply)))
        .with_strategy(ExtractionStrategy::FreeText);

    let outcome = abstractor.try_generalize("raw code", "the task").await;
    match outcome {
        AbstractionOutcome::Parsed(entry) => {
            assert_eq!(entry.name, "url_fetcher");
            assert_eq!(entry.description, "Fetches a URL and returns the body.");
            assert!(entry.code.starts_with("def fetch"));
        }
        AbstractionOutcome::Fallback(_) => panic!("expected the parsed branch"),
    }
}

#[tokio::test]
async fn free_text_out_of_order_markers_fall_back() {
    let reply = "CODE:\n```\ncode\n```\nNAME: t\nDESCRIPTION: d\nUSE_CASE: u";
    let abstractor = ToolAbstractor::new(Arc::new(MockLlmClient::completing(reply)))
        .with_strategy(ExtractionStrategy::FreeText);

    let outcome = abstractor.try_generalize("raw code", "the task").await;
    assert!(outcome.is_fallback());
}

#[tokio::test]
async fn fallback_entry_carries_raw_code_unchanged() {
    let abstractor = ToolAbstractor::new(Arc::new(MockLlmClient::failing()));

    let entry = abstractor
        .generalize("def broken(:", "scrape the site from the task")
        .await;

    assert_eq!(entry.name, "unknown_tool");
    assert_eq!(entry.code, "def broken(:");
    assert_eq!(entry.description, "Auto-generated tool");
    assert_eq!(entry.use_case, "scrape the site from the task");
}

#[tokio::test]
async fn generalize_is_total_for_hostile_inputs() {
    for raw in ["", "CODE: before NAME:", "```\nunclosed fence"] {
        for strategy in [ExtractionStrategy::Structured, ExtractionStrategy::FreeText] {
            let abstractor = ToolAbstractor::new(Arc::new(MockLlmClient::failing()))
                .with_strategy(strategy);
            let entry = abstractor.generalize(raw, "ctx").await;
            assert_eq!(entry.code, raw);
            assert_eq!(entry.name, "unknown_tool");
        }
    }
}
