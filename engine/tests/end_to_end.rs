//! End-to-end scenarios through the engine entry point.

mod common;

use pretty_assertions::assert_eq;
use serde_json::json;

use prism_engine::{ModeId, Preferences};

#[test]
fn test_timeline_orders_einstein_events() {
    let engine = common::engine();
    let result = engine.generate(
        "Albert Einstein published the theory of relativity in 1905. \
         In 1915 he refined it into general relativity.",
        "timeline",
        &Preferences::new().with_reference_year(2024),
    );

    assert_eq!(result.mode, ModeId::Timeline);
    assert!(!result.is_error());

    let events = result.content["events"].as_array().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0]["date_raw"], json!("1905"));
    assert_eq!(events[1]["date_raw"], json!("1915"));
    for event in events {
        assert_eq!(event["precision"], json!("year"));
    }
}

#[test]
fn test_knowledge_graph_links_ai_and_machine_learning() {
    let engine = common::engine();
    let result = engine.generate(
        "AI is a technology. Machine learning is a subset of AI.",
        "knowledge_graph",
        &Preferences::new(),
    );
    assert!(!result.is_error());

    let entities = result.content["entities"].as_array().unwrap();
    let id_of = |name: &str| {
        entities
            .iter()
            .find(|e| e["name"] == json!(name))
            .map(|e| e["id"].clone())
            .unwrap()
    };
    let ai = id_of("AI");
    let ml = id_of("Machine learning");

    let relationships = result.content["relationships"].as_array().unwrap();
    let linked = relationships.iter().any(|r| {
        let endpoints = (&r["source_id"], &r["target_id"]);
        let joins = endpoints == (&ai, &ml) || endpoints == (&ml, &ai);
        joins && (r["relation_type"] == json!("is_a") || r["relation_type"] == json!("has"))
    });
    assert!(linked, "no is_a/has edge between AI and Machine learning");
}

#[test]
fn test_short_content_is_error() {
    let engine = common::engine();
    let result = engine.generate("Hello", "plain_text", &Preferences::new());

    assert_eq!(result.mode, ModeId::PlainText);
    assert_eq!(result.metadata["error"], json!(true));
    assert_eq!(result.metadata["error_kind"], json!("content_too_short"));
    assert_eq!(result.content["error"], json!(true));
}

#[test]
fn test_timeline_without_dates_falls_back() {
    let engine = common::engine();
    let result = engine.generate(
        "Cats sleep in the sun. Dogs chase balls around the garden.",
        "timeline",
        &Preferences::new(),
    );

    assert_eq!(result.mode, ModeId::Timeline);
    assert!(result.is_error());
    assert_eq!(result.metadata["error_kind"], json!("no_extractable_data"));
    assert_eq!(result.content["events"], json!([]));
}

#[test]
fn test_every_result_serializes() {
    let engine = common::engine();
    let text = "Rust is a systems programming language. It was first released in 2015. \
                For example, Firefox uses Rust components. You must never ignore the \
                borrow checker because it prevents data races.";

    for mode in ModeId::ALL {
        let result = engine.generate(text, mode.as_str(), &Preferences::new().with_seed(7));
        assert_eq!(result.mode, mode);
        let json = result.to_json().unwrap();
        assert!(json.contains("\"engine_version\":\"2.0\""));
    }
}
