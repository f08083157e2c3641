//! Structural guarantees every mode keeps regardless of input.

mod common;

use std::collections::HashSet;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

use prism_engine::{ModeId, Preferences};
use prism_extraction::segment;

const ARTICLE: &str = "The Industrial Revolution began in Britain in the late 18th century. \
    Steam engines transformed manufacturing and transport. In 1825 the first public railway \
    opened between Stockton and Darlington.\n\n\
    Factories grew rapidly in the 1830s. It is important to note that working conditions were \
    often dangerous. For example, children worked long shifts in textile mills. According to \
    historians, wages rose only slowly until 1850.\n\n\
    Perhaps the most significant change was urbanization. Millions of people moved to cities \
    such as Manchester and Birmingham. Warning: many contemporary accounts exaggerate the \
    speed of this shift.";

fn array<'a>(value: &'a Value, key: &str) -> &'a Vec<Value> {
    value[key].as_array().unwrap()
}

#[test]
fn test_short_content_is_error_for_every_mode() {
    let engine = common::engine();
    for content in ["", "   ", "tiny", "nine char"] {
        for mode in ModeId::ALL {
            let result = engine.generate(content, mode.as_str(), &Preferences::new());
            assert_eq!(result.mode, mode);
            assert_eq!(result.metadata["error"], json!(true), "{mode} accepted {content:?}");
        }
    }
}

#[test]
fn test_puzzle_enforces_its_own_minimum() {
    let engine = common::engine();
    let result = engine.generate(
        "Long enough for the engine, too short for puzzles.",
        "puzzle_based",
        &Preferences::new(),
    );

    assert!(result.is_error());
    assert_eq!(result.metadata["error_kind"], json!("content_too_short"));
    let segments = array(&result.content, "segments");
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0]["unlocked"], json!(true));
}

#[test]
fn test_color_coding_partitions_sentences() {
    let engine = common::engine();
    let result = engine.generate(ARTICLE, "color_coded", &Preferences::new());
    assert!(!result.is_error());

    let sections = &result.content["sections"];
    let bucketed: usize = ["facts", "assumptions", "examples", "warnings"]
        .iter()
        .map(|key| array(sections, key).len())
        .sum();

    assert_eq!(bucketed, segment::split_sentences(ARTICLE).len());
    assert_eq!(result.content["statistics"]["total_sections"], json!(bucketed));
}

#[test]
fn test_timeline_is_sorted_and_deduplicated() {
    let engine = common::engine();
    let result = engine.generate(
        ARTICLE,
        "timeline",
        &Preferences::new().with_reference_year(2024),
    );
    assert!(!result.is_error());

    let events = array(&result.content, "events");
    assert!(!events.is_empty());

    let keys: Vec<i64> = events
        .iter()
        .map(|e| e["sort_key"].as_i64().unwrap())
        .collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]), "unsorted: {keys:?}");

    let periods: Vec<f64> = events.iter().map(|e| e["period"].as_f64().unwrap()).collect();
    for (i, a) in periods.iter().enumerate() {
        for b in &periods[i + 1..] {
            assert!((a - b).abs() >= 0.1, "events too close: {a} and {b}");
        }
    }
}

#[test]
fn test_knowledge_graph_edges_are_closed() {
    let engine = common::engine();
    let names = [
        "Alice", "Bob", "Carol", "Dave", "Erin", "Frank", "Grace", "Heidi", "Ivan", "Judy",
        "Mallory", "Niaj", "Olivia", "Peggy", "Rupert", "Sybil", "Trent", "Victor", "Walter",
        "Xavier", "Yolanda", "Zachary",
    ];
    let text = names
        .windows(2)
        .map(|pair| format!("{} works with {} at Acme Corporation.", pair[0], pair[1]))
        .collect::<Vec<_>>()
        .join(" ");

    let result = engine.generate(&text, "knowledge_graph", &Preferences::new());
    assert!(!result.is_error());

    let nodes = array(&result.content["graph_data"], "nodes");
    assert!(nodes.len() <= 20);

    let ids: HashSet<&str> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
    for edge in array(&result.content["graph_data"], "edges") {
        let (from, to) = (edge["from"].as_str().unwrap(), edge["to"].as_str().unwrap());
        assert!(ids.contains(from));
        assert!(ids.contains(to));
        assert_ne!(from, to);
    }
}

#[test]
fn test_summary_key_points_are_unique() {
    let engine = common::engine();
    let result = engine.generate(ARTICLE, "summary", &Preferences::new());
    assert!(!result.is_error());

    let points: Vec<&str> = array(&result.content, "key_points")
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    let unique: HashSet<&str> = points.iter().copied().collect();
    assert_eq!(unique.len(), points.len());

    let ratio = result.metadata["compression_ratio"].as_f64().unwrap();
    assert!(ratio > 0.0 && ratio <= 1.0, "ratio {ratio}");
    assert!(!result.content["tldr"].as_str().unwrap().is_empty());
}

#[test]
fn test_summary_tldr_never_empty() {
    let engine = common::engine();
    let result = engine.generate("just a few plain words", "summary", &Preferences::new());
    assert!(!result.is_error());
    assert!(!result.content["tldr"].as_str().unwrap().is_empty());
}

#[test]
fn test_concept_tree_has_two_levels() {
    let engine = common::engine();
    let result = engine.generate(ARTICLE, "collapsible_concepts", &Preferences::new());
    assert!(!result.is_error());

    let concepts = array(&result.content, "concepts");
    assert!(!concepts.is_empty());
    for concept in concepts {
        assert_eq!(concept["level"], json!(1));
        for child in array(concept, "children") {
            assert_eq!(child["level"], json!(2));
            assert!(array(child, "children").is_empty());
        }
    }
    assert!(result.content["hierarchy_stats"]["max_depth"].as_u64().unwrap() <= 2);
}

#[test]
fn test_only_first_puzzle_segment_is_unlocked() {
    let engine = common::engine();
    let result = engine.generate(ARTICLE, "puzzle_based", &Preferences::new().with_seed(3));
    assert!(!result.is_error());

    let segments = array(&result.content, "segments");
    assert!(segments.len() >= 2);
    assert_eq!(segments[0]["unlocked"], json!(true));
    assert!(segments[1..].iter().all(|s| s["unlocked"] == json!(false)));
    for segment in segments {
        let difficulty = segment["challenge"]["difficulty"].as_u64().unwrap();
        assert!((1..=3).contains(&difficulty));
    }
}

#[test]
fn test_output_is_deterministic() {
    let engine = common::engine();
    let preferences = Preferences::new().with_reference_year(2024).with_seed(42);

    for mode in ModeId::ALL {
        let first = engine.generate(ARTICLE, mode.as_str(), &preferences);
        let second = engine.generate(ARTICLE, mode.as_str(), &preferences);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap(), "{mode} drifted");
    }
}
