//! Interactive concept networks.
//!
//! Entities come from four candidate families (capitalized phrases, known
//! abbreviations and domain terms, concept nouns, and determiner-led
//! capitalized phrases). They are ranked by an importance score and linked
//! with the ordered relation patterns from the extraction toolkit. Output is
//! shaped for a vis-style network widget.

use std::sync::Arc;

use regex_lite::Regex;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use prism_extraction::entity::{classify, mention_context};
use prism_extraction::phrases::DOMAIN_TERM_PATTERN;
use prism_extraction::{Entity, Relationship, Toolkit, entity, lexicon, segment};

use crate::error::Result;
use crate::mode::{ModeCategory, ModeId, ModeInfo, Representation};
use crate::preferences::Preferences;
use crate::result::{Complexity, RepresentationResult};

const MIN_NAME_LEN: usize = 3;
const MAX_DESCRIPTION_LEN: usize = 100;

const CONCEPT_NOUN_PATTERN: &str = r"(?i)\b(?:algorithm|framework|methodology|principle|concept|theory|model|system|process|technique)\w*\b|(?i:\b[a-z]+ology\b)";
const DETERMINER_PHRASE_PATTERN: &str =
    r"\b(?:[Tt]he|[Aa]n?)[ \t]+([A-Z][a-z]+(?:[ \t]+[A-Z][a-z]+)*)\b";

const IMPORTANCE_INDICATORS: &[&str] = &[
    "important", "key", "main", "primary", "central", "core", "fundamental", "essential",
    "critical", "significant", "major", "crucial",
];

const NODE_BORDER: &str = "#2D3748";
const NODE_HIGHLIGHT_BACKGROUND: &str = "#FBBF24";
const NODE_HIGHLIGHT_BORDER: &str = "#92400E";
const NODE_FONT_COLOR: &str = "#1F2937";
const NODE_FONT_SIZE: u32 = 12;
const EDGE_HIGHLIGHT: &str = "#F59E0B";
const ARROW_SCALE: f64 = 0.8;

#[derive(Debug, Serialize)]
struct Highlight {
    background: &'static str,
    border: &'static str,
}

#[derive(Debug, Serialize)]
struct NodeColor {
    background: String,
    border: &'static str,
    highlight: Highlight,
}

#[derive(Debug, Serialize)]
struct NodeFont {
    size: u32,
    color: &'static str,
}

/// A node in the vis-style network.
#[derive(Debug, Serialize)]
pub struct GraphNode {
    id: String,
    label: String,
    title: String,
    group: String,
    size: u32,
    color: NodeColor,
    font: NodeFont,
    physics: bool,
    value: u32,
}

impl From<&Entity> for GraphNode {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id.clone(),
            label: entity.name.clone(),
            title: entity.description.clone(),
            group: entity.group(),
            size: entity.size,
            color: NodeColor {
                background: entity.color.clone(),
                border: NODE_BORDER,
                highlight: Highlight {
                    background: NODE_HIGHLIGHT_BACKGROUND,
                    border: NODE_HIGHLIGHT_BORDER,
                },
            },
            font: NodeFont {
                size: NODE_FONT_SIZE,
                color: NODE_FONT_COLOR,
            },
            physics: true,
            value: entity.importance,
        }
    }
}

#[derive(Debug, Serialize)]
struct EdgeColor {
    color: String,
    highlight: &'static str,
}

#[derive(Debug, Serialize)]
struct ArrowHead {
    enabled: bool,
    #[serde(rename = "scaleFactor")]
    scale_factor: f64,
}

#[derive(Debug, Serialize)]
struct Arrows {
    to: ArrowHead,
}

#[derive(Debug, Serialize)]
struct Smooth {
    enabled: bool,
    #[serde(rename = "type")]
    kind: &'static str,
}

/// A directed edge in the vis-style network.
#[derive(Debug, Serialize)]
pub struct GraphEdge {
    id: String,
    from: String,
    to: String,
    label: String,
    title: String,
    width: u32,
    color: EdgeColor,
    arrows: Arrows,
    smooth: Smooth,
    physics: bool,
}

impl From<&Relationship> for GraphEdge {
    fn from(relationship: &Relationship) -> Self {
        let label = relationship.relation_type.label();
        Self {
            id: relationship.id.clone(),
            from: relationship.source_id.clone(),
            to: relationship.target_id.clone(),
            title: format!("{}: {label}", relationship.relation_type.as_str()),
            label,
            width: relationship.width,
            color: EdgeColor {
                color: relationship.color.clone(),
                highlight: EDGE_HIGHLIGHT,
            },
            arrows: Arrows {
                to: ArrowHead {
                    enabled: true,
                    scale_factor: ARROW_SCALE,
                },
            },
            smooth: Smooth {
                enabled: true,
                kind: "continuous",
            },
            physics: true,
        }
    }
}

#[derive(Serialize)]
struct GraphData {
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
}

#[derive(Serialize)]
struct GraphStats {
    node_count: usize,
    edge_count: usize,
    complexity: Complexity,
}

#[derive(Serialize)]
struct GraphContent {
    graph_data: GraphData,
    entities: Vec<Entity>,
    relationships: Vec<Relationship>,
    stats: GraphStats,
}

#[derive(Serialize)]
struct GraphMetadata {
    node_count: usize,
    edge_count: usize,
    complexity: Complexity,
    processing_method: &'static str,
}

/// Interactive visual network of interconnected concepts.
pub struct KnowledgeGraph {
    info: ModeInfo,
    toolkit: Arc<Toolkit>,
    domain_terms: Regex,
    concept_nouns: Regex,
    determiner_phrases: Regex,
}

impl KnowledgeGraph {
    pub fn new(toolkit: Arc<Toolkit>) -> Result<Self> {
        Ok(Self {
            info: ModeInfo::new(
                ModeId::KnowledgeGraph,
                "Knowledge Graph",
                "Interactive visual network of interconnected concepts",
                "🧠",
                ModeCategory::Visual,
            ),
            toolkit,
            domain_terms: Regex::new(DOMAIN_TERM_PATTERN)?,
            concept_nouns: Regex::new(CONCEPT_NOUN_PATTERN)?,
            determiner_phrases: Regex::new(DETERMINER_PHRASE_PATTERN)?,
        })
    }

    /// Candidate names from all four families, in first-seen order.
    ///
    /// Duplicates are detected case-insensitively. Short names survive only
    /// when they are known abbreviations such as "AI".
    pub fn candidates(&self, text: &str) -> Vec<String> {
        let capitalized = self.toolkit.entities.candidates(text);
        let domain_terms = self.domain_terms.find_iter(text).map(|m| m.as_str().to_string());
        let concept_nouns = self.concept_nouns.find_iter(text).map(|m| m.as_str().to_string());
        let determiner_phrases = self
            .determiner_phrases
            .captures_iter(text)
            .filter_map(|cap| cap.get(1))
            .map(|m| entity::strip_function_words(m.as_str()).to_string());

        let mut names: Vec<String> = Vec::new();
        for name in capitalized
            .into_iter()
            .chain(domain_terms)
            .chain(concept_nouns)
            .chain(determiner_phrases)
        {
            let name = name.trim();
            if name.chars().count() < MIN_NAME_LEN && !self.domain_terms.is_match(name) {
                continue;
            }
            if !names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                names.push(name.to_string());
            }
        }

        entity::absorb_nested(names, text)
    }

    /// Frequency, plus 2 per importance indicator sharing a sentence with the
    /// name, plus up to 3 for appearing early.
    pub fn importance(&self, name: &str, text: &str, sentences: &[String]) -> u32 {
        let frequency = lexicon::count_occurrences(text, name) as u32;

        let boosted = IMPORTANCE_INDICATORS
            .iter()
            .filter(|indicator| {
                sentences.iter().any(|s| {
                    lexicon::contains_word(s, indicator) && lexicon::contains_word(s, name)
                })
            })
            .count() as u32;

        let position = match lexicon::first_occurrence(text, name) {
            Some(offset) if !text.is_empty() => {
                (3.0 - 3.0 * offset as f64 / text.len() as f64).max(0.0).floor() as u32
            }
            _ => 0,
        };

        frequency + 2 * boosted + position
    }

    /// Build, rank and cap the entity list.
    pub fn entities(&self, text: &str, max_entities: usize) -> Vec<Entity> {
        let sentences = segment::sentences(text);

        let mut entities: Vec<Entity> = self
            .candidates(text)
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let classification = classify(&name, &mention_context(&sentences, &name));
                let importance = self.importance(&name, text, &sentences);
                let description = describe(&name, &sentences);
                Entity::new(format!("node_{i}"), name, classification, importance)
                    .with_description(description)
            })
            .collect();

        entities.sort_by(|a, b| b.importance.cmp(&a.importance));
        entities.truncate(max_entities);
        entities
    }
}

/// First sentence mentioning `name`, shortened for a tooltip.
fn describe(name: &str, sentences: &[String]) -> String {
    match sentences.iter().find(|s| lexicon::contains_word(s, name)) {
        Some(sentence) if sentence.chars().count() > MAX_DESCRIPTION_LEN => {
            let head: String = sentence.chars().take(MAX_DESCRIPTION_LEN - 3).collect();
            format!("{head}...")
        }
        Some(sentence) => sentence.clone(),
        None => format!("Concept: {name}"),
    }
}

fn complexity(node_count: usize, edge_count: usize) -> Complexity {
    match node_count + edge_count {
        0..10 => Complexity::Low,
        10..25 => Complexity::Medium,
        _ => Complexity::High,
    }
}

impl Representation for KnowledgeGraph {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn render(&self, content: &str, preferences: &Preferences) -> Result<RepresentationResult> {
        let entities = self.entities(content, preferences.max_entities());
        let relationships = self.toolkit.relationships.extract(&entities, content);

        let nodes: Vec<GraphNode> = entities.iter().map(GraphNode::from).collect();
        let edges: Vec<GraphEdge> = relationships.iter().map(GraphEdge::from).collect();
        let (node_count, edge_count) = (nodes.len(), edges.len());
        let complexity = complexity(node_count, edge_count);
        debug!("Built knowledge graph with {node_count} nodes and {edge_count} edges");

        let metadata = GraphMetadata {
            node_count,
            edge_count,
            complexity,
            processing_method: "enhanced_nlp",
        };
        let body = GraphContent {
            graph_data: GraphData { nodes, edges },
            entities,
            relationships,
            stats: GraphStats {
                node_count,
                edge_count,
                complexity,
            },
        };

        Ok(RepresentationResult::from_parts(self.id(), &body, &metadata)?
            .with_style_hints(&["knowledge-graph", "interactive-viz"])
            .with_ui_script("initializeKnowledgeGraph")
            .with_ui_config(json!({
                "container_id": "knowledge-graph",
                "auto_resize": true,
                "physics_enabled": true,
                "interaction_enabled": true,
            })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn graph() -> KnowledgeGraph {
        KnowledgeGraph::new(Arc::new(Toolkit::new().unwrap())).unwrap()
    }

    #[test]
    fn test_abbreviations_survive_the_length_filter() {
        let mode = graph();
        assert_eq!(
            mode.candidates("AI is a technology. Machine learning is a subset of AI."),
            vec![
                "AI".to_string(),
                "Machine learning".to_string(),
                "technology".to_string()
            ]
        );
    }

    #[test]
    fn test_importance_score() {
        let mode = graph();
        let text = "Rust is a key language. Rust is fast.";
        let sentences = segment::sentences(text);
        // Two mentions, one indicator, first position.
        assert_eq!(mode.importance("Rust", text, &sentences), 7);
    }

    #[test]
    fn test_descriptions() {
        let sentences = vec!["Rust is fast".to_string(), "x".repeat(120)];
        assert_eq!(describe("Rust", &sentences), "Rust is fast");
        assert_eq!(describe("Go", &sentences), "Concept: Go");
    }

    #[test]
    fn test_complexity_thresholds() {
        assert_eq!(complexity(5, 4), Complexity::Low);
        assert_eq!(complexity(6, 4), Complexity::Medium);
        assert_eq!(complexity(20, 5), Complexity::High);
    }

    #[test]
    fn test_graph_edges_reference_nodes() {
        let mode = graph();
        let result = mode.process(
            "AI is a technology. Machine learning is a subset of AI.",
            &Preferences::new(),
        );
        assert!(!result.is_error());

        let nodes = result.content["graph_data"]["nodes"].as_array().unwrap();
        let labels: Vec<&str> = nodes.iter().map(|n| n["label"].as_str().unwrap()).collect();
        assert!(labels.contains(&"AI"));
        assert!(labels.contains(&"Machine learning"));

        let edges = result.content["graph_data"]["edges"].as_array().unwrap();
        assert!(!edges.is_empty());
        let ids: Vec<&str> = nodes.iter().map(|n| n["id"].as_str().unwrap()).collect();
        for edge in edges {
            assert!(ids.contains(&edge["from"].as_str().unwrap()));
            assert!(ids.contains(&edge["to"].as_str().unwrap()));
            assert_ne!(edge["from"], edge["to"]);
        }
        assert_eq!(edges[0]["title"], json!("is_a: is a"));
        assert_eq!(edges[0]["arrows"]["to"]["scaleFactor"], json!(0.8));
    }

    #[test]
    fn test_node_count_ignores_larger_caps() {
        let mode = graph();
        let text = [
            "Alpha", "Bravo", "Charlie", "Delta", "Echo", "Foxtrot", "Golf", "Hotel", "India",
            "Juliet", "Kilo", "Lima", "Mike", "November", "Oscar", "Papa", "Quebec", "Romeo",
            "Sierra", "Tango", "Uniform", "Victor", "Whiskey", "Xray",
        ]
        .iter()
        .map(|name| format!("{name} Systems builds important platforms."))
        .collect::<Vec<_>>()
        .join(" ");

        let result = mode.process(&text, &Preferences::new().with_max_entities(50));
        assert!(!result.is_error());
        let nodes = result.content["graph_data"]["nodes"].as_array().unwrap();
        assert!(nodes.len() <= 20, "{} nodes", nodes.len());
    }

    #[test]
    fn test_entity_cap() {
        let mode = graph();
        let text = "Alice met Bob in Paris. Carol joined Dave and Erin in Berlin.";
        let entities = mode.entities(text, 3);
        assert_eq!(entities.len(), 3);
        assert!(entities.windows(2).all(|w| w[0].importance >= w[1].importance));
    }
}
