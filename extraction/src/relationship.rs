//! Relationship extraction between entities.
//!
//! An ordered table of relation patterns is applied to each sentence. Both
//! captured spans are resolved to known entities; matches where either side
//! is unknown, or both sides are the same entity, are discarded.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Entity;
use crate::error::Result;
use crate::lexicon;
use crate::segment;
use crate::similarity;

/// A directed relationship between two entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Positional identifier.
    pub id: String,

    /// Source entity ID.
    pub source_id: String,

    /// Source entity name (for display).
    pub source_name: String,

    /// Target entity ID.
    pub target_id: String,

    /// Target entity name (for display).
    pub target_name: String,

    /// Type of relationship.
    pub relation_type: RelationType,

    /// Strength, at least 1.
    pub strength: u32,

    /// Display color for the relation type.
    pub color: String,

    /// Display width in `[1, 4]`.
    pub width: u32,
}

impl Relationship {
    /// Get a string representation of this relationship.
    pub fn to_string_repr(&self) -> String {
        format!(
            "{} --[{}]--> {}",
            self.source_name,
            self.relation_type.as_str(),
            self.target_name
        )
    }
}

/// Type of relationship between entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationType {
    /// A is a kind of B.
    IsA,
    /// A has or contains B.
    Has,
    /// A uses B.
    Uses,
    /// A creates or produces B.
    Creates,
    /// A enables B.
    Enables,
    /// A requires B.
    Requires,
    /// A implements B.
    Implements,
    /// A extends B.
    Extends,
    /// A interacts with B.
    InteractsWith,
    /// A processes or manages B.
    Processes,
    /// A stores B.
    Stores,
    /// A connects to B.
    ConnectsTo,
    /// A is mentioned together with B.
    RelatedTo,
    /// A is an alternative to B.
    AlternativeTo,
}

impl RelationType {
    /// Get a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IsA => "is_a",
            Self::Has => "has",
            Self::Uses => "uses",
            Self::Creates => "creates",
            Self::Enables => "enables",
            Self::Requires => "requires",
            Self::Implements => "implements",
            Self::Extends => "extends",
            Self::InteractsWith => "interacts_with",
            Self::Processes => "processes",
            Self::Stores => "stores",
            Self::ConnectsTo => "connects_to",
            Self::RelatedTo => "related_to",
            Self::AlternativeTo => "alternative_to",
        }
    }

    /// Edge label, e.g. "interacts with".
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// Display color.
    pub fn color(&self) -> &'static str {
        match self {
            Self::IsA => "#3B82F6",
            Self::Has => "#10B981",
            Self::Uses => "#F59E0B",
            Self::Creates => "#EF4444",
            Self::Enables => "#8B5CF6",
            Self::Requires => "#EC4899",
            Self::Implements => "#06B6D4",
            Self::Extends => "#84CC16",
            Self::InteractsWith => "#F97316",
            Self::Processes => "#6366F1",
            Self::Stores => "#059669",
            Self::ConnectsTo => "#DC2626",
            Self::RelatedTo => "#6B7280",
            Self::AlternativeTo => "#7C3AED",
        }
    }
}

/// Relation patterns in evaluation order.
const RELATION_PATTERNS: &[(&str, RelationType)] = &[
    (r"(?:is|are)\s+(?:(?:a|an|the)\s+)?", RelationType::IsA),
    (r"(?:has|have|contains?|includes?)\s+", RelationType::Has),
    (r"(?:uses?|utilizes?|employs?)\s+", RelationType::Uses),
    (r"(?:creates?|produces?|generates?|builds?)\s+", RelationType::Creates),
    (r"(?:enables?|allows?|facilitates?)\s+", RelationType::Enables),
    (r"(?:requires?|needs?|depends\s+on)\s+", RelationType::Requires),
    (r"(?:implements?|realizes?)\s+", RelationType::Implements),
    (r"(?:extends?|inherits?\s+from)\s+", RelationType::Extends),
    (r"(?:communicates?\s+with|interacts?\s+with)\s+", RelationType::InteractsWith),
    (r"(?:processes|process|handles?|manages?)\s+", RelationType::Processes),
    (r"(?:stores?|contains?\s+data\s+about)\s+", RelationType::Stores),
    (r"(?:connects?\s+to|links?\s+to)\s+", RelationType::ConnectsTo),
    (r"(?:and|with|plus)\s+", RelationType::RelatedTo),
    (r"(?:or|versus|vs)\s+", RelationType::AlternativeTo),
];

/// Compute edge strength for two matched spans.
///
/// Strength is the number of sentences mentioning both spans plus a
/// proximity bonus of up to 3 for spans whose first occurrences are close.
pub fn relationship_strength(
    source: &str,
    target: &str,
    text: &str,
    sentences: &[String],
) -> u32 {
    let source_lower = source.to_lowercase();
    let target_lower = target.to_lowercase();

    let co_occurrence = sentences
        .iter()
        .map(|s| s.to_lowercase())
        .filter(|s| s.contains(&source_lower) && s.contains(&target_lower))
        .count() as u32;

    let text_lower = text.to_lowercase();
    let proximity = match (text_lower.find(&source_lower), text_lower.find(&target_lower)) {
        (Some(a), Some(b)) => {
            let distance = a.abs_diff(b) as f64;
            (3.0 - distance / 100.0).max(0.0).floor() as u32
        }
        _ => 0,
    };

    (co_occurrence + proximity).max(1)
}

/// Map a strength onto a display width in `[1, 4]`.
pub fn width_for_strength(strength: u32) -> u32 {
    strength.clamp(1, 4)
}

/// Resolve a matched span to an entity.
///
/// Exact (case-insensitive) name match wins, then word-bounded containment
/// in either direction, then a shared non-stop-word token. Within a tier
/// the first entity in list order wins.
pub fn resolve_entity<'a>(entities: &'a [Entity], span: &str) -> Option<&'a Entity> {
    let span = span.trim();
    if span.is_empty() {
        return None;
    }

    entities
        .iter()
        .find(|e| e.name.eq_ignore_ascii_case(span))
        .or_else(|| {
            entities.iter().find(|e| {
                lexicon::contains_word(span, &e.name) || lexicon::contains_word(&e.name, span)
            })
        })
        .or_else(|| {
            entities
                .iter()
                .find(|e| similarity::shares_content_token(span, &e.name))
        })
}

/// Relationship extractor.
pub struct RelationshipExtractor {
    patterns: Vec<(Regex, RelationType)>,
}

impl RelationshipExtractor {
    /// Create a new relationship extractor, compiling the pattern table.
    pub fn new() -> Result<Self> {
        let patterns = RELATION_PATTERNS
            .iter()
            .map(|(verb, relation_type)| {
                let pattern = format!(r"(?i)(\w+(?:\s+\w+)*)\s+{verb}(\w+(?:\s+\w+)*)");
                Regex::new(&pattern).map(|re| (re, *relation_type))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Extract relationships between `entities` mentioned in `text`.
    pub fn extract(&self, entities: &[Entity], text: &str) -> Vec<Relationship> {
        let sentences = segment::sentences(text);
        let mut relationships: Vec<Relationship> = Vec::new();

        for (pattern_index, (regex, relation_type)) in self.patterns.iter().enumerate() {
            for sentence in &sentences {
                for cap in regex.captures_iter(sentence) {
                    let (Some(source_span), Some(target_span)) = (cap.get(1), cap.get(2)) else {
                        continue;
                    };
                    let source_span = source_span.as_str().trim();
                    let target_span = target_span.as_str().trim();

                    let (Some(source), Some(target)) = (
                        resolve_entity(entities, source_span),
                        resolve_entity(entities, target_span),
                    ) else {
                        continue;
                    };
                    if source.id == target.id {
                        continue;
                    }

                    let duplicate = relationships.iter().any(|r| {
                        r.source_id == source.id
                            && r.target_id == target.id
                            && r.relation_type == *relation_type
                    });
                    if duplicate {
                        continue;
                    }

                    let strength =
                        relationship_strength(source_span, target_span, text, &sentences);
                    relationships.push(Relationship {
                        id: format!("edge_{pattern_index}_{}", relationships.len()),
                        source_id: source.id.clone(),
                        source_name: source.name.clone(),
                        target_id: target.id.clone(),
                        target_name: target.name.clone(),
                        relation_type: *relation_type,
                        strength,
                        color: relation_type.color().to_string(),
                        width: width_for_strength(strength),
                    });
                }
            }
        }

        debug!("Extracted {} relationships", relationships.len());
        relationships
    }
}
