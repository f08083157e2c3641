//! Entity extraction from text using pattern matching.
//!
//! Extracts named concepts from capitalized spans and classifies them with
//! layered keyword dictionaries. The dictionaries are checked in a fixed
//! priority order: technology, science, organization, person, location,
//! process, then the `concept` fallback.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::lexicon;
use crate::phrases::CAPITALIZED_PHRASE_PATTERN;
use crate::segment;

/// An extracted entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Positional identifier, unique within one extraction.
    pub id: String,

    /// The entity name as it appears in the text.
    pub name: String,

    /// Type of entity.
    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Domain refinement of the type, e.g. `ai` for `technology_ai`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,

    /// Importance score; higher is more central to the text.
    pub importance: u32,

    /// Short description, usually the first sentence mentioning the entity.
    pub description: String,

    /// Display color for the entity's group.
    pub color: String,

    /// Display size in `[10, 30]`.
    pub size: u32,
}

impl Entity {
    /// Create a new entity from a classification.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        classification: Classification,
        importance: u32,
    ) -> Self {
        let name = name.into();
        let color = classification.color().to_string();
        Self {
            id: id.into(),
            description: format!("Entity: {name}"),
            name,
            entity_type: classification.entity_type,
            subtype: classification.subtype.map(str::to_string),
            importance,
            color,
            size: size_for_importance(importance),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// The display group, `type` or `type_subtype`.
    pub fn group(&self) -> String {
        match &self.subtype {
            Some(subtype) => format!("{}_{subtype}", self.entity_type.as_str()),
            None => self.entity_type.as_str().to_string(),
        }
    }
}

/// Map an importance score onto a display size in `[10, 30]`.
pub fn size_for_importance(importance: u32) -> u32 {
    importance.saturating_mul(5).clamp(10, 30)
}

/// Type of entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// A technology, tool, or technical field.
    Technology,
    /// A scientific object or discipline.
    Science,
    /// A company or other organization.
    Organization,
    /// A person.
    Person,
    /// A place.
    Location,
    /// A process, method, or technique.
    Process,
    /// Anything else.
    Concept,
}

impl EntityType {
    /// Get a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Technology => "technology",
            Self::Science => "science",
            Self::Organization => "organization",
            Self::Person => "person",
            Self::Location => "location",
            Self::Process => "process",
            Self::Concept => "concept",
        }
    }
}

/// Result of classifying a candidate name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// Broad type.
    pub entity_type: EntityType,
    /// Optional domain refinement.
    pub subtype: Option<&'static str>,
}

impl Classification {
    fn plain(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            subtype: None,
        }
    }

    /// Fixed color for the classification's group.
    pub fn color(&self) -> &'static str {
        match (self.entity_type, self.subtype) {
            (EntityType::Technology, Some("ai")) => "#3B82F6",
            (EntityType::Technology, Some("computing")) => "#6366F1",
            (EntityType::Technology, Some("software")) => "#8B5CF6",
            (EntityType::Technology, Some("data")) => "#06B6D4",
            (EntityType::Technology, Some("web")) => "#10B981",
            (EntityType::Technology, Some("mobile")) => "#F59E0B",
            (EntityType::Technology, _) => "#2563EB",
            (EntityType::Science, Some("physics")) => "#EF4444",
            (EntityType::Science, Some("biology")) => "#84CC16",
            (EntityType::Science, Some("chemistry")) => "#F97316",
            (EntityType::Science, Some("mathematics")) => "#EC4899",
            (EntityType::Science, _) => "#B91C1C",
            (EntityType::Organization, _) => "#6B7280",
            (EntityType::Person, _) => "#DC2626",
            (EntityType::Location, _) => "#059669",
            (EntityType::Process, _) => "#7C3AED",
            (EntityType::Concept, _) => "#4B5563",
        }
    }
}

/// Technology domains, checked in order against the entity name.
const TECHNOLOGY_DOMAINS: &[(&str, &[&str])] = &[
    (
        "ai",
        &["ai", "ml", "artificial", "intelligence", "machine", "learning", "neural", "deep"],
    ),
    (
        "computing",
        &["computer", "computing", "cpu", "gpu", "quantum", "cloud", "server", "hardware"],
    ),
    (
        "software",
        &["application", "program", "software", "framework", "library", "api", "algorithm"],
    ),
    ("data", &["database", "data", "analytics", "dataset", "sql", "json", "xml"]),
    (
        "web",
        &["website", "web", "internet", "html", "css", "javascript", "http", "blockchain", "digital"],
    ),
    ("mobile", &["mobile", "app", "android", "ios", "smartphone", "5g"]),
];

/// Science domains, checked in order against the entity name.
const SCIENCE_DOMAINS: &[(&str, &[&str])] = &[
    (
        "physics",
        &["atom", "electron", "photon", "particle", "energy", "physics", "relativity", "gravity"],
    ),
    (
        "biology",
        &["cell", "dna", "protein", "gene", "organism", "species", "biology", "evolution"],
    ),
    (
        "chemistry",
        &["molecule", "compound", "reaction", "element", "chemical", "chemistry"],
    ),
    (
        "mathematics",
        &["equation", "formula", "calculation", "theorem", "mathematics", "geometry"],
    ),
];

const ORGANIZATION_KEYWORDS: &[&str] = &[
    "company",
    "corporation",
    "business",
    "organization",
    "enterprise",
    "industry",
    "market",
    "firm",
    "inc",
    "university",
    "institute",
    "agency",
];

const PERSON_INDICATORS: &[&str] = &[
    "founder",
    "ceo",
    "scientist",
    "researcher",
    "inventor",
    "physicist",
    "chemist",
    "biologist",
    "mathematician",
    "engineer",
    "professor",
    "author",
    "president",
    "he",
    "she",
    "his",
    "her",
    "dr",
    "mr",
    "mrs",
    "ms",
];

const LOCATION_KEYWORDS: &[&str] = &[
    "city", "country", "state", "region", "area", "location", "river", "mountain", "island",
    "ocean", "valley", "continent",
];

const LOCATION_INDICATORS: &[&str] = &["located", "capital", "city of", "country of", "region of"];

const PROCESS_KEYWORDS: &[&str] = &[
    "process",
    "method",
    "technique",
    "approach",
    "procedure",
    "strategy",
    "methodology",
    "workflow",
];

/// Classify a candidate name using the layered dictionaries.
///
/// `context` holds the sentences that mention the candidate; it is only
/// consulted for the person and location layers.
pub fn classify(name: &str, context: &str) -> Classification {
    for (domain, keywords) in TECHNOLOGY_DOMAINS {
        if lexicon::mentions_any(name, keywords) {
            return Classification {
                entity_type: EntityType::Technology,
                subtype: Some(domain),
            };
        }
    }

    for (domain, keywords) in SCIENCE_DOMAINS {
        if lexicon::mentions_any(name, keywords) {
            return Classification {
                entity_type: EntityType::Science,
                subtype: Some(domain),
            };
        }
    }

    if lexicon::mentions_any(name, ORGANIZATION_KEYWORDS) {
        return Classification::plain(EntityType::Organization);
    }

    if looks_like_name(name) && lexicon::contains_any_word(context, PERSON_INDICATORS) {
        return Classification::plain(EntityType::Person);
    }

    if lexicon::mentions_any(name, LOCATION_KEYWORDS)
        || (looks_like_name(name) && lexicon::contains_any_word(context, LOCATION_INDICATORS))
    {
        return Classification::plain(EntityType::Location);
    }

    if lexicon::mentions_any(name, PROCESS_KEYWORDS) {
        return Classification::plain(EntityType::Process);
    }

    Classification::plain(EntityType::Concept)
}

/// Capitalized, and not an all-caps abbreviation.
fn looks_like_name(name: &str) -> bool {
    let starts_upper = name.chars().next().is_some_and(char::is_uppercase);
    let has_lower = name.chars().any(char::is_lowercase);
    starts_upper && has_lower
}

/// Join every sentence that mentions `name`, used as classification context.
pub fn mention_context(sentences: &[String], name: &str) -> String {
    sentences
        .iter()
        .filter(|s| lexicon::contains_word(s, name))
        .cloned()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Strip leading capitalized function words ("The Internet" → "Internet").
pub fn strip_function_words(span: &str) -> &str {
    let mut rest = span.trim();
    loop {
        let Some((first, tail)) = rest.split_once(char::is_whitespace) else {
            return if lexicon::is_function_word(rest) { "" } else { rest };
        };
        if lexicon::is_function_word(first) {
            rest = tail.trim_start();
        } else {
            return rest;
        }
    }
}

/// Drop candidates that only ever occur inside a longer candidate.
///
/// "Machine" is absorbed by "Machine learning" when every occurrence of
/// the former is part of the latter.
pub fn absorb_nested(candidates: Vec<String>, text: &str) -> Vec<String> {
    let counts: Vec<usize> = candidates
        .iter()
        .map(|c| lexicon::count_occurrences(text, c))
        .collect();

    candidates
        .iter()
        .enumerate()
        .filter(|(i, candidate)| {
            !candidates.iter().enumerate().any(|(j, longer)| {
                *i != j
                    && longer.len() > candidate.len()
                    && lexicon::contains_word(longer, candidate)
                    && counts[*i] <= counts[j]
            })
        })
        .map(|(_, candidate)| candidate.clone())
        .collect()
}

/// Configuration for entity extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityExtractorConfig {
    /// Names shorter than this are discarded.
    pub min_name_len: usize,

    /// Maximum number of entities returned.
    pub max_entities: usize,
}

impl Default for EntityExtractorConfig {
    fn default() -> Self {
        Self {
            min_name_len: 3,
            max_entities: 50,
        }
    }
}

/// Entity extractor using capitalized spans and keyword dictionaries.
pub struct EntityExtractor {
    config: EntityExtractorConfig,
    capitalized: Regex,
}

impl EntityExtractor {
    /// Create a new entity extractor with default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(EntityExtractorConfig::default())
    }

    /// Create an extractor with custom configuration.
    pub fn with_config(config: EntityExtractorConfig) -> Result<Self> {
        Ok(Self {
            config,
            capitalized: Regex::new(CAPITALIZED_PHRASE_PATTERN)?,
        })
    }

    /// Candidate names in first-seen order, function words stripped.
    pub fn candidates(&self, text: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for m in self.capitalized.find_iter(text) {
            let name = strip_function_words(m.as_str());
            if name.chars().count() < self.config.min_name_len {
                continue;
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Extract entities; importance is the raw occurrence count.
    pub fn extract(&self, text: &str) -> Vec<Entity> {
        let sentences = segment::sentences(text);
        let names = absorb_nested(self.candidates(text), text);

        let entities: Vec<Entity> = names
            .into_iter()
            .take(self.config.max_entities)
            .enumerate()
            .map(|(i, name)| {
                let context = mention_context(&sentences, &name);
                let classification = classify(&name, &context);
                let importance = lexicon::count_occurrences(text, &name) as u32;
                Entity::new(format!("entity_{i}"), name, classification, importance)
            })
            .collect();

        debug!("Extracted {} entities", entities.len());
        entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_counts_occurrences() {
        let extractor = EntityExtractor::new().unwrap();
        let entities =
            extractor.extract("Python is popular. Many teams use Python for data work.");

        let python = entities.iter().find(|e| e.name == "Python").unwrap();
        assert_eq!(python.importance, 2);
        assert_eq!(python.id, "entity_0");
        // "Many" is a function word and never becomes a candidate.
        assert!(!entities.iter().any(|e| e.name == "Many"));
    }

    #[test]
    fn test_classification_priority() {
        assert_eq!(
            classify("Machine Learning", ""),
            Classification {
                entity_type: EntityType::Technology,
                subtype: Some("ai")
            }
        );
        assert_eq!(classify("Protein Folding", "").entity_type, EntityType::Science);
        assert_eq!(classify("Acme Corporation", "").entity_type, EntityType::Organization);
        assert_eq!(
            classify("Marie Curie", "Marie Curie was a physicist").entity_type,
            EntityType::Person
        );
        assert_eq!(classify("Nile River", "").entity_type, EntityType::Location);
        assert_eq!(classify("Agile Method", "").entity_type, EntityType::Process);
        assert_eq!(classify("Freedom", "").entity_type, EntityType::Concept);
    }

    #[test]
    fn test_strip_function_words() {
        assert_eq!(strip_function_words("The Internet"), "Internet");
        assert_eq!(strip_function_words("In"), "");
        assert_eq!(strip_function_words("Albert Einstein"), "Albert Einstein");
    }

    #[test]
    fn test_absorb_nested_candidates() {
        let text = "Machine learning is useful. Machine learning is everywhere.";
        let kept = absorb_nested(
            vec!["Machine".to_string(), "Machine learning".to_string()],
            text,
        );
        assert_eq!(kept, vec!["Machine learning".to_string()]);
    }

    #[test]
    fn test_group_and_size() {
        let entity = Entity::new(
            "entity_0",
            "AI",
            classify("AI", ""),
            9,
        );
        assert_eq!(entity.group(), "technology_ai");
        assert_eq!(entity.size, 30);
        assert_eq!(size_for_importance(1), 10);
    }
}
