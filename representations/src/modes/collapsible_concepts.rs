//! Two-level expandable concept trees.
//!
//! Every paragraph becomes a level-1 concept titled from its first sentence.
//! Later sentences that read like list items or enumerations become level-2
//! children. Trees never go deeper than two levels.

use std::collections::BTreeSet;

use regex_lite::Regex;
use serde::Serialize;
use serde_json::json;

use prism_extraction::{lexicon, segment};

use crate::error::Result;
use crate::mode::{ModeCategory, ModeId, ModeInfo, Representation};
use crate::preferences::Preferences;
use crate::result::{Complexity, RepresentationResult};

const MAX_CHILDREN: usize = 5;
const MIN_CHILD_SENTENCE_LEN: usize = 20;
const MAX_CHILD_TITLE_LEN: usize = 50;
const MAX_KEYWORDS: usize = 5;

const TECHNOLOGY_KEYWORDS: &[&str] = &[
    "technology", "software", "hardware", "algorithm", "system", "computer", "digital",
    "internet", "network", "database", "programming", "code",
];
const PROCESS_KEYWORDS: &[&str] = &[
    "process", "method", "procedure", "approach", "technique", "strategy", "workflow", "steps",
    "stages",
];
const DEFINITION_KEYWORDS: &[&str] = &[
    "definition", "meaning", "refers to", "defined as", "means", "is the", "concept of",
];
const EXAMPLE_KEYWORDS: &[&str] = &[
    "example", "instance", "case", "illustration", "demonstration", "for example",
];
const BENEFIT_KEYWORDS: &[&str] = &[
    "benefit", "advantage", "positive", "improvement", "enhancement", "value", "gain",
];
const CHALLENGE_KEYWORDS: &[&str] = &[
    "challenge", "problem", "issue", "difficulty", "limitation", "drawback", "disadvantage",
];

const CHILD_INDICATORS: &[&str] = &[
    "first", "second", "third", "finally", "additionally", "furthermore", "also", "moreover",
    "in addition", "another", "specifically", "for example", "such as", "including", "like",
    "particularly",
];

/// Kind of concept node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptType {
    Technology,
    Process,
    Definition,
    Example,
    Benefit,
    Challenge,
    General,
    Step,
    Feature,
    Requirement,
    Detail,
}

impl ConceptType {
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Technology => "💻",
            Self::Process => "⚙️",
            Self::Definition => "📖",
            Self::Example => "💡",
            Self::Benefit => "✅",
            Self::Challenge => "⚠️",
            Self::Step | Self::Requirement => "📋",
            Self::Feature => "🔧",
            Self::Detail => "🔍",
            Self::General => "📝",
        }
    }

    fn of_paragraph(paragraph: &str) -> Self {
        if lexicon::mentions_any(paragraph, TECHNOLOGY_KEYWORDS) {
            Self::Technology
        } else if lexicon::mentions_any(paragraph, PROCESS_KEYWORDS) {
            Self::Process
        } else if lexicon::contains_any_word(paragraph, DEFINITION_KEYWORDS) {
            Self::Definition
        } else if lexicon::mentions_any(paragraph, EXAMPLE_KEYWORDS) {
            Self::Example
        } else if lexicon::mentions_any(paragraph, BENEFIT_KEYWORDS) {
            Self::Benefit
        } else if lexicon::mentions_any(paragraph, CHALLENGE_KEYWORDS) {
            Self::Challenge
        } else {
            Self::General
        }
    }

    fn of_child(sentence: &str) -> Self {
        if lexicon::mentions_any(sentence, &["step", "stage", "phase"]) {
            Self::Step
        } else if lexicon::mentions_any(sentence, &["feature", "characteristic", "property"]) {
            Self::Feature
        } else if lexicon::mentions_any(sentence, &["example", "instance", "case"]) {
            Self::Example
        } else if lexicon::mentions_any(sentence, &["benefit", "advantage"]) {
            Self::Benefit
        } else if lexicon::mentions_any(sentence, &["requirement", "need", "prerequisite"]) {
            Self::Requirement
        } else {
            Self::Detail
        }
    }
}

/// A node in the concept tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConceptNode {
    pub id: String,
    pub title: String,
    pub content: String,
    pub level: u8,
    pub icon: String,
    #[serde(rename = "type")]
    pub concept_type: ConceptType,
    pub expanded: bool,
    pub children: Vec<ConceptNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_concepts: Option<Vec<String>>,
}

#[derive(Serialize)]
struct HierarchyStats {
    total_concepts: usize,
    max_depth: usize,
    root_concepts: usize,
}

#[derive(Serialize)]
struct ConceptsContent {
    concepts: Vec<ConceptNode>,
    hierarchy_stats: HierarchyStats,
}

#[derive(Serialize)]
struct ConceptsMetadata {
    total_concepts: usize,
    max_depth: usize,
    complexity: Complexity,
    interaction_type: &'static str,
}

/// Nested, expandable concept trees.
pub struct CollapsibleConcepts {
    info: ModeInfo,
    leading_filler: Regex,
    subject: Regex,
    trailing_punctuation: Regex,
    list_marker: Regex,
    keyword: Regex,
}

impl CollapsibleConcepts {
    pub fn new() -> Result<Self> {
        Ok(Self {
            info: ModeInfo::new(
                ModeId::CollapsibleConcepts,
                "Collapsible Concepts",
                "Nested, expandable concept trees for hierarchical learning",
                "🧩",
                ModeCategory::Interactive,
            ),
            leading_filler: Regex::new(
                r"(?i)^(?:the|a|an|this|that|these|those|in|on|at|for|with|by)\s+",
            )?,
            subject: Regex::new(
                r"(?i)^([^,.]{1,50}?)\s+(?:is|are|was|were|can|will|should|could|would|has|have|represents?|means?)\b",
            )?,
            trailing_punctuation: Regex::new(r"[,.;:!?]+$")?,
            list_marker: Regex::new(r"^\s*(?:\d+[.)]|[-*•])\s*")?,
            keyword: Regex::new(r"\b[a-z]{3,}\b")?,
        })
    }

    /// Build the concept tree for `content`.
    pub fn build_tree(&self, content: &str) -> Vec<ConceptNode> {
        let mut concepts: Vec<ConceptNode> = segment::paragraphs(content)
            .iter()
            .enumerate()
            .map(|(i, paragraph)| self.paragraph_concept(i, paragraph))
            .collect();
        self.link_related(&mut concepts);
        concepts
    }

    fn paragraph_concept(&self, index: usize, paragraph: &str) -> ConceptNode {
        let sentences = segment::sentences(paragraph);
        let id = format!("concept_{index}");
        let title = sentences
            .first()
            .map_or_else(|| "Unknown Concept".to_string(), |s| self.title_from(s));
        let concept_type = ConceptType::of_paragraph(paragraph);

        let children = sentences
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, s)| s.chars().count() >= MIN_CHILD_SENTENCE_LEN && self.is_child(s))
            .take(MAX_CHILDREN)
            .map(|(j, sentence)| {
                let child_type = ConceptType::of_child(sentence);
                ConceptNode {
                    id: format!("{id}_sub_{j}"),
                    title: self.child_title(sentence),
                    content: sentence.clone(),
                    level: 2,
                    icon: child_type.icon().to_string(),
                    concept_type: child_type,
                    expanded: false,
                    children: Vec::new(),
                    related_concepts: None,
                }
            })
            .collect();

        ConceptNode {
            title,
            content: paragraph.to_string(),
            level: 1,
            icon: concept_type.icon().to_string(),
            concept_type,
            expanded: index == 0,
            children,
            related_concepts: Some(Vec::new()),
            id,
        }
    }

    /// Derive a short title from a sentence.
    pub fn title_from(&self, sentence: &str) -> String {
        let sentence = self.leading_filler.replace(sentence.trim(), "");

        if let Some(subject) = self.subject.captures(&sentence).and_then(|c| c.get(1)) {
            let subject = subject.as_str().trim();
            let len = subject.chars().count();
            if len > 10 && len < 60 {
                return self.clean_title(subject);
            }
        }

        let words: Vec<&str> = sentence.split_whitespace().collect();
        if words.len() > 1 {
            let count = (words.len() / 3).clamp(3, 8);
            return self.clean_title(&words[..count.min(words.len())].join(" "));
        }

        let head: String = sentence.chars().take(50).collect();
        self.clean_title(&head)
    }

    fn clean_title(&self, title: &str) -> String {
        let title = self.trailing_punctuation.replace(title.trim(), "");
        let mut chars = title.chars();
        match chars.next() {
            Some(first) => format!("{}{}", first.to_uppercase(), chars.as_str())
                .trim()
                .to_string(),
            None => String::new(),
        }
    }

    fn is_child(&self, sentence: &str) -> bool {
        segment::starts_with_list_marker(sentence)
            || lexicon::contains_any_word(sentence, CHILD_INDICATORS)
    }

    fn child_title(&self, sentence: &str) -> String {
        let stripped = self.list_marker.replace(sentence, "");
        let title = self.title_from(&stripped);
        if title.chars().count() > MAX_CHILD_TITLE_LEN {
            let head: String = title.chars().take(MAX_CHILD_TITLE_LEN - 3).collect();
            format!("{head}...")
        } else {
            title
        }
    }

    fn keywords(&self, concept: &ConceptNode) -> BTreeSet<String> {
        let text = format!("{} {}", concept.title, concept.content).to_lowercase();
        let all: BTreeSet<String> = self
            .keyword
            .find_iter(&text)
            .map(|m| m.as_str().to_string())
            .filter(|w| !lexicon::is_stop_word(w))
            .collect();
        all.into_iter().take(MAX_KEYWORDS).collect()
    }

    fn link_related(&self, concepts: &mut [ConceptNode]) {
        let keywords: Vec<BTreeSet<String>> = concepts.iter().map(|c| self.keywords(c)).collect();
        let ids: Vec<String> = concepts.iter().map(|c| c.id.clone()).collect();

        for (i, concept) in concepts.iter_mut().enumerate() {
            let related = (0..ids.len())
                .filter(|&j| j != i && !keywords[i].is_disjoint(&keywords[j]))
                .map(|j| ids[j].clone())
                .collect();
            concept.related_concepts = Some(related);
        }
    }
}

fn complexity(total: usize, depth: usize) -> Complexity {
    if total > 15 || depth > 2 {
        Complexity::High
    } else if total > 8 || depth > 1 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

impl Representation for CollapsibleConcepts {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn render(&self, content: &str, _preferences: &Preferences) -> Result<RepresentationResult> {
        let concepts = self.build_tree(content);

        let total = concepts.len() + concepts.iter().map(|c| c.children.len()).sum::<usize>();
        let max_depth = if concepts.iter().any(|c| !c.children.is_empty()) {
            2
        } else {
            1
        };

        let metadata = ConceptsMetadata {
            total_concepts: total,
            max_depth,
            complexity: complexity(total, max_depth),
            interaction_type: "expandable",
        };
        let body = ConceptsContent {
            hierarchy_stats: HierarchyStats {
                total_concepts: total,
                max_depth,
                root_concepts: concepts.len(),
            },
            concepts,
        };

        Ok(RepresentationResult::from_parts(self.id(), &body, &metadata)?
            .with_style_hints(&["collapsible-concepts", "hierarchical", "interactive"])
            .with_ui_script("initializeCollapsibleConcepts")
            .with_ui_config(json!({
                "container_id": "collapsible-concepts",
                "auto_expand_first": true,
                "enable_search": true,
                "animation_duration": 300,
            })))
    }
}
