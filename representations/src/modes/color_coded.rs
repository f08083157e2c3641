//! Color-tagged sentence categories with a legend.
//!
//! Each sentence lands in exactly one category. Keyword hits are checked in
//! strict priority (warnings, examples, assumptions, facts); sentences with
//! no hit fall through to structural rules.

use regex_lite::Regex;
use serde::Serialize;
use serde_json::json;

use prism_extraction::lexicon;
use prism_extraction::segment::{self, Sentence};

use crate::error::Result;
use crate::mode::{ModeCategory, ModeId, ModeInfo, Representation};
use crate::preferences::Preferences;
use crate::result::{Complexity, RepresentationResult};

const WARNING_KEYWORDS: &[&str] = &[
    "warning", "danger", "risk", "caution", "avoid", "harmful", "unsafe", "threat",
    "vulnerability", "security", "breach", "attack", "malicious", "beware", "careful",
    "critical", "urgent", "important to note", "however", "but", "limitation", "drawback",
    "disadvantage", "problem", "issue", "concern", "challenge", "difficulty",
];

const EXAMPLE_KEYWORDS: &[&str] = &[
    "example", "instance", "such as", "like", "for example", "for instance", "e.g.", "namely",
    "including", "consider", "suppose", "imagine", "case study", "demonstration",
    "illustration", "sample",
];

const ASSUMPTION_KEYWORDS: &[&str] = &[
    "assume", "assuming", "likely", "probably", "might", "could", "may", "perhaps", "possibly",
    "potentially", "presumably", "supposedly", "theoretically", "hypothetically", "arguably",
    "seemingly", "appears", "suggests", "implies", "indicates", "seems", "tends to", "often",
    "usually", "typically", "generally", "commonly", "frequently",
];

const FACT_KEYWORDS: &[&str] = &[
    "fact", "data", "research", "study", "evidence", "proof", "demonstrated", "shown", "proven",
    "established", "confirmed", "verified", "validated", "measured", "observed", "recorded",
    "documented", "published", "according to", "based on", "statistics", "findings", "results",
    "conclusion", "analysis", "survey", "experiment", "test",
];

const IMPERATIVE_STARTERS: &[&str] =
    &["do not", "avoid", "make sure", "ensure", "remember", "be careful"];

/// One of the four sentence categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceCategory {
    Facts,
    Assumptions,
    Examples,
    Warnings,
}

impl SentenceCategory {
    /// Declaration order, which also breaks ties for the dominant category.
    pub const ALL: [SentenceCategory; 4] =
        [Self::Facts, Self::Assumptions, Self::Examples, Self::Warnings];
}

#[derive(Debug, Default, Serialize)]
struct Sections {
    facts: Vec<String>,
    assumptions: Vec<String>,
    examples: Vec<String>,
    warnings: Vec<String>,
}

impl Sections {
    fn bucket(&self, category: SentenceCategory) -> &Vec<String> {
        match category {
            SentenceCategory::Facts => &self.facts,
            SentenceCategory::Assumptions => &self.assumptions,
            SentenceCategory::Examples => &self.examples,
            SentenceCategory::Warnings => &self.warnings,
        }
    }

    fn bucket_mut(&mut self, category: SentenceCategory) -> &mut Vec<String> {
        match category {
            SentenceCategory::Facts => &mut self.facts,
            SentenceCategory::Assumptions => &mut self.assumptions,
            SentenceCategory::Examples => &mut self.examples,
            SentenceCategory::Warnings => &mut self.warnings,
        }
    }

    fn total(&self) -> usize {
        SentenceCategory::ALL
            .iter()
            .map(|c| self.bucket(*c).len())
            .sum()
    }

    fn dominant(&self) -> SentenceCategory {
        let mut best = SentenceCategory::Facts;
        for category in SentenceCategory::ALL {
            if self.bucket(category).len() > self.bucket(best).len() {
                best = category;
            }
        }
        best
    }
}

#[derive(Serialize)]
struct LegendEntry {
    color: &'static str,
    bg_color: &'static str,
    border_color: &'static str,
    text_color: &'static str,
    label: &'static str,
    icon: &'static str,
    description: &'static str,
}

#[derive(Serialize)]
struct Legend {
    facts: LegendEntry,
    assumptions: LegendEntry,
    examples: LegendEntry,
    warnings: LegendEntry,
}

fn legend() -> Legend {
    Legend {
        facts: LegendEntry {
            color: "blue",
            bg_color: "bg-blue-50",
            border_color: "border-blue-400",
            text_color: "text-blue-800",
            label: "Key Facts & Data",
            icon: "📊",
            description: "Verified information, research findings, and established facts",
        },
        assumptions: LegendEntry {
            color: "yellow",
            bg_color: "bg-yellow-50",
            border_color: "border-yellow-400",
            text_color: "text-yellow-800",
            label: "Assumptions & Hypotheses",
            icon: "❓",
            description: "Uncertain elements, assumptions, and hypothetical scenarios",
        },
        examples: LegendEntry {
            color: "green",
            bg_color: "bg-green-50",
            border_color: "border-green-400",
            text_color: "text-green-800",
            label: "Examples & Illustrations",
            icon: "💡",
            description: "Concrete examples, case studies, and practical instances",
        },
        warnings: LegendEntry {
            color: "red",
            bg_color: "bg-red-50",
            border_color: "border-red-400",
            text_color: "text-red-800",
            label: "Warnings & Risks",
            icon: "⚠️",
            description: "Important warnings, risks, limitations, and concerns",
        },
    }
}

#[derive(Serialize)]
struct Statistics {
    total_sections: usize,
    facts_count: usize,
    assumptions_count: usize,
    examples_count: usize,
    warnings_count: usize,
}

#[derive(Serialize)]
struct ColorCodedContent {
    sections: Sections,
    legend: Legend,
    statistics: Statistics,
}

#[derive(Serialize)]
struct ColorCodedMetadata {
    sections_count: usize,
    dominant_type: SentenceCategory,
    complexity: Complexity,
}

/// Sentences sorted into facts, assumptions, examples and warnings.
pub struct ColorCoded {
    info: ModeInfo,
    numeric: Regex,
    fact_opener: Regex,
    conditional_opener: Regex,
}

impl ColorCoded {
    pub fn new() -> Result<Self> {
        Ok(Self {
            info: ModeInfo::new(
                ModeId::ColorCoded,
                "Color Coded",
                "Color-tagged sections with legend (facts, assumptions, examples, warnings)",
                "🎨",
                ModeCategory::Visual,
            ),
            numeric: Regex::new(r"\d")?,
            fact_opener: Regex::new(r"(?i)^(?:it is|this is|that is|there are|there is)\b")?,
            conditional_opener: Regex::new(r"(?i)^(?:if|when|while|although|unless)\b")?,
        })
    }

    /// Categorize one sentence.
    pub fn classify(&self, sentence: &Sentence) -> SentenceCategory {
        let text = sentence.text.as_str();

        if lexicon::contains_any_word(text, WARNING_KEYWORDS) {
            return SentenceCategory::Warnings;
        }
        if lexicon::contains_any_word(text, EXAMPLE_KEYWORDS) {
            return SentenceCategory::Examples;
        }
        if lexicon::contains_any_word(text, ASSUMPTION_KEYWORDS) {
            return SentenceCategory::Assumptions;
        }
        if lexicon::contains_any_word(text, FACT_KEYWORDS) {
            return SentenceCategory::Facts;
        }

        self.classify_by_structure(sentence)
    }

    fn classify_by_structure(&self, sentence: &Sentence) -> SentenceCategory {
        let text = sentence.text.as_str();
        let lower = text.to_lowercase();

        if sentence.is_question() {
            return SentenceCategory::Assumptions;
        }
        if self.numeric.is_match(text) {
            return SentenceCategory::Facts;
        }
        if self.fact_opener.is_match(text) {
            return SentenceCategory::Facts;
        }
        if self.conditional_opener.is_match(text) {
            return SentenceCategory::Assumptions;
        }
        if lexicon::contains_word(&lower, "if")
            && (lexicon::contains_word(&lower, "then") || lexicon::contains_word(&lower, "would"))
        {
            return SentenceCategory::Assumptions;
        }
        if IMPERATIVE_STARTERS
            .iter()
            .any(|starter| lexicon::first_occurrence(&lower, starter) == Some(0))
        {
            return SentenceCategory::Warnings;
        }

        SentenceCategory::Facts
    }
}

fn display_text(sentence: &Sentence) -> String {
    match sentence.terminator {
        Some(terminator) => format!("{}{terminator}", sentence.text),
        None => sentence.text.clone(),
    }
}

impl Representation for ColorCoded {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn render(&self, content: &str, _preferences: &Preferences) -> Result<RepresentationResult> {
        let mut sections = Sections::default();
        for sentence in segment::split_sentences(content) {
            let category = self.classify(&sentence);
            sections.bucket_mut(category).push(display_text(&sentence));
        }

        let total = sections.total();
        let statistics = Statistics {
            total_sections: total,
            facts_count: sections.facts.len(),
            assumptions_count: sections.assumptions.len(),
            examples_count: sections.examples.len(),
            warnings_count: sections.warnings.len(),
        };
        let metadata = ColorCodedMetadata {
            sections_count: total,
            dominant_type: sections.dominant(),
            complexity: if total > 10 {
                Complexity::Medium
            } else {
                Complexity::Low
            },
        };
        let body = ColorCodedContent {
            sections,
            legend: legend(),
            statistics,
        };

        Ok(RepresentationResult::from_parts(self.id(), &body, &metadata)?
            .with_style_hints(&["color-coded", "with-legend", "categorized"])
            .with_ui_config(json!({
                "enable_section_toggle": true,
                "enable_category_filter": true,
                "animation_enabled": true,
            })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn classify(text: &str) -> SentenceCategory {
        let mode = ColorCoded::new().unwrap();
        let sentence = segment::split_sentences(text).remove(0);
        mode.classify(&sentence)
    }

    #[test]
    fn test_keyword_priority() {
        // Warning beats the example keyword in the same sentence.
        assert_eq!(classify("For example, this is a serious risk."), SentenceCategory::Warnings);
        assert_eq!(classify("Consider a simple cache."), SentenceCategory::Examples);
        assert_eq!(classify("It will probably rain."), SentenceCategory::Assumptions);
        assert_eq!(classify("Research confirms the effect."), SentenceCategory::Facts);
    }

    #[test]
    fn test_whole_word_matching() {
        // "attribute" contains "but" and "likely" contains "like".
        assert_eq!(classify("Each attribute is stored."), SentenceCategory::Facts);
        assert_eq!(classify("Rust is likely fast."), SentenceCategory::Assumptions);
    }

    #[test]
    fn test_structural_fallback() {
        assert_eq!(classify("Does the cache help?"), SentenceCategory::Assumptions);
        assert_eq!(classify("Latency dropped to 40 ms."), SentenceCategory::Facts);
        assert_eq!(classify("When the queue fills, writers block."), SentenceCategory::Assumptions);
        assert_eq!(classify("Ensure the lock is held."), SentenceCategory::Warnings);
        assert_eq!(classify("Queues hold messages."), SentenceCategory::Facts);
    }

    #[test]
    fn test_every_sentence_lands_in_one_bucket() {
        let mode = ColorCoded::new().unwrap();
        let content = "Research shows caching helps. For example, a CDN caches pages. \
                       It might fail under load. However, there is a risk of staleness. \
                       Does it scale?";
        let result = mode.process(content, &Preferences::new());

        assert!(!result.is_error());
        let stats = &result.content["statistics"];
        assert_eq!(stats["total_sections"], json!(5));
        let sum: u64 = ["facts_count", "assumptions_count", "examples_count", "warnings_count"]
            .iter()
            .map(|k| stats[*k].as_u64().unwrap())
            .sum();
        assert_eq!(sum, 5);
        assert_eq!(result.content["sections"]["assumptions"][1], json!("Does it scale?"));
        assert_eq!(result.metadata["dominant_type"], json!("assumptions"));
    }

    #[test]
    fn test_dominant_ties_prefer_facts() {
        let mode = ColorCoded::new().unwrap();
        let result = mode.process("Research shows gains. Avoid global locks.", &Preferences::new());
        assert_eq!(result.metadata["dominant_type"], json!("facts"));
    }
}
