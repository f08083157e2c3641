//! Key points, main topics and a TL;DR.

use std::sync::Arc;

use regex_lite::Regex;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use prism_extraction::{Toolkit, lexicon, segment};

use crate::error::Result;
use crate::mode::{ModeCategory, ModeId, ModeInfo, Representation};
use crate::preferences::Preferences;
use crate::result::RepresentationResult;

const MAX_QUOTES: usize = 3;
const TLDR_FALLBACK_WORDS: usize = 20;

const IMPORTANCE_INDICATORS: &[&str] = &[
    "important", "key", "main", "primary", "essential", "critical", "significant", "major",
    "crucial", "fundamental", "core", "in summary", "to conclude", "overall", "therefore", "thus",
    "as a result", "consequently", "in conclusion",
];

const ATTRIBUTION_PHRASES: &[&str] = &[
    "according to", "research shows", "studies indicate", "experts say", "it is proven",
    "evidence suggests", "data reveals", "findings show",
];

const STATISTIC_PATTERN: &str = r"\d+(?:\.\d+)?%|\d+(?:,\d{3})*(?:\.\d+)?";
const DEFINITION_PATTERN: &str = r"(?i).+\s+(?:is|are|means|refers to|defined as)\s+.+";

/// How much the summary managed to capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryQuality {
    Low,
    Medium,
    High,
}

impl SummaryQuality {
    fn assess(key_points: usize, topics: usize) -> Self {
        if key_points >= 4 && topics >= 3 {
            Self::High
        } else if key_points >= 2 && topics >= 2 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[derive(Serialize)]
struct Metrics {
    original_words: usize,
    summary_words: usize,
    compression_ratio: f64,
    key_points_count: usize,
}

#[derive(Serialize)]
struct SummaryContent<'a> {
    tldr: String,
    key_points: Vec<String>,
    main_topics: Vec<String>,
    important_quotes: Vec<String>,
    full_content: &'a str,
    metrics: Metrics,
}

#[derive(Serialize)]
struct SummaryMetadata {
    compression_ratio: f64,
    key_point_count: usize,
    main_topics_count: usize,
    summary_quality: SummaryQuality,
}

/// Concise key points and an executive summary.
pub struct Summary {
    info: ModeInfo,
    toolkit: Arc<Toolkit>,
    statistic: Regex,
    definition: Regex,
}

impl Summary {
    pub fn new(toolkit: Arc<Toolkit>) -> Result<Self> {
        Ok(Self {
            info: ModeInfo::new(
                ModeId::Summary,
                "Summary",
                "Concise key points and executive summary",
                "📦",
                ModeCategory::Basic,
            ),
            toolkit,
            statistic: Regex::new(STATISTIC_PATTERN)?,
            definition: Regex::new(DEFINITION_PATTERN)?,
        })
    }

    /// Collect key points in discovery order, without duplicates.
    pub fn key_points(&self, content: &str, max_points: usize) -> Vec<String> {
        let sentences = segment::sentences(content);
        let mut points: Vec<String> = Vec::new();

        for paragraph in segment::paragraphs(content).iter().take(max_points) {
            if let Some(first) = segment::sentences(paragraph).first()
                && first.chars().count() > 20
            {
                push_unique(&mut points, first);
            }
        }

        for sentence in &sentences {
            if sentence.chars().count() > 30
                && lexicon::contains_any_word(sentence, IMPORTANCE_INDICATORS)
            {
                push_unique(&mut points, sentence);
            }
        }

        for sentence in &sentences {
            if sentence.chars().count() > 25 && self.statistic.is_match(sentence) {
                push_unique(&mut points, sentence);
            }
        }

        for sentence in &sentences {
            if sentence.chars().count() > 30 && self.definition.is_match(sentence) {
                push_unique(&mut points, sentence);
            }
        }

        points.truncate(max_points);
        points
    }

    /// Rank key phrases and capitalized terms by frequency.
    ///
    /// Ties keep first-seen order. A candidate overlapping an already chosen
    /// topic (either containing it or contained in it) is skipped.
    pub fn main_topics(&self, content: &str, max_topics: usize) -> Vec<String> {
        let mut frequency: Vec<(String, usize)> = Vec::new();
        let terms = self
            .toolkit
            .phrases
            .extract(content)
            .into_iter()
            .chain(self.toolkit.phrases.capitalized_terms(content));

        for term in terms {
            let term = term.trim();
            if term.chars().count() <= 3 {
                continue;
            }
            match frequency.iter_mut().find(|(t, _)| t == term) {
                Some((_, count)) => *count += 1,
                None => frequency.push((term.to_string(), 1)),
            }
        }
        frequency.sort_by(|a, b| b.1.cmp(&a.1));

        let mut topics: Vec<String> = Vec::new();
        for (term, _) in frequency {
            if topics.len() >= max_topics {
                break;
            }
            let lower = term.to_lowercase();
            let overlaps = topics.iter().any(|existing| {
                let existing = existing.to_lowercase();
                existing.contains(&lower) || lower.contains(&existing)
            });
            if !overlaps {
                topics.push(term);
            }
        }
        topics
    }

    fn important_quotes(&self, sentences: &[String]) -> Vec<String> {
        let mut quotes: Vec<String> = sentences
            .iter()
            .filter(|s| s.contains('"') || s.contains('\''))
            .take(MAX_QUOTES)
            .cloned()
            .collect();

        let attributed = sentences
            .iter()
            .filter(|s| lexicon::contains_any_word(s, ATTRIBUTION_PHRASES));
        let statistical = sentences.iter().filter(|s| self.statistic.is_match(s));

        for sentence in attributed.chain(statistical) {
            if quotes.len() >= MAX_QUOTES {
                break;
            }
            if !quotes.contains(sentence) {
                quotes.push(sentence.clone());
            }
        }
        quotes
    }
}

fn push_unique(points: &mut Vec<String>, sentence: &str) {
    if !points.iter().any(|p| p == sentence) {
        points.push(sentence.to_string());
    }
}

/// Pick the TL;DR line.
///
/// The key point with the most words wins (first one on ties), prefixed with
/// the main topic when it does not mention it.
fn tldr(content: &str, key_points: &[String], main_topic: Option<&str>) -> String {
    let best = key_points.iter().fold(None::<&String>, |best, point| match best {
        Some(b) if segment::word_count(b) >= segment::word_count(point) => Some(b),
        _ => Some(point),
    });

    if let Some(best) = best {
        return match main_topic {
            Some(topic) if !best.to_lowercase().contains(&topic.to_lowercase()) => {
                format!("About {topic}: {best}")
            }
            _ => best.clone(),
        };
    }

    if let Some(sentence) = segment::sentences(content)
        .into_iter()
        .find(|s| s.chars().count() > 50)
    {
        return sentence;
    }

    let words: Vec<&str> = content.split_whitespace().collect();
    if words.len() > TLDR_FALLBACK_WORDS {
        format!("{}...", words[..TLDR_FALLBACK_WORDS].join(" "))
    } else {
        words.join(" ")
    }
}

fn compression_ratio(summary_words: usize, original_words: usize) -> f64 {
    if original_words == 0 {
        return 0.0;
    }
    let ratio = (summary_words as f64 / original_words as f64).clamp(0.01, 1.0);
    (ratio * 100.0).round() / 100.0
}

impl Representation for Summary {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn render(&self, content: &str, preferences: &Preferences) -> Result<RepresentationResult> {
        let key_points = self.key_points(content, preferences.max_key_points());
        let main_topics = self.main_topics(content, preferences.max_topics());
        let tldr = tldr(content, &key_points, main_topics.first().map(String::as_str));
        let important_quotes = self.important_quotes(&segment::sentences(content));

        let original_words = segment::word_count(content);
        let summary_words =
            segment::word_count(&key_points.join(" ")) + segment::word_count(&tldr);
        let ratio = compression_ratio(summary_words, original_words);
        debug!(
            "Summarized {original_words} words into {} key points",
            key_points.len()
        );

        let metadata = SummaryMetadata {
            compression_ratio: ratio,
            key_point_count: key_points.len(),
            main_topics_count: main_topics.len(),
            summary_quality: SummaryQuality::assess(key_points.len(), main_topics.len()),
        };
        let body = SummaryContent {
            metrics: Metrics {
                original_words,
                summary_words,
                compression_ratio: ratio,
                key_points_count: key_points.len(),
            },
            tldr,
            key_points,
            main_topics,
            important_quotes,
            full_content: content,
        };

        Ok(RepresentationResult::from_parts(self.id(), &body, &metadata)?
            .with_style_hints(&["summary", "condensed", "key-points"])
            .with_ui_config(json!({
                "enable_expand": true,
                "show_metrics": true,
                "highlight_key_points": true,
            })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn summary() -> Summary {
        Summary::new(Arc::new(Toolkit::new().unwrap())).unwrap()
    }

    const CONTENT: &str = "Rust is a systems programming language focused on safety.\n\n\
        The borrow checker is essential for memory safety in Rust programs.";

    #[test]
    fn test_key_points_and_topics() {
        let mode = summary();
        assert_eq!(
            mode.key_points(CONTENT, 6),
            vec![
                "Rust is a systems programming language focused on safety".to_string(),
                "The borrow checker is essential for memory safety in Rust programs".to_string(),
            ]
        );
        assert_eq!(
            mode.main_topics(CONTENT, 5),
            vec!["Rust".to_string(), "The borrow checker".to_string()]
        );
    }

    #[test]
    fn test_topics_skip_overlapping_terms() {
        let mode = summary();
        let topics = mode.main_topics(
            "Deep Learning needs data. Deep Learning scales. Learning is fun.",
            5,
        );
        assert_eq!(topics, vec!["Deep Learning".to_string()]);
    }

    #[test]
    fn test_tldr_choices() {
        let points = vec![
            "Short point here".to_string(),
            "A much longer point without the subject".to_string(),
        ];
        assert_eq!(
            tldr("", &points, Some("Rust")),
            "About Rust: A much longer point without the subject"
        );
        assert_eq!(
            tldr("", &points, Some("longer point")),
            "A much longer point without the subject"
        );
        assert_eq!(tldr("just a few words", &[], None), "just a few words");

        let long = (1..=25).map(|i| format!("w{i}.")).collect::<Vec<_>>().join(" ");
        let short = tldr(&long, &[], None);
        assert!(short.ends_with("w20...."));
        assert!(!short.contains("w21"));
    }

    #[test]
    fn test_quotes_prefer_quoted_then_attributed() {
        let mode = summary();
        let sentences = segment::sentences(
            "He said \"ship it\". According to the team, it worked. Costs fell 12%. Nothing else.",
        );
        assert_eq!(
            mode.important_quotes(&sentences),
            vec![
                "He said \"ship it\"".to_string(),
                "According to the team, it worked".to_string(),
                "Costs fell 12%".to_string(),
            ]
        );
    }

    #[test]
    fn test_render_metrics() {
        let mode = summary();
        let result = mode.process(CONTENT, &Preferences::new());

        assert!(!result.is_error());
        assert_eq!(
            result.content["tldr"],
            json!("The borrow checker is essential for memory safety in Rust programs")
        );
        assert_eq!(result.metadata["compression_ratio"], json!(1.0));
        assert_eq!(result.metadata["summary_quality"], json!("medium"));
        assert_eq!(result.metadata["key_point_count"], json!(2));
    }

    #[test]
    fn test_compression_ratio_bounds() {
        assert_eq!(compression_ratio(1, 1000), 0.01);
        assert_eq!(compression_ratio(50, 200), 0.25);
        assert_eq!(compression_ratio(300, 200), 1.0);
    }
}
