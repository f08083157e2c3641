//! Game-style learning: content is split into segments, each locked behind
//! a small challenge.
//!
//! Challenge selection is random. The generator is seeded from
//! [`Preferences::seed`] when given, so a fixed seed reproduces the same
//! puzzle.

use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use regex_lite::Regex;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::debug;

use prism_extraction::phrases::CAPITALIZED_PHRASE_PATTERN;
use prism_extraction::segment;

use crate::error::{RepresentationError, Result};
use crate::mode::{ModeCategory, ModeId, ModeInfo, Representation};
use crate::modes::plain_text::escape_html;
use crate::preferences::Preferences;
use crate::result::{Complexity, RepresentationResult};

/// Minimum trimmed content length for puzzles.
pub const MIN_PUZZLE_CONTENT_LEN: usize = 100;

const MAX_SEGMENTS: usize = 8;
const MAX_PARAGRAPHS: usize = 6;
const LONG_PARAGRAPH_LEN: usize = 500;
const MIN_SENTENCE_LEN: usize = 20;
const SENTENCES_PER_SEGMENT: usize = 3;
const MAX_DISTRACTORS: usize = 3;
const MAX_KEY_PHRASES: usize = 5;
const MAX_CONTEXT_LEN: usize = 50;
const MINUTES_PER_SEGMENT: usize = 2;

const DISTRACTORS: &[&str] = &[
    "Machine learning algorithm",
    "Quantum computing",
    "Artificial intelligence",
    "Data visualization",
    "Neural network",
    "Blockchain technology",
];

const FALLBACK_TOPICS: &[&str] = &[
    "Technology and innovation",
    "Historical events",
    "Scientific research",
    "Business strategy",
];

const FALLBACK_ANSWERS: &[&str] = &["information", "knowledge", "data", "content"];
const ERROR_ANSWERS: &[&str] = &["anything", "something", "knowledge"];

const TERM_PUNCTUATION: &[char] = &['.', ',', '!', '?', ';', ':'];

/// A challenge guarding one segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Challenge {
    MultipleChoice {
        question: String,
        options: Vec<String>,
        /// Index into `options`.
        correct_answer: usize,
        hint: String,
        difficulty: u8,
    },
    TextInput {
        question: String,
        /// Accepted answers.
        correct_answer: Vec<String>,
        hint: String,
        difficulty: u8,
    },
}

impl Challenge {
    pub fn difficulty(&self) -> u8 {
        match self {
            Self::MultipleChoice { difficulty, .. } | Self::TextInput { difficulty, .. } => {
                *difficulty
            }
        }
    }

    fn text_input(question: &str, answers: &[&str], hint: &str, difficulty: u8) -> Self {
        Self::TextInput {
            question: question.to_string(),
            correct_answer: answers.iter().map(|a| (*a).to_string()).collect(),
            hint: hint.to_string(),
            difficulty,
        }
    }
}

/// One locked piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PuzzleSegment {
    pub id: String,
    /// HTML-formatted segment text.
    pub content: String,
    pub challenge: Challenge,
    pub unlocked: bool,
    pub revealed: bool,
}

#[derive(Serialize)]
struct CompletionStats {
    unlocked_count: usize,
    revealed_count: usize,
    solved_count: usize,
}

impl CompletionStats {
    fn initial() -> Self {
        Self {
            unlocked_count: 1,
            revealed_count: 0,
            solved_count: 0,
        }
    }
}

#[derive(Serialize)]
struct Instructions {
    solve: &'static str,
    reveal: &'static str,
    retry: &'static str,
}

#[derive(Serialize)]
struct PuzzleContent {
    segments: Vec<PuzzleSegment>,
    total_segments: usize,
    completion_stats: CompletionStats,
    instructions: Instructions,
}

#[derive(Serialize)]
struct PuzzleMetadata {
    total_segments: usize,
    avg_difficulty: f64,
    complexity: Complexity,
    interaction_type: &'static str,
    estimated_time_minutes: usize,
}

/// Unlock information by solving mini challenges.
pub struct PuzzleBased {
    info: ModeInfo,
    numbers: Regex,
    capitalized: Regex,
    suffixed_words: Regex,
}

impl PuzzleBased {
    pub fn new() -> Result<Self> {
        Ok(Self {
            info: ModeInfo::new(
                ModeId::PuzzleBased,
                "Puzzle Mode",
                "Unlock information by solving mini challenges - game-based learning",
                "🧩",
                ModeCategory::Interactive,
            ),
            numbers: Regex::new(r"\b\d+\b")?,
            capitalized: Regex::new(CAPITALIZED_PHRASE_PATTERN)?,
            suffixed_words: Regex::new(r"\b[a-z]+(?:ing|tion|sion|ment|ness)\b")?,
        })
    }

    /// Split content into at most eight segments.
    ///
    /// With three or more paragraphs, the first six paragraphs are used and
    /// long ones are halved at a sentence boundary. Otherwise sentences are
    /// regrouped in threes.
    pub fn segments(&self, content: &str) -> Vec<String> {
        let paragraphs = segment::paragraphs(content);

        if paragraphs.len() < 3 {
            let sentences: Vec<String> = segment::sentences(content)
                .into_iter()
                .filter(|s| s.chars().count() > MIN_SENTENCE_LEN)
                .collect();
            return sentences
                .chunks(SENTENCES_PER_SEGMENT)
                .map(|chunk| format!("{}.", chunk.join(". ")))
                .take(MAX_SEGMENTS)
                .collect();
        }

        let mut segments = Vec::new();
        for paragraph in paragraphs.into_iter().take(MAX_PARAGRAPHS) {
            match split_long_paragraph(&paragraph) {
                Some((head, tail)) => {
                    segments.push(head.to_string());
                    segments.push(tail.to_string());
                }
                None => segments.push(paragraph),
            }
        }
        segments.truncate(MAX_SEGMENTS);
        segments
    }

    /// Pick a challenge kind at random and build it.
    pub fn challenge<R: Rng + ?Sized>(&self, segment: &str, rng: &mut R) -> Challenge {
        if rng.random_bool(0.5) {
            self.multiple_choice(segment, rng)
        } else {
            self.text_input(segment, rng)
        }
    }

    fn multiple_choice<R: Rng + ?Sized>(&self, segment: &str, rng: &mut R) -> Challenge {
        let terms: Vec<&str> = segment
            .split_whitespace()
            .filter(|w| w.chars().count() > 6 || w.starts_with(char::is_uppercase))
            .map(|w| w.trim_matches(TERM_PUNCTUATION))
            .filter(|w| !w.is_empty())
            .collect();

        let Some(correct) = terms[..terms.len().min(3)].choose(rng) else {
            return Challenge::MultipleChoice {
                question: "What is the main topic of this section?".to_string(),
                options: FALLBACK_TOPICS.iter().map(|t| (*t).to_string()).collect(),
                correct_answer: 0,
                hint: "Consider the overall theme of the content".to_string(),
                difficulty: 1,
            };
        };

        let lower = segment.to_lowercase();
        let candidates: Vec<&str> = DISTRACTORS
            .iter()
            .copied()
            .filter(|d| !lower.contains(&d.to_lowercase()))
            .collect();

        let mut options: Vec<String> = candidates
            .choose_multiple(rng, MAX_DISTRACTORS)
            .map(|d| (*d).to_string())
            .collect();
        options.push((*correct).to_string());
        options.shuffle(rng);
        let correct_answer = options.iter().position(|o| o == correct).unwrap_or(0);

        Challenge::MultipleChoice {
            question: "Which of the following is mentioned in this section?".to_string(),
            options,
            correct_answer,
            hint: "Look for key terms mentioned in the text".to_string(),
            difficulty: 2,
        }
    }

    fn text_input<R: Rng + ?Sized>(&self, segment: &str, rng: &mut R) -> Challenge {
        let numbers: Vec<&str> = self.numbers.find_iter(segment).map(|m| m.as_str()).collect();
        if let Some(number) = numbers.choose(rng) {
            return Challenge::TextInput {
                question: format!(
                    "What number is mentioned in the context of: {}?",
                    number_context(segment, number)
                ),
                correct_answer: vec![(*number).to_string()],
                hint: "Look for numerical values in the text".to_string(),
                difficulty: 2,
            };
        }

        let phrases = self.key_phrases(segment);
        if let Some(phrase) = phrases[..phrases.len().min(2)].choose(rng) {
            let simplified = phrase.trim_matches(TERM_PUNCTUATION).to_lowercase();
            let mut accepted = vec![simplified.clone()];
            if phrase.as_str() != simplified {
                accepted.push(phrase.clone());
            }
            let initial = simplified.chars().next().unwrap_or('?');
            return Challenge::TextInput {
                question: "Fill in the blank: One important concept mentioned is ______"
                    .to_string(),
                correct_answer: accepted,
                hint: format!("It's a key term that starts with '{initial}'"),
                difficulty: 3,
            };
        }

        Challenge::text_input(
            "What is one key word that summarizes this section?",
            FALLBACK_ANSWERS,
            "Think about what this section is trying to convey",
            1,
        )
    }

    /// Capitalized phrases, then words with nominal suffixes.
    fn key_phrases(&self, segment: &str) -> Vec<String> {
        let mut phrases: Vec<String> = Vec::new();
        let matches = self
            .capitalized
            .find_iter(segment)
            .chain(self.suffixed_words.find_iter(segment))
            .map(|m| m.as_str());

        for phrase in matches {
            let len = phrase.chars().count();
            if len > 3 && len < 30 && !phrases.iter().any(|p| p == phrase) {
                phrases.push(phrase.to_string());
            }
        }
        phrases.truncate(MAX_KEY_PHRASES);
        phrases
    }
}

/// Split a paragraph over the length limit at the first ". " past its middle.
fn split_long_paragraph(paragraph: &str) -> Option<(&str, &str)> {
    if paragraph.chars().count() <= LONG_PARAGRAPH_LEN {
        return None;
    }
    let mid = paragraph
        .char_indices()
        .map(|(i, _)| i)
        .find(|&i| i >= paragraph.len() / 2)?;
    let split = mid + paragraph[mid..].find(". ")?;
    Some((&paragraph[..=split], &paragraph[split + 2..]))
}

/// Up to three words either side of the first mention of `number`.
fn number_context(segment: &str, number: &str) -> String {
    for sentence in segment::sentences(segment) {
        let words: Vec<&str> = sentence.split_whitespace().collect();
        if let Some(i) = words.iter().position(|w| w.contains(number)) {
            let start = i.saturating_sub(3);
            let end = (i + 4).min(words.len());
            let context: String = words[start..end]
                .join(" ")
                .chars()
                .take(MAX_CONTEXT_LEN)
                .collect();
            return format!("{}...", context.trim());
        }
    }
    "numerical information".to_string()
}

/// Escape the segment and bold long capitalized words.
fn format_segment(segment: &str) -> String {
    escape_html(segment)
        .replace('\n', "<br>")
        .split_whitespace()
        .map(|word| {
            let clean = word.trim_matches(TERM_PUNCTUATION);
            if clean.chars().count() > 8 && clean.starts_with(char::is_uppercase) {
                format!("<strong>{word}</strong>")
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn complexity(segment_count: usize) -> Complexity {
    if segment_count > 8 {
        Complexity::High
    } else if segment_count > 4 {
        Complexity::Medium
    } else {
        Complexity::Low
    }
}

impl Representation for PuzzleBased {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn min_content_len(&self) -> usize {
        MIN_PUZZLE_CONTENT_LEN
    }

    fn render(&self, content: &str, preferences: &Preferences) -> Result<RepresentationResult> {
        let chunks = self.segments(content);
        if chunks.is_empty() {
            return Err(RepresentationError::NoExtractableData(
                "No segments could be built from the content".to_string(),
            ));
        }

        let mut rng = match preferences.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let segments: Vec<PuzzleSegment> = chunks
            .iter()
            .enumerate()
            .map(|(i, chunk)| PuzzleSegment {
                id: format!("segment_{i}"),
                content: format_segment(chunk),
                challenge: self.challenge(chunk, &mut rng),
                unlocked: i == 0,
                revealed: false,
            })
            .collect();

        let total = segments.len();
        let difficulty_sum: u32 = segments
            .iter()
            .map(|s| u32::from(s.challenge.difficulty()))
            .sum();
        let avg_difficulty = (f64::from(difficulty_sum) / total as f64 * 100.0).round() / 100.0;
        debug!("Built {total} puzzle segments");

        let metadata = PuzzleMetadata {
            total_segments: total,
            avg_difficulty,
            complexity: complexity(total),
            interaction_type: "puzzle_based",
            estimated_time_minutes: total * MINUTES_PER_SEGMENT,
        };
        let body = PuzzleContent {
            segments,
            total_segments: total,
            completion_stats: CompletionStats::initial(),
            instructions: Instructions {
                solve: "Answer the challenge correctly to unlock the content",
                reveal: "Click the reveal button to skip the challenge",
                retry: "Try again if your answer is incorrect",
            },
        };

        Ok(RepresentationResult::from_parts(self.id(), &body, &metadata)?
            .with_style_hints(&["puzzle-based", "interactive", "game-learning"])
            .with_ui_script("initializePuzzleMode")
            .with_ui_config(json!({
                "container_id": "puzzle-based-container",
                "enable_reveal": true,
                "enable_retry": true,
                "auto_progress": false,
            })))
    }

    /// Error results still carry one unlocked segment so the client can
    /// render something playable.
    fn error_result(&self, error: &RepresentationError) -> RepresentationResult {
        let message = error.to_string();
        let segment = PuzzleSegment {
            id: "error_segment".to_string(),
            content: format!("<p class='text-red-600'>{}</p>", escape_html(&message)),
            challenge: Challenge::text_input(
                "What would you like to learn about?",
                ERROR_ANSWERS,
                "Try asking a different question",
                1,
            ),
            unlocked: true,
            revealed: false,
        };

        let mut extra = serde_json::Map::new();
        extra.insert("segments".to_string(), json!([segment]));
        extra.insert("total_segments".to_string(), json!(1));
        extra.insert(
            "completion_stats".to_string(),
            json!(CompletionStats::initial()),
        );

        let mut result = RepresentationResult::error(self.id(), error, extra)
            .with_style_hints(&["puzzle-based", "error"]);
        result.insert_metadata("total_segments", 1);
        result.insert_metadata("avg_difficulty", 1);
        result.insert_metadata("complexity", Value::from("low"));
        result.insert_metadata("interaction_type", Value::from("puzzle_based"));
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const THREE_PARAGRAPHS: &str = "The Golden Gate Bridge opened in 1937 after four years of construction.\n\n\
        Engineers used suspension cables spun from thousands of steel wires.\n\n\
        Today the bridge carries roughly 112000 vehicles every single day.";

    #[test]
    fn test_paragraph_segments() {
        let mode = PuzzleBased::new().unwrap();
        assert_eq!(mode.segments(THREE_PARAGRAPHS).len(), 3);
    }

    #[test]
    fn test_sentence_triples_when_few_paragraphs() {
        let mode = PuzzleBased::new().unwrap();
        let content = "The first sentence is long enough. The second sentence is long enough. \
            The third sentence is long enough. The fourth sentence is long enough. Tiny.";
        let segments = mode.segments(content);
        assert_eq!(segments.len(), 2);
        assert_eq!(
            segments[1],
            "The fourth sentence is long enough."
        );
    }

    #[test]
    fn test_long_paragraphs_are_halved() {
        let sentence = "This sentence pads the paragraph well past its limit. ";
        let paragraph = sentence.repeat(12);
        let (head, tail) = split_long_paragraph(paragraph.trim()).unwrap();
        assert!(head.ends_with('.'));
        assert!(!tail.starts_with(' '));
        assert!(head.len() >= paragraph.trim().len() / 2);
        assert!(split_long_paragraph("Short. Paragraph.").is_none());
    }

    #[test]
    fn test_multiple_choice_points_at_a_mentioned_term() {
        let mode = PuzzleBased::new().unwrap();
        let segment = "Neural network research accelerated when Researchers gained cheap compute.";
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let Challenge::MultipleChoice {
                options,
                correct_answer,
                difficulty,
                ..
            } = mode.multiple_choice(segment, &mut rng)
            else {
                panic!("expected a multiple choice challenge");
            };
            assert_eq!(difficulty, 2);
            assert_eq!(options.len(), 4);
            assert!(segment.contains(&options[correct_answer]));
            assert!(!options.contains(&"Neural network".to_string()));
        }
    }

    #[test]
    fn test_numeric_text_input() {
        let mode = PuzzleBased::new().unwrap();
        let mut rng = StdRng::seed_from_u64(7);
        let challenge = mode.text_input("The bridge opened in 1937 after four years", &mut rng);
        assert_eq!(
            challenge,
            Challenge::TextInput {
                question: "What number is mentioned in the context of: bridge opened in 1937 after four years...?".to_string(),
                correct_answer: vec!["1937".to_string()],
                hint: "Look for numerical values in the text".to_string(),
                difficulty: 2,
            }
        );
    }

    #[test]
    fn test_key_phrase_text_input() {
        let mode = PuzzleBased::new().unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let Challenge::TextInput {
            correct_answer,
            difficulty,
            hint,
            ..
        } = mode.text_input("Careful planning keeps the whole team moving.", &mut rng)
        else {
            panic!("expected a text input challenge");
        };
        assert_eq!(difficulty, 3);
        assert!(correct_answer[0].chars().all(|c| !c.is_uppercase()));
        assert!(hint.starts_with("It's a key term that starts with"));
    }

    #[test]
    fn test_format_segment_bolds_long_capitalized_words() {
        assert_eq!(
            format_segment("Visit Barcelona, then rest.\nThen <go>."),
            "Visit <strong>Barcelona,</strong> then rest.<br>Then &lt;go&gt;."
        );
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        let mode = PuzzleBased::new().unwrap();
        let prefs = Preferences::new().with_seed(42);
        let first = mode.process(THREE_PARAGRAPHS, &prefs);
        let second = mode.process(THREE_PARAGRAPHS, &prefs);

        assert!(!first.is_error());
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());

        let segments = first.content["segments"].as_array().unwrap();
        assert_eq!(segments[0]["unlocked"], json!(true));
        assert!(segments[1..].iter().all(|s| s["unlocked"] == json!(false)));
        assert_eq!(first.metadata["estimated_time_minutes"], json!(6));
    }

    #[test]
    fn test_short_content_keeps_a_playable_segment() {
        let mode = PuzzleBased::new().unwrap();
        let result = mode.process("Far too short for a puzzle.", &Preferences::new());

        assert!(result.is_error());
        assert_eq!(result.content["segments"][0]["unlocked"], json!(true));
        assert_eq!(result.content["segments"][0]["challenge"]["type"], json!("text_input"));
        assert_eq!(result.metadata["interaction_type"], json!("puzzle_based"));
    }
}
