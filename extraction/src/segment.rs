//! Paragraph and sentence segmentation.
//!
//! Paragraphs are separated by blank lines. Sentences end at a run of
//! `.`, `!` or `?` that is followed by whitespace or the end of the text, so
//! decimals ("3.14") and dotted abbreviations inside a word stay intact. A
//! line that starts with a list marker always begins a new sentence, and the
//! number of a numbered list item ("1.") never ends one.

use serde::{Deserialize, Serialize};

/// Default reading speed used by [`estimate_read_time`].
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// A sentence together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Trimmed sentence text without its terminator.
    pub text: String,

    /// The punctuation that ended the sentence, if any. When a run mixes
    /// marks, `?` wins over `!`, which wins over `.`.
    pub terminator: Option<char>,

    /// Byte offset of the sentence start in the source text.
    pub offset: usize,
}

impl Sentence {
    /// Whether the sentence was phrased as a question.
    pub fn is_question(&self) -> bool {
        self.terminator == Some('?')
    }
}

/// Split text into trimmed, non-empty paragraphs.
pub fn paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            flush_paragraph(&mut current, &mut paragraphs);
        } else {
            current.push(line);
        }
    }
    flush_paragraph(&mut current, &mut paragraphs);

    paragraphs
}

fn flush_paragraph(current: &mut Vec<&str>, paragraphs: &mut Vec<String>) {
    if current.is_empty() {
        return;
    }
    let paragraph = current.join("\n");
    let trimmed = paragraph.trim();
    if !trimmed.is_empty() {
        paragraphs.push(trimmed.to_string());
    }
    current.clear();
}

/// Split text into trimmed, non-empty sentence strings.
pub fn sentences(text: &str) -> Vec<String> {
    split_sentences(text).into_iter().map(|s| s.text).collect()
}

/// Split text into sentences, keeping terminators and offsets.
pub fn split_sentences(text: &str) -> Vec<Sentence> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < chars.len() {
        let (idx, c) = chars[i];

        if c == '\n' {
            let next_line = &text[idx + 1..];
            if starts_with_list_marker(next_line) {
                push_sentence(text, start, idx, None, &mut sentences);
                start = idx + 1;
            }
            i += 1;
            continue;
        }

        if is_terminal(c) {
            let mut j = i;
            while j + 1 < chars.len() && is_terminal(chars[j + 1].1) {
                j += 1;
            }
            let run_end = chars[j].0 + chars[j].1.len_utf8();
            let at_boundary = j + 1 >= chars.len() || chars[j + 1].1.is_whitespace();

            let fragment = text[start..idx].trim();
            let is_list_number = c == '.'
                && i == j
                && !fragment.is_empty()
                && fragment.len() <= 3
                && fragment.chars().all(|ch| ch.is_ascii_digit());

            if at_boundary && !is_list_number {
                let run = &text[idx..run_end];
                let terminator = if run.contains('?') {
                    '?'
                } else if run.contains('!') {
                    '!'
                } else {
                    '.'
                };
                push_sentence(text, start, idx, Some(terminator), &mut sentences);
                start = run_end;
            }

            i = j + 1;
            continue;
        }

        i += 1;
    }

    push_sentence(text, start, text.len(), None, &mut sentences);
    sentences
}

fn push_sentence(
    text: &str,
    start: usize,
    end: usize,
    terminator: Option<char>,
    sentences: &mut Vec<Sentence>,
) {
    if start >= end {
        return;
    }
    let raw = &text[start..end];
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return;
    }
    let leading = raw.len() - raw.trim_start().len();
    sentences.push(Sentence {
        text: trimmed.to_string(),
        terminator,
        offset: start + leading,
    });
}

fn is_terminal(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

/// Whether a line starts with a bullet (`-`, `*`, `•`) or a number followed
/// by `.` or `)`.
pub fn starts_with_list_marker(line: &str) -> bool {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some('-' | '*' | '•') => chars.next().is_some_and(char::is_whitespace),
        Some(c) if c.is_ascii_digit() => {
            let rest = trimmed.trim_start_matches(|ch: char| ch.is_ascii_digit());
            let mut rest_chars = rest.chars();
            matches!(rest_chars.next(), Some('.' | ')'))
                && rest_chars.next().is_some_and(char::is_whitespace)
        }
        _ => false,
    }
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Estimate reading time as "N min", never less than one minute.
pub fn estimate_read_time(text: &str, words_per_minute: usize) -> String {
    let minutes = (word_count(text) / words_per_minute.max(1)).max(1);
    format!("{minutes} min")
}
