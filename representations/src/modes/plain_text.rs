//! Plain text with light HTML formatting.

use regex_lite::Regex;
use serde::Serialize;
use serde_json::json;

use prism_extraction::segment;

use crate::error::Result;
use crate::mode::{ModeCategory, ModeId, ModeInfo, Representation};
use crate::preferences::Preferences;
use crate::result::{Complexity, RepresentationResult};

const TECH_TERM_PATTERN: &str = r"(?i)\b(artificial intelligence|machine learning|deep learning|neural networks?|algorithms?|blockchain|quantum computing|cloud computing|big data|internet of things|cybersecurity)\b";

#[derive(Serialize)]
struct PlainTextContent<'a> {
    text: &'a str,
    formatted: String,
    paragraphs: Vec<String>,
    word_count: usize,
    read_time: String,
}

#[derive(Serialize)]
struct PlainTextMetadata {
    word_count: usize,
    estimated_read_time: String,
    paragraph_count: usize,
    complexity: Complexity,
    #[serde(skip_serializing_if = "Option::is_none")]
    persona: Option<String>,
}

/// Simple, clean text.
pub struct PlainText {
    info: ModeInfo,
    bold: Regex,
    italic: Regex,
    tech_terms: Regex,
}

impl PlainText {
    pub fn new() -> Result<Self> {
        Ok(Self {
            info: ModeInfo::new(
                ModeId::PlainText,
                "Plain Text",
                "Simple, clean text format",
                "📝",
                ModeCategory::Basic,
            ),
            bold: Regex::new(r"\*([^*\n]+)\*")?,
            italic: Regex::new(r"\b_([^_\n]+)_\b")?,
            tech_terms: Regex::new(TECH_TERM_PATTERN)?,
        })
    }

    /// Render `content` as HTML paragraphs with emphasis and term highlights.
    pub fn format_html(&self, content: &str) -> String {
        let html: String = segment::paragraphs(content)
            .iter()
            .map(|paragraph| {
                let lines: Vec<String> = paragraph.lines().map(escape_html).collect();
                format!("<p>{}</p>", lines.join("<br>"))
            })
            .collect();

        let html = self.bold.replace_all(&html, "<strong>$1</strong>");
        let html = self.italic.replace_all(&html, "<em>$1</em>");
        self.tech_terms
            .replace_all(&html, r#"<span class="tech-term">$1</span>"#)
            .into_owned()
    }
}

/// Escape the characters that would otherwise be read as markup.
pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

impl Representation for PlainText {
    fn info(&self) -> &ModeInfo {
        &self.info
    }

    fn render(&self, content: &str, preferences: &Preferences) -> Result<RepresentationResult> {
        let paragraphs = segment::paragraphs(content);
        let word_count = segment::word_count(content);
        let read_time = segment::estimate_read_time(content, segment::DEFAULT_WORDS_PER_MINUTE);

        let metadata = PlainTextMetadata {
            word_count,
            estimated_read_time: read_time.clone(),
            paragraph_count: paragraphs.len(),
            complexity: Complexity::Low,
            persona: preferences.persona.clone(),
        };
        let body = PlainTextContent {
            text: content,
            formatted: self.format_html(content),
            paragraphs,
            word_count,
            read_time,
        };

        Ok(RepresentationResult::from_parts(self.id(), &body, &metadata)?
            .with_style_hints(&["plain-text", "readable"])
            .with_ui_config(json!({
                "enable_copy": true,
                "enable_print": true,
                "font_family": "Inter, sans-serif",
            })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_html() {
        let mode = PlainText::new().unwrap();
        let html = mode
            .format_html("A *bold* claim about machine learning.\nNext line.\n\nSecond _one_ & more.");
        assert_eq!(
            html,
            "<p>A <strong>bold</strong> claim about <span class=\"tech-term\">machine learning</span>.<br>Next line.</p><p>Second <em>one</em> &amp; more.</p>"
        );
    }

    #[test]
    fn test_snake_case_is_not_italicized() {
        let mode = PlainText::new().unwrap();
        assert_eq!(mode.format_html("call my_long_name now"), "<p>call my_long_name now</p>");
    }

    #[test]
    fn test_render_counts_and_persona() {
        let mode = PlainText::new().unwrap();
        let result = mode.process(
            "First paragraph here.\n\nSecond paragraph here.",
            &Preferences::new().with_persona("student"),
        );

        assert!(!result.is_error());
        assert_eq!(result.metadata["word_count"], json!(6));
        assert_eq!(result.metadata["paragraph_count"], json!(2));
        assert_eq!(result.metadata["estimated_read_time"], json!("1 min"));
        assert_eq!(result.metadata["complexity"], json!("low"));
        assert_eq!(result.metadata["persona"], json!("student"));
        assert_eq!(result.content["paragraphs"][1], json!("Second paragraph here."));
    }

    #[test]
    fn test_short_content_is_an_error() {
        let mode = PlainText::new().unwrap();
        let result = mode.process("short", &Preferences::new());
        assert!(result.is_error());
        assert_eq!(result.mode, ModeId::PlainText);
    }
}
