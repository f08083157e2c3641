//! The representation contract.
//!
//! A mode carries immutable [`ModeInfo`] fixed at construction and renders
//! content through [`Representation::render`]. Callers use the provided
//! [`Representation::process`], which validates input and turns every
//! failure into an error result, so no error value reaches the caller.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{RepresentationError, Result};
use crate::preferences::Preferences;
use crate::result::RepresentationResult;

/// Minimum trimmed content length accepted by most modes.
pub const DEFAULT_MIN_CONTENT_LEN: usize = 10;

/// Identifier of a built-in mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    PlainText,
    ColorCoded,
    CollapsibleConcepts,
    Summary,
    KnowledgeGraph,
    Timeline,
    PuzzleBased,
}

impl ModeId {
    /// Every mode, in registration order.
    pub const ALL: [ModeId; 7] = [
        Self::PlainText,
        Self::ColorCoded,
        Self::CollapsibleConcepts,
        Self::KnowledgeGraph,
        Self::Summary,
        Self::Timeline,
        Self::PuzzleBased,
    ];

    /// Get a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::ColorCoded => "color_coded",
            Self::CollapsibleConcepts => "collapsible_concepts",
            Self::Summary => "summary",
            Self::KnowledgeGraph => "knowledge_graph",
            Self::Timeline => "timeline",
            Self::PuzzleBased => "puzzle_based",
        }
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMode(pub String);

impl fmt::Display for UnknownMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown representation mode: {}", self.0)
    }
}

impl std::error::Error for UnknownMode {}

impl FromStr for ModeId {
    type Err = UnknownMode;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| UnknownMode(s.to_string()))
    }
}

/// Catalog grouping for modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeCategory {
    Basic,
    Visual,
    Interactive,
    Temporal,
}

/// Static catalog entry for a mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeInfo {
    pub id: ModeId,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub category: ModeCategory,
}

impl ModeInfo {
    pub fn new(
        id: ModeId,
        name: &str,
        description: &str,
        icon: &str,
        category: ModeCategory,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            category,
        }
    }
}

/// A representation mode.
pub trait Representation: Send + Sync {
    /// Static catalog entry.
    fn info(&self) -> &ModeInfo;

    /// Mode identifier.
    fn id(&self) -> ModeId {
        self.info().id
    }

    /// Minimum trimmed content length, in characters.
    fn min_content_len(&self) -> usize {
        DEFAULT_MIN_CONTENT_LEN
    }

    /// Render `content`. Implementations may assume it passed validation.
    fn render(&self, content: &str, preferences: &Preferences) -> Result<RepresentationResult>;

    /// Mode-specific additions to the error content.
    fn fallback_content(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Check the length precondition.
    fn validate(&self, content: &str) -> Result<()> {
        let actual = content.trim().chars().count();
        let min = self.min_content_len();
        if actual < min {
            return Err(RepresentationError::ContentTooShort { min, actual });
        }
        Ok(())
    }

    /// Build the error result for `error`.
    fn error_result(&self, error: &RepresentationError) -> RepresentationResult {
        RepresentationResult::error(self.id(), error, self.fallback_content())
    }

    /// Validate, render, and convert any failure into an error result.
    fn process(&self, content: &str, preferences: &Preferences) -> RepresentationResult {
        if let Some(persona) = &preferences.persona {
            debug!("Rendering {} for persona {persona}", self.id());
        }

        match self
            .validate(content)
            .and_then(|()| self.render(content, preferences))
        {
            Ok(result) => result,
            Err(err) => {
                warn!("{} representation failed: {err}", self.id());
                self.error_result(&err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    struct Echo {
        info: ModeInfo,
    }

    impl Representation for Echo {
        fn info(&self) -> &ModeInfo {
            &self.info
        }

        fn render(&self, content: &str, _: &Preferences) -> Result<RepresentationResult> {
            if content.contains("fail") {
                return Err(RepresentationError::NoExtractableData("nothing".into()));
            }
            RepresentationResult::from_parts(self.id(), &json!({"text": content}), &json!({}))
        }
    }

    fn echo() -> Echo {
        Echo {
            info: ModeInfo::new(ModeId::PlainText, "Echo", "", "", ModeCategory::Basic),
        }
    }

    #[test]
    fn test_parse_mode_ids() {
        assert_eq!("timeline".parse::<ModeId>().unwrap(), ModeId::Timeline);
        assert_eq!(
            "hologram".parse::<ModeId>(),
            Err(UnknownMode("hologram".to_string()))
        );
        for mode in ModeId::ALL {
            assert_eq!(mode.as_str().parse::<ModeId>().unwrap(), mode);
        }
    }

    #[test]
    fn test_process_rejects_short_content() {
        let result = echo().process("   tiny   ", &Preferences::new());
        assert!(result.is_error());
        assert_eq!(result.metadata["error_kind"], json!("content_too_short"));
    }

    #[test]
    fn test_process_converts_render_errors() {
        let result = echo().process("this will fail for sure", &Preferences::new());
        assert!(result.is_error());
        assert_eq!(result.content["message"], json!("nothing"));
    }

    #[test]
    fn test_process_passes_valid_content() {
        let result = echo().process("long enough content", &Preferences::new());
        assert!(!result.is_error());
        assert_eq!(result.content["text"], json!("long enough content"));
    }
}
