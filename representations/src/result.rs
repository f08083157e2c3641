//! The serializable output of every representation mode.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{RepresentationError, Result};
use crate::mode::ModeId;

/// Fallback text shown by clients when a mode fails.
pub const FALLBACK_TEXT: &str = "Unable to process content for this representation mode.";

/// Coarse complexity label reported in metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Low,
    Medium,
    High,
}

/// One rendered representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepresentationResult {
    /// Mode that produced the result.
    pub mode: ModeId,

    /// Mode-specific payload; always a JSON object.
    pub content: Value,

    /// Counts, complexity and diagnostic flags.
    pub metadata: Map<String, Value>,

    /// Presentation class names.
    pub style_hints: Vec<String>,

    /// Name of the client-side initializer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_script: Option<String>,

    /// Client-side configuration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_config: Option<Value>,
}

impl RepresentationResult {
    /// Build a result from serializable content and metadata.
    ///
    /// Both must serialize to JSON objects.
    pub fn from_parts(
        mode: ModeId,
        content: &impl Serialize,
        metadata: &impl Serialize,
    ) -> Result<Self> {
        let content = serde_json::to_value(content)?;
        if !content.is_object() {
            return Err(RepresentationError::ProcessingFailure(
                "content must be a JSON object".to_string(),
            ));
        }
        let Value::Object(metadata) = serde_json::to_value(metadata)? else {
            return Err(RepresentationError::ProcessingFailure(
                "metadata must be a JSON object".to_string(),
            ));
        };

        Ok(Self {
            mode,
            content,
            metadata,
            style_hints: Vec::new(),
            ui_script: None,
            ui_config: None,
        })
    }

    /// Build the error result for `error`.
    ///
    /// `extra_content` is merged into the standard error content, letting a
    /// mode add its own empty placeholders.
    pub fn error(
        mode: ModeId,
        error: &RepresentationError,
        extra_content: Map<String, Value>,
    ) -> Self {
        let message = error.to_string();
        let mut content = Map::new();
        content.insert("error".to_string(), Value::Bool(true));
        content.insert("message".to_string(), Value::String(message));
        content.insert(
            "fallback_content".to_string(),
            Value::String(FALLBACK_TEXT.to_string()),
        );
        content.extend(extra_content);

        let mut metadata = Map::new();
        metadata.insert("error".to_string(), Value::Bool(true));
        metadata.insert("error_kind".to_string(), json!(error.kind()));
        metadata.insert("processing_time".to_string(), json!(0));

        Self {
            mode,
            content: Value::Object(content),
            metadata,
            style_hints: vec!["error-state".to_string()],
            ui_script: None,
            ui_config: Some(json!({ "show_error": true })),
        }
    }

    /// Set the style hints.
    pub fn with_style_hints(mut self, hints: &[&str]) -> Self {
        self.style_hints = hints.iter().map(|h| (*h).to_string()).collect();
        self
    }

    /// Set the client initializer name.
    pub fn with_ui_script(mut self, script: impl Into<String>) -> Self {
        self.ui_script = Some(script.into());
        self
    }

    /// Set the client configuration.
    pub fn with_ui_config(mut self, config: Value) -> Self {
        self.ui_config = Some(config);
        self
    }

    /// Whether this is an error result.
    pub fn is_error(&self) -> bool {
        self.metadata.get("error") == Some(&Value::Bool(true))
    }

    /// Insert a metadata entry, replacing any previous value.
    pub fn insert_metadata(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.metadata.insert(key.into(), value.into());
    }

    /// Serialize to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
