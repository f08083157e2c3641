//! Configuration for the representation engine.

use serde::{Deserialize, Serialize};

use prism_representations::{DEFAULT_MIN_CONTENT_LEN, ModeId};

use crate::error::{EngineError, Result};

/// Configuration for the representation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Global minimum trimmed content length, checked before any mode runs.
    pub min_content_len: usize,

    /// Modes that must be registered for the engine to be healthy.
    pub baseline_modes: Vec<ModeId>,

    /// Modes left out of the registry.
    pub disabled_modes: Vec<ModeId>,

    /// Mode used when the requested one is unknown or disabled.
    pub fallback_mode: ModeId,
}

impl EngineConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from TOML. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the global minimum content length.
    pub fn with_min_content_len(mut self, len: usize) -> Self {
        self.min_content_len = len;
        self
    }

    /// Leave a mode out of the registry.
    pub fn with_disabled_mode(mut self, mode: ModeId) -> Self {
        if !self.disabled_modes.contains(&mode) {
            self.disabled_modes.push(mode);
        }
        self
    }

    /// Set the fallback mode.
    pub fn with_fallback_mode(mut self, mode: ModeId) -> Self {
        self.fallback_mode = mode;
        self
    }

    /// Whether `mode` should be registered.
    pub fn is_enabled(&self, mode: ModeId) -> bool {
        !self.disabled_modes.contains(&mode)
    }

    /// Check the configuration for contradictions.
    pub fn validate(&self) -> Result<()> {
        if let Some(mode) = self.baseline_modes.iter().find(|m| !self.is_enabled(**m)) {
            return Err(EngineError::MissingBaselineMode(*mode));
        }
        if !self.is_enabled(self.fallback_mode) {
            return Err(EngineError::Config(format!(
                "fallback mode {} is disabled",
                self.fallback_mode
            )));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_content_len: DEFAULT_MIN_CONTENT_LEN,
            baseline_modes: vec![ModeId::PlainText, ModeId::Summary],
            disabled_modes: Vec::new(),
            fallback_mode: ModeId::PlainText,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.min_content_len, 10);
        assert_eq!(config.baseline_modes, vec![ModeId::PlainText, ModeId::Summary]);
        assert_eq!(config.fallback_mode, ModeId::PlainText);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_toml() {
        let config = EngineConfig::from_toml_str(
            r#"
            min_content_len = 25
            disabled_modes = ["puzzle_based", "timeline"]
            "#,
        )
        .unwrap();

        assert_eq!(config.min_content_len, 25);
        assert!(!config.is_enabled(ModeId::PuzzleBased));
        assert!(!config.is_enabled(ModeId::Timeline));
        assert!(config.is_enabled(ModeId::Summary));
        assert_eq!(config.fallback_mode, ModeId::PlainText);
    }

    #[test]
    fn test_rejects_unknown_mode_names() {
        let err = EngineConfig::from_toml_str(r#"disabled_modes = ["slideshow"]"#).unwrap_err();
        assert!(matches!(err, EngineError::Toml(_)));
    }

    #[test]
    fn test_disabling_baseline_fails() {
        let err = EngineConfig::new()
            .with_disabled_mode(ModeId::Summary)
            .validate()
            .unwrap_err();
        assert!(matches!(err, EngineError::MissingBaselineMode(ModeId::Summary)));
    }

    #[test]
    fn test_disabled_fallback_fails() {
        let config = EngineConfig {
            baseline_modes: Vec::new(),
            ..EngineConfig::default()
        }
        .with_disabled_mode(ModeId::PlainText);
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }
}
