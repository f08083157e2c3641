//! Per-call preferences.

use serde::{Deserialize, Serialize};

use prism_extraction::temporal;

/// Default cap on summary key points.
pub const DEFAULT_MAX_KEY_POINTS: usize = 6;

/// Default cap on summary main topics.
pub const DEFAULT_MAX_TOPICS: usize = 5;

/// Default cap on knowledge-graph entities.
pub const DEFAULT_MAX_ENTITIES: usize = 20;

/// Caller preferences. Every field is optional; accessors apply defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Reader persona, echoed by the plain-text mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub persona: Option<String>,

    /// Maximum summary key points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_key_points: Option<usize>,

    /// Maximum summary topics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_topics: Option<usize>,

    /// Maximum knowledge-graph entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entities: Option<usize>,

    /// Year that relative dates ("10 years ago") resolve against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,

    /// Seed for challenge generation. Without one, fresh entropy is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Preferences {
    /// Create empty preferences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the persona.
    pub fn with_persona(mut self, persona: impl Into<String>) -> Self {
        self.persona = Some(persona.into());
        self
    }

    /// Set the key-point cap.
    pub fn with_max_key_points(mut self, max: usize) -> Self {
        self.max_key_points = Some(max);
        self
    }

    /// Set the topic cap.
    pub fn with_max_topics(mut self, max: usize) -> Self {
        self.max_topics = Some(max);
        self
    }

    /// Set the entity cap.
    pub fn with_max_entities(mut self, max: usize) -> Self {
        self.max_entities = Some(max);
        self
    }

    /// Set the reference year.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.reference_year = Some(year);
        self
    }

    /// Set the challenge seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn max_key_points(&self) -> usize {
        self.max_key_points.unwrap_or(DEFAULT_MAX_KEY_POINTS)
    }

    pub fn max_topics(&self) -> usize {
        self.max_topics.unwrap_or(DEFAULT_MAX_TOPICS)
    }

    /// Entity cap, never above [`DEFAULT_MAX_ENTITIES`].
    pub fn max_entities(&self) -> usize {
        self.max_entities
            .unwrap_or(DEFAULT_MAX_ENTITIES)
            .min(DEFAULT_MAX_ENTITIES)
    }

    /// Reference year, defaulting to the current UTC year.
    pub fn reference_year(&self) -> i32 {
        self.reference_year.unwrap_or_else(temporal::current_year)
    }
}
