//! Error types for the representation engine.

use thiserror::Error;

use prism_extraction::ExtractionError;
use prism_representations::{ModeId, RepresentationError};

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors raised while building or configuring the engine.
///
/// Generation itself never fails; see [`Engine::generate`](crate::Engine::generate).
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be parsed.
    #[error("invalid engine config: {0}")]
    Toml(#[from] toml::de::Error),

    /// A baseline mode was disabled or failed to register.
    #[error("baseline mode {0} is not registered")]
    MissingBaselineMode(ModeId),

    /// A mode could not be constructed.
    #[error("representation error: {0}")]
    Representation(#[from] RepresentationError),

    /// The extraction toolkit could not be built.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),
}
