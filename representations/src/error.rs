//! Error types for representation modes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use prism_extraction::ExtractionError;

/// Result type alias for representation operations.
pub type Result<T> = std::result::Result<T, RepresentationError>;

/// Errors a mode can raise while rendering.
///
/// These never escape [`Representation::process`](crate::Representation::process);
/// they are converted into error results at the mode boundary.
#[derive(Error, Debug)]
pub enum RepresentationError {
    /// Content is shorter than the mode's minimum.
    #[error("content too short for processing: need at least {min} characters, got {actual}")]
    ContentTooShort { min: usize, actual: usize },

    /// The content holds nothing the mode can work with.
    #[error("{0}")]
    NoExtractableData(String),

    /// Processing failed unexpectedly.
    #[error("processing failed: {0}")]
    ProcessingFailure(String),

    /// A result could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An extractor could not be built.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// A mode's own pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}

impl RepresentationError {
    /// Coarse classification reported in error metadata.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ContentTooShort { .. } => ErrorKind::ContentTooShort,
            Self::NoExtractableData(_) => ErrorKind::NoExtractableData,
            Self::ProcessingFailure(_)
            | Self::Serialization(_)
            | Self::Extraction(_)
            | Self::Pattern(_) => {
                ErrorKind::ProcessingFailure
            }
        }
    }
}

/// The three failure kinds a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ContentTooShort,
    NoExtractableData,
    ProcessingFailure,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_kinds() {
        let short = RepresentationError::ContentTooShort { min: 10, actual: 3 };
        assert_eq!(short.kind(), ErrorKind::ContentTooShort);
        assert_eq!(
            short.to_string(),
            "content too short for processing: need at least 10 characters, got 3"
        );

        let empty = RepresentationError::NoExtractableData("No temporal events found".into());
        assert_eq!(empty.kind(), ErrorKind::NoExtractableData);
        assert_eq!(empty.to_string(), "No temporal events found");

        let serde_err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert_eq!(
            RepresentationError::from(serde_err).kind(),
            ErrorKind::ProcessingFailure
        );
    }
}
