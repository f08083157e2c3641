//! Error types for the extraction toolkit.

use thiserror::Error;

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Errors that can occur while building extractors.
///
/// Extraction itself is total: once an extractor exists, every call returns
/// a (possibly empty) value. Only compiling the pattern tables can fail.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex_lite::Error),
}
