//! # Prism Extraction Toolkit
//!
//! Heuristic, pattern-based text analysis shared by every Prism
//! representation mode:
//!
//! - **Segmentation**: paragraphs, sentences, word counts, reading time
//! - **Key phrases**: capitalized spans, domain terms, subject phrases
//! - **Entities**: capitalized candidates typed by layered dictionaries
//! - **Relationships**: ordered relation patterns resolved against entities
//! - **Temporal cascade**: fourteen date families on one sortable axis
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Toolkit                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  text ──► segment ──► KeyPhraseExtractor                        │
//! │              │                                                  │
//! │              ├──────► EntityExtractor ──► RelationshipExtractor │
//! │              │              │                                   │
//! │              │              ▼                                   │
//! │              │           lexicon / similarity                   │
//! │              ▼                                                  │
//! │          DateCascade ──► ParsedDate (sort_key)                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every extractor is total: once built, unmatched input produces an empty
//! result rather than an error. Only building the pattern tables can fail.

pub mod entity;
pub mod error;
pub mod lexicon;
pub mod phrases;
pub mod relationship;
pub mod segment;
pub mod similarity;
pub mod temporal;

pub use entity::{Classification, Entity, EntityExtractor, EntityExtractorConfig, EntityType};
pub use error::{ExtractionError, Result};
pub use phrases::{KeyPhraseConfig, KeyPhraseExtractor};
pub use relationship::{RelationType, Relationship, RelationshipExtractor};
pub use segment::Sentence;
pub use temporal::{DateCascade, DateFamily, DateMatch, DateParts, ParsedDate, Precision};

use tracing::debug;

/// Compiled extractors bundled for sharing across representation modes.
///
/// Construction compiles every pattern table once; the toolkit is then
/// immutable and can be shared behind an `Arc`.
pub struct Toolkit {
    pub phrases: KeyPhraseExtractor,
    pub entities: EntityExtractor,
    pub relationships: RelationshipExtractor,
    pub dates: DateCascade,
}

impl Toolkit {
    /// Build every extractor with its default configuration.
    pub fn new() -> Result<Self> {
        let toolkit = Self {
            phrases: KeyPhraseExtractor::new()?,
            entities: EntityExtractor::new()?,
            relationships: RelationshipExtractor::new()?,
            dates: DateCascade::new()?,
        };
        debug!("Compiled extraction toolkit");
        Ok(toolkit)
    }
}
