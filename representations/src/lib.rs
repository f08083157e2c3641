//! # Prism Representations
//!
//! The representation contract and the seven built-in modes that turn free
//! text into UI-ready structures:
//!
//! - **Plain text**: escaped HTML paragraphs with light emphasis
//! - **Color coded**: sentences bucketed into facts, assumptions, examples
//!   and warnings
//! - **Collapsible concepts**: a two-level expandable concept tree
//! - **Knowledge graph**: typed entities and relations as a network
//! - **Summary**: key points, topics, quotes and a TL;DR
//! - **Timeline**: dated events on one sortable axis
//! - **Puzzle**: content segments locked behind challenges
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Representation::process                       │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  content ──► validate ──► render ──► RepresentationResult       │
//! │                 │            │                ▲                 │
//! │                 │            ▼                │                 │
//! │                 │      Arc<Toolkit>           │                 │
//! │                 │                             │                 │
//! │                 └─────► RepresentationError ──┘ (error result)  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `process` never fails: precondition violations and render errors become
//! results flagged with `metadata.error = true`.

pub mod error;
pub mod mode;
pub mod modes;
pub mod preferences;
pub mod result;

pub use error::{ErrorKind, RepresentationError, Result};
pub use mode::{
    DEFAULT_MIN_CONTENT_LEN, ModeCategory, ModeId, ModeInfo, Representation, UnknownMode,
};
pub use modes::builtin_modes;
pub use preferences::Preferences;
pub use result::{Complexity, FALLBACK_TEXT, RepresentationResult};
