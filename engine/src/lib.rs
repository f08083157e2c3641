//! # Prism Engine
//!
//! The entry point of the content representation engine. It combines:
//!
//! - **Extraction toolkit**: compiled once and shared by every mode
//! - **Mode registry**: one handler per enabled representation mode
//! - **Safety boundary**: fallback for unknown modes, length checks and
//!   panic capture, so callers always receive a well-formed result
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Engine                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  (content, mode, Preferences)                                   │
//! │              │                                                  │
//! │              ▼                                                  │
//! │      ┌──────────────┐   unknown / disabled   ┌──────────────┐   │
//! │      │ resolve_mode │ ─────────────────────► │   fallback   │   │
//! │      └──────────────┘                        └──────────────┘   │
//! │              │                                                  │
//! │              ▼                                                  │
//! │      ┌──────────────┐        ┌──────────────────────────┐       │
//! │      │ length check │ ─────► │ Representation::process  │       │
//! │      └──────────────┘        │     (catch_unwind)       │       │
//! │                              └──────────────────────────┘       │
//! │                                          │                      │
//! │                                          ▼                      │
//! │                              RepresentationResult (stamped)     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use prism_engine::{Engine, Preferences};
//!
//! let engine = Engine::builder()
//!     .with_min_content_len(20)
//!     .build()?;
//!
//! let result = engine.generate(text, "timeline", &Preferences::new());
//! println!("{}", result.to_json()?);
//! ```

pub mod config;
pub mod engine;
pub mod error;

pub use config::EngineConfig;
pub use engine::{ENGINE_VERSION, Engine, EngineBuilder, EngineHealth, PROCESSING_ENGINE};
pub use error::{EngineError, Result};

// Re-export from dependencies for convenience
pub use prism_representations::{
    ErrorKind, ModeCategory, ModeId, ModeInfo, Preferences, Representation, RepresentationResult,
};
