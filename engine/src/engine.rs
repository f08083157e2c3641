//! Representation engine implementation.

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde::Serialize;
use serde_json::Map;
use tracing::{debug, info, warn};

use prism_extraction::Toolkit;
use prism_representations::{
    ModeCategory, ModeId, ModeInfo, Preferences, Representation, RepresentationError,
    RepresentationResult, builtin_modes,
};

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Version stamped on every result.
pub const ENGINE_VERSION: &str = "2.0";

/// Engine flavour stamped on every result.
pub const PROCESSING_ENGINE: &str = "modular";

/// Registry of representation modes and the single generation entry point.
///
/// The engine is immutable once built. It owns the compiled extraction
/// toolkit and one handler per enabled mode, so it can be shared behind an
/// `Arc` and used from many threads at once.
pub struct Engine {
    /// Configuration.
    config: EngineConfig,

    /// Enabled modes, indexed by id.
    modes: BTreeMap<ModeId, Box<dyn Representation>>,
}

impl Engine {
    /// Create a new engine builder.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Build the engine with the default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Build the engine with the given configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        info!("Initializing representation engine");
        config.validate()?;

        let toolkit = Arc::new(Toolkit::new()?);
        let modes: BTreeMap<ModeId, Box<dyn Representation>> = builtin_modes(toolkit)?
            .into_iter()
            .filter(|mode| config.is_enabled(mode.id()))
            .map(|mode| (mode.id(), mode))
            .collect();

        if let Some(missing) = config
            .baseline_modes
            .iter()
            .find(|id| !modes.contains_key(*id))
        {
            return Err(EngineError::MissingBaselineMode(*missing));
        }

        info!("Representation engine initialized with {} modes", modes.len());
        Ok(Self { config, modes })
    }

    /// The active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a requested mode name to a registered mode.
    ///
    /// Unknown or disabled modes resolve to the fallback mode.
    pub fn resolve_mode(&self, mode: &str) -> ModeId {
        match mode.parse::<ModeId>() {
            Ok(id) if self.modes.contains_key(&id) => id,
            Ok(id) => {
                warn!(
                    "Mode {id} is disabled, falling back to {}",
                    self.config.fallback_mode
                );
                self.config.fallback_mode
            }
            Err(err) => {
                warn!("{err}, falling back to {}", self.config.fallback_mode);
                self.config.fallback_mode
            }
        }
    }

    /// Transform `content` into the requested representation.
    ///
    /// Never fails: short content, mode errors and panics inside a mode all
    /// come back as error results for the resolved mode.
    pub fn generate(
        &self,
        content: &str,
        mode: &str,
        preferences: &Preferences,
    ) -> RepresentationResult {
        let id = self.resolve_mode(mode);
        if let Some(persona) = &preferences.persona {
            debug!("Generating {id} for persona {persona}");
        }

        let actual = content.trim().chars().count();
        if actual < self.config.min_content_len {
            let error = RepresentationError::ContentTooShort {
                min: self.config.min_content_len,
                actual,
            };
            return self.failure(id, &error);
        }

        let Some(handler) = self.modes.get(&id) else {
            let error =
                RepresentationError::ProcessingFailure(format!("mode {id} is not registered"));
            return self.failure(id, &error);
        };

        match catch_unwind(AssertUnwindSafe(|| handler.process(content, preferences))) {
            Ok(mut result) => {
                stamp(&mut result);
                debug!("Generated {id} result (error: {})", result.is_error());
                result
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!("Mode {id} panicked: {message}");
                self.failure(id, &RepresentationError::ProcessingFailure(message))
            }
        }
    }

    /// Run [`generate`](Self::generate) on tokio's blocking pool.
    pub async fn generate_async(
        self: &Arc<Self>,
        content: impl Into<String>,
        mode: impl Into<String>,
        preferences: Preferences,
    ) -> RepresentationResult {
        let engine = Arc::clone(self);
        let content = content.into();
        let mode = mode.into();
        let id = self.resolve_mode(&mode);

        let task = tokio::task::spawn_blocking(move || {
            engine.generate(&content, &mode, &preferences)
        });
        match task.await {
            Ok(result) => result,
            Err(err) => {
                warn!("Generation task for {id} failed: {err}");
                self.failure(
                    id,
                    &RepresentationError::ProcessingFailure(err.to_string()),
                )
            }
        }
    }

    /// Catalog of every registered mode.
    pub fn available_modes(&self) -> BTreeMap<ModeId, &ModeInfo> {
        self.modes
            .iter()
            .map(|(id, mode)| (*id, mode.info()))
            .collect()
    }

    /// Catalog entry for one mode.
    pub fn mode_info(&self, id: ModeId) -> Option<&ModeInfo> {
        self.modes.get(&id).map(|mode| mode.info())
    }

    /// Whether `mode` names a registered mode.
    pub fn is_mode_available(&self, mode: &str) -> bool {
        mode.parse::<ModeId>()
            .is_ok_and(|id| self.modes.contains_key(&id))
    }

    /// Registered modes in one category, in registration order.
    pub fn modes_by_category(&self, category: ModeCategory) -> Vec<&ModeInfo> {
        ModeId::ALL
            .iter()
            .filter_map(|id| self.mode_info(*id))
            .filter(|info| info.category == category)
            .collect()
    }

    /// Report whether every baseline mode is registered.
    pub fn health_check(&self) -> EngineHealth {
        let missing_modes: Vec<ModeId> = self
            .config
            .baseline_modes
            .iter()
            .copied()
            .filter(|id| !self.modes.contains_key(id))
            .collect();

        EngineHealth {
            healthy: missing_modes.is_empty(),
            registered_modes: self.modes.len(),
            missing_modes,
            engine_version: ENGINE_VERSION,
        }
    }

    fn failure(&self, id: ModeId, error: &RepresentationError) -> RepresentationResult {
        let mut result = match self.modes.get(&id) {
            Some(handler) => handler.error_result(error),
            None => RepresentationResult::error(id, error, Map::new()),
        };
        stamp(&mut result);
        result
    }
}

fn stamp(result: &mut RepresentationResult) {
    result.insert_metadata("engine_version", ENGINE_VERSION);
    result.insert_metadata("processing_engine", PROCESSING_ENGINE);
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "mode panicked".to_string()
    }
}

/// Builder for the representation engine.
pub struct EngineBuilder {
    config: EngineConfig,
}

impl EngineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Start from an existing configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the global minimum content length.
    pub fn with_min_content_len(mut self, len: usize) -> Self {
        self.config.min_content_len = len;
        self
    }

    /// Leave a mode out of the registry.
    pub fn without_mode(mut self, mode: ModeId) -> Self {
        self.config = self.config.with_disabled_mode(mode);
        self
    }

    /// Set the fallback mode.
    pub fn with_fallback_mode(mut self, mode: ModeId) -> Self {
        self.config.fallback_mode = mode;
        self
    }

    /// Build the engine.
    pub fn build(self) -> Result<Engine> {
        Engine::with_config(self.config)
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Health report for the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineHealth {
    /// Whether every baseline mode is registered.
    pub healthy: bool,

    /// Number of registered modes.
    pub registered_modes: usize,

    /// Baseline modes that are not registered.
    pub missing_modes: Vec<ModeId>,

    /// Engine version.
    pub engine_version: &'static str,
}
