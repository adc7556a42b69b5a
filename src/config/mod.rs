//! Generator configuration.
//!
//! Loaded from `config/generator.json` (or any `.json` / `.ron` file). Every
//! field has a default, so partial files are fine.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_GRID_SCALE, DEFAULT_MAX_ATTEMPTS, DEFAULT_SEED, DEFAULT_STEPS_PER_FRAME,
    DEFAULT_WORLD_HEIGHT, DEFAULT_WORLD_WIDTH,
};
use crate::logging::TracingConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("Unknown config format for {0} (expected .json or .ron)")]
    UnknownFormat(String),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub world_width: usize,
    pub world_height: usize,
    pub seed: u64,
    /// World units per coarse tile, only used for view geometry
    pub grid_scale: f32,
    /// Builds tried before a contradiction is reported
    pub max_attempts: u32,
    /// Solver steps advanced per host frame
    pub steps_per_frame: usize,
    /// Rule table file; the built-in table when unset
    pub rules_path: Option<PathBuf>,
    /// Explicit tile palette; every tile of the rule table when unset
    pub tiles: Option<Vec<String>>,
    pub tracing: TracingConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            world_width: DEFAULT_WORLD_WIDTH,
            world_height: DEFAULT_WORLD_HEIGHT,
            seed: DEFAULT_SEED,
            grid_scale: DEFAULT_GRID_SCALE,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            steps_per_frame: DEFAULT_STEPS_PER_FRAME,
            rules_path: None,
            tiles: None,
            tracing: TracingConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Fine (game) grid size, twice the world grid on each axis
    pub fn game_size(&self) -> (usize, usize) {
        (
            self.world_width * crate::constants::SUBGRID_FACTOR,
            self.world_height * crate::constants::SUBGRID_FACTOR,
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.world_width == 0 || self.world_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "world size must be at least 1x1, got {}x{}",
                self.world_width, self.world_height
            )));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        if self.steps_per_frame == 0 {
            return Err(ConfigError::Invalid(
                "steps_per_frame must be at least 1".into(),
            ));
        }
        if !self.grid_scale.is_finite() || self.grid_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "grid_scale must be positive, got {}",
                self.grid_scale
            )));
        }
        Ok(())
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_ron(ron: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(ron)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a config file; format follows the extension
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config = match ext.as_deref() {
            Some("json") => Self::from_json(&content)?,
            Some("ron") => Self::from_ron(&content)?,
            _ => return Err(ConfigError::UnknownFormat(path.display().to_string())),
        };
        tracing::info!(path = %path.display(), "generator config loaded");
        Ok(config)
    }
}
