//! Config loading, saving and validation.

use std::path::{Path, PathBuf};

use flick_pattern::MatchingAlgorithm;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::ConfigError;
use crate::types::{GestureEntry, MouseButton, SuppressionKey};

/// Engine configuration plus the persisted gesture library.
///
/// Every field has a default, so an empty file is a valid config. The core
/// consumes this read-only; only the host's settings surface writes it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Pointer button that starts a gesture.
    #[serde(default = "defaults::trigger_button")]
    pub trigger_button: MouseButton,

    /// Modifier that disables capture while held.
    #[serde(default = "defaults::suppression_key")]
    pub suppression_key: SuppressionKey,

    /// Minimum pixel displacement before a direction is committed.
    #[serde(default = "defaults::distance_threshold")]
    pub distance_threshold: f64,

    /// Maximum dissimilarity score under which a match is accepted.
    #[serde(default = "defaults::deviation_tolerance")]
    pub deviation_tolerance: f64,

    #[serde(default = "defaults::matching_algorithm")]
    pub matching_algorithm: MatchingAlgorithm,

    /// Reap an inactive session after this many milliseconds. `null`
    /// disables the timeout.
    #[serde(default = "defaults::session_timeout_ms")]
    pub session_timeout_ms: Option<u64>,

    /// The gesture library, in registration order. Order matters: exact
    /// matching ties go to the earlier entry.
    #[serde(default)]
    pub gestures: Vec<GestureEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trigger_button: defaults::trigger_button(),
            suppression_key: defaults::suppression_key(),
            distance_threshold: defaults::distance_threshold(),
            deviation_tolerance: defaults::deviation_tolerance(),
            matching_algorithm: defaults::matching_algorithm(),
            session_timeout_ms: defaults::session_timeout_ms(),
            gestures: Vec::new(),
        }
    }
}

impl Config {
    /// Platform config directory for flick (e.g. `~/.config/flick`).
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("flick"))
    }

    /// Default config file path (`config.yaml` inside [`Self::config_dir`]).
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.yaml"))
    }

    /// Load and validate a config file.
    ///
    /// Fails fast on unreadable files, malformed YAML and invalid field
    /// values; a corrupt gesture entry is never partially recovered.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let config = Self::load_inner(path)?;
        log::info!(
            "Loaded config from {} ({} gestures)",
            path.display(),
            config.gestures.len()
        );
        Ok(config)
    }

    fn load_inner(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML and write, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        self.save_inner(path)?;
        log::info!("Saved config to {}", path.display());
        Ok(())
    }

    fn save_inner(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml_ng::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Semantic validation of field values and gesture entries.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.distance_threshold.is_finite() || self.distance_threshold <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "distance_threshold must be a positive number, got {}",
                self.distance_threshold
            )));
        }
        if !self.deviation_tolerance.is_finite()
            || self.deviation_tolerance <= 0.0
            || self.deviation_tolerance > 1.0
        {
            return Err(ConfigError::Validation(format!(
                "deviation_tolerance must be in (0, 1], got {}",
                self.deviation_tolerance
            )));
        }
        for (index, entry) in self.gestures.iter().enumerate() {
            if let Err(e) = entry.pattern.validate() {
                return Err(ConfigError::Validation(format!("gesture {index}: {e}")));
            }
            if entry.commands.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "gesture {index} has no commands"
                )));
            }
        }
        Ok(())
    }
}
