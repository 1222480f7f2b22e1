//! Configuration system for flick.
//!
//! Owns the serialized forms the rest of the engine consumes read-only:
//! engine settings (trigger button, suppression key, thresholds, matching
//! mode, session timeout) and the persisted gesture library. Files are YAML,
//! stored under the platform config directory.
//!
//! This crate validates what it loads and exposes typed errors; it never
//! repairs a corrupt entry.

mod config;
mod defaults;
mod error;
mod types;

pub use config::Config;
pub use error::ConfigError;
pub use types::{CommandSpec, GestureEntry, MouseButton, SuppressionKey};
