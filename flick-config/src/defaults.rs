//! Default values for config fields.
//!
//! Each function backs a `#[serde(default = "...")]` attribute so partially
//! written config files pick up the defaults for everything they omit.

use flick_pattern::MatchingAlgorithm;

use crate::types::{MouseButton, SuppressionKey};

pub(crate) fn trigger_button() -> MouseButton {
    MouseButton::Right
}

pub(crate) fn suppression_key() -> SuppressionKey {
    SuppressionKey::None
}

/// Minimum pixel displacement before a direction is committed.
pub(crate) fn distance_threshold() -> f64 {
    10.0
}

/// Maximum dissimilarity score under which a match is accepted.
pub(crate) fn deviation_tolerance() -> f64 {
    0.15
}

pub(crate) fn matching_algorithm() -> MatchingAlgorithm {
    MatchingAlgorithm::Combined
}

/// How long an inactive session may linger before it is reaped. A frame that
/// navigates away mid-gesture stops sending messages; without this the
/// session would only die when a fresh one supersedes it.
pub(crate) fn session_timeout_ms() -> Option<u64> {
    Some(10_000)
}
