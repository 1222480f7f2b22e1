//! Trigger, suppression and gesture-library entry types.

use flick_pattern::Pattern;
use serde::{Deserialize, Serialize};

/// A pointer button, with its position in the host's button bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Browser/back thumb button.
    Back,
    /// Browser/forward thumb button.
    Forward,
}

impl MouseButton {
    /// Bit this button occupies in a pressed-buttons bitmask, matching the
    /// convention of DOM `MouseEvent.buttons`.
    pub fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 0b0000_0001,
            MouseButton::Right => 0b0000_0010,
            MouseButton::Middle => 0b0000_0100,
            MouseButton::Back => 0b0000_1000,
            MouseButton::Forward => 0b0001_0000,
        }
    }

    /// Whether this button is set in a pressed-buttons bitmask.
    pub fn in_mask(self, mask: u8) -> bool {
        mask & self.bit() != 0
    }
}

/// Modifier key that disables gesture capture while held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuppressionKey {
    /// Capture is never suppressed.
    None,
    Alt,
    Ctrl,
    Shift,
    Meta,
}

/// One serialized command of a gesture's fallback chain.
///
/// `settings` is kind-specific and merged over the kind's defaults when the
/// command is constructed; omitted here means "all defaults".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    /// Command kind tag, e.g. `open-url`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<serde_json::Value>,
}

impl CommandSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            settings: None,
        }
    }

    pub fn with_settings(name: impl Into<String>, settings: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            settings: Some(settings),
        }
    }
}

/// One persisted gesture: a pattern, the fallback command chain it triggers,
/// and an optional display label.
///
/// `commands` is never empty in a persisted entry; a label, when absent, is
/// derived at display time from the first command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureEntry {
    pub pattern: Pattern,
    pub commands: Vec<CommandSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use flick_pattern::PatternVector;

    #[test]
    fn test_button_bits_are_distinct() {
        let buttons = [
            MouseButton::Left,
            MouseButton::Right,
            MouseButton::Middle,
            MouseButton::Back,
            MouseButton::Forward,
        ];
        let mut seen = 0u8;
        for button in buttons {
            assert_eq!(seen & button.bit(), 0);
            seen |= button.bit();
        }
    }

    #[test]
    fn test_in_mask() {
        // Right button held while left is also down.
        let mask = MouseButton::Left.bit() | MouseButton::Right.bit();
        assert!(MouseButton::Right.in_mask(mask));
        assert!(!MouseButton::Middle.in_mask(mask));
    }

    #[test]
    fn test_gesture_entry_round_trip() {
        let entry = GestureEntry {
            pattern: Pattern::from_vectors(vec![
                PatternVector::new(0.0, -120.0),
                PatternVector::new(80.0, 0.0),
            ]),
            commands: vec![
                CommandSpec::with_settings(
                    "open-url",
                    serde_json::json!({ "url": "https://example.com" }),
                ),
                CommandSpec::new("copy-text"),
            ],
            label: Some("up then right".to_string()),
        };

        let yaml = serde_yaml_ng::to_string(&entry).unwrap();
        let back: GestureEntry = serde_yaml_ng::from_str(&yaml).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_optional_fields_stay_omitted() {
        let entry = GestureEntry {
            pattern: Pattern::from_vectors(vec![PatternVector::new(0.0, -1.0)]),
            commands: vec![CommandSpec::new("copy-text")],
            label: None,
        };
        let yaml = serde_yaml_ng::to_string(&entry).unwrap();
        assert!(!yaml.contains("label"));
        assert!(!yaml.contains("settings"));
    }
}
