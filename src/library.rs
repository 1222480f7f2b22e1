//! The user-configured gesture library.
//!
//! Built once from config entries and then only read: the coordinator
//! queries it for live and final matches, the engine pulls the winning
//! definition's command chain out of it. Replacing the library means
//! building a fresh one and swapping the handle.

use flick_commands::{CommandRegistry, CommandStack};
use flick_config::GestureEntry;
use flick_pattern::{MatchScore, MatchingAlgorithm, Pattern, matcher};

/// One registered gesture: an immutable pattern, the command chain it
/// resolves to, and an optional display label.
pub struct GestureDefinition {
    pattern: Pattern,
    stack: CommandStack,
    label: Option<String>,
}

impl GestureDefinition {
    pub fn new(pattern: Pattern, stack: CommandStack, label: Option<String>) -> Self {
        Self {
            pattern,
            stack,
            label,
        }
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn stack(&self) -> &CommandStack {
        &self.stack
    }

    /// Display label; derived from the first command's kind when unset.
    pub fn display_label(&self) -> &str {
        match &self.label {
            Some(label) => label,
            None => self.stack.first_name().unwrap_or("gesture"),
        }
    }
}

/// All registered gestures, in registration order.
#[derive(Default)]
pub struct GestureLibrary {
    definitions: Vec<GestureDefinition>,
}

// Definitions hold command trait objects, so derive(Debug) is unavailable.
impl std::fmt::Debug for GestureLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GestureLibrary")
            .field("len", &self.len())
            .finish()
    }
}

impl GestureLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a library from already-constructed definitions, for hosts that
    /// assemble gestures programmatically instead of loading them.
    pub fn from_definitions(definitions: Vec<GestureDefinition>) -> Self {
        Self { definitions }
    }

    /// Build a library from persisted entries.
    ///
    /// Entries whose command chain cannot be resolved are logged and
    /// skipped; they are excluded from matching rather than half-built.
    pub fn from_entries(registry: &CommandRegistry, entries: &[GestureEntry]) -> Self {
        let mut definitions = Vec::with_capacity(entries.len());
        for entry in entries {
            match CommandStack::from_specs(registry, &entry.commands) {
                Ok(stack) => definitions.push(GestureDefinition {
                    pattern: entry.pattern.clone(),
                    stack,
                    label: entry.label.clone(),
                }),
                Err(e) => {
                    log::warn!(
                        "skipping gesture '{}': {e}",
                        entry.label.as_deref().unwrap_or("<unlabeled>")
                    );
                }
            }
        }
        log::info!(
            "gesture library initialized with {} of {} entries",
            definitions.len(),
            entries.len()
        );
        Self { definitions }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GestureDefinition> {
        self.definitions.get(index)
    }

    /// The definition closest to `candidate` under the tolerance, if any.
    pub fn closest(
        &self,
        candidate: &Pattern,
        tolerance: f64,
        algorithm: MatchingAlgorithm,
    ) -> Option<MatchScore> {
        matcher::closest(
            candidate,
            self.definitions.iter().map(GestureDefinition::pattern),
            tolerance,
            algorithm,
        )
    }
}
