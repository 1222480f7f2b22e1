//! Command kind registry.
//!
//! Serialized gestures name their commands by kind tag; the registry maps
//! each tag to a registration that knows the kind's default settings and how
//! to build an instance. Construction merges the supplied settings over the
//! defaults into one plain value and validates it once, so instances are
//! immutable from birth. Concrete kind modules register themselves here,
//! which keeps the base [`Command`](crate::Command) abstraction free of any
//! dependency on the catalog.

use std::collections::HashMap;

use flick_config::CommandSpec;
use thiserror::Error;

use crate::Command;

/// Failures resolving a serialized command spec into an instance.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The spec names a kind nothing has registered.
    #[error("unknown command kind '{0}'")]
    UnknownKind(String),

    /// The merged settings do not deserialize into the kind's settings type.
    #[error("invalid settings for command '{kind}': {source}")]
    InvalidSettings {
        kind: String,
        #[source]
        source: serde_json::Error,
    },

    /// A gesture's command list was empty at dispatch-construction time.
    #[error("gesture has no commands")]
    EmptyStack,
}

/// How one command kind is constructed.
pub struct KindRegistration {
    /// Kind-specific default settings, as a JSON object.
    pub defaults: fn() -> serde_json::Value,
    /// Build an instance from fully merged settings.
    pub build: fn(serde_json::Value) -> Result<Box<dyn Command>, CommandError>,
}

/// Registry of command kinds, keyed by their serialized tag.
#[derive(Default)]
pub struct CommandRegistry {
    kinds: HashMap<&'static str, KindRegistration>,
}

impl CommandRegistry {
    /// An empty registry. Hosts that want none of the built-in kinds start
    /// here and register their own.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the built-in kind catalog.
    pub fn with_builtin_kinds() -> Self {
        let mut registry = Self::new();
        crate::kinds::register_builtin(&mut registry);
        registry
    }

    /// Register (or replace) a kind under its tag.
    pub fn register(&mut self, name: &'static str, registration: KindRegistration) {
        self.kinds.insert(name, registration);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(name)
    }

    /// Resolve a serialized spec into a command instance.
    ///
    /// Supplied settings win over kind defaults key by key; keys the spec
    /// does not mention keep their default value.
    pub fn from_spec(&self, spec: &CommandSpec) -> Result<Box<dyn Command>, CommandError> {
        let registration = self
            .kinds
            .get(spec.name.as_str())
            .ok_or_else(|| CommandError::UnknownKind(spec.name.clone()))?;
        let settings = merge_settings((registration.defaults)(), spec.settings.as_ref());
        (registration.build)(settings)
    }
}

/// Overlay supplied settings on the kind defaults, key by key.
fn merge_settings(
    defaults: serde_json::Value,
    supplied: Option<&serde_json::Value>,
) -> serde_json::Value {
    let Some(serde_json::Value::Object(supplied)) = supplied else {
        return defaults;
    };
    let mut merged = match defaults {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    for (key, value) in supplied {
        merged.insert(key.clone(), value.clone());
    }
    serde_json::Value::Object(merged)
}
