//! Command contract and fallback-chain dispatch for flick.
//!
//! A recognized gesture resolves to a [`CommandStack`]: an ordered chain of
//! [`Command`]s tried in turn until one reports success. Serialized command
//! specs are resolved through the [`registry::CommandRegistry`], which merges
//! kind defaults with supplied settings at construction time.

pub mod kinds;
pub mod registry;
pub mod stack;

use async_trait::async_trait;
use flick_pattern::{Pattern, Point};
use serde::{Deserialize, Serialize};

pub use registry::{CommandError, CommandRegistry, KindRegistration};
pub use stack::CommandStack;

/// Capability a command kind needs the host to have granted before it is
/// dispatched.
///
/// Negotiation happens in the host's settings surface when a gesture is
/// edited, never at gesture time; a command whose grant is missing fails
/// harmlessly instead of erroring into the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Clipboard,
    Navigation,
    Shell,
}

/// What the pointer was over when the gesture started, as reported by the
/// originating frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TargetContext {
    /// Link under the pointer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Media source under the pointer, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    /// Document title of the originating frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Selected text at gesture start, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection: Option<String>,
}

/// Host-side facilities a command executes against.
#[derive(Debug, Clone, Default)]
pub struct CommandContext {
    /// Target of the gesture that resolved to this command.
    pub target: TargetContext,
    /// Capabilities the host has granted.
    pub granted: Vec<Permission>,
}

impl CommandContext {
    pub fn has_permission(&self, permission: Permission) -> bool {
        self.granted.contains(&permission)
    }
}

/// The recognized gesture, handed to every command in the chain.
#[derive(Debug, Clone)]
pub struct GestureData {
    pub pattern: Pattern,
    /// Where the stroke started, in absolute screen coordinates.
    pub origin: Point,
}

/// One executable action of a gesture's fallback chain.
///
/// A command instance is exclusively owned by one [`CommandStack`] slot; its
/// settings are merged and validated once at construction and never change
/// afterwards.
#[async_trait]
pub trait Command: Send + Sync {
    /// Kind tag, identical to the serialized `name`.
    fn name(&self) -> &str;

    /// Capabilities this kind needs granted before dispatch.
    fn permissions(&self) -> &[Permission] {
        &[]
    }

    /// Run the command. `Ok(true)` means the gesture was handled and the
    /// chain stops; `Ok(false)` and `Err` both mean "try the next command".
    async fn execute(&self, ctx: &CommandContext, data: &GestureData) -> anyhow::Result<bool>;
}
