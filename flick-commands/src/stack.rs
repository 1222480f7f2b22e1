//! Fallback command chains.

use std::fmt;

use flick_config::CommandSpec;

use crate::registry::{CommandError, CommandRegistry};
use crate::{Command, CommandContext, GestureData};

/// Ordered chain of commands executed until one reports success.
///
/// This is a fallback chain, not a batch: commands after the first success
/// never run. A chain may be empty only while it is being edited; dispatch
/// construction rejects empty chains.
pub struct CommandStack {
    commands: Vec<Box<dyn Command>>,
}

impl CommandStack {
    pub fn new(commands: Vec<Box<dyn Command>>) -> Self {
        Self { commands }
    }

    /// Resolve serialized specs through the registry into an executable
    /// chain. Fails on an empty list or any unresolvable spec; a gesture
    /// with a broken chain is excluded rather than half-built.
    pub fn from_specs(
        registry: &CommandRegistry,
        specs: &[CommandSpec],
    ) -> Result<Self, CommandError> {
        if specs.is_empty() {
            return Err(CommandError::EmptyStack);
        }
        let commands = specs
            .iter()
            .map(|spec| registry.from_spec(spec))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { commands })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Kind tag of the first command; used to derive display labels.
    pub fn first_name(&self) -> Option<&str> {
        self.commands.first().map(|command| command.name())
    }

    /// Run the chain: each command in order, stopping at the first that
    /// resolves `true`. A command that resolves `false` or errors is logged
    /// and the next one is tried. Returns whether any command succeeded.
    pub async fn execute(&self, ctx: &CommandContext, data: &GestureData) -> bool {
        for command in &self.commands {
            match command.execute(ctx, data).await {
                Ok(true) => {
                    log::debug!("command '{}' handled the gesture", command.name());
                    return true;
                }
                Ok(false) => {
                    log::debug!("command '{}' declined, trying next", command.name());
                }
                Err(e) => {
                    log::warn!("command '{}' failed: {e:#}", command.name());
                }
            }
        }
        false
    }
}

// CommandStack holds trait objects, so derive(Debug) is unavailable; show
// the chain as its kind tags.
impl fmt::Debug for CommandStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.commands.iter().map(|c| c.name()))
            .finish()
    }
}
