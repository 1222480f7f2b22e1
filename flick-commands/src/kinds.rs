//! Built-in command kinds.
//!
//! The catalog a desktop host gets out of the box: clipboard, URL opening
//! and process spawning. Hosts with richer surfaces register additional
//! kinds through [`CommandRegistry::register`].
//!
//! Every kind follows the same shape: a serde settings struct whose
//! `Default` is the kind's default settings, a permission list, and an
//! `execute` that resolves `false` when the command has nothing to act on or
//! lacks a grant.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::registry::{CommandError, CommandRegistry, KindRegistration};
use crate::{Command, CommandContext, GestureData, Permission};

/// Register the built-in catalog.
pub fn register_builtin(registry: &mut CommandRegistry) {
    registry.register(
        "copy-text",
        KindRegistration {
            defaults: || json!({ "text": "" }),
            build: |settings| build::<CopyText>("copy-text", settings),
        },
    );
    registry.register(
        "open-url",
        KindRegistration {
            defaults: || json!({ "url": "" }),
            build: |settings| build::<OpenUrl>("open-url", settings),
        },
    );
    registry.register(
        "run-process",
        KindRegistration {
            defaults: || json!({ "command": "" }),
            build: |settings| build::<RunProcess>("run-process", settings),
        },
    );
    registry.register(
        "noop",
        KindRegistration {
            defaults: || json!({ "handled": false }),
            build: |settings| build::<Noop>("noop", settings),
        },
    );
}

fn build<C>(kind: &str, settings: serde_json::Value) -> Result<Box<dyn Command>, CommandError>
where
    C: Command + serde::de::DeserializeOwned + 'static,
{
    let command: C = serde_json::from_value(settings).map_err(|source| {
        CommandError::InvalidSettings {
            kind: kind.to_string(),
            source,
        }
    })?;
    Ok(Box::new(command))
}

/// Copy text to the system clipboard: the configured text, or the selection
/// at the gesture's target when none is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyText {
    text: String,
}

impl Default for CopyText {
    fn default() -> Self {
        Self {
            text: String::new(),
        }
    }
}

#[async_trait]
impl Command for CopyText {
    fn name(&self) -> &str {
        "copy-text"
    }

    fn permissions(&self) -> &[Permission] {
        &[Permission::Clipboard]
    }

    async fn execute(&self, ctx: &CommandContext, _data: &GestureData) -> anyhow::Result<bool> {
        if !ctx.has_permission(Permission::Clipboard) {
            return Ok(false);
        }
        let text = if self.text.is_empty() {
            match ctx.target.selection.as_deref() {
                Some(selection) if !selection.is_empty() => selection.to_string(),
                _ => return Ok(false),
            }
        } else {
            self.text.clone()
        };
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(true)
    }
}

/// Open a URL with the platform handler: the configured URL, or the link
/// under the pointer when none is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenUrl {
    url: String,
}

impl Default for OpenUrl {
    fn default() -> Self {
        Self { url: String::new() }
    }
}

#[async_trait]
impl Command for OpenUrl {
    fn name(&self) -> &str {
        "open-url"
    }

    fn permissions(&self) -> &[Permission] {
        &[Permission::Navigation]
    }

    async fn execute(&self, ctx: &CommandContext, _data: &GestureData) -> anyhow::Result<bool> {
        if !ctx.has_permission(Permission::Navigation) {
            return Ok(false);
        }
        let url = if self.url.is_empty() {
            match ctx.target.href.as_deref() {
                Some(href) if !href.is_empty() => href.to_string(),
                _ => return Ok(false),
            }
        } else {
            self.url.clone()
        };
        open::that(&url)?;
        Ok(true)
    }
}

/// Spawn a process from a configured command line. The line is split with
/// shell quoting rules, never handed to a shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunProcess {
    command: String,
}

impl Default for RunProcess {
    fn default() -> Self {
        Self {
            command: String::new(),
        }
    }
}

#[async_trait]
impl Command for RunProcess {
    fn name(&self) -> &str {
        "run-process"
    }

    fn permissions(&self) -> &[Permission] {
        &[Permission::Shell]
    }

    async fn execute(&self, ctx: &CommandContext, _data: &GestureData) -> anyhow::Result<bool> {
        if !ctx.has_permission(Permission::Shell) {
            return Ok(false);
        }
        if self.command.is_empty() {
            return Ok(false);
        }
        let words = shell_words::split(&self.command)?;
        let Some((program, args)) = words.split_first() else {
            return Ok(false);
        };
        tokio::process::Command::new(program).args(args).spawn()?;
        Ok(true)
    }
}

/// Placeholder that reports a fixed outcome. Useful as a chain terminator
/// and in tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Noop {
    handled: bool,
}

#[async_trait]
impl Command for Noop {
    fn name(&self) -> &str {
        "noop"
    }

    async fn execute(&self, _ctx: &CommandContext, _data: &GestureData) -> anyhow::Result<bool> {
        Ok(self.handled)
    }
}
