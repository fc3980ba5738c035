//! Slash commands and the static table that names them.

pub mod config;
pub mod help;
pub mod ping;
pub mod price;

use crate::model::AppState;
use crate::permissions::{MemberAuthority, ServerOwnership};
use crate::reply::{ReplyChannel, ReplyPayload};
use anyhow::bail;
use async_trait::async_trait;
use serenity::builder::CreateCommand;
use std::collections::HashMap;
use std::sync::Arc;

pub const GUILD_ONLY: &str = "This command can only be used in a server.";

/// Who invoked an event and where.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caller {
    pub server_id: Option<String>,
    pub member: Option<MemberAuthority>,
    pub server: Option<ServerOwnership>,
}

/// A slash command invocation or an autocomplete request for one.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub command: String,
    pub caller: Caller,
    pub options: HashMap<String, String>,
    /// Partial input of the focused option (autocomplete only).
    pub focused: Option<String>,
}

impl Invocation {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ..Self::default()
        }
    }

    pub fn with_caller(mut self, caller: Caller) -> Self {
        self.caller = caller;
        self
    }

    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), value.into());
        self
    }

    pub fn with_focused(mut self, value: impl Into<String>) -> Self {
        self.focused = Some(value.into());
        self
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

/// A choice made on a form component belonging to a command.
#[derive(Debug, Clone, Default)]
pub struct FormSelection {
    pub custom_id: String,
    pub values: Vec<String>,
    pub caller: Caller,
}

#[async_trait]
pub trait SlashCommand: Send + Sync {
    fn name(&self) -> &'static str;

    fn register(&self) -> CreateCommand;

    async fn execute(
        &self,
        state: &AppState,
        invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()>;

    async fn autocomplete(
        &self,
        _state: &AppState,
        _invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        reply.suggest(Vec::new()).await
    }

    async fn select(
        &self,
        _state: &AppState,
        selection: &FormSelection,
        _reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        bail!(
            "`{}` has no form handler (component `{}`)",
            self.name(),
            selection.custom_id
        )
    }
}

/// Ephemeral "only in a server" notice. Returns the server id when present.
pub(crate) async fn require_server<'c>(
    caller: &'c Caller,
    reply: &mut dyn ReplyChannel,
) -> anyhow::Result<Option<&'c str>> {
    match caller.server_id.as_deref() {
        Some(id) => Ok(Some(id)),
        None => {
            reply.send(ReplyPayload::text(GUILD_ONLY).ephemeral()).await?;
            Ok(None)
        }
    }
}

/// Command name -> handler, fixed at startup.
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, Arc<dyn SlashCommand>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bot's full command set.
    pub fn standard() -> Self {
        Self::new()
            .with(price::Price)
            .with(config::Config)
            .with(help::Help)
            .with(ping::Ping)
    }

    pub fn with(mut self, command: impl SlashCommand + 'static) -> Self {
        self.commands.insert(command.name(), Arc::new(command));
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn SlashCommand>> {
        self.commands.get(name)
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.commands.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Platform schema for every command, for registration tooling.
    pub fn definitions(&self) -> Vec<CreateCommand> {
        self.names()
            .into_iter()
            .filter_map(|n| self.commands.get(n))
            .map(|c| c.register())
            .collect()
    }
}
