//! Routes inbound events to the command registered under their name.
//!
//! Failures never escape: unknown commands and handler errors are logged and
//! the user gets a generic ephemeral notice.

use crate::commands::{CommandRegistry, FormSelection, Invocation};
use crate::model::AppState;
use crate::reply::{ReplyChannel, ReplyPayload};
use anyhow::anyhow;
use std::sync::Arc;
use tracing::{error, info};

pub const GENERIC_FAILURE: &str = "There was an error while executing this command!";

pub struct Dispatcher {
    registry: CommandRegistry,
    state: Arc<AppState>,
}

impl Dispatcher {
    pub fn new(registry: CommandRegistry, state: Arc<AppState>) -> Self {
        Self { registry, state }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub async fn dispatch(&self, invocation: &Invocation, reply: &mut dyn ReplyChannel) {
        info!(target = "dispatch", command = %invocation.command, "received command");
        let result = match self.registry.get(&invocation.command) {
            Some(command) => command.execute(&self.state, invocation, reply).await,
            None => Err(anyhow!(
                "no command matching `{}` was found",
                invocation.command
            )),
        };
        if let Err(e) = result {
            error!(target = "dispatch", command = %invocation.command, error = ?e, "error executing command");
            notify_failure(reply).await;
        }
    }

    /// Autocomplete failures are only logged; there is nothing useful to show.
    pub async fn suggest(&self, invocation: &Invocation, reply: &mut dyn ReplyChannel) {
        let Some(command) = self.registry.get(&invocation.command) else {
            error!(target = "dispatch", command = %invocation.command, "no command found for autocomplete");
            return;
        };
        if let Err(e) = command.autocomplete(&self.state, invocation, reply).await {
            error!(target = "dispatch", command = %invocation.command, error = ?e, "error handling autocomplete");
        }
    }

    /// Form components are routed by the command name before the first `_` of their id.
    pub async fn select(&self, selection: &FormSelection, reply: &mut dyn ReplyChannel) {
        let family = selection.custom_id.split('_').next().unwrap_or_default();
        let result = match self.registry.get(family) {
            Some(command) => command.select(&self.state, selection, reply).await,
            None => Err(anyhow!(
                "no command owns component `{}`",
                selection.custom_id
            )),
        };
        if let Err(e) = result {
            error!(target = "dispatch", cid = %selection.custom_id, error = ?e, "error handling form selection");
            notify_failure(reply).await;
        }
    }
}

async fn notify_failure(reply: &mut dyn ReplyChannel) {
    let notice = ReplyPayload::text(GENERIC_FAILURE).ephemeral();
    let sent = if reply.is_acknowledged() {
        reply.follow_up(notice).await
    } else {
        reply.send(notice).await
    };
    if let Err(e) = sent {
        error!(target = "dispatch", error = ?e, "failed to send failure notice");
    }
}
