use super::{FormSelection, Invocation, SlashCommand, require_server};
use crate::forms::{build_config_form, parse_selection};
use crate::model::AppState;
use crate::permissions::is_admin;
use crate::preferences::ServerPreferences;
use crate::reply::{ReplyChannel, ReplyPayload};
use async_trait::async_trait;
use serenity::builder::CreateCommand;
use tracing::{info, warn};

pub const NOT_ADMIN: &str = "You need to be an administrator to use this command.";
pub const NOT_ADMIN_FORM: &str = "❌ You need administrator permissions to configure the bot.";
pub const UNKNOWN_OPTION: &str = "❌ That configuration option is not recognised.";

pub fn confirmation(prefs: &ServerPreferences) -> String {
    format!(
        "✅ **Configuration Updated!**\n• Keyshops: {}\n• Currency: {}",
        if prefs.keyshops_enabled() { "allowed" } else { "disallowed" },
        prefs.currency_or_default()
    )
}

pub struct Config;

#[async_trait]
impl SlashCommand for Config {
    fn name(&self) -> &'static str {
        "config"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("config")
            .description("Configure server preferences for KrakenDeals")
            .dm_permission(false)
    }

    async fn execute(
        &self,
        state: &AppState,
        invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        let caller = &invocation.caller;
        let Some(server_id) = require_server(caller, reply).await? else {
            return Ok(());
        };
        if !is_admin(caller.member.as_ref(), caller.server.as_ref()) {
            return reply.send(ReplyPayload::text(NOT_ADMIN).ephemeral()).await;
        }
        let prefs = state.preferences.get(server_id).await?;
        reply
            .send(ReplyPayload::form(build_config_form(&prefs)).ephemeral())
            .await
    }

    async fn select(
        &self,
        state: &AppState,
        selection: &FormSelection,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        let caller = &selection.caller;
        let Some(server_id) = require_server(caller, reply).await? else {
            return Ok(());
        };
        if !is_admin(caller.member.as_ref(), caller.server.as_ref()) {
            return reply.send(ReplyPayload::text(NOT_ADMIN_FORM).ephemeral()).await;
        }
        let value = selection.values.first().map(String::as_str).unwrap_or_default();
        let Some(change) = parse_selection(&selection.custom_id, value) else {
            warn!(target = "config", cid = %selection.custom_id, value, "unrecognised selection");
            return reply.send(ReplyPayload::text(UNKNOWN_OPTION).ephemeral()).await;
        };
        let prefs = state.preferences.update(server_id, change).await?;
        info!(target = "config", server_id, key = change.key(), "preference updated");
        reply
            .send(ReplyPayload::text(confirmation(&prefs)).ephemeral())
            .await
    }
}
