//! Gateway event handler: translates serenity interactions into dispatcher calls.

use crate::commands::{Caller, FormSelection, Invocation};
use crate::dispatch::Dispatcher;
use crate::forms::CONFIG_FORM_PREFIX;
use crate::permissions::{MemberAuthority, ServerOwnership};
use crate::reply::InteractionReply;
use serenity::all::ComponentInteractionDataKind;
use serenity::async_trait;
use serenity::client::Context;
use serenity::model::application::{
    CommandDataOptionValue, CommandInteraction, ComponentInteraction, Interaction,
};
use serenity::model::gateway::Ready;
use serenity::model::guild::Member;
use serenity::model::id::GuildId;
use serenity::prelude::EventHandler;
use std::sync::Arc;
use tracing::{debug, info};

pub struct Handler {
    pub dispatcher: Arc<Dispatcher>,
}

fn caller(ctx: &Context, guild_id: Option<GuildId>, member: Option<&Member>) -> Caller {
    // Owner comes from the guild cache, which the GUILDS intent keeps populated.
    let server = guild_id.and_then(|id| {
        ctx.cache.guild(id).map(|g| ServerOwnership {
            owner_id: g.owner_id,
        })
    });
    Caller {
        server_id: guild_id.map(|id| id.get().to_string()),
        member: member.map(MemberAuthority::from_member),
        server,
    }
}

fn invocation(ctx: &Context, command: &CommandInteraction) -> Invocation {
    let mut inv = Invocation::new(command.data.name.clone()).with_caller(caller(
        ctx,
        command.guild_id,
        command.member.as_deref(),
    ));
    for opt in &command.data.options {
        if let CommandDataOptionValue::String(value) = &opt.value {
            inv = inv.with_option(opt.name.clone(), value.clone());
        }
    }
    if let Some(focused) = command.data.autocomplete() {
        inv = inv.with_focused(focused.value);
    }
    inv
}

fn form_selection(ctx: &Context, component: &ComponentInteraction) -> Option<FormSelection> {
    if !component.data.custom_id.starts_with(CONFIG_FORM_PREFIX) {
        return None;
    }
    let ComponentInteractionDataKind::StringSelect { values } = &component.data.kind else {
        return None;
    };
    Some(FormSelection {
        custom_id: component.data.custom_id.clone(),
        values: values.clone(),
        caller: caller(ctx, component.guild_id, component.member.as_ref()),
    })
}

#[async_trait]
impl EventHandler for Handler {
    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        match &interaction {
            Interaction::Command(command) => {
                let inv = invocation(&ctx, command);
                let mut reply = InteractionReply::command(&ctx, command);
                self.dispatcher.dispatch(&inv, &mut reply).await;
            }
            Interaction::Autocomplete(command) => {
                let inv = invocation(&ctx, command);
                let mut reply = InteractionReply::command(&ctx, command);
                self.dispatcher.suggest(&inv, &mut reply).await;
            }
            Interaction::Component(component) => match form_selection(&ctx, component) {
                Some(selection) => {
                    let mut reply = InteractionReply::component(&ctx, component);
                    self.dispatcher.select(&selection, &mut reply).await;
                }
                None => {
                    debug!(target = "dispatch", cid = %component.data.custom_id, "ignoring component");
                }
            },
            _ => {}
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!(
            user = %ready.user.name,
            commands = ?self.dispatcher.registry().names(),
            "connected and ready"
        );
    }
}
