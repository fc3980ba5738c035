//! Reply channel: how a handler answers the invoking user.
//!
//! Handlers only see [`ReplyChannel`]; [`InteractionReply`] maps it onto
//! serenity interaction responses.

use crate::format::Document;
use crate::forms::FormDescriptor;
use anyhow::bail;
use async_trait::async_trait;
use serenity::builder::{
    CreateAutocompleteResponse, CreateInteractionResponse, CreateInteractionResponseFollowup,
    CreateInteractionResponseMessage, EditInteractionResponse,
};
use serenity::model::application::{CommandInteraction, ComponentInteraction};
use serenity::prelude::Context;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyPayload {
    pub content: Option<String>,
    pub document: Option<Document>,
    pub form: Option<FormDescriptor>,
    pub ephemeral: bool,
}

impl ReplyPayload {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn document(document: Document) -> Self {
        Self {
            document: Some(document),
            ..Self::default()
        }
    }

    pub fn form(form: FormDescriptor) -> Self {
        Self {
            content: Some(form.summary()),
            form: Some(form),
            ..Self::default()
        }
    }

    pub fn ephemeral(mut self) -> Self {
        self.ephemeral = true;
        self
    }
}

/// One autocomplete choice: what the user sees and the opaque value submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub name: String,
    pub value: String,
}

#[async_trait]
pub trait ReplyChannel: Send {
    /// True once an initial reply or a defer has been sent.
    fn is_acknowledged(&self) -> bool;

    /// "Will respond later"; must be followed by exactly one [`ReplyChannel::edit`].
    async fn defer(&mut self, ephemeral: bool) -> anyhow::Result<()>;

    /// Single immediate reply.
    async fn send(&mut self, payload: ReplyPayload) -> anyhow::Result<()>;

    /// Fill in a deferred reply.
    async fn edit(&mut self, payload: ReplyPayload) -> anyhow::Result<()>;

    /// Additional message after the interaction has been acknowledged.
    async fn follow_up(&mut self, payload: ReplyPayload) -> anyhow::Result<()>;

    async fn suggest(&mut self, choices: Vec<Suggestion>) -> anyhow::Result<()>;
}

#[derive(Clone, Copy)]
pub enum Target<'a> {
    Command(&'a CommandInteraction),
    Component(&'a ComponentInteraction),
}

pub struct InteractionReply<'a> {
    ctx: &'a Context,
    target: Target<'a>,
    acknowledged: bool,
}

impl<'a> InteractionReply<'a> {
    pub fn command(ctx: &'a Context, interaction: &'a CommandInteraction) -> Self {
        Self {
            ctx,
            target: Target::Command(interaction),
            acknowledged: false,
        }
    }

    pub fn component(ctx: &'a Context, interaction: &'a ComponentInteraction) -> Self {
        Self {
            ctx,
            target: Target::Component(interaction),
            acknowledged: false,
        }
    }

    async fn create_response(&self, builder: CreateInteractionResponse) -> serenity::Result<()> {
        match self.target {
            Target::Command(i) => i.create_response(&self.ctx.http, builder).await,
            Target::Component(i) => i.create_response(&self.ctx.http, builder).await,
        }
    }
}

fn message(payload: ReplyPayload) -> CreateInteractionResponseMessage {
    let mut builder = CreateInteractionResponseMessage::new().ephemeral(payload.ephemeral);
    if let Some(content) = payload.content {
        builder = builder.content(content);
    }
    if let Some(document) = payload.document {
        builder = builder.embed(document.to_embed());
    }
    if let Some(form) = payload.form {
        builder = builder.components(form.to_components());
    }
    builder
}

fn edit(payload: ReplyPayload) -> EditInteractionResponse {
    let mut builder = EditInteractionResponse::new();
    if let Some(content) = payload.content {
        builder = builder.content(content);
    }
    if let Some(document) = payload.document {
        builder = builder.embed(document.to_embed());
    }
    if let Some(form) = payload.form {
        builder = builder.components(form.to_components());
    }
    builder
}

fn followup(payload: ReplyPayload) -> CreateInteractionResponseFollowup {
    let mut builder = CreateInteractionResponseFollowup::new().ephemeral(payload.ephemeral);
    if let Some(content) = payload.content {
        builder = builder.content(content);
    }
    if let Some(document) = payload.document {
        builder = builder.embed(document.to_embed());
    }
    if let Some(form) = payload.form {
        builder = builder.components(form.to_components());
    }
    builder
}

#[async_trait]
impl ReplyChannel for InteractionReply<'_> {
    fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    async fn defer(&mut self, ephemeral: bool) -> anyhow::Result<()> {
        self.create_response(CreateInteractionResponse::Defer(
            CreateInteractionResponseMessage::new().ephemeral(ephemeral),
        ))
        .await?;
        self.acknowledged = true;
        Ok(())
    }

    async fn send(&mut self, payload: ReplyPayload) -> anyhow::Result<()> {
        self.create_response(CreateInteractionResponse::Message(message(payload)))
            .await?;
        self.acknowledged = true;
        Ok(())
    }

    async fn edit(&mut self, payload: ReplyPayload) -> anyhow::Result<()> {
        let builder = edit(payload);
        match self.target {
            Target::Command(i) => i.edit_response(&self.ctx.http, builder).await?,
            Target::Component(i) => i.edit_response(&self.ctx.http, builder).await?,
        };
        Ok(())
    }

    async fn follow_up(&mut self, payload: ReplyPayload) -> anyhow::Result<()> {
        let builder = followup(payload);
        match self.target {
            Target::Command(i) => i.create_followup(&self.ctx.http, builder).await?,
            Target::Component(i) => i.create_followup(&self.ctx.http, builder).await?,
        };
        Ok(())
    }

    async fn suggest(&mut self, choices: Vec<Suggestion>) -> anyhow::Result<()> {
        let Target::Command(interaction) = self.target else {
            bail!("autocomplete is only available for command interactions");
        };
        let response = choices
            .into_iter()
            .fold(CreateAutocompleteResponse::new(), |r, c| {
                r.add_string_choice(c.name, c.value)
            });
        interaction
            .create_response(&self.ctx.http, CreateInteractionResponse::Autocomplete(response))
            .await?;
        self.acknowledged = true;
        Ok(())
    }
}
