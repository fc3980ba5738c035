use super::{Invocation, SlashCommand};
use crate::model::AppState;
use crate::reply::{ReplyChannel, ReplyPayload};
use async_trait::async_trait;
use serenity::builder::CreateCommand;

pub const PONG: &str = "Pong Dude !";

pub struct Ping;

#[async_trait]
impl SlashCommand for Ping {
    fn name(&self) -> &'static str {
        "ping"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("ping").description("Replies with Pong!")
    }

    async fn execute(
        &self,
        _state: &AppState,
        _invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        reply.send(ReplyPayload::text(PONG)).await
    }
}
