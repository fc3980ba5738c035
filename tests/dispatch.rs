//! Dispatcher routing and its failure boundary.
mod common;

use async_trait::async_trait;
use common::{FakePricing, PriceOutcome, RecordingReply, Sent, harness};
use krakendeals_bot::AppState;
use krakendeals_bot::commands::{
    Caller, CommandRegistry, FormSelection, Invocation, SlashCommand,
};
use krakendeals_bot::dispatch::{Dispatcher, GENERIC_FAILURE};
use krakendeals_bot::preferences::PreferencesStore;
use krakendeals_bot::reply::{ReplyChannel, ReplyPayload};
use serenity::builder::CreateCommand;
use std::sync::Arc;

/// Acknowledges, then fails.
struct Flaky;

#[async_trait]
impl SlashCommand for Flaky {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("flaky").description("fails after deferring")
    }

    async fn execute(
        &self,
        _state: &AppState,
        _invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        reply.defer(true).await?;
        anyhow::bail!("boom")
    }
}

fn generic_notice() -> ReplyPayload {
    ReplyPayload::text(GENERIC_FAILURE).ephemeral()
}

#[tokio::test]
async fn ping_replies_pong() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard(), h.state.clone());
    let mut reply = RecordingReply::new();
    d.dispatch(&Invocation::new("ping"), &mut reply).await;
    assert_eq!(reply.sent, vec![Sent::Send(ReplyPayload::text("Pong Dude !"))]);
}

#[tokio::test]
async fn help_is_ephemeral_document() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard(), h.state.clone());
    let mut reply = RecordingReply::new();
    d.dispatch(&Invocation::new("help"), &mut reply).await;
    let Sent::Send(payload) = &reply.sent[0] else {
        panic!("expected a direct reply");
    };
    assert!(payload.ephemeral);
    let doc = payload.document.as_ref().unwrap();
    assert!(doc.field("/price <game> [currency]").is_some());
    assert!(doc.field("/config").is_some());
}

#[tokio::test]
async fn unknown_command_gets_generic_notice() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard(), h.state.clone());
    let mut reply = RecordingReply::new();
    d.dispatch(&Invocation::new("nope"), &mut reply).await;
    assert_eq!(reply.sent, vec![Sent::Send(generic_notice())]);
}

#[tokio::test]
async fn failure_after_acknowledge_follows_up() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard().with(Flaky), h.state.clone());
    let mut reply = RecordingReply::new();
    d.dispatch(&Invocation::new("flaky"), &mut reply).await;
    assert_eq!(
        reply.sent,
        vec![
            Sent::Defer { ephemeral: true },
            Sent::FollowUp(generic_notice())
        ]
    );
}

#[tokio::test]
async fn storage_failure_is_not_shown_verbatim() {
    let dir = tempfile::tempdir().unwrap();
    // The store path is a directory, so every read fails.
    let state = Arc::new(AppState::new(
        PreferencesStore::new(dir.path()),
        Arc::new(FakePricing::new(PriceOutcome::Missing)),
    ));
    let d = Dispatcher::new(CommandRegistry::standard(), state);
    let mut reply = RecordingReply::new();
    let inv = Invocation::new("price")
        .with_caller(Caller {
            server_id: Some("g".into()),
            ..Caller::default()
        })
        .with_option("game", "1|Celeste");
    d.dispatch(&inv, &mut reply).await;
    assert_eq!(reply.sent, vec![Sent::Send(generic_notice())]);
}

#[tokio::test]
async fn unknown_autocomplete_sends_nothing() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard(), h.state.clone());
    let mut reply = RecordingReply::new();
    d.suggest(&Invocation::new("nope").with_focused("abc"), &mut reply)
        .await;
    assert!(reply.sent.is_empty());
}

#[tokio::test]
async fn commands_without_suggestions_answer_empty() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard(), h.state.clone());
    let mut reply = RecordingReply::new();
    d.suggest(&Invocation::new("help").with_focused("abc"), &mut reply)
        .await;
    assert_eq!(reply.suggestions(), Some(&Vec::new()));
}

#[tokio::test]
async fn selection_for_unowned_component_gets_generic_notice() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard(), h.state.clone());
    let mut reply = RecordingReply::new();
    let sel = FormSelection {
        custom_id: "ping_button".into(),
        values: vec![],
        caller: Caller::default(),
    };
    d.select(&sel, &mut reply).await;
    assert_eq!(reply.sent, vec![Sent::Send(generic_notice())]);
}

#[tokio::test]
async fn acknowledged_channel_gets_follow_up_for_unknown_command() {
    let h = harness(FakePricing::new(PriceOutcome::Missing));
    let d = Dispatcher::new(CommandRegistry::standard(), h.state.clone());
    let mut reply = RecordingReply::acknowledged();
    d.dispatch(&Invocation::new("nope"), &mut reply).await;
    assert_eq!(reply.sent, vec![Sent::FollowUp(generic_notice())]);
}
