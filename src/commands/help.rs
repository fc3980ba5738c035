//! `/help`: an ephemeral overview of every command.

use super::{Invocation, SlashCommand};
use crate::format::{COLOR_BRAND, Document, Field};
use crate::model::AppState;
use crate::reply::{ReplyChannel, ReplyPayload};
use async_trait::async_trait;
use serenity::builder::CreateCommand;

const ISSUES_URL: &str = "https://github.com/jrugen/KrakenDeals/issues";

struct CommandInfo {
    usage: &'static str,
    details: &'static str,
}

const COMMANDS: &[CommandInfo] = &[
    CommandInfo {
        usage: "/price <game> [currency]",
        details: "Search for prices on a specific game\n\
                  • `game` - Game name (autocomplete enabled - start typing to see suggestions)\n\
                  • `currency` - Optional: Override server currency (GBP, USD, EUR)\n\n\
                  **Example:** `/price game:Satisfactory currency:GBP`",
    },
    CommandInfo {
        usage: "/config",
        details: "Configure server preferences (admin only)\n\
                  Opens a configuration form where you can:\n\
                  • Allow/Disallow keyshops in results\n\
                  • Set default currency (GBP, USD, EUR)",
    },
    CommandInfo {
        usage: "/help",
        details: "Show this help message",
    },
    CommandInfo {
        usage: "/ping",
        details: "Check that the bot is responding",
    },
];

/// Command usages listed by `/help`. Used by tests to check coverage.
pub fn listed_usages() -> Vec<&'static str> {
    COMMANDS.iter().map(|c| c.usage).collect()
}

pub fn help_document() -> Document {
    let mut fields: Vec<Field> = COMMANDS
        .iter()
        .map(|c| Field::new(c.usage, c.details, false))
        .collect();
    fields.push(Field::new(
        "🐛 Found a Bug?",
        format!("[Report it on GitHub]({ISSUES_URL})"),
        true,
    ));
    fields.push(Field::new(
        "💡 Have a Suggestion?",
        format!("[Request a Feature]({ISSUES_URL})"),
        true,
    ));
    Document {
        title: Some("KrakenDeals Commands".into()),
        description: Some("Here are all the available commands:".into()),
        color: Some(COLOR_BRAND),
        fields,
        footer: Some("Tip: Type /help at any time to see this list again".into()),
        timestamped: true,
        ..Document::default()
    }
}

pub struct Help;

#[async_trait]
impl SlashCommand for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn register(&self) -> CreateCommand {
        CreateCommand::new("help").description("Show all available commands and how to use them")
    }

    async fn execute(
        &self,
        _state: &AppState,
        _invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        reply
            .send(ReplyPayload::document(help_document()).ephemeral())
            .await
    }
}
