use super::{Invocation, SlashCommand, require_server};
use crate::api::PriceQuery;
use crate::format::{NO_PRICE_DATA, price_document, price_failure_message};
use crate::model::AppState;
use crate::preferences::Currency;
use crate::reply::{ReplyChannel, ReplyPayload, Suggestion};
use async_trait::async_trait;
use serenity::builder::{CreateCommand, CreateCommandOption};
use serenity::model::application::CommandOptionType;
use tracing::{debug, error};

pub const MIN_QUERY_CHARS: usize = 2;
pub const MAX_SUGGESTIONS: usize = 25;
// Platform limit on a choice's name and value.
pub const MAX_CHOICE_LEN: usize = 100;

/// The `game` option: `"<igdb id>|<name>"` when picked from autocomplete,
/// free text otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameChoice {
    pub id: Option<i64>,
    pub name: String,
}

impl GameChoice {
    pub fn parse(raw: &str) -> Self {
        match raw.split_once('|') {
            Some((id, name)) => Self {
                id: id.trim().parse().ok(),
                name: name.to_string(),
            },
            None => Self {
                id: None,
                name: raw.to_string(),
            },
        }
    }

    pub fn encode(id: i64, name: &str) -> String {
        truncate_chars(&format!("{id}|{name}"), MAX_CHOICE_LEN)
    }
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

pub struct Price;

#[async_trait]
impl SlashCommand for Price {
    fn name(&self) -> &'static str {
        "price"
    }

    fn register(&self) -> CreateCommand {
        let currency = Currency::ALL.iter().fold(
            CreateCommandOption::new(
                CommandOptionType::String,
                "currency",
                "Currency for prices (defaults to server setting)",
            )
            .required(false),
            |opt, c| opt.add_string_choice(c.code(), c.code()),
        );
        CreateCommand::new("price")
            .description("Search for prices on a specific game")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "game",
                    "The name of the game to search for",
                )
                .required(true)
                .set_autocomplete(true),
            )
            .add_option(currency)
    }

    async fn autocomplete(
        &self,
        state: &AppState,
        invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        let query = invocation.focused.as_deref().unwrap_or_default();
        if query.chars().count() < MIN_QUERY_CHARS {
            return reply.suggest(Vec::new()).await;
        }
        let games = state.pricing.search_games(query).await;
        let choices = games
            .iter()
            .take(MAX_SUGGESTIONS)
            .map(|g| Suggestion {
                name: truncate_chars(&g.name, MAX_CHOICE_LEN),
                value: GameChoice::encode(g.id, &g.name),
            })
            .collect::<Vec<_>>();
        debug!(target = "dispatch", query, count = choices.len(), "price suggestions");
        reply.suggest(choices).await
    }

    async fn execute(
        &self,
        state: &AppState,
        invocation: &Invocation,
        reply: &mut dyn ReplyChannel,
    ) -> anyhow::Result<()> {
        let Some(server_id) = require_server(&invocation.caller, reply).await? else {
            return Ok(());
        };
        let game = GameChoice::parse(invocation.option("game").unwrap_or_default());
        let prefs = state.preferences.get(server_id).await?;
        let currency = invocation
            .option("currency")
            .and_then(|c| c.parse::<Currency>().ok())
            .unwrap_or_else(|| prefs.currency_or_default());
        let keyshops = prefs.keyshops_enabled();

        reply.defer(false).await?;

        let query = PriceQuery {
            game_id: game.id,
            game_name: game.name.clone(),
            server_id: server_id.to_string(),
            currency,
            include_keyshops: keyshops,
        };
        let payload = match state.pricing.fetch_price(&query).await {
            Ok(Some(mut data)) => {
                if data.currency.is_empty() {
                    data.currency = currency.code().to_string();
                }
                ReplyPayload::document(price_document(&game.name, &data, keyshops))
            }
            Ok(None) => ReplyPayload::text(NO_PRICE_DATA),
            Err(e) => {
                error!(target = "dispatch", command = "price", game = %game.name, error = %e, "error in price command");
                ReplyPayload::text(price_failure_message(&game.name, &e))
            }
        };
        reply.edit(payload).await
    }
}
