use std::sync::Arc;

use krakendeals_bot::commands::CommandRegistry;
use krakendeals_bot::config::BotConfig;
use krakendeals_bot::dispatch::Dispatcher;
use krakendeals_bot::handler::Handler;
use krakendeals_bot::AppState;
use serenity::model::gateway::GatewayIntents;
use serenity::prelude::*;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // A missing .env is fine; real deployments set the environment directly.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match BotConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(1);
        }
    };
    info!(
        api_url = %config.api_url,
        preferences = %config.preferences_path.display(),
        "configuration loaded"
    );

    let state = Arc::new(AppState::from_config(&config));
    let dispatcher = Arc::new(Dispatcher::new(CommandRegistry::standard(), state));

    // Interactions arrive with GUILDS; the guild cache supplies owner ids.
    let intents = GatewayIntents::GUILDS;

    let mut client = match Client::builder(&config.discord_token, intents)
        .event_handler(Handler { dispatcher })
        .await
    {
        Ok(client) => client,
        Err(e) => {
            error!(error = ?e, "error creating the Discord client");
            std::process::exit(1);
        }
    };

    if let Err(why) = client.start().await {
        error!(error = ?why, "client error");
    }
}
