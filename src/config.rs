//! Process configuration loaded from the environment (optionally seeded by a `.env` file).

use std::path::PathBuf;
use tracing::warn;

pub const DEFAULT_API_URL: &str = "https://krakenkeys.com/api/v1/discord";
pub const DEFAULT_PREFERENCES_PATH: &str = "data/preferences.json";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("expected {0} in the environment")]
    Missing(&'static str),
}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub api_url: String,
    /// Bearer credential for the pricing API; absent when unset or empty.
    pub api_key: Option<String>,
    pub preferences_path: PathBuf,
    // Only used by command registration tooling; malformed values are dropped.
    pub client_id: Option<u64>,
    pub guild_id: Option<u64>,
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token =
            non_empty("DISCORD_BOT_TOKEN").ok_or(ConfigError::Missing("DISCORD_BOT_TOKEN"))?;
        let api_url = non_empty("KRAKENKEYS_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let preferences_path = non_empty("PREFERENCES_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_PATH));

        Ok(Self {
            discord_token,
            api_url,
            api_key: non_empty("KRAKENKEYS_API_KEY"),
            preferences_path,
            client_id: parse_id("CLIENT_ID", non_empty("CLIENT_ID")),
            guild_id: parse_id("GUILD_ID", non_empty("GUILD_ID")),
        })
    }
}

fn parse_id(var: &'static str, raw: Option<String>) -> Option<u64> {
    let value = raw?;
    match value.trim().parse::<u64>() {
        Ok(id) => Some(id),
        Err(_) => {
            warn!(target = "config", var, value = %value, "ignoring invalid id");
            None
        }
    }
}
