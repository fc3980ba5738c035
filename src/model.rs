//! Shared services handed to every command handler.

use crate::api::{PricingApi, PricingClient};
use crate::config::BotConfig;
use crate::preferences::PreferencesStore;
use std::sync::Arc;

/// The central, shared state of the bot. Read-only after startup; per-server
/// state round-trips through the preferences file.
pub struct AppState {
    pub preferences: PreferencesStore,
    pub pricing: Arc<dyn PricingApi>,
}

impl AppState {
    pub fn new(preferences: PreferencesStore, pricing: Arc<dyn PricingApi>) -> Self {
        Self {
            preferences,
            pricing,
        }
    }

    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            PreferencesStore::new(&config.preferences_path),
            Arc::new(PricingClient::new(&config.api_url, config.api_key.clone())),
        )
    }
}
