//! Pricing API client.
//!
//! Two remote calls: a game-name search feeding autocomplete and a price lookup
//! by IGDB id. Search never fails visibly (errors degrade to no suggestions);
//! price lookups propagate a descriptive [`ApiError`].

use crate::preferences::Currency;
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// `null` decodes like a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GameSearchResult {
    #[serde(rename = "igdb_id")]
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    games: Vec<GameSearchResult>,
}

/// Body of `POST /game-price`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuery {
    #[serde(rename = "igdb_id")]
    pub game_id: Option<i64>,
    pub game_name: String,
    pub server_id: String,
    pub currency: Currency,
    #[serde(rename = "keyshops")]
    pub include_keyshops: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Offer {
    pub provider_name: String,
    pub price: f64,
    #[serde(rename = "direct_link")]
    pub link: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HistoricalLow {
    pub lowest_price: f64,
    pub lowest_date: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub provider_name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SteamDeck {
    pub tier: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SteamReview {
    pub score: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceResult {
    #[serde(default)]
    pub lowest_price: Option<f64>,
    #[serde(default)]
    pub base_price: Option<f64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub price_count: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub currency: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub game_url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default, rename = "cheapest_prices", deserialize_with = "null_as_default")]
    pub offers: Vec<Offer>,
    #[serde(default)]
    pub historical_low: Option<HistoricalLow>,
    #[serde(default)]
    pub steam_deck: Option<SteamDeck>,
    #[serde(default)]
    pub steam_review: Option<SteamReview>,
}

#[derive(Debug, Deserialize)]
pub struct PriceResponse {
    #[serde(default)]
    pub data: Option<PriceResult>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("API Error: {status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("{0}")]
    Transport(#[from] reqwest::Error),
}

#[async_trait]
pub trait PricingApi: Send + Sync {
    /// Candidate games for a partial name. Empty on any failure.
    async fn search_games(&self, query: &str) -> Vec<GameSearchResult>;

    /// Price data for one game; `Ok(None)` when the API has nothing for it.
    async fn fetch_price(&self, query: &PriceQuery) -> Result<Option<PriceResult>, ApiError>;
}

pub struct PricingClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PricingClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.header(AUTHORIZATION, format!("Bearer {key}")),
            None => req,
        }
    }

    async fn try_search(&self, query: &str) -> Result<Vec<GameSearchResult>, ApiError> {
        let url = format!("{}/search-games", self.base_url);
        let resp = self
            .authorize(self.http.get(&url).query(&[("query", query)]))
            .send()
            .await?;
        let resp = check_status(resp)?;
        Ok(resp.json::<SearchResponse>().await?.games)
    }
}

fn check_status(resp: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    Err(ApiError::Status {
        status: status.as_u16(),
        reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
    })
}

#[async_trait]
impl PricingApi for PricingClient {
    async fn search_games(&self, query: &str) -> Vec<GameSearchResult> {
        match self.try_search(query).await {
            Ok(games) => {
                debug!(target = "pricing", query, count = games.len(), "search ok");
                games
            }
            Err(e) => {
                warn!(target = "pricing", query, error = %e, "error searching games");
                Vec::new()
            }
        }
    }

    async fn fetch_price(&self, query: &PriceQuery) -> Result<Option<PriceResult>, ApiError> {
        let url = format!("{}/game-price", self.base_url);
        let resp = self
            .authorize(self.http.post(&url).json(query))
            .send()
            .await
            .inspect_err(|e| warn!(target = "pricing", error = %e, "error fetching game price"))?;
        let resp = check_status(resp)
            .inspect_err(|e| warn!(target = "pricing", game = %query.game_name, error = %e, "price request rejected"))?;
        Ok(resp.json::<PriceResponse>().await?.data)
    }
}
