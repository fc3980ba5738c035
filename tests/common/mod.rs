//! Shared test doubles: a reply channel that records what was sent and a
//! pricing API that serves canned data.
#![allow(dead_code)]

use async_trait::async_trait;
use krakendeals_bot::AppState;
use krakendeals_bot::api::{ApiError, GameSearchResult, PriceQuery, PriceResult, PricingApi};
use krakendeals_bot::preferences::PreferencesStore;
use krakendeals_bot::reply::{ReplyChannel, ReplyPayload, Suggestion};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Defer { ephemeral: bool },
    Send(ReplyPayload),
    Edit(ReplyPayload),
    FollowUp(ReplyPayload),
    Suggest(Vec<Suggestion>),
}

#[derive(Default)]
pub struct RecordingReply {
    pub sent: Vec<Sent>,
    acknowledged: bool,
}

impl RecordingReply {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acknowledged() -> Self {
        Self {
            sent: Vec::new(),
            acknowledged: true,
        }
    }

    /// Text of the last message-bearing reply.
    pub fn last_text(&self) -> Option<&str> {
        self.sent.iter().rev().find_map(|s| match s {
            Sent::Send(p) | Sent::Edit(p) | Sent::FollowUp(p) => p.content.as_deref(),
            _ => None,
        })
    }

    pub fn suggestions(&self) -> Option<&Vec<Suggestion>> {
        self.sent.iter().find_map(|s| match s {
            Sent::Suggest(c) => Some(c),
            _ => None,
        })
    }
}

#[async_trait]
impl ReplyChannel for RecordingReply {
    fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    async fn defer(&mut self, ephemeral: bool) -> anyhow::Result<()> {
        self.acknowledged = true;
        self.sent.push(Sent::Defer { ephemeral });
        Ok(())
    }

    async fn send(&mut self, payload: ReplyPayload) -> anyhow::Result<()> {
        self.acknowledged = true;
        self.sent.push(Sent::Send(payload));
        Ok(())
    }

    async fn edit(&mut self, payload: ReplyPayload) -> anyhow::Result<()> {
        self.sent.push(Sent::Edit(payload));
        Ok(())
    }

    async fn follow_up(&mut self, payload: ReplyPayload) -> anyhow::Result<()> {
        self.sent.push(Sent::FollowUp(payload));
        Ok(())
    }

    async fn suggest(&mut self, choices: Vec<Suggestion>) -> anyhow::Result<()> {
        self.acknowledged = true;
        self.sent.push(Sent::Suggest(choices));
        Ok(())
    }
}

pub enum PriceOutcome {
    Found(PriceResult),
    Missing,
    Status(u16, &'static str),
}

pub struct FakePricing {
    pub games: Vec<GameSearchResult>,
    pub outcome: PriceOutcome,
    pub searches: Mutex<Vec<String>>,
    pub queries: Mutex<Vec<PriceQuery>>,
}

impl FakePricing {
    pub fn new(outcome: PriceOutcome) -> Self {
        Self {
            games: Vec::new(),
            outcome,
            searches: Mutex::new(Vec::new()),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn with_games(mut self, n: usize) -> Self {
        self.games = (0..n)
            .map(|i| GameSearchResult {
                id: i as i64,
                name: format!("Game {i}"),
            })
            .collect();
        self
    }

    pub fn search_count(&self) -> usize {
        self.searches.lock().unwrap().len()
    }

    pub fn last_query(&self) -> Option<PriceQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl PricingApi for FakePricing {
    async fn search_games(&self, query: &str) -> Vec<GameSearchResult> {
        self.searches.lock().unwrap().push(query.to_string());
        self.games.clone()
    }

    async fn fetch_price(&self, query: &PriceQuery) -> Result<Option<PriceResult>, ApiError> {
        self.queries.lock().unwrap().push(query.clone());
        match &self.outcome {
            PriceOutcome::Found(data) => Ok(Some(data.clone())),
            PriceOutcome::Missing => Ok(None),
            PriceOutcome::Status(status, reason) => Err(ApiError::Status {
                status: *status,
                reason: reason.to_string(),
            }),
        }
    }
}

pub fn sample_price() -> PriceResult {
    serde_json::from_value(serde_json::json!({
        "lowest_price": 22.34,
        "base_price": 33.5,
        "price_count": 7,
        "currency": "GBP",
        "game_url": "https://example.com/game",
        "image_url": "https://example.com/image.jpg",
        "cheapest_prices": [
            {"provider_name": "Test Store", "price": 22.34, "direct_link": "https://example.com"}
        ]
    }))
    .unwrap()
}

pub struct Harness {
    pub dir: tempfile::TempDir,
    pub pricing: Arc<FakePricing>,
    pub state: Arc<AppState>,
}

pub fn harness(pricing: FakePricing) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let pricing = Arc::new(pricing);
    let store = PreferencesStore::new(dir.path().join("data").join("preferences.json"));
    let state = Arc::new(AppState::new(store, pricing.clone()));
    Harness {
        dir,
        pricing,
        state,
    }
}
