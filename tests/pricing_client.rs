//! Failure policy of the HTTP client against an address nothing listens on.
use krakendeals_bot::api::{ApiError, PriceQuery, PricingApi, PricingClient};
use krakendeals_bot::format::price_failure_message;
use krakendeals_bot::preferences::Currency;

fn unreachable_client() -> PricingClient {
    // Port 9 (discard) on loopback is closed on CI hosts.
    PricingClient::new("http://127.0.0.1:9/api", Some("secret".into()))
}

#[tokio::test]
async fn search_failure_degrades_to_empty() {
    let games = unreachable_client().search_games("satisfactory").await;
    assert!(games.is_empty());
}

#[tokio::test]
async fn price_transport_failure_propagates() {
    let query = PriceQuery {
        game_id: Some(123),
        game_name: "Satisfactory".into(),
        server_id: "g".into(),
        currency: Currency::Gbp,
        include_keyshops: true,
    };
    let err = unreachable_client().fetch_price(&query).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert!(price_failure_message("Satisfactory", &err).contains("Error"));
}
