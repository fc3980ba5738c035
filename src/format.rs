//! Turns a price payload into a display document.
//!
//! Everything here is pure; [`Document::to_embed`] is the only point that
//! touches serenity builders.

use crate::api::{HistoricalLow, PriceResult, SteamDeck, SteamReview};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serenity::builder::{CreateEmbed, CreateEmbedFooter};
use serenity::model::Timestamp;
use std::fmt::Display;

pub const COLOR_BRAND: u32 = 0x800080;
pub const MAX_LISTED_OFFERS: usize = 5;
pub const NO_PRICE_DATA: &str = "❌ No price data found for this game.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline,
        }
    }
}

/// Platform-neutral model of an embed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub title: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub color: Option<u32>,
    pub thumbnail: Option<String>,
    pub fields: Vec<Field>,
    pub footer: Option<String>,
    /// Stamp with the send time when rendered.
    pub timestamped: bool,
}

impl Document {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn to_embed(&self) -> CreateEmbed {
        let mut embed = CreateEmbed::new();
        if let Some(title) = &self.title {
            embed = embed.title(title);
        }
        if let Some(url) = self.url.as_ref().filter(|u| !u.is_empty()) {
            embed = embed.url(url);
        }
        if let Some(description) = &self.description {
            embed = embed.description(description);
        }
        if let Some(color) = self.color {
            embed = embed.color(color);
        }
        if let Some(thumbnail) = &self.thumbnail {
            embed = embed.thumbnail(thumbnail);
        }
        for f in &self.fields {
            embed = embed.field(&f.name, &f.value, f.inline);
        }
        if let Some(footer) = &self.footer {
            embed = embed.footer(CreateEmbedFooter::new(footer));
        }
        if self.timestamped {
            embed = embed.timestamp(Timestamp::now());
        }
        embed
    }
}

pub fn currency_symbol(code: &str) -> &str {
    match code {
        "GBP" => "£",
        "USD" => "$",
        "EUR" => "€",
        other => other,
    }
}

pub fn format_price(amount: f64, currency: &str) -> String {
    format!("{}{:.2}", currency_symbol(currency), amount)
}

fn format_optional_price(amount: Option<f64>, currency: &str) -> String {
    amount.map_or_else(|| "N/A".to_string(), |a| format_price(a, currency))
}

/// Whole-number discount of `lowest` against `base`. Only produced when both
/// prices are present and non-zero.
pub fn discount_percent(base: Option<f64>, lowest: Option<f64>) -> Option<i64> {
    let (base, lowest) = (base?, lowest?);
    if base == 0.0 || lowest == 0.0 {
        return None;
    }
    // Half-up rounding.
    Some(((base - lowest) / base * 100.0 + 0.5).floor() as i64)
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Protocol-relative image URLs are served over https.
pub fn normalize_image_url(url: &str) -> String {
    if url.starts_with("//") {
        format!("https:{url}")
    } else {
        url.to_string()
    }
}

pub fn steam_deck_label(tier: Option<&str>) -> String {
    let Some(tier) = tier.filter(|t| !t.is_empty()) else {
        return "❓ Unknown".to_string();
    };
    let label = match tier.to_lowercase().as_str() {
        "verified" => "✅ Verified",
        "playable" => "⚠️ Playable",
        "unsupported" => "❌ Unsupported",
        "unknown" => "❓ Unknown",
        "platinum" => "✅ Platinum",
        "gold" => "🟡 Gold",
        "silver" => "⚪ Silver",
        "bronze" => "🟤 Bronze",
        _ => {
            let mut chars = tier.chars();
            let capitalized = match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            };
            return format!("🎮 {capitalized}");
        }
    };
    label.to_string()
}

pub fn review_marker(score: f64) -> &'static str {
    if score < 70.0 {
        "🔴"
    } else if score < 80.0 {
        "🟡"
    } else {
        "🟢"
    }
}

/// `2024-03-05` / RFC 3339 timestamps render as `5 Mar 2024`; anything else is shown raw.
pub fn format_date(raw: &str) -> String {
    let date = DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"));
    match date {
        Ok(d) => d.format("%-d %b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn offers_field(data: &PriceResult, game_name: &str) -> Field {
    if data.offers.is_empty() {
        return Field::new(
            "Prices",
            format!(
                "**{}** price{} available",
                data.price_count,
                plural(data.price_count)
            ),
            false,
        );
    }
    let shown = &data.offers[..data.offers.len().min(MAX_LISTED_OFFERS)];
    let mut value = shown
        .iter()
        .map(|o| {
            format!(
                "[{}]({}) - {}",
                o.provider_name,
                o.link,
                format_price(o.price, &data.currency)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");
    let remaining = data.price_count.saturating_sub(shown.len() as u32);
    if remaining > 0 {
        value.push_str(&format!(
            "\n\n*{remaining} more price{} available here: [{game_name}]({})*",
            plural(remaining),
            data.game_url
        ));
    }
    Field::new("Cheapest Prices", value, false)
}

fn historical_low_line(low: &HistoricalLow, currency: &str) -> String {
    let status = if low.is_active { "✅" } else { "❌" };
    format!(
        "📉 **Historical Low:** {} on {} ({}) {status}",
        format_price(low.lowest_price, currency),
        format_date(&low.lowest_date),
        low.provider_name
    )
}

fn steam_deck_line(deck: &SteamDeck) -> String {
    let score = match deck.score {
        Some(s) if s != 0.0 => format!(" ({:.0}%)", s * 100.0),
        _ => String::new(),
    };
    format!(
        "🎮 **Steam Deck:** {}{score}",
        steam_deck_label(deck.tier.as_deref())
    )
}

fn steam_review_line(review: &SteamReview) -> String {
    format!(
        "⭐ **Steam Reviews:** {} {:.1}% [View on Steam]({})",
        review_marker(review.score),
        review.score,
        review.url
    )
}

fn annotations_field(data: &PriceResult) -> Option<Field> {
    let lines: Vec<String> = [
        data.historical_low
            .as_ref()
            .map(|l| historical_low_line(l, &data.currency)),
        data.steam_deck.as_ref().map(steam_deck_line),
        data.steam_review.as_ref().map(steam_review_line),
    ]
    .into_iter()
    .flatten()
    .collect();
    if lines.is_empty() {
        None
    } else {
        Some(Field::new("Additional Information", lines.join("\n"), false))
    }
}

pub fn price_document(game_name: &str, data: &PriceResult, keyshops_enabled: bool) -> Document {
    let discount = discount_percent(data.base_price, data.lowest_price)
        .map(|d| format!(" ({d}% off)"))
        .unwrap_or_default();
    let description = format!(
        "**Lowest Price:** {}{discount}\n**Base Price:** {}",
        format_optional_price(data.lowest_price, &data.currency),
        format_optional_price(data.base_price, &data.currency)
    );

    let mut fields = vec![offers_field(data, game_name)];
    fields.extend(annotations_field(data));

    Document {
        title: Some(game_name.to_string()),
        url: Some(data.game_url.clone()),
        description: Some(description),
        color: Some(COLOR_BRAND),
        thumbnail: data
            .image_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .map(normalize_image_url),
        fields,
        footer: Some(format!(
            "Currency: {} • Keyshops {}",
            data.currency,
            if keyshops_enabled { "Enabled" } else { "Disabled" }
        )),
        timestamped: true,
    }
}

/// Reply text for a failed price lookup. Includes the error text verbatim.
pub fn price_failure_message(game_name: &str, error: &dyn Display) -> String {
    format!(
        "❌ **Error fetching price information**\nCould not retrieve price data for **{game_name}**.\n`{error}`"
    )
}
