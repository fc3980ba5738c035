//! Per-server display preferences persisted as a single JSON document.
//!
//! The whole file is the unit of load and save: every mutation reads the full
//! mapping, overlays the change and rewrites the file. There is no locking, so
//! two simultaneous writes for the same server resolve as last-writer-wins.
//!
//! Records are decoded one at a time from raw JSON. A malformed field only
//! affects its own server, and keys this module does not know are written back
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::fs;
use tracing::{debug, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub const ALL: [Currency; 3] = [Currency::Gbp, Currency::Usd, Currency::Eur];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Gbp => "GBP",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            Self::Gbp => "British Pound Sterling",
            Self::Usd => "United States Dollar",
            Self::Eur => "Euro",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "GBP" => Ok(Self::Gbp),
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            _ => Err(()),
        }
    }
}

/// A stored preference record. Fields are optional because records written by
/// hand (or by older versions) may be partial, and reads return them verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_keyshops: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,
}

pub const DEFAULT_PREFERENCES: ServerPreferences = ServerPreferences {
    allow_keyshops: Some(true),
    currency: Some(Currency::Gbp),
};

impl ServerPreferences {
    /// A record with no fields set; the identity for [`ServerPreferences::overlay`].
    pub const fn empty() -> Self {
        Self {
            allow_keyshops: None,
            currency: None,
        }
    }

    /// Fields set on `top` win; everything else is kept from `self`.
    pub fn overlay(self, top: ServerPreferences) -> Self {
        Self {
            allow_keyshops: top.allow_keyshops.or(self.allow_keyshops),
            currency: top.currency.or(self.currency),
        }
    }

    /// Keyshops are included unless explicitly disabled.
    pub fn keyshops_enabled(&self) -> bool {
        self.allow_keyshops != Some(false)
    }

    pub fn currency_or_default(&self) -> Currency {
        self.currency.unwrap_or(Currency::Gbp)
    }

    /// Decode one stored record. Fields that are missing or hold an
    /// unrecognised value read as unset; a non-object record reads as empty.
    pub fn from_record(server_id: &str, record: &Value) -> Self {
        let Some(fields) = record.as_object() else {
            warn!(target = "preferences", server_id, "record is not an object");
            return Self::empty();
        };
        let allow_keyshops = fields.get("allowKeyshops").and_then(|v| match v {
            Value::Bool(b) => Some(*b),
            Value::Null => None,
            other => {
                warn!(target = "preferences", server_id, value = %other, "ignoring allowKeyshops");
                None
            }
        });
        let currency = fields.get("currency").and_then(|v| match v {
            Value::Null => None,
            other => {
                let parsed = other.as_str().and_then(|c| c.parse::<Currency>().ok());
                if parsed.is_none() {
                    warn!(target = "preferences", server_id, value = %other, "ignoring currency");
                }
                parsed
            }
        });
        Self {
            allow_keyshops,
            currency,
        }
    }

    /// Write the set fields into `record`, leaving its other keys alone.
    fn write_into(&self, record: &mut Map<String, Value>) {
        if let Some(allow) = self.allow_keyshops {
            record.insert("allowKeyshops".to_string(), Value::Bool(allow));
        }
        if let Some(currency) = self.currency {
            record.insert("currency".to_string(), Value::from(currency.code()));
        }
    }
}

/// A single-key change, the typed form of `update(server, key, value)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceUpdate {
    AllowKeyshops(bool),
    Currency(Currency),
}

impl PreferenceUpdate {
    pub fn key(&self) -> &'static str {
        match self {
            Self::AllowKeyshops(_) => "allowKeyshops",
            Self::Currency(_) => "currency",
        }
    }

    pub fn as_patch(&self) -> ServerPreferences {
        match *self {
            Self::AllowKeyshops(v) => ServerPreferences {
                allow_keyshops: Some(v),
                currency: None,
            },
            Self::Currency(c) => ServerPreferences {
                allow_keyshops: None,
                currency: Some(c),
            },
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Full on-disk mapping, server id -> raw record. Ordered so rewrites are stable.
pub type PreferencesFile = Map<String, Value>;

#[derive(Debug, Clone)]
pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored record for `server_id` as written, or a copy of the defaults.
    #[instrument(level = "debug", skip(self))]
    pub async fn get(&self, server_id: &str) -> Result<ServerPreferences, StoreError> {
        let all = self.load().await?;
        Ok(all
            .get(server_id)
            .map(|record| ServerPreferences::from_record(server_id, record))
            .unwrap_or(DEFAULT_PREFERENCES))
    }

    /// Stores `defaults ⊕ existing ⊕ patch` and returns the merged record.
    #[instrument(level = "debug", skip(self))]
    pub async fn set(
        &self,
        server_id: &str,
        patch: ServerPreferences,
    ) -> Result<ServerPreferences, StoreError> {
        let mut all = self.load().await?;
        let existing = all
            .get(server_id)
            .map(|record| ServerPreferences::from_record(server_id, record))
            .unwrap_or(ServerPreferences::empty());
        let merged = DEFAULT_PREFERENCES.overlay(existing).overlay(patch);
        let mut record = match all.remove(server_id) {
            Some(Value::Object(fields)) => fields,
            _ => Map::new(),
        };
        merged.write_into(&mut record);
        all.insert(server_id.to_string(), Value::Object(record));
        self.save(&all).await?;
        debug!(target = "preferences", server_id, ?merged, "preferences saved");
        Ok(merged)
    }

    pub async fn update(
        &self,
        server_id: &str,
        change: PreferenceUpdate,
    ) -> Result<ServerPreferences, StoreError> {
        self.set(server_id, change.as_patch()).await
    }

    async fn load(&self) -> Result<PreferencesFile, StoreError> {
        match fs::read_to_string(&self.path).await {
            Ok(data) => Ok(serde_json::from_str(&data)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(PreferencesFile::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, all: &PreferencesFile) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).await?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(all)?).await?;
        Ok(())
    }
}
