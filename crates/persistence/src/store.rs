use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Number of days a saved form value is kept by default
pub const DEFAULT_TTL_DAYS: u32 = 30;

/// Longest time-to-live a value is stored with; larger TTLs are capped
pub const MAX_TTL_DAYS: u32 = 36_500;

/// Errors raised while writing to a store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored values could not be serialized
    #[error("Storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Small string key/value storage with per-key expiry.
///
/// `load` never fails: a missing key, an expired key and an unreadable
/// backend all yield `None`.
pub trait KeyValueStore {
    /// Stores `value` under `key` for `ttl_days` days
    fn save(&mut self, key: &str, value: &str, ttl_days: u32) -> Result<(), StoreError>;

    /// Returns the live value for `key`
    fn load(&self, key: &str) -> Option<String>;
}

/// A stored value along with its expiry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue {
    /// The stored string
    pub value: String,
    /// When the value stops being returned
    pub expires_at: DateTime<Utc>,
}

impl StoredValue {
    /// Creates a value expiring `ttl_days` after `now`, capped at `MAX_TTL_DAYS`
    pub fn new(value: &str, ttl_days: u32, now: DateTime<Utc>) -> Self {
        let expires_at = Duration::try_days(i64::from(ttl_days.min(MAX_TTL_DAYS)))
            .and_then(|ttl| now.checked_add_signed(ttl))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            value: value.to_string(),
            expires_at,
        }
    }

    /// Whether the value has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Store kept in process memory
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, StoredValue>,
}

impl MemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value with an explicit expiry
    pub fn insert(&mut self, key: &str, value: StoredValue) {
        self.values.insert(key.to_string(), value);
    }
}

impl KeyValueStore for MemoryStore {
    fn save(&mut self, key: &str, value: &str, ttl_days: u32) -> Result<(), StoreError> {
        self.values
            .insert(key.to_string(), StoredValue::new(value, ttl_days, Utc::now()));
        Ok(())
    }

    fn load(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .filter(|stored| !stored.is_expired(Utc::now()))
            .map(|stored| stored.value.clone())
    }
}
