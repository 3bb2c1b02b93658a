use alloc::collections::BTreeMap;
use alloc::format;
use alloc::string::{String, ToString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("could not encode value: {0}")]
    Encode(String),
    #[error("storage write failed: {0}")]
    Write(String),
}

/// String key-value backend, e.g. browser local storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> core::result::Result<(), StoreError>;
    fn remove(&mut self, key: &str);
}

/// Types persisted under a fixed key.
pub trait StorageKey {
    const KEY: &'static str;
}

/// Reads a value, treating missing or unreadable data as absent.
pub fn load<T, S>(store: &S) -> Option<T>
where
    T: StorageKey + DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let raw = store.get(T::KEY)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("ignoring unreadable {}: {}", T::KEY, err);
            None
        }
    }
}

pub fn load_or_default<T, S>(store: &S) -> T
where
    T: StorageKey + DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    load(store).unwrap_or_default()
}

/// Writes a value. Failures are logged, never surfaced to the game.
pub fn save<T, S>(store: &mut S, value: &T) -> bool
where
    T: StorageKey + Serialize,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(|err| StoreError::Encode(err.to_string()))
        .and_then(|json| store.set(T::KEY, &json));

    match result {
        Ok(()) => true,
        Err(err) => {
            log::error!("failed to save {}: {}", T::KEY, err);
            false
        }
    }
}

pub fn clear<T, S>(store: &mut S)
where
    T: StorageKey,
    S: KeyValueStore + ?Sized,
{
    store.remove(T::KEY);
}

/// In-memory backend for tests and non-browser hosts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> core::result::Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Fastest winning time per difficulty, in seconds.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BestTimes {
    pub easy: Option<u32>,
    pub medium: Option<u32>,
    pub hard: Option<u32>,
}

impl BestTimes {
    pub fn get(&self, difficulty: Difficulty) -> Option<u32> {
        *self.slot(difficulty)
    }

    /// Records a winning time. Only a strictly faster time replaces the stored one.
    pub fn record(&mut self, difficulty: Difficulty, secs: u32) -> bool {
        let slot = self.slot_mut(difficulty);
        if slot.is_none_or(|best| secs < best) {
            *slot = Some(secs);
            log::debug!("new best time for {}: {}", difficulty, secs);
            true
        } else {
            false
        }
    }

    fn slot(&self, difficulty: Difficulty) -> &Option<u32> {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    fn slot_mut(&mut self, difficulty: Difficulty) -> &mut Option<u32> {
        match difficulty {
            Difficulty::Easy => &mut self.easy,
            Difficulty::Medium => &mut self.medium,
            Difficulty::Hard => &mut self.hard,
        }
    }
}

impl StorageKey for BestTimes {
    const KEY: &'static str = "kaboom:best-times:v1";
}

/// Formats seconds as `MM:SS`.
pub fn format_time(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
