use std::collections::HashMap;
use taixiu_types::{History, BALANCE_KEY, HISTORY_KEY};
use tracing::{debug, warn};

/// Opaque string key-value store holding persisted game state.
///
/// Writes are fire-and-forget: implementations that can fail log the error
/// and carry on.
pub trait State {
    fn get(&self, key: &str) -> Option<String>;
    fn insert(&mut self, key: &str, value: String);
}

#[derive(Clone, Debug, Default)]
pub struct Memory {
    state: HashMap<String, String>,
}

impl Memory {
    pub fn with(entries: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        Self {
            state: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl State for Memory {
    fn get(&self, key: &str) -> Option<String> {
        self.state.get(key).cloned()
    }

    fn insert(&mut self, key: &str, value: String) {
        self.state.insert(key.to_string(), value);
    }
}

impl<S: State + ?Sized> State for &mut S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn insert(&mut self, key: &str, value: String) {
        (**self).insert(key, value)
    }
}

/// Stored balance, or `None` when missing or malformed.
pub fn load_balance<S: State + ?Sized>(state: &S) -> Option<u64> {
    let raw = state.get(BALANCE_KEY)?;
    match serde_json::from_str::<u64>(&raw) {
        Ok(balance) => Some(balance),
        Err(e) => {
            warn!(error = %e, raw = %raw, "discarding malformed stored balance");
            None
        }
    }
}

/// Stored history (newest first, capped), empty when missing or malformed.
pub fn load_history<S: State + ?Sized>(state: &S) -> History {
    let Some(raw) = state.get(HISTORY_KEY) else {
        debug!("no stored history");
        return History::default();
    };
    match serde_json::from_str::<History>(&raw) {
        Ok(history) => history,
        Err(e) => {
            warn!(error = %e, "discarding malformed stored history");
            History::default()
        }
    }
}

pub fn save_balance<S: State + ?Sized>(state: &mut S, balance: u64) {
    state.insert(BALANCE_KEY, balance.to_string());
}

pub fn save_history<S: State + ?Sized>(state: &mut S, history: &History) {
    match serde_json::to_string(history) {
        Ok(raw) => state.insert(HISTORY_KEY, raw),
        Err(e) => warn!(error = %e, "failed to encode history"),
    }
}
