use serde::{Deserialize, Serialize};

use super::{Outcome, HISTORY_LIMIT};

/// One settled round as shown in the history strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: u64,
    pub total: u8,
    pub result: Outcome,
}

/// Most recent rounds, newest first, never longer than [HISTORY_LIMIT].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<HistoryEntry>", into = "Vec<HistoryEntry>")]
pub struct History {
    entries: Vec<HistoryEntry>,
}

impl History {
    /// Wrap stored entries, dropping anything past the limit.
    pub fn from_entries(mut entries: Vec<HistoryEntry>) -> Self {
        entries.truncate(HISTORY_LIMIT);
        Self { entries }
    }

    /// Record a round at the front and evict the oldest beyond the limit.
    pub fn record(&mut self, total: u8, result: Outcome) -> HistoryEntry {
        let entry = HistoryEntry {
            id: self.next_id(),
            total,
            result,
        };
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
        entry
    }

    /// Ids only ever grow, even after eviction.
    pub fn next_id(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| e.id)
            .max()
            .map_or(1, |id| id.saturating_add(1))
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Compact strip such as `T X B X`, newest on the left.
    pub fn strip(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.result.marker().to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self::from_entries(entries)
    }
}

impl From<History> for Vec<HistoryEntry> {
    fn from(history: History) -> Self {
        history.entries
    }
}
