//! Navigation history: the only state kept across sessions.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of remembered pages.
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub path: String,
    pub visited_at: DateTime<Utc>,
}

/// Bounded list of visited pages, most recent last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationHistory {
    entries: VecDeque<HistoryEntry>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit. A revisited page moves to the end.
    pub fn push(&mut self, path: &str) {
        self.entries.retain(|e| e.path != path);
        self.entries.push_back(HistoryEntry {
            path: path.to_string(),
            visited_at: Utc::now(),
        });
        while self.entries.len() > MAX_HISTORY {
            self.entries.pop_front();
        }
    }

    /// Drop a page, e.g. after it was deleted.
    pub fn remove(&mut self, path: &str) {
        self.entries.retain(|e| e.path != path);
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.back().map(|e| e.path.as_str())
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.path.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
