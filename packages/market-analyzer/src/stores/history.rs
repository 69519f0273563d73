//! Append-only in-memory log of analysis runs.

use chrono::{Local, NaiveDateTime, SubsecRound};

use crate::types::{history::SearchHistoryEntry, product::ProductRecord, query::SearchQuery};

/// Session history of non-empty analysis runs, oldest first.
///
/// There is no way to edit or drop an entry once recorded.
#[derive(Debug, Default)]
pub struct SearchHistory {
    entries: Vec<SearchHistoryEntry>,
}

impl SearchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a run at the current local time.
    pub fn record(&mut self, query: SearchQuery, results: Vec<ProductRecord>) -> &SearchHistoryEntry {
        self.record_at(Local::now().naive_local(), query, results)
    }

    /// Record a run at `at`.
    ///
    /// Timestamps never go backwards: an `at` earlier than the latest entry
    /// is clamped to that entry's time.
    pub fn record_at(
        &mut self,
        at: NaiveDateTime,
        query: SearchQuery,
        results: Vec<ProductRecord>,
    ) -> &SearchHistoryEntry {
        let at = at.trunc_subsecs(0);
        let at = match self.entries.last() {
            Some(last) if last.recorded_at() > at => last.recorded_at(),
            _ => at,
        };

        self.entries.push(SearchHistoryEntry::new(at, query, results));
        &self.entries[self.entries.len() - 1]
    }

    /// Entries in append (chronological) order.
    pub fn entries(&self) -> &[SearchHistoryEntry] {
        &self.entries
    }

    /// Entries newest first, the order they are displayed in.
    pub fn newest_first(&self) -> impl Iterator<Item = &SearchHistoryEntry> {
        self.entries.iter().rev()
    }

    pub fn latest(&self) -> Option<&SearchHistoryEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The whole log as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.entries)
    }
}
