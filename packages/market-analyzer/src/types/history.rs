//! Archived analysis runs.

use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};

use super::{product::ProductRecord, query::SearchQuery};

/// Display format of history timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One successful, non-empty analysis run.
///
/// Entries are only ever built by [`SearchHistory`](crate::stores::SearchHistory)
/// and expose no way to change them afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHistoryEntry {
    #[serde(rename = "timestamp", serialize_with = "serialize_timestamp")]
    recorded_at: NaiveDateTime,
    query: SearchQuery,
    results: Vec<ProductRecord>,
}

impl SearchHistoryEntry {
    pub(crate) fn new(
        recorded_at: NaiveDateTime,
        query: SearchQuery,
        results: Vec<ProductRecord>,
    ) -> Self {
        Self {
            recorded_at,
            query,
            results,
        }
    }

    /// Creation time as `YYYY-MM-DD HH:MM:SS`.
    pub fn timestamp(&self) -> String {
        self.recorded_at.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn recorded_at(&self) -> NaiveDateTime {
        self.recorded_at
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn results(&self) -> &[ProductRecord] {
        &self.results
    }
}

fn serialize_timestamp<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&value.format(TIMESTAMP_FORMAT))
}
