//! Rows handed to the results log after a successful search.

use serde::{Deserialize, Serialize};

use crate::SearchQuery;

/// One logged search: query text, comma-joined jurisdiction labels, total count.
///
/// Only built from a numeric count, so an unavailable result can never be
/// persisted as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRecord {
    pub query: String,
    pub jurisdictions: String,
    pub count: u64,
}

impl SearchRecord {
    /// Column names of the results log header row.
    pub const HEADER: [&'static str; 3] = ["Search String", "Jurisdictions", "Results"];

    pub fn new(query: &SearchQuery, count: u64) -> Self {
        Self {
            query: query.text().to_string(),
            jurisdictions: query.joined_labels(),
            count,
        }
    }
}
