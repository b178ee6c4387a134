//! Client-side record filtering.
//!
//! A query matches a record when it is a case-insensitive substring of the
//! case name, the lawyer, or the judge. The empty query matches every record.
//! Filtering is a linear scan over the loaded list; there is no index.

use tracing::trace;

use crate::record::{CaseRecord, Field};

/// A compiled search query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordFilter {
    needle: String,
}

impl RecordFilter {
    /// Create a filter for the given query.
    ///
    /// The query is used as typed; surrounding whitespace is significant.
    #[must_use]
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    /// Check if this filter lets every record through.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    /// Check if a record matches.
    ///
    /// A missing field never matches a non-empty query.
    #[must_use]
    pub fn matches(&self, record: &CaseRecord) -> bool {
        if self.is_empty() {
            return true;
        }
        Field::SEARCHABLE.iter().any(|field| {
            record
                .get(*field)
                .is_some_and(|value| value.to_lowercase().contains(&self.needle))
        })
    }

    /// Keep the matching records, preserving their order.
    pub fn apply<'a, I>(&self, records: I) -> Vec<&'a CaseRecord>
    where
        I: IntoIterator<Item = &'a CaseRecord>,
    {
        let visible: Vec<&CaseRecord> = records
            .into_iter()
            .filter(|record| self.matches(record))
            .collect();
        trace!(query = %self.needle, visible = visible.len(), "Applied filter");
        visible
    }
}

/// Filter `records` by `query`.
///
/// Convenience wrapper around [`RecordFilter`].
#[must_use]
pub fn filter_records<'a>(records: &'a [CaseRecord], query: &str) -> Vec<&'a CaseRecord> {
    RecordFilter::new(query).apply(records)
}
