//! In-memory document source.

use std::collections::HashMap;
use std::time::Duration;

use super::{DocumentSource, RawDocument};
use crate::error::{Error, Result};
use crate::record::CaseRecord;

/// Serves collections held in memory.
///
/// Used as a test double for the remote database; it can also be told to
/// fail or to respond slowly.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    collections: HashMap<String, Vec<RawDocument>>,
    failure: Option<String>,
    delay: Option<Duration>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add raw documents to a collection.
    #[must_use]
    pub fn with_documents(mut self, collection: &str, documents: Vec<RawDocument>) -> Self {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .extend(documents);
        self
    }

    /// Add records to a collection, numbering their ids from the current
    /// collection length.
    #[must_use]
    pub fn with_records(self, collection: &str, records: &[CaseRecord]) -> Self {
        let offset = self.collections.get(collection).map_or(0, Vec::len);
        let documents = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                let data = serde_json::to_value(record).unwrap_or_default();
                RawDocument::new((offset + i).to_string(), data)
            })
            .collect();
        self.with_documents(collection, documents)
    }

    /// Make every fetch fail with the given message.
    #[must_use]
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    /// Delay every fetch.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait::async_trait]
impl DocumentSource for MemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn location(&self) -> String {
        format!("in-memory ({} collections)", self.collections.len())
    }

    async fn fetch_all(&self, collection: &str) -> Result<Vec<RawDocument>> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = &self.failure {
            return Err(Error::RemoteStatus {
                status: 503,
                body: message.clone(),
            });
        }
        Ok(self.collections.get(collection).cloned().unwrap_or_default())
    }
}
