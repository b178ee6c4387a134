//! One-shot loading of a collection.
//!
//! The loader reads a whole collection once through an injected
//! [`DocumentSource`] and reports the outcome as a [`LoadState`]. Loads can
//! run in the background via [`RecordLoader::spawn`]; dropping the returned
//! [`LoadTask`] cancels the fetch, so a late answer never reaches a view that
//! is gone.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::record::CaseRecord;
use crate::source::{DocumentSource, RawDocument};

/// Where a load currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// Nothing has been requested yet.
    NotStarted,
    /// The fetch is running.
    InFlight,
    /// The collection was read.
    Loaded {
        /// Decoded records, in collection order.
        records: Arc<Vec<CaseRecord>>,
        /// Entries that could not be decoded into a record.
        skipped: usize,
        /// When the fetch completed.
        loaded_at: DateTime<Utc>,
    },
    /// The fetch failed.
    Failed {
        /// Why, in words fit for the user.
        reason: String,
    },
}

impl LoadState {
    /// Check if the load has reached a final state.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Loaded { .. } | Self::Failed { .. })
    }

    /// The loaded records; empty unless loaded.
    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        match self {
            Self::Loaded { records, .. } => records.as_slice(),
            _ => &[],
        }
    }

    /// Find a loaded record by case id.
    #[must_use]
    pub fn find_case(&self, case_id: &str) -> Option<&CaseRecord> {
        self.records()
            .iter()
            .find(|record| record.case_id.as_deref() == Some(case_id))
    }

    /// Short machine-readable name of the state.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InFlight => "loading",
            Self::Loaded { .. } => "loaded",
            Self::Failed { .. } => "failed",
        }
    }
}

impl std::fmt::Display for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode raw documents into records.
///
/// Returns the records in input order and the number of entries skipped
/// because they were not objects.
#[must_use]
pub fn decode_documents(documents: Vec<RawDocument>) -> (Vec<CaseRecord>, usize) {
    let mut records = Vec::with_capacity(documents.len());
    let mut skipped = 0;

    for doc in documents {
        match &doc.data {
            serde_json::Value::Object(fields) => {
                let record = CaseRecord::from_fields(fields);
                let missing = record.missing_fields();
                if !missing.is_empty() {
                    debug!(doc_id = %doc.id, ?missing, "Document is missing fields");
                }
                records.push(record);
            }
            other => {
                warn!(doc_id = %doc.id, value = %other, "Skipping document that is not an object");
                skipped += 1;
            }
        }
    }

    (records, skipped)
}

/// Loads one collection from a document source.
#[derive(Debug, Clone)]
pub struct RecordLoader {
    source: Arc<dyn DocumentSource>,
    collection: String,
    timeout: Duration,
}

impl RecordLoader {
    /// Create a loader for `collection` on `source`, giving up after `timeout`.
    #[must_use]
    pub fn new(
        source: Arc<dyn DocumentSource>,
        collection: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            source,
            collection: collection.into(),
            timeout,
        }
    }

    /// The collection this loader reads.
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// The source this loader reads from.
    #[must_use]
    pub fn source(&self) -> &Arc<dyn DocumentSource> {
        &self.source
    }

    /// Read the collection once.
    ///
    /// Always returns a settled state: failures and timeouts become
    /// [`LoadState::Failed`].
    pub async fn load(&self) -> LoadState {
        info!(
            source = self.source.name(),
            collection = %self.collection,
            "Loading documents"
        );
        let started = Instant::now();

        let fetched =
            tokio::time::timeout(self.timeout, self.source.fetch_all(&self.collection)).await;

        let documents = match fetched {
            Ok(Ok(documents)) => documents,
            Ok(Err(e)) => {
                warn!(collection = %self.collection, error = %e, "Failed to load documents");
                return LoadState::Failed {
                    reason: e.to_string(),
                };
            }
            Err(_) => {
                let err = Error::Timeout {
                    operation: format!(
                        "reading collection '{}' ({}s)",
                        self.collection,
                        self.timeout.as_secs_f64()
                    ),
                };
                warn!(collection = %self.collection, "Timed out loading documents");
                return LoadState::Failed {
                    reason: err.to_string(),
                };
            }
        };

        let (records, skipped) = decode_documents(documents);
        info!(
            collection = %self.collection,
            records = records.len(),
            skipped,
            elapsed_ms = started.elapsed().as_millis(),
            "Loaded documents"
        );

        LoadState::Loaded {
            records: Arc::new(records),
            skipped,
            loaded_at: Utc::now(),
        }
    }

    /// Run [`load`](Self::load) on the runtime.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(self) -> LoadTask {
        let (tx, rx) = watch::channel(LoadState::InFlight);
        let handle = tokio::spawn(async move {
            let state = self.load().await;
            if tx.send(state).is_err() {
                debug!("Load finished with no one watching");
            }
        });
        LoadTask { state: rx, handle }
    }
}

/// A load running in the background.
///
/// Dropping the task aborts the fetch.
#[derive(Debug)]
pub struct LoadTask {
    state: watch::Receiver<LoadState>,
    handle: JoinHandle<()>,
}

impl LoadTask {
    /// The latest published state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Wait for the load to settle.
    pub async fn wait(&mut self) -> LoadState {
        if let Ok(state) = self.state.wait_for(LoadState::is_settled).await {
            return state.clone();
        }
        // The task ended without publishing a result
        let state = self.state();
        if state.is_settled() {
            state
        } else {
            LoadState::Failed {
                reason: Error::internal("load task ended unexpectedly").to_string(),
            }
        }
    }
}

impl Drop for LoadTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
