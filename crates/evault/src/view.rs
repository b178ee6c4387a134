//! The documents view.
//!
//! [`DocumentsView`] ties the loader to the search query. Mounting starts the
//! one-shot load; every query change is applied to the loaded list on the
//! next [`screen`](DocumentsView::screen) call. Unmounting cancels a load that
//! is still running.

use crate::filter::RecordFilter;
use crate::loader::{LoadState, LoadTask, RecordLoader};
use crate::record::CaseRecord;

/// What the view shows right now.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// The load has not finished yet.
    Loading,
    /// The load failed.
    Failed {
        /// Why the documents could not be loaded.
        reason: String,
    },
    /// The filtered records.
    Grid {
        /// Records passing the current query, in collection order.
        records: Vec<CaseRecord>,
        /// Number of loaded records before filtering.
        total: usize,
    },
}

impl Screen {
    /// Build the screen for a load state and a query.
    #[must_use]
    pub fn from_state(state: &LoadState, filter: &RecordFilter) -> Self {
        match state {
            LoadState::NotStarted | LoadState::InFlight => Self::Loading,
            LoadState::Failed { reason } => Self::Failed {
                reason: reason.clone(),
            },
            LoadState::Loaded { records, .. } => Self::Grid {
                records: filter.apply(records.iter()).into_iter().cloned().collect(),
                total: records.len(),
            },
        }
    }

    /// Records on screen; empty unless showing the grid.
    #[must_use]
    pub fn records(&self) -> &[CaseRecord] {
        match self {
            Self::Grid { records, .. } => records.as_slice(),
            _ => &[],
        }
    }

    /// Keep at most `limit` records on a grid screen.
    pub fn truncate(&mut self, limit: usize) {
        if let Self::Grid { records, .. } = self {
            records.truncate(limit);
        }
    }
}

/// A searchable view over one collection.
#[derive(Debug)]
pub struct DocumentsView {
    loader: RecordLoader,
    task: Option<LoadTask>,
    query: String,
    filter: RecordFilter,
}

impl DocumentsView {
    /// Create an unmounted view.
    #[must_use]
    pub fn new(loader: RecordLoader) -> Self {
        Self {
            loader,
            task: None,
            query: String::new(),
            filter: RecordFilter::default(),
        }
    }

    /// Start loading, unless already mounted.
    ///
    /// Returns `true` if a load was started. Must be called from within a
    /// tokio runtime.
    pub fn mount(&mut self) -> bool {
        if self.task.is_some() {
            return false;
        }
        tracing::debug!(collection = self.loader.collection(), "Mounting documents view");
        self.task = Some(self.loader.clone().spawn());
        true
    }

    /// Tear the view down, cancelling a load in flight.
    pub fn unmount(&mut self) {
        if self.task.take().is_some() {
            tracing::debug!(collection = self.loader.collection(), "Unmounted documents view");
        }
    }

    /// Check if the view is mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.task.is_some()
    }

    /// Replace the search query.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
        self.filter = RecordFilter::new(&self.query);
    }

    /// The current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// The loader behind this view.
    #[must_use]
    pub fn loader(&self) -> &RecordLoader {
        &self.loader
    }

    /// The current load state.
    #[must_use]
    pub fn state(&self) -> LoadState {
        self.task
            .as_ref()
            .map_or(LoadState::NotStarted, LoadTask::state)
    }

    /// Wait until the load settles; mounts first if needed.
    pub async fn settle(&mut self) -> LoadState {
        self.mount();
        match self.task.as_mut() {
            Some(task) => task.wait().await,
            None => LoadState::NotStarted,
        }
    }

    /// Records passing the current query; empty until loaded.
    #[must_use]
    pub fn visible(&self) -> Vec<CaseRecord> {
        let state = self.state();
        self.filter
            .apply(state.records())
            .into_iter()
            .cloned()
            .collect()
    }

    /// What the view shows for the current state and query.
    #[must_use]
    pub fn screen(&self) -> Screen {
        Screen::from_state(&self.state(), &self.filter)
    }
}
