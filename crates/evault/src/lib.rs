//! `evault` - Searchable viewer for legal-case document records
//!
//! This library loads a collection of case documents once from a document
//! database, filters it by a free-text query over case name, lawyer and judge,
//! and renders the result as a grid of cards.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod logging;
pub mod record;
pub mod render;
pub mod source;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{filter_records, RecordFilter};
pub use loader::{LoadState, LoadTask, RecordLoader};
pub use logging::init_logging;
pub use record::{CaseRecord, Field};
pub use render::{Card, OutputFormat, Renderer};
pub use source::{DocumentSource, RawDocument};
pub use view::{DocumentsView, Screen};
