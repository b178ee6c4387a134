//! Rendering of the documents view.
//!
//! Each visible record becomes a [`Card`]: a fixed thumbnail, six labelled
//! lines in a fixed order and a link to the document. Cards are laid out by
//! one of the [`OutputFormat`]s. Every [`Screen`] renders distinctly, so a
//! load in progress, a failed load and an empty result never look alike.

mod html;
mod text;

use serde::Serialize;

use crate::config::ViewConfig;
use crate::error::{Error, Result};
use crate::record::{CaseRecord, Field};
use crate::view::Screen;

/// Label of the link that opens a document.
pub const LINK_LABEL: &str = "View Doc";

/// Alt text of the card thumbnail.
pub const THUMBNAIL_ALT: &str = "PDF document";

/// Card lines, in display order. The first one is the card heading.
const CARD_LINES: [(Field, &str); 6] = [
    (Field::CaseName, "Case Name"),
    (Field::CaseId, "Case Id"),
    (Field::Client, "Client"),
    (Field::Judge, "Judge"),
    (Field::Lawyer, "Lawyer"),
    (Field::UploaderAddress, "Uploaded By"),
];

/// How to lay out the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One text block per card.
    #[default]
    Plain,
    /// One table row per card.
    Table,
    /// The visible records as JSON.
    Json,
    /// A standalone HTML page with a card grid.
    Html,
}

/// One labelled line of a card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardLine {
    /// Label shown before the value.
    pub label: &'static str,
    /// Field value; empty when the record lacks it.
    pub value: String,
}

/// The display form of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Card {
    /// Thumbnail image location.
    pub thumbnail: String,
    /// Alt text of the thumbnail.
    pub thumbnail_alt: &'static str,
    /// Six lines: case name, case id, client, judge, lawyer, uploader.
    pub lines: Vec<CardLine>,
    /// Document to open in a new browsing context.
    pub link: Option<String>,
}

impl Card {
    /// Build the card for a record.
    #[must_use]
    pub fn from_record(record: &CaseRecord, thumbnail: &str) -> Self {
        Self {
            thumbnail: thumbnail.to_string(),
            thumbnail_alt: THUMBNAIL_ALT,
            lines: CARD_LINES
                .iter()
                .map(|&(field, label)| CardLine {
                    label,
                    value: record.get(field).unwrap_or_default().to_string(),
                })
                .collect(),
            link: record.pdf_url.clone(),
        }
    }

    /// The card heading (the case name).
    #[must_use]
    pub fn title(&self) -> &str {
        self.lines.first().map_or("", |line| line.value.as_str())
    }

    /// The lines below the heading.
    #[must_use]
    pub fn details(&self) -> &[CardLine] {
        self.lines.get(1..).unwrap_or_default()
    }
}

/// Renders screens with a fixed presentation configuration.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    view: ViewConfig,
}

impl Renderer {
    /// Create a renderer.
    #[must_use]
    pub fn new(view: ViewConfig) -> Self {
        Self { view }
    }

    /// Cards for a list of records.
    #[must_use]
    pub fn cards(&self, records: &[CaseRecord]) -> Vec<Card> {
        records
            .iter()
            .map(|record| Card::from_record(record, &self.view.thumbnail))
            .collect()
    }

    /// Render a screen.
    ///
    /// `query` is echoed where the format has a search box.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization or template rendering fails.
    pub fn render(&self, screen: &Screen, format: OutputFormat, query: &str) -> Result<String> {
        match format {
            OutputFormat::Plain => Ok(text::plain(screen, &self.cards(screen.records()))),
            OutputFormat::Table => Ok(text::table(screen, &self.cards(screen.records()))),
            OutputFormat::Json => json(screen),
            OutputFormat::Html => html::page(screen, &self.cards(screen.records()), &self.view, query),
        }
    }
}

/// Open a document link in the system's default handler.
///
/// # Errors
///
/// Returns [`Error::LinkOpen`] if no handler could be launched.
pub fn open_link(url: &str) -> Result<()> {
    tracing::info!(url, "Opening document");
    open::that(url).map_err(|source| Error::LinkOpen {
        url: url.to_string(),
        source,
    })
}

fn json(screen: &Screen) -> Result<String> {
    let value = match screen {
        Screen::Grid { records, .. } => serde_json::to_value(records)?,
        Screen::Loading => serde_json::json!({ "state": "loading" }),
        Screen::Failed { reason } => serde_json::json!({ "state": "failed", "reason": reason }),
    };
    Ok(serde_json::to_string_pretty(&value)?)
}
