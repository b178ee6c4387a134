//! Terminal layouts.

use std::fmt::Write as _;

use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};

use super::{Card, LINK_LABEL};
use crate::view::Screen;

pub(super) const LOADING_TEXT: &str = "Loading documents...";

pub(super) fn failed_text(reason: &str) -> String {
    format!("Could not load documents: {reason}")
}

fn summary(shown: usize, total: usize) -> String {
    format!("Showing {shown} of {total} documents")
}

/// One block per card, separated by blank lines.
pub(super) fn plain(screen: &Screen, cards: &[Card]) -> String {
    let total = match screen {
        Screen::Loading => return LOADING_TEXT.to_string(),
        Screen::Failed { reason } => return failed_text(reason),
        Screen::Grid { total, .. } => *total,
    };

    let mut out = String::new();
    for card in cards {
        let _ = writeln!(out, "{}", card.title());
        for line in card.details() {
            let _ = writeln!(out, "  {} : {}", line.label, line.value);
        }
        let _ = writeln!(out, "  {LINK_LABEL} : {}", card.link.as_deref().unwrap_or_default());
        out.push('\n');
    }
    out.push_str(&summary(cards.len(), total));
    out
}

/// One row per card.
pub(super) fn table(screen: &Screen, cards: &[Card]) -> String {
    let total = match screen {
        Screen::Loading => return LOADING_TEXT.to_string(),
        Screen::Failed { reason } => return failed_text(reason),
        Screen::Grid { total, .. } => *total,
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header: Vec<&str> = cards
        .first()
        .map(|card| card.lines.iter().map(|line| line.label).collect())
        .unwrap_or_else(|| super::CARD_LINES.iter().map(|(_, label)| *label).collect());
    header.push(LINK_LABEL);
    table.set_header(header);

    for card in cards {
        let mut row: Vec<&str> = card.lines.iter().map(|line| line.value.as_str()).collect();
        row.push(card.link.as_deref().unwrap_or_default());
        table.add_row(row);
    }

    format!("{table}\n{}", summary(cards.len(), total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CaseRecord;
    use crate::render::tests::smith;

    fn grid(records: Vec<CaseRecord>, total: usize) -> (Screen, Vec<Card>) {
        let cards = records
            .iter()
            .map(|record| Card::from_record(record, "/pdf.png"))
            .collect();
        (Screen::Grid { records, total }, cards)
    }

    #[test]
    fn test_plain_card() {
        let (screen, cards) = grid(vec![smith()], 3);
        let out = plain(&screen, &cards);

        assert!(out.starts_with("Smith v. Jones\n"));
        assert!(out.contains("  Case Id : C-101\n"));
        assert!(out.contains("  Uploaded By : 0xabc\n"));
        assert!(out.contains("  View Doc : https://example.com/c101.pdf\n"));
        assert!(out.ends_with("Showing 1 of 3 documents"));

        let case_id = out.find("Case Id").unwrap();
        let lawyer = out.find("Lawyer").unwrap();
        assert!(case_id < lawyer);
    }

    #[test]
    fn test_plain_missing_values_are_blank() {
        let (screen, cards) = grid(vec![CaseRecord::default()], 1);
        let out = plain(&screen, &cards);
        assert!(out.contains("  Judge : \n"));
        assert!(out.contains("  View Doc : \n"));
    }

    #[test]
    fn test_states_are_distinct() {
        let (empty, none) = grid(Vec::new(), 0);
        let loading = plain(&Screen::Loading, &[]);
        let failed = plain(
            &Screen::Failed {
                reason: "HTTP 403".to_string(),
            },
            &[],
        );
        let empty = plain(&empty, &none);

        assert_eq!(loading, "Loading documents...");
        assert_eq!(failed, "Could not load documents: HTTP 403");
        assert_eq!(empty, "Showing 0 of 0 documents");
    }

    #[test]
    fn test_table_rows() {
        let (screen, cards) = grid(vec![smith(), CaseRecord::default()], 2);
        let out = table(&screen, &cards);

        assert!(out.contains("Case Name"));
        assert!(out.contains("Uploaded By"));
        assert!(out.contains("View Doc"));
        assert!(out.contains("Smith v. Jones"));
        assert!(out.ends_with("Showing 2 of 2 documents"));
    }

    #[test]
    fn test_table_empty_grid_keeps_header() {
        let (screen, cards) = grid(Vec::new(), 4);
        let out = table(&screen, &cards);
        assert!(out.contains("Case Id"));
        assert!(out.ends_with("Showing 0 of 4 documents"));
    }

    #[test]
    fn test_table_states() {
        assert_eq!(table(&Screen::Loading, &[]), LOADING_TEXT);
        assert!(table(
            &Screen::Failed {
                reason: "x".to_string()
            },
            &[]
        )
        .starts_with("Could not load documents"));
    }
}
