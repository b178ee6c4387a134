//! Standalone HTML page with the card grid.

use minijinja::{context, Environment};

use super::text::{failed_text, LOADING_TEXT};
use super::{Card, LINK_LABEL};
use crate::config::ViewConfig;
use crate::error::Result;
use crate::view::Screen;

const TEMPLATE_NAME: &str = "grid.html";

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: sans-serif; margin: 2rem; background: #f5f5f5; }
.search { width: 100%; padding: 0.6rem; font-size: 1rem; margin-bottom: 1.5rem; box-sizing: border-box; }
.grid { display: grid; gap: 1rem; }
.card { background: #fff; border-radius: 8px; box-shadow: 0 1px 3px rgba(0,0,0,0.2); display: flex; flex-direction: column; }
.card img { height: 140px; object-fit: contain; padding: 1rem; }
.card .body { padding: 0 1rem; flex: 1; }
.card h2 { font-size: 1.2rem; margin: 0 0 0.5rem; }
.card h3 { font-size: 0.9rem; font-weight: normal; color: #555; margin: 0.2rem 0; word-break: break-all; }
.card .actions { padding: 1rem; }
.status { font-size: 1.1rem; color: #555; }
.status.error { color: #b00020; }
</style>
</head>
<body>
<input class="search" type="search" placeholder="{{ placeholder }}" value="{{ query }}">
{% if state == "loading" %}
<p class="status">{{ message }}</p>
{% elif state == "failed" %}
<p class="status error">{{ message }}</p>
{% else %}
<div class="grid" style="grid-template-columns: repeat({{ columns }}, 1fr)">
{% for card in cards %}
<div class="card">
<img src="{{ card.thumbnail }}" alt="{{ card.thumbnail_alt }}">
<div class="body">
{% for line in card.lines %}{% if loop.first %}<h2>{{ line.value }}</h2>
{% else %}<h3>{{ line.label }} : {{ line.value }}</h3>
{% endif %}{% endfor %}</div>
<div class="actions">{% if card.link %}<a href="{{ card.link }}" target="_blank" rel="noopener noreferrer"><button type="button">{{ link_label }}</button></a>{% endif %}</div>
</div>
{% endfor %}
</div>
<p class="status">{{ message }}</p>
{% endif %}
</body>
</html>
"#;

pub(super) fn page(screen: &Screen, cards: &[Card], view: &ViewConfig, query: &str) -> Result<String> {
    let mut env = Environment::new();
    env.add_template(TEMPLATE_NAME, TEMPLATE)?;
    let template = env.get_template(TEMPLATE_NAME)?;

    let (state, message) = match screen {
        Screen::Loading => ("loading", LOADING_TEXT.to_string()),
        Screen::Failed { reason } => ("failed", failed_text(reason)),
        Screen::Grid { total, .. } => ("grid", format!("Showing {} of {total} documents", cards.len())),
    };

    let html = template.render(context! {
        title => view.search_placeholder,
        placeholder => view.search_placeholder,
        query => query,
        columns => view.columns,
        state => state,
        message => message,
        cards => cards,
        link_label => LINK_LABEL,
    })?;
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CaseRecord;
    use crate::render::tests::smith;

    fn render(screen: &Screen, query: &str) -> String {
        let view = ViewConfig::default();
        let cards: Vec<Card> = screen
            .records()
            .iter()
            .map(|record| Card::from_record(record, &view.thumbnail))
            .collect();
        page(screen, &cards, &view, query).unwrap()
    }

    #[test]
    fn test_grid_page() {
        let html = render(
            &Screen::Grid {
                records: vec![smith()],
                total: 1,
            },
            "smith",
        );

        assert!(html.contains("placeholder=\"Search Tests\""));
        assert!(html.contains("value=\"smith\""));
        assert!(html.contains("repeat(2, 1fr)"));
        assert!(html.contains("<h2>Smith v. Jones</h2>"));
        assert!(html.contains("<h3>Case Id : C-101</h3>"));
        assert!(html.contains("target=\"_blank\""));
        assert!(html.contains("rel=\"noopener noreferrer\""));
        assert!(html.contains(">View Doc</button>"));
        assert!(html.contains("alt=\"PDF document\""));
    }

    #[test]
    fn test_values_are_escaped() {
        let record = CaseRecord {
            case_name: Some("<script>alert(1)</script>".to_string()),
            ..CaseRecord::default()
        };
        let html = render(
            &Screen::Grid {
                records: vec![record],
                total: 1,
            },
            "\"><b>",
        );
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("\"><b>"));
    }

    #[test]
    fn test_missing_link_has_no_button() {
        let html = render(
            &Screen::Grid {
                records: vec![CaseRecord::default()],
                total: 1,
            },
            "",
        );
        assert!(!html.contains("<button"));
        assert!(html.contains("class=\"card\""));
    }

    #[test]
    fn test_state_pages_are_distinct() {
        let loading = render(&Screen::Loading, "");
        let failed = render(
            &Screen::Failed {
                reason: "HTTP 500".to_string(),
            },
            "",
        );
        let empty = render(
            &Screen::Grid {
                records: Vec::new(),
                total: 0,
            },
            "",
        );

        assert!(loading.contains("Loading documents..."));
        assert!(!loading.contains("class=\"grid\""));
        assert!(failed.contains("class=\"status error\""));
        assert!(failed.contains("HTTP 500"));
        assert!(empty.contains("class=\"grid\""));
        assert!(!empty.contains("class=\"card\""));
        assert!(empty.contains("Showing 0 of 0 documents"));
    }
}
