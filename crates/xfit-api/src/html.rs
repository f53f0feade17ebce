//! HTML fragments for the page.

use std::fmt::Write;

use xfit_models::{ErrorState, PredictionView, TableModel};

/// Render a prediction view as an HTML fragment.
pub fn view_fragment(view: &PredictionView) -> String {
    match view {
        PredictionView::Table { table } => table_fragment(table),
        PredictionView::Error { error } => error_fragment(error),
    }
}

/// `<table>` with a header row and one body row per prediction entry.
pub fn table_fragment(table: &TableModel) -> String {
    let mut html = String::from("<table class=\"prediction-table\">");
    let _ = write!(
        html,
        "<thead><tr><th>{}</th><th>{}</th></tr></thead><tbody>",
        escape(&table.header.0),
        escape(&table.header.1)
    );
    for row in &table.rows {
        let _ = write!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape(&row.movement),
            escape(&row.probability)
        );
    }
    html.push_str("</tbody></table>");
    html
}

/// Error block, styled apart from the result table.
pub fn error_fragment(error: &ErrorState) -> String {
    format!(
        "<div class=\"prediction-error\" role=\"alert\" data-kind=\"{}\">{}</div>",
        escape(&error.kind),
        escape(&error.message)
    )
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use xfit_models::{render, Prediction};

    #[test]
    fn test_table_fragment_rows_in_order() {
        let table = render(&Prediction::from(vec![
            ("thruster".to_string(), 0.92),
            ("deadlift".to_string(), 0.05),
        ]));
        assert_eq!(
            table_fragment(&table),
            "<table class=\"prediction-table\"><thead><tr><th>Movement</th><th>Probability</th></tr></thead>\
             <tbody><tr><td>thruster</td><td>0.92</td></tr><tr><td>deadlift</td><td>0.05</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_error_fragment_is_escaped() {
        let html = error_fragment(&ErrorState {
            kind: "timeout".to_string(),
            message: "<slow> & \"late\"".to_string(),
        });
        assert!(html.contains("prediction-error"));
        assert!(html.contains("&lt;slow&gt; &amp; &quot;late&quot;"));
    }
}
