//! Plain-text rendering of batch reports and exports.

use std::fmt::Write as _;

use crate::batch::BatchReport;
use crate::store::StoreEvent;

/// Renders an ASCII box table.
///
/// Rows shorter than `headers` are padded with empty cells; extra cells are
/// dropped. Widths count characters, not bytes.
///
/// ```rust
/// use shopify_data::report::render_table;
///
/// let table = render_table(&["Order", "ID"], &[vec!["#1001".into(), "gid://shopify/Order/1".into()]]);
/// assert!(table.contains("| #1001 | gid://shopify/Order/1 |"));
/// ```
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let border = widths.iter().fold(String::from("+"), |mut line, width| {
        line.push_str(&"-".repeat(width + 2));
        line.push('+');
        line
    });

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    if !rows.is_empty() {
        out.push_str(&border);
        out.push('\n');
    }
    out
}

fn render_row<'a>(widths: &[usize], mut cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for width in widths {
        let cell = cells.next().unwrap_or("");
        let pad = width.saturating_sub(cell.chars().count());
        let _ = write!(line, " {cell}{} |", " ".repeat(pad));
    }
    line
}

/// Renders the successes of `report` under `label_header` / `ID`.
#[must_use]
pub fn successes_table(report: &BatchReport, label_header: &str) -> String {
    let rows: Vec<Vec<String>> = report
        .successes()
        .into_iter()
        .map(|s| vec![s.label, s.remote_id])
        .collect();
    render_table(&[label_header, "ID"], &rows)
}

/// Renders the failures of `report` under `Index` / `Reason`.
#[must_use]
pub fn failures_table(report: &BatchReport) -> String {
    let rows: Vec<Vec<String>> = report
        .failures()
        .into_iter()
        .map(|f| vec![f.index.to_string(), f.reason])
        .collect();
    render_table(&["Index", "Reason"], &rows)
}

/// The closing summary line of a batch command.
#[must_use]
pub fn summary_line(report: &BatchReport) -> String {
    format!(
        "attempted {}, succeeded {}",
        report.attempted(),
        report.succeeded()
    )
}

const EVENT_COLUMNS: [&str; 11] = [
    "id",
    "subject_id",
    "created_at",
    "subject_type",
    "verb",
    "arguments",
    "body",
    "message",
    "author",
    "description",
    "path",
];

/// Renders events as RFC 4180 CSV with a header row.
#[must_use]
pub fn events_to_csv(events: &[StoreEvent]) -> String {
    let mut out = EVENT_COLUMNS.join(",");
    out.push_str("\r\n");

    for event in events {
        let arguments = if event.arguments.is_null() {
            String::new()
        } else {
            event.arguments.to_string()
        };
        let fields = [
            event.id.to_string(),
            event.subject_id.map(|id| id.to_string()).unwrap_or_default(),
            event.created_at.to_rfc3339(),
            event.subject_type.clone().unwrap_or_default(),
            event.verb.clone().unwrap_or_default(),
            arguments,
            event.body.clone().unwrap_or_default(),
            event.message.clone().unwrap_or_default(),
            event.author.clone().unwrap_or_default(),
            event.description.clone().unwrap_or_default(),
            event.path.clone().unwrap_or_default(),
        ];
        let line: Vec<String> = fields.iter().map(|f| csv_field(f)).collect();
        out.push_str(&line.join(","));
        out.push_str("\r\n");
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\r', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
