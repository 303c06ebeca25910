//! Export history formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::history::ExportRecord;

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Strategy")]
    strategy: String,
    #[tabled(rename = "Pages")]
    pages: usize,
    #[tabled(rename = "Status")]
    status: String,
}

/// Format export records as a table, oldest first
pub fn format_history(records: &[ExportRecord]) -> String {
    if records.is_empty() {
        return "No exports recorded.".to_string();
    }

    let rows = records.iter().map(|record| HistoryRow {
        when: record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
        file: record.filename.clone(),
        strategy: record
            .strategy
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string()),
        pages: record.pages,
        status: match (&record.error, &record.fallback_reason) {
            (Some(error), _) => format!("failed: {}", error),
            (None, Some(_)) => "ok (fallback)".to_string(),
            (None, None) => "ok".to_string(),
        },
    });

    Table::new(rows).with(Style::psql()).to_string()
}
