//! Terminal rendering of a report
//!
//! Mirrors the on-screen report the PDF is captured from: summary figures,
//! spending change, category breakdown, top expenses and the narrative.

use chrono::NaiveDate;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::Report;

const WIDTH: usize = 60;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    name: String,
    #[tabled(rename = "Transactions")]
    count: u64,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Share")]
    share: String,
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Category / Date")]
    detail: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Render the whole report for the terminal
pub fn format_report(report: &Report, currency_symbol: &str, date_format: &str) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str(&format_header("Financial Report", WIDTH));
    output.push('\n');
    output.push_str(&double_separator(WIDTH));
    output.push('\n');
    output.push_str(&format!(
        "{} to {} ({} days)\n\n",
        format_date(&report.period.start_date, date_format),
        format_date(&report.period.end_date, date_format),
        report.period.days
    ));

    output.push_str(&format!(
        "  Total Expenses:  {}\n",
        summary.total_expenses.format_with_symbol(currency_symbol)
    ));
    output.push_str(&format!("  Transactions:    {}\n", summary.transaction_count));
    output.push_str(&format!(
        "  Avg Daily:       {}\n",
        summary.avg_daily_spending.format_with_symbol(currency_symbol)
    ));

    if let Some(change) = format_spending_change(summary.spending_change_percentage) {
        output.push('\n');
        output.push_str(&change);
        output.push('\n');
    }

    output.push('\n');
    output.push_str("Category Breakdown\n");
    output.push_str(&separator(WIDTH));
    output.push('\n');
    if report.category_breakdown.is_empty() {
        output.push_str("No spending recorded.\n");
    } else {
        let rows = report
            .category_breakdown
            .iter()
            .map(|(name, stat)| CategoryRow {
                name: title_case(name),
                count: stat.count,
                amount: stat.amount.format_with_symbol(currency_symbol),
                share: format_percentage(stat.percentage),
            });
        output.push_str(&Table::new(rows).with(Style::psql()).to_string());
        output.push('\n');
    }

    let top = report.top_expenses();
    if !top.is_empty() {
        output.push('\n');
        output.push_str("Top Expenses\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        let rows = top.iter().map(|expense| ExpenseRow {
            description: truncate(&expense.description, 30),
            detail: format!(
                "{} • {}",
                expense.category,
                format_date(&expense.date, date_format)
            ),
            amount: expense.amount.format_with_symbol(currency_symbol),
        });
        output.push_str(&Table::new(rows).with(Style::psql()).to_string());
        output.push('\n');
    }

    if let Some(narrative) = report.narrative() {
        output.push('\n');
        output.push_str("AI Analysis\n");
        output.push_str(&separator(WIDTH));
        output.push('\n');
        output.push_str(narrative.trim_end());
        output.push('\n');
    }

    output
}

/// "12.5% increase compared to previous period", or nothing when unchanged
pub fn format_spending_change(pct: f64) -> Option<String> {
    if pct == 0.0 || !pct.is_finite() {
        return None;
    }

    let direction = if pct > 0.0 { "increase" } else { "decrease" };
    Some(format!(
        "{:.1}% {} compared to previous period",
        pct.abs(),
        direction
    ))
}

/// Capitalize the first letter of a category name
pub fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Reformat an ISO date; anything else is shown as given
pub fn format_date(raw: &str, date_format: &str) -> String {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format(date_format).to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn format_percentage(pct: f64) -> String {
    format!("{:.1}%", pct)
}

/// Center a title in a field of the given width
pub fn format_header(title: &str, width: usize) -> String {
    let len = title.chars().count();
    let padding = width.saturating_sub(len) / 2;
    format!("{}{}", " ".repeat(padding), title)
}

pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

pub fn double_separator(width: usize) -> String {
    "═".repeat(width)
}

/// Truncate a string to a maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".chars().take(max_len).collect()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
