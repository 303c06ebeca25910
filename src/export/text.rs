//! Text flow strategy
//!
//! Lays the report out line by line with a vertical cursor, breaking to a new
//! page whenever the cursor passes the usable height. Needs nothing but the
//! report itself.
//!
//! Section headers are not kept with their first body line; a header may end a
//! page on its own.

use tracing::debug;

use super::document::{Page, PdfDocument};
use super::REPORT_TITLE;
use crate::error::ReportResult;
use crate::models::Report;

/// Left margin for every line (mm)
pub const LEFT_MARGIN: f64 = 20.0;
/// Baseline of the first line on a page (mm)
pub const TOP_MARGIN: f64 = 20.0;
/// A line whose baseline would fall below this starts a new page (mm)
pub const PAGE_BREAK_AT: f64 = 270.0;
/// The narrative section is only started above this line (mm)
pub const NARRATIVE_CUTOFF: f64 = 250.0;
/// Maximum characters per wrapped narrative line
pub const WRAP_COLUMNS: usize = 95;

const TITLE_SIZE: f32 = 16.0;
const PERIOD_SIZE: f32 = 12.0;
const HEADING_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 10.0;

const TITLE_ADVANCE: f64 = 10.0;
const PERIOD_ADVANCE: f64 = 15.0;
const HEADING_ADVANCE: f64 = 10.0;
const LINE_ADVANCE: f64 = 7.0;
const SECTION_GAP: f64 = 15.0;
const NARRATIVE_GAP: f64 = 10.0;
const NARRATIVE_ADVANCE: f64 = 5.0;

/// Heading of the narrative section
pub const NARRATIVE_HEADING: &str = "AI Analysis";

/// Lay out `report` as text pages
pub fn render_report_as_text(report: &Report, currency_symbol: &str) -> ReportResult<PdfDocument> {
    report.validate()?;

    let mut flow = TextFlow::new();
    let summary = &report.summary;

    flow.emit(TITLE_SIZE, REPORT_TITLE);
    flow.advance(TITLE_ADVANCE);

    flow.emit(
        PERIOD_SIZE,
        format!(
            "Period: {} to {}",
            report.period.start_date, report.period.end_date
        ),
    );
    flow.advance(PERIOD_ADVANCE);

    flow.emit(HEADING_SIZE, "Summary");
    flow.advance(HEADING_ADVANCE);
    flow.emit(
        BODY_SIZE,
        format!(
            "Total Expenses: {}",
            summary.total_expenses.format_with_symbol(currency_symbol)
        ),
    );
    flow.advance(LINE_ADVANCE);
    flow.emit(
        BODY_SIZE,
        format!("Transactions: {}", summary.transaction_count),
    );
    flow.advance(LINE_ADVANCE);
    flow.emit(
        BODY_SIZE,
        format!(
            "Average Daily: {}",
            summary.avg_daily_spending.format_with_symbol(currency_symbol)
        ),
    );
    flow.advance(SECTION_GAP);

    flow.emit(HEADING_SIZE, "Category Breakdown");
    flow.advance(HEADING_ADVANCE);
    for (category, stat) in report.category_breakdown.iter() {
        flow.break_if_full();
        flow.emit(
            BODY_SIZE,
            format!(
                "{}: {} ({:.1}%)",
                category,
                stat.amount.format_with_symbol(currency_symbol),
                stat.percentage
            ),
        );
        flow.advance(LINE_ADVANCE);
    }

    if let Some(narrative) = report.narrative() {
        if flow.y < NARRATIVE_CUTOFF {
            flow.advance(NARRATIVE_GAP);
            flow.emit(HEADING_SIZE, NARRATIVE_HEADING);
            flow.advance(HEADING_ADVANCE);
            for line in wrap_text(narrative, WRAP_COLUMNS) {
                flow.break_if_full();
                flow.emit(BODY_SIZE, line);
                flow.advance(NARRATIVE_ADVANCE);
            }
        } else {
            debug!(y = flow.y, "no room left for the narrative section");
        }
    }

    Ok(flow.finish())
}

/// Cursor over the page being filled
struct TextFlow {
    document: PdfDocument,
    page: Page,
    y: f64,
}

impl TextFlow {
    fn new() -> Self {
        Self {
            document: PdfDocument::a4(REPORT_TITLE),
            page: Page::new(),
            y: TOP_MARGIN,
        }
    }

    fn emit(&mut self, font_size: f32, text: impl Into<String>) {
        self.page.draw_text(LEFT_MARGIN, self.y, font_size, text);
    }

    fn advance(&mut self, by: f64) {
        self.y += by;
    }

    fn break_if_full(&mut self) {
        if self.y > PAGE_BREAK_AT {
            let full = std::mem::take(&mut self.page);
            self.document.push_page(full);
            self.y = TOP_MARGIN;
        }
    }

    fn finish(mut self) -> PdfDocument {
        self.document.push_page(self.page);
        self.document
    }
}

/// Greedy word wrap to at most `columns` characters per line
///
/// Newlines start a new paragraph and blank paragraphs are kept as empty
/// lines. Words longer than a line are split.
pub fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();

    for paragraph in text.trim_end().lines() {
        let mut line = String::new();
        let mut line_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > columns {
                if line_len > 0 {
                    lines.push(std::mem::take(&mut line));
                    line_len = 0;
                }
                let rest = word.split_off(columns);
                lines.push(word.into_iter().collect());
                word = rest;
            }

            if word.is_empty() {
                continue;
            }

            if line_len > 0 && line_len + 1 + word.len() > columns {
                lines.push(std::mem::take(&mut line));
                line_len = 0;
            }
            if line_len > 0 {
                line.push(' ');
                line_len += 1;
            }
            line_len += word.len();
            line.extend(word);
        }

        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::document::DrawOp;
    use crate::models::report::fixtures;

    fn all_texts(document: &PdfDocument) -> Vec<String> {
        document
            .pages()
            .iter()
            .flat_map(|page| page.texts().map(str::to_string))
            .collect()
    }

    fn baselines(page: &Page) -> Vec<f64> {
        page.ops()
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { y, .. } => Some(*y),
                DrawOp::Image { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_january_scenario_fits_one_page() {
        let report = fixtures::january_report();
        let document = render_report_as_text(&report, "Rs.").unwrap();

        assert_eq!(document.page_count(), 1);
        assert_eq!(
            all_texts(&document),
            vec![
                "Financial Report",
                "Period: 2024-01-01 to 2024-01-31",
                "Summary",
                "Total Expenses: Rs.4500.00",
                "Transactions: 35",
                "Average Daily: Rs.145.16",
                "Category Breakdown",
                "food: Rs.1500.00 (33.3%)",
                "travel: Rs.2000.00 (44.4%)",
                "bills: Rs.1000.00 (22.3%)",
            ]
        );
        assert_eq!(
            baselines(&document.pages()[0]),
            vec![20.0, 30.0, 45.0, 55.0, 62.0, 69.0, 84.0, 94.0, 101.0, 108.0]
        );
    }

    #[test]
    fn test_empty_breakdown_keeps_header() {
        let report = fixtures::report_with_categories(0);
        let document = render_report_as_text(&report, "$").unwrap();
        let texts = all_texts(&document);
        assert_eq!(texts.last().map(String::as_str), Some("Category Breakdown"));
    }

    #[test]
    fn test_long_breakdown_flows_to_next_page() {
        let report = fixtures::report_with_categories(40);
        let document = render_report_as_text(&report, "$").unwrap();

        assert_eq!(document.page_count(), 2);

        let category_lines: Vec<String> = all_texts(&document)
            .into_iter()
            .filter(|t| t.starts_with("category-"))
            .collect();
        assert_eq!(category_lines.len(), 40);
        for (i, line) in category_lines.iter().enumerate() {
            assert!(line.starts_with(&format!("category-{:03}:", i)), "{}", line);
        }

        // 26 lines fit between y=94 and the break threshold
        let first_page = baselines(&document.pages()[0]);
        assert_eq!(*first_page.last().unwrap(), 269.0);
        assert_eq!(baselines(&document.pages()[1])[0], TOP_MARGIN);
        assert!(first_page.iter().all(|y| *y <= PAGE_BREAK_AT));
    }

    #[test]
    fn test_narrative_is_wrapped_and_flows_across_pages() {
        let mut report = fixtures::january_report();
        let sentence = "Spending on travel rose sharply this month while food stayed flat. ";
        report.ai_summary = Some(sentence.repeat(80));

        let document = render_report_as_text(&report, "$").unwrap();
        assert!(document.page_count() >= 2);

        let texts = all_texts(&document);
        let heading = texts.iter().position(|t| t == NARRATIVE_HEADING).unwrap();
        let narrative = &texts[heading + 1..];
        assert!(narrative.iter().all(|line| line.chars().count() <= WRAP_COLUMNS));
        assert_eq!(
            narrative.join(" ").split_whitespace().count(),
            sentence.repeat(80).split_whitespace().count()
        );

        for page in document.pages() {
            assert!(baselines(page).iter().all(|y| *y <= PAGE_BREAK_AT));
        }
    }

    #[test]
    fn test_narrative_skipped_when_page_is_nearly_full() {
        // 23 categories leave the cursor at 94 + 23 * 7 = 255
        let mut report = fixtures::report_with_categories(23);
        report.ai_summary = Some("Too late for this.".into());

        let document = render_report_as_text(&report, "$").unwrap();
        assert!(!all_texts(&document).iter().any(|t| t == NARRATIVE_HEADING));
    }

    #[test]
    fn test_narrative_section_position() {
        let mut report = fixtures::january_report();
        report.ai_summary = Some("Short note.".into());

        let document = render_report_as_text(&report, "$").unwrap();
        let page = &document.pages()[0];
        let texts: Vec<&str> = page.texts().collect();
        let ys = baselines(page);

        assert_eq!(&texts[texts.len() - 2..], &[NARRATIVE_HEADING, "Short note."]);
        assert_eq!(&ys[ys.len() - 2..], &[125.0, 135.0]);
    }

    #[test]
    fn test_malformed_report_is_rejected() {
        let mut report = fixtures::january_report();
        report.period.end_date.clear();
        assert!(render_report_as_text(&report, "$").unwrap_err().is_malformed());
    }

    #[test]
    fn test_wrap_text_respects_width() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 10);
        assert_eq!(
            lines,
            vec!["the quick", "brown fox", "jumps over", "the lazy", "dog"]
        );
    }

    #[test]
    fn test_wrap_text_keeps_paragraphs() {
        let lines = wrap_text("First point.\n\nSecond point.", 40);
        assert_eq!(lines, vec!["First point.", "", "Second point."]);
    }

    #[test]
    fn test_wrap_text_splits_long_words() {
        let lines = wrap_text("see abcdefghijklmnop", 6);
        assert_eq!(lines, vec!["see", "abcdef", "ghijkl", "mnop"]);
    }
}
