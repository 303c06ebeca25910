//! Computed financial report
//!
//! The report is produced upstream (sums, percentages, AI narrative) and is
//! read-only here. Field names follow the JSON payload returned by the
//! reports API so a saved response can be loaded as-is.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::Path;

use super::money::{self, Money};
use crate::error::{ReportError, ReportResult};

/// Maximum number of top expenses shown from a report
pub const TOP_EXPENSE_LIMIT: usize = 5;

/// Reporting period
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    /// First day of the period, in the report's native date form
    pub start_date: String,
    /// Last day of the period, inclusive
    pub end_date: String,
    /// Inclusive day count
    pub days: u32,
}

impl Period {
    /// Parse the start date, if it is an ISO calendar date
    pub fn start(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.start_date, "%Y-%m-%d").ok()
    }

    /// Parse the end date, if it is an ISO calendar date
    pub fn end(&self) -> Option<chrono::NaiveDate> {
        chrono::NaiveDate::parse_from_str(&self.end_date, "%Y-%m-%d").ok()
    }
}

/// Headline figures for the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(with = "money::decimal")]
    pub total_expenses: Money,
    pub transaction_count: u64,
    #[serde(with = "money::decimal")]
    pub avg_daily_spending: Money,
    /// Change against the previous period of equal length, signed
    #[serde(default)]
    pub spending_change_percentage: f64,
}

/// Spending within one category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    #[serde(with = "money::decimal")]
    pub amount: Money,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub percentage: f64,
}

/// Category name to spending, in the order the report lists them
///
/// Serialized as a JSON object. Entry order is significant and is never
/// re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryBreakdown(Vec<(String, CategoryStat)>);

impl CategoryBreakdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, replacing the stat of an existing category in place
    pub fn insert(&mut self, category: impl Into<String>, stat: CategoryStat) {
        let category = category.into();
        match self.0.iter_mut().find(|(name, _)| *name == category) {
            Some(entry) => entry.1 = stat,
            None => self.0.push((category, stat)),
        }
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryStat)> {
        self.0.iter().map(|(name, stat)| (name.as_str(), stat))
    }
}

impl FromIterator<(String, CategoryStat)> for CategoryBreakdown {
    fn from_iter<I: IntoIterator<Item = (String, CategoryStat)>>(iter: I) -> Self {
        let mut breakdown = Self::new();
        for (name, stat) in iter {
            breakdown.insert(name, stat);
        }
        breakdown
    }
}

impl Serialize for CategoryBreakdown {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, stat) in &self.0 {
            map.serialize_entry(name, stat)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryBreakdown {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BreakdownVisitor;

        impl<'de> Visitor<'de> for BreakdownVisitor {
            type Value = CategoryBreakdown;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to spending")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut breakdown = CategoryBreakdown::new();
                while let Some((name, stat)) = access.next_entry::<String, CategoryStat>()? {
                    breakdown.insert(name, stat);
                }
                Ok(breakdown)
            }
        }

        deserializer.deserialize_map(BreakdownVisitor)
    }
}

/// One of the largest expenses in the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopExpense {
    pub description: String,
    pub category: String,
    pub date: String,
    #[serde(with = "money::decimal")]
    pub amount: Money,
}

/// A computed financial report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub period: Period,
    pub summary: Summary,
    #[serde(default)]
    pub category_breakdown: CategoryBreakdown,
    /// Ordered by descending amount
    #[serde(default)]
    pub top_expenses: Vec<TopExpense>,
    #[serde(default)]
    pub ai_summary: Option<String>,
}

impl Report {
    /// Parse a report from its JSON payload
    pub fn from_json(json: &str) -> ReportResult<Self> {
        let report: Report =
            serde_json::from_str(json).map_err(|e| ReportError::malformed(e.to_string()))?;
        report.validate()?;
        Ok(report)
    }

    /// Load a report from a JSON file
    pub fn load(path: impl AsRef<Path>) -> ReportResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ReportError::Io(format!("Failed to read report {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Check the fields both export strategies rely on
    pub fn validate(&self) -> ReportResult<()> {
        if self.period.start_date.trim().is_empty() || self.period.end_date.trim().is_empty() {
            return Err(ReportError::malformed("period dates are required"));
        }

        // Dates go into the output file name unchanged
        for date in [&self.period.start_date, &self.period.end_date] {
            if date.contains(|c: char| c == '/' || c == '\\') {
                return Err(ReportError::malformed(format!(
                    "period date contains a path separator: {:?}",
                    date
                )));
            }
        }

        if self.summary.total_expenses.is_negative() {
            return Err(ReportError::malformed(format!(
                "total_expenses must not be negative: {}",
                self.summary.total_expenses
            )));
        }

        if self.summary.avg_daily_spending.is_negative() {
            return Err(ReportError::malformed(format!(
                "avg_daily_spending must not be negative: {}",
                self.summary.avg_daily_spending
            )));
        }

        if !self.summary.spending_change_percentage.is_finite() {
            return Err(ReportError::malformed(
                "spending_change_percentage must be a finite number",
            ));
        }

        for (name, stat) in self.category_breakdown.iter() {
            if stat.amount.is_negative() || !stat.percentage.is_finite() {
                return Err(ReportError::malformed(format!(
                    "invalid figures for category '{}'",
                    name
                )));
            }
        }

        Ok(())
    }

    /// The narrative, if it has any visible content
    pub fn narrative(&self) -> Option<&str> {
        self.ai_summary
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }

    /// The largest expenses, capped at [`TOP_EXPENSE_LIMIT`]
    pub fn top_expenses(&self) -> &[TopExpense] {
        let end = self.top_expenses.len().min(TOP_EXPENSE_LIMIT);
        &self.top_expenses[..end]
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn stat(amount_cents: i64, count: u64, percentage: f64) -> CategoryStat {
        CategoryStat {
            amount: Money::from_cents(amount_cents),
            count,
            percentage,
        }
    }

    /// January 2024 with three categories and no narrative
    pub fn january_report() -> Report {
        let category_breakdown = [
            ("food", stat(150000, 20, 33.3)),
            ("travel", stat(200000, 5, 44.4)),
            ("bills", stat(100000, 10, 22.3)),
        ]
        .into_iter()
        .map(|(name, stat)| (name.to_string(), stat))
        .collect();

        Report {
            period: Period {
                start_date: "2024-01-01".into(),
                end_date: "2024-01-31".into(),
                days: 31,
            },
            summary: Summary {
                total_expenses: Money::from_cents(450000),
                transaction_count: 35,
                avg_daily_spending: Money::from_cents(14516),
                spending_change_percentage: 0.0,
            },
            category_breakdown,
            top_expenses: Vec::new(),
            ai_summary: Some(String::new()),
        }
    }

    pub fn report_with_categories(count: usize) -> Report {
        let mut report = january_report();
        report.category_breakdown = (0..count)
            .map(|i| (format!("category-{:03}", i), stat(1000 + i as i64, 1, 1.0)))
            .collect();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT_JSON: &str = r#"{
        "period": {"start_date": "2024-01-01", "end_date": "2024-01-31", "days": 31},
        "summary": {
            "total_expenses": 4500.0,
            "transaction_count": 35,
            "avg_daily_spending": 145.16,
            "spending_change_percentage": -12.5
        },
        "category_breakdown": {
            "travel": {"amount": 2000.0, "count": 5, "percentage": 44.4},
            "food": {"amount": 1500.0, "count": 20, "percentage": 33.3},
            "bills": {"amount": 1000.0, "count": 10, "percentage": 22.3}
        },
        "daily_spending": {"2024-01-02": 120.0},
        "top_expenses": [
            {"description": "Flight", "category": "travel", "date": "2024-01-12", "amount": 1200.0}
        ],
        "ai_summary": "Spending is concentrated in travel."
    }"#;

    #[test]
    fn test_parse_report() {
        let report = Report::from_json(REPORT_JSON).unwrap();

        assert_eq!(report.period.days, 31);
        assert_eq!(report.summary.total_expenses.cents(), 450000);
        assert_eq!(report.summary.avg_daily_spending.cents(), 14516);
        assert_eq!(report.summary.spending_change_percentage, -12.5);
        assert_eq!(report.top_expenses.len(), 1);
        assert_eq!(report.narrative(), Some("Spending is concentrated in travel."));
    }

    #[test]
    fn test_category_order_is_preserved() {
        let report = Report::from_json(REPORT_JSON).unwrap();
        let names: Vec<&str> = report.category_breakdown.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["travel", "food", "bills"]);
    }

    #[test]
    fn test_serialize_keeps_order() {
        let report = fixtures::january_report();
        let json = serde_json::to_string(&report.category_breakdown).unwrap();
        let food = json.find("food").unwrap();
        let travel = json.find("travel").unwrap();
        let bills = json.find("bills").unwrap();
        assert!(food < travel && travel < bills);
    }

    #[test]
    fn test_missing_summary_field_is_malformed() {
        let json = r#"{
            "period": {"start_date": "2024-01-01", "end_date": "2024-01-31", "days": 31},
            "summary": {"transaction_count": 3, "avg_daily_spending": 1.0}
        }"#;
        let err = Report::from_json(json).unwrap_err();
        assert!(err.is_malformed());
        assert!(err.to_string().contains("total_expenses"));
    }

    #[test]
    fn test_optional_sections_default() {
        let json = r#"{
            "period": {"start_date": "2024-02-01", "end_date": "2024-02-29", "days": 29},
            "summary": {"total_expenses": 0, "transaction_count": 0, "avg_daily_spending": 0}
        }"#;
        let report = Report::from_json(json).unwrap();
        assert!(report.category_breakdown.is_empty());
        assert!(report.top_expenses.is_empty());
        assert!(report.narrative().is_none());
        assert_eq!(report.summary.spending_change_percentage, 0.0);
    }

    #[test]
    fn test_negative_total_is_malformed() {
        let mut report = fixtures::january_report();
        report.summary.total_expenses = Money::from_cents(-1);
        assert!(report.validate().unwrap_err().is_malformed());
    }

    fn report_with_total(total: &str) -> String {
        format!(
            r#"{{
                "period": {{"start_date": "2024-01-01", "end_date": "2024-01-31", "days": 31}},
                "summary": {{"total_expenses": {}, "transaction_count": 1, "avg_daily_spending": 1.0}}
            }}"#,
            total
        )
    }

    #[test]
    fn test_string_amounts_are_accepted() {
        let report = Report::from_json(&report_with_total(r#""4500.50""#)).unwrap();
        assert_eq!(report.summary.total_expenses.cents(), 450050);
    }

    #[test]
    fn test_bad_string_amounts_are_malformed() {
        for total in [
            r#""1.5€""#,
            r#""92233720368547758.08""#,
            r#""1.-5""#,
        ] {
            let err = Report::from_json(&report_with_total(total)).unwrap_err();
            assert!(err.is_malformed(), "{}: {}", total, err);
        }
    }

    #[test]
    fn test_path_separator_in_dates_is_malformed() {
        let mut report = fixtures::january_report();
        report.period.start_date = "2024/01/01".into();
        assert!(report.validate().unwrap_err().is_malformed());

        let mut report = fixtures::january_report();
        report.period.end_date = "..\\2024-01-31".into();
        assert!(report.validate().unwrap_err().is_malformed());
    }

    #[test]
    fn test_blank_narrative_is_absent() {
        let mut report = fixtures::january_report();
        report.ai_summary = Some("   \n".into());
        assert!(report.narrative().is_none());
    }

    #[test]
    fn test_top_expenses_capped() {
        let mut report = fixtures::january_report();
        report.top_expenses = (0..8)
            .map(|i| TopExpense {
                description: format!("Expense {}", i),
                category: "food".into(),
                date: "2024-01-05".into(),
                amount: Money::from_cents(10_000 - i),
            })
            .collect();
        assert_eq!(report.top_expenses().len(), TOP_EXPENSE_LIMIT);
        assert_eq!(report.top_expenses()[0].description, "Expense 0");
    }

    #[test]
    fn test_period_dates() {
        let report = fixtures::january_report();
        assert_eq!(
            report.period.start(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        );
        assert_eq!(
            report.period.end(),
            chrono::NaiveDate::from_ymd_opt(2024, 1, 31)
        );
    }
}
