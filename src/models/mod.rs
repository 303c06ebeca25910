//! Core data models for finreport
//!
//! This module contains the data structures describing a computed financial
//! report: the period, headline summary, category breakdown, top expenses and
//! the narrative analysis.

pub mod money;
pub mod report;

pub use money::Money;
pub use report::{
    CategoryBreakdown, CategoryStat, Period, Report, Summary, TopExpense, TOP_EXPENSE_LIMIT,
};
