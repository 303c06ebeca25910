//! Export history
//!
//! Every export attempt, successful or not, is appended to a line-delimited
//! JSON log (`exports.log`) so past runs can be listed with `finreport history`.

mod entry;
mod logger;

pub use entry::ExportRecord;
pub use logger::ExportHistory;
