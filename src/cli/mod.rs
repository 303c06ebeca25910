//! CLI command handlers
//!
//! Bridges the clap argument parsing with the export pipeline.

pub mod export;
pub mod history;
pub mod show;

pub use export::{handle_export_command, ExportArgs};
pub use history::{handle_history_command, HistoryArgs};
pub use show::{handle_show_command, ShowArgs};
