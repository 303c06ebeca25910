//! Configuration for finreport
//!
//! - XDG-compliant path resolution
//! - User settings persistence

pub mod paths;
pub mod settings;

pub use paths::FinreportPaths;
pub use settings::Settings;
