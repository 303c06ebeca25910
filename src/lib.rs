//! finreport - financial report export to paginated PDF
//!
//! Takes an already-computed financial report, and optionally a raster
//! snapshot of its on-screen rendering, and produces a multi-page A4 PDF.
//! The snapshot is sliced into pages when it can be captured; otherwise the
//! report is laid out as text.
//!
//! # Architecture
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: The report payload and money amounts
//! - `export`: Pagination, the two strategies, PDF assembly and saving
//! - `history`: Export history log
//! - `display`: Terminal formatting
//! - `cli`: Command handlers for the binary
//!
//! # Example
//!
//! ```rust,ignore
//! use finreport::export::{DirectoryPersist, ImageFileCapture, RenderedSurface, ReportExporter};
//! use finreport::models::Report;
//!
//! let report = Report::load("report.json")?;
//! let exporter = ReportExporter::new(ImageFileCapture::new(), DirectoryPersist::new("."));
//! let outcome = exporter.export_report(&report, Some(&RenderedSurface::from_path("screen.png")))?;
//! println!("{} ({})", outcome.saved_to.display(), outcome.strategy);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod history;
pub mod models;

pub use error::{ReportError, ReportResult};
