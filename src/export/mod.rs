//! PDF export for financial reports
//!
//! Two strategies produce the document:
//! - Raster: snapshot of the rendered report, sliced into A4 pages
//! - Text flow: the report laid out as lines of text, used when capture fails
//!
//! [`ReportExporter`] picks between them and saves the result.

pub mod capture;
pub mod document;
pub mod geometry;
pub mod orchestrator;
pub mod persist;
pub mod raster;
pub mod text;

/// Title shown on the first text page and stored in the PDF metadata
pub const REPORT_TITLE: &str = "Financial Report";

pub use capture::{ImageFileCapture, RenderedSurface, Snapshot, SurfaceCapture};
pub use document::{PdfDocument, Page};
pub use geometry::{paginate, scaled_height, PageSlice, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
pub use orchestrator::{
    report_filename, ExportOutcome, ExportStrategy, RenderedDocument, ReportExporter,
};
pub use persist::{DirectoryPersist, Persist};
pub use raster::capture_and_paginate;
pub use text::render_report_as_text;
