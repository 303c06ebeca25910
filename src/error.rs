//! Custom error types for finreport
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for finreport operations
#[derive(Error, Debug)]
pub enum ReportError {
    /// Pagination was asked for with an unusable page or source height
    #[error("Invalid page geometry: total height {total_height}, page height {page_height}")]
    InvalidGeometry { total_height: f64, page_height: f64 },

    /// The raster path could not produce a document
    #[error("Capture error: {0}")]
    Capture(String),

    /// Required report fields are missing or invalid
    #[error("Malformed report: {0}")]
    MalformedReport(String),

    /// The document was produced but could not be saved
    #[error("Failed to save document: {0}")]
    Persist(String),

    /// PDF assembly errors
    #[error("Document error: {0}")]
    Document(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors for user input
    #[error("Validation error: {0}")]
    Validation(String),
}

impl ReportError {
    /// Create a capture error from anything printable
    pub fn capture(reason: impl Into<String>) -> Self {
        Self::Capture(reason.into())
    }

    /// Create a malformed report error
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedReport(reason.into())
    }

    /// Check if this is a capture error (recoverable by the text fallback)
    pub fn is_capture(&self) -> bool {
        matches!(self, Self::Capture(_))
    }

    /// Check if this is a malformed report error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedReport(_))
    }

    /// Check if this is a geometry error
    pub fn is_invalid_geometry(&self) -> bool {
        matches!(self, Self::InvalidGeometry { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for ReportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        Self::Document(err.to_string())
    }
}

/// Result type alias for finreport operations
pub type ReportResult<T> = Result<T, ReportError>;
