//! History record format

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::export::{ExportOutcome, ExportStrategy};

/// A single export attempt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRecord {
    /// When the export finished (UTC)
    pub timestamp: DateTime<Utc>,

    /// Unique id of this attempt
    pub id: Uuid,

    /// Output file name, or the name that would have been used
    pub filename: String,

    /// Strategy that produced the document
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ExportStrategy>,

    #[serde(default)]
    pub pages: usize,

    /// Why the raster strategy was abandoned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,

    /// Set when the export failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportRecord {
    /// Record a successful export
    pub fn success(outcome: &ExportOutcome) -> Self {
        Self {
            timestamp: Utc::now(),
            id: Uuid::new_v4(),
            filename: outcome.filename.clone(),
            strategy: Some(outcome.strategy),
            pages: outcome.page_count,
            fallback_reason: outcome.fallback_reason.clone(),
            error: None,
        }
    }

    /// Record a failed export
    pub fn failure(filename: impl Into<String>, error: impl ToString) -> Self {
        Self {
            timestamp: Utc::now(),
            id: Uuid::new_v4(),
            filename: filename.into(),
            strategy: None,
            pages: 0,
            fallback_reason: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Format the record for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.filename
        );

        match (&self.error, self.strategy) {
            (Some(error), _) => output.push_str(&format!(" FAILED: {}", error)),
            (None, Some(strategy)) => {
                output.push_str(&format!(" ({}, {} page", strategy, self.pages));
                if self.pages != 1 {
                    output.push('s');
                }
                output.push(')');
            }
            (None, None) => {}
        }

        if let Some(reason) = &self.fallback_reason {
            output.push_str(&format!("\n  Fallback: {}", reason));
        }

        output
    }
}
