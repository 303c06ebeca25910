//! Export orchestration
//!
//! Tries the raster strategy first and falls back to the text flow strategy
//! when the surface cannot be captured. Owns the output filename and the final
//! save.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::capture::{RenderedSurface, SurfaceCapture};
use super::geometry::{PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use super::persist::Persist;
use super::{raster, text};
use crate::error::{ReportError, ReportResult};
use crate::models::{Period, Report};

/// Ways of producing a document, in the order they are attempted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStrategy {
    /// Capture the on-screen rendering and slice it into pages
    Raster,
    /// Lay the report out as text
    TextFlow,
}

impl fmt::Display for ExportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportStrategy::Raster => write!(f, "raster"),
            ExportStrategy::TextFlow => write!(f, "text-flow"),
        }
    }
}

/// Inputs shared by every strategy for one export
struct StrategyInput<'a> {
    report: &'a Report,
    surface: Option<&'a RenderedSurface>,
    capture: &'a dyn SurfaceCapture,
    currency_symbol: &'a str,
}

impl ExportStrategy {
    fn produce(self, input: &StrategyInput<'_>) -> ReportResult<RenderedDocument> {
        debug!(strategy = %self, "producing document");

        let document = match self {
            ExportStrategy::Raster => {
                let surface = input
                    .surface
                    .ok_or_else(|| ReportError::capture("no rendered surface to capture"))?;
                let document = raster::capture_and_paginate(
                    input.capture,
                    surface,
                    PAGE_WIDTH_MM,
                    PAGE_HEIGHT_MM,
                )?;
                let bytes = document.to_bytes().map_err(|e| {
                    ReportError::capture(format!("cannot assemble captured pages: {}", e))
                })?;
                RenderedDocument {
                    strategy: self,
                    page_count: document.page_count(),
                    bytes,
                }
            }
            ExportStrategy::TextFlow => {
                let document = text::render_report_as_text(input.report, input.currency_symbol)?;
                RenderedDocument {
                    strategy: self,
                    page_count: document.page_count(),
                    bytes: document.to_bytes()?,
                }
            }
        };

        Ok(document)
    }
}

/// A finished PDF payload
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub strategy: ExportStrategy,
    pub page_count: usize,
    pub bytes: Vec<u8>,
}

/// What an export produced and where it went
#[derive(Debug, Clone)]
pub struct ExportOutcome {
    pub filename: String,
    pub strategy: ExportStrategy,
    pub page_count: usize,
    pub saved_to: PathBuf,
    /// Why the raster strategy was abandoned, if it was
    pub fallback_reason: Option<String>,
}

/// File name for a report covering `period`
///
/// Dates are used exactly as the report spells them.
pub fn report_filename(period: &Period) -> String {
    format!(
        "Financial_Report_{}_to_{}.pdf",
        period.start_date, period.end_date
    )
}

/// Exports reports through a capture and a persist collaborator
pub struct ReportExporter<C, P> {
    capture: C,
    persist: P,
    currency_symbol: String,
    text_only: bool,
}

impl<C: SurfaceCapture, P: Persist> ReportExporter<C, P> {
    pub fn new(capture: C, persist: P) -> Self {
        Self {
            capture,
            persist,
            currency_symbol: "Rs.".to_string(),
            text_only: false,
        }
    }

    /// Symbol printed before amounts in the text layout
    pub fn with_currency_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.currency_symbol = symbol.into();
        self
    }

    /// Skip capture and always lay the report out as text
    pub fn text_only(mut self, text_only: bool) -> Self {
        self.text_only = text_only;
        self
    }

    pub fn persist(&self) -> &P {
        &self.persist
    }

    /// Produce the document without saving it
    ///
    /// Returns the document and, when the raster attempt failed, the reason.
    /// Capture errors never escape this function.
    pub fn render(
        &self,
        report: &Report,
        surface: Option<&RenderedSurface>,
    ) -> ReportResult<(RenderedDocument, Option<String>)> {
        report.validate()?;

        let input = StrategyInput {
            report,
            surface,
            capture: &self.capture,
            currency_symbol: &self.currency_symbol,
        };

        if self.text_only {
            return Ok((ExportStrategy::TextFlow.produce(&input)?, None));
        }

        match ExportStrategy::Raster.produce(&input) {
            Ok(document) => Ok((document, None)),
            Err(err) if err.is_capture() => {
                warn!(error = %err, "raster export failed, falling back to text layout");
                let document = ExportStrategy::TextFlow.produce(&input)?;
                Ok((document, Some(err.to_string())))
            }
            Err(err) => Err(err),
        }
    }

    /// Produce the document for `report` and save it
    pub fn export_report(
        &self,
        report: &Report,
        surface: Option<&RenderedSurface>,
    ) -> ReportResult<ExportOutcome> {
        let (document, fallback_reason) = self.render(report, surface)?;
        let filename = report_filename(&report.period);

        let saved_to = self.persist.save(&filename, &document.bytes)?;
        info!(
            file = %saved_to.display(),
            strategy = %document.strategy,
            pages = document.page_count,
            "report exported"
        );

        Ok(ExportOutcome {
            filename,
            strategy: document.strategy,
            page_count: document.page_count,
            saved_to,
            fallback_reason,
        })
    }
}
