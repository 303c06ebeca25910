//! Export CLI command
//!
//! Loads a saved report, exports it to PDF and records the attempt in the
//! export history.

use clap::Args;
use std::path::PathBuf;
use tracing::warn;

use crate::config::{FinreportPaths, Settings};
use crate::error::{ReportError, ReportResult};
use crate::export::{
    report_filename, DirectoryPersist, ExportOutcome, ImageFileCapture, RenderedSurface,
    ReportExporter,
};
use crate::history::{ExportHistory, ExportRecord};
use crate::models::Report;

/// Arguments for `finreport export`
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Report JSON file, as returned by the reports API
    pub report: PathBuf,

    /// Screenshot of the rendered report (PNG or JPEG)
    #[arg(short, long)]
    pub surface: Option<PathBuf>,

    /// Directory to write the PDF into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Lay the report out as text even when a surface is given
    #[arg(long)]
    pub text_only: bool,
}

/// Handle the export command
pub fn handle_export_command(
    paths: &FinreportPaths,
    settings: &Settings,
    args: ExportArgs,
) -> ReportResult<ExportOutcome> {
    let history = ExportHistory::new(paths.history_log());

    let result = run_export(settings, &args);

    if settings.record_history {
        let record = match &result {
            Ok(outcome) => ExportRecord::success(outcome),
            Err((filename, err)) => ExportRecord::failure(filename.clone(), err),
        };
        if let Err(e) = history.log(&record) {
            warn!(error = %e, "could not record export history");
        }
    }

    let outcome = result.map_err(|(_, err)| err)?;

    println!("Exported: {}", outcome.filename);
    println!("  Strategy: {}", outcome.strategy);
    println!("  Pages:    {}", outcome.page_count);
    println!("  Saved to: {}", outcome.saved_to.display());
    if let Some(reason) = &outcome.fallback_reason {
        println!();
        println!("Note: screen capture was unavailable ({}).", reason);
        println!("The report was laid out as text instead.");
    }

    Ok(outcome)
}

/// Run one export; failures carry the file name they were meant for
fn run_export(
    settings: &Settings,
    args: &ExportArgs,
) -> Result<ExportOutcome, (String, ReportError)> {
    let report =
        Report::load(&args.report).map_err(|e| (args.report.display().to_string(), e))?;

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| settings.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let exporter = ReportExporter::new(ImageFileCapture::new(), DirectoryPersist::new(output_dir))
        .with_currency_symbol(settings.currency_symbol.clone())
        .text_only(args.text_only);

    let surface = args.surface.as_ref().map(RenderedSurface::from_path);

    exporter
        .export_report(&report, surface.as_ref())
        .map_err(|e| (report_filename(&report.period), e))
}
