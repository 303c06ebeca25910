//! Show CLI command

use clap::Args;
use std::path::PathBuf;

use crate::config::Settings;
use crate::display::format_report;
use crate::error::ReportResult;
use crate::models::Report;

/// Arguments for `finreport show`
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Report JSON file
    pub report: PathBuf,
}

/// Print a report to the terminal
pub fn handle_show_command(settings: &Settings, args: ShowArgs) -> ReportResult<()> {
    let report = Report::load(&args.report)?;
    print!(
        "{}",
        format_report(&report, &settings.currency_symbol, &settings.date_format)
    );
    Ok(())
}
