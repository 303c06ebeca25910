//! History CLI command

use clap::Args;

use crate::config::FinreportPaths;
use crate::display::format_history;
use crate::error::ReportResult;
use crate::history::ExportHistory;

/// Arguments for `finreport history`
#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Number of exports to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
}

/// List recent exports
pub fn handle_history_command(paths: &FinreportPaths, args: HistoryArgs) -> ReportResult<()> {
    let history = ExportHistory::new(paths.history_log());
    let records = history.read_recent(args.limit)?;

    println!("{}", format_history(&records));

    let total = history.entry_count()?;
    if total > records.len() {
        println!();
        println!("Showing {} of {} exports.", records.len(), total);
    }

    Ok(())
}
