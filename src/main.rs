use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use finreport::cli::{
    handle_export_command, handle_history_command, handle_show_command, ExportArgs, HistoryArgs,
    ShowArgs,
};
use finreport::config::{FinreportPaths, Settings};

/// Environment variable holding the log filter
const LOG_ENV: &str = "FINREPORT_LOG";

#[derive(Parser)]
#[command(
    name = "finreport",
    version,
    about = "Export financial reports to paginated PDF",
    long_about = "finreport turns a computed financial report, and optionally a \
                  screenshot of its on-screen rendering, into a multi-page A4 PDF. \
                  When the screenshot cannot be used the report is laid out as text."
)]
struct Cli {
    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Export a report to PDF
    Export(ExportArgs),

    /// Print a report in the terminal
    Show(ShowArgs),

    /// List recent exports
    History(HistoryArgs),

    /// Show current configuration and paths
    Config,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let paths = FinreportPaths::new().context("could not resolve the finreport directory")?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Export(args)) => {
            handle_export_command(&paths, &settings, args)?;
        }
        Some(Commands::Show(args)) => {
            handle_show_command(&settings, args)?;
        }
        Some(Commands::History(args)) => {
            handle_history_command(&paths, args)?;
        }
        Some(Commands::Config) => {
            println!("finreport Configuration");
            println!("=======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Export history:   {}", paths.history_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol: {}", settings.currency_symbol);
            println!(
                "  Output directory: {}",
                settings
                    .output_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "(current directory)".to_string())
            );
            println!("  Record history:  {}", settings.record_history);
            println!("  Date format:     {}", settings.date_format);
        }
        None => {
            println!("finreport - financial report export");
            println!();
            println!("Run 'finreport --help' for usage information.");
            println!("Run 'finreport export <REPORT_JSON>' to produce a PDF.");
        }
    }

    Ok(())
}
