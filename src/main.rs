use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::debug;

mod inputs;
mod log;
mod logging;
mod model;
mod render;

use logging::LogConfig;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser, Debug)]
#[command(name = "cct-logstats")]
#[command(about = "Summarize CCT benchmark run logs into a table", long_about = None)]
struct Cli {
    /// Input log files or glob patterns; matches are processed in sorted order.
    #[arg(short = 'i', long = "input", required = true, num_args = 1..)]
    input: Vec<String>,

    /// Set logging to DEBUG.
    #[arg(long)]
    debug: bool,

    /// Set logging to ERROR.
    #[arg(long)]
    error: bool,

    /// Set logging to WARNING.
    #[arg(long)]
    warning: bool,

    /// If set, log output goes to this file instead of stderr.
    #[arg(long)]
    logfilename: Option<PathBuf>,

    /// Report format written to stdout.
    #[arg(long, value_enum, default_value_t = ReportFormat::Table)]
    format: ReportFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Table,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config =
        LogConfig::from_flags(cli.debug, cli.error, cli.warning, cli.logfilename.clone());
    log_config.init()?;

    let report = run(&cli, &log_config)?;
    print!("{}", report);

    Ok(())
}

/// Discover, aggregate and render; any error aborts the whole batch.
fn run(cli: &Cli, log_config: &LogConfig) -> Result<String> {
    debug!(level = %log_config.level, file = ?log_config.file, "logging configured");

    // 1) Expand globs.
    let files = inputs::expand_inputs(&cli.input)?;
    debug!("{} input files", files.len());

    // 2) Parse + summarize each run log.
    let table = model::aggregate(&files)?;

    // 3) Render.
    match cli.format {
        ReportFormat::Table => render::render_table_report(&table),
        ReportFormat::Json => render::render_json_report(&table),
    }
}
