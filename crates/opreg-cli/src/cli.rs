//! Command-line arguments for `opreg`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use opreg_model::QuarterKey;

#[derive(Parser)]
#[command(
    name = "opreg",
    version,
    about = "Surgical case registry reports from REDCap",
    long_about = "Fetch surgical case records from a REDCap registry, normalize coded fields \
                  and print grouped case counts.\n\n\
                  The API token is read from REDCAP_API_TOKEN and the endpoint from \
                  REDCAP_API_URL (or --url)."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags and RUST_LOG).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow case values (record ids, dates) in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print metrics and one count table per chart.
    Summary(SummaryArgs),

    /// Write the filtered, normalized records to a file.
    Export(ExportArgs),

    /// List the exported registry fields and every code table.
    Fields(FieldsArgs),
}

/// Where the records come from.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// REDCap API endpoint (overrides REDCAP_API_URL).
    #[arg(long = "url", value_name = "URL", conflicts_with = "input")]
    pub url: Option<String>,

    /// Read a saved JSON export instead of calling the registry.
    #[arg(long = "input", value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Ignore cached registry data.
    #[arg(long = "refresh")]
    pub refresh: bool,
}

#[derive(Args, Clone, Default)]
pub struct FilterArgs {
    /// Years to include (comma-separated).
    #[arg(
        long = "years",
        value_name = "YEAR",
        value_delimiter = ',',
        conflicts_with_all = ["from", "to"]
    )]
    pub years: Vec<i32>,

    /// First year to include.
    #[arg(long = "from", value_name = "YEAR")]
    pub from: Option<i32>,

    /// Last year to include.
    #[arg(long = "to", value_name = "YEAR")]
    pub to: Option<i32>,

    /// Quarters to include, e.g. Q1-2024 (repeatable or comma-separated).
    #[arg(long = "quarter", value_name = "Qn-YYYY", value_delimiter = ',')]
    pub quarters: Vec<QuarterKey>,

    /// Clinical areas to include (repeatable).
    #[arg(long = "area", value_name = "NAME")]
    pub areas: Vec<String>,

    /// Access types to include (repeatable).
    #[arg(long = "access", value_name = "NAME")]
    pub access: Vec<String>,
}

#[derive(Args)]
pub struct SummaryArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,
}

#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(flatten)]
    pub filters: FilterArgs,

    /// Output file.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: PathBuf,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "csv")]
    pub format: ExportFormatArg,
}

#[derive(Args)]
pub struct FieldsArgs {
    /// Print the listing as JSON.
    #[arg(long = "json")]
    pub json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ExportFormatArg {
    Csv,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
