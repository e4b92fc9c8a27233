//! Command-line arguments for `hcard`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use hcard_cli::pipeline::CollisionPolicy;

#[derive(Parser)]
#[command(
    name = "hcard",
    version,
    about = "Health Card Studio - turn school health-check sheets into report cards",
    long_about = "Turn school health-check spreadsheets into one report card per student.\n\n\
                  Reads CSV, TSV, Excel/ODS workbooks (every sheet) and JSON arrays,\n\
                  matches whatever headers the sheet uses to the canonical fields,\n\
                  and renders a single-page card for each student."
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

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for humans, json for machines).
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

    /// Allow student names and raw cell values in log output.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render one report card per record.
    Render(RenderArgs),

    /// Normalize records and write them as JSON or CSV.
    Normalize(NormalizeArgs),

    /// List the canonical fields and the headers each one accepts.
    Fields,
}

#[derive(Parser)]
pub struct RenderArgs {
    /// Source files or directories.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Directory the cards are written to.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "cards")]
    pub output_dir: PathBuf,

    /// TOML settings file with layout and batch options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Card format.
    #[arg(long = "format", value_enum, default_value = "svg")]
    pub format: RenderFormatArg,

    /// Also write the normalized records under `<output-dir>/interchange/`.
    #[arg(long = "interchange", value_enum, default_value = "none")]
    pub interchange: InterchangeArg,

    /// What to do when two students share a file name.
    #[arg(long = "on-collision", value_enum)]
    pub on_collision: Option<CollisionArg>,

    /// Layout/render worker threads.
    #[arg(long = "workers", value_name = "N")]
    pub workers: Option<usize>,

    /// Give up on a card whose renderer runs longer than this.
    #[arg(long = "render-timeout-secs", value_name = "SECS")]
    pub render_timeout_secs: Option<u64>,

    /// Write the batch result as JSON.
    #[arg(long = "report", value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Header logo image.
    #[arg(long = "logo", value_name = "PATH")]
    pub logo: Option<PathBuf>,

    /// Report title printed in the header.
    #[arg(long = "title")]
    pub title: Option<String>,

    /// Run the whole pipeline without writing any files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// Source files or directories.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output format.
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: RecordFormatArg,

    /// Output file (default: stdout).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RenderFormatArg {
    Svg,
    Json,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InterchangeArg {
    None,
    Json,
    Csv,
    Both,
}

impl InterchangeArg {
    pub fn json(self) -> bool {
        matches!(self, InterchangeArg::Json | InterchangeArg::Both)
    }

    pub fn csv(self) -> bool {
        matches!(self, InterchangeArg::Csv | InterchangeArg::Both)
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum RecordFormatArg {
    Json,
    Csv,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum CollisionArg {
    Overwrite,
    Suffix,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(arg: CollisionArg) -> Self {
        match arg {
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::Suffix => CollisionPolicy::Suffix,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
