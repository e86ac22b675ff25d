//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "tabscrub",
    version,
    about = "Clean delimited text exports and report what changed",
    long_about = "Clean semi-structured delimited exports (CSV/TXT).\n\n\
                  Detects the input encoding, repairs column-count anomalies,\n\
                  normalizes cell values, and emits a cleaned file plus a\n\
                  cleaning report."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Clean one delimited file and write the result next to it.
    Clean(CleanArgs),

    /// Show the detected encoding and a preview without cleaning anything.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct CleanArgs {
    /// The delimited input file (.csv/.txt).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Where to write the cleaned file (default: <INPUT> with a .cleaned suffix).
    #[arg(long, short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Field delimiter of the input (and output).
    #[arg(long, default_value = ";")]
    pub delimiter: char,

    /// Value written into cells that end up empty.
    #[arg(long = "default-value", default_value = "NA")]
    pub default_value: String,

    /// Treat the first row as data, not column names.
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Pad short rows instead of failing on ragged input.
    #[arg(long = "pad-ragged")]
    pub pad_ragged: bool,

    /// Remove columns that are empty or whitespace-only everywhere.
    #[arg(long = "drop-empty-columns")]
    pub drop_empty_columns: bool,

    /// Skip the unnamed-column repair heuristic.
    #[arg(long = "no-repair-unnamed")]
    pub no_repair_unnamed: bool,

    /// Merge the named columns into the first one (comma-separated positions
    /// or header names).
    #[arg(long = "merge", value_name = "SELECTORS")]
    pub merge: Option<String>,

    /// Separator placed between merged values.
    #[arg(long = "merge-separator", default_value = ", ", value_name = "SEP")]
    pub merge_separator: String,

    /// Only merge rows whose final cell is empty (shifted-row signature).
    #[arg(long = "merge-shifted-only")]
    pub merge_shifted_only: bool,

    /// Assign a normalization role to a column: COLUMN=iban|name|address|time.
    #[arg(long = "role", value_name = "COLUMN=ROLE")]
    pub roles: Vec<String>,

    /// Columns subject to whitespace repair: "all", "none", or selectors.
    #[arg(long = "strip-whitespace", default_value = "all", value_name = "COLUMNS")]
    pub strip_whitespace: String,

    /// Columns subject to the character whitelist: "all", "none", or selectors.
    #[arg(long = "filter-columns", default_value = "all", value_name = "COLUMNS")]
    pub filter_columns: String,

    /// Marker character stripped from cell ends (e.g. '|').
    #[arg(long = "trailing-marker", value_name = "CHAR")]
    pub trailing_marker: Option<char>,

    /// Extra characters to allow through the whitelist filter.
    #[arg(long = "allow", value_name = "CHARS")]
    pub allow: Option<String>,

    /// Also allow the '# - _ &' set.
    #[arg(long = "allow-extras")]
    pub allow_extras: bool,

    /// Output quoting policy.
    #[arg(long, value_enum, default_value = "minimal")]
    pub quote: QuoteArg,

    /// Output encoding label (WHATWG/IANA).
    #[arg(long = "output-encoding", default_value = "utf-8", value_name = "LABEL")]
    pub output_encoding: String,

    /// Do not prepend a UTF-8 byte-order mark to the output.
    #[arg(long = "no-bom")]
    pub no_bom: bool,

    /// Also write the cleaning report as JSON.
    #[arg(long = "report-json", value_name = "PATH")]
    pub report_json: Option<PathBuf>,

    /// Report without writing the cleaned file.
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// Rows shown in the before/after previews.
    #[arg(long = "preview-rows", default_value = "5", value_name = "N")]
    pub preview_rows: usize,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// The delimited input file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Field delimiter of the input.
    #[arg(long, default_value = ";")]
    pub delimiter: char,

    /// Treat the first row as data, not column names.
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Pad short rows instead of failing on ragged input.
    #[arg(long = "pad-ragged")]
    pub pad_ragged: bool,

    /// Rows shown in the preview.
    #[arg(long = "preview-rows", default_value = "5", value_name = "N")]
    pub preview_rows: usize,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum QuoteArg {
    Minimal,
    Always,
    Never,
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
