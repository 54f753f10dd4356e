//! Command-line interface argument parsing and definitions
//!
//! The tool takes exactly one positional argument, the source model path.
//! Every flag is optional; without flags the run reads the file, converts
//! it and writes `generated-thing-model.json` to the working directory.

use clap::{Args, Parser, ValueEnum};
use is_terminal::IsTerminal;
use std::path::PathBuf;

/// dtdl2tm - Convert DTDL interfaces into WoT Thing Models
///
/// Reads a DTDL interface (JSON or YAML) and writes the equivalent
/// W3C Web of Things Thing Model as tab-indented JSON.
#[derive(Parser, Debug)]
#[command(
    name = "dtdl2tm",
    version,
    author,
    about,
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, env = "DTDL2TM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Format of status output on stdout
    #[arg(long, value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    #[command(flatten)]
    pub convert: ConvertArgs,
}

/// Arguments for the conversion itself
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Path to the DTDL source model (JSON or YAML)
    #[arg(value_name = "SOURCE_MODEL")]
    pub source_model: PathBuf,

    /// Fail instead of writing output when type information is lost
    #[arg(long)]
    pub strict: bool,

    /// Output file path (defaults to generated-thing-model.json)
    #[arg(short = 'o', long = "out", value_name = "OUTPUT_FILE")]
    pub out: Option<PathBuf>,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
}

impl Cli {
    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}
