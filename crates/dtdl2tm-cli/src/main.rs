//! dtdl2tm CLI - Convert DTDL interfaces into WoT Thing Models
//!
//! This is the main entry point: it reads exactly one source model path,
//! converts the interface and writes `generated-thing-model.json`.

mod cli;
mod config;
mod error;
mod handlers;
mod logging;
mod output;

use clap::Parser;
use cli::Cli;
use colored::control;
use config::Config;
use error::Result;
use logging::{timing::Timer, LoggingConfig};
use output::OutputWriter;
use std::process;
use tracing::instrument;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors print to stderr, help and version to stdout
            let _ = e.print();
            process::exit(error::parse_exit_code(&e));
        }
    };

    control::set_override(cli.use_color());

    let config = match Config::load_with_file(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    if let Err(e) = init_logging(&cli, &config) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    match run(cli, config) {
        Ok(()) => process::exit(0),
        Err(e) => exit_with(&e),
    }
}

fn exit_with(error: &error::Error) -> ! {
    eprintln!(
        "{}",
        error::format_error(error, control::SHOULD_COLORIZE.should_colorize())
    );
    process::exit(error.exit_code());
}

/// Main application logic
#[instrument(skip_all, fields(source = %cli.convert.source_model.display()))]
fn run(cli: Cli, config: Config) -> Result<()> {
    let _timer = Timer::new("cli_execution");

    let mut output = OutputWriter::new(
        cli.output_format,
        cli.use_color(),
        cli.quiet,
        cli.verbosity_level(),
    );

    tracing::info!(
        verbosity = cli.verbosity_level(),
        strict = cli.convert.strict,
        "Starting conversion"
    );

    handlers::handle_convert(&cli.convert, &config, &mut output)
}

/// Initialize the logging system
fn init_logging(cli: &Cli, config: &Config) -> Result<()> {
    let mut logging_config = LoggingConfig::from_settings(&config.logging, cli.verbosity_level());

    logging_config.merge_with_env();

    // Quiet mode logs errors only
    if cli.quiet {
        logging_config.level = "error".to_string();
        logging_config.console = false;
    }

    logging::init_logging(logging_config)
}
