//! Output formatting and writing utilities
//!
//! Status output goes to stdout, either human-readable or as one JSON
//! document per run. The Thing Model itself is always written to a file.

use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use dtdl2tm_core::{ConversionResult, DegradationReport, Severity};
use serde_json::{json, Value};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

/// Trait for formatting conversion output
pub trait OutputFormatter {
    /// Format a conversion result together with the file it was written to
    fn format_conversion_result(&self, result: &ConversionResult, written_to: &Path) -> Result<String>;

    /// Format a degradation report
    fn format_degradation_report(&self, report: &DegradationReport) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format_conversion_result(&self, result: &ConversionResult, written_to: &Path) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(&json!({
                "status": "ok",
                "output": written_to.display().to_string(),
                "metadata": result.metadata,
                "degradations": result.degradations,
            }))?),
            OutputFormat::Human => format_conversion_result_human(result, written_to),
        }
    }

    fn format_degradation_report(&self, report: &DegradationReport) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(report)?),
            OutputFormat::Human => format_degradation_report_human(report),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer on stdout
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self::with_writer(format, use_color, quiet, verbose, Box::new(io::stdout()))
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            quiet,
            verbose,
            writer,
        }
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message; shown only with `-v`
    pub fn info(&mut self, message: &str) -> Result<()> {
        debug!("Output info: {}", message);

        if self.quiet || self.verbose == 0 || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&format!("{} {}", "ℹ".blue(), message))
        } else {
            self.writeln(&format!("INFO: {}", message))
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Report a conversion fault; JSON mode emits the structured fault value
    pub fn fault(&mut self, fault: &Value) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                let document = json!({ "status": "error", "fault": fault });
                self.writeln(&serde_json::to_string(&document)?)
            }
            OutputFormat::Human => Ok(()),
        }
    }

    /// Write the outcome of a successful conversion
    pub fn conversion_result(&mut self, result: &ConversionResult, written_to: &Path) -> Result<()> {
        let formatted = self.format.format_conversion_result(result, written_to)?;

        match self.format {
            OutputFormat::Json => self.writeln(&formatted),
            OutputFormat::Human => {
                if self.quiet {
                    return Ok(());
                }
                self.success(&format!("✓ Thing Model written to {}", written_to.display()))?;
                self.writeln(formatted.trim_end())?;

                if result.has_degradations() {
                    let report = self.format.format_degradation_report(&result.degradations)?;
                    self.warning(report.trim_end())?;
                }
                Ok(())
            }
        }
    }
}

/// Format a conversion result for human reading
fn format_conversion_result_human(result: &ConversionResult, written_to: &Path) -> Result<String> {
    let metadata = &result.metadata;
    let mut output = String::new();

    output.push_str("═══ Conversion Result ═══\n");
    if let Some(source_id) = &metadata.source_id {
        output.push_str(&format!("  Source: {}\n", source_id));
    }
    output.push_str(&format!("  Output: {}\n", written_to.display()));
    output.push_str(&format!("  Contents: {}\n", metadata.content_count));
    output.push_str(&format!(
        "  Properties: {}  Actions: {}  Events: {}\n",
        metadata.properties, metadata.actions, metadata.events
    ));
    output.push_str(&format!("  Strict Mode: {}\n", metadata.strict_mode));
    output.push_str(&format!("  Duration: {}ms\n", metadata.duration_ms));

    Ok(output)
}

/// Format a degradation report for human reading
fn format_degradation_report_human(report: &DegradationReport) -> Result<String> {
    let mut output = String::new();

    if report.items.is_empty() {
        output.push_str("No degradations\n");
        return Ok(output);
    }

    output.push_str(&format!("{} degradation(s) recorded\n", report.summary.total_items));

    for severity in [Severity::Error, Severity::Warning, Severity::Info] {
        for item in report.items.iter().filter(|item| item.severity == severity) {
            output.push_str(&format!(
                "  [{}] {} at {}: {}\n",
                item.severity, item.code, item.path, item.message
            ));
        }
    }

    Ok(output)
}
