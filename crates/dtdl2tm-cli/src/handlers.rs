//! Command handler for the conversion run

use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use dtdl2tm_core::{convert_with, load_source_model, write_thing_model};

/// Load, convert and write one source model
///
/// The output file is touched only after the conversion succeeded.
pub fn handle_convert(args: &ConvertArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let source_display = args.source_model.display().to_string();
    let _timer = Timer::with_details("convert", &source_display);

    output.info(&format!("Converting source model: {}", source_display))?;

    if !args.source_model.exists() {
        return Err(Error::FileNotFound {
            path: args.source_model.clone(),
        });
    }

    let source = load_source_model(&args.source_model)?;
    tracing::debug!(
        source_id = source.id.as_deref().unwrap_or(""),
        contents = source.contents.len(),
        "Loaded source model"
    );

    let options = config.conversion_options(args.strict);
    let result = match convert_with(&source, options) {
        Ok(result) => result,
        Err(e) => {
            if e.is_conversion_fault() {
                output.fault(&e.to_fault())?;
            }
            return Err(e.into());
        }
    };

    let output_path = config.output_path(args.out.as_deref());
    write_thing_model(&output_path, &result.thing_model)?;

    output.conversion_result(&result, &output_path)
}
