//! Thing Model serialization
//!
//! Output is pretty-printed JSON indented with tabs.

use crate::types::ThingModel;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::Path;

/// File name the CLI writes to by default, relative to the working directory
pub const DEFAULT_OUTPUT_FILE: &str = "generated-thing-model.json";

/// Serialize any value as tab-indented JSON
pub fn to_tab_indented_string<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    String::from_utf8(buffer).map_err(|e| Error::Internal {
        message: "Serialized JSON was not valid UTF-8".to_string(),
        source: e.into(),
    })
}

/// Serialize a Thing Model as tab-indented JSON
pub fn to_tab_indented_json(model: &ThingModel) -> Result<String> {
    to_tab_indented_string(model)
}

/// Write a Thing Model to `path`, replacing any existing file
pub fn write_thing_model(path: &Path, model: &ThingModel) -> Result<()> {
    let json = to_tab_indented_json(model)?;
    std::fs::write(path, json).map_err(|e| Error::io_at(path, e))?;

    tracing::info!(path = %path.display(), "Wrote Thing Model");
    Ok(())
}
