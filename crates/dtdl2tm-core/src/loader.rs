//! Source model loading for JSON and YAML documents
//!
//! Documents are parsed, never validated against DTDL. The only structural
//! requirement is an object at the root.

use crate::types::SourceModel;
use crate::{Error, Result};
use serde_json::Value;
use std::path::Path;

/// Supported input formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// YAML format (.yaml, .yml)
    Yaml,
    /// JSON format (.json)
    Json,
}

impl Format {
    /// Detect format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Load a source model from a file
///
/// Known extensions pick the parser. Anything else is tried as JSON, then
/// as YAML.
pub fn load_source_model(path: &Path) -> Result<SourceModel> {
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_at(path, e))?;
    let value = match Format::from_path(path) {
        Some(format) => parse_content(&content, format, path)?,
        None => parse_with_fallback(&content, path)?,
    };

    tracing::debug!(path = %path.display(), "Loaded source document");
    source_model_from_value(value, path)
}

/// Parse a source model from a string in a known format
pub fn load_source_model_str(content: &str, format: Format) -> Result<SourceModel> {
    let path = Path::new("<memory>");
    let value = parse_content(content, format, path)?;
    source_model_from_value(value, path)
}

/// Parse content into a JSON value
pub fn parse_content(content: &str, format: Format, path: &Path) -> Result<Value> {
    match format {
        Format::Json => parse_json(content, path),
        Format::Yaml => parse_yaml(content, path),
    }
}

fn parse_json(content: &str, path: &Path) -> Result<Value> {
    serde_json::from_str(content).map_err(|e| Error::Json {
        message: format!("{}: {}", path.display(), e),
        source: e,
    })
}

fn parse_yaml(content: &str, path: &Path) -> Result<Value> {
    // YAML first, then converted so both formats share one representation
    let yaml_value: serde_yaml::Value = serde_yaml::from_str(content).map_err(|e| Error::Yaml {
        message: format!("{}: {}", path.display(), e),
        source: e,
    })?;

    serde_json::to_value(yaml_value).map_err(|e| Error::Json {
        message: format!("{}: {}", path.display(), e),
        source: e,
    })
}

fn parse_with_fallback(content: &str, path: &Path) -> Result<Value> {
    match parse_json(content, path) {
        Ok(value) => Ok(value),
        Err(json_err) => parse_yaml(content, path).map_err(|_| json_err),
    }
}

fn source_model_from_value(value: Value, path: &Path) -> Result<SourceModel> {
    if !value.is_object() {
        return Err(Error::Parse {
            path: path.to_path_buf(),
            message: "Source model must be an object at the root level".to_string(),
        });
    }

    serde_json::from_value(value).map_err(|e| Error::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
