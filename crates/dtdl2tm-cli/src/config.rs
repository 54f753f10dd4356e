//! Configuration management for the CLI
//!
//! This module handles loading configuration from:
//! - Default values
//! - Configuration files (YAML/JSON)
//! - Command-line arguments, which override file values

use crate::error::{Error, Result};
use dtdl2tm_core::{ConversionOptions, StrictMode, DEFAULT_OUTPUT_FILE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output settings
    pub output: OutputConfig,

    /// Conversion settings
    pub conversion: ConversionConfig,

    /// Logging settings
    pub logging: LogSettings,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// File the Thing Model is written to
    pub file: PathBuf,
}

/// Conversion configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Fail on degradations of Warning severity or above
    pub strict: bool,

    /// Override for the Thing Model `@context` URI
    pub context_uri: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (compact, full, json)
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file: PathBuf::from(DEFAULT_OUTPUT_FILE),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "compact".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Cannot read {}: {}", path.display(), e)))?;

        let is_yaml = matches!(
            path.extension().and_then(|s| s.to_str()),
            Some("yaml") | Some("yml")
        );

        let config = if is_yaml {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_config_paths())
    }

    /// Load the first existing file among `paths`, or defaults
    pub fn load_from(paths: &[PathBuf]) -> Result<Self> {
        for path in paths {
            if path.exists() {
                match Self::from_file(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        eprintln!("Warning: Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file or default locations
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            Self::from_file(path)
        } else {
            Self::load()
        }
    }

    /// Get default configuration file paths to check
    fn default_config_paths() -> Vec<PathBuf> {
        let mut paths = vec![
            PathBuf::from(".dtdl2tm.yaml"),
            PathBuf::from(".dtdl2tm.json"),
        ];

        if let Some(config_dir) = dirs::config_dir() {
            let dtdl2tm_dir = config_dir.join("dtdl2tm");
            paths.push(dtdl2tm_dir.join("config.yaml"));
            paths.push(dtdl2tm_dir.join("config.json"));
        }

        paths
    }

    /// Build conversion options; `--strict` wins over a lenient config
    pub fn conversion_options(&self, strict_flag: bool) -> ConversionOptions {
        let strict_mode = if strict_flag || self.conversion.strict {
            StrictMode::Strict
        } else {
            StrictMode::Warn
        };

        let options = ConversionOptions::default().with_strict_mode(strict_mode);
        match &self.conversion.context_uri {
            Some(uri) => options.with_context_uri(uri.as_str()),
            None => options,
        }
    }

    /// Resolve the output path; `--out` wins over the configured file
    pub fn output_path(&self, out_flag: Option<&Path>) -> PathBuf {
        out_flag
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output.file.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dtdl2tm_core::TD_CONTEXT_URI;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.output.file, PathBuf::from("generated-thing-model.json"));
        assert!(!config.conversion.strict);
        assert_eq!(config.logging.level, "warn");

        let options = config.conversion_options(false);
        assert_eq!(options.strict_mode, StrictMode::Warn);
        assert_eq!(options.context_uri, TD_CONTEXT_URI);
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "output:\n  file: out/tm.json\nconversion:\n  strict: true\n  context_uri: https://example.com/ctx\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.output.file, PathBuf::from("out/tm.json"));
        assert!(config.conversion.strict);
        assert_eq!(config.logging, LogSettings::default());

        let options = config.conversion_options(false);
        assert_eq!(options.strict_mode, StrictMode::Strict);
        assert_eq!(options.context_uri, "https://example.com/ctx");
    }

    #[test]
    fn test_from_json_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"logging": {"level": "debug", "format": "json"}}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_load_from_picks_first_existing() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join(".dtdl2tm.yaml");
        let second = dir.path().join(".dtdl2tm.json");
        std::fs::write(&second, r#"{"conversion": {"strict": true}}"#).unwrap();

        let config = Config::load_from(&[first.clone(), second.clone()]).unwrap();
        assert!(config.conversion.strict);

        std::fs::write(&first, "output:\n  file: first.json\n").unwrap();
        let config = Config::load_from(&[first, second]).unwrap();
        assert_eq!(config.output.file, PathBuf::from("first.json"));
        assert!(!config.conversion.strict);
    }

    #[test]
    fn test_load_from_without_files_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_from(&[dir.path().join("absent.yaml")]).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_with_file(Some(&dir.path().join("absent.yaml")));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_flags_override_config() {
        let config = Config::default();
        assert_eq!(config.conversion_options(true).strict_mode, StrictMode::Strict);
        assert_eq!(
            config.output_path(Some(Path::new("custom.json"))),
            PathBuf::from("custom.json")
        );
        assert_eq!(config.output_path(None), PathBuf::from(DEFAULT_OUTPUT_FILE));
    }
}
