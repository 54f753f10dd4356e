//! Error types for the dtdl2tm core library
//!
//! This module defines the error handling system for the converter,
//! using thiserror for error definitions and anyhow for flexible error contexts.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Message carried by every unsupported-content fault
pub const UNSUPPORTED_CONTENT_MESSAGE: &str = "This type of content is not supported";

/// Main error type for dtdl2tm operations
#[derive(Error, Debug)]
pub enum Error {
    /// A content item whose kind is not Telemetry, Property or Command
    #[error("Unsupported content at {path}: {message} (kind: {})", kind.as_deref().unwrap_or("<none>"))]
    UnsupportedContent {
        message: String,
        kind: Option<String>,
        path: String,
    },

    /// Degradations were recorded while running in strict mode
    #[error("Strictness violation: {message} (mode: {mode})")]
    StrictnessViolation {
        message: String,
        mode: StrictMode,
        violations: usize,
    },

    /// The loaded document is structurally unusable as a source model
    #[error("Parse error in '{}': {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// JSON parsing and serialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// YAML parsing errors
    #[error("YAML error: {message}")]
    Yaml {
        message: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic internal error with context
    #[error("Internal error: {message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Build the fault raised by the content dispatcher
    pub fn unsupported_content(kind: Option<&str>, path: impl Into<String>) -> Self {
        Error::UnsupportedContent {
            message: UNSUPPORTED_CONTENT_MESSAGE.to_string(),
            kind: kind.map(str::to_string),
            path: path.into(),
        }
    }

    /// Attach a file path to IO errors
    pub fn io_at(path: &std::path::Path, source: std::io::Error) -> Self {
        Error::Io {
            message: format!("{}: {}", path.display(), source),
            source,
        }
    }

    /// Render the structured `{ "error": true, "message": ... }` fault value
    pub fn to_fault(&self) -> serde_json::Value {
        let message = match self {
            Error::UnsupportedContent { message, .. } => message.clone(),
            other => other.to_string(),
        };
        serde_json::json!({ "error": true, "message": message })
    }

    /// Whether this error came from the conversion itself rather than loading
    pub fn is_conversion_fault(&self) -> bool {
        matches!(
            self,
            Error::UnsupportedContent { .. } | Error::StrictnessViolation { .. }
        )
    }
}

/// Strictness modes for conversion runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StrictMode {
    /// Fail when any degradation of Warning severity or above is recorded
    Strict,
    /// Keep lenient behaviour and report degradations
    #[default]
    Warn,
}

/// Severity levels for degradations
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational, no action required
    Info,
    /// Warning, output lost some type information
    Warning,
    /// Error, output is likely wrong
    Error,
}

/// Codes describing why a mapped descriptor lost information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DegradationCode {
    /// Primitive type name missing from the normalization table
    UnknownPrimitive,
    /// Schema shape the mapper does not understand
    UnsupportedSchema,
    /// Object field whose schema is itself an object
    NestedObject,
    /// Content item without a name
    MissingName,
    /// Later content item replaced an earlier one in the same bucket
    NameCollision,
    /// Command response without a request to take its name from
    OrphanResponse,
}

impl DegradationCode {
    /// Default severity attached to this code
    pub fn severity(self) -> Severity {
        match self {
            DegradationCode::UnknownPrimitive
            | DegradationCode::UnsupportedSchema
            | DegradationCode::NestedObject
            | DegradationCode::OrphanResponse => Severity::Warning,
            DegradationCode::MissingName => Severity::Error,
            DegradationCode::NameCollision => Severity::Info,
        }
    }
}

impl fmt::Display for StrictMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrictMode::Strict => write!(f, "Strict"),
            StrictMode::Warn => write!(f, "Warn"),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl fmt::Display for DegradationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DegradationCode::UnknownPrimitive => write!(f, "UnknownPrimitive"),
            DegradationCode::UnsupportedSchema => write!(f, "UnsupportedSchema"),
            DegradationCode::NestedObject => write!(f, "NestedObject"),
            DegradationCode::MissingName => write!(f, "MissingName"),
            DegradationCode::NameCollision => write!(f, "NameCollision"),
            DegradationCode::OrphanResponse => write!(f, "OrphanResponse"),
        }
    }
}

// Conversion implementations
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::Yaml {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal {
            message: err.to_string(),
            source: err,
        }
    }
}
