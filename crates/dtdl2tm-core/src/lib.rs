//! dtdl2tm Core - Conversion engine from DTDL interfaces to WoT Thing Models
//!
//! This crate turns a DTDL interface (the source model: telemetry,
//! properties and commands with typed schemas) into a W3C Web of Things
//! Thing Model (properties, actions and events with a normalized type set).
//!
//! # Main Components
//!
//! - **Error Handling**: Error types using `thiserror` and `anyhow`
//! - **Core Types**: Source and target models plus conversion results
//! - **Conversion Engine**: Type normalizer, schema mapper, content mappers,
//!   dispatcher and model assembler
//! - **Loader / Writer**: JSON and YAML input, tab-indented JSON output
//!
//! # Example
//!
//! ```
//! use dtdl2tm_core::{convert, ContentItem, DataSchema, SourceModel};
//!
//! fn example() -> dtdl2tm_core::Result<()> {
//!     let source = SourceModel::new("Sensor")
//!         .with_content(ContentItem::telemetry("temp", DataSchema::primitive("double")));
//!
//!     let model = convert(&source)?;
//!     assert_eq!(model.events.len(), 1);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

pub mod conversion;
pub mod error;
pub mod loader;
pub mod types;
pub mod writer;

#[cfg(test)]
mod proptest_strategies;

// Re-export main types for convenience
pub use error::{DegradationCode, Error, Result, Severity, StrictMode, UNSUPPORTED_CONTENT_MESSAGE};
pub use types::{
    // Source model
    SourceModel, ContentItem, CommandPayload, DataSchema, ObjectSchema, SchemaField,

    // Target model
    ThingModel, DataType, Bucket, DataDescriptor, FieldDescriptor,
    PropertyAffordance, ActionAffordance, EventAffordance, Affordance, MappedDescriptor,

    // Conversion results
    ConversionResult, DegradationReport, DegradationItem, DegradationSummary,
    ConversionMetadata,

    // Constants
    THING_MODEL_TYPE, TD_CONTEXT_URI,
};

pub use conversion::{
    convert, convert_with, normalize, ContentDispatcher, ContentKind, ContentMapper,
    ConversionOptions, SchemaMapper, ThingModelConverter,
};
pub use loader::{load_source_model, load_source_model_str, Format};
pub use writer::{to_tab_indented_json, write_thing_model, DEFAULT_OUTPUT_FILE};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
