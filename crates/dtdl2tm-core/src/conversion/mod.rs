//! Conversion engine for turning a DTDL interface into a WoT Thing Model
//!
//! The assembler seeds the Thing Model metadata, pushes every content item
//! through the dispatcher and its mapper, and merges the resulting fragments
//! into the properties, actions and events buckets.
//!
//! Copyright (c) 2025 dtdl2tm contributors
//! Licensed under the Apache-2.0 license

pub mod context;
pub mod degradation;
pub mod dispatcher;
pub mod mappers;
pub mod normalizer;
pub mod schema;

use crate::types::{Bucket, ConversionMetadata, ConversionResult, SourceModel, ThingModel};
use crate::Result;
use chrono::SecondsFormat;
use std::time::Instant;

pub use context::{ConversionContext, ConversionOptions};
pub use degradation::DegradationTracker;
pub use dispatcher::{ContentDispatcher, ContentKind};
pub use mappers::{CommandMapper, ContentMapper, PropertyMapper, TelemetryMapper};
pub use normalizer::{normalize, TypeNormalizer};
pub use schema::SchemaMapper;

/// Model assembler
///
/// Holds the options for a run; each call to [`convert`](Self::convert)
/// builds a fresh context, so one converter can be reused across models.
#[derive(Debug, Clone, Default)]
pub struct ThingModelConverter {
    options: ConversionOptions,
}

impl ThingModelConverter {
    /// Create a converter with the given options
    pub fn new(options: ConversionOptions) -> Self {
        Self { options }
    }

    /// Options used by this converter
    pub fn options(&self) -> &ConversionOptions {
        &self.options
    }

    /// Convert a source model
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A content item has an unsupported kind (the whole run is aborted)
    /// - Strict mode is on and a Warning-or-worse degradation was recorded
    pub fn convert(&self, source: &SourceModel) -> Result<ConversionResult> {
        let start_time = Instant::now();
        let span = tracing::info_span!(
            "convert",
            model = source.id.as_deref().unwrap_or("<anonymous>"),
            contents = source.contents.len()
        );
        let _guard = span.enter();

        let mut ctx = ConversionContext::new(self.options.clone());
        let mut thing_model = ThingModel::new(&ctx.options.context_uri, ctx.timestamp);
        thing_model.title = source.display_name.clone();
        thing_model.description = source.description.clone();

        for (index, item) in source.contents.iter().enumerate() {
            ctx.enter_item(index);
            let path = ctx.item_path();

            let mapper = ContentDispatcher::mapper_for(item, &path)?;
            let mapped = mapper.map(item, &mut ctx);
            let bucket = mapped.target_key();
            let name = mapped.name.clone();
            tracing::debug!(path = %path, %bucket, name = %name, "Mapped content item");

            if thing_model.insert(mapped).is_some() {
                ctx.tracker.add_name_collision(&path, &bucket.to_string(), &name);
            }
        }

        ctx.tracker.check_strictness()?;

        let metadata = ConversionMetadata {
            source_id: source.id.clone(),
            timestamp: ctx.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            duration_ms: start_time.elapsed().as_millis() as u64,
            strict_mode: ctx.strict_mode(),
            content_count: source.contents.len(),
            properties: thing_model.bucket_len(Bucket::Properties),
            actions: thing_model.bucket_len(Bucket::Actions),
            events: thing_model.bucket_len(Bucket::Events),
        };

        tracing::info!(
            properties = metadata.properties,
            actions = metadata.actions,
            events = metadata.events,
            duration_ms = metadata.duration_ms,
            "Conversion complete"
        );

        Ok(ConversionResult {
            thing_model,
            degradations: ctx.tracker.build_report(),
            metadata,
        })
    }
}

/// Convert a source model with default options, returning only the Thing Model
pub fn convert(source: &SourceModel) -> Result<ThingModel> {
    convert_with(source, ConversionOptions::default()).map(|result| result.thing_model)
}

/// Convert a source model with explicit options
///
/// # Example
///
/// ```
/// use dtdl2tm_core::{convert_with, ConversionOptions, ContentItem, DataSchema, SourceModel};
///
/// # fn example() -> dtdl2tm_core::Result<()> {
/// let source = SourceModel::new("Sensor")
///     .with_content(ContentItem::telemetry("temp", DataSchema::primitive("double")));
///
/// let result = convert_with(&source, ConversionOptions::default())?;
/// assert!(result.thing_model.events.contains_key("temp"));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn convert_with(source: &SourceModel, options: ConversionOptions) -> Result<ConversionResult> {
    ThingModelConverter::new(options).convert(source)
}
