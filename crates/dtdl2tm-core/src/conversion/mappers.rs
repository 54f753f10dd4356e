//! Content mappers
//!
//! One mapper per supported content kind. Each takes a single content item
//! and produces a [`MappedDescriptor`] tagged with its destination bucket.
//!
//! Copyright (c) 2025 dtdl2tm contributors
//! Licensed under the Apache-2.0 license

use super::context::ConversionContext;
use super::schema::SchemaMapper;
use crate::types::{
    ActionAffordance, Affordance, Bucket, CommandPayload, ContentItem, DataDescriptor,
    EventAffordance, MappedDescriptor, PropertyAffordance,
};

/// Maps one kind of content item into a Thing Model fragment
pub trait ContentMapper: Send + Sync {
    /// Bucket every descriptor from this mapper lands in
    fn bucket(&self) -> Bucket;

    /// Map a content item
    fn map(&self, item: &ContentItem, ctx: &mut ConversionContext) -> MappedDescriptor;
}

/// Resolve the item name, recording a degradation when it is missing
fn item_name(item: &ContentItem, ctx: &mut ConversionContext) -> String {
    if item.name.is_none() {
        let path = ctx.item_path();
        ctx.tracker.add_missing_name(&path);
    }
    item.name_or_empty().to_string()
}

/// Telemetry becomes an event whose value type sits under `data`
#[derive(Debug, Clone, Copy, Default)]
pub struct TelemetryMapper;

impl ContentMapper for TelemetryMapper {
    fn bucket(&self) -> Bucket {
        Bucket::Events
    }

    fn map(&self, item: &ContentItem, ctx: &mut ConversionContext) -> MappedDescriptor {
        let name = item_name(item, ctx);
        let path = ctx.field_path("schema");
        let data_type = SchemaMapper::map_primitive(item.schema.as_ref(), &path, &mut ctx.tracker);

        MappedDescriptor {
            name: name.clone(),
            data: Affordance::Event(EventAffordance {
                name,
                description: item.description.clone(),
                data: DataDescriptor::of_type(data_type),
            }),
        }
    }
}

/// Properties keep their type and writability
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertyMapper;

impl ContentMapper for PropertyMapper {
    fn bucket(&self) -> Bucket {
        Bucket::Properties
    }

    fn map(&self, item: &ContentItem, ctx: &mut ConversionContext) -> MappedDescriptor {
        let name = item_name(item, ctx);
        let path = ctx.field_path("schema");
        let data_type = SchemaMapper::map_primitive(item.schema.as_ref(), &path, &mut ctx.tracker);

        MappedDescriptor {
            name: name.clone(),
            data: Affordance::Property(PropertyAffordance {
                name,
                description: item.description.clone(),
                data_type,
                writable: item.writable,
            }),
        }
    }
}

/// Commands become actions with optional input and output payloads
///
/// Both payloads are named after the request. A command with a response but
/// no request gets an output without a name, recorded as an orphan response.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommandMapper;

impl CommandMapper {
    fn payload(
        payload: &CommandPayload,
        name: Option<String>,
        field: &str,
        ctx: &mut ConversionContext,
    ) -> DataDescriptor {
        let path = ctx.field_path(&format!("{}.schema", field));
        SchemaMapper::map(payload.schema.as_ref(), &path, &mut ctx.tracker).named(name)
    }
}

impl ContentMapper for CommandMapper {
    fn bucket(&self) -> Bucket {
        Bucket::Actions
    }

    fn map(&self, item: &ContentItem, ctx: &mut ConversionContext) -> MappedDescriptor {
        let name = item_name(item, ctx);
        let request_name = item.request.as_ref().and_then(|request| request.name.clone());

        if item.response.is_some() && item.request.is_none() {
            let path = ctx.field_path("response");
            ctx.tracker.add_orphan_response(&path);
        }

        let input = item
            .request
            .as_ref()
            .map(|request| Self::payload(request, request_name.clone(), "request", ctx));
        let output = item
            .response
            .as_ref()
            .map(|response| Self::payload(response, request_name.clone(), "response", ctx));

        MappedDescriptor {
            name: name.clone(),
            data: Affordance::Action(ActionAffordance {
                name,
                description: item.description.clone(),
                input,
                output,
                writable: item.writable,
            }),
        }
    }
}
