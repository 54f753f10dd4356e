//! Property-based testing strategies for generating test data
//!
//! This module provides proptest strategies for generating random
//! but well-formed source models and data schemas.

#![cfg(test)]

use crate::conversion::TypeNormalizer;
use crate::types::*;
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;

/// Strategy for recognized primitive names
pub fn known_primitive_strategy() -> impl Strategy<Value = String> {
    proptest::sample::select(
        TypeNormalizer::TABLE
            .iter()
            .map(|(name, _)| name.to_string())
            .collect::<Vec<_>>(),
    )
}

/// Strategy for names that are never in the primitive table
pub fn unknown_primitive_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,12}".prop_filter("must not be a known primitive", |name| {
        !TypeNormalizer::is_recognized(name)
    })
}

/// Strategy for flat object schemas
pub fn object_schema_strategy() -> impl Strategy<Value = DataSchema> {
    vec(("[a-z][a-zA-Z0-9]{0,10}", known_primitive_strategy()), 0..8).prop_map(|fields| {
        DataSchema::Object(ObjectSchema {
            fields: fields
                .into_iter()
                .map(|(name, schema)| SchemaField {
                    name,
                    schema: DataSchema::Primitive(schema),
                })
                .collect(),
        })
    })
}

/// Strategy for any mappable data schema
pub fn data_schema_strategy() -> impl Strategy<Value = DataSchema> {
    prop_oneof![
        4 => known_primitive_strategy().prop_map(DataSchema::Primitive),
        1 => object_schema_strategy(),
    ]
}

/// Strategy for supported content items
pub fn content_item_strategy() -> impl Strategy<Value = ContentItem> {
    let name = "[a-z][a-zA-Z0-9]{0,8}";
    let payload = || (name, known_primitive_strategy())
        .prop_map(|(name, schema)| CommandPayload::new(&name, DataSchema::Primitive(schema)));

    prop_oneof![
        (name, known_primitive_strategy())
            .prop_map(|(name, schema)| ContentItem::telemetry(&name, DataSchema::Primitive(schema))),
        (name, known_primitive_strategy(), option::of(any::<bool>())).prop_map(
            |(name, schema, writable)| ContentItem::property(&name, DataSchema::Primitive(schema), writable)
        ),
        (name, option::of(payload()), option::of(payload()))
            .prop_map(|(name, request, response)| ContentItem::command(&name, request, response)),
    ]
}

/// Strategy for source models
pub fn source_model_strategy() -> impl Strategy<Value = SourceModel> {
    (
        "[A-Z][a-zA-Z ]{0,20}",
        option::of("[a-zA-Z .,]{1,40}"),
        vec(content_item_strategy(), 0..12),
    )
        .prop_map(|(display_name, description, contents)| SourceModel {
            id: None,
            display_name: Some(serde_json::Value::String(display_name)),
            description: description.map(serde_json::Value::String),
            contents,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::{normalize, ConversionOptions, DegradationTracker, SchemaMapper};
    use crate::{convert_with, StrictMode};
    use chrono::{TimeZone, Utc};

    proptest! {
        #[test]
        fn prop_unknown_names_normalize_to_none(name in unknown_primitive_strategy()) {
            prop_assert_eq!(normalize(&name), None);
        }

        #[test]
        fn prop_object_schema_has_one_entry_per_distinct_field(schema in object_schema_strategy()) {
            let mut tracker = DegradationTracker::new(StrictMode::Warn);
            let descriptor = SchemaMapper::map(Some(&schema), "s", &mut tracker);
            let DataSchema::Object(object) = &schema else { unreachable!() };

            prop_assert_eq!(descriptor.data_type, Some(DataType::Object));

            // Folding into a map: later duplicates win
            let expected: std::collections::BTreeMap<&str, Option<DataType>> = object
                .fields
                .iter()
                .map(|field| match &field.schema {
                    DataSchema::Primitive(name) => (field.name.as_str(), normalize(name)),
                    _ => (field.name.as_str(), None),
                })
                .collect();
            let properties = descriptor.properties.unwrap();
            prop_assert_eq!(properties.len(), expected.len());
            for (name, data_type) in expected {
                prop_assert_eq!(properties[name].data_type, data_type);
            }
            prop_assert!(tracker.items().is_empty());
        }

        #[test]
        fn prop_supported_models_always_convert(source in source_model_strategy()) {
            let instant = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let result = convert_with(&source, ConversionOptions::default().at(instant)).unwrap();
            let model = &result.thing_model;

            let total = model.properties.len() + model.actions.len() + model.events.len();
            prop_assert!(total <= source.contents.len());
            prop_assert_eq!(model.created, instant);
            prop_assert_eq!(model.modified, instant);
        }

        #[test]
        fn prop_command_input_matches_schema_mapper(schema in data_schema_strategy()) {
            let source = SourceModel::new("Device").with_content(ContentItem::command(
                "run",
                Some(CommandPayload::new("arg", schema.clone())),
                None,
            ));
            let model = crate::convert(&source).unwrap();

            let mut tracker = DegradationTracker::new(StrictMode::Warn);
            let expected = SchemaMapper::map(Some(&schema), "s", &mut tracker).named(Some("arg".to_string()));
            prop_assert_eq!(model.actions["run"].input.as_ref(), Some(&expected));
            prop_assert!(model.actions["run"].output.is_none());
        }
    }
}
