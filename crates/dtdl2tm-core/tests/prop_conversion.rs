//! Property-based tests for the conversion engine
//!
//! These tests verify invariants that should hold for all well-formed
//! source models.

use chrono::{TimeZone, Utc};
use dtdl2tm_core::conversion::TypeNormalizer;
use dtdl2tm_core::types::*;
use dtdl2tm_core::{convert_with, normalize, ContentDispatcher, ConversionOptions, Error};
use proptest::prelude::*;
use serde_json::json;
use std::collections::BTreeMap;

fn primitive_strategy() -> impl Strategy<Value = (&'static str, DataType)> {
    proptest::sample::select(TypeNormalizer::TABLE.to_vec())
}

fn name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9]{0,6}"
}

fn kind_strategy() -> impl Strategy<Value = (&'static str, Bucket)> {
    prop_oneof![
        Just(("Telemetry", Bucket::Events)),
        Just(("Property", Bucket::Properties)),
        Just(("Command", Bucket::Actions)),
    ]
}

fn options() -> ConversionOptions {
    ConversionOptions::default().at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
}

proptest! {
    #[test]
    fn prop_table_values_are_exact((name, data_type) in primitive_strategy()) {
        prop_assert_eq!(normalize(name), Some(data_type));
    }

    #[test]
    fn prop_case_changes_break_recognition((name, _) in primitive_strategy()) {
        let upper = name.to_uppercase();
        prop_assert_eq!(normalize(&upper), None);
    }

    #[test]
    fn prop_dispatch_follows_first_tag(
        (kind, bucket) in kind_strategy(),
        extra in proptest::collection::vec("[A-Z][a-z]{2,8}", 0..3),
        as_array in any::<bool>(),
    ) {
        let tag = if as_array || !extra.is_empty() {
            let mut tags = vec![kind.to_string()];
            tags.extend(extra);
            json!(tags)
        } else {
            json!(kind)
        };
        let item: ContentItem = serde_json::from_value(json!({"@type": tag, "name": "x"})).unwrap();

        let mapper = ContentDispatcher::mapper_for(&item, "contents[0]").unwrap();
        prop_assert_eq!(mapper.bucket(), bucket);
    }

    #[test]
    fn prop_unknown_kinds_are_rejected(kind in "[A-Z][a-z]{3,12}") {
        prop_assume!(!["Telemetry", "Property", "Command"].contains(&kind.as_str()));
        let item: ContentItem = serde_json::from_value(json!({"@type": kind, "name": "x"})).unwrap();

        let is_unsupported = matches!(
            ContentDispatcher::mapper_for(&item, "contents[0]"),
            Err(Error::UnsupportedContent { .. })
        );
        prop_assert!(is_unsupported);
    }

    #[test]
    fn prop_last_write_wins(
        names in proptest::collection::vec(name_strategy(), 1..16),
        (kind, bucket) in kind_strategy(),
    ) {
        let contents: Vec<_> = names
            .iter()
            .enumerate()
            .map(|(index, name)| json!({
                "@type": kind,
                "name": name,
                "description": format!("item {}", index),
                "schema": "string"
            }))
            .collect();
        let source: SourceModel = serde_json::from_value(json!({"contents": contents})).unwrap();
        let result = convert_with(&source, options()).unwrap();

        let mut expected: BTreeMap<&str, String> = BTreeMap::new();
        for (index, name) in names.iter().enumerate() {
            expected.insert(name, format!("item {}", index));
        }

        let value = serde_json::to_value(&result.thing_model).unwrap();
        let entries = value[bucket.to_string()].as_object().unwrap();
        prop_assert_eq!(entries.len(), expected.len());
        for (name, description) in &expected {
            prop_assert_eq!(&entries[*name]["description"], &json!(description));
        }

        let collisions = result
            .degradations
            .items
            .iter()
            .filter(|item| item.code == DegradationCode::NameCollision)
            .count();
        prop_assert_eq!(collisions, names.len() - expected.len());
    }

    #[test]
    fn prop_object_schema_entry_per_field(
        fields in proptest::collection::btree_map(name_strategy(), primitive_strategy(), 0..8),
    ) {
        let schema = json!({
            "@type": "Object",
            "fields": fields
                .iter()
                .map(|(name, (primitive, _))| json!({"name": name, "schema": primitive}))
                .collect::<Vec<_>>()
        });
        let source: SourceModel = serde_json::from_value(json!({
            "contents": [{"@type": "Command", "name": "c", "request": {"name": "r", "schema": schema}}]
        }))
        .unwrap();

        let model = convert_with(&source, options()).unwrap().thing_model;
        let input = model.actions["c"].input.clone().unwrap();
        prop_assert_eq!(input.data_type, Some(DataType::Object));

        let properties = input.properties.unwrap();
        prop_assert_eq!(properties.len(), fields.len());
        for (name, (_, data_type)) in &fields {
            prop_assert_eq!(properties[name].data_type, Some(*data_type));
            prop_assert_eq!(&properties[name].name, name);
        }
    }

    #[test]
    fn prop_conversion_is_deterministic(
        names in proptest::collection::vec(name_strategy(), 0..10),
        (kind, _) in kind_strategy(),
    ) {
        let contents: Vec<_> = names
            .iter()
            .map(|name| json!({"@type": kind, "name": name, "schema": "long"}))
            .collect();
        let source: SourceModel = serde_json::from_value(json!({"displayName": "D", "contents": contents})).unwrap();

        let first = convert_with(&source, options()).unwrap().thing_model;
        let second = convert_with(&source, options()).unwrap().thing_model;
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
