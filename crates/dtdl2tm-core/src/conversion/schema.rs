//! Data schema mapping
//!
//! Turns a DTDL data schema into a Thing Model type descriptor. The mapping
//! is total: shapes it cannot express come back as a descriptor without a
//! `type`, and the loss is recorded on the tracker.

use super::degradation::DegradationTracker;
use super::normalizer::normalize;
use crate::types::{DataDescriptor, DataSchema, DataType, FieldDescriptor, ObjectSchema};
use indexmap::IndexMap;

/// Maps data schemas to type descriptors
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaMapper;

impl SchemaMapper {
    /// Map a full data schema (primitive or one-level object)
    pub fn map(
        schema: Option<&DataSchema>,
        path: &str,
        tracker: &mut DegradationTracker,
    ) -> DataDescriptor {
        match schema {
            Some(DataSchema::Primitive(name)) => {
                DataDescriptor::of_type(Self::primitive(name, path, tracker))
            }
            Some(DataSchema::Object(object)) => Self::map_object(object, path, tracker),
            Some(DataSchema::Unsupported(raw)) => {
                tracker.add_unsupported_schema(
                    path,
                    "Schema is neither a primitive name nor a flat object",
                    Some(raw.clone()),
                );
                DataDescriptor::default()
            }
            None => {
                tracker.add_unsupported_schema(path, "Schema is missing", None);
                DataDescriptor::default()
            }
        }
    }

    /// Map a schema that must be a primitive name
    ///
    /// Telemetry and properties only carry primitive types; object schemas
    /// there lose their type.
    pub fn map_primitive(
        schema: Option<&DataSchema>,
        path: &str,
        tracker: &mut DegradationTracker,
    ) -> Option<DataType> {
        match schema {
            Some(DataSchema::Primitive(name)) => Self::primitive(name, path, tracker),
            Some(other) => {
                tracker.add_unsupported_schema(
                    path,
                    "Only primitive schemas are mapped for telemetry and properties",
                    Some(other.to_value()),
                );
                None
            }
            None => {
                tracker.add_unsupported_schema(path, "Schema is missing", None);
                None
            }
        }
    }

    fn primitive(name: &str, path: &str, tracker: &mut DegradationTracker) -> Option<DataType> {
        let data_type = normalize(name);
        if data_type.is_none() {
            tracker.add_unknown_primitive(path, name);
        }
        data_type
    }

    fn map_object(
        object: &ObjectSchema,
        path: &str,
        tracker: &mut DegradationTracker,
    ) -> DataDescriptor {
        let properties = object.fields.iter().enumerate().fold(
            IndexMap::new(),
            |mut properties, (index, field)| {
                let field_path = format!("{}.fields[{}]", path, index);
                let data_type = match &field.schema {
                    DataSchema::Primitive(name) => Self::primitive(name, &field_path, tracker),
                    DataSchema::Object(_) => {
                        tracker.add_nested_object(&field_path, &field.name, field.schema.to_value());
                        None
                    }
                    DataSchema::Unsupported(raw) => {
                        tracker.add_unsupported_schema(
                            &field_path,
                            "Field schema is not a primitive name",
                            Some(raw.clone()),
                        );
                        None
                    }
                };

                properties.insert(
                    field.name.clone(),
                    FieldDescriptor {
                        name: field.name.clone(),
                        data_type,
                    },
                );
                properties
            },
        );

        DataDescriptor {
            data_type: Some(DataType::Object),
            properties: Some(properties),
            name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DegradationCode;
    use crate::StrictMode;
    use serde_json::json;

    fn tracker() -> DegradationTracker {
        DegradationTracker::new(StrictMode::Warn)
    }

    #[test]
    fn test_primitive_schema() {
        let mut tracker = tracker();
        let descriptor = SchemaMapper::map(Some(&DataSchema::primitive("long")), "s", &mut tracker);

        assert_eq!(descriptor, DataDescriptor::of_type(Some(DataType::Integer)));
        assert!(tracker.items().is_empty());
    }

    #[test]
    fn test_object_schema() {
        let mut tracker = tracker();
        let schema = DataSchema::object([("lat", "double"), ("lon", "double"), ("label", "string")]);
        let descriptor = SchemaMapper::map(Some(&schema), "s", &mut tracker);

        assert_eq!(descriptor.data_type, Some(DataType::Object));
        let properties = descriptor.properties.unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties["lat"].data_type, Some(DataType::Number));
        assert_eq!(properties["label"].name, "label");
        assert_eq!(
            serde_json::to_value(&properties["label"]).unwrap(),
            json!({"name": "label", "type": "string"})
        );
    }

    #[test]
    fn test_object_fields_keep_declaration_order() {
        let mut tracker = tracker();
        let schema = DataSchema::object([("zeta", "double"), ("alpha", "string"), ("zeta", "integer")]);
        let properties = SchemaMapper::map(Some(&schema), "s", &mut tracker)
            .properties
            .unwrap();

        let names: Vec<&str> = properties.keys().map(String::as_str).collect();
        assert_eq!(names, ["zeta", "alpha"]);
        assert_eq!(properties["zeta"].data_type, Some(DataType::Integer));
    }

    #[test]
    fn test_duplicate_field_names_keep_last() {
        let mut tracker = tracker();
        let schema = DataSchema::object([("x", "string"), ("x", "integer")]);
        let properties = SchemaMapper::map(Some(&schema), "s", &mut tracker)
            .properties
            .unwrap();

        assert_eq!(properties.len(), 1);
        assert_eq!(properties["x"].data_type, Some(DataType::Integer));
    }

    #[test]
    fn test_unknown_field_primitive_is_absent() {
        let mut tracker = tracker();
        let schema = DataSchema::object([("at", "time")]);
        let descriptor = SchemaMapper::map(Some(&schema), "contents[0].request.schema", &mut tracker);

        assert_eq!(descriptor.properties.unwrap()["at"].data_type, None);
        assert_eq!(tracker.items()[0].code, DegradationCode::UnknownPrimitive);
        assert_eq!(tracker.items()[0].path, "contents[0].request.schema.fields[0]");
    }

    #[test]
    fn test_nested_object_field_is_absent() {
        let mut tracker = tracker();
        let schema = DataSchema::from_value(json!({
            "@type": "Object",
            "fields": [
                {"name": "inner", "schema": {"@type": "Object", "fields": [{"name": "a", "schema": "double"}]}}
            ]
        }));
        let descriptor = SchemaMapper::map(Some(&schema), "s", &mut tracker);

        assert_eq!(descriptor.data_type, Some(DataType::Object));
        assert_eq!(descriptor.properties.unwrap()["inner"].data_type, None);
        assert_eq!(tracker.items()[0].code, DegradationCode::NestedObject);
    }

    #[test]
    fn test_unsupported_and_missing_schema() {
        let mut tracker = tracker();
        let enum_schema = DataSchema::from_value(json!({"@type": "Enum", "valueSchema": "string"}));

        assert_eq!(SchemaMapper::map(Some(&enum_schema), "a", &mut tracker), DataDescriptor::default());
        assert_eq!(SchemaMapper::map(None, "b", &mut tracker), DataDescriptor::default());
        assert_eq!(tracker.items().len(), 2);
        assert!(tracker
            .items()
            .iter()
            .all(|item| item.code == DegradationCode::UnsupportedSchema));
    }

    #[test]
    fn test_map_primitive_rejects_objects() {
        let mut tracker = tracker();
        let schema = DataSchema::object([("x", "double")]);

        assert_eq!(SchemaMapper::map_primitive(Some(&schema), "p", &mut tracker), None);
        assert_eq!(
            SchemaMapper::map_primitive(Some(&DataSchema::primitive("dateTime")), "p", &mut tracker),
            Some(DataType::String)
        );
        assert_eq!(tracker.items().len(), 1);
    }
}
