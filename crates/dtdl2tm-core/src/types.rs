//! Core types and data structures for the dtdl2tm conversion engine
//!
//! This module defines the source model (a DTDL interface), the target model
//! (a WoT Thing Model) and the intermediate values passed between them.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use indexmap::IndexMap;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// Re-export error types for convenience
pub use crate::error::{DegradationCode, Severity, StrictMode};

/// `@type` marker of every generated document
pub const THING_MODEL_TYPE: &str = "ThingModel";

/// Thing Description context URI
pub const TD_CONTEXT_URI: &str = "https://www.w3.org/2019/wot/td/v1";

/// Tag that marks a composite data schema
pub const OBJECT_SCHEMA_TAG: &str = "Object";

// ---------------------------------------------------------------------------
// Source model
// ---------------------------------------------------------------------------

/// A DTDL interface: the whole input document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SourceModel {
    /// Interface identifier (DTMI), used for logging only
    #[serde(rename = "@id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display name; a string or a language map, carried verbatim
    #[serde(rename = "displayName", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<Value>,

    /// Description; a string or a language map, carried verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    /// Content items in declaration order
    #[serde(default, deserialize_with = "deserialize_contents")]
    pub contents: Vec<ContentItem>,
}

/// Entries that are not objects become items without a kind, so the
/// dispatcher rejects them as unsupported content instead of the loader
/// rejecting the whole document
fn deserialize_contents<'de, D>(deserializer: D) -> std::result::Result<Vec<ContentItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .map(|entry| match entry {
            Value::Object(_) => serde_json::from_value(entry).map_err(serde::de::Error::custom),
            _ => Ok(ContentItem::default()),
        })
        .collect()
}

impl SourceModel {
    /// Create an empty model with a display name
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(Value::String(display_name.into())),
            ..Default::default()
        }
    }

    /// Append a content item
    pub fn with_content(mut self, item: ContentItem) -> Self {
        self.contents.push(item);
        self
    }
}

/// One entry of a source model's `contents`
///
/// The kind tag is kept as raw JSON: DTDL allows a single string or an array
/// of semantic types, and only the first entry decides the content kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ContentItem {
    /// `@type` tag, a string or an array whose first element is the kind
    #[serde(rename = "@type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    /// Value schema of telemetry and properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<DataSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,

    /// Command request payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<CommandPayload>,

    /// Command response payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<CommandPayload>,
}

impl ContentItem {
    fn with_kind(kind: &str, name: &str) -> Self {
        Self {
            kind: Some(Value::String(kind.to_string())),
            name: Some(name.to_string()),
            ..Default::default()
        }
    }

    /// Telemetry item with a schema
    pub fn telemetry(name: &str, schema: DataSchema) -> Self {
        Self {
            schema: Some(schema),
            ..Self::with_kind("Telemetry", name)
        }
    }

    /// Property item with a schema and optional writability
    pub fn property(name: &str, schema: DataSchema, writable: Option<bool>) -> Self {
        Self {
            schema: Some(schema),
            writable,
            ..Self::with_kind("Property", name)
        }
    }

    /// Command item with optional request and response payloads
    pub fn command(
        name: &str,
        request: Option<CommandPayload>,
        response: Option<CommandPayload>,
    ) -> Self {
        Self {
            request,
            response,
            ..Self::with_kind("Command", name)
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Value::String(description.into()));
        self
    }

    /// Replace the kind tag with an arbitrary JSON value
    pub fn with_kind_tag(mut self, kind: Value) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Effective kind: the tag itself, or the first element of a tag array
    pub fn kind_tag(&self) -> Option<&str> {
        match self.kind.as_ref()? {
            Value::String(kind) => Some(kind.as_str()),
            Value::Array(kinds) => kinds.first().and_then(Value::as_str),
            _ => None,
        }
    }

    /// Name, or the empty string when absent
    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

/// A named request or response schema of a command
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CommandPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<DataSchema>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
}

impl CommandPayload {
    /// Payload with a name and schema
    pub fn new(name: &str, schema: DataSchema) -> Self {
        Self {
            name: Some(name.to_string()),
            schema: Some(schema),
            description: None,
        }
    }
}

/// A DTDL data schema
///
/// Detection is structural: a JSON string is a primitive name, an object
/// tagged `"@type": "Object"` with a `fields` array is an object schema, and
/// every other shape is kept as `Unsupported`.
#[derive(Debug, Clone, PartialEq)]
pub enum DataSchema {
    /// Primitive type name such as `double` or `dateTime`
    Primitive(String),
    /// Flat object schema
    Object(ObjectSchema),
    /// Anything else (arrays, maps, enums, malformed values)
    Unsupported(Value),
}

/// Fields of an object schema, in declaration order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub fields: Vec<SchemaField>,
}

/// One `{name, schema}` entry of an object schema
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaField {
    pub name: String,
    pub schema: DataSchema,
}

impl DataSchema {
    /// Shorthand for a primitive schema
    pub fn primitive(name: &str) -> Self {
        DataSchema::Primitive(name.to_string())
    }

    /// Object schema from `(field name, primitive name)` pairs
    pub fn object<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        DataSchema::Object(ObjectSchema {
            fields: fields
                .into_iter()
                .map(|(name, schema)| SchemaField {
                    name: name.to_string(),
                    schema: DataSchema::primitive(schema),
                })
                .collect(),
        })
    }

    /// Classify a raw JSON value
    pub fn from_value(value: Value) -> Self {
        if let Some(name) = value.as_str() {
            return DataSchema::Primitive(name.to_string());
        }

        let fields = value
            .as_object()
            .filter(|map| map.get("@type").and_then(Value::as_str) == Some(OBJECT_SCHEMA_TAG))
            .and_then(|map| map.get("fields"))
            .and_then(Value::as_array)
            .map(|fields| fields.iter().map(SchemaField::from_value).collect::<Vec<_>>());

        match fields {
            Some(fields) => DataSchema::Object(ObjectSchema { fields }),
            None => DataSchema::Unsupported(value),
        }
    }

    /// Render back to DTDL JSON
    pub fn to_value(&self) -> Value {
        match self {
            DataSchema::Primitive(name) => Value::String(name.clone()),
            DataSchema::Object(object) => serde_json::json!({
                "@type": OBJECT_SCHEMA_TAG,
                "fields": object
                    .fields
                    .iter()
                    .map(|field| serde_json::json!({
                        "name": field.name,
                        "schema": field.schema.to_value(),
                    }))
                    .collect::<Vec<_>>(),
            }),
            DataSchema::Unsupported(raw) => raw.clone(),
        }
    }
}

impl SchemaField {
    fn from_value(value: &Value) -> Self {
        Self {
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            schema: DataSchema::from_value(value.get("schema").cloned().unwrap_or(Value::Null)),
        }
    }
}

impl<'de> Deserialize<'de> for DataSchema {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(DataSchema::from_value)
    }
}

impl Serialize for DataSchema {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_value().serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// Target model
// ---------------------------------------------------------------------------

/// Normalized Thing Model type names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    Boolean,
    Number,
    Integer,
    String,
    Date,
    Object,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "boolean",
            DataType::Number => "number",
            DataType::Integer => "integer",
            DataType::String => "string",
            DataType::Date => "date",
            DataType::Object => "object",
        };
        f.write_str(name)
    }
}

/// The three groupings of a Thing Model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Properties,
    Actions,
    Events,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Properties => write!(f, "properties"),
            Bucket::Actions => write!(f, "actions"),
            Bucket::Events => write!(f, "events"),
        }
    }
}

/// Type descriptor produced by the schema mapper
///
/// `name` is only set for command inputs and outputs.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, FieldDescriptor>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DataDescriptor {
    /// Descriptor holding only a type
    pub fn of_type(data_type: Option<DataType>) -> Self {
        Self {
            data_type,
            ..Default::default()
        }
    }

    /// Attach a payload name
    pub fn named(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }
}

/// One property of an object descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
}

/// Entry of the `properties` bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyAffordance {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
}

/// Entry of the `actions` bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionAffordance {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<DataDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<DataDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writable: Option<bool>,
}

/// Entry of the `events` bucket
///
/// The value type lives one level down, under `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventAffordance {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    pub data: DataDescriptor,
}

/// Bucket-specific payload of a mapped content item
#[derive(Debug, Clone, PartialEq)]
pub enum Affordance {
    Property(PropertyAffordance),
    Action(ActionAffordance),
    Event(EventAffordance),
}

impl Affordance {
    /// Bucket this affordance belongs to
    pub fn bucket(&self) -> Bucket {
        match self {
            Affordance::Property(_) => Bucket::Properties,
            Affordance::Action(_) => Bucket::Actions,
            Affordance::Event(_) => Bucket::Events,
        }
    }
}

/// Output of a content mapper: a named fragment tagged with its bucket
#[derive(Debug, Clone, PartialEq)]
pub struct MappedDescriptor {
    pub name: String,
    pub data: Affordance,
}

impl MappedDescriptor {
    /// Destination bucket
    pub fn target_key(&self) -> Bucket {
        self.data.bucket()
    }
}

/// A WoT Thing Model
///
/// Field order follows the generated document layout. Bucket entries keep
/// the order their names first appeared in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingModel {
    #[serde(default)]
    pub properties: IndexMap<String, PropertyAffordance>,

    #[serde(default)]
    pub actions: IndexMap<String, ActionAffordance>,

    #[serde(default)]
    pub events: IndexMap<String, EventAffordance>,

    #[serde(rename = "@type")]
    pub model_type: String,

    #[serde(rename = "@context")]
    pub context: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,

    #[serde(serialize_with = "serialize_timestamp")]
    pub created: DateTime<Utc>,

    #[serde(serialize_with = "serialize_timestamp")]
    pub modified: DateTime<Utc>,
}

impl ThingModel {
    /// Empty model stamped with a single instant for `created` and `modified`
    pub fn new(context_uri: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            properties: IndexMap::new(),
            actions: IndexMap::new(),
            events: IndexMap::new(),
            model_type: THING_MODEL_TYPE.to_string(),
            context: vec![context_uri.to_string()],
            description: None,
            title: None,
            created: timestamp,
            modified: timestamp,
        }
    }

    /// Merge a mapped descriptor into its bucket, returning the entry it replaced
    ///
    /// A replaced entry keeps its original position.
    pub fn insert(&mut self, descriptor: MappedDescriptor) -> Option<Affordance> {
        let MappedDescriptor { name, data } = descriptor;
        match data {
            Affordance::Property(property) => self
                .properties
                .insert(name, property)
                .map(Affordance::Property),
            Affordance::Action(action) => self.actions.insert(name, action).map(Affordance::Action),
            Affordance::Event(event) => self.events.insert(name, event).map(Affordance::Event),
        }
    }

    /// Number of entries in a bucket
    pub fn bucket_len(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Properties => self.properties.len(),
            Bucket::Actions => self.actions.len(),
            Bucket::Events => self.events.len(),
        }
    }
}

/// Timestamps are written with millisecond precision and a `Z` suffix
fn serialize_timestamp<S>(timestamp: &DateTime<Utc>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

// ---------------------------------------------------------------------------
// Conversion results
// ---------------------------------------------------------------------------

/// Result of converting one source model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionResult {
    /// The generated Thing Model
    pub thing_model: ThingModel,

    /// Information lost during conversion
    pub degradations: DegradationReport,

    /// Metadata about the conversion
    pub metadata: ConversionMetadata,
}

impl ConversionResult {
    /// Check if the conversion lost any information
    pub fn has_degradations(&self) -> bool {
        !self.degradations.items.is_empty()
    }
}

/// Report of every silent absence produced by a conversion
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DegradationReport {
    /// Recorded items in source order
    pub items: Vec<DegradationItem>,

    /// Highest severity seen, `None` for a clean run
    pub max_severity: Option<Severity>,

    /// Summary statistics
    pub summary: DegradationSummary,
}

/// A single recorded degradation
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DegradationItem {
    pub code: DegradationCode,
    pub path: String,
    pub message: String,
    pub severity: Severity,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<Value>,
}

/// Summary of degradation statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct DegradationSummary {
    pub total_items: usize,
    pub by_severity: HashMap<String, usize>,
    pub by_code: HashMap<String, usize>,
}

/// Metadata about a conversion run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionMetadata {
    /// `@id` of the source interface, when present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
    pub timestamp: String,
    pub duration_ms: u64,
    pub strict_mode: StrictMode,
    pub content_count: usize,
    pub properties: usize,
    pub actions: usize,
    pub events: usize,
}
