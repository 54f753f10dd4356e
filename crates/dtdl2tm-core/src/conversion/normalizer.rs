//! Primitive type normalization
//!
//! DTDL primitive schema names map onto the Thing Model type vocabulary
//! through a fixed table. Names outside the table normalize to `None`.

use crate::types::DataType;

/// Lookup of DTDL primitive names to Thing Model types
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeNormalizer;

impl TypeNormalizer {
    /// The complete table of recognized primitive names
    pub const TABLE: [(&'static str, DataType); 9] = [
        ("boolean", DataType::Boolean),
        ("double", DataType::Number),
        ("float", DataType::Number),
        ("integer", DataType::Integer),
        ("long", DataType::Integer),
        ("string", DataType::String),
        ("date", DataType::Date),
        ("dateTime", DataType::String),
        ("duration", DataType::String),
    ];

    /// Map a primitive name; matching is case-sensitive
    pub fn normalize(name: &str) -> Option<DataType> {
        Self::TABLE
            .iter()
            .find(|(primitive, _)| *primitive == name)
            .map(|(_, data_type)| *data_type)
    }

    /// Whether a primitive name appears in the table
    pub fn is_recognized(name: &str) -> bool {
        Self::normalize(name).is_some()
    }
}

/// Shorthand for [`TypeNormalizer::normalize`]
pub fn normalize(name: &str) -> Option<DataType> {
    TypeNormalizer::normalize(name)
}
