//! Content dispatcher
//!
//! Selects the content mapper for an item from its kind tag. Unknown kinds
//! are fatal for the whole run.

use super::mappers::{CommandMapper, ContentMapper, PropertyMapper, TelemetryMapper};
use crate::types::ContentItem;
use crate::{Error, Result};
use std::fmt;
use std::str::FromStr;

static TELEMETRY: TelemetryMapper = TelemetryMapper;
static PROPERTY: PropertyMapper = PropertyMapper;
static COMMAND: CommandMapper = CommandMapper;

/// Supported content kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Telemetry,
    Property,
    Command,
}

impl ContentKind {
    /// Every supported kind
    pub const ALL: [ContentKind; 3] = [
        ContentKind::Telemetry,
        ContentKind::Property,
        ContentKind::Command,
    ];

    /// Tag as written in DTDL
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Telemetry => "Telemetry",
            ContentKind::Property => "Property",
            ContentKind::Command => "Command",
        }
    }

    /// Kind of a content item, if supported
    pub fn of(item: &ContentItem) -> Option<Self> {
        item.kind_tag().and_then(|tag| tag.parse().ok())
    }
}

impl FromStr for ContentKind {
    type Err = ();

    // Exact, case-sensitive match
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        ContentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Routes content items to their mappers
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentDispatcher;

impl ContentDispatcher {
    /// Mapper for a supported kind
    pub fn mapper(kind: ContentKind) -> &'static dyn ContentMapper {
        match kind {
            ContentKind::Telemetry => &TELEMETRY,
            ContentKind::Property => &PROPERTY,
            ContentKind::Command => &COMMAND,
        }
    }

    /// Mapper for a content item, or the unsupported-content fault
    pub fn mapper_for(item: &ContentItem, path: &str) -> Result<&'static dyn ContentMapper> {
        match ContentKind::of(item) {
            Some(kind) => {
                tracing::trace!(%kind, path, "Dispatching content item");
                Ok(Self::mapper(kind))
            }
            None => {
                let raw = item.kind.as_ref().map(|kind| match kind.as_str() {
                    Some(tag) => tag.to_string(),
                    None => kind.to_string(),
                });
                Err(Error::unsupported_content(raw.as_deref(), path))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bucket, DataSchema};
    use serde_json::json;

    fn item_with_tag(tag: serde_json::Value) -> ContentItem {
        ContentItem::telemetry("x", DataSchema::primitive("double")).with_kind_tag(tag)
    }

    #[test]
    fn test_dispatch_by_kind() {
        let cases = [
            (json!("Telemetry"), Bucket::Events),
            (json!(["Property"]), Bucket::Properties),
            (json!("Command"), Bucket::Actions),
            (json!(["Telemetry", "Temperature"]), Bucket::Events),
        ];

        for (tag, bucket) in cases {
            let mapper = ContentDispatcher::mapper_for(&item_with_tag(tag), "contents[0]").unwrap();
            assert_eq!(mapper.bucket(), bucket);
        }
    }

    #[test]
    fn test_unsupported_kinds_fail() {
        let cases = [
            json!("Relationship"),
            json!("telemetry"),
            json!(["Temperature", "Telemetry"]),
            json!([]),
            json!(7),
        ];

        for tag in cases {
            let err = ContentDispatcher::mapper_for(&item_with_tag(tag.clone()), "contents[1]")
                .err()
                .unwrap_or_else(|| panic!("{} should not dispatch", tag));
            assert!(matches!(err, Error::UnsupportedContent { ref path, .. } if path == "contents[1]"));
        }
    }

    #[test]
    fn test_missing_kind_fails() {
        let item = ContentItem {
            kind: None,
            ..Default::default()
        };
        match ContentDispatcher::mapper_for(&item, "contents[0]") {
            Err(Error::UnsupportedContent { kind, .. }) => assert!(kind.is_none()),
            _ => panic!("expected unsupported content"),
        }
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Command".parse::<ContentKind>(), Ok(ContentKind::Command));
        assert!("Component".parse::<ContentKind>().is_err());
        assert_eq!(ContentKind::Property.to_string(), "Property");
    }
}
