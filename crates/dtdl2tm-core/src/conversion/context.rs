//! Conversion context for managing per-run state and configuration
//!
//! Copyright (c) 2025 dtdl2tm contributors
//! Licensed under the Apache-2.0 license

use super::degradation::DegradationTracker;
use crate::types::TD_CONTEXT_URI;
use crate::StrictMode;
use chrono::{DateTime, Utc};

/// Options controlling a conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOptions {
    /// Strictness policy applied to recorded degradations
    pub strict_mode: StrictMode,

    /// URI placed in the single-element `@context`
    pub context_uri: String,

    /// Fixed conversion instant; the wall clock is used when `None`
    pub timestamp: Option<DateTime<Utc>>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            strict_mode: StrictMode::Warn,
            context_uri: TD_CONTEXT_URI.to_string(),
            timestamp: None,
        }
    }
}

impl ConversionOptions {
    /// Set the strictness policy
    pub fn with_strict_mode(mut self, strict_mode: StrictMode) -> Self {
        self.strict_mode = strict_mode;
        self
    }

    /// Override the context URI
    pub fn with_context_uri(mut self, context_uri: impl Into<String>) -> Self {
        self.context_uri = context_uri.into();
        self
    }

    /// Pin the conversion instant
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// State carried through one conversion
///
/// The timestamp is captured exactly once when the context is created.
#[derive(Debug)]
pub struct ConversionContext {
    /// Options for this run
    pub options: ConversionOptions,

    /// Instant used for both `created` and `modified`
    pub timestamp: DateTime<Utc>,

    /// Degradations recorded so far
    pub tracker: DegradationTracker,

    item_index: usize,
}

impl ConversionContext {
    /// Create a new conversion context
    pub fn new(options: ConversionOptions) -> Self {
        let timestamp = options.timestamp.unwrap_or_else(Utc::now);
        let tracker = DegradationTracker::new(options.strict_mode);

        Self {
            options,
            timestamp,
            tracker,
            item_index: 0,
        }
    }

    /// Point the context at the content item being mapped
    pub fn enter_item(&mut self, index: usize) {
        self.item_index = index;
    }

    /// Path of the current content item, e.g. `contents[2]`
    pub fn item_path(&self) -> String {
        format!("contents[{}]", self.item_index)
    }

    /// Path of a field of the current content item
    pub fn field_path(&self, field: &str) -> String {
        format!("{}.{}", self.item_path(), field)
    }

    /// Strictness mode for this run
    pub fn strict_mode(&self) -> StrictMode {
        self.options.strict_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_fixed_timestamp_is_used() {
        let instant = Utc.with_ymd_and_hms(2023, 3, 4, 5, 6, 7).unwrap();
        let context = ConversionContext::new(ConversionOptions::default().at(instant));
        assert_eq!(context.timestamp, instant);
    }

    #[test]
    fn test_paths_follow_current_item() {
        let mut context = ConversionContext::new(ConversionOptions::default());
        assert_eq!(context.item_path(), "contents[0]");

        context.enter_item(4);
        assert_eq!(context.field_path("request.schema"), "contents[4].request.schema");
    }

    #[test]
    fn test_option_builders() {
        let options = ConversionOptions::default()
            .with_strict_mode(StrictMode::Strict)
            .with_context_uri("https://www.w3.org/2022/wot/td/v1.1");

        assert_eq!(options.strict_mode, StrictMode::Strict);
        assert_eq!(options.context_uri, "https://www.w3.org/2022/wot/td/v1.1");
        assert!(options.timestamp.is_none());
    }
}
