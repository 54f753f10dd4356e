//! Degradation tracker
//!
//! Unknown primitive names and unsupported schema shapes never stop a
//! conversion; they leave an absent `type` in the output. The tracker records
//! each of those absences so callers can report them or, in strict mode,
//! refuse the result.

use crate::error::{DegradationCode, Severity, StrictMode};
use crate::types::{DegradationItem, DegradationReport, DegradationSummary};
use crate::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;

/// Tracker for recording degradations during conversion
#[derive(Debug)]
pub struct DegradationTracker {
    items: Vec<DegradationItem>,
    strict_mode: StrictMode,
}

impl DegradationTracker {
    /// Create a new degradation tracker
    pub fn new(strict_mode: StrictMode) -> Self {
        Self {
            items: Vec::new(),
            strict_mode,
        }
    }

    /// Record a primitive name missing from the normalization table
    pub fn add_unknown_primitive(&mut self, path: &str, name: &str) {
        self.record(
            DegradationCode::UnknownPrimitive,
            path,
            format!("Primitive schema '{}' has no Thing Model equivalent", name),
            Some(Value::String(name.to_string())),
        );
    }

    /// Record a schema shape the mapper cannot translate
    pub fn add_unsupported_schema(&mut self, path: &str, message: &str, schema: Option<Value>) {
        self.record(DegradationCode::UnsupportedSchema, path, message.to_string(), schema);
    }

    /// Record an object field whose schema is itself an object
    pub fn add_nested_object(&mut self, path: &str, field: &str, schema: Value) {
        self.record(
            DegradationCode::NestedObject,
            path,
            format!("Field '{}' nests an object schema; only one level is mapped", field),
            Some(schema),
        );
    }

    /// Record a content item without a name
    pub fn add_missing_name(&mut self, path: &str) {
        self.record(
            DegradationCode::MissingName,
            path,
            "Content item has no name; it is stored under the key \"\" with an empty `name`, not under \"undefined\"".to_string(),
            None,
        );
    }

    /// Record a command response that has no request to be named after
    pub fn add_orphan_response(&mut self, path: &str) {
        self.record(
            DegradationCode::OrphanResponse,
            path,
            "Command has a response but no request; the output is left without a name".to_string(),
            None,
        );
    }

    /// Record a bucket entry replaced by a later content item
    pub fn add_name_collision(&mut self, path: &str, bucket: &str, name: &str) {
        self.record(
            DegradationCode::NameCollision,
            path,
            format!("'{}' already present in {}; the later item wins", name, bucket),
            Some(Value::String(name.to_string())),
        );
    }

    fn record(&mut self, code: DegradationCode, path: &str, message: String, before: Option<Value>) {
        let severity = code.severity();
        match severity {
            Severity::Info => tracing::debug!(%code, path, "{}", message),
            _ => tracing::warn!(%code, path, "{}", message),
        }

        self.items.push(DegradationItem {
            code,
            path: path.to_string(),
            message,
            severity,
            before,
        });
    }

    /// All recorded items
    pub fn items(&self) -> &[DegradationItem] {
        &self.items
    }

    /// Highest severity recorded so far
    pub fn max_severity(&self) -> Option<Severity> {
        self.items.iter().map(|item| item.severity).max()
    }

    /// Items that violate strict mode
    pub fn violations(&self) -> impl Iterator<Item = &DegradationItem> {
        self.items
            .iter()
            .filter(|item| item.severity >= Severity::Warning)
    }

    /// Fail in strict mode when any Warning-or-worse item was recorded
    pub fn check_strictness(&self) -> Result<()> {
        if self.strict_mode != StrictMode::Strict {
            return Ok(());
        }

        let violations: Vec<_> = self.violations().collect();
        match violations.first() {
            None => Ok(()),
            Some(first) => Err(Error::StrictnessViolation {
                message: format!(
                    "{} degradation(s) recorded, first at {}: {}",
                    violations.len(),
                    first.path,
                    first.message
                ),
                mode: self.strict_mode,
                violations: violations.len(),
            }),
        }
    }

    /// Build the final report
    pub fn build_report(self) -> DegradationReport {
        let max_severity = self.max_severity();
        let mut by_severity: HashMap<String, usize> = HashMap::new();
        let mut by_code: HashMap<String, usize> = HashMap::new();

        for item in &self.items {
            *by_severity.entry(item.severity.to_string()).or_default() += 1;
            *by_code.entry(item.code.to_string()).or_default() += 1;
        }

        DegradationReport {
            summary: DegradationSummary {
                total_items: self.items.len(),
                by_severity,
                by_code,
            },
            items: self.items,
            max_severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_summary() {
        let mut tracker = DegradationTracker::new(StrictMode::Warn);
        tracker.add_unknown_primitive("contents[0].schema", "uuid");
        tracker.add_unknown_primitive("contents[1].schema", "time");
        tracker.add_name_collision("contents[2]", "properties", "on");

        assert_eq!(tracker.max_severity(), Some(Severity::Warning));

        let report = tracker.build_report();
        assert_eq!(report.summary.total_items, 3);
        assert_eq!(report.summary.by_code["UnknownPrimitive"], 2);
        assert_eq!(report.summary.by_severity["info"], 1);
        assert_eq!(report.items[0].before, Some(Value::String("uuid".into())));
    }

    #[test]
    fn test_warn_mode_never_fails() {
        let mut tracker = DegradationTracker::new(StrictMode::Warn);
        tracker.add_missing_name("contents[0]");
        assert!(tracker.check_strictness().is_ok());
    }

    #[test]
    fn test_strict_mode_fails_on_warning() {
        let mut tracker = DegradationTracker::new(StrictMode::Strict);
        tracker.add_unsupported_schema("contents[0].schema", "Enum schemas are not mapped", None);

        match tracker.check_strictness() {
            Err(Error::StrictnessViolation { violations, mode, .. }) => {
                assert_eq!(violations, 1);
                assert_eq!(mode, StrictMode::Strict);
            }
            other => panic!("expected strictness violation, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_mode_tolerates_collisions() {
        let mut tracker = DegradationTracker::new(StrictMode::Strict);
        tracker.add_name_collision("contents[1]", "events", "temp");
        assert!(tracker.check_strictness().is_ok());
        assert_eq!(tracker.build_report().max_severity, Some(Severity::Info));
    }

    #[test]
    fn test_missing_name_message_names_the_key() {
        let mut tracker = DegradationTracker::new(StrictMode::Warn);
        tracker.add_missing_name("contents[4]");

        let item = &tracker.items()[0];
        assert_eq!(item.severity, Severity::Error);
        assert!(item.message.contains("key \"\""));
        assert!(item.message.contains("not under \"undefined\""));
    }

    #[test]
    fn test_strict_mode_fails_on_orphan_response() {
        let mut tracker = DegradationTracker::new(StrictMode::Strict);
        tracker.add_orphan_response("contents[0].response");
        assert!(matches!(
            tracker.check_strictness(),
            Err(Error::StrictnessViolation { violations: 1, .. })
        ));
    }

    #[test]
    fn test_empty_report() {
        let report = DegradationTracker::new(StrictMode::Strict).build_report();
        assert!(report.items.is_empty());
        assert!(report.max_severity.is_none());
    }
}
