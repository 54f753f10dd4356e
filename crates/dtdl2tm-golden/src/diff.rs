//! Diff engine for comparing snapshot JSON

use crate::{GoldenError, Result};
use colored::*;
use regex::Regex;
use serde_json::Value;
use similar::{ChangeTag, TextDiff};
use std::collections::BTreeSet;

const MASK: &str = "***MASKED***";

/// Options for diff comparison
#[derive(Debug, Clone)]
pub struct DiffOptions {
    /// Whether to use colored output
    pub colored: bool,

    /// Whether to normalize JSON before comparison
    pub normalize: bool,

    /// Maximum diff lines to show (0 = unlimited)
    pub max_diff_lines: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            colored: true,
            normalize: true,
            max_diff_lines: 100,
        }
    }
}

/// Result of a diff operation
#[derive(Debug)]
pub struct DiffResult {
    /// Whether the values match
    pub matches: bool,

    /// Human-readable diff output
    pub diff_output: String,

    /// Paths that differ, e.g. `thing_model.events.temp.data.type`
    pub differing_paths: Vec<String>,
}

/// Engine for comparing JSON values
pub struct DiffEngine {
    options: DiffOptions,
    volatile_patterns: Vec<(String, Regex)>,
}

impl DiffEngine {
    /// Create a new diff engine
    pub fn new(options: DiffOptions) -> Self {
        Self {
            options,
            volatile_patterns: Vec::new(),
        }
    }

    /// Add a volatile field pattern
    pub fn add_volatile_pattern(&mut self, path: &str, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| GoldenError::CorpusError(format!("Invalid regex pattern: {}", e)))?;

        self.volatile_patterns.push((path.to_string(), regex));
        Ok(())
    }

    /// Compare two JSON values
    pub fn compare(&self, expected: &Value, actual: &Value) -> DiffResult {
        let (expected, actual) = if self.options.normalize {
            (
                crate::snapshot::normalize_json(expected),
                crate::snapshot::normalize_json(actual),
            )
        } else {
            (expected.clone(), actual.clone())
        };

        let expected = self.mask_volatile_fields(expected);
        let actual = self.mask_volatile_fields(actual);

        if expected == actual {
            return DiffResult {
                matches: true,
                diff_output: String::new(),
                differing_paths: Vec::new(),
            };
        }

        let mut differing_paths = Vec::new();
        collect_diff_paths(&expected, &actual, String::new(), &mut differing_paths);

        DiffResult {
            matches: false,
            diff_output: self.render(&expected, &actual, &differing_paths),
            differing_paths,
        }
    }

    fn render(&self, expected: &Value, actual: &Value, paths: &[String]) -> String {
        let expected_str = serde_json::to_string_pretty(expected).unwrap_or_default();
        let actual_str = serde_json::to_string_pretty(actual).unwrap_or_default();
        let header = format!("=== Diff Output ({} path(s) differ) ===\n", paths.len());

        let mut output = if self.options.colored {
            header.bold().to_string()
        } else {
            header
        };

        for path in paths {
            output.push_str(&format!("  at {}\n", path));
        }

        let text_diff = TextDiff::from_lines(&expected_str, &actual_str);
        for (line_count, change) in text_diff.iter_all_changes().enumerate() {
            if self.options.max_diff_lines > 0 && line_count >= self.options.max_diff_lines {
                output.push_str("... (diff truncated) ...\n");
                break;
            }

            let line = match (change.tag(), self.options.colored) {
                (ChangeTag::Delete, true) => format!("-{}", change).red().to_string(),
                (ChangeTag::Insert, true) => format!("+{}", change).green().to_string(),
                (ChangeTag::Delete, false) => format!("-{}", change),
                (ChangeTag::Insert, false) => format!("+{}", change),
                (ChangeTag::Equal, _) => format!(" {}", change),
            };
            output.push_str(&line);
        }

        output
    }

    fn mask_volatile_fields(&self, mut value: Value) -> Value {
        for (path, pattern) in &self.volatile_patterns {
            let parts: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
            mask_field(&mut value, &parts, pattern);
        }
        value
    }
}

fn mask_field(value: &mut Value, path_parts: &[&str], pattern: &Regex) {
    let Some((first, rest)) = path_parts.split_first() else {
        return;
    };

    match value {
        Value::Object(map) => match map.get_mut(*first) {
            Some(field @ Value::String(_)) if rest.is_empty() => {
                if field.as_str().is_some_and(|s| pattern.is_match(s)) {
                    *field = Value::String(MASK.to_string());
                }
            }
            Some(next_value) if !rest.is_empty() => mask_field(next_value, rest, pattern),
            _ => {}
        },
        Value::Array(arr) => {
            for item in arr {
                mask_field(item, path_parts, pattern);
            }
        }
        _ => {}
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn collect_diff_paths(expected: &Value, actual: &Value, path: String, paths: &mut Vec<String>) {
    match (expected, actual) {
        (Value::Object(exp), Value::Object(act)) => {
            let keys: BTreeSet<_> = exp.keys().chain(act.keys()).collect();

            for key in keys {
                let key_path = join_path(&path, key);
                match (exp.get(key), act.get(key)) {
                    (Some(e), Some(a)) if e != a => collect_diff_paths(e, a, key_path, paths),
                    (Some(_), None) => paths.push(format!("{} (missing in actual)", key_path)),
                    (None, Some(_)) => paths.push(format!("{} (extra in actual)", key_path)),
                    _ => {}
                }
            }
        }
        (Value::Array(exp), Value::Array(act)) => {
            for (i, (e, a)) in exp.iter().zip(act.iter()).enumerate() {
                if e != a {
                    collect_diff_paths(e, a, format!("{}[{}]", path, i), paths);
                }
            }

            if exp.len() != act.len() {
                paths.push(format!("{} (array length mismatch: {} vs {})", path, exp.len(), act.len()));
            }
        }
        _ => paths.push(path),
    }
}
