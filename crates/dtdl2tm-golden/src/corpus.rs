//! Test corpus management for golden tests

use crate::{GoldenError, Result};
use dtdl2tm_core::StrictMode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A test case in the corpus
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestCase {
    /// Name of the test case
    pub name: String,

    /// Category/group of the test
    pub category: String,

    /// Input data
    pub input: TestInput,

    /// Expected behavior configuration
    pub expectations: TestExpectations,

    /// Test metadata
    pub metadata: TestMetadata,
}

/// Input for a test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestInput {
    /// The DTDL source model, inline or as a file name next to `test.json`
    pub source_model: Value,

    /// Strictness policy for the conversion
    #[serde(default)]
    pub strict_mode: StrictMode,
}

/// Expected behavior for a test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestExpectations {
    /// Whether the conversion should succeed
    pub should_succeed: bool,

    /// Regex the error message must match if should_succeed is false
    #[serde(default)]
    pub error_pattern: Option<String>,

    /// Fields to ignore in comparison
    #[serde(default)]
    pub ignore_fields: Vec<String>,

    /// Volatile fields that may change
    #[serde(default)]
    pub volatile_fields: Vec<VolatileFieldSpec>,

    /// Degradation codes the conversion must record, in order
    #[serde(default)]
    pub expected_degradations: Vec<String>,
}

/// Pattern for a volatile field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolatileFieldSpec {
    pub path: String,
    pub pattern: String,
}

/// Metadata about a test case
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestMetadata {
    /// Description of what this tests
    pub description: String,

    /// Tags for categorization
    #[serde(default)]
    pub tags: Vec<String>,

    /// Whether this test is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Priority level (lower = higher priority)
    #[serde(default = "default_priority")]
    pub priority: u32,
}

fn default_true() -> bool {
    true
}

fn default_priority() -> u32 {
    100
}

/// Manages the test corpus
pub struct CorpusManager {
    corpus_dir: PathBuf,
}

impl CorpusManager {
    /// Create a new corpus manager
    pub fn new(corpus_dir: impl AsRef<Path>) -> Self {
        Self {
            corpus_dir: corpus_dir.as_ref().to_path_buf(),
        }
    }

    /// Discover all test cases in the corpus, ordered by priority then name
    pub fn discover_tests(&self) -> Result<Vec<TestCase>> {
        let mut tests = Vec::new();

        if !self.corpus_dir.exists() {
            return Ok(tests);
        }

        for entry in WalkDir::new(&self.corpus_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();

            if path.is_file() && path.file_name() == Some(std::ffi::OsStr::new("test.json")) {
                match self.load_test_case(path) {
                    Ok(test_case) => tests.push(test_case),
                    Err(e) => {
                        eprintln!("Warning: Failed to load test case {:?}: {}", path, e);
                    }
                }
            }
        }

        tests.sort_by(|a, b| {
            (a.metadata.priority, &a.category, &a.name).cmp(&(b.metadata.priority, &b.category, &b.name))
        });

        Ok(tests)
    }

    /// Load a specific test case
    pub fn load_test_case(&self, path: &Path) -> Result<TestCase> {
        let content = fs::read_to_string(path)?;
        let mut test_case: TestCase = serde_json::from_str(&content)?;

        let test_dir = path.parent().ok_or_else(|| {
            GoldenError::CorpusError(format!("Test case {:?} has no parent directory", path))
        })?;

        if let Value::String(ref filename) = test_case.input.source_model {
            let input_path = test_dir.join(filename);
            let input_content = fs::read_to_string(input_path)?;
            test_case.input.source_model = serde_json::from_str(&input_content)?;
        }

        Ok(test_case)
    }

    /// Filter tests by category
    pub fn filter_by_category(&self, tests: Vec<TestCase>, category: &str) -> Vec<TestCase> {
        tests
            .into_iter()
            .filter(|t| t.category == category || category == "*")
            .collect()
    }

    /// Create the corpus directory structure with one sample case
    pub fn init_corpus(&self) -> Result<()> {
        for dir in ["basic", "commands", "edge-cases", "errors"] {
            fs::create_dir_all(self.corpus_dir.join(dir))?;
        }

        let sample = self.corpus_dir.join("basic/single-telemetry/test.json");
        if !sample.exists() {
            self.create_sample_test()?;
        }

        Ok(())
    }

    fn create_sample_test(&self) -> Result<()> {
        let test_dir = self.corpus_dir.join("basic/single-telemetry");
        fs::create_dir_all(&test_dir)?;

        let test_case = TestCase {
            name: "single-telemetry".to_string(),
            category: "basic".to_string(),
            input: TestInput {
                source_model: serde_json::json!({
                    "displayName": "Sensor",
                    "contents": [
                        {"@type": "Telemetry", "name": "temp", "schema": "double"}
                    ]
                }),
                strict_mode: StrictMode::Warn,
            },
            expectations: TestExpectations {
                should_succeed: true,
                error_pattern: None,
                ignore_fields: vec![],
                volatile_fields: vec![],
                expected_degradations: vec![],
            },
            metadata: TestMetadata {
                description: "A single telemetry item becomes an event".to_string(),
                tags: vec!["basic".to_string(), "smoke".to_string()],
                enabled: true,
                priority: 1,
            },
        };

        let content = serde_json::to_string_pretty(&test_case)?;
        fs::write(test_dir.join("test.json"), content)?;

        Ok(())
    }

    /// Get statistics about the corpus
    pub fn get_statistics(&self) -> Result<CorpusStatistics> {
        let tests = self.discover_tests()?;

        let mut stats = CorpusStatistics {
            total_tests: tests.len(),
            ..Default::default()
        };

        for test in tests {
            if test.metadata.enabled {
                stats.enabled_tests += 1;
            } else {
                stats.disabled_tests += 1;
            }

            *stats.tests_by_category.entry(test.category).or_insert(0) += 1;

            for tag in test.metadata.tags {
                *stats.tests_by_tag.entry(tag).or_insert(0) += 1;
            }
        }

        Ok(stats)
    }
}

/// Statistics about the test corpus
#[derive(Debug, Default)]
pub struct CorpusStatistics {
    pub total_tests: usize,
    pub enabled_tests: usize,
    pub disabled_tests: usize,
    pub tests_by_category: std::collections::BTreeMap<String, usize>,
    pub tests_by_tag: std::collections::BTreeMap<String, usize>,
}

impl CorpusStatistics {
    /// Print statistics to stdout
    pub fn print(&self) {
        println!("=== Corpus Statistics ===");
        println!("Total tests: {}", self.total_tests);
        println!("Enabled: {}", self.enabled_tests);
        println!("Disabled: {}", self.disabled_tests);

        if !self.tests_by_category.is_empty() {
            println!("\nTests by category:");
            for (category, count) in &self.tests_by_category {
                println!("  {}: {}", category, count);
            }
        }

        if !self.tests_by_tag.is_empty() {
            println!("\nTests by tag:");
            for (tag, count) in &self.tests_by_tag {
                println!("  {}: {}", tag, count);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_corpus_manager_init() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CorpusManager::new(temp_dir.path());

        manager.init_corpus().unwrap();

        assert!(temp_dir.path().join("basic").exists());
        assert!(temp_dir.path().join("errors").exists());
        assert!(temp_dir.path().join("basic/single-telemetry/test.json").exists());
    }

    #[test]
    fn test_discover_tests() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CorpusManager::new(temp_dir.path());
        manager.init_corpus().unwrap();

        let tests = manager.discover_tests().unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name, "single-telemetry");
        assert_eq!(tests[0].input.strict_mode, StrictMode::Warn);
    }

    #[test]
    fn test_source_model_file_reference() {
        let temp_dir = TempDir::new().unwrap();
        let case_dir = temp_dir.path().join("basic/by-reference");
        fs::create_dir_all(&case_dir).unwrap();
        fs::write(case_dir.join("input.json"), r#"{"displayName": "Ref", "contents": []}"#).unwrap();
        fs::write(
            case_dir.join("test.json"),
            r#"{
                "name": "by-reference",
                "category": "basic",
                "input": {"source_model": "input.json"},
                "expectations": {"should_succeed": true},
                "metadata": {"description": "Input loaded from a sibling file"}
            }"#,
        )
        .unwrap();

        let manager = CorpusManager::new(temp_dir.path());
        let case = manager.load_test_case(&case_dir.join("test.json")).unwrap();
        assert_eq!(case.input.source_model["displayName"], "Ref");
        assert_eq!(case.metadata.priority, 100);
        assert!(case.metadata.enabled);
    }

    #[test]
    fn test_filter_by_category() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CorpusManager::new(temp_dir.path());
        manager.init_corpus().unwrap();

        let tests = manager.discover_tests().unwrap();
        assert_eq!(manager.filter_by_category(tests.clone(), "basic").len(), 1);
        assert_eq!(manager.filter_by_category(tests.clone(), "errors").len(), 0);
        assert_eq!(manager.filter_by_category(tests, "*").len(), 1);
    }

    #[test]
    fn test_statistics() {
        let temp_dir = TempDir::new().unwrap();
        let manager = CorpusManager::new(temp_dir.path());
        manager.init_corpus().unwrap();

        let stats = manager.get_statistics().unwrap();
        assert_eq!(stats.total_tests, 1);
        assert_eq!(stats.tests_by_category["basic"], 1);
        assert_eq!(stats.tests_by_tag["smoke"], 1);
    }
}
