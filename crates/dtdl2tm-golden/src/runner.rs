//! Golden test runner for executing snapshot tests

use crate::{
    corpus::{CorpusManager, TestCase},
    diff::DiffEngine,
    snapshot::SnapshotManager,
    GoldenConfig, GoldenError, Result,
};
use colored::*;
use dtdl2tm_core::{convert_with, ConversionOptions, ConversionResult, SourceModel};
use regex::Regex;
use serde_json::{json, Value};
use std::time::Instant;

/// Result of running a golden test
#[derive(Debug)]
pub struct TestResult {
    /// Name of the test
    pub name: String,

    /// Whether the test passed
    pub passed: bool,

    /// Error message if failed
    pub error: Option<String>,

    /// Diff output if comparison failed
    pub diff: Option<String>,

    /// Execution time in milliseconds
    pub duration_ms: u64,

    /// Whether snapshot was updated
    pub updated: bool,
}

impl TestResult {
    fn failed(name: &str, error: String, duration_ms: u64) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            error: Some(error),
            diff: None,
            duration_ms,
            updated: false,
        }
    }

    /// Print the test result
    pub fn print(&self, verbose: bool) {
        let status = if self.passed {
            "PASS".green().bold()
        } else {
            "FAIL".red().bold()
        };

        println!("{} {} ({}ms)", status, self.name, self.duration_ms);

        if let Some(ref error) = self.error {
            println!("  {}: {}", "Error".red(), error);
        }

        if verbose || !self.passed {
            if let Some(ref diff) = self.diff {
                println!("{}", diff);
            }
        }

        if self.updated {
            println!("  {}", "Snapshot updated".yellow());
        }
    }
}

/// Outcome of executing one case before reporting
struct Execution {
    passed: bool,
    error: Option<String>,
    diff: Option<String>,
    updated: bool,
}

impl Execution {
    fn pass(updated: bool, diff: Option<String>) -> Self {
        Self {
            passed: true,
            error: None,
            diff,
            updated,
        }
    }
}

/// Runner for golden tests
pub struct GoldenTestRunner {
    config: GoldenConfig,
    corpus_manager: CorpusManager,
    snapshot_manager: SnapshotManager,
}

impl GoldenTestRunner {
    /// Create a new test runner
    pub fn new(config: GoldenConfig) -> Self {
        let corpus_manager = CorpusManager::new(&config.corpus_dir);
        let snapshot_manager = SnapshotManager::new(&config.snapshot_dir);

        Self {
            config,
            corpus_manager,
            snapshot_manager,
        }
    }

    /// Run a single test by `<category>/<case>` name
    pub fn run_test(&self, test_name: &str) -> Result<TestResult> {
        let start = Instant::now();

        let test_path = self.config.corpus_dir.join(test_name).join("test.json");
        let test_case = self.corpus_manager.load_test_case(&test_path)?;
        let execution = self.execute_test(&test_case);
        let duration_ms = start.elapsed().as_millis() as u64;

        let test_result = match execution {
            Ok(execution) => TestResult {
                name: test_name.to_string(),
                passed: execution.passed,
                error: execution.error,
                diff: execution.diff,
                duration_ms,
                updated: execution.updated,
            },
            Err(e) => TestResult::failed(test_name, e.to_string(), duration_ms),
        };

        if self.config.verbose {
            test_result.print(true);
        }

        if test_result.passed {
            Ok(test_result)
        } else {
            Err(GoldenError::TestFailed(format!(
                "Test '{}' failed: {}{}",
                test_name,
                test_result.error.as_deref().unwrap_or("Unknown error"),
                test_result
                    .diff
                    .as_deref()
                    .map(|diff| format!("\n{}", diff))
                    .unwrap_or_default()
            )))
        }
    }

    /// Run every enabled test whose `<category>/<case>` contains the pattern
    ///
    /// `*` selects the whole corpus.
    pub fn run_batch(&self, pattern: &str) -> Result<Vec<TestResult>> {
        let tests = self.corpus_manager.discover_tests()?;

        let selected: Vec<_> = tests
            .into_iter()
            .filter(|t| t.metadata.enabled)
            .filter(|t| pattern == "*" || format!("{}/{}", t.category, t.name).contains(pattern))
            .collect();

        if selected.is_empty() {
            return Err(GoldenError::CorpusError(format!(
                "No tests found matching pattern '{}'",
                pattern
            )));
        }

        println!("Running {} tests...\n", selected.len());

        let mut results = Vec::new();
        let mut failed = 0;

        for test_case in selected {
            let test_name = format!("{}/{}", test_case.category, test_case.name);
            let result = self
                .run_test(&test_name)
                .unwrap_or_else(|e| TestResult::failed(&test_name, e.to_string(), 0));

            if !result.passed {
                failed += 1;
            }

            result.print(self.config.verbose);
            results.push(result);
        }

        println!("\n{}", "=== Test Summary ===".bold());
        println!(
            "{}: {} passed, {} failed",
            "Results".bold(),
            (results.len() - failed).to_string().green(),
            failed.to_string().red()
        );

        if failed > 0 {
            Err(GoldenError::TestFailed(format!("{} test(s) failed", failed)))
        } else {
            Ok(results)
        }
    }

    fn execute_test(&self, test_case: &TestCase) -> Result<Execution> {
        if !test_case.metadata.enabled {
            return Ok(Execution::pass(false, None));
        }

        let actual = match self.perform_conversion(test_case)? {
            Ok(actual) => actual,
            Err(failure) => {
                return Ok(Execution {
                    passed: false,
                    error: Some(failure),
                    diff: None,
                    updated: false,
                })
            }
        };

        let snapshot_name = format!("{}/{}", test_case.category, test_case.name);

        if !self.snapshot_manager.exists(&snapshot_name) {
            if self.config.create_missing || self.config.update_snapshots {
                self.snapshot_manager.create(
                    &snapshot_name,
                    actual,
                    Some(test_case.metadata.description.clone()),
                )?;
                return Ok(Execution::pass(true, None));
            }

            return Err(GoldenError::SnapshotMismatch(format!(
                "Snapshot '{}' does not exist. Run with UPDATE_GOLDEN=1 to create it.",
                snapshot_name
            )));
        }

        let snapshot = self.snapshot_manager.load(&snapshot_name)?;

        let mut diff_engine = DiffEngine::new(self.config.diff_options.clone());
        for volatile in &test_case.expectations.volatile_fields {
            diff_engine.add_volatile_pattern(&volatile.path, &volatile.pattern)?;
        }

        let ignore_fields: Vec<String> = snapshot
            .ignore_fields
            .iter()
            .chain(&test_case.expectations.ignore_fields)
            .cloned()
            .collect();

        let mut expected = snapshot.content.clone();
        let mut compared = actual.clone();
        crate::snapshot::apply_ignores(&mut expected, &ignore_fields);
        crate::snapshot::apply_ignores(&mut compared, &ignore_fields);

        let diff_result = diff_engine.compare(&expected, &compared);

        if diff_result.matches {
            Ok(Execution::pass(false, None))
        } else if self.config.update_snapshots {
            self.snapshot_manager.backup(&snapshot_name)?;
            self.snapshot_manager.update(&snapshot_name, actual)?;
            Ok(Execution::pass(true, Some(diff_result.diff_output)))
        } else {
            Ok(Execution {
                passed: false,
                error: Some("Snapshot mismatch".to_string()),
                diff: Some(diff_result.diff_output),
                updated: false,
            })
        }
    }

    /// Convert the case input and render the comparable value
    ///
    /// The inner `Err` is an expectation failure rather than a harness error.
    fn perform_conversion(&self, test_case: &TestCase) -> Result<std::result::Result<Value, String>> {
        let source: SourceModel = serde_json::from_value(test_case.input.source_model.clone())?;
        let options = ConversionOptions::default()
            .with_strict_mode(test_case.input.strict_mode)
            .at(self.config.timestamp);
        let expectations = &test_case.expectations;

        match convert_with(&source, options) {
            Ok(result) if expectations.should_succeed => {
                let codes: Vec<String> = result
                    .degradations
                    .items
                    .iter()
                    .map(|item| item.code.to_string())
                    .collect();

                if !expectations.expected_degradations.is_empty()
                    && codes != expectations.expected_degradations
                {
                    return Ok(Err(format!(
                        "Expected degradations {:?}, got {:?}",
                        expectations.expected_degradations, codes
                    )));
                }

                Ok(Ok(success_value(&result)?))
            }
            Ok(_) => Ok(Err("Conversion succeeded but failure was expected".to_string())),
            Err(e) if !expectations.should_succeed => {
                let message = e.to_string();
                if let Some(ref pattern) = expectations.error_pattern {
                    let regex = Regex::new(pattern).map_err(|err| {
                        GoldenError::CorpusError(format!("Invalid error pattern: {}", err))
                    })?;
                    if !regex.is_match(&message) {
                        return Ok(Err(format!(
                            "Error '{}' does not match pattern '{}'",
                            message, pattern
                        )));
                    }
                }

                Ok(Ok(json!({ "fault": e.to_fault(), "error": message })))
            }
            Err(e) => Ok(Err(format!("Conversion failed: {}", e))),
        }
    }

    /// Initialize the corpus with a sample test
    pub fn init_corpus(&self) -> Result<()> {
        self.corpus_manager.init_corpus()
    }

    /// List all available tests
    pub fn list_tests(&self) -> Result<Vec<String>> {
        let tests = self.corpus_manager.discover_tests()?;
        Ok(tests
            .into_iter()
            .map(|t| format!("{}/{}", t.category, t.name))
            .collect())
    }

    /// Print corpus statistics
    pub fn get_statistics(&self) -> Result<()> {
        let stats = self.corpus_manager.get_statistics()?;
        stats.print();
        Ok(())
    }
}

fn success_value(result: &ConversionResult) -> Result<Value> {
    let degradations: Vec<Value> = result
        .degradations
        .items
        .iter()
        .map(|item| {
            json!({
                "code": item.code.to_string(),
                "path": item.path,
                "severity": item.severity.to_string(),
            })
        })
        .collect();

    Ok(json!({
        "thing_model": serde_json::to_value(&result.thing_model)?,
        "degradations": degradations,
    }))
}
