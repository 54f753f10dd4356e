//! Snapshot management for golden tests

use crate::{GoldenError, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A test snapshot containing expected output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Name of the test, `<category>/<case>`
    pub name: String,

    /// Snapshot metadata
    pub metadata: SnapshotMetadata,

    /// The expected conversion output
    pub content: Value,

    /// Fields to ignore during comparison
    #[serde(default)]
    pub ignore_fields: Vec<String>,
}

/// Metadata about a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Version of the snapshot format
    pub version: String,

    /// When the snapshot was created
    pub created_at: String,

    /// When the snapshot was last updated
    pub updated_at: String,

    /// Description of what this tests
    pub description: Option<String>,
}

/// Manages reading and writing snapshots
pub struct SnapshotManager {
    snapshot_dir: PathBuf,
}

impl SnapshotManager {
    /// Create a new snapshot manager
    pub fn new(snapshot_dir: impl AsRef<Path>) -> Self {
        Self {
            snapshot_dir: snapshot_dir.as_ref().to_path_buf(),
        }
    }

    /// Load a snapshot from disk
    pub fn load(&self, name: &str) -> Result<Snapshot> {
        let path = self.snapshot_path(name);

        if !path.exists() {
            return Err(GoldenError::CorpusError(format!(
                "Snapshot '{}' not found at {:?}",
                name, path
            )));
        }

        let content = fs::read_to_string(&path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save a snapshot to disk
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.snapshot_path(&snapshot.name);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, content)?;

        Ok(())
    }

    /// Replace the content of an existing snapshot
    pub fn update(&self, name: &str, new_content: Value) -> Result<()> {
        let mut snapshot = self.load(name)?;

        snapshot.content = new_content;
        snapshot.metadata.updated_at = Utc::now().to_rfc3339();

        self.save(&snapshot)
    }

    /// Create a new snapshot
    pub fn create(&self, name: &str, content: Value, description: Option<String>) -> Result<Snapshot> {
        let now = Utc::now().to_rfc3339();

        let snapshot = Snapshot {
            name: name.to_string(),
            metadata: SnapshotMetadata {
                version: "1.0.0".to_string(),
                created_at: now.clone(),
                updated_at: now,
                description,
            },
            content,
            ignore_fields: Vec::new(),
        };

        self.save(&snapshot)?;
        Ok(snapshot)
    }

    /// Check if a snapshot exists
    pub fn exists(&self, name: &str) -> bool {
        self.snapshot_path(name).exists()
    }

    /// List all snapshot names, `<category>/<case>`
    pub fn list(&self) -> Result<Vec<String>> {
        let mut snapshots = Vec::new();

        if !self.snapshot_dir.exists() {
            return Ok(snapshots);
        }

        for entry in WalkDir::new(&self.snapshot_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            let is_snapshot = path.is_file()
                && path.extension().and_then(|s| s.to_str()) == Some("json")
                && !path.to_string_lossy().contains(".backup.");

            if is_snapshot {
                if let Ok(relative) = path.with_extension("").strip_prefix(&self.snapshot_dir) {
                    snapshots.push(relative.to_string_lossy().replace('\\', "/"));
                }
            }
        }

        snapshots.sort();
        Ok(snapshots)
    }

    /// Create a backup of a snapshot before updating
    pub fn backup(&self, name: &str) -> Result<()> {
        let source = self.snapshot_path(name);

        if !source.exists() {
            return Ok(());
        }

        let backup_name = format!("{}.backup.{}", name, Utc::now().timestamp());
        fs::copy(source, self.snapshot_path(&backup_name))?;
        Ok(())
    }

    fn snapshot_path(&self, name: &str) -> PathBuf {
        let filename = if name.ends_with(".json") {
            name.to_string()
        } else {
            format!("{}.json", name)
        };

        self.snapshot_dir.join(filename)
    }
}

/// Normalize JSON for comparison: keys sorted, strings trimmed
pub fn normalize_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by_key(|(k, _)| k.as_str());

            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, val)| (key.clone(), normalize_json(val)))
                    .collect(),
            )
        }
        Value::Array(arr) => Value::Array(arr.iter().map(normalize_json).collect()),
        Value::String(s) => Value::String(s.trim().to_string()),
        _ => value.clone(),
    }
}

/// Apply ignore fields to a JSON value
pub fn apply_ignores(value: &mut Value, ignore_fields: &[String]) {
    for field_path in ignore_fields {
        let parts: Vec<&str> = field_path.split('.').filter(|s| !s.is_empty()).collect();
        remove_field(value, &parts);
    }
}

fn remove_field(value: &mut Value, path_parts: &[&str]) {
    let Some((first, rest)) = path_parts.split_first() else {
        return;
    };

    match value {
        Value::Object(map) => {
            if rest.is_empty() {
                map.remove(*first);
            } else if let Some(next_value) = map.get_mut(*first) {
                remove_field(next_value, rest);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                remove_field(item, path_parts);
            }
        }
        _ => {}
    }
}
