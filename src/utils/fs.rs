use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::core::violation::Violation;
use crate::model::{Document, DocumentSnapshot};

pub const SNAPSHOT_SUFFIX: &str = ".snapshot.json";

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || name == "bin" || name == "obj" || name == "target" || name == "node_modules"
}

/// Snapshot files under `path`, in path order. `path` may itself be a snapshot.
pub fn find_snapshots(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }
    let mut results = Vec::new();
    for entry in WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped(&e.file_name().to_string_lossy()))
        .filter_map(|e| e.ok())
    {
        if entry.file_type().is_file()
            && entry.file_name().to_string_lossy().ends_with(SNAPSHOT_SUFFIX)
        {
            results.push(entry.into_path());
        }
    }
    results
}

pub fn read_snapshot(path: &Path) -> Result<Document> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let snapshot: DocumentSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;
    Document::try_from(snapshot).with_context(|| format!("Invalid snapshot {}", path.display()))
}

pub fn write_snapshot(path: &Path, document: &Document) -> Result<()> {
    let json = serde_json::to_string_pretty(&DocumentSnapshot::from(document))?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

pub fn read_violations(path: &Path) -> Result<Vec<Violation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse violations {}", path.display()))
}
