//! Local JSON snapshot of the idea catalog.
//!
//! The snapshot is a single pretty-printed JSON array. Writes replace the
//! whole file through a temp-file rename so a crash mid-write never leaves a
//! truncated snapshot behind; readers see either the old array or the new
//! one.

use std::path::{Path, PathBuf};

use serde_json::Value;

use ideaforge_core::{normalized_title, Idea};

use crate::StoreError;

/// Reads the snapshot, tolerating absence and per-record damage.
///
/// A missing file is the normal first-run state and yields an empty list, as
/// does a file whose top level fails to parse as a JSON array. Individual
/// records that fail to decode are dropped; the rest survive.
pub async fn load_snapshot(path: &Path) -> Vec<Idea> {
    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "snapshot read failed");
            return Vec::new();
        }
    };

    let records: Vec<Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "snapshot is not a JSON array");
            return Vec::new();
        }
    };

    let total = records.len();
    let ideas: Vec<Idea> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();
    if ideas.len() < total {
        tracing::warn!(
            path = %path.display(),
            dropped = total - ideas.len(),
            "snapshot contained undecodable records"
        );
    }
    ideas
}

/// Appends the given ideas to the snapshot, skipping any whose normalized
/// title is already present.
///
/// The file is rewritten whole: read current content, merge, serialize,
/// write `<path>.tmp`, rename over the target. Rename is atomic on the same
/// filesystem, so a failure at any step leaves the previous snapshot intact.
///
/// Returns the number of ideas actually appended.
///
/// # Errors
///
/// Returns [`StoreError::Snapshot`] if the temp file cannot be written or
/// renamed, or [`StoreError::Serialize`] if the merged array fails to
/// serialize.
pub async fn save_snapshot(path: &Path, ideas: &[Idea]) -> Result<usize, StoreError> {
    let mut merged = load_snapshot(path).await;
    let known: std::collections::HashSet<String> = merged
        .iter()
        .map(|idea| normalized_title(&idea.title))
        .collect();

    let fresh: Vec<Idea> = ideas
        .iter()
        .filter(|idea| !known.contains(&normalized_title(&idea.title)))
        .cloned()
        .collect();
    let appended = fresh.len();
    if appended == 0 {
        return Ok(0);
    }
    merged.extend(fresh);

    let bytes = serde_json::to_vec_pretty(&merged)?;
    let tmp = tmp_path(path);
    if let Err(e) = tokio::fs::write(&tmp, &bytes).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(StoreError::Snapshot {
            path: tmp,
            source: e,
        });
    }
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(StoreError::Snapshot {
            path: path.to_path_buf(),
            source: e,
        });
    }

    Ok(appended)
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}
