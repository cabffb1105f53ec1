//! Static fixture dataset used when live retrieval is unavailable.

use std::path::Path;

use ideaforge_core::RawSignal;

/// Reads the fixture dataset at `path`.
///
/// Records failing structural validation (missing or mistyped fields) are
/// dropped individually. A missing or malformed file yields an empty vec
/// with a warning; fixture loading never hard-fails.
pub fn load_fixture_signals(path: &Path) -> Vec<RawSignal> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "fixture read failed");
            return Vec::new();
        }
    };

    let records: Vec<serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "fixture is not a JSON array");
            return Vec::new();
        }
    };

    let total = records.len();
    let signals: Vec<RawSignal> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value(record).ok())
        .collect();

    if signals.len() < total {
        tracing::warn!(
            path = %path.display(),
            dropped = total - signals.len(),
            kept = signals.len(),
            "dropped fixture records failing validation"
        );
    }

    signals
}
