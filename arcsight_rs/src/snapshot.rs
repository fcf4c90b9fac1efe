//! Append-only cycle snapshots.
//!
//! One NDJSON file per repository id: each analysis appends a single line
//! of JSON with alphabetically sorted keys, UTF-8 encoded, LF terminated.
//! There is no read path in this version; the writer exists so external
//! tooling can track cycle history. Callers treat every failure here as a
//! no-op.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;
use time::format_description;

/// Environment variable overriding the cache base directory.
const ARCSIGHT_CACHE_DIR_ENV: &str = "ARCSIGHT_CACHE_DIR";

/// Subdirectory of the cache base holding snapshot files.
const SNAPSHOT_SUBDIR: &str = "snapshots";

/// Returns the cache base directory for arcsight artifacts.
///
/// Priority:
/// 1. `ARCSIGHT_CACHE_DIR` environment variable
/// 2. Platform cache dir (`$XDG_CACHE_HOME/arcsight`, `~/Library/Caches/arcsight`)
/// 3. Fallback: OS temp dir (for environments without a home/cache directory)
pub fn cache_base_dir() -> PathBuf {
    if let Ok(custom) = std::env::var(ARCSIGHT_CACHE_DIR_ENV) {
        let custom = custom.trim();
        if !custom.is_empty() {
            return PathBuf::from(custom);
        }
    }
    if let Some(cache_dir) = dirs::cache_dir() {
        return cache_dir.join("arcsight");
    }
    std::env::temp_dir().join("arcsight")
}

/// Snapshot file for one repository id: the first 16 hex chars of
/// SHA-256(repo_id), so arbitrary ids map to safe file names.
pub fn snapshot_file_for(repo_id: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(repo_id.as_bytes());
    let hash = hasher.finalize();
    let file_id = format!("{:x}", hash).chars().take(16).collect::<String>();
    cache_base_dir()
        .join(SNAPSHOT_SUBDIR)
        .join(format!("{}.ndjson", file_id))
}

/// ISO-8601 UTC with second precision, e.g. `2026-08-01T12:30:05Z`.
fn utc_timestamp() -> String {
    let format = format_description::parse("[year]-[month]-[day]T[hour]:[minute]:[second]Z")
        .unwrap_or_default();
    OffsetDateTime::now_utc().format(&format).unwrap_or_default()
}

/// One appended record. Field declaration order is the serialized key
/// order and must stay alphabetical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotRecord {
    pub canonical_cycles: Vec<String>,
    pub commit_sha: String,
    pub confidence: f64,
    pub repo_id: String,
    /// ISO-8601 UTC, second precision.
    pub timestamp: String,
}

/// Append one snapshot record. The line is written with a single
/// `write_all`, keeping concurrent appends line-atomic.
pub fn append_snapshot(
    repo_id: &str,
    commit_sha: &str,
    canonical_cycles: &[String],
    confidence: f64,
) -> io::Result<()> {
    let record = SnapshotRecord {
        canonical_cycles: canonical_cycles.to_vec(),
        commit_sha: commit_sha.to_string(),
        confidence,
        repo_id: repo_id.to_string(),
        timestamp: utc_timestamp(),
    };
    let mut line = serde_json::to_string(&record)?;
    line.push('\n');

    let path = snapshot_file_for(repo_id);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    file.write_all(line.as_bytes())?;
    Ok(())
}
