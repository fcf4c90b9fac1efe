//! Core types for ArcSight analysis.
//!
//! This module defines the data structures that flow through the pipeline:
//! - [`ImportGraphEntry`] - one analyzed file and its resolved imports
//! - [`FileStats`] - extractor counters feeding the confidence scorer
//! - [`DiffHunk`] / [`AddedLine`] - head-side additions from the PR diff
//! - [`RootCauseEdge`] - the added edge that closes a new cycle
//! - [`CommitAnalysis`] / [`PrCycleAnalysis`] - the two public results
//!
//! Every path stored in these types is a *normalized path*: repo-relative,
//! forward-slash separated, lowercase, with no `.` or `..` segments (see
//! [`crate::paths`]). Mixing normalized and raw forms is a programming error.

use serde::{Deserialize, Serialize};

/// Files larger than this are skipped and counted as unreadable.
/// A file of exactly this size is still parsed.
pub const MAX_SOURCE_FILE_BYTES: u64 = 2 * 1024 * 1024;

/// Soft cap on import-like matches per file; scanning stops once reached.
pub const IMPORT_MATCH_CAP: usize = 500;

/// Smallest cycle (in traversal nodes) surfaced by a PR analysis.
pub const MIN_CYCLE_NODES: usize = 2;

/// Largest cycle (in traversal nodes) surfaced by a PR analysis.
pub const MAX_CYCLE_NODES: usize = 5;

/// Confidence at or above this value buckets as `High`.
pub const HIGH_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Wall-clock budget for a PR analysis; exactly this many seconds passes,
/// anything above silences the result.
pub const RUNTIME_BUDGET_SECONDS: f64 = 7.0;

/// Repositories with fewer analyzed candidates than this score zero confidence.
pub const MIN_FILE_COUNT_FOR_CONFIDENCE: usize = 10;

/// Directory names excluded from the walk wherever they appear in the tree.
pub const EXCLUDED_DIR_NAMES: [&str; 10] = [
    "node_modules",
    ".next",
    "dist",
    "build",
    "coverage",
    "vendor",
    "generated",
    "__generated__",
    "__tests__",
    "tests",
];

/// File extensions (lowercased, without the dot) included in the walk.
pub const SOURCE_EXTENSIONS: [&str; 4] = ["ts", "tsx", "js", "jsx"];

/// Separator used by canonical cycle strings: space, U+2192, space.
pub const CYCLE_ARROW: &str = " \u{2192} ";

/// One analyzed source file and its resolved import targets.
///
/// `imports` is sorted ascending by byte order and deduplicated. Every
/// analyzed file contributes exactly one entry, even with no imports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportGraphEntry {
    pub file_path: String,
    pub imports: Vec<String>,
}

/// Extractor counters consumed by the confidence scorer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStats {
    /// Source-file candidates seen by the walk (before gating).
    pub file_count: usize,
    /// Files that actually produced a graph entry.
    pub analyzed_file_count: usize,
    /// Specifiers that counted as imports (relative, alias, or bare).
    pub total_import_count: usize,
    /// Relative/alias imports that resolved to no existing file.
    pub unresolved_import_count: usize,
    /// Oversized, undecodable, or otherwise skipped files.
    pub unreadable_file_count: usize,
    /// True once any specifier matched two or more alias patterns.
    pub alias_ambiguity_detected: bool,
}

/// A single added line on the head side of the PR diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddedLine {
    /// 1-based line number in the head version of the file.
    pub line_number: u32,
    pub content: String,
}

/// Head-side additions for one changed file. Renames surface as delete+add;
/// only additions are tracked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffHunk {
    pub file_path: String,
    pub added_lines: Vec<AddedLine>,
}

/// Alias-table health as observed by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasStatus {
    Ok,
    Uncertain,
}

/// Scalar metrics summarizing how much the extractor trusts its own output.
/// Input to the confidence scorer; never observes cycles or diffs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationQuality {
    pub file_count: usize,
    pub analyzed_file_count: usize,
    /// analyzed / seen, in [0,1].
    pub analyzed_file_coverage: f64,
    pub alias_status: AliasStatus,
    pub is_monorepo: bool,
    /// Produced by external determinism measurement; a single run reports true.
    pub import_graph_stable: bool,
    /// unresolved / total imports, in [0,1].
    pub unresolved_import_ratio: f64,
}

/// The added edge that closes a new cycle, attributed to a changed file.
///
/// `line_number` and `import_line` are present together or absent together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseEdge {
    pub from: String,
    pub to: String,
    pub canonical_cycle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_line: Option<String>,
}

/// Result of a commit-level analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitAnalysis {
    /// Canonical cycle strings, sorted ascending and deduplicated.
    pub canonical_cycles: Vec<String>,
    /// Sorted by `file_path`; one entry per analyzed file.
    pub import_graph: Vec<ImportGraphEntry>,
    pub confidence: f64,
}

impl CommitAnalysis {
    /// The zero result emitted for any hard failure.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Result of a PR-level analysis. `relevant_cycles` and `root_causes` pair
/// 1:1 by index; both are empty whenever anything forced silence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrCycleAnalysis {
    pub relevant_cycles: Vec<String>,
    pub root_causes: Vec<RootCauseEdge>,
    pub confidence: f64,
}

impl PrCycleAnalysis {
    /// The uniform silent result: all fields empty, confidence zero.
    pub fn empty() -> Self {
        Self::default()
    }
}
