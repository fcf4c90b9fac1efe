//! # arcsight
//!
//! **PR-time cycle sentinel** - answers one binary question for a
//! JavaScript/TypeScript repository: does this pull request introduce new
//! dependency cycles whose root-cause edge can be attributed to a changed
//! file? When the answer is certainly yes, arcsight reports the cycles and
//! their causing edges; in every other case - ambiguity, non-determinism,
//! any internal error - it stays silent. Zero false positives is the hard
//! constraint; missed cycles are acceptable.
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! // Cycles in the current working tree.
//! let commit = arcsight::analyze_commit(Path::new("."));
//! println!("{} cycles", commit.canonical_cycles.len());
//!
//! // New, attributable cycles introduced by a PR.
//! let pr = arcsight::analyze_pr(
//!     Path::new("."),
//!     "base-sha",
//!     "head-sha",
//!     &["src/a.ts".to_string()],
//! );
//! for edge in &pr.root_causes {
//!     println!("{} -> {}", edge.from, edge.to);
//! }
//! ```
//!
//! ## Pipeline
//!
//! Path normalization -> alias resolution -> regex-based import extraction
//! -> Tarjan/Johnson cycle detection -> canonical cycle diff -> root-cause
//! attribution -> confidence scoring -> safety gates. Each stage is a pure
//! function returning a result plus an `error_detected` flag; the
//! orchestrator collapses any flagged stage into the uniform empty result.
//! Nothing is ever thrown to callers and no diagnostics are emitted in any
//! mode.

// ============================================================================
// Core Modules
// ============================================================================

/// Import extraction, cycle detection, and orchestration.
pub mod analyzer;

/// Root-cause attribution for new cycles.
pub mod attribution;

/// Confidence scoring over segmentation quality.
pub mod confidence;

/// Set diff over canonical cycle lists.
pub mod diff;

/// Unified-diff parsing into per-file added lines.
pub mod diffparse;

/// Deterministic filesystem walk.
pub mod fs_utils;

/// VCS collaborator (checkout, HEAD, added lines) over libgit2.
pub mod git;

/// Path normalization: the single form paths take inside the pipeline.
pub mod paths;

/// Invariant validation and the safety switch.
pub mod safety;

/// Append-only NDJSON cycle snapshots.
pub mod snapshot;

/// Common types and the hard-coded pipeline constants.
pub mod types;

// ============================================================================
// Re-exports for convenience
// ============================================================================

/// Commit-level entry point.
pub use analyzer::runner::analyze_commit;

/// PR-level entry point.
pub use analyzer::runner::analyze_pr;

/// Commit-level result.
pub use types::CommitAnalysis;

/// PR-level result.
pub use types::PrCycleAnalysis;

/// One file and its resolved imports.
pub use types::ImportGraphEntry;

/// The attributed edge closing a new cycle.
pub use types::RootCauseEdge;

/// Extractor counters feeding the scorer.
pub use types::FileStats;

/// Scorer input metrics.
pub use types::SegmentationQuality;

/// High/Low confidence bucket.
pub use confidence::ConfidenceBucket;
