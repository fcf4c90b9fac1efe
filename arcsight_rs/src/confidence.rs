//! Confidence scoring over segmentation quality.
//!
//! A pure function of the extractor's self-assessment. Fixed-order
//! short-circuits return zero outright; otherwise the score is a weighted
//! blend of coverage and resolution quality, clamped to [0,1]. The scorer
//! never observes cycles, imports, or diff output.
//!
//! # Example
//!
//! ```rust
//! use arcsight::confidence::{ConfidenceBucket, bucket, score_segmentation, segmentation_quality};
//! use arcsight::types::FileStats;
//!
//! let stats = FileStats {
//!     file_count: 40,
//!     analyzed_file_count: 40,
//!     total_import_count: 100,
//!     unresolved_import_count: 0,
//!     unreadable_file_count: 0,
//!     alias_ambiguity_detected: false,
//! };
//! let score = score_segmentation(&segmentation_quality(&stats, false));
//! assert_eq!(bucket(score), ConfidenceBucket::High);
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{
    AliasStatus, FileStats, HIGH_CONFIDENCE_THRESHOLD, MIN_FILE_COUNT_FOR_CONFIDENCE,
    SegmentationQuality,
};

/// Weight of analyzed-file coverage in the blended score.
pub const COVERAGE_WEIGHT: f64 = 0.4;

/// Weight of the resolved-import share in the blended score.
pub const RESOLUTION_WEIGHT: f64 = 0.3;

/// Base offset granted to any repository that clears the short-circuits.
pub const BASE_WEIGHT: f64 = 0.3;

/// Score bucket consumed by the surrounding pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBucket {
    High,
    Low,
}

/// Bucket a score: `>= 0.8` is high, everything else low.
pub fn bucket(score: f64) -> ConfidenceBucket {
    if score >= HIGH_CONFIDENCE_THRESHOLD {
        ConfidenceBucket::High
    } else {
        ConfidenceBucket::Low
    }
}

/// Build the scorer input from extractor counters and the workspace signal.
/// `import_graph_stable` defaults to true for a single run; external
/// determinism measurement may override it.
pub fn segmentation_quality(stats: &FileStats, is_monorepo: bool) -> SegmentationQuality {
    let coverage = if stats.file_count == 0 {
        0.0
    } else {
        stats.analyzed_file_count as f64 / stats.file_count as f64
    };
    let unresolved_ratio = if stats.total_import_count == 0 {
        0.0
    } else {
        stats.unresolved_import_count as f64 / stats.total_import_count as f64
    };
    SegmentationQuality {
        file_count: stats.file_count,
        analyzed_file_count: stats.analyzed_file_count,
        analyzed_file_coverage: coverage,
        alias_status: if stats.alias_ambiguity_detected {
            AliasStatus::Uncertain
        } else {
            AliasStatus::Ok
        },
        is_monorepo,
        import_graph_stable: true,
        unresolved_import_ratio: unresolved_ratio,
    }
}

fn in_unit_interval(value: f64) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

/// Score segmentation quality. Short-circuits, in this fixed order:
/// malformed input, `file_count < 10`, uncertain aliases, monorepo,
/// unstable graph - each returns zero immediately.
pub fn score_segmentation(quality: &SegmentationQuality) -> f64 {
    let malformed = !in_unit_interval(quality.analyzed_file_coverage)
        || !in_unit_interval(quality.unresolved_import_ratio)
        || quality.analyzed_file_count > quality.file_count;
    if malformed {
        return 0.0;
    }
    if quality.file_count < MIN_FILE_COUNT_FOR_CONFIDENCE {
        return 0.0;
    }
    if quality.alias_status == AliasStatus::Uncertain {
        return 0.0;
    }
    if quality.is_monorepo {
        return 0.0;
    }
    if !quality.import_graph_stable {
        return 0.0;
    }

    let score = COVERAGE_WEIGHT * quality.analyzed_file_coverage
        + RESOLUTION_WEIGHT * (1.0 - quality.unresolved_import_ratio)
        + BASE_WEIGHT;
    score.clamp(0.0, 1.0)
}
