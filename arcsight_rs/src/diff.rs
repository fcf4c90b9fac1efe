//! Set diff over canonical cycle lists.
//!
//! Equality is byte-for-byte on canonical strings; no trimming, folding, or
//! re-normalization happens here. Inputs tolerate duplicates, outputs are
//! sorted and deduplicated, and the inputs are never mutated.
//!
//! # Example
//!
//! ```rust
//! use arcsight::diff::diff_cycles;
//!
//! let base = vec!["a.ts → b.ts → a.ts".to_string()];
//! let head = vec!["c.ts → c.ts".to_string()];
//! let diff = diff_cycles(&base, &head);
//! assert_eq!(diff.new_cycles, vec!["c.ts → c.ts"]);
//! assert_eq!(diff.removed_cycles, vec!["a.ts → b.ts → a.ts"]);
//! ```

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::CYCLE_ARROW;

/// New/removed cycle sets between a base and a head snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleDiff {
    pub new_cycles: Vec<String>,
    pub removed_cycles: Vec<String>,
    pub error_detected: bool,
}

impl CycleDiff {
    fn error() -> Self {
        Self {
            error_detected: true,
            ..Self::default()
        }
    }
}

/// A canonical cycle string must carry the arrow separator and may contain
/// neither backslashes nor uppercase characters.
fn valid_canonical_format(cycle: &str) -> bool {
    cycle.contains(CYCLE_ARROW)
        && !cycle.contains('\\')
        && !cycle.chars().any(|c| c.is_uppercase())
}

/// Diff two canonical cycle lists as sets.
pub fn diff_cycles(base: &[String], head: &[String]) -> CycleDiff {
    if !base.iter().chain(head.iter()).all(|c| valid_canonical_format(c)) {
        return CycleDiff::error();
    }

    let base_set: BTreeSet<&str> = base.iter().map(String::as_str).collect();
    let head_set: BTreeSet<&str> = head.iter().map(String::as_str).collect();

    let new_cycles = head_set
        .difference(&base_set)
        .map(|c| c.to_string())
        .collect();
    let removed_cycles = base_set
        .difference(&head_set)
        .map(|c| c.to_string())
        .collect();

    CycleDiff {
        new_cycles,
        removed_cycles,
        error_detected: false,
    }
}
