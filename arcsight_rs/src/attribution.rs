//! Root-cause attribution for new cycles.
//!
//! For each new cycle the attributor finds the directed edge that exists in
//! the head graph but not in the base graph and whose source file is in the
//! PR's changed set. Exactly one such edge is the root cause; several are
//! tie-broken to the lexicographically smallest `(from, to)` pair. A cycle
//! with no such edge is non-attributable and silently dropped - that is a
//! normal exclusion, not an error.
//!
//! When the winning edge's source file has diff hunks, the first added line
//! containing a static string literal that would resolve to the edge target
//! under the extractor's inference rules contributes `line_number` and
//! `import_line`; otherwise both stay absent.

use std::collections::HashSet;

use crate::analyzer::cycles::parse_canonical_cycle;
use crate::analyzer::regexes::regex_string_literal;
use crate::paths::join_relative;
use crate::types::{DiffHunk, ImportGraphEntry, RootCauseEdge};

/// Attribution output; `error_detected` only flags structural input
/// violations (a cycle string that does not parse, an edge-less cycle list
/// entry), never a missing root cause.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributionResult {
    pub root_cause_edges: Vec<RootCauseEdge>,
    pub error_detected: bool,
}

impl AttributionResult {
    fn error() -> Self {
        Self {
            root_cause_edges: Vec::new(),
            error_detected: true,
        }
    }
}

/// Attribute each new cycle to its causing edge. `new_cycles` is expected in
/// sorted order; surviving edges keep that order, pairing 1:1 with their
/// cycles.
pub fn attribute_root_causes(
    new_cycles: &[String],
    changed_files: &HashSet<String>,
    head_graph: &[ImportGraphEntry],
    base_graph: &[ImportGraphEntry],
    hunks: &[DiffHunk],
) -> AttributionResult {
    let head_edges = edge_set(head_graph);
    let base_edges = edge_set(base_graph);

    let mut root_cause_edges = Vec::new();
    for cycle in new_cycles {
        let Some(nodes) = parse_canonical_cycle(cycle) else {
            return AttributionResult::error();
        };

        let mut candidates: Vec<(&str, &str)> = Vec::new();
        for (i, &from) in nodes.iter().enumerate() {
            let to = nodes[(i + 1) % nodes.len()];
            let edge = (from, to);
            if !head_edges.contains(&edge) || base_edges.contains(&edge) {
                continue;
            }
            if !changed_files.contains(from) {
                continue;
            }
            candidates.push(edge);
        }

        // Non-attributable: dropped, not an error.
        if candidates.is_empty() {
            continue;
        }

        // Deterministic tie-break; no guessing of intent.
        candidates.sort_unstable();
        let (from, to) = candidates[0];

        let located = locate_import_line(from, to, hunks);
        root_cause_edges.push(RootCauseEdge {
            from: from.to_string(),
            to: to.to_string(),
            canonical_cycle: cycle.clone(),
            line_number: located.as_ref().map(|(number, _)| *number),
            import_line: located.map(|(_, content)| content),
        });
    }

    AttributionResult {
        root_cause_edges,
        error_detected: false,
    }
}

fn edge_set(graph: &[ImportGraphEntry]) -> HashSet<(&str, &str)> {
    let mut edges = HashSet::new();
    for entry in graph {
        for target in &entry.imports {
            edges.insert((entry.file_path.as_str(), target.as_str()));
        }
    }
    edges
}

/// First added line in `from`'s hunks whose string literal resolves to `to`.
fn locate_import_line(from: &str, to: &str, hunks: &[DiffHunk]) -> Option<(u32, String)> {
    let mut lines: Vec<(u32, &str)> = hunks
        .iter()
        .filter(|hunk| hunk.file_path == from)
        .flat_map(|hunk| hunk.added_lines.iter())
        .map(|line| (line.line_number, line.content.as_str()))
        .collect();
    lines.sort_by_key(|(number, _)| *number);

    for (number, content) in lines {
        for caps in regex_string_literal().captures_iter(content) {
            let specifier = &caps[1];
            if specifier_reaches_target(from, specifier, to) {
                return Some((number, content.to_string()));
            }
        }
    }
    None
}

/// Whether `specifier`, written in `from`, could denote `to` under the
/// extractor's inference rules. Purely lexical: the candidate list for the
/// joined module path is compared against the known head-graph target.
fn specifier_reaches_target(from: &str, specifier: &str, to: &str) -> bool {
    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        return false;
    }
    let Some(module) = join_relative(from, specifier) else {
        return false;
    };
    let suffixes = [".ts", ".tsx", ".js", ".jsx"];
    if suffixes.iter().any(|s| format!("{}{}", module, s) == to) {
        return true;
    }
    suffixes
        .iter()
        .any(|s| format!("{}/index{}", module, s) == to)
}
