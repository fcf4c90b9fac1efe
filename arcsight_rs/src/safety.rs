//! Final gates before any PR result is released.
//!
//! The invariant validator cross-checks structural contracts on the
//! outgoing data; the safety switch aggregates pre-computed signals into a
//! single silence decision. Neither measures anything itself.

use serde::{Deserialize, Serialize};

use crate::analyzer::cycles::parse_canonical_cycle;
use crate::paths::is_normalized;
use crate::types::{ImportGraphEntry, RootCauseEdge, RUNTIME_BUDGET_SECONDS};

/// Pre-computed signals consumed by the safety switch. Determinism and
/// stability flags come from external measurement; a single run passes
/// `true` for both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetySwitchContext {
    pub determinism_consistent: bool,
    pub runtime_seconds: f64,
    pub alias_ambiguity_detected: bool,
    pub import_graph_complete: bool,
    pub root_cause_detection_stable: bool,
    pub component_error_detected: bool,
}

impl SafetySwitchContext {
    /// A context that silences nothing; fields are overridden per run.
    pub fn clean(runtime_seconds: f64) -> Self {
        Self {
            determinism_consistent: true,
            runtime_seconds,
            alias_ambiguity_detected: false,
            import_graph_complete: true,
            root_cause_detection_stable: true,
            component_error_detected: false,
        }
    }
}

/// True when anything demands silence. A runtime of exactly the budget
/// passes; a malformed (non-finite or negative) runtime silences.
pub fn should_silence(context: &SafetySwitchContext) -> bool {
    if !context.runtime_seconds.is_finite() || context.runtime_seconds < 0.0 {
        return true;
    }
    !context.determinism_consistent
        || context.runtime_seconds > RUNTIME_BUDGET_SECONDS
        || context.alias_ambiguity_detected
        || !context.import_graph_complete
        || !context.root_cause_detection_stable
        || context.component_error_detected
}

/// Outcome of the invariant validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvariantReport {
    pub all_invariants_satisfied: bool,
    pub violations: Vec<String>,
}

/// Cross-check structural contracts on the outgoing result parts.
pub fn validate_invariants(
    cycles: &[String],
    graph: &[ImportGraphEntry],
    edges: &[RootCauseEdge],
) -> InvariantReport {
    let mut violations = Vec::new();

    for (i, cycle) in cycles.iter().enumerate() {
        match parse_canonical_cycle(cycle) {
            Some(nodes) => {
                if nodes.iter().any(|node| !is_normalized(node)) {
                    violations.push(format!("cycle[{}]: non-normalized node", i));
                }
            }
            None => violations.push(format!("cycle[{}]: invalid canonical format", i)),
        }
        if cycle.contains('\\') || cycle.chars().any(|c| c.is_uppercase()) {
            violations.push(format!("cycle[{}]: backslash or uppercase", i));
        }
        if cycles[..i].contains(cycle) {
            violations.push(format!("cycle[{}]: duplicated in list", i));
        }
    }

    let mut previous: Option<&str> = None;
    for (i, entry) in graph.iter().enumerate() {
        if !is_normalized(&entry.file_path) {
            violations.push(format!("graph[{}]: non-normalized file path", i));
        }
        if let Some(prev) = previous {
            if prev >= entry.file_path.as_str() {
                violations.push(format!("graph[{}]: file paths not strictly ascending", i));
            }
        }
        previous = Some(entry.file_path.as_str());

        for pair in entry.imports.windows(2) {
            if pair[0] >= pair[1] {
                violations.push(format!("graph[{}]: imports not sorted and deduplicated", i));
                break;
            }
        }
        if entry.imports.iter().any(|target| !is_normalized(target)) {
            violations.push(format!("graph[{}]: non-normalized import target", i));
        }
    }

    for (i, edge) in edges.iter().enumerate() {
        if !is_normalized(&edge.from) || !is_normalized(&edge.to) {
            violations.push(format!("edge[{}]: non-normalized endpoint", i));
        }
        if edge.canonical_cycle.is_empty() {
            violations.push(format!("edge[{}]: empty canonical cycle", i));
        }
        if edge.line_number == Some(0) {
            violations.push(format!("edge[{}]: line number below 1", i));
        }
        if edge.line_number.is_some() != edge.import_line.is_some() {
            violations.push(format!("edge[{}]: line fields not paired", i));
        }
        if !cycles.contains(&edge.canonical_cycle) {
            violations.push(format!("edge[{}]: cycle not in accompanying list", i));
        }
    }

    InvariantReport {
        all_invariants_satisfied: violations.is_empty(),
        violations,
    }
}
