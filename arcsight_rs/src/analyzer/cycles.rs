//! Elementary-cycle detection over the import graph.
//!
//! Tarjan's strongly-connected-components algorithm runs on the index graph
//! from [`super::graph`]; a Johnson style DFS then enumerates elementary
//! cycles inside each SCC, visiting neighbors in sorted order so the output
//! never depends on entry order. Cycles are canonicalized to
//! `p1 → ... → pn → p1` strings rotated to the byte-wise smallest node,
//! then sorted and deduplicated.
//!
//! Malformed input or a breached recursion cap yields the empty result with
//! `error_detected: true` and no partial output.
//!
//! # Example
//!
//! ```rust
//! use arcsight::ImportGraphEntry;
//! use arcsight::analyzer::cycles::detect_cycles;
//!
//! let graph = vec![
//!     ImportGraphEntry { file_path: "a.ts".into(), imports: vec!["b.ts".into()] },
//!     ImportGraphEntry { file_path: "b.ts".into(), imports: vec!["a.ts".into()] },
//! ];
//! let result = detect_cycles(&graph);
//! assert_eq!(result.canonical_cycles, vec!["a.ts → b.ts → a.ts"]);
//! ```

use std::cmp::min;
use std::collections::{HashMap, HashSet};

use super::graph::IndexGraph;
use crate::types::{CYCLE_ARROW, ImportGraphEntry};

/// Detector output: canonical cycle strings or a poisoned empty result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleDetection {
    pub canonical_cycles: Vec<String>,
    pub error_detected: bool,
}

impl CycleDetection {
    fn error() -> Self {
        Self {
            canonical_cycles: Vec::new(),
            error_detected: true,
        }
    }
}

/// Split a canonical cycle string into its traversal nodes (closing node
/// dropped). Returns `None` when the string is not a well-formed cycle.
pub fn parse_canonical_cycle(cycle: &str) -> Option<Vec<&str>> {
    let parts: Vec<&str> = cycle.split(CYCLE_ARROW).collect();
    if parts.len() < 2 {
        return None;
    }
    if parts.first() != parts.last() {
        return None;
    }
    if parts.iter().any(|p| p.is_empty()) {
        return None;
    }
    Some(parts[..parts.len() - 1].to_vec())
}

/// Find every elementary cycle in the graph.
pub fn detect_cycles(entries: &[ImportGraphEntry]) -> CycleDetection {
    let Some(graph) = IndexGraph::from_entries(entries) else {
        return CycleDetection::error();
    };

    // The cap bounds legitimate DFS depth exactly; anything deeper is a bug
    // or an adversarial input, and either silences the run.
    let depth_cap = graph.node_count();

    let mut tarjan = Tarjan::new(graph.node_count(), depth_cap);
    for v in 0..graph.node_count() {
        if tarjan.indices[v].is_none() {
            tarjan.strongconnect(v, &graph, 1);
        }
        if tarjan.depth_exceeded {
            return CycleDetection::error();
        }
    }

    let mut raw_cycles: Vec<Vec<usize>> = Vec::new();

    // Self-loops, independent of SCC size.
    for v in 0..graph.node_count() {
        if graph.has_self_edge(v) {
            raw_cycles.push(vec![v]);
        }
    }

    let mut overflow = false;
    for scc in &tarjan.sccs {
        if scc.len() < 2 {
            continue;
        }
        let mut members = scc.clone();
        members.sort_unstable();
        enumerate_scc_cycles(&members, &graph, depth_cap, &mut raw_cycles, &mut overflow);
        if overflow {
            return CycleDetection::error();
        }
    }

    let mut canonical: Vec<String> = raw_cycles
        .iter()
        .map(|cycle| canonicalize_cycle(cycle, &graph))
        .collect();
    canonical.sort_unstable();
    canonical.dedup();

    CycleDetection {
        canonical_cycles: canonical,
        error_detected: false,
    }
}

struct Tarjan {
    index: usize,
    indices: Vec<Option<usize>>,
    lowlinks: Vec<usize>,
    stack: Vec<usize>,
    on_stack: Vec<bool>,
    sccs: Vec<Vec<usize>>,
    depth_cap: usize,
    depth_exceeded: bool,
}

impl Tarjan {
    fn new(node_count: usize, depth_cap: usize) -> Self {
        Self {
            index: 0,
            indices: vec![None; node_count],
            lowlinks: vec![0; node_count],
            stack: Vec::new(),
            on_stack: vec![false; node_count],
            sccs: Vec::new(),
            depth_cap,
            depth_exceeded: false,
        }
    }

    fn strongconnect(&mut self, v: usize, graph: &IndexGraph, depth: usize) {
        if depth > self.depth_cap {
            self.depth_exceeded = true;
            return;
        }
        self.indices[v] = Some(self.index);
        self.lowlinks[v] = self.index;
        self.index += 1;
        self.stack.push(v);
        self.on_stack[v] = true;

        for &w in graph.neighbors(v) {
            if self.depth_exceeded {
                return;
            }
            if self.indices[w].is_none() {
                self.strongconnect(w, graph, depth + 1);
                if self.depth_exceeded {
                    return;
                }
                self.lowlinks[v] = min(self.lowlinks[v], self.lowlinks[w]);
            } else if self.on_stack[w] {
                let w_index = self.indices[w].expect("Tarjan: visited neighbor has an index");
                self.lowlinks[v] = min(self.lowlinks[v], w_index);
            }
        }

        let v_index = self.indices[v].expect("Tarjan: node index assigned at entry");
        if self.lowlinks[v] == v_index {
            let mut scc = Vec::new();
            loop {
                let w = self.stack.pop().expect("Tarjan: stack holds every pushed node");
                self.on_stack[w] = false;
                scc.push(w);
                if w == v {
                    break;
                }
            }
            self.sccs.push(scc);
        }
    }
}

/// Johnson-style enumeration of elementary cycles of length >= 2 inside one
/// SCC. Start nodes and neighbors are visited ascending; each cycle is
/// produced exactly once, rooted at its smallest node id.
fn enumerate_scc_cycles(
    members: &[usize],
    graph: &IndexGraph,
    depth_cap: usize,
    out: &mut Vec<Vec<usize>>,
    overflow: &mut bool,
) {
    let in_scc: HashSet<usize> = members.iter().copied().collect();
    for &start in members {
        let mut state = CircuitState {
            blocked: HashSet::new(),
            block_map: HashMap::new(),
            path: Vec::new(),
        };
        circuit(start, start, graph, &in_scc, &mut state, out, depth_cap, overflow);
        if *overflow {
            return;
        }
    }
}

struct CircuitState {
    blocked: HashSet<usize>,
    block_map: HashMap<usize, HashSet<usize>>,
    path: Vec<usize>,
}

#[allow(clippy::too_many_arguments)]
fn circuit(
    v: usize,
    start: usize,
    graph: &IndexGraph,
    in_scc: &HashSet<usize>,
    state: &mut CircuitState,
    out: &mut Vec<Vec<usize>>,
    depth_cap: usize,
    overflow: &mut bool,
) -> bool {
    state.path.push(v);
    if state.path.len() > depth_cap {
        *overflow = true;
        state.path.pop();
        return false;
    }
    state.blocked.insert(v);

    let mut found = false;
    for &w in graph.neighbors(v) {
        if *overflow {
            break;
        }
        // Restrict to this SCC and to nodes >= start so every cycle is
        // rooted at its smallest id; self-loops are collected separately.
        if w < start || w == v || !in_scc.contains(&w) {
            continue;
        }
        if w == start {
            out.push(state.path.clone());
            found = true;
        } else if !state.blocked.contains(&w)
            && circuit(w, start, graph, in_scc, state, out, depth_cap, overflow)
        {
            found = true;
        }
    }

    if found {
        unblock(v, &mut state.blocked, &mut state.block_map);
    } else {
        for &w in graph.neighbors(v) {
            if w < start || w == v || !in_scc.contains(&w) {
                continue;
            }
            state.block_map.entry(w).or_default().insert(v);
        }
    }

    state.path.pop();
    found
}

fn unblock(
    v: usize,
    blocked: &mut HashSet<usize>,
    block_map: &mut HashMap<usize, HashSet<usize>>,
) {
    blocked.remove(&v);
    if let Some(dependents) = block_map.remove(&v) {
        for w in dependents {
            if blocked.contains(&w) {
                unblock(w, blocked, block_map);
            }
        }
    }
}

/// Rotate to the byte-wise smallest node, join forward with the arrow, and
/// close the loop. Self-cycles render as `p → p`.
fn canonicalize_cycle(cycle: &[usize], graph: &IndexGraph) -> String {
    if cycle.len() == 1 {
        let name = graph.name(cycle[0]);
        return format!("{}{}{}", name, CYCLE_ARROW, name);
    }
    let min_pos = cycle
        .iter()
        .enumerate()
        .min_by_key(|&(_, &id)| graph.name(id))
        .map(|(pos, _)| pos)
        .expect("canonicalize: cycle is non-empty");
    let mut parts: Vec<&str> = Vec::with_capacity(cycle.len() + 1);
    for offset in 0..cycle.len() {
        parts.push(graph.name(cycle[(min_pos + offset) % cycle.len()]));
    }
    parts.push(graph.name(cycle[min_pos]));
    parts.join(CYCLE_ARROW)
}
