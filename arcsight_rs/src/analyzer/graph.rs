//! Index-based import graph.
//!
//! The cycle detector works on integer node ids derived from the sorted
//! node list instead of string-keyed adjacency maps; strings reappear only
//! at canonicalization. Construction validates the entry-level contract and
//! is independent of top-level entry order.

use std::collections::HashSet;

use crate::types::ImportGraphEntry;

/// Immutable index graph: `names[id]` is the node path, `adj[id]` its
/// outgoing edges, sorted ascending and deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexGraph {
    names: Vec<String>,
    adj: Vec<Vec<usize>>,
}

impl IndexGraph {
    /// Build from import-graph entries. Returns `None` when any entry is
    /// malformed: empty path, duplicate path, empty target, or imports that
    /// are not strictly ascending (sorted and deduplicated).
    ///
    /// Targets without an entry of their own are terminal; they cannot sit
    /// on a cycle and are dropped from the adjacency.
    pub fn from_entries(entries: &[ImportGraphEntry]) -> Option<Self> {
        if !Self::entries_are_well_formed(entries) {
            return None;
        }

        let mut names: Vec<String> = entries.iter().map(|e| e.file_path.clone()).collect();
        names.sort_unstable();

        let mut adj: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
        for entry in entries {
            let from = names
                .binary_search(&entry.file_path)
                .expect("every entry path is in the sorted node list");
            for target in &entry.imports {
                if let Ok(to) = names.binary_search(target) {
                    adj[from].push(to);
                }
            }
        }
        for list in &mut adj {
            list.sort_unstable();
            list.dedup();
        }

        Some(Self { names, adj })
    }

    fn entries_are_well_formed(entries: &[ImportGraphEntry]) -> bool {
        let mut seen = HashSet::new();
        for entry in entries {
            if entry.file_path.is_empty() {
                return false;
            }
            if !seen.insert(entry.file_path.as_str()) {
                return false;
            }
            if entry.imports.iter().any(|target| target.is_empty()) {
                return false;
            }
            for pair in entry.imports.windows(2) {
                if pair[0] >= pair[1] {
                    return false;
                }
            }
        }
        true
    }

    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, id: usize) -> &str {
        &self.names[id]
    }

    pub fn neighbors(&self, id: usize) -> &[usize] {
        &self.adj[id]
    }

    /// Whether the node carries an edge to itself.
    pub fn has_self_edge(&self, id: usize) -> bool {
        self.adj[id].binary_search(&id).is_ok()
    }
}
