//! Extension inference for relative and alias-resolved specifiers.
//!
//! The candidate order is fixed: `X.ts`, `X.tsx`, `X.js`, `X.jsx`,
//! `X/index.ts`, `X/index.tsx`, `X/index.js`, `X/index.jsx`. The first
//! existing file wins and is returned in normalized form.

use std::path::{Path, PathBuf};

use crate::paths::{normalize_path, stays_under_root};

/// Suffix candidates appended directly to the specifier path.
const FILE_SUFFIXES: [&str; 4] = [".ts", ".tsx", ".js", ".jsx"];

/// Index-file candidates joined under the specifier path.
const INDEX_CANDIDATES: [&str; 4] = ["index.ts", "index.tsx", "index.js", "index.jsx"];

/// Resolve a relative specifier (`./x`, `../y`) against the directory of
/// the importing file. `importer_dir` must lie under `repo_root`.
pub fn resolve_relative(
    importer_dir: &Path,
    specifier: &str,
    repo_root: &Path,
) -> Option<String> {
    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        return None;
    }
    resolve_with_inference(&importer_dir.join(specifier), repo_root)
}

/// Resolve an alias target (already repo-relative, e.g. `src/lib/util`)
/// against the repository root.
pub fn resolve_alias_target(target: &str, repo_root: &Path) -> Option<String> {
    let rel = PathBuf::from(target);
    if !stays_under_root(&rel) {
        return None;
    }
    resolve_with_inference(&repo_root.join(rel), repo_root)
}

/// Probe the fixed candidate list for `base` and normalize the first hit.
/// A hit that escapes `repo_root` after canonicalization counts as a miss.
fn resolve_with_inference(base: &Path, repo_root: &Path) -> Option<String> {
    let raw = base.to_string_lossy().into_owned();
    for suffix in FILE_SUFFIXES {
        let candidate = PathBuf::from(format!("{}{}", raw, suffix));
        if candidate.is_file() {
            return normalize_path(&candidate, repo_root);
        }
    }
    for index in INDEX_CANDIDATES {
        let candidate = base.join(index);
        if candidate.is_file() {
            return normalize_path(&candidate, repo_root);
        }
    }
    None
}
