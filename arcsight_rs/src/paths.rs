//! Path normalization.
//!
//! Every path inside the pipeline is a normalized string: repo-relative,
//! forward-slash separated, lowercase, no `.` or `..` segments, no trailing
//! slash, never empty. [`normalize_path`] produces that form for paths that
//! originate on the filesystem (walk results, resolver hits);
//! [`normalize_lexical`] produces it for caller-supplied strings that may
//! not exist on disk (changed-file sets, diff paths).

use std::path::{Component, Path};

/// Normalize a filesystem-originated path against the repository root.
///
/// Resolves symlinks via canonicalization, strips the canonical root prefix,
/// converts separators, and lowercases. Returns `None` when the path escapes
/// the root or normalizes to the empty string.
pub fn normalize_path(path: &Path, repo_root: &Path) -> Option<String> {
    let canonical = path.canonicalize().ok()?;
    let root_canon = repo_root.canonicalize().ok()?;
    let relative = canonical.strip_prefix(&root_canon).ok()?;
    let joined = relative.to_string_lossy().replace('\\', "/").to_lowercase();
    let trimmed = joined.trim_start_matches("./").trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.to_string())
}

/// Normalize a repo-relative path string without touching the filesystem.
///
/// Folds `.` and `..` segments; returns `None` when the path climbs out of
/// the root or is empty after folding.
pub fn normalize_lexical(input: &str) -> Option<String> {
    let cleaned = input.replace('\\', "/").to_lowercase();
    let mut segments: Vec<&str> = Vec::new();
    for segment in cleaned.split('/') {
        match segment {
            "" | "." => continue,
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }
    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Join a specifier onto the directory of a normalized file path, folding
/// relative segments. `file_path` is the importer; the result is the
/// normalized module path the specifier denotes, extension questions aside.
pub fn join_relative(file_path: &str, specifier: &str) -> Option<String> {
    let dir = match file_path.rfind('/') {
        Some(idx) => &file_path[..idx],
        None => "",
    };
    if dir.is_empty() {
        normalize_lexical(specifier)
    } else {
        normalize_lexical(&format!("{}/{}", dir, specifier))
    }
}

/// Whether a string already satisfies the normalized-path contract.
pub fn is_normalized(path: &str) -> bool {
    if path.is_empty() || path.starts_with('/') || path.ends_with('/') {
        return false;
    }
    if path.contains('\\') {
        return false;
    }
    if path.chars().any(|c| c.is_uppercase()) {
        return false;
    }
    path.split('/').all(|seg| !seg.is_empty() && seg != "." && seg != "..")
}

/// Whether `path` (not yet canonicalized) stays under `root` component-wise.
/// Used as a cheap pre-check before filesystem probes in the resolver.
pub fn stays_under_root(path: &Path) -> bool {
    let mut depth: isize = 0;
    for component in path.components() {
        match component {
            Component::Normal(_) => depth += 1,
            Component::ParentDir => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            Component::CurDir => {}
            Component::RootDir | Component::Prefix(_) => return false,
        }
    }
    true
}
