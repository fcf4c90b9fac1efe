//! Deterministic filesystem walk.
//!
//! The walk visits directory entries in byte-order ascending name order,
//! resolves symlinks to real paths, and visits each real path at most once
//! (a visited-set prevents symlink cycles). Excluded directory names are
//! matched exactly wherever they appear in the tree; `*.d.ts` declaration
//! files are excluded by glob.

use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::types::{EXCLUDED_DIR_NAMES, SOURCE_EXTENSIONS};

fn declaration_file_globs() -> &'static GlobSet {
    static SET: OnceLock<GlobSet> = OnceLock::new();
    SET.get_or_init(|| {
        let mut builder = GlobSetBuilder::new();
        builder.add(Glob::new("*.d.ts").expect("valid glob literal"));
        builder.build().expect("globset builds from literals")
    })
}

fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIR_NAMES.contains(&name)
}

fn has_source_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SOURCE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_declaration_file(path: &Path) -> bool {
    path.file_name()
        .map(|name| declaration_file_globs().is_match(Path::new(&name.to_string_lossy().to_lowercase())))
        .unwrap_or(false)
}

/// Whether a file path is an analysis candidate: included extension and not
/// a `.d.ts` declaration file.
pub fn is_source_candidate(path: &Path) -> bool {
    has_source_extension(path) && !is_declaration_file(path)
}

/// Walk `root` and return every source-file candidate as a canonical real
/// path. The returned order is the deterministic walk order; callers that
/// need a globally sorted view sort the final artifact, not the walk.
///
/// Only an unreadable root is an error; anything deeper is skipped.
pub fn gather_source_files(root: &Path) -> io::Result<Vec<PathBuf>> {
    let root_canon = root.canonicalize()?;
    // Probe the root eagerly so an unreadable repository fails hard instead
    // of producing an empty graph.
    fs::read_dir(&root_canon)?;

    let mut visited = HashSet::new();
    let mut files = Vec::new();
    walk_dir(&root_canon, &mut visited, &mut files);
    Ok(files)
}

fn walk_dir(dir: &Path, visited: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) {
    let dir_canon = match dir.canonicalize() {
        Ok(p) => p,
        Err(_) => return,
    };
    if !visited.insert(dir_canon.clone()) {
        return;
    }

    let entries = match fs::read_dir(&dir_canon) {
        Ok(iter) => iter,
        Err(_) => return,
    };
    let mut names: Vec<_> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect();
    // str ordering is byte-wise, which is exactly the walk order contract.
    names.sort_by_key(|p| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    for path in names {
        let name = match path.file_name() {
            Some(n) => n.to_string_lossy().into_owned(),
            None => continue,
        };

        // Symlinks resolve to real paths; broken links are skipped.
        let target = match path.canonicalize() {
            Ok(p) => p,
            Err(_) => continue,
        };
        let meta = match fs::metadata(&target) {
            Ok(m) => m,
            Err(_) => continue,
        };

        if meta.is_dir() {
            if is_excluded_dir(&name) {
                continue;
            }
            walk_dir(&target, visited, files);
        } else if meta.is_file() && is_source_candidate(&target) {
            if visited.insert(target.clone()) {
                files.push(target);
            }
        }
    }
}
