//! Import-graph extraction.
//!
//! Walks the repository deterministically, gates and decodes each candidate
//! file, scans comment-stripped text with the fixed regex families, and
//! resolves specifiers to normalized file paths. Every analyzed file
//! contributes exactly one graph entry, even with no imports; the final
//! graph is sorted by file path so directory-listing order never leaks into
//! the output.
//!
//! Failure policy: anything that goes wrong with a single file increments
//! `unreadable_file_count` and the file is skipped. Only an unreadable
//! repository root propagates as an error.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io;
use std::path::Path;

use super::aliases::{AliasResolution, AliasTable};
use super::comments::strip_comments;
use super::regexes::{
    regex_es_import_from, regex_import_stmt, regex_require_literal, regex_require_open,
    regex_side_effect_import, regex_type_only_import,
};
use super::resolvers;
use crate::fs_utils;
use crate::paths::normalize_path;
use crate::types::{FileStats, IMPORT_MATCH_CAP, ImportGraphEntry, MAX_SOURCE_FILE_BYTES};

/// Import graph plus the counters the confidence scorer consumes.
#[derive(Debug, Clone, Default)]
pub struct ExtractionResult {
    pub graph: Vec<ImportGraphEntry>,
    pub stats: FileStats,
}

/// Extract the import graph for a repository snapshot.
pub fn extract_import_graph(
    repo_root: &Path,
    aliases: &AliasTable,
) -> io::Result<ExtractionResult> {
    let files = fs_utils::gather_source_files(repo_root)?;
    let mut stats = FileStats {
        file_count: files.len(),
        ..FileStats::default()
    };
    let mut graph: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for file in &files {
        let Some(rel) = normalize_path(file, repo_root) else {
            stats.unreadable_file_count += 1;
            continue;
        };
        if graph.contains_key(&rel) {
            // Two real files collapsed onto one normalized key (case
            // collision). The first one in walk order wins.
            stats.unreadable_file_count += 1;
            continue;
        }
        let Some(text) = read_gated(file) else {
            stats.unreadable_file_count += 1;
            continue;
        };

        let importer_dir = match file.parent() {
            Some(dir) => dir,
            None => {
                stats.unreadable_file_count += 1;
                continue;
            }
        };

        let scanned = strip_comments(&text);
        let mut imports: BTreeSet<String> = BTreeSet::new();
        for specifier in scan_specifiers(&scanned) {
            classify_specifier(
                &specifier,
                importer_dir,
                repo_root,
                aliases,
                &mut stats,
                &mut imports,
            );
        }

        stats.analyzed_file_count += 1;
        graph.insert(rel, imports.into_iter().collect());
    }

    let graph = graph
        .into_iter()
        .map(|(file_path, imports)| ImportGraphEntry { file_path, imports })
        .collect();
    Ok(ExtractionResult { graph, stats })
}

/// Size gate, strict UTF-8 decode, BOM strip, CRLF normalization.
/// A file of exactly `MAX_SOURCE_FILE_BYTES` is still read.
fn read_gated(path: &Path) -> Option<String> {
    let meta = fs::metadata(path).ok()?;
    if meta.len() > MAX_SOURCE_FILE_BYTES {
        return None;
    }
    let bytes = fs::read(path).ok()?;
    let text = String::from_utf8(bytes).ok()?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text).to_string();
    if text.contains("\r\n") {
        Some(text.replace("\r\n", "\n"))
    } else {
        Some(text)
    }
}

/// Scan comment-stripped text for import specifiers.
///
/// The three families apply in fixed order per line: (1) ES-module
/// `import ... from` forms (type-only and dynamic guards included), then
/// (2) CommonJS `require(...)`, then (3) side-effect `import '...'`. A
/// line-leading `import` whose window carries no `from` literal is held
/// back and only consumes a match at family-3 time, so family priority
/// also governs which match survives at the soft cap. A specifier's string
/// literal may trail the keyword by at most two lines. Template literals
/// and other non-static arguments stay invisible to every counter.
fn scan_specifiers(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut specifiers = Vec::new();
    let mut matches_seen = 0usize;

    'scan: for (i, line) in lines.iter().enumerate() {
        // Family 1: ES-module import forms.
        let mut side_effect_window: Option<String> = None;
        if let Some(stmt) = regex_import_stmt().find(line) {
            let rest = &line[stmt.end()..];
            let dynamic = rest.trim_start().starts_with('(');
            let type_only = regex_type_only_import().is_match(line);
            if dynamic || type_only {
                if matches_seen >= IMPORT_MATCH_CAP {
                    break 'scan;
                }
                matches_seen += 1;
            } else {
                let window = lookahead_window(&lines, i);
                if let Some(caps) = regex_es_import_from().captures(&window) {
                    if matches_seen >= IMPORT_MATCH_CAP {
                        break 'scan;
                    }
                    matches_seen += 1;
                    specifiers.push(caps[1].to_string());
                } else {
                    side_effect_window = Some(window);
                }
            }
        }

        // Family 2: CommonJS require forms.
        for open in regex_require_open().find_iter(line) {
            if matches_seen >= IMPORT_MATCH_CAP {
                break 'scan;
            }
            matches_seen += 1;

            let window = require_window(&lines, i, open.start());
            if let Some(caps) = regex_require_literal().captures(&window) {
                specifiers.push(caps[1].to_string());
            }
        }

        // Family 3: side-effect import forms.
        if let Some(window) = side_effect_window {
            if matches_seen >= IMPORT_MATCH_CAP {
                break 'scan;
            }
            matches_seen += 1;
            if let Some(caps) = regex_side_effect_import().captures(&window) {
                specifiers.push(caps[1].to_string());
            }
        }
    }

    specifiers
}

/// The match line plus at most two lines of lookahead.
fn lookahead_window(lines: &[&str], start: usize) -> String {
    let end = (start + 2).min(lines.len().saturating_sub(1));
    lines[start..=end].join("\n")
}

/// From the `require` keyword to the end of the lookahead window.
fn require_window(lines: &[&str], line_idx: usize, col: usize) -> String {
    let mut window = lines[line_idx][col..].to_string();
    for extra in lines.iter().skip(line_idx + 1).take(2) {
        window.push('\n');
        window.push_str(extra);
    }
    window
}

/// Route one specifier: relative imports and single-target aliases go
/// through extension inference; bare imports only count; alias ambiguity
/// poisons the stats and leaves the import unresolved.
fn classify_specifier(
    specifier: &str,
    importer_dir: &Path,
    repo_root: &Path,
    aliases: &AliasTable,
    stats: &mut FileStats,
    imports: &mut BTreeSet<String>,
) {
    if specifier.starts_with("./") || specifier.starts_with("../") {
        stats.total_import_count += 1;
        match resolvers::resolve_relative(importer_dir, specifier, repo_root) {
            Some(target) => {
                imports.insert(target);
            }
            None => stats.unresolved_import_count += 1,
        }
        return;
    }

    match aliases.resolve(specifier) {
        AliasResolution::Resolved(target) => {
            stats.total_import_count += 1;
            match resolvers::resolve_alias_target(&target, repo_root) {
                Some(resolved) => {
                    imports.insert(resolved);
                }
                None => stats.unresolved_import_count += 1,
            }
        }
        AliasResolution::Ambiguous => {
            stats.alias_ambiguity_detected = true;
            stats.total_import_count += 1;
            stats.unresolved_import_count += 1;
        }
        AliasResolution::Unmatched => {
            // Bare/external import: counted, no edge, not unresolved.
            stats.total_import_count += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("mkdir");
        }
        std::fs::write(path, content).expect("write file");
    }

    fn extract(root: &Path) -> ExtractionResult {
        extract_import_graph(root, &AliasTable::empty()).expect("extract")
    }

    fn entry<'a>(result: &'a ExtractionResult, path: &str) -> &'a ImportGraphEntry {
        result
            .graph
            .iter()
            .find(|e| e.file_path == path)
            .unwrap_or_else(|| panic!("graph entry for {}", path))
    }

    #[test]
    fn resolves_relative_imports_to_normalized_edges() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "src/a.ts", "import { b } from './b';\n");
        write(root, "src/b.ts", "export const b = 1;\n");

        let result = extract(root);
        assert_eq!(entry(&result, "src/a.ts").imports, vec!["src/b.ts"]);
        assert!(entry(&result, "src/b.ts").imports.is_empty());
        assert_eq!(result.stats.total_import_count, 1);
        assert_eq!(result.stats.unresolved_import_count, 0);
    }

    #[test]
    fn every_analyzed_file_contributes_an_entry() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "lonely.ts", "export {};\n");

        let result = extract(root);
        assert_eq!(result.graph.len(), 1);
        assert_eq!(result.stats.file_count, 1);
        assert_eq!(result.stats.analyzed_file_count, 1);
    }

    #[test]
    fn graph_is_sorted_by_file_path() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "z.ts", "");
        write(root, "a.ts", "");
        write(root, "src/m.ts", "");

        let result = extract(root);
        let paths: Vec<_> = result.graph.iter().map(|e| e.file_path.clone()).collect();
        let mut sorted = paths.clone();
        sorted.sort();
        assert_eq!(paths, sorted);
    }

    #[test]
    fn self_import_produces_self_edge() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "src/a.ts", "import './a';\n");

        let result = extract(root);
        assert_eq!(entry(&result, "src/a.ts").imports, vec!["src/a.ts"]);
    }

    #[test]
    fn commonjs_require_is_scanned_after_es_imports() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.js", "const b = require('./b');\nconst c = require('./c');\n");
        write(root, "b.js", "");
        write(root, "c.js", "");

        let result = extract(root);
        assert_eq!(entry(&result, "a.js").imports, vec!["b.js", "c.js"]);
    }

    #[test]
    fn specifier_may_trail_two_lines_behind_the_keyword() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "import {\n  thing,\n} from './b';\n");
        write(root, "b.ts", "export const thing = 1;\n");

        let result = extract(root);
        assert_eq!(entry(&result, "a.ts").imports, vec!["b.ts"]);
    }

    #[test]
    fn specifier_three_lines_out_is_invisible() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "import {\n  a,\n  b,\n} from './b';\n");
        write(root, "b.ts", "");

        let result = extract(root);
        assert!(entry(&result, "a.ts").imports.is_empty());
    }

    #[test]
    fn type_only_imports_are_invisible_to_all_counters() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(
            root,
            "a.ts",
            "import type { T } from './b';\nimport { type U } from './b';\n",
        );
        write(root, "b.ts", "");

        let result = extract(root);
        assert!(entry(&result, "a.ts").imports.is_empty());
        assert_eq!(result.stats.total_import_count, 0);
    }

    #[test]
    fn dynamic_imports_and_template_requires_are_invisible() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(
            root,
            "a.ts",
            "const x = import('./b');\nconst y = require(`./b`);\nconst z = require(name);\n",
        );
        write(root, "b.ts", "");

        let result = extract(root);
        assert!(entry(&result, "a.ts").imports.is_empty());
        assert_eq!(result.stats.total_import_count, 0);
        assert_eq!(result.stats.unresolved_import_count, 0);
    }

    #[test]
    fn bare_imports_count_without_edges_or_unresolved() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "import react from 'react';\nimport './missing';\n");

        let result = extract(root);
        assert!(entry(&result, "a.ts").imports.is_empty());
        assert_eq!(result.stats.total_import_count, 2);
        assert_eq!(result.stats.unresolved_import_count, 1);
    }

    #[test]
    fn commented_out_imports_are_invisible() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "// import './b';\n/* import './c'; */\nimport './b';\n");
        write(root, "b.ts", "");
        write(root, "c.ts", "");

        let result = extract(root);
        assert_eq!(entry(&result, "a.ts").imports, vec!["b.ts"]);
        assert_eq!(result.stats.total_import_count, 1);
    }

    #[test]
    fn oversized_file_is_unreadable_but_boundary_file_parses() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        let boundary = " ".repeat(MAX_SOURCE_FILE_BYTES as usize);
        let over = " ".repeat(MAX_SOURCE_FILE_BYTES as usize + 1);
        write(root, "at_limit.ts", &boundary);
        write(root, "over_limit.ts", &over);

        let result = extract(root);
        assert_eq!(result.stats.file_count, 2);
        assert_eq!(result.stats.analyzed_file_count, 1);
        assert_eq!(result.stats.unreadable_file_count, 1);
        assert!(result.graph.iter().any(|e| e.file_path == "at_limit.ts"));
        assert!(!result.graph.iter().any(|e| e.file_path == "over_limit.ts"));
    }

    #[test]
    fn invalid_utf8_rejects_the_whole_file() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        std::fs::write(root.join("bad.ts"), [0x69, 0x6d, 0xff, 0xfe, 0x70]).expect("write");
        write(root, "good.ts", "export {};\n");

        let result = extract(root);
        assert_eq!(result.stats.unreadable_file_count, 1);
        assert_eq!(result.stats.analyzed_file_count, 1);
        assert!(!result.graph.iter().any(|e| e.file_path == "bad.ts"));
    }

    #[test]
    fn bom_and_crlf_are_normalized_before_scanning() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "\u{feff}import { b } from './b';\r\nexport const a = 1;\r\n");
        write(root, "b.ts", "");

        let result = extract(root);
        assert_eq!(entry(&result, "a.ts").imports, vec!["b.ts"]);
    }

    #[test]
    fn duplicate_specifiers_dedupe_into_one_edge() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "import './b';\nimport { x } from './b';\n");
        write(root, "b.ts", "export const x = 1;\n");

        let result = extract(root);
        assert_eq!(entry(&result, "a.ts").imports, vec!["b.ts"]);
        assert_eq!(result.stats.total_import_count, 2);
    }

    #[test]
    fn import_match_cap_stops_scanning() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        let mut content = String::new();
        for _ in 0..IMPORT_MATCH_CAP {
            content.push_str("import 'react';\n");
        }
        content.push_str("import './late';\n");
        write(root, "a.ts", &content);
        write(root, "late.ts", "");

        let result = extract(root);
        assert!(entry(&result, "a.ts").imports.is_empty());
        assert_eq!(result.stats.total_import_count, IMPORT_MATCH_CAP);
    }

    #[test]
    fn require_outranks_side_effect_import_at_the_cap_boundary() {
        // 499 matches of filler, then one line carrying both a side-effect
        // import and a require. Family priority says the require takes the
        // 500th slot and the side-effect import falls past the cap.
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        let mut content = String::new();
        for _ in 0..IMPORT_MATCH_CAP - 1 {
            content.push_str("import 'react';\n");
        }
        content.push_str("import './side'; const d = require('./dep');\n");
        write(root, "a.ts", &content);
        write(root, "side.ts", "");
        write(root, "dep.ts", "");

        let result = extract(root);
        assert_eq!(entry(&result, "a.ts").imports, vec!["dep.ts"]);
        assert_eq!(result.stats.total_import_count, IMPORT_MATCH_CAP);
    }

    #[test]
    fn alias_imports_resolve_through_the_table() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "src/lib/util.ts", "export const u = 1;\n");
        write(root, "src/app.ts", "import { u } from '@lib/util';\n");

        let table = AliasTable::from_entries(vec![("@lib/*".to_string(), "src/lib/*".to_string())]);
        let result = extract_import_graph(root, &table).expect("extract");
        assert_eq!(entry(&result, "src/app.ts").imports, vec!["src/lib/util.ts"]);
        assert!(!result.stats.alias_ambiguity_detected);
    }

    #[test]
    fn ambiguous_alias_poisons_stats_and_stays_unresolved() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "src/lib/util.ts", "");
        write(root, "src/app.ts", "import { u } from '@/lib/util';\n");

        let table = AliasTable::from_entries(vec![
            ("@/*".to_string(), "src/*".to_string()),
            ("@/lib/*".to_string(), "src/lib/*".to_string()),
        ]);
        let result = extract_import_graph(root, &table).expect("extract");
        assert!(result.stats.alias_ambiguity_detected);
        assert_eq!(result.stats.unresolved_import_count, 1);
        assert!(entry(&result, "src/app.ts").imports.is_empty());
    }

    #[test]
    fn export_from_reexports_are_not_imports() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "export { b } from './b';\nexport * from './c';\n");
        write(root, "b.ts", "");
        write(root, "c.ts", "");

        let result = extract(root);
        assert!(entry(&result, "a.ts").imports.is_empty());
        assert_eq!(result.stats.total_import_count, 0);
    }

    #[test]
    fn import_meta_is_not_an_import() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.ts", "const url = import.meta.url;\n");

        let result = extract(root);
        assert!(entry(&result, "a.ts").imports.is_empty());
        assert_eq!(result.stats.total_import_count, 0);
    }

    #[test]
    fn two_requires_on_one_line_both_count() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "a.js", "const b = require('./b'), c = require('./c');\n");
        write(root, "b.js", "");
        write(root, "c.js", "");

        let result = extract(root);
        assert_eq!(entry(&result, "a.js").imports, vec!["b.js", "c.js"]);
        assert_eq!(result.stats.total_import_count, 2);
    }

    #[test]
    fn parent_directory_imports_resolve_across_the_tree() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "lib/util.tsx", "export const u = 1;\n");
        write(root, "src/pages/home.ts", "import { u } from '../../lib/util';\n");

        let result = extract(root);
        assert_eq!(
            entry(&result, "src/pages/home.ts").imports,
            vec!["lib/util.tsx"]
        );
    }

    #[test]
    fn declaration_files_are_not_even_counted() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "api.d.ts", "import './lib';\n");
        write(root, "lib.ts", "");

        let result = extract(root);
        assert_eq!(result.stats.file_count, 1);
        assert!(!result.graph.iter().any(|e| e.file_path == "api.d.ts"));
    }

    #[test]
    fn excluded_directories_contribute_nothing() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "node_modules/react/index.js", "module.exports = {};\n");
        write(root, "src/app.ts", "import react from 'react';\n");

        let result = extract(root);
        assert_eq!(result.stats.file_count, 1);
        assert_eq!(result.graph.len(), 1);
    }

    #[test]
    fn unreadable_root_is_a_hard_failure() {
        let missing = PathBuf::from("/nonexistent/arcsight-extract");
        assert!(extract_import_graph(&missing, &AliasTable::empty()).is_err());
    }

    #[test]
    fn extraction_is_deterministic_across_runs() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        let root = tmp.path();
        write(root, "src/a.ts", "import './b';\nimport './c';\n");
        write(root, "src/b.ts", "import './c';\n");
        write(root, "src/c.ts", "");

        let first = extract(root);
        let second = extract(root);
        assert_eq!(first.graph, second.graph);
        assert_eq!(first.stats, second.stats);
        let first_json = serde_json::to_string(&first.graph).expect("json");
        let second_json = serde_json::to_string(&second.graph).expect("json");
        assert_eq!(first_json, second_json);
    }
}
