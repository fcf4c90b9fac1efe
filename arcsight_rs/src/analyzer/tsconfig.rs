//! Best-effort project configuration: alias table and monorepo detection.
//!
//! Aliases come from `compilerOptions.paths` in `tsconfig.json`, falling
//! back to `jsconfig.json` (where `paths` may also sit at the top level).
//! Both files routinely carry comments and trailing commas, so the content
//! is comment-stripped and comma-scrubbed before JSON parsing. Absence of
//! both files is not an error; a parse failure degrades to "no aliases".

use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::aliases::AliasTable;
use super::comments::strip_comments;

/// Alias table plus the workspace-shape signal consumed by the scorer.
#[derive(Debug, Clone, Default)]
pub struct ProjectConfig {
    pub aliases: AliasTable,
    pub is_monorepo: bool,
}

/// Load alias configuration and monorepo markers for a repository root.
/// Never fails; every problem degrades to the empty configuration.
pub fn load_project_config(repo_root: &Path) -> ProjectConfig {
    ProjectConfig {
        aliases: load_alias_table(repo_root),
        is_monorepo: detect_monorepo(repo_root),
    }
}

fn load_alias_table(repo_root: &Path) -> AliasTable {
    for name in ["tsconfig.json", "jsconfig.json"] {
        let Some(value) = read_config_json(&repo_root.join(name)) else {
            continue;
        };
        if let Some(paths) = find_paths_object(&value) {
            return alias_table_from_paths(paths);
        }
    }
    AliasTable::empty()
}

fn read_config_json(path: &Path) -> Option<Value> {
    if !path.is_file() {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    let stripped = strip_comments(&content);
    let scrubbed = scrub_trailing_commas(&stripped);
    serde_json::from_str(&scrubbed).ok()
}

/// Remove trailing commas before `}` / `]`, the most common JSON5-ism in
/// tsconfig files. Runs on comment-stripped text.
fn scrub_trailing_commas(content: &str) -> String {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r#",\s*([}\]])"#).expect("valid regex literal"));
    re.replace_all(content, "$1").into_owned()
}

fn find_paths_object(value: &Value) -> Option<&serde_json::Map<String, Value>> {
    value
        .get("compilerOptions")
        .and_then(|c| c.get("paths"))
        .or_else(|| value.get("paths"))
        .and_then(|p| p.as_object())
}

fn alias_table_from_paths(paths: &serde_json::Map<String, Value>) -> AliasTable {
    let mut entries = Vec::new();
    for (alias, targets) in paths.iter() {
        let Some(first) = targets.as_array().and_then(|arr| arr.first()) else {
            continue;
        };
        let Some(target) = first.as_str() else {
            continue;
        };
        let alias = normalize_pattern(alias);
        let target = normalize_pattern(target);
        if alias.is_empty() || target.is_empty() {
            continue;
        }
        entries.push((alias, target));
    }
    AliasTable::from_entries(entries)
}

/// Separator and prefix cleanup only; case is preserved because targets are
/// probed against the real filesystem during extension inference.
fn normalize_pattern(pattern: &str) -> String {
    let mut cleaned = pattern.trim().replace('\\', "/");
    while let Some(rest) = cleaned.strip_prefix("./") {
        cleaned = rest.to_string();
    }
    cleaned
}

fn detect_monorepo(repo_root: &Path) -> bool {
    if repo_root.join("pnpm-workspace.yaml").is_file() || repo_root.join("lerna.json").is_file() {
        return true;
    }
    if root_package_declares_workspaces(repo_root) {
        return true;
    }
    ["packages", "apps"]
        .iter()
        .any(|dir| has_nested_manifest(&repo_root.join(dir)))
}

fn root_package_declares_workspaces(repo_root: &Path) -> bool {
    read_config_json(&repo_root.join("package.json"))
        .map(|value| value.get("workspaces").is_some())
        .unwrap_or(false)
}

fn has_nested_manifest(dir: &Path) -> bool {
    let Ok(entries) = fs::read_dir(dir) else {
        return false;
    };
    entries
        .filter_map(Result::ok)
        .any(|entry| entry.path().join("package.json").is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::aliases::AliasResolution;

    #[test]
    fn loads_paths_from_tsconfig() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(
            tmp.path().join("tsconfig.json"),
            r#"{ "compilerOptions": { "paths": { "@/*": ["./src/*"] } } }"#,
        )
        .expect("write tsconfig");

        let config = load_project_config(tmp.path());
        assert_eq!(
            config.aliases.resolve("@/app"),
            AliasResolution::Resolved("src/app".to_string())
        );
        assert!(!config.is_monorepo);
    }

    #[test]
    fn tolerates_comments_and_trailing_commas() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(
            tmp.path().join("tsconfig.json"),
            r#"{
  // path aliases
  "compilerOptions": {
    "paths": {
      "@lib/*": ["src/lib/*"], /* block */
    },
  },
}"#,
        )
        .expect("write tsconfig");

        let config = load_project_config(tmp.path());
        assert_eq!(
            config.aliases.resolve("@lib/util"),
            AliasResolution::Resolved("src/lib/util".to_string())
        );
    }

    #[test]
    fn falls_back_to_jsconfig_top_level_paths() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(
            tmp.path().join("jsconfig.json"),
            r#"{ "paths": { "~/*": ["app/*"] } }"#,
        )
        .expect("write jsconfig");

        let config = load_project_config(tmp.path());
        assert_eq!(
            config.aliases.resolve("~/router"),
            AliasResolution::Resolved("app/router".to_string())
        );
    }

    #[test]
    fn first_target_of_each_list_wins() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(
            tmp.path().join("tsconfig.json"),
            r#"{ "compilerOptions": { "paths": { "@/*": ["src/*", "fallback/*"] } } }"#,
        )
        .expect("write tsconfig");

        let config = load_project_config(tmp.path());
        assert_eq!(
            config.aliases.resolve("@/x"),
            AliasResolution::Resolved("src/x".to_string())
        );
    }

    #[test]
    fn non_string_and_empty_targets_are_skipped() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(
            tmp.path().join("tsconfig.json"),
            r#"{ "compilerOptions": { "paths": {
                "@bad/*": [42],
                "@none/*": [],
                "@good/*": ["src/good/*"]
            } } }"#,
        )
        .expect("write tsconfig");

        let config = load_project_config(tmp.path());
        assert_eq!(
            config.aliases.resolve("@good/x"),
            AliasResolution::Resolved("src/good/x".to_string())
        );
        assert_eq!(config.aliases.resolve("@bad/x"), AliasResolution::Unmatched);
        assert_eq!(config.aliases.resolve("@none/x"), AliasResolution::Unmatched);
    }

    #[test]
    fn tsconfig_wins_over_jsconfig_when_both_exist() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(
            tmp.path().join("tsconfig.json"),
            r#"{ "compilerOptions": { "paths": { "@/*": ["ts-side/*"] } } }"#,
        )
        .expect("write tsconfig");
        std::fs::write(
            tmp.path().join("jsconfig.json"),
            r#"{ "paths": { "@/*": ["js-side/*"] } }"#,
        )
        .expect("write jsconfig");

        let config = load_project_config(tmp.path());
        assert_eq!(
            config.aliases.resolve("@/x"),
            AliasResolution::Resolved("ts-side/x".to_string())
        );
    }

    #[test]
    fn missing_and_broken_configs_degrade_to_empty() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        assert!(load_project_config(tmp.path()).aliases.is_empty());

        std::fs::write(tmp.path().join("tsconfig.json"), "{ not json").expect("write");
        assert!(load_project_config(tmp.path()).aliases.is_empty());
    }

    #[test]
    fn workspaces_key_marks_monorepo() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(
            tmp.path().join("package.json"),
            r#"{ "name": "root", "workspaces": ["packages/*"] }"#,
        )
        .expect("write package.json");

        assert!(load_project_config(tmp.path()).is_monorepo);
    }

    #[test]
    fn nested_package_manifests_mark_monorepo() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::create_dir_all(tmp.path().join("packages/core")).expect("mkdir");
        std::fs::write(tmp.path().join("packages/core/package.json"), "{}").expect("write");

        assert!(load_project_config(tmp.path()).is_monorepo);
    }

    #[test]
    fn pnpm_workspace_marks_monorepo() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(tmp.path().join("pnpm-workspace.yaml"), "packages:\n  - 'packages/*'\n")
            .expect("write");

        assert!(load_project_config(tmp.path()).is_monorepo);
    }

    #[test]
    fn plain_single_package_is_not_monorepo() {
        let tmp = tempfile::tempdir().expect("tmp dir");
        std::fs::write(tmp.path().join("package.json"), r#"{ "name": "app" }"#).expect("write");
        assert!(!load_project_config(tmp.path()).is_monorepo);
    }
}
