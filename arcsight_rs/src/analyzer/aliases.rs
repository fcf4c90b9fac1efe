//! Alias resolution for non-relative import specifiers.
//!
//! The table maps alias patterns to target patterns (`@/*` -> `src/*`),
//! already normalized by the loader. Resolution is deterministic: patterns
//! are evaluated in lexicographic order of the full alias key. A specifier
//! matching two or more patterns is ambiguous; the caller treats the import
//! as unresolved and raises the file-stats flag.

/// Outcome of resolving one specifier against the alias table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AliasResolution {
    /// Exactly one pattern matched; the substituted target path.
    Resolved(String),
    /// No pattern matched (or the table is empty).
    Unmatched,
    /// Two or more patterns matched.
    Ambiguous,
}

/// Sorted, deduplicated alias table.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: Vec<(String, String)>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from loader output. Entries are sorted by alias key and
    /// exact duplicates collapsed; the loader guarantees key uniqueness.
    pub fn from_entries(mut entries: Vec<(String, String)>) -> Self {
        entries.sort();
        entries.dedup();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// Resolve a specifier. Evaluation order is the lexicographic order of
    /// the alias keys; the first and only match wins, two matches are
    /// ambiguous regardless of specificity.
    pub fn resolve(&self, specifier: &str) -> AliasResolution {
        let mut hit: Option<String> = None;
        for (alias, target) in &self.entries {
            let Some(resolved) = match_pattern(alias, target, specifier) else {
                continue;
            };
            if hit.is_some() {
                return AliasResolution::Ambiguous;
            }
            hit = Some(resolved);
        }
        match hit {
            Some(target) => AliasResolution::Resolved(target),
            None => AliasResolution::Unmatched,
        }
    }
}

/// Match one alias pattern. A `*` captures a non-empty suffix which is
/// substituted into the target's `*`; patterns without `*` match the whole
/// specifier exactly.
fn match_pattern(alias: &str, target: &str, specifier: &str) -> Option<String> {
    match alias.find('*') {
        Some(star) => {
            let prefix = &alias[..star];
            let suffix = &alias[star + 1..];
            if specifier.len() <= prefix.len() + suffix.len() {
                return None;
            }
            if !specifier.starts_with(prefix) || !specifier.ends_with(suffix) {
                return None;
            }
            let captured = &specifier[prefix.len()..specifier.len() - suffix.len()];
            Some(match target.find('*') {
                Some(_) => target.replacen('*', captured, 1),
                None => target.to_string(),
            })
        }
        None => {
            if alias == specifier {
                Some(target.to_string())
            } else {
                None
            }
        }
    }
}
