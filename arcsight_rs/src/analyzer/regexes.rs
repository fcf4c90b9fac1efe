//! Compiled-once regex families for the import scanner.

use std::sync::OnceLock;

use regex::Regex;

fn regex(pattern: &str) -> Regex {
    Regex::new(pattern).expect("valid regex literal")
}

/// Start of an ES import statement. Matched against a single (comment-
/// stripped) line; the remainder after the keyword decides the form.
pub(crate) fn regex_import_stmt() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^\s*import\b"#))
}

/// Type-only imports: `import type ...` and `import { type ... }`.
/// These produce no edge and do not count as imports.
pub(crate) fn regex_type_only_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^\s*import\s+type\b|^\s*import\s*\{\s*type\b"#))
}

/// ES `import ... from '...'` with the specifier possibly on a later line
/// of the window. Lazy matching finds the first `from`-literal pair.
pub(crate) fn regex_es_import_from() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?s)\bimport\b.*?\bfrom\s*['"]([^'"]+)['"]"#))
}

/// Side-effect import: `import './x'` - the quote follows the keyword
/// directly (possibly across a line break inside the window).
pub(crate) fn regex_side_effect_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\bimport\s*['"]([^'"]+)['"]"#))
}

/// A `require(` call site. The literal is extracted separately so that
/// template-literal and identifier arguments stay invisible.
pub(crate) fn regex_require_open() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"\brequire\s*\("#))
}

/// Static string argument of a `require(...)`, anchored at the call site.
pub(crate) fn regex_require_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"^require\s*\(\s*['"]([^'"]+)['"]"#))
}

/// Any quoted string literal; used when scanning diff lines for the
/// specifier that introduced a root-cause edge.
pub(crate) fn regex_string_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"['"]([^'"]+)['"]"#))
}
