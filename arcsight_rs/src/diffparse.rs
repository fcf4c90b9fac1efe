//! Unified-diff parsing.
//!
//! The VCS collaborator produces unified-diff text between two SHAs; the
//! core consumes only the parsed result: head-side added lines per file,
//! 1-based. Deletions, context, binary markers, and mode/rename metadata
//! are ignored. Output is grouped per file and sorted by normalized path.

use std::collections::BTreeMap;

use crate::types::{AddedLine, DiffHunk};

/// Parse unified-diff text into per-file head-side additions. Files with no
/// added lines contribute no hunk. Unparseable stretches are skipped rather
/// than propagated - a missed line is a tolerable false negative.
pub fn parse_unified_diff(text: &str) -> Vec<DiffHunk> {
    let mut per_file: BTreeMap<String, Vec<AddedLine>> = BTreeMap::new();
    let mut current_file: Option<String> = None;
    let mut new_lineno: Option<u32> = None;

    for line in text.lines() {
        if let Some(marker) = line.strip_prefix("+++ ") {
            current_file = parse_file_marker(marker);
            new_lineno = None;
        } else if let Some(header) = line.strip_prefix("@@") {
            new_lineno = parse_hunk_new_start(header);
        } else if line.starts_with("diff ") {
            current_file = None;
            new_lineno = None;
        } else if is_metadata_line(line) || line.starts_with('\\') {
            // index/mode/rename headers and "\ No newline at end of file".
        } else if let Some(content) = line.strip_prefix('+') {
            if let (Some(file), Some(number)) = (current_file.as_ref(), new_lineno.as_mut()) {
                let content = content.strip_suffix('\r').unwrap_or(content);
                per_file.entry(file.clone()).or_default().push(AddedLine {
                    line_number: *number,
                    content: content.to_string(),
                });
                *number += 1;
            }
        } else if line.starts_with('-') {
            // Old side only; the new-side line counter does not move.
        } else if let Some(number) = new_lineno.as_mut() {
            // Context line inside a hunk.
            *number += 1;
        }
    }

    per_file
        .into_iter()
        .map(|(file_path, added_lines)| DiffHunk { file_path, added_lines })
        .collect()
}

fn is_metadata_line(line: &str) -> bool {
    line.starts_with("--- ")
        || line.starts_with("index ")
        || line.starts_with("new file")
        || line.starts_with("deleted file")
        || line.starts_with("old mode")
        || line.starts_with("new mode")
        || line.starts_with("similarity index")
        || line.starts_with("dissimilarity index")
        || line.starts_with("rename ")
        || line.starts_with("copy ")
        || line.starts_with("Binary files")
        || line.starts_with("GIT binary patch")
}

/// `b/src/App.ts` -> normalized `src/app.ts`; `/dev/null` -> no file.
fn parse_file_marker(marker: &str) -> Option<String> {
    let marker = marker.trim_end();
    if marker == "/dev/null" {
        return None;
    }
    let path = marker.strip_prefix("b/").unwrap_or(marker);
    if path.is_empty() {
        return None;
    }
    Some(path.replace('\\', "/").to_lowercase())
}

/// `@@ -1,2 +3,4 @@` -> 3 (start of the new-side range).
fn parse_hunk_new_start(header: &str) -> Option<u32> {
    let plus = header.find('+')?;
    let tail = &header[plus + 1..];
    let end = tail
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(tail.len());
    tail[..end].parse().ok()
}
