//! @acp:module "Version Diff"
//! @acp:summary "Markup stripping and line diffs between document versions"
//! @acp:domain history
//! @acp:layer logic
//!
//! The default diff is positional: line `i` of one body is compared with line
//! `i` of the other, with no alignment. Inserting one line near the top turns
//! every following line into a remove/add pair. [`DiffMode::Lcs`] aligns lines
//! with a longest-common-subsequence diff instead.

use regex::Regex;
use similar::{ChangeTag, TextDiff};
use std::sync::LazyLock;

use super::types::{DiffLine, DiffMode};

static SCRIPT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<(script|style)\b[^>]*>.*?</(script|style)>").unwrap());

static BREAK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</(p|div|h[1-6]|li|tr|ul|ol|table|section|article|blockquote|header|footer)\s*>")
        .unwrap()
});

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Reduce an HTML body to trimmed, non-empty text lines
pub fn strip_markup(body: &str) -> Vec<String> {
    let without_scripts = SCRIPT_PATTERN.replace_all(body, "");
    let with_breaks = BREAK_PATTERN.replace_all(&without_scripts, "$0\n");
    let text = TAG_PATTERN.replace_all(&with_breaks, "");

    decode_entities(&text)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// Plain-text rendering of an HTML body
pub fn to_plain_text(body: &str) -> String {
    strip_markup(body).join("\n")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&amp;", "&")
}

/// Diff two bodies after stripping markup
pub fn diff_bodies(old: &str, new: &str, mode: DiffMode) -> Vec<DiffLine> {
    let old_lines = strip_markup(old);
    let new_lines = strip_markup(new);
    match mode {
        DiffMode::Positional => positional_diff(&old_lines, &new_lines),
        DiffMode::Lcs => lcs_diff(&old_lines, &new_lines),
    }
}

/// Compare lines by index
///
/// A changed line becomes a `Removed` line followed by an `Added` line.
pub fn positional_diff(old: &[String], new: &[String]) -> Vec<DiffLine> {
    let mut lines = Vec::with_capacity(old.len().max(new.len()));

    for i in 0..old.len().max(new.len()) {
        match (old.get(i), new.get(i)) {
            (Some(a), Some(b)) if a.trim() == b.trim() => lines.push(DiffLine::equal(b.as_str())),
            (Some(a), Some(b)) => {
                if !a.trim().is_empty() {
                    lines.push(DiffLine::removed(a.as_str()));
                }
                if !b.trim().is_empty() {
                    lines.push(DiffLine::added(b.as_str()));
                }
            }
            (Some(a), None) => lines.push(DiffLine::removed(a.as_str())),
            (None, Some(b)) => lines.push(DiffLine::added(b.as_str())),
            (None, None) => {}
        }
    }

    lines
}

/// Aligned line diff; replacements still come out as remove then add
pub fn lcs_diff(old: &[String], new: &[String]) -> Vec<DiffLine> {
    let old_refs: Vec<&str> = old.iter().map(String::as_str).collect();
    let new_refs: Vec<&str> = new.iter().map(String::as_str).collect();
    let diff = TextDiff::from_slices(&old_refs, &new_refs);

    diff.iter_all_changes()
        .map(|change| {
            let text = change.value().to_string();
            match change.tag() {
                ChangeTag::Equal => DiffLine::equal(text),
                ChangeTag::Delete => DiffLine::removed(text),
                ChangeTag::Insert => DiffLine::added(text),
            }
        })
        .collect()
}
