//! Line-level diff of function source text.
//!
//! Two callables are never structurally comparable, but their source text
//! is. Uses the `similar` crate (Myers diff algorithm) to group changed
//! lines into hunks with context, for reporters that want more than the
//! two raw strings.

use serde::Serialize;
use similar::{ChangeTag, TextDiff};

/// The result of diffing two source texts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceDiff {
    pub hunks: Vec<SourceHunk>,
}

impl SourceDiff {
    /// Returns `true` if both texts are identical.
    pub fn is_empty(&self) -> bool {
        self.hunks.is_empty()
    }

    /// Lines present only in the next text.
    pub fn additions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, SourceLine::Added(_)))
            .count()
    }

    /// Lines present only in the previous text.
    pub fn deletions(&self) -> usize {
        self.lines()
            .filter(|l| matches!(l, SourceLine::Removed(_)))
            .count()
    }

    fn lines(&self) -> impl Iterator<Item = &SourceLine> {
        self.hunks.iter().flat_map(|h| &h.lines)
    }
}

/// A contiguous run of changes, with 1-based start lines.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SourceHunk {
    pub previous_start: usize,
    pub next_start: usize,
    pub lines: Vec<SourceLine>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", content = "text", rename_all = "snake_case")]
pub enum SourceLine {
    Context(String),
    Added(String),
    Removed(String),
}

/// Diff `previous` against `next` line by line, keeping `context` lines
/// around each change.
pub fn diff_sources(previous: &str, next: &str, context: usize) -> SourceDiff {
    if previous == next {
        return SourceDiff { hunks: Vec::new() };
    }

    let text_diff = TextDiff::from_lines(previous, next);
    let mut hunks = Vec::new();

    for group in text_diff.grouped_ops(context) {
        let Some(first) = group.first() else {
            continue;
        };
        let mut lines = Vec::new();
        for op in &group {
            for change in text_diff.iter_changes(op) {
                let text = change.value().trim_end_matches('\n').to_string();
                lines.push(match change.tag() {
                    ChangeTag::Equal => SourceLine::Context(text),
                    ChangeTag::Delete => SourceLine::Removed(text),
                    ChangeTag::Insert => SourceLine::Added(text),
                });
            }
        }
        hunks.push(SourceHunk {
            previous_start: first.old_range().start + 1,
            next_start: first.new_range().start + 1,
            lines,
        });
    }

    SourceDiff { hunks }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sources_no_hunks() {
        let diff = diff_sources("() => 1", "() => 1", 3);
        assert!(diff.is_empty());
    }

    #[test]
    fn single_line_sources_replace() {
        let diff = diff_sources("() => a", "() => b", 3);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn multiline_body_change_keeps_context() {
        let old = "function onClick() {\n  setOpen(true);\n  track('open');\n}\n";
        let new = "function onClick() {\n  setOpen(!open);\n  track('open');\n}\n";

        let diff = diff_sources(old, new, 1);
        assert_eq!(diff.hunks.len(), 1);
        let hunk = &diff.hunks[0];
        assert_eq!(hunk.previous_start, 1);
        assert!(hunk.lines.iter().any(|l| matches!(l, SourceLine::Context(_))));
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 1);
    }

    #[test]
    fn appended_line() {
        let diff = diff_sources("a\nb\n", "a\nb\nc\n", 0);
        assert_eq!(diff.additions(), 1);
        assert_eq!(diff.deletions(), 0);
        assert_eq!(diff.hunks[0].next_start, 3);
    }
}
