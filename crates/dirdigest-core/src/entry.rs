//! Visited entries and the decisions made about them.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Type of a visited filesystem object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntryKind {
    File,
    Folder,
    Symlink,
}

/// One filesystem object visited during traversal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Slash-separated path relative to the base directory.
    pub path: CompactString,
    pub kind: EntryKind,
    /// File size, or the aggregated size of included descendants for folders.
    pub size: u64,
    /// Number of path components; direct children of the base directory are at 1.
    pub depth: u32,
    /// Folders, and symlinks whose target is a directory.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub leads_to_dir: bool,
}

impl Entry {
    fn new(path: impl Into<CompactString>, kind: EntryKind, size: u64, leads_to_dir: bool) -> Self {
        let path = path.into();
        let depth = path.split('/').filter(|s| !s.is_empty()).count() as u32;
        Self {
            path,
            kind,
            size,
            depth,
            leads_to_dir,
        }
    }

    /// A regular file.
    pub fn file(path: impl Into<CompactString>, size: u64) -> Self {
        Self::new(path, EntryKind::File, size, false)
    }

    /// A directory; its size is filled in after its children are resolved.
    pub fn folder(path: impl Into<CompactString>) -> Self {
        Self::new(path, EntryKind::Folder, 0, true)
    }

    /// A symbolic link. `leads_to_dir` and `size` describe the target when it was resolved.
    pub fn symlink(path: impl Into<CompactString>, leads_to_dir: bool, size: u64) -> Self {
        Self::new(path, EntryKind::Symlink, size, leads_to_dir)
    }

    /// Final path component.
    pub fn name(&self) -> &str {
        self.path.rsplit('/').next().unwrap_or(&self.path)
    }

    /// Whether patterns and limits treat this entry as a directory.
    pub fn is_dir_like(&self) -> bool {
        self.leads_to_dir
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }
}

/// Inclusion verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Verdict {
    Included,
    Excluded,
}

/// Category of the rule that produced a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ReasonKind {
    #[strum(serialize = "default ignore")]
    DefaultIgnore,
    #[strum(serialize = "user exclude")]
    UserExclude,
    #[strum(serialize = "not matched by include")]
    NotMatchedByInclude,
    #[strum(serialize = "size")]
    Size,
    #[strum(serialize = "depth")]
    Depth,
    #[strum(serialize = "symlink policy")]
    SymlinkPolicy,
    #[strum(serialize = "symlink cycle")]
    SymlinkCycle,
    #[strum(serialize = "read error")]
    ReadError,
    #[strum(serialize = "matched include")]
    MatchedInclude,
    #[strum(serialize = "default")]
    Default,
    #[strum(serialize = "traversal")]
    Traversal,
}

impl ReasonKind {
    /// Whether this category only ever accompanies an excluded verdict.
    pub fn is_exclusion(self) -> bool {
        !matches!(
            self,
            ReasonKind::MatchedInclude | ReasonKind::Default | ReasonKind::Traversal
        )
    }
}

/// Explanation attached to a verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reason {
    pub kind: ReasonKind,
    pub message: String,
}

impl Reason {
    pub fn new(kind: ReasonKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Matched a built-in ignore pattern. The catch-all hidden pattern reads as such.
    pub fn default_ignore(pattern: &str, is_dir: bool) -> Self {
        let message = match (pattern, is_dir) {
            (".*", false) => "is a hidden file".to_string(),
            (".*", true) => "is a hidden directory".to_string(),
            _ => format!("matches default ignore pattern '{pattern}'"),
        };
        Self::new(ReasonKind::DefaultIgnore, message)
    }

    pub fn user_exclude(pattern: &str) -> Self {
        Self::new(
            ReasonKind::UserExclude,
            format!("matches user exclude pattern '{pattern}'"),
        )
    }

    pub fn not_matched_by_include() -> Self {
        Self::new(
            ReasonKind::NotMatchedByInclude,
            "not matched by include patterns",
        )
    }

    pub fn exceeds_max_size(size: u64, max: u64) -> Self {
        Self::new(
            ReasonKind::Size,
            format!("exceeds max size ({size} > {max} bytes)"),
        )
    }

    pub fn exceeds_max_depth(depth: u32, max: u32) -> Self {
        Self::new(
            ReasonKind::Depth,
            format!("exceeds max depth ({depth} > {max})"),
        )
    }

    pub fn symlink_policy() -> Self {
        Self::new(
            ReasonKind::SymlinkPolicy,
            "symlink policy: following symlinks is disabled",
        )
    }

    pub fn symlink_cycle(target: &std::path::Path) -> Self {
        Self::new(
            ReasonKind::SymlinkCycle,
            format!("symlink cycle: {} is an ancestor", target.display()),
        )
    }

    pub fn read_error(error: &std::io::Error) -> Self {
        Self::new(ReasonKind::ReadError, format!("read error: {error}"))
    }

    pub fn matched_include(pattern: &str) -> Self {
        Self::new(
            ReasonKind::MatchedInclude,
            format!("matches include pattern '{pattern}'"),
        )
    }

    pub fn included_by_default() -> Self {
        Self::new(ReasonKind::Default, "included by default")
    }

    pub fn traversal(detail: impl fmt::Display) -> Self {
        Self::new(ReasonKind::Traversal, format!("traversed: {detail}"))
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Most specific pattern of each origin that matched an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchedPatterns {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_ignore: Option<String>,
}

/// Verdict for one visited entry, produced exactly once per entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    pub entry: Entry,
    pub verdict: Verdict,
    pub reason: Reason,
    #[serde(default)]
    pub matched: MatchedPatterns,
}

impl Decision {
    pub fn included(entry: Entry, reason: Reason) -> Self {
        debug_assert!(!reason.kind.is_exclusion(), "{} cannot include", reason.kind);
        Self {
            entry,
            verdict: Verdict::Included,
            reason,
            matched: MatchedPatterns::default(),
        }
    }

    pub fn excluded(entry: Entry, reason: Reason) -> Self {
        debug_assert!(reason.kind.is_exclusion(), "{} cannot exclude", reason.kind);
        Self {
            entry,
            verdict: Verdict::Excluded,
            reason,
            matched: MatchedPatterns::default(),
        }
    }

    /// Attach the audit trail of matched patterns.
    pub fn with_matched(mut self, matched: MatchedPatterns) -> Self {
        self.matched = matched;
        self
    }

    pub fn is_included(&self) -> bool {
        self.verdict == Verdict::Included
    }

    pub fn is_excluded(&self) -> bool {
        self.verdict == Verdict::Excluded
    }

    pub fn path(&self) -> &str {
        &self.entry.path
    }

    pub fn is_folder(&self) -> bool {
        self.entry.is_dir_like()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_depth_from_path() {
        assert_eq!(Entry::file("a.txt", 3).depth, 1);
        assert_eq!(Entry::folder("src/utils").depth, 2);
        assert_eq!(Entry::file("src/utils/mod.rs", 0).name(), "mod.rs");
    }

    #[test]
    fn test_entry_dir_like() {
        assert!(Entry::folder("src").is_dir_like());
        assert!(!Entry::file("a.txt", 1).is_dir_like());
        assert!(Entry::symlink("link", true, 0).is_dir_like());
        assert!(Entry::symlink("link", false, 10).is_symlink());
    }

    #[test]
    fn test_reason_kind_categories() {
        assert_eq!(ReasonKind::NotMatchedByInclude.to_string(), "not matched by include");
        assert_eq!(ReasonKind::SymlinkPolicy.to_string(), "symlink policy");
        assert!(ReasonKind::UserExclude.is_exclusion());
        assert!(!ReasonKind::Traversal.is_exclusion());
    }

    #[test]
    fn test_hidden_reason() {
        assert_eq!(Reason::default_ignore(".*", false).message, "is a hidden file");
        assert_eq!(Reason::default_ignore(".*", true).message, "is a hidden directory");
        assert!(Reason::default_ignore("**/build/", true)
            .message
            .contains("default ignore pattern"));
    }

    #[test]
    fn test_decision_constructors() {
        let d = Decision::excluded(Entry::file("big.bin", 10), Reason::exceeds_max_size(10, 5));
        assert!(d.is_excluded());
        assert!(d.reason.message.contains("exceeds max size"));
        assert_eq!(d.path(), "big.bin");
    }
}
