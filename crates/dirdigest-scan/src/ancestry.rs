//! Ancestor tracking for symlink cycle detection.

use std::path::{Path, PathBuf};

/// Canonical paths of the directories currently being traversed.
///
/// The bottom entry is the scan root; each directory entered pushes its
/// canonical path and pops it when done. A symlink whose canonical target is
/// on the stack would loop forever if followed.
#[derive(Debug)]
pub(crate) struct AncestorStack {
    stack: Vec<PathBuf>,
}

impl AncestorStack {
    /// Create a stack rooted at the canonical scan root.
    pub fn new(root: PathBuf) -> Self {
        Self { stack: vec![root] }
    }

    /// Enter a directory.
    pub fn push(&mut self, canonical: PathBuf) {
        self.stack.push(canonical);
    }

    /// Leave the most recently entered directory.
    pub fn pop(&mut self) -> Option<PathBuf> {
        self.stack.pop()
    }

    /// Canonical path of the directory being listed.
    pub fn current(&self) -> Option<&Path> {
        self.stack.last().map(PathBuf::as_path)
    }

    /// Check if `canonical` is the current directory or one of its ancestors.
    pub fn contains(&self, canonical: &Path) -> bool {
        self.stack.iter().any(|p| p == canonical)
    }
}
