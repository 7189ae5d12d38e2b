//! Digest tree container and statistics.

use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::log::ProcessingLog;
use crate::mode::Mode;

/// Type of a digest tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    File,
    Folder,
}

/// A node of the digest tree. Only included entries become nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DigestNode {
    /// Path relative to the base directory; `.` for the root.
    pub relative_path: CompactString,

    /// File or folder name; `.` for the root.
    pub name: CompactString,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    /// Size in bytes (aggregate of included files for folders).
    pub size: u64,

    /// Children (folders only): folders first, then files, each alphabetical.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DigestNode>,

    /// File content, filled in after the scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Why the content could not be read, filled in after the scan.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_error: Option<String>,
}

impl DigestNode {
    /// Create a file node.
    pub fn new_file(relative_path: impl Into<CompactString>, size: u64) -> Self {
        let relative_path = relative_path.into();
        Self {
            name: last_component(&relative_path),
            relative_path,
            kind: NodeKind::File,
            size,
            children: Vec::new(),
            content: None,
            read_error: None,
        }
    }

    /// Create an empty folder node.
    pub fn new_folder(relative_path: impl Into<CompactString>) -> Self {
        let relative_path = relative_path.into();
        Self {
            name: last_component(&relative_path),
            relative_path,
            kind: NodeKind::Folder,
            size: 0,
            children: Vec::new(),
            content: None,
            read_error: None,
        }
    }

    /// Create the root folder node.
    pub fn root() -> Self {
        Self::new_folder(".")
    }

    pub fn is_dir(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_file(&self) -> bool {
        self.kind == NodeKind::File
    }

    /// Order children folders first, then files, keeping the existing order within each group.
    pub fn sort_children(&mut self) {
        self.children.sort_by_key(|c| c.is_file());
    }

    /// Visit every file node in depth-first order.
    pub fn for_each_file_mut(&mut self, f: &mut impl FnMut(&mut DigestNode)) {
        match self.kind {
            NodeKind::File => f(self),
            NodeKind::Folder => {
                for child in &mut self.children {
                    child.for_each_file_mut(f);
                }
            }
        }
    }

    /// Visit every file node in depth-first order.
    pub fn for_each_file(&self, f: &mut impl FnMut(&DigestNode)) {
        match self.kind {
            NodeKind::File => f(self),
            NodeKind::Folder => {
                for child in &self.children {
                    child.for_each_file(f);
                }
            }
        }
    }
}

fn last_component(path: &str) -> CompactString {
    CompactString::new(path.rsplit('/').next().unwrap_or(path))
}

/// Summary counters for a digest run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DigestStats {
    /// Files with an included verdict.
    pub included_files: u64,
    /// Folders with an included verdict (traversed).
    pub included_folders: u64,
    /// Entries of any kind with an excluded verdict.
    pub excluded_items: u64,
    /// Total size of included files in bytes.
    pub total_content_size: u64,
    /// Deepest entry level visited.
    pub max_depth: u32,
}

impl DigestStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an included file.
    pub fn record_file(&mut self, size: u64, depth: u32) {
        self.included_files += 1;
        self.total_content_size += size;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record a traversed folder.
    pub fn record_folder(&mut self, depth: u32) {
        self.included_folders += 1;
        self.max_depth = self.max_depth.max(depth);
    }

    /// Record an excluded entry.
    pub fn record_excluded(&mut self, depth: u32) {
        self.excluded_items += 1;
        self.max_depth = self.max_depth.max(depth);
    }
}

/// Complete result of a digest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Digest {
    /// Root of the included-only tree.
    pub root: DigestNode,

    /// Canonical base directory.
    pub root_path: PathBuf,

    /// Mode the run was decided under.
    pub mode: Mode,

    /// Every visited entry's decision in traversal order.
    pub log: ProcessingLog,

    /// Summary counters.
    pub stats: DigestStats,

    /// Recoverable problems met during traversal.
    pub warnings: Vec<ScanWarning>,

    /// When the scan was performed.
    pub scanned_at: SystemTime,

    /// Duration of the scan.
    pub scan_duration: Duration,
}

impl Digest {
    /// Create a new digest.
    pub fn new(
        root: DigestNode,
        root_path: PathBuf,
        mode: Mode,
        log: ProcessingLog,
        stats: DigestStats,
        warnings: Vec<ScanWarning>,
        scan_duration: Duration,
    ) -> Self {
        Self {
            root,
            root_path,
            mode,
            log,
            stats,
            warnings,
            scanned_at: SystemTime::now(),
            scan_duration,
        }
    }

    /// Total size of included file content.
    pub fn total_size(&self) -> u64 {
        self.root.size
    }

    /// Check if there were any warnings during the scan.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
