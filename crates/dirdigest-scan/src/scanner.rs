//! Deterministic depth-first directory scanner.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{info, trace, warn};

use dirdigest_core::{
    Decision, Digest, DigestConfig, DigestNode, DigestStats, Entry, ProcessingLog, Reason,
    ScanError, ScanWarning,
};
use dirdigest_filter::FilterEngine;

use crate::ancestry::AncestorStack;

/// Single-threaded scanner that decides every entry it meets.
///
/// Children of each directory are visited in lexicographic order of name,
/// so two scans of an unchanged tree produce identical logs.
#[derive(Debug, Default)]
pub struct DigestScanner;

impl DigestScanner {
    /// Create a new scanner.
    pub fn new() -> Self {
        Self
    }

    /// Scan the configured root and build its digest.
    pub fn scan(&self, config: &DigestConfig) -> Result<Digest, ScanError> {
        config.validate()?;
        let engine = FilterEngine::new(config)?;

        let start = Instant::now();
        let root_path = config
            .root
            .canonicalize()
            .map_err(|e| ScanError::io(&config.root, e))?;

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory { path: root_path });
        }

        info!(
            root = %root_path.display(),
            mode = %engine.mode(),
            "Starting digest scan"
        );

        let children = read_sorted(&root_path).map_err(|e| ScanError::io(&root_path, e))?;

        let mut walker = Walker {
            engine: &engine,
            ignore_errors: config.ignore_errors,
            follow_symlinks: config.follow_symlinks,
            ancestors: AncestorStack::new(root_path.clone()),
            log: ProcessingLog::new(),
            stats: DigestStats::new(),
            warnings: Vec::new(),
        };

        let mut root = DigestNode::root();
        walker.visit_children(&root_path, "", children, &mut root)?;

        let scan_duration = start.elapsed();
        let Walker {
            log,
            stats,
            warnings,
            ..
        } = walker;

        info!(
            included_files = stats.included_files,
            included_folders = stats.included_folders,
            excluded = stats.excluded_items,
            total_size = stats.total_content_size,
            warnings = warnings.len(),
            elapsed_ms = scan_duration.as_millis() as u64,
            "Digest scan complete"
        );

        Ok(Digest::new(
            root,
            root_path,
            engine.mode(),
            log,
            stats,
            warnings,
            scan_duration,
        ))
    }
}

/// Mutable state of one scan.
struct Walker<'a> {
    engine: &'a FilterEngine,
    ignore_errors: bool,
    follow_symlinks: bool,
    ancestors: AncestorStack,
    log: ProcessingLog,
    stats: DigestStats,
    warnings: Vec<ScanWarning>,
}

impl Walker<'_> {
    fn visit_children(
        &mut self,
        dir: &Path,
        rel: &str,
        children: Vec<OsString>,
        node: &mut DigestNode,
    ) -> Result<(), ScanError> {
        for name in children {
            let display = name.to_string_lossy();
            let child_rel = if rel.is_empty() {
                display.into_owned()
            } else {
                format!("{rel}/{display}")
            };
            self.visit_entry(&dir.join(&name), &child_rel, &name, node)?;
        }
        node.sort_children();
        Ok(())
    }

    fn visit_entry(
        &mut self,
        path: &Path,
        rel: &str,
        name: &OsStr,
        parent: &mut DigestNode,
    ) -> Result<(), ScanError> {
        let metadata = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(err) => {
                let warning = ScanWarning::from_io(rel, &err);
                return self.read_error(path, Entry::file(rel, 0), err, warning);
            }
        };
        let file_type = metadata.file_type();

        if file_type.is_symlink() {
            if !self.follow_symlinks {
                self.record(Entry::symlink(rel, false, 0));
                return Ok(());
            }
            let target = match fs::metadata(path) {
                Ok(t) => t,
                Err(err) => {
                    let warning = ScanWarning::broken_symlink(rel, &err);
                    return self.read_error(path, Entry::symlink(rel, false, 0), err, warning);
                }
            };
            if !target.is_dir() {
                let decision = self.record(Entry::symlink(rel, false, target.len()));
                self.add_file(decision, parent);
                return Ok(());
            }

            let canonical = match fs::canonicalize(path) {
                Ok(c) => c,
                Err(err) => {
                    let warning = ScanWarning::from_io(rel, &err);
                    return self.read_error(path, Entry::symlink(rel, true, 0), err, warning);
                }
            };
            let entry = Entry::symlink(rel, true, 0);
            if self.ancestors.contains(&canonical) {
                let warning = ScanWarning::symlink_cycle(rel, &canonical);
                warn!(path = %rel, target = %canonical.display(), "Symlink cycle");
                self.warnings.push(warning);
                let reason = Reason::symlink_cycle(&canonical);
                self.push_decision(Decision::excluded(entry, reason));
                return Ok(());
            }
            return self.descend(path, entry, canonical, parent);
        }

        if file_type.is_dir() {
            let canonical = match self.ancestors.current() {
                Some(current) => current.join(name),
                None => path.to_path_buf(),
            };
            return self.descend(path, Entry::folder(rel), canonical, parent);
        }

        // Regular files and anything else that is not a directory.
        let decision = self.record(Entry::file(rel, metadata.len()));
        self.add_file(decision, parent);
        Ok(())
    }

    /// Decide a directory-like entry and, when included, walk into it.
    fn descend(
        &mut self,
        path: &Path,
        entry: Entry,
        canonical: PathBuf,
        parent: &mut DigestNode,
    ) -> Result<(), ScanError> {
        let decision = self.engine.decide(entry);
        if decision.is_excluded() {
            self.push_decision(decision);
            return Ok(());
        }

        let rel = decision.entry.path.clone();
        let depth = decision.entry.depth;
        let entry = decision.entry.clone();
        let idx = self.push_decision(decision);

        let children = match read_sorted(path) {
            Ok(children) => children,
            Err(err) => {
                if !self.ignore_errors {
                    return Err(ScanError::io(path, err));
                }
                warn!(path = %rel, error = %err, "Cannot list directory");
                self.warnings.push(ScanWarning::from_io(rel.as_str(), &err));
                self.log
                    .replace(idx, Decision::excluded(entry, Reason::read_error(&err)));
                self.stats.record_excluded(depth);
                return Ok(());
            }
        };

        let mut node = DigestNode::new_folder(rel.as_str());
        self.ancestors.push(canonical);
        let result = self.visit_children(path, &rel, children, &mut node);
        self.ancestors.pop();
        result?;

        self.stats.record_folder(depth);
        if let Some(logged) = self.log.get_mut(idx) {
            logged.entry.size = node.size;
        }
        if !node.children.is_empty() {
            parent.size += node.size;
            parent.children.push(node);
        }
        Ok(())
    }

    /// Decide a non-directory entry and log it.
    fn record(&mut self, entry: Entry) -> Decision {
        let decision = self.engine.decide(entry);
        self.push_decision(decision.clone());
        decision
    }

    fn add_file(&mut self, decision: Decision, parent: &mut DigestNode) {
        if decision.is_included() {
            let size = decision.entry.size;
            parent.size += size;
            parent
                .children
                .push(DigestNode::new_file(decision.entry.path, size));
        }
    }

    /// Log a decision and update counters. Included folders are counted once listed.
    fn push_decision(&mut self, decision: Decision) -> usize {
        trace!(
            path = %decision.entry.path,
            verdict = %decision.verdict,
            reason = %decision.reason,
            "Decided"
        );
        let depth = decision.entry.depth;
        if decision.is_excluded() {
            self.stats.record_excluded(depth);
        } else if !decision.entry.is_dir_like() {
            self.stats.record_file(decision.entry.size, depth);
        }
        self.log.push(decision)
    }

    fn read_error(
        &mut self,
        path: &Path,
        entry: Entry,
        err: io::Error,
        warning: ScanWarning,
    ) -> Result<(), ScanError> {
        if !self.ignore_errors {
            return Err(ScanError::io(path, err));
        }
        warn!(path = %entry.path, error = %err, "Read error");
        self.warnings.push(warning);
        let reason = Reason::read_error(&err);
        self.push_decision(Decision::excluded(entry, reason));
        Ok(())
    }
}

/// List a directory's entry names in lexicographic order.
fn read_sorted(dir: &Path) -> io::Result<Vec<OsString>> {
    let mut names = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.file_name()))
        .collect::<io::Result<Vec<_>>>()?;
    names.sort();
    Ok(names)
}
