//! Core types for dirdigest.
//!
//! This crate provides the data model shared by the filter, the scanner and
//! the command-line tool: configuration and pattern declarations, the
//! operational [`Mode`], per-entry [`Decision`]s, the [`ProcessingLog`] and
//! the included-only [`DigestNode`] tree.

mod config;
mod entry;
mod error;
mod log;
mod mode;
mod tree;

pub use config::{
    DEFAULT_MAX_SIZE, DigestConfig, DigestConfigBuilder, PatternDecl, PatternKind, PatternSource,
    SortKey,
};
pub use entry::{Decision, Entry, EntryKind, MatchedPatterns, Reason, ReasonKind, Verdict};
pub use error::{ConfigError, ScanError, ScanWarning, WarningKind};
pub use log::{ProcessingLog, SortedLog};
pub use mode::Mode;
pub use tree::{Digest, DigestNode, DigestStats, NodeKind};
