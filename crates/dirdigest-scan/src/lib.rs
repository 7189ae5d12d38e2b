//! Directory traversal engine for dirdigest.
//!
//! # Overview
//!
//! `dirdigest-scan` walks a directory tree depth-first, asks the filter
//! engine for a verdict on every entry it meets and builds two results:
//!
//! - the **processing log**, one decision per visited entry in traversal order
//! - the **digest tree**, holding only included files and the folders leading to them
//!
//! Traversal is single-threaded and sorted, so repeated scans of an unchanged
//! tree give identical results.
//!
//! # Example
//!
//! ```rust,no_run
//! use dirdigest_scan::{DigestConfig, DigestScanner};
//!
//! let config = DigestConfig::new("/path/to/project").with_include("*.rs");
//! let digest = DigestScanner::new().scan(&config).unwrap();
//!
//! println!("Included files: {}", digest.stats.included_files);
//! println!("Total size: {} bytes", digest.total_size());
//! ```

mod ancestry;
mod scanner;

pub use scanner::DigestScanner;

// Re-export core types for convenience
pub use dirdigest_core::{
    ConfigError, Decision, Digest, DigestConfig, DigestConfigBuilder, DigestNode, DigestStats,
    Entry, EntryKind, Mode, NodeKind, PatternDecl, PatternKind, PatternSource, ProcessingLog,
    Reason, ReasonKind, ScanError, ScanWarning, SortKey, SortedLog, Verdict, WarningKind,
};
