//! Pattern matching and the filtering decision engine for dirdigest.
//!
//! For every entry met during traversal the engine picks the most specific
//! include, exclude and default-ignore pattern, then applies the rule table
//! of the run's [`Mode`](dirdigest_core::Mode) to reach a verdict with a
//! reason.

mod defaults;
mod engine;
mod pattern;
mod specificity;

pub use defaults::{DEFAULT_IGNORE_PATTERNS, default_patterns};
pub use engine::{FilterEngine, Limits, PatternMatch, PatternSet, decide};
pub use pattern::{Pattern, PatternOrigin};
pub use specificity::{Specificity, specificity};
