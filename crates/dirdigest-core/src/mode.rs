//! Operational mode selection.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::config::{PatternDecl, PatternKind, PatternSource};

/// How include, exclude and default-ignore patterns interact for a run.
///
/// Computed once from the full list of declarations and never changed
/// during traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Mode {
    /// No include and no exclude patterns.
    IncludeAllDefault,
    /// Include patterns only.
    OnlyInclude,
    /// Exclude patterns only.
    OnlyExclude,
    /// Both kinds, an include flag was declared first.
    IncludeFirst,
    /// Both kinds, an exclude flag was declared first or the order is unknown.
    ExcludeFirst,
}

impl Mode {
    /// Select the mode for a set of declarations.
    ///
    /// Only command-line declarations carry a usable order. A kind that is
    /// declared solely in configuration counts as coming after every flag, so
    /// when neither kind appears on the command line the result is
    /// [`Mode::ExcludeFirst`].
    pub fn resolve(decls: &[PatternDecl]) -> Self {
        let has_include = decls.iter().any(|d| d.kind == PatternKind::Include);
        let has_exclude = decls.iter().any(|d| d.kind == PatternKind::Exclude);

        match (has_include, has_exclude) {
            (false, false) => Mode::IncludeAllDefault,
            (true, false) => Mode::OnlyInclude,
            (false, true) => Mode::OnlyExclude,
            (true, true) => {
                let first_include = first_cli_index(decls, PatternKind::Include);
                let first_exclude = first_cli_index(decls, PatternKind::Exclude);
                match (first_include, first_exclude) {
                    (Some(i), Some(x)) if i < x => Mode::IncludeFirst,
                    (Some(_), None) => Mode::IncludeFirst,
                    _ => Mode::ExcludeFirst,
                }
            }
        }
    }
}

fn first_cli_index(decls: &[PatternDecl], kind: PatternKind) -> Option<usize> {
    decls
        .iter()
        .filter(|d| d.kind == kind && d.source == PatternSource::Cli)
        .map(|d| d.index)
        .min()
}
