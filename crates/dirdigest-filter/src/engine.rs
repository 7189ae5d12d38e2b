//! Filtering decision engine.

use dirdigest_core::{
    ConfigError, Decision, DigestConfig, Entry, MatchedPatterns, Mode, PatternKind, Reason,
    ReasonKind,
};
use tracing::debug;

use crate::defaults::default_patterns;
use crate::pattern::{Pattern, PatternOrigin};
use crate::specificity::{Specificity, compare, specificity};

/// Traversal limits checked before any pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Files larger than this many bytes are excluded.
    pub max_size: u64,
    /// Directories deeper than this are excluded (None = unlimited).
    pub max_depth: Option<u32>,
    pub follow_symlinks: bool,
}

impl Limits {
    pub fn from_config(config: &DigestConfig) -> Self {
        Self {
            max_size: config.max_size,
            max_depth: config.max_depth,
            follow_symlinks: config.follow_symlinks,
        }
    }
}

/// The most specific pattern of one origin matching an entry.
#[derive(Debug, Clone, Copy)]
pub struct PatternMatch<'a> {
    pub pattern: &'a Pattern,
    pub specificity: Specificity,
}

/// Compiled include, exclude and default-ignore patterns for a run.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    includes: Vec<Pattern>,
    excludes: Vec<Pattern>,
    defaults: Vec<Pattern>,
}

impl PatternSet {
    /// Compile user declarations, adding the built-in table when `default_ignore` is set.
    pub fn compile(
        decls: &[dirdigest_core::PatternDecl],
        default_ignore: bool,
    ) -> Result<Self, ConfigError> {
        let mut set = Self::default();
        for decl in decls {
            match decl.kind {
                PatternKind::Include => set.includes.push(Pattern::new(
                    &decl.pattern,
                    PatternOrigin::Include,
                    decl.index,
                )?),
                PatternKind::Exclude => set.excludes.push(Pattern::new(
                    &decl.pattern,
                    PatternOrigin::Exclude,
                    decl.index,
                )?),
            }
        }
        if default_ignore {
            set.defaults = default_patterns()?;
        }
        debug!(
            includes = set.includes.len(),
            excludes = set.excludes.len(),
            defaults = set.defaults.len(),
            "Compiled pattern set"
        );
        Ok(set)
    }

    pub fn includes(&self) -> &[Pattern] {
        &self.includes
    }

    pub fn excludes(&self) -> &[Pattern] {
        &self.excludes
    }

    pub fn defaults(&self) -> &[Pattern] {
        &self.defaults
    }

    pub fn has_includes(&self) -> bool {
        !self.includes.is_empty()
    }

    /// Most specific matching pattern of an origin; later declarations win ties.
    pub fn most_specific(
        &self,
        origin: PatternOrigin,
        path: &str,
        is_dir: bool,
    ) -> Option<PatternMatch<'_>> {
        let patterns = match origin {
            PatternOrigin::Include => &self.includes,
            PatternOrigin::Exclude => &self.excludes,
            PatternOrigin::DefaultIgnore => &self.defaults,
        };
        patterns
            .iter()
            .filter_map(|p| specificity(p, path, is_dir).map(|s| (p, s)))
            .max_by(|a, b| compare(*a, *b))
            .map(|(pattern, specificity)| PatternMatch {
                pattern,
                specificity,
            })
    }
}

/// Decide the verdict for one entry.
///
/// Pure: the same entry, patterns, mode and limits always give the same
/// decision.
pub fn decide(entry: Entry, patterns: &PatternSet, mode: Mode, limits: &Limits) -> Decision {
    if entry.is_symlink() && !limits.follow_symlinks {
        return Decision::excluded(entry, Reason::symlink_policy());
    }
    if let Some(max) = limits.max_depth {
        if entry.is_dir_like() && entry.depth > max {
            let reason = Reason::exceeds_max_depth(entry.depth, max);
            return Decision::excluded(entry, reason);
        }
    }
    if !entry.is_dir_like() && entry.size > limits.max_size {
        let reason = Reason::exceeds_max_size(entry.size, limits.max_size);
        return Decision::excluded(entry, reason);
    }

    let is_dir = entry.is_dir_like();
    let msi = patterns.most_specific(PatternOrigin::Include, &entry.path, is_dir);
    let mse = patterns.most_specific(PatternOrigin::Exclude, &entry.path, is_dir);
    let msd = patterns.most_specific(PatternOrigin::DefaultIgnore, &entry.path, is_dir);

    let matched = MatchedPatterns {
        include: msi.map(|m| m.pattern.raw().to_string()),
        exclude: mse.map(|m| m.pattern.raw().to_string()),
        default_ignore: msd.map(|m| m.pattern.raw().to_string()),
    };

    let (included, mut reason) = apply_mode(mode, patterns.has_includes(), msi, mse, msd, is_dir);

    let included = if !included && is_dir {
        match refine_directory(&entry.path, reason, patterns, mse, msd, is_dir) {
            Ok(traversal) => {
                reason = traversal;
                true
            }
            Err(refined) => {
                reason = refined;
                false
            }
        }
    } else {
        included
    };

    let decision = if included {
        Decision::included(entry, reason)
    } else {
        Decision::excluded(entry, reason)
    };
    decision.with_matched(matched)
}

fn apply_mode(
    mode: Mode,
    has_includes: bool,
    msi: Option<PatternMatch<'_>>,
    mse: Option<PatternMatch<'_>>,
    msd: Option<PatternMatch<'_>>,
    is_dir: bool,
) -> (bool, Reason) {
    let user_exclude = |m: PatternMatch<'_>| (false, Reason::user_exclude(m.pattern.raw()));
    let default_ignore =
        |m: PatternMatch<'_>| (false, Reason::default_ignore(m.pattern.raw(), is_dir));
    let not_matched = (false, Reason::not_matched_by_include());

    match mode {
        Mode::IncludeAllDefault => match msd {
            Some(d) => default_ignore(d),
            None => (true, Reason::included_by_default()),
        },
        Mode::OnlyInclude => match (msi, msd) {
            (None, _) => not_matched,
            (Some(i), Some(d)) if d.specificity > i.specificity => default_ignore(d),
            (Some(i), _) => (true, Reason::matched_include(i.pattern.raw())),
        },
        Mode::OnlyExclude => match (mse, msd) {
            (Some(x), _) => user_exclude(x),
            (None, Some(d)) => default_ignore(d),
            (None, None) => (true, Reason::included_by_default()),
        },
        Mode::IncludeFirst => {
            let Some(i) = msi else {
                return not_matched;
            };
            match (mse, msd) {
                (Some(x), _) if x.specificity >= i.specificity => user_exclude(x),
                (_, Some(d)) if d.specificity > i.specificity => default_ignore(d),
                _ => (true, Reason::matched_include(i.pattern.raw())),
            }
        }
        Mode::ExcludeFirst => {
            let include = msi.map(|m| m.specificity);
            match (mse, msd, msi) {
                (Some(x), _, _) if include.is_none_or(|i| i <= x.specificity) => user_exclude(x),
                (_, Some(d), _) if include.is_none_or(|i| i < d.specificity) => default_ignore(d),
                (_, _, Some(i)) => (true, Reason::matched_include(i.pattern.raw())),
                (_, _, None) if has_includes => not_matched,
                (_, _, None) => (true, Reason::included_by_default()),
            }
        }
    }
}

/// Give an excluded directory a second look so includes can reach beneath it.
///
/// Returns `Ok` with a traversal reason when the directory must be entered,
/// or `Err` with the final exclusion reason.
fn refine_directory(
    path: &str,
    reason: Reason,
    patterns: &PatternSet,
    mse: Option<PatternMatch<'_>>,
    msd: Option<PatternMatch<'_>>,
    is_dir: bool,
) -> Result<Reason, Reason> {
    let reason = match reason.kind {
        ReasonKind::NotMatchedByInclude => {
            if let Some(x) = mse {
                Reason::user_exclude(x.pattern.raw())
            } else if let Some(d) = msd {
                Reason::default_ignore(d.pattern.raw(), is_dir)
            } else {
                return match patterns.includes.iter().find(|p| p.may_match_below(path)) {
                    Some(p) => Ok(Reason::traversal(format_args!(
                        "include pattern '{}' may match below",
                        p.raw()
                    ))),
                    None => Err(reason),
                };
            }
        }
        ReasonKind::UserExclude | ReasonKind::DefaultIgnore => reason,
        _ => return Err(reason),
    };

    match patterns.includes.iter().find(|p| p.reaches_into(path)) {
        Some(p) => Ok(Reason::traversal(format_args!(
            "include pattern '{}' reaches into it ({})",
            p.raw(),
            reason
        ))),
        None => Err(reason),
    }
}

/// Pattern set, mode and limits bundled for one run.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    patterns: PatternSet,
    mode: Mode,
    limits: Limits,
}

impl FilterEngine {
    /// Resolve the mode and compile every pattern of a configuration.
    pub fn new(config: &DigestConfig) -> Result<Self, ConfigError> {
        let patterns = PatternSet::compile(&config.patterns, config.default_ignore)?;
        let mode = Mode::resolve(&config.patterns);
        debug!(%mode, "Resolved operational mode");
        Ok(Self {
            patterns,
            mode,
            limits: Limits::from_config(config),
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn patterns(&self) -> &PatternSet {
        &self.patterns
    }

    /// Decide the verdict for one entry.
    pub fn decide(&self, entry: Entry) -> Decision {
        decide(entry, &self.patterns, self.mode, &self.limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(config: DigestConfig) -> FilterEngine {
        FilterEngine::new(&config).unwrap()
    }

    #[test]
    fn test_include_all_default() {
        let e = engine(DigestConfig::new("."));
        assert_eq!(e.mode(), Mode::IncludeAllDefault);
        assert!(e.decide(Entry::file("src/main.rs", 10)).is_included());

        let hidden = e.decide(Entry::folder(".secrets"));
        assert!(hidden.is_excluded());
        assert_eq!(hidden.reason.message, "is a hidden directory");

        // A more specific default names itself.
        let git = e.decide(Entry::folder(".git"));
        assert_eq!(git.matched.default_ignore.as_deref(), Some("**/.git/"));
    }

    #[test]
    fn test_only_include_descends_into_directories() {
        let e = engine(DigestConfig::new(".").with_include("*.py"));
        assert_eq!(e.mode(), Mode::OnlyInclude);

        let src = e.decide(Entry::folder("src"));
        assert!(src.is_included());
        assert_eq!(src.reason.kind, ReasonKind::Traversal);

        let txt = e.decide(Entry::file("src/a.txt", 1));
        assert_eq!(txt.reason.kind, ReasonKind::NotMatchedByInclude);

        let modules = e.decide(Entry::folder("node_modules"));
        assert!(modules.is_excluded());
        assert_eq!(modules.reason.kind, ReasonKind::DefaultIgnore);
    }

    #[test]
    fn test_include_first_exclude_ties_win() {
        let e = engine(
            DigestConfig::new(".")
                .with_include("*.md")
                .with_exclude("*.md"),
        );
        assert_eq!(e.mode(), Mode::IncludeFirst);
        let d = e.decide(Entry::file("README.md", 5));
        assert_eq!(d.reason.kind, ReasonKind::UserExclude);
    }

    #[test]
    fn test_exclude_first_include_needs_strictly_more() {
        let e = engine(
            DigestConfig::new(".")
                .with_exclude("*.md")
                .with_include("*.md"),
        );
        assert!(e.decide(Entry::file("README.md", 5)).is_excluded());

        let e = engine(
            DigestConfig::new(".")
                .with_exclude("*.md")
                .with_include("README.md"),
        );
        assert!(e.decide(Entry::file("README.md", 5)).is_included());
    }

    #[test]
    fn test_symlink_policy_comes_first() {
        let e = engine(DigestConfig::new(".").with_include("*"));
        let d = e.decide(Entry::symlink("link", false, 0));
        assert_eq!(d.reason.kind, ReasonKind::SymlinkPolicy);
    }

    #[test]
    fn test_depth_limit_applies_to_directories() {
        let mut config = DigestConfig::new(".");
        config.max_depth = Some(0);
        let e = engine(config);
        assert!(e.decide(Entry::file("top.txt", 1)).is_included());
        let d = e.decide(Entry::folder("src"));
        assert_eq!(d.reason.kind, ReasonKind::Depth);
        assert!(d.reason.message.contains("exceeds max depth"));
    }

    #[test]
    fn test_matched_patterns_recorded() {
        let e = engine(
            DigestConfig::new(".")
                .with_exclude("docs/")
                .with_include("docs/api/"),
        );
        let d = e.decide(Entry::file("docs/api/index.md", 3));
        assert!(d.is_included());
        assert_eq!(d.matched.include.as_deref(), Some("docs/api/"));
        assert_eq!(d.matched.exclude.as_deref(), Some("docs/"));
    }
}
