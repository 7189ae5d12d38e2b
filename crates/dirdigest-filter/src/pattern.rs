//! Compiled glob patterns.
//!
//! Patterns follow gitignore conventions: a trailing `/` restricts the
//! pattern to directories (and everything beneath them), a pattern that
//! starts with or contains `/` is anchored at the base directory, and any
//! other pattern floats and matches the entry name at any depth.

use dirdigest_core::ConfigError;
use globset::{GlobBuilder, GlobMatcher};
use strum::Display;

/// Which rule set a pattern belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum PatternOrigin {
    Include,
    Exclude,
    DefaultIgnore,
}

/// One `/`-separated component of a pattern.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    /// `**`: any number of components.
    AnyDepth,
    Glob { text: String, matcher: GlobMatcher },
}

impl Segment {
    fn parse(text: &str, raw: &str) -> Result<Self, ConfigError> {
        if text == "**" {
            return Ok(Segment::AnyDepth);
        }
        Ok(Segment::Glob {
            text: text.to_string(),
            matcher: compile_glob(text, raw)?,
        })
    }

    /// Whether this segment matches one path component.
    pub(crate) fn matches(&self, component: &str) -> bool {
        match self {
            Segment::AnyDepth => true,
            Segment::Glob { matcher, .. } => matcher.is_match(component),
        }
    }

    pub(crate) fn text(&self) -> &str {
        match self {
            Segment::AnyDepth => "**",
            Segment::Glob { text, .. } => text,
        }
    }

    pub(crate) fn is_any_depth(&self) -> bool {
        matches!(self, Segment::AnyDepth)
    }
}

/// A compiled user or default-ignore pattern. Immutable once built.
#[derive(Debug, Clone)]
pub struct Pattern {
    raw: String,
    origin: PatternOrigin,
    index: usize,
    dir_only: bool,
    anchored: bool,
    segments: Vec<Segment>,
    matcher: GlobMatcher,
    /// `<glob>/**` for directory patterns.
    contents: Option<GlobMatcher>,
}

impl Pattern {
    /// Compile `raw` into a pattern of the given origin.
    pub fn new(raw: &str, origin: PatternOrigin, index: usize) -> Result<Self, ConfigError> {
        let mut body = raw.trim();
        let mut rooted = false;
        loop {
            if let Some(rest) = body.strip_prefix("./") {
                body = rest;
            } else if let Some(rest) = body.strip_prefix('/') {
                body = rest;
            } else {
                break;
            }
            rooted = true;
        }

        let dir_only = body.ends_with('/');
        let body = body.trim_end_matches('/');
        if body.is_empty() {
            return Err(ConfigError::EmptyPattern {
                pattern: raw.to_string(),
            });
        }

        let anchored = rooted || body.contains('/');
        let glob = if anchored {
            body.to_string()
        } else {
            format!("**/{body}")
        };

        let segments = body
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| Segment::parse(s, raw))
            .collect::<Result<Vec<_>, _>>()?;

        let matcher = compile_glob(&glob, raw)?;
        let contents = if dir_only {
            Some(compile_glob(&format!("{glob}/**"), raw)?)
        } else {
            None
        };

        Ok(Self {
            raw: raw.to_string(),
            origin,
            index,
            dir_only,
            anchored,
            segments,
            matcher,
            contents,
        })
    }

    /// The pattern text as declared.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn origin(&self) -> PatternOrigin {
        self.origin
    }

    /// Declaration index; a later index wins specificity ties.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Declared with a trailing `/`.
    pub fn is_dir_pattern(&self) -> bool {
        self.dir_only
    }

    pub(crate) fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Check whether a relative path matches.
    ///
    /// Directory patterns match directory-like entries named by the pattern
    /// and every path beneath them.
    pub fn matches(&self, path: &str, is_dir: bool) -> bool {
        if self.dir_only {
            (is_dir && self.matcher.is_match(path))
                || self.contents.as_ref().is_some_and(|c| c.is_match(path))
        } else {
            self.matcher.is_match(path)
        }
    }

    /// Whether some path strictly beneath directory `dir` could match.
    ///
    /// Errs on the side of `true` for floating patterns and `**`.
    pub fn may_match_below(&self, dir: &str) -> bool {
        if !self.anchored {
            return true;
        }
        let components: Vec<&str> = components(dir).collect();
        for (i, component) in components.iter().enumerate() {
            match self.segments.get(i) {
                None => return self.dir_only,
                Some(Segment::AnyDepth) => return true,
                Some(segment) if !segment.matches(component) => return false,
                Some(_) => {}
            }
        }
        self.segments.len() > components.len() || self.dir_only
    }

    /// Whether this pattern names a path strictly beneath `dir` through a
    /// literal prefix, e.g. `docs/api/` reaches into `docs`.
    pub fn reaches_into(&self, dir: &str) -> bool {
        if !self.anchored {
            return false;
        }
        let components: Vec<&str> = components(dir).collect();
        if self.segments.len() <= components.len() {
            return false;
        }
        components
            .iter()
            .zip(&self.segments)
            .all(|(component, segment)| !segment.is_any_depth() && segment.matches(component))
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

pub(crate) fn components(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

fn compile_glob(glob: &str, raw: &str) -> Result<GlobMatcher, ConfigError> {
    GlobBuilder::new(glob)
        .literal_separator(true)
        .backslash_escape(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| ConfigError::InvalidPattern {
            pattern: raw.to_string(),
            message: e.kind().to_string(),
        })
}
