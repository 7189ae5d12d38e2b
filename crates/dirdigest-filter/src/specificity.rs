//! Pattern specificity ranking.

use std::cmp::Ordering;

use crate::pattern::{Pattern, Segment, components};

/// How closely a pattern describes a particular path.
///
/// Ordered lexicographically by field: deeper anchoring beats explicit
/// naming, which beats suffix proximity, which beats kind affinity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Specificity {
    /// Leading path components matched by the pattern's directory segments.
    pub depth: u32,
    /// The decisive segment contains no wildcard.
    pub explicit: bool,
    /// Trailing dot-separated suffixes shared with the entry name.
    pub suffix: u32,
    /// Directory pattern on a directory, or file pattern on a file.
    pub kind_affinity: bool,
}

/// Rank `pattern` against `path`, or `None` when it does not match.
pub fn specificity(pattern: &Pattern, path: &str, is_dir: bool) -> Option<Specificity> {
    if !pattern.matches(path, is_dir) {
        return None;
    }
    Some(Specificity {
        depth: matching_depth(pattern, path),
        explicit: is_explicit(pattern),
        suffix: if is_dir || pattern.is_dir_pattern() {
            0
        } else {
            shared_suffixes(pattern, path)
        },
        kind_affinity: pattern.is_dir_pattern() == is_dir,
    })
}

/// Order two matches of the same origin: specificity first, then later declaration.
pub fn compare(a: (&Pattern, Specificity), b: (&Pattern, Specificity)) -> Ordering {
    a.1.cmp(&b.1).then_with(|| a.0.index().cmp(&b.0.index()))
}

/// Leading path components matched, in order, by the pattern's directory
/// segments. `**` segments are skipped. Floating patterns are scored the same
/// way, so `src/` reaches depth 1 on `src/main.py`.
fn matching_depth(pattern: &Pattern, path: &str) -> u32 {
    let segments = pattern.segments();
    let dir_part = if pattern.is_dir_pattern() {
        segments
    } else {
        &segments[..segments.len().saturating_sub(1)]
    };

    dir_part
        .iter()
        .filter(|s| !s.is_any_depth())
        .zip(components(path))
        .take_while(|(segment, component)| segment.matches(component))
        .count() as u32
}

fn decisive_segment(pattern: &Pattern) -> Option<&Segment> {
    pattern.segments().iter().rev().find(|s| !s.is_any_depth())
}

fn is_explicit(pattern: &Pattern) -> bool {
    decisive_segment(pattern).is_some_and(|s| !s.text().contains(['*', '?', '[']))
}

fn shared_suffixes(pattern: &Pattern, path: &str) -> u32 {
    let Some(last) = pattern.segments().last() else {
        return 0;
    };
    let name = path.rsplit('/').next().unwrap_or(path);

    suffixes(last.text())
        .zip(suffixes(name))
        .take_while(|(p, n)| p == n)
        .count() as u32
}

/// Dot-separated suffixes after the stem, last first: `a.tar.gz` yields `gz`, `tar`.
fn suffixes(name: &str) -> impl Iterator<Item = &str> {
    let name = name.trim_start_matches('.');
    let tail = name.split_once('.').map_or("", |(_, rest)| rest);
    tail.rsplit('.').filter(|s| !s.is_empty())
}
