//! Digest configuration types.

use std::path::PathBuf;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ConfigError;

/// Default maximum file size in bytes (300 KiB).
pub const DEFAULT_MAX_SIZE: u64 = 300 * 1024;

/// Whether a user declaration includes or excludes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PatternKind {
    Include,
    Exclude,
}

/// Where a declaration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PatternSource {
    /// Command line; declaration order is known.
    Cli,
    /// Configuration file; declaration order relative to flags is unknown.
    Config,
}

/// A raw pattern declaration as supplied by the user.
///
/// `index` is the declaration position. Collaborators number configuration
/// declarations before command-line ones, so a later index wins ties.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDecl {
    pub pattern: String,
    pub kind: PatternKind,
    pub source: PatternSource,
    pub index: usize,
}

impl PatternDecl {
    /// Create a declaration.
    pub fn new(
        pattern: impl Into<String>,
        kind: PatternKind,
        source: PatternSource,
        index: usize,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            kind,
            source,
            index,
        }
    }

    /// Command-line include at `index`.
    pub fn include(pattern: impl Into<String>, index: usize) -> Self {
        Self::new(pattern, PatternKind::Include, PatternSource::Cli, index)
    }

    /// Command-line exclude at `index`.
    pub fn exclude(pattern: impl Into<String>, index: usize) -> Self {
        Self::new(pattern, PatternKind::Exclude, PatternSource::Cli, index)
    }

    pub fn is_include(&self) -> bool {
        self.kind == PatternKind::Include
    }

    pub fn is_exclude(&self) -> bool {
        self.kind == PatternKind::Exclude
    }
}

/// Key used to order the processing log.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortKey {
    /// Excluded entries before included ones.
    Status,
    /// Folders first by path, then files by descending size.
    Size,
    /// Alphabetical by relative path.
    Path,
}

impl SortKey {
    /// Key sequence used when none is configured.
    pub const DEFAULT_ORDER: [SortKey; 2] = [SortKey::Status, SortKey::Size];
}

/// Configuration for a digest run.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct DigestConfig {
    /// Base directory to digest.
    pub root: PathBuf,

    /// User pattern declarations in declaration order.
    #[builder(default)]
    #[serde(default)]
    pub patterns: Vec<PatternDecl>,

    /// Apply the built-in default ignore patterns.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub default_ignore: bool,

    /// Maximum size in bytes for an included file.
    #[builder(default = "DEFAULT_MAX_SIZE")]
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Maximum number of directory levels to descend (None = unlimited).
    #[builder(default)]
    #[serde(default)]
    pub max_depth: Option<u32>,

    /// Follow symbolic links.
    #[builder(default = "false")]
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Record read errors as excluded entries instead of aborting.
    #[builder(default = "false")]
    #[serde(default)]
    pub ignore_errors: bool,

    /// Processing log sort keys, primary first.
    #[builder(default = "SortKey::DEFAULT_ORDER.to_vec()")]
    #[serde(default = "default_sort_keys")]
    pub sort_keys: Vec<SortKey>,
}

fn default_true() -> bool {
    true
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_SIZE
}

fn default_sort_keys() -> Vec<SortKey> {
    SortKey::DEFAULT_ORDER.to_vec()
}

impl DigestConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        match self.root {
            Some(ref root) if root.as_os_str().is_empty() => {
                return Err("Root path cannot be empty".to_string());
            }
            None => return Err("Root path is required".to_string()),
            _ => {}
        }
        if let Some(ref keys) = self.sort_keys {
            check_sort_keys(keys).map_err(|e| e.to_string())?;
        }
        Ok(())
    }
}

impl DigestConfig {
    /// Create a new config builder.
    pub fn builder() -> DigestConfigBuilder {
        DigestConfigBuilder::default()
    }

    /// Create a config with defaults for digesting a path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            patterns: Vec::new(),
            default_ignore: true,
            max_size: DEFAULT_MAX_SIZE,
            max_depth: None,
            follow_symlinks: false,
            ignore_errors: false,
            sort_keys: SortKey::DEFAULT_ORDER.to_vec(),
        }
    }

    /// Append a command-line include declaration.
    pub fn with_include(mut self, pattern: impl Into<String>) -> Self {
        let index = self.patterns.len();
        self.patterns.push(PatternDecl::include(pattern, index));
        self
    }

    /// Append a command-line exclude declaration.
    pub fn with_exclude(mut self, pattern: impl Into<String>) -> Self {
        let index = self.patterns.len();
        self.patterns.push(PatternDecl::exclude(pattern, index));
        self
    }

    /// Include declarations in declaration order.
    pub fn includes(&self) -> impl Iterator<Item = &PatternDecl> {
        self.patterns.iter().filter(|p| p.is_include())
    }

    /// Exclude declarations in declaration order.
    pub fn excludes(&self) -> impl Iterator<Item = &PatternDecl> {
        self.patterns.iter().filter(|p| p.is_exclude())
    }

    /// Sort keys to apply, falling back to the default order when empty.
    pub fn effective_sort_keys(&self) -> Vec<SortKey> {
        if self.sort_keys.is_empty() {
            SortKey::DEFAULT_ORDER.to_vec()
        } else {
            self.sort_keys.clone()
        }
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid {
                message: "root path cannot be empty".to_string(),
            });
        }
        check_sort_keys(&self.sort_keys)
    }
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

fn check_sort_keys(keys: &[SortKey]) -> Result<(), ConfigError> {
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].contains(key) {
            return Err(ConfigError::DuplicateSortKey { key: *key });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = DigestConfig::builder()
            .root("/home/user/project")
            .max_depth(2u32)
            .follow_symlinks(true)
            .build()
            .unwrap();

        assert_eq!(config.root, PathBuf::from("/home/user/project"));
        assert_eq!(config.max_depth, Some(2));
        assert!(config.follow_symlinks);
        assert!(config.default_ignore);
        assert_eq!(config.max_size, DEFAULT_MAX_SIZE);
        assert_eq!(config.sort_keys, vec![SortKey::Status, SortKey::Size]);
    }

    #[test]
    fn test_builder_requires_root() {
        assert!(DigestConfig::builder().build().is_err());
        assert!(DigestConfig::builder().root("").build().is_err());
    }

    #[test]
    fn test_duplicate_sort_keys_rejected() {
        let result = DigestConfig::builder()
            .root("/tmp")
            .sort_keys(vec![SortKey::Path, SortKey::Path])
            .build();
        assert!(result.is_err());

        let mut config = DigestConfig::new("/tmp");
        config.sort_keys = vec![SortKey::Size, SortKey::Status, SortKey::Size];
        assert_eq!(
            config.validate(),
            Err(ConfigError::DuplicateSortKey { key: SortKey::Size })
        );
    }

    #[test]
    fn test_with_patterns_numbers_declarations() {
        let config = DigestConfig::new(".")
            .with_exclude("*.log")
            .with_include("src/");

        assert_eq!(config.patterns[0].index, 0);
        assert!(config.patterns[0].is_exclude());
        assert_eq!(config.patterns[1].index, 1);
        assert!(config.patterns[1].is_include());
        assert_eq!(config.includes().count(), 1);
        assert_eq!(config.excludes().count(), 1);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("status".parse::<SortKey>().unwrap(), SortKey::Status);
        assert_eq!("PATH".parse::<SortKey>().unwrap(), SortKey::Path);
        assert!("colour".parse::<SortKey>().is_err());
        assert_eq!(SortKey::Size.to_string(), "size");
    }

    #[test]
    fn test_effective_sort_keys_default() {
        let mut config = DigestConfig::new(".");
        config.sort_keys.clear();
        assert_eq!(config.effective_sort_keys(), SortKey::DEFAULT_ORDER.to_vec());
    }
}
