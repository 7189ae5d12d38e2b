//! Built-in ignore patterns.

use dirdigest_core::ConfigError;

use crate::pattern::{Pattern, PatternOrigin};

/// Patterns applied unless default ignoring is turned off.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    // Hidden files and directories
    ".*",
    "**/.DS_Store",
    "**/Thumbs.db",
    "**/.classpath",
    "**/.project",
    "**/.settings/",
    "**/.idea/",
    "**/.vscode/",
    // Version control
    "**/.git/",
    "**/.svn/",
    "**/.hg/",
    "**/.bzr/",
    // Build output
    "**/__pycache__/",
    "**/build/",
    "**/dist/",
    "**/target/",
    "**/out/",
    "**/bin/",
    "**/*.egg-info/",
    "**/.cache/",
    "**/.pytest_cache/",
    "**/.mypy_cache/",
    "**/.ruff_cache/",
    // Dependencies
    "**/node_modules/",
    "**/bower_components/",
    "**/vendor/",
    // Virtual environments
    "**/.venv/",
    "**/venv/",
    "**/ENV/",
    "**/env/",
    "**/.env/",
    // Logs
    "**/*.log",
    "**/*.logs",
    // Temporary and backup files
    "**/*.tmp",
    "**/*.temp",
    "**/*.bak",
    "**/*.swp",
    "**/*~",
    // Compiled code
    "**/*.pyc",
    "**/*.pyo",
    "**/*.pyd",
    "**/*.class",
    "**/*.jar",
    "**/*.war",
    "**/*.ear",
    "**/*.o",
    "**/*.obj",
    "**/*.so",
    "**/*.dylib",
    "**/*.dll",
    "**/*.lib",
    "**/*.a",
    "**/*.exe",
    "**/*.com",
    "**/*.bat",
    "**/*.sh",
    // Media, archives, documents and databases
    "*.jpg",
    "*.jpeg",
    "*.png",
    "*.gif",
    "*.bmp",
    "*.tiff",
    "*.webp",
    "*.mp4",
    "*.avi",
    "*.mov",
    "*.mkv",
    "*.wmv",
    "*.mp3",
    "*.wav",
    "*.flac",
    "*.aac",
    "*.ogg",
    "*.zip",
    "*.tar",
    "*.tar.gz",
    "*.tar.bz2",
    "*.rar",
    "*.7z",
    "*.gz",
    "*.bz2",
    "*.woff",
    "*.woff2",
    "*.ttf",
    "*.otf",
    "*.eot",
    "*.pdf",
    "*.doc",
    "*.docx",
    "*.ppt",
    "*.pptx",
    "*.xls",
    "*.xlsx",
    "*.odt",
    "*.ods",
    "*.odp",
    "*.iso",
    "*.img",
    "*.dmg",
    "*.app",
    "*.msi",
    "*.db",
    "*.sqlite",
    "*.sqlite3",
    "*.mdb",
    // Secrets and lock files
    "**/.env",
    "**/.env.*",
    "**/uv.lock",
    "**/poetry.lock",
    "**/Pipfile.lock",
    "**/yarn.lock",
    "**/package-lock.json",
    "**/composer.lock",
    "**/Gemfile.lock",
    "**/MANIFEST.MF",
];

/// Compile the built-in table.
pub fn default_patterns() -> Result<Vec<Pattern>, ConfigError> {
    DEFAULT_IGNORE_PATTERNS
        .iter()
        .enumerate()
        .map(|(i, raw)| Pattern::new(raw, PatternOrigin::DefaultIgnore, i))
        .collect()
}
