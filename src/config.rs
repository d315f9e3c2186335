use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::classify::normalize_ext;
use crate::error::TrawlError;

/// Looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "trawl.toml";

// Extensions never opened: media, archives, compiled artifacts. Content in these
// is either not text or better found by a dedicated tool.
const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[
    "7z", "a", "avi", "bin", "bmp", "class", "dll", "dylib", "exe", "flac", "gif", "gz", "ico",
    "iso", "jar", "jpeg", "jpg", "lib", "mkv", "mov", "mp3", "mp4", "o", "obj", "ogg", "png",
    "pyc", "pyo", "rar", "so", "tar", "tgz", "wav", "webm", "webp", "xz", "zip", "zst",
];

// Directories pruned from the walk: VCS internals, dependency and build trees.
const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    ".hg",
    ".svn",
    "node_modules",
    "__pycache__",
    ".venv",
    ".tox",
    ".mypy_cache",
    ".pytest_cache",
    ".idea",
    "target",
];

/// Defaults for a run. Every field is optional in the file; missing fields
/// keep the built-in value, so `skip_dirs = []` disables directory pruning.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub skip_extensions: Vec<String>,
    pub skip_dirs: Vec<String>,
    pub case_sensitive: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            skip_extensions: DEFAULT_SKIP_EXTENSIONS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| (*s).to_string()).collect(),
            case_sensitive: false,
        }
    }
}

impl Config {
    /// Parse a config file. A missing or malformed file is an error.
    pub fn load(path: &Path) -> Result<Self, TrawlError> {
        let raw = fs::read_to_string(path).map_err(|e| TrawlError::ConfigError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::parse(&raw, path)
    }

    fn parse(raw: &str, path: &Path) -> Result<Self, TrawlError> {
        let config: Self = toml::from_str(raw).map_err(|e| TrawlError::ConfigError {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })?;
        Ok(config.normalized())
    }

    /// `explicit` if given, else `./trawl.toml` if present, else built-ins.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, TrawlError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.is_file() {
            Self::load(&local)
        } else {
            Ok(Self::default())
        }
    }

    /// Empty skip lists, for `--no-default-skips`.
    #[must_use]
    pub fn without_skips(self) -> Self {
        Self {
            skip_extensions: Vec::new(),
            skip_dirs: Vec::new(),
            ..self
        }
    }

    /// Append invocation-time skip entries after the configured ones.
    #[must_use]
    pub fn with_extra_skips(mut self, extensions: &[String], dirs: &[String]) -> Self {
        self.skip_extensions.extend(extensions.iter().cloned());
        self.skip_dirs.extend(dirs.iter().cloned());
        self.normalized()
    }

    /// Extensions lower-cased without leading dot; blanks and duplicates removed.
    fn normalized(mut self) -> Self {
        let mut exts: Vec<String> = self
            .skip_extensions
            .iter()
            .map(|e| normalize_ext(e))
            .filter(|e| !e.is_empty())
            .collect();
        exts.sort();
        exts.dedup();
        self.skip_extensions = exts;

        let mut dirs: Vec<String> = self
            .skip_dirs
            .iter()
            .map(|d| d.trim().trim_end_matches('/').to_string())
            .filter(|d| !d.is_empty())
            .collect();
        dirs.sort();
        dirs.dedup();
        self.skip_dirs = dirs;
        self
    }
}
