use std::path::{Path, PathBuf};

/// Every error trawl can produce. Per-file variants are caught by the search
/// loop and logged; the rest abort the run with `exit_code()`.
#[derive(Debug)]
pub enum TrawlError {
    InvalidPattern {
        pattern: String,
        reason: String,
    },
    NotFound {
        path: PathBuf,
    },
    PermissionDenied {
        path: PathBuf,
    },
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },
    ParseError {
        path: PathBuf,
        reason: String,
    },
    ConfigError {
        path: PathBuf,
        reason: String,
    },
}

impl std::fmt::Display for TrawlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPattern { pattern, reason } => {
                write!(f, "invalid pattern \"{pattern}\": {reason}")
            }
            Self::NotFound { path } => write!(f, "not found: {}", path.display()),
            Self::PermissionDenied { path } => {
                write!(f, "{} [permission denied]", path.display())
            }
            Self::IoError { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
            Self::ParseError { path, reason } => {
                write!(f, "parse error in {}: {reason}", path.display())
            }
            Self::ConfigError { path, reason } => {
                write!(f, "config error in {}: {reason}", path.display())
            }
        }
    }
}

impl std::error::Error for TrawlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::IoError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl TrawlError {
    /// Classify an I/O error against the path it happened on.
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound {
                path: path.to_path_buf(),
            },
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied {
                path: path.to_path_buf(),
            },
            _ => Self::IoError {
                path: path.to_path_buf(),
                source,
            },
        }
    }

    pub fn parse(path: &Path, reason: impl std::fmt::Display) -> Self {
        Self::ParseError {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NotFound { .. } | Self::IoError { .. } => 2,
            Self::InvalidPattern { .. } | Self::ParseError { .. } | Self::ConfigError { .. } => 3,
            Self::PermissionDenied { .. } => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_kinds_map_to_variants() {
        let path = Path::new("/tmp/x.txt");
        let e = TrawlError::io(path, std::io::Error::from(std::io::ErrorKind::NotFound));
        assert!(matches!(e, TrawlError::NotFound { .. }));
        assert_eq!(e.exit_code(), 2);

        let e = TrawlError::io(
            path,
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(e, TrawlError::PermissionDenied { .. }));
        assert_eq!(e.exit_code(), 4);

        let e = TrawlError::io(path, std::io::Error::other("boom"));
        assert!(matches!(e, TrawlError::IoError { .. }));
        assert!(e.to_string().contains("boom"));
    }

    #[test]
    fn invalid_pattern_message_names_pattern() {
        let e = TrawlError::InvalidPattern {
            pattern: "a(".into(),
            reason: "unclosed group".into(),
        };
        assert_eq!(e.to_string(), "invalid pattern \"a(\": unclosed group");
        assert_eq!(e.exit_code(), 3);
    }
}
