//! Run mode definitions.

use std::fmt;

/// What a single invocation does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Walk the source tree, copy out first-seen files (default).
    #[default]
    Scan,
    /// Delete the store and log file, then scan from scratch.
    Clean,
    /// Report on the existing store without scanning.
    Stats,
    /// Delete records whose fingerprint contains the pattern.
    Purge(String),
}

impl RunMode {
    /// Whether this mode walks the source tree.
    pub fn scans(&self) -> bool {
        matches!(self, RunMode::Scan | RunMode::Clean)
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Scan => write!(f, "scan"),
            RunMode::Clean => write!(f, "clean"),
            RunMode::Stats => write!(f, "stats"),
            RunMode::Purge(pattern) => write!(f, "purge '{}'", pattern),
        }
    }
}
