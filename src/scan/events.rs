//! Pipeline decisions and the sinks that observe them.
//!
//! Every skip, fallback and failure the pipeline decides on is emitted as a
//! [`ScanEvent`]. The sink is injected into the scanner, so tests can assert
//! on the exact decisions while the binary logs them through `tracing`.

use std::fmt;
use std::path::PathBuf;

use crate::media::{FallbackReason, SkipReason};

/// Pipeline step at which a file could not be processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FailureStage {
    Classify,
    Fingerprint,
    Naming,
    Copy,
}

impl fmt::Display for FailureStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureStage::Classify => write!(f, "classify"),
            FailureStage::Fingerprint => write!(f, "fingerprint"),
            FailureStage::Naming => write!(f, "naming"),
            FailureStage::Copy => write!(f, "copy"),
        }
    }
}

/// A decision taken by the scan pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Filtered out by base name before any I/O.
    SkippedByName { path: PathBuf, reason: SkipReason },

    /// Filtered out by extension before any I/O.
    SkippedByExtension { path: PathBuf, reason: SkipReason },

    /// Content matched no known signature.
    Unrecognized { path: PathBuf },

    /// Processing stopped for this file; the walk continues.
    Failed {
        path: PathBuf,
        stage: FailureStage,
        message: String,
    },

    /// Fingerprint already known; the record's counter was bumped.
    Duplicate {
        path: PathBuf,
        md5: String,
        original: String,
        duplicates: u64,
    },

    /// No capture time for a first-seen file; the fallback token names it.
    TimestampFallback {
        path: PathBuf,
        reason: FallbackReason,
        detail: Option<String>,
    },

    /// First-seen file copied out and recorded.
    Original {
        path: PathBuf,
        md5: String,
        mime_type: &'static str,
        file_name: String,
        has_exif: bool,
    },

    /// The directory walk could not read an entry.
    WalkError {
        path: Option<PathBuf>,
        message: String,
    },
}

/// Receives pipeline decisions.
pub trait EventSink {
    fn emit(&mut self, event: &ScanEvent);
}

/// Sink that logs each decision through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::SkippedByName { path, reason } => {
                tracing::debug!("Skip by name: {} ({})", path.display(), reason);
            }
            ScanEvent::SkippedByExtension { path, reason } => {
                tracing::debug!("Skip by extension: {} ({})", path.display(), reason);
            }
            ScanEvent::Unrecognized { path } => {
                tracing::debug!("Unrecognized file: {}", path.display());
            }
            ScanEvent::Failed {
                path,
                stage,
                message,
            } => {
                tracing::error!("{} failed for {}: {}", stage, path.display(), message);
            }
            ScanEvent::Duplicate {
                path,
                original,
                duplicates,
                ..
            } => {
                tracing::debug!(
                    "Duplicate: {} (first seen as {}, {} duplicates)",
                    path.display(),
                    original,
                    duplicates
                );
            }
            ScanEvent::TimestampFallback {
                path,
                reason: FallbackReason::Unsupported,
                ..
            } => {
                tracing::debug!("No capture time for type of {}", path.display());
            }
            ScanEvent::TimestampFallback {
                path,
                reason,
                detail,
            } => match detail {
                Some(detail) => {
                    tracing::warn!("Fallback name for {}: {} ({})", path.display(), reason, detail)
                }
                None => tracing::warn!("Fallback name for {}: {}", path.display(), reason),
            },
            ScanEvent::Original {
                path,
                mime_type,
                file_name,
                ..
            } => {
                tracing::debug!("Original: {} [{}] -> {}", path.display(), mime_type, file_name);
            }
            ScanEvent::WalkError { path, message } => match path {
                Some(path) => tracing::error!("Walk failed at {}: {}", path.display(), message),
                None => tracing::error!("Walk failed: {}", message),
            },
        }
    }
}

/// Sink that keeps every event, for assertions.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub events: Vec<ScanEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &ScanEvent) {
        self.events.push(event.clone());
    }
}
