//! Per-run counters.

use std::collections::BTreeMap;

use crate::media::FallbackReason;
use crate::scan::events::{FailureStage, ScanEvent};

/// Counters for one scan, built from the same events that get logged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub skipped_by_name: u64,
    pub skipped_by_extension: u64,
    pub unrecognized: u64,
    pub duplicates: u64,
    pub originals: u64,
    pub with_exif: u64,
    pub failures: BTreeMap<FailureStage, u64>,
    pub fallbacks: BTreeMap<FallbackReason, u64>,
    pub walk_errors: u64,
}

impl RunStats {
    /// Update counters for one event.
    pub fn observe(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::SkippedByName { .. } => self.skipped_by_name += 1,
            ScanEvent::SkippedByExtension { .. } => self.skipped_by_extension += 1,
            ScanEvent::Unrecognized { .. } => self.unrecognized += 1,
            ScanEvent::Failed { stage, .. } => *self.failures.entry(*stage).or_default() += 1,
            ScanEvent::Duplicate { .. } => self.duplicates += 1,
            ScanEvent::TimestampFallback { reason, .. } => {
                *self.fallbacks.entry(*reason).or_default() += 1
            }
            ScanEvent::Original { has_exif, .. } => {
                self.originals += 1;
                if *has_exif {
                    self.with_exif += 1;
                }
            }
            ScanEvent::WalkError { .. } => self.walk_errors += 1,
        }
    }

    /// Failures at one stage.
    pub fn failures_at(&self, stage: FailureStage) -> u64 {
        self.failures.get(&stage).copied().unwrap_or(0)
    }

    /// Fallbacks for one reason.
    pub fn fallbacks_for(&self, reason: FallbackReason) -> u64 {
        self.fallbacks.get(&reason).copied().unwrap_or(0)
    }

    pub fn total_failures(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Files that reached a final decision (every non-directory entry).
    pub fn files_processed(&self) -> u64 {
        self.skipped_by_name
            + self.skipped_by_extension
            + self.unrecognized
            + self.duplicates
            + self.originals
            + self.total_failures()
    }

    /// Files skipped before classification.
    pub fn skipped(&self) -> u64 {
        self.skipped_by_name + self.skipped_by_extension
    }
}
