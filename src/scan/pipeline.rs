//! Per-file dedup pipeline and directory walk.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::dedup::{fingerprint, ContentRecord, DedupIndex};
use crate::fs::{copy_file, derive_output_filename};
use crate::media::{
    classify, extract_capture_time, ignore_by_extension, ignore_by_name,
    supports_embedded_metadata, CaptureTime, FallbackReason, TagSource,
};
use crate::scan::events::{EventSink, FailureStage, ScanEvent};
use crate::scan::state::RunStats;

/// Where first-seen files go and how they are named.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Flat directory receiving copies of first-seen files.
    pub output_dir: PathBuf,
    /// Filename prefix used when no capture time is available.
    pub fallback_token: String,
}

/// Final decision for a single file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    SkippedByName,
    SkippedByExtension,
    Unrecognized,
    Failed(FailureStage),
    Duplicate { duplicates: u64 },
    Original { file_name: String },
}

/// Runs files through filter → classify → fingerprint → index → copy.
pub struct Scanner<'a> {
    index: &'a mut DedupIndex,
    tags: &'a dyn TagSource,
    sink: &'a mut dyn EventSink,
    options: ScanOptions,
    stats: RunStats,
}

impl<'a> Scanner<'a> {
    pub fn new(
        index: &'a mut DedupIndex,
        tags: &'a dyn TagSource,
        sink: &'a mut dyn EventSink,
        options: ScanOptions,
    ) -> Self {
        Self {
            index,
            tags,
            sink,
            options,
            stats: RunStats::default(),
        }
    }

    /// Counters for everything processed so far.
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Consume the scanner, returning its counters.
    pub fn into_stats(self) -> RunStats {
        self.stats
    }

    /// Walk `root` recursively and process every non-directory entry.
    ///
    /// Entries are visited in file-name order. Unreadable entries are
    /// reported and skipped; the walk itself never aborts.
    pub fn scan(&mut self, root: &Path) -> &RunStats {
        for entry in WalkDir::new(root).sort_by_file_name() {
            match entry {
                Ok(entry) if entry.file_type().is_dir() => continue,
                Ok(entry) => {
                    self.process_file(entry.path());
                }
                Err(e) => {
                    let path = e.path().map(Path::to_path_buf);
                    self.emit(ScanEvent::WalkError {
                        path,
                        message: e.to_string(),
                    });
                }
            }
        }
        &self.stats
    }

    /// Run one file through the pipeline.
    pub fn process_file(&mut self, path: &Path) -> FileOutcome {
        if let Some(reason) = ignore_by_name(path) {
            self.emit(ScanEvent::SkippedByName {
                path: path.to_path_buf(),
                reason,
            });
            return FileOutcome::SkippedByName;
        }

        if let Some(reason) = ignore_by_extension(path) {
            self.emit(ScanEvent::SkippedByExtension {
                path: path.to_path_buf(),
                reason,
            });
            return FileOutcome::SkippedByExtension;
        }

        let mime_type = match classify(path) {
            Ok(classification) => match classification.mime_type() {
                Some(mime_type) => mime_type,
                None => {
                    self.emit(ScanEvent::Unrecognized {
                        path: path.to_path_buf(),
                    });
                    return FileOutcome::Unrecognized;
                }
            },
            Err(e) => return self.fail(path, FailureStage::Classify, e.to_string()),
        };

        let md5 = match fingerprint(path) {
            Ok(md5) => md5,
            Err(e) => return self.fail(path, FailureStage::Fingerprint, e.to_string()),
        };

        if let Some(duplicates) = self.index.record_duplicate(&md5) {
            let original = self
                .index
                .lookup(&md5)
                .map(|record| record.file_path.clone())
                .unwrap_or_default();
            self.emit(ScanEvent::Duplicate {
                path: path.to_path_buf(),
                md5,
                original,
                duplicates,
            });
            return FileOutcome::Duplicate { duplicates };
        }

        self.process_original(path, mime_type, md5)
    }

    /// Name, copy out and record a first-seen file.
    fn process_original(
        &mut self,
        path: &Path,
        mime_type: &'static str,
        md5: String,
    ) -> FileOutcome {
        let capture_time = self.capture_time(path, mime_type);

        let file_name = match derive_output_filename(
            capture_time,
            &md5,
            path,
            &self.options.fallback_token,
        ) {
            Ok(name) => name,
            Err(e) => return self.fail(path, FailureStage::Naming, e.to_string()),
        };

        let target = self.options.output_dir.join(&file_name);
        tracing::trace!("cp {} {}", path.display(), target.display());
        if let Err(e) = copy_file(path, &target) {
            // Not recorded, so the next encounter of this content retries the copy.
            return self.fail(path, FailureStage::Copy, e.to_string());
        }

        let record = ContentRecord::new(
            path,
            mime_type,
            md5.clone(),
            file_name.clone(),
            capture_time,
        );
        let has_exif = record.has_exif;
        self.index.insert_original(record);

        self.emit(ScanEvent::Original {
            path: path.to_path_buf(),
            md5,
            mime_type,
            file_name: file_name.clone(),
            has_exif,
        });
        FileOutcome::Original { file_name }
    }

    /// Capture time for naming, reporting why when there is none.
    fn capture_time(&mut self, path: &Path, mime_type: &str) -> Option<CaptureTime> {
        if !supports_embedded_metadata(mime_type) {
            self.emit(ScanEvent::TimestampFallback {
                path: path.to_path_buf(),
                reason: FallbackReason::Unsupported,
                detail: None,
            });
            return None;
        }

        match extract_capture_time(self.tags, path) {
            Ok(time) => Some(time),
            Err(e) => {
                self.emit(ScanEvent::TimestampFallback {
                    path: path.to_path_buf(),
                    reason: e.fallback_reason(),
                    detail: Some(e.to_string()),
                });
                None
            }
        }
    }

    fn fail(&mut self, path: &Path, stage: FailureStage, message: String) -> FileOutcome {
        self.emit(ScanEvent::Failed {
            path: path.to_path_buf(),
            stage,
            message,
        });
        FileOutcome::Failed(stage)
    }

    fn emit(&mut self, event: ScanEvent) {
        self.stats.observe(&event);
        self.sink.emit(&event);
    }
}
