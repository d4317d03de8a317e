//! photo-dedupe - consolidate photo and video backups into one flat folder
//!
//! This library walks a tree of backup directories, identifies every file by
//! the MD5 of its contents, and copies the first instance of each distinct
//! file into an output directory.
//!
//! # Features
//!
//! - Pre-I/O filtering of sidecar files and known non-media extensions
//! - Content-type detection from magic bytes, independent of extension
//! - Capture-time extraction from EXIF, used to name output files
//! - Persistent JSON dedup store with per-fingerprint duplicate counters
//! - Store reports with per-type counts
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use photo_dedupe::{DedupIndex, ExifTagSource, ScanOptions, Scanner, TracingSink};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut index = DedupIndex::open(Path::new("photo-dedupe.db"))?;
//!     let mut sink = TracingSink;
//!     let options = ScanOptions {
//!         output_dir: "originals".into(),
//!         fallback_token: "0000000000".to_string(),
//!     };
//!
//!     let mut scanner = Scanner::new(&mut index, &ExifTagSource, &mut sink, options);
//!     scanner.scan(Path::new("backups"));
//!     drop(scanner);
//!
//!     index.persist()?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod fs;
pub mod media;
pub mod output;
pub mod scan;

// Re-exports for convenience
pub use config::{Config, RunMode};
pub use dedup::{fingerprint, ContentRecord, DedupIndex};
pub use error::{Error, Result};
pub use media::{classify, CaptureTime, ExifTagSource, TagSource};
pub use scan::{EventSink, RunStats, ScanEvent, ScanOptions, Scanner, TracingSink};
