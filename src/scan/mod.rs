//! Scan module.
//!
//! Provides:
//! - The per-file dedup pipeline and directory walk
//! - Pipeline events and sinks
//! - Per-run counters

pub mod events;
pub mod pipeline;
pub mod state;

pub use events::{EventSink, FailureStage, RecordingSink, ScanEvent, TracingSink};
pub use pipeline::{FileOutcome, ScanOptions, Scanner};
pub use state::RunStats;
