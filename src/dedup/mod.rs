//! Deduplication module.
//!
//! Provides:
//! - Whole-file MD5 fingerprinting
//! - The persisted record for each distinct fingerprint
//! - A generic keyed store with JSON snapshots
//! - The fingerprint index the scan pipeline uses

pub mod hash;
pub mod index;
pub mod record;
pub mod store;

pub use hash::{fingerprint, is_fingerprint};
pub use index::DedupIndex;
pub use record::ContentRecord;
pub use store::{RecordStore, StoredRecord, Ttl};
