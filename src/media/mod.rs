//! Media module for content classification.
//!
//! Provides:
//! - Path filtering before any I/O
//! - Byte-signature content sniffing
//! - Capture-time extraction from EXIF metadata

pub mod filter;
pub mod metadata;
pub mod signature;

pub use filter::{ignore_by_extension, ignore_by_name, SkipReason};
pub use metadata::{
    extract_capture_time, supports_embedded_metadata, CaptureTime, ExifTagSource,
    FallbackReason, MetadataError, MetadataTag, TagSource,
};
pub use signature::{classify, mime, Classification};
