//! Filesystem module.
//!
//! Provides:
//! - Output filename derivation
//! - Copy, delete, chmod and directory primitives

pub mod naming;
pub mod ops;

pub use naming::{derive_output_filename, sanitize_filename, DEFAULT_FALLBACK_TOKEN};
pub use ops::{copy_file, delete_if_exists, ensure_dir, set_permissions};
