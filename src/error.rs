//! Error types for the photo-dedupe application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Directory does not exist: {}", .0.display())]
    MissingDirectory(PathBuf),

    // File system errors
    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Failed to copy {} to {}: {message}", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        message: String,
    },

    // Per-file pipeline errors
    #[error("Failed to classify {}: {source}", .path.display())]
    Classification {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to fingerprint {}: {source}", .path.display())]
    Fingerprint {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Store errors
    #[error("Store file {} is corrupt: {source}", .path.display())]
    StoreCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Store has no persist path configured")]
    StoreNotPersistent,

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
    pub const STORE_ERROR: i32 = 3;
    pub const SCAN_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
}
