//! Configuration module for photo-dedupe.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Run mode selection
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{
    Config, LoggingConfig, NamingConfig, ScanConfig, StoreConfig, DEFAULT_CONFIG_FILE,
};
pub use modes::RunMode;
pub use validation::validate_config;
