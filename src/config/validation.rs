//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;
use std::path::{Component, Path, PathBuf};

/// Validate the configuration for a scanning run.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_source_dir(&config.scan.source_dir)?;
    validate_output_dir(&config.scan.source_dir, &config.scan.output_dir)?;
    validate_fallback_token(&config.naming.fallback_token)?;
    validate_db_path(&config.store.db_path)?;

    Ok(())
}

/// The source directory must exist and be a directory.
pub fn validate_source_dir(source: &Path) -> Result<()> {
    if !source.is_dir() {
        return Err(Error::MissingDirectory(source.to_path_buf()));
    }
    Ok(())
}

/// The output directory must not be the source directory or lie inside it,
/// otherwise copied files would be walked again.
pub fn validate_output_dir(source: &Path, output: &Path) -> Result<()> {
    if output.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            field: "output_dir".to_string(),
            message: "Output directory cannot be empty".to_string(),
        });
    }

    let source = absolute(source);
    let output = absolute(output);
    if output.starts_with(&source) {
        return Err(Error::ConfigValidation {
            field: "output_dir".to_string(),
            message: format!(
                "Output directory {} must be outside the source directory {}",
                output.display(),
                source.display()
            ),
        });
    }

    Ok(())
}

/// The fallback token becomes a filename prefix: ASCII letters, digits and
/// hyphens only.
pub fn validate_fallback_token(token: &str) -> Result<()> {
    let token_pattern = Regex::new(r"^[0-9A-Za-z-]+$").map_err(|e| Error::ConfigValidation {
        field: "fallback_token".to_string(),
        message: e.to_string(),
    })?;

    if !token_pattern.is_match(token) {
        return Err(Error::ConfigValidation {
            field: "fallback_token".to_string(),
            message: format!(
                "Fallback token '{}' must be non-empty and contain only \
                 letters, digits and hyphens",
                token
            ),
        });
    }

    Ok(())
}

/// The store path must be set.
pub fn validate_db_path(db_path: &Path) -> Result<()> {
    if db_path.as_os_str().is_empty() {
        return Err(Error::ConfigValidation {
            field: "db_path".to_string(),
            message: "Store path cannot be empty".to_string(),
        });
    }
    Ok(())
}

/// Resolve a path for comparison.
///
/// Existing paths are canonicalized. For a path that does not exist yet,
/// `.` and `..` are folded lexically and the nearest existing ancestor is
/// canonicalized, so `../x/backups/out` resolves the same way as the source.
fn absolute(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let joined = match std::env::current_dir() {
        Ok(cwd) if path.is_relative() => cwd.join(path),
        _ => path.to_path_buf(),
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }

    let mut missing = Vec::new();
    let mut existing = normalized.clone();
    loop {
        if let Ok(canonical) = existing.canonicalize() {
            return missing
                .iter()
                .rev()
                .fold(canonical, |acc: PathBuf, part| acc.join(part));
        }
        match existing.file_name() {
            Some(name) => missing.push(name.to_os_string()),
            None => return normalized,
        }
        if !existing.pop() {
            return normalized;
        }
    }
}
