//! Output filename derivation.

use std::path::Path;

use crate::error::{Error, Result};
use crate::media::CaptureTime;

/// Placeholder used in place of a capture time that could not be extracted.
pub const DEFAULT_FALLBACK_TOKEN: &str = "0000000000";

/// Build the output filename for a first-seen file.
///
/// Format: `<capture-epoch-or-token>_<md5>_<original base name>`. The same
/// format applies to every content type.
pub fn derive_output_filename(
    capture_time: Option<CaptureTime>,
    md5: &str,
    source: &Path,
    fallback_token: &str,
) -> Result<String> {
    let base = source
        .file_name()
        .map(|name| name.to_string_lossy())
        .ok_or_else(|| {
            Error::InvalidFilename(format!("No file name in path: '{}'", source.display()))
        })?;
    let base = sanitize_filename(&base)?;

    let prefix = match capture_time {
        Some(time) => time.to_string(),
        None => fallback_token.to_string(),
    };

    Ok(format!("{}_{}_{}", prefix, md5, base))
}

/// Make a base name safe to create in the output directory.
///
/// Path separators and control characters become `_`. Empty or
/// whitespace-only names are rejected.
pub fn sanitize_filename(name: &str) -> Result<String> {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Filename cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}
