//! Persisted dedup record.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dedup::store::StoredRecord;
use crate::media::CaptureTime;

/// Metadata for the first-seen file with a given fingerprint.
///
/// Field names match the on-disk store format and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentRecord {
    /// Source path of the first occurrence, lossily converted to UTF-8.
    #[serde(rename = "filepath")]
    pub file_path: String,

    /// Detected MIME type.
    #[serde(rename = "mimetype")]
    pub mime_type: String,

    /// Content fingerprint (lowercase hex MD5).
    pub md5: String,

    /// Output filename, assigned once when the record is created.
    #[serde(rename = "filename", default)]
    pub file_name: String,

    /// Capture time in epoch seconds; stored as `""` when unknown.
    #[serde(rename = "originaldatetime", default, with = "empty_as_none")]
    pub original_date_time: Option<CaptureTime>,

    /// Number of later files seen with the same fingerprint.
    #[serde(default)]
    pub duplicates: u64,

    /// Whether a capture time was extracted from embedded metadata.
    #[serde(rename = "hasexif", default)]
    pub has_exif: bool,
}

impl ContentRecord {
    /// Create a record for a first-seen file.
    pub fn new(
        file_path: &Path,
        mime_type: &str,
        md5: String,
        file_name: String,
        capture_time: Option<CaptureTime>,
    ) -> Self {
        Self {
            file_path: file_path.to_string_lossy().into_owned(),
            mime_type: mime_type.to_string(),
            md5,
            file_name,
            has_exif: capture_time.is_some(),
            original_date_time: capture_time,
            duplicates: 0,
        }
    }
}

impl StoredRecord for ContentRecord {
    fn key(&self) -> &str {
        &self.md5
    }
}

/// Serde helper writing a missing capture time as an empty string.
mod empty_as_none {
    use super::CaptureTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<CaptureTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<CaptureTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(None);
        }
        s.parse::<i64>()
            .map(|secs| Some(CaptureTime::from_epoch(secs)))
            .map_err(serde::de::Error::custom)
    }
}
