//! Capture-time extraction from embedded EXIF metadata.
//!
//! Decoding the EXIF block itself is delegated to a [`TagSource`]; this
//! module only interprets the decoded tag list.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::media::signature::mime;

/// Tag names carrying the original capture time (JPEG and RAW spellings).
const CAPTURE_TIME_TAGS: &[&str] = &["DateTimeOriginal", "Create Date"];

/// Wire format of EXIF date/time values.
const EXIF_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Value written by cameras whose clock was never set.
const ZERO_TIMESTAMP: &str = "0000:00:00 00:00:00";

/// Why no usable capture time could be extracted.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("no metadata block found: {0}")]
    Missing(String),

    #[error("metadata block is corrupt: {0}")]
    Corrupt(String),

    #[error("metadata present but has no capture time tag")]
    NoTimestamp,

    #[error("capture time is the all-zero sentinel")]
    ZeroTimestamp,

    #[error("capture time '{value}' is not a valid date: {source}")]
    InvalidTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("IO error reading metadata: {0}")]
    Io(#[from] std::io::Error),
}

/// Short label for why naming fell back to the placeholder token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FallbackReason {
    MetadataMissing,
    MetadataCorrupt,
    NoTimestamp,
    ZeroTimestamp,
    InvalidTimestamp,
    ReadFailed,
    /// The content type never carries embedded capture times.
    Unsupported,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FallbackReason::MetadataMissing => "metadata missing",
            FallbackReason::MetadataCorrupt => "metadata corrupt",
            FallbackReason::NoTimestamp => "no capture time tag",
            FallbackReason::ZeroTimestamp => "zero capture time",
            FallbackReason::InvalidTimestamp => "unparsable capture time",
            FallbackReason::ReadFailed => "metadata read failed",
            FallbackReason::Unsupported => "type has no embedded metadata",
        };
        f.write_str(label)
    }
}

impl MetadataError {
    /// Map the error to the reason logged for the fallback filename.
    pub fn fallback_reason(&self) -> FallbackReason {
        match self {
            MetadataError::Missing(_) => FallbackReason::MetadataMissing,
            MetadataError::Corrupt(_) => FallbackReason::MetadataCorrupt,
            MetadataError::NoTimestamp => FallbackReason::NoTimestamp,
            MetadataError::ZeroTimestamp => FallbackReason::ZeroTimestamp,
            MetadataError::InvalidTimestamp { .. } => FallbackReason::InvalidTimestamp,
            MetadataError::Io(_) => FallbackReason::ReadFailed,
        }
    }
}

/// A decoded metadata tag, value already rendered as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataTag {
    pub name: String,
    pub value: String,
}

impl MetadataTag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Decodes the metadata block of a file into a flat tag list.
pub trait TagSource {
    fn read_tags(&self, path: &Path) -> Result<Vec<MetadataTag>, MetadataError>;
}

/// [`TagSource`] backed by the `kamadak-exif` container reader.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExifTagSource;

impl TagSource for ExifTagSource {
    fn read_tags(&self, path: &Path) -> Result<Vec<MetadataTag>, MetadataError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);

        let exif = exif::Reader::new()
            .read_from_container(&mut reader)
            .map_err(|e| match e {
                exif::Error::NotFound(msg) => MetadataError::Missing(msg.to_string()),
                exif::Error::Io(io) => MetadataError::Io(io),
                other => MetadataError::Corrupt(other.to_string()),
            })?;

        Ok(exif
            .fields()
            .map(|field| MetadataTag::new(field.tag.to_string(), render_value(field)))
            .collect())
    }
}

/// Render a tag value as text, keeping ASCII values byte-for-byte so date
/// strings stay in their `YYYY:MM:DD HH:MM:SS` wire format.
fn render_value(field: &exif::Field) -> String {
    match &field.value {
        exif::Value::Ascii(parts) => parts
            .iter()
            .map(|part| String::from_utf8_lossy(part))
            .collect::<Vec<_>>()
            .join(" "),
        _ => field.display_value().to_string(),
    }
}

/// Original capture time, as Unix epoch seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CaptureTime(i64);

impl CaptureTime {
    pub fn from_epoch(seconds: i64) -> Self {
        Self(seconds)
    }

    pub fn epoch_seconds(&self) -> i64 {
        self.0
    }

    /// Parse an EXIF `YYYY:MM:DD HH:MM:SS` value, interpreted as UTC.
    pub fn parse_exif(value: &str) -> Result<Self, MetadataError> {
        let cleaned = value.replace('\0', "");
        if cleaned == ZERO_TIMESTAMP {
            return Err(MetadataError::ZeroTimestamp);
        }

        let parsed = NaiveDateTime::parse_from_str(&cleaned, EXIF_TIME_FORMAT).map_err(
            |source| MetadataError::InvalidTimestamp {
                value: cleaned.clone(),
                source,
            },
        )?;
        Ok(Self(parsed.and_utc().timestamp()))
    }
}

impl fmt::Display for CaptureTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether files of this MIME type can carry an embedded capture time.
pub fn supports_embedded_metadata(mime_type: &str) -> bool {
    matches!(mime_type, mime::JPEG | mime::NEF | mime::HEIC | mime::TIFF)
}

/// Extract the original capture time of a file.
///
/// An all-zero timestamp fails immediately. Otherwise the last capture-time
/// tag in the list wins.
pub fn extract_capture_time(
    source: &dyn TagSource,
    path: &Path,
) -> Result<CaptureTime, MetadataError> {
    let tags = source.read_tags(path)?;

    let mut raw = None;
    for tag in &tags {
        if !CAPTURE_TIME_TAGS.contains(&tag.name.as_str()) {
            continue;
        }
        let value = tag.value.replace('\0', "");
        if value == ZERO_TIMESTAMP {
            return Err(MetadataError::ZeroTimestamp);
        }
        raw = Some(value);
    }

    match raw {
        Some(value) => CaptureTime::parse_exif(&value),
        None => Err(MetadataError::NoTimestamp),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::Mutex;

    /// Canned tag lists keyed by path, for pipeline tests.
    #[derive(Default)]
    pub(crate) struct FakeTagSource {
        tags: HashMap<PathBuf, Vec<MetadataTag>>,
        failures: HashMap<PathBuf, fn() -> MetadataError>,
        pub(crate) calls: Mutex<Vec<PathBuf>>,
    }

    impl FakeTagSource {
        pub(crate) fn with_tags(mut self, path: PathBuf, tags: Vec<MetadataTag>) -> Self {
            self.tags.insert(path, tags);
            self
        }

        pub(crate) fn with_failure(mut self, path: PathBuf, err: fn() -> MetadataError) -> Self {
            self.failures.insert(path, err);
            self
        }
    }

    impl TagSource for FakeTagSource {
        fn read_tags(&self, path: &Path) -> Result<Vec<MetadataTag>, MetadataError> {
            self.calls.lock().unwrap().push(path.to_path_buf());
            if let Some(make_err) = self.failures.get(path) {
                return Err(make_err());
            }
            self.tags
                .get(path)
                .cloned()
                .ok_or_else(|| MetadataError::Missing("no tags".to_string()))
        }
    }

    fn single(name: &str, value: &str) -> FakeTagSource {
        FakeTagSource::default().with_tags(
            PathBuf::from("photo.jpg"),
            vec![
                MetadataTag::new("Make", "NIKON"),
                MetadataTag::new(name, value),
            ],
        )
    }

    fn extract(source: &FakeTagSource) -> Result<CaptureTime, MetadataError> {
        extract_capture_time(source, Path::new("photo.jpg"))
    }

    #[test]
    fn test_date_time_original() {
        let source = single("DateTimeOriginal", "2004:06:12 14:30:05");
        assert_eq!(extract(&source).unwrap().epoch_seconds(), 1_087_050_605);
    }

    #[test]
    fn test_create_date_spelling() {
        let source = single("Create Date", "1970:01:01 00:01:00");
        assert_eq!(extract(&source).unwrap(), CaptureTime::from_epoch(60));
    }

    #[test]
    fn test_trailing_nul_is_stripped() {
        let source = single("DateTimeOriginal", "2001:02:03 04:05:06\0");
        assert_eq!(extract(&source).unwrap().epoch_seconds(), 981_173_106);
    }

    #[test]
    fn test_zero_timestamp_rejected() {
        let source = single("DateTimeOriginal", "0000:00:00 00:00:00");
        let err = extract(&source).unwrap_err();
        assert!(matches!(err, MetadataError::ZeroTimestamp));
        assert_eq!(err.fallback_reason(), FallbackReason::ZeroTimestamp);
    }

    #[test]
    fn test_zero_timestamp_with_nul_rejected() {
        let source = single("DateTimeOriginal", "0000:00:00 00:00:00\0");
        assert!(matches!(
            extract(&source).unwrap_err(),
            MetadataError::ZeroTimestamp
        ));
    }

    #[test]
    fn test_unparsable_timestamp() {
        let source = single("DateTimeOriginal", "2004-06-12T14:30:05");
        let err = extract(&source).unwrap_err();
        assert!(matches!(err, MetadataError::InvalidTimestamp { .. }));
    }

    #[test]
    fn test_no_capture_tag() {
        let source = single("DateTime", "2004:06:12 14:30:05");
        let err = extract(&source).unwrap_err();
        assert!(matches!(err, MetadataError::NoTimestamp));
        assert_eq!(err.fallback_reason(), FallbackReason::NoTimestamp);
    }

    #[test]
    fn test_missing_and_corrupt_are_distinct() {
        let source = FakeTagSource::default()
            .with_failure(PathBuf::from("a.jpg"), || {
                MetadataError::Missing("no exif".into())
            })
            .with_failure(PathBuf::from("b.jpg"), || {
                MetadataError::Corrupt("bad ifd".into())
            });

        let a = extract_capture_time(&source, Path::new("a.jpg")).unwrap_err();
        let b = extract_capture_time(&source, Path::new("b.jpg")).unwrap_err();
        assert_eq!(a.fallback_reason(), FallbackReason::MetadataMissing);
        assert_eq!(b.fallback_reason(), FallbackReason::MetadataCorrupt);
    }

    #[test]
    fn test_last_capture_tag_wins() {
        let source = FakeTagSource::default().with_tags(
            PathBuf::from("photo.jpg"),
            vec![
                MetadataTag::new("DateTimeOriginal", "2000:01:01 00:00:00"),
                MetadataTag::new("Create Date", "2000:01:01 00:00:10"),
            ],
        );
        assert_eq!(extract(&source).unwrap().epoch_seconds(), 946_684_810);
    }

    #[test]
    fn test_supported_types() {
        assert!(supports_embedded_metadata(mime::JPEG));
        assert!(supports_embedded_metadata(mime::NEF));
        assert!(supports_embedded_metadata(mime::HEIC));
        assert!(supports_embedded_metadata(mime::TIFF));
        assert!(!supports_embedded_metadata(mime::PNG));
        assert!(!supports_embedded_metadata(mime::AVI));
    }

    /// JPEG wrapping an APP1 segment around `tiff`.
    fn jpeg_with_app1(tiff: &[u8]) -> Vec<u8> {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(tiff);

        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
        bytes.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        bytes.extend_from_slice(&payload);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    /// Little-endian TIFF block: IFD0 points at an Exif IFD holding a single
    /// DateTimeOriginal (0x9003) ASCII value.
    fn tiff_with_capture_time(value: &[u8; 20]) -> Vec<u8> {
        let mut tiff = Vec::new();
        tiff.extend_from_slice(b"II*\0");
        tiff.extend_from_slice(&8u32.to_le_bytes());

        // IFD0 at 8: ExifIFDPointer -> 26
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0x8769u16.to_le_bytes());
        tiff.extend_from_slice(&4u16.to_le_bytes());
        tiff.extend_from_slice(&1u32.to_le_bytes());
        tiff.extend_from_slice(&26u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());

        // Exif IFD at 26: DateTimeOriginal, 20 ASCII bytes at 44
        tiff.extend_from_slice(&1u16.to_le_bytes());
        tiff.extend_from_slice(&0x9003u16.to_le_bytes());
        tiff.extend_from_slice(&2u16.to_le_bytes());
        tiff.extend_from_slice(&20u32.to_le_bytes());
        tiff.extend_from_slice(&44u32.to_le_bytes());
        tiff.extend_from_slice(&0u32.to_le_bytes());

        tiff.extend_from_slice(value);
        tiff
    }

    fn write_jpeg(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn test_exif_source_reads_capture_time() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_jpeg(
            &dir,
            "dated.jpg",
            &jpeg_with_app1(&tiff_with_capture_time(b"2004:06:12 14:30:05\0")),
        );

        let tags = ExifTagSource.read_tags(&path).unwrap();
        assert!(tags.contains(&MetadataTag::new("DateTimeOriginal", "2004:06:12 14:30:05")));

        let time = extract_capture_time(&ExifTagSource, &path).unwrap();
        assert_eq!(time.epoch_seconds(), 1_087_050_605);
    }

    #[test]
    fn test_exif_source_zero_capture_time() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = write_jpeg(
            &dir,
            "unset-clock.jpg",
            &jpeg_with_app1(&tiff_with_capture_time(b"0000:00:00 00:00:00\0")),
        );

        let err = extract_capture_time(&ExifTagSource, &path).unwrap_err();
        assert!(matches!(err, MetadataError::ZeroTimestamp));
    }

    #[test]
    fn test_exif_source_reports_missing_block() {
        let dir = tempfile::TempDir::new().unwrap();
        // Valid JPEG markers but no APP1/EXIF segment.
        let path = write_jpeg(&dir, "plain.jpg", b"\xFF\xD8\xFF\xDB\x00\x04\x00\x00\xFF\xD9");

        let err = extract_capture_time(&ExifTagSource, &path).unwrap_err();
        assert!(matches!(err, MetadataError::Missing(_)), "{:?}", err);
    }

    #[test]
    fn test_exif_source_reports_corrupt_block() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut tiff = tiff_with_capture_time(b"2004:06:12 14:30:05\0");
        tiff[..2].copy_from_slice(b"XX");
        let path = write_jpeg(&dir, "bad-order.jpg", &jpeg_with_app1(&tiff));

        let err = extract_capture_time(&ExifTagSource, &path).unwrap_err();
        assert!(matches!(err, MetadataError::Corrupt(_)), "{:?}", err);
        assert_eq!(err.fallback_reason(), FallbackReason::MetadataCorrupt);
    }

    #[test]
    fn test_exif_source_missing_file() {
        let err = ExifTagSource
            .read_tags(Path::new("/definitely/not/here.jpg"))
            .unwrap_err();
        assert!(matches!(err, MetadataError::Io(_)));
    }
}
