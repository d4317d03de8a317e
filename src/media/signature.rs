//! Content type sniffing from leading file bytes.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use crate::error::{Error, Result};
use crate::media::filter::has_extension;

/// Number of leading bytes read from each file; covers every signature below.
pub const PROBE_LEN: usize = 32;

/// MIME types produced by the classifier.
pub mod mime {
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const BMP: &str = "image/bmp";
    pub const TIFF: &str = "image/tiff";
    pub const WEBP: &str = "image/webp";
    pub const HEIC: &str = "image/heic";
    pub const PNG: &str = "image/png";
    pub const NEF: &str = "image/nef";
    pub const AVI: &str = "video/x-msvideo";
    pub const MP4: &str = "video/mp4";
    pub const QUICKTIME: &str = "video/quicktime";
    pub const RTF: &str = "application/rtf";
    pub const MP3: &str = "audio/mpeg";
}

/// Extension that turns a PNG signature match into a Nikon RAW file.
const NEF_EXTENSION: &str = "nef";

/// A byte signature: every `(offset, bytes)` part must match.
struct Signature {
    parts: &'static [(usize, &'static [u8])],
    mime: &'static str,
}

/// Checked in order; the first match wins, so WEBP must precede the
/// generic RIFF entry.
const SIGNATURES: &[Signature] = &[
    Signature {
        parts: &[(0, b"\xFF\xD8\xFF")],
        mime: mime::JPEG,
    },
    Signature {
        parts: &[(0, b"GIF87a")],
        mime: mime::GIF,
    },
    Signature {
        parts: &[(0, b"GIF89a")],
        mime: mime::GIF,
    },
    Signature {
        parts: &[(0, b"BM")],
        mime: mime::BMP,
    },
    Signature {
        parts: &[(0, b"II*\x00")],
        mime: mime::TIFF,
    },
    Signature {
        parts: &[(0, b"MM\x00*")],
        mime: mime::TIFF,
    },
    Signature {
        parts: &[(0, b"RIFF"), (8, b"WEBP")],
        mime: mime::WEBP,
    },
    Signature {
        parts: &[(0, b"RIFF")],
        mime: mime::AVI,
    },
    Signature {
        parts: &[(0, b"{\\rtf1")],
        mime: mime::RTF,
    },
    Signature {
        parts: &[(0, b"ID3")],
        mime: mime::MP3,
    },
    Signature {
        parts: &[(4, b"ftypheic")],
        mime: mime::HEIC,
    },
    Signature {
        parts: &[(4, b"ftypheix")],
        mime: mime::HEIC,
    },
    Signature {
        parts: &[(4, b"ftyphevc")],
        mime: mime::HEIC,
    },
    Signature {
        parts: &[(4, b"ftyphevx")],
        mime: mime::HEIC,
    },
    Signature {
        parts: &[(4, b"ftypisom")],
        mime: mime::MP4,
    },
    Signature {
        parts: &[(4, b"ftypmp41")],
        mime: mime::MP4,
    },
    Signature {
        parts: &[(4, b"ftypmp42")],
        mime: mime::MP4,
    },
    Signature {
        parts: &[(4, b"ftypMSNV")],
        mime: mime::MP4,
    },
    Signature {
        parts: &[(4, b"ftypavc1")],
        mime: mime::MP4,
    },
    Signature {
        parts: &[(4, b"ftypqt  ")],
        mime: mime::QUICKTIME,
    },
    Signature {
        parts: &[(0, b"\x89PNG\r\n\x1A\n")],
        mime: mime::PNG,
    },
];

impl Signature {
    fn matches(&self, prefix: &[u8]) -> bool {
        self.parts.iter().all(|(offset, magic)| {
            prefix
                .get(*offset..*offset + magic.len())
                .is_some_and(|window| window == *magic)
        })
    }
}

/// Outcome of sniffing a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    mime_type: Option<&'static str>,
}

impl Classification {
    /// A classification for a recognized MIME type.
    pub fn recognized(mime_type: &'static str) -> Self {
        Self {
            mime_type: Some(mime_type),
        }
    }

    /// A classification for content matching no known signature.
    pub fn unrecognized() -> Self {
        Self { mime_type: None }
    }

    /// Whether the content matched a known signature.
    pub fn is_recognized(&self) -> bool {
        self.mime_type.is_some()
    }

    /// The detected MIME type, if any.
    pub fn mime_type(&self) -> Option<&'static str> {
        self.mime_type
    }
}

/// Classify a file by its leading bytes.
///
/// Files shorter than [`PROBE_LEN`] are matched against whatever was read;
/// a short read is never an error. Open and read failures are returned.
pub fn classify(path: &Path) -> Result<Classification> {
    let mut buffer = [0u8; PROBE_LEN];
    let read = {
        let mut file = File::open(path).map_err(|source| Error::Classification {
            path: path.to_path_buf(),
            source,
        })?;
        read_prefix(&mut file, &mut buffer).map_err(|source| Error::Classification {
            path: path.to_path_buf(),
            source,
        })?
    };

    Ok(classify_prefix(&buffer[..read], path))
}

/// Classify an already-read prefix; `path` is only consulted for the
/// PNG/NEF tiebreak.
pub fn classify_prefix(prefix: &[u8], path: &Path) -> Classification {
    let Some(signature) = SIGNATURES.iter().find(|sig| sig.matches(prefix)) else {
        return Classification::unrecognized();
    };

    // Nikon NEF files carry the PNG magic number.
    if signature.mime == mime::PNG && has_extension(path, NEF_EXTENSION) {
        return Classification::recognized(mime::NEF);
    }

    Classification::recognized(signature.mime)
}

/// Fill `buf` as far as the reader allows, stopping at EOF.
fn read_prefix<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
