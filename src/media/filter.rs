//! Pre-I/O path filtering.
//!
//! Both checks look only at the path string, so they run before a file is
//! ever opened.

use std::fmt;
use std::path::Path;

/// Prefix used by AppleDouble sidecar files (`._IMG_0001.JPG`).
const SIDECAR_PREFIX: &str = "._";

/// Extensions that are never photos or videos, with the label logged on skip.
const SKIP_EXTENSIONS: &[(&str, &str)] = &[
    ("html", "html"),
    ("htm", "htm"),
    ("doc", "doc"),
    ("db", "db"),
    ("jbf", "jbf"),
    ("dot", "dot"),
    ("txt", "txt"),
    ("class", "class"),
    ("pdd", "pdd"),
    ("xls", "xls"),
    ("eml", "eml"),
    ("wab", "wab"),
    ("ptn", "ptn"),
    ("dmf", "dmf"),
    ("log", "log"),
    ("ds_store", "ds_store"),
    ("ps", "ps"),
    ("mp3", "mp3"),
    ("svn-base", "svn"),
    ("gz", "gzip"),
    ("java", "java"),
    ("xml", "xml"),
    ("jar", "jar"),
    ("test", "test"),
    ("css", "css"),
    ("exe", "exe"),
    ("deb", "deb"),
    ("zip", "zip"),
    ("lisj", "lisj"),
    ("lij", "lij"),
    ("plist", "plist"),
    ("bak", "bak"),
    ("wav", "wav"),
    ("xmp", "xmp"),
    ("rtf", "rtf"),
    ("json", "json"),
    // Motion-JPEG streams confuse the signature table.
    ("mjpg", "mjpg"),
];

/// Why a path was filtered out before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Base name carries the sidecar prefix; holds the base name.
    Sidecar(String),
    /// Extension is on the skip list; holds the extension label.
    Extension(&'static str),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Sidecar(name) => write!(f, "sidecar file '{}'", name),
            SkipReason::Extension(label) => write!(f, "extension '{}'", label),
        }
    }
}

/// Flag files whose base name marks them as metadata sidecars.
pub fn ignore_by_name(path: &Path) -> Option<SkipReason> {
    let name = path.file_name()?.to_string_lossy();
    if name.starts_with(SIDECAR_PREFIX) {
        return Some(SkipReason::Sidecar(name.into_owned()));
    }
    None
}

/// Flag files whose extension is a known non-media type.
pub fn ignore_by_extension(path: &Path) -> Option<SkipReason> {
    let ext = extension_of(path)?;
    SKIP_EXTENSIONS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(&ext))
        .map(|(_, label)| SkipReason::Extension(*label))
}

/// Case-insensitive extension comparison (`ext` without the dot).
pub fn has_extension(path: &Path, ext: &str) -> bool {
    extension_of(path)
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}

/// Text after the last dot of the base name.
///
/// Unlike [`Path::extension`], a leading-dot name such as `.DS_Store` yields
/// `DS_Store`, so those files hit the skip list too.
fn extension_of(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_string_lossy();
    let pos = name.rfind('.')?;
    Some(name[pos + 1..].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sidecar_files_are_ignored() {
        assert_eq!(
            ignore_by_name(Path::new("backups/2004/._foo.jpg")),
            Some(SkipReason::Sidecar("._foo.jpg".to_string()))
        );
        assert_eq!(ignore_by_name(Path::new("backups/2004/foo.jpg")), None);
        // Only the base name matters.
        assert_eq!(ignore_by_name(Path::new("._dir/foo.jpg")), None);
    }

    #[test]
    fn test_skip_extensions_case_insensitive() {
        assert_eq!(
            ignore_by_extension(Path::new("a/b/photos.xml")),
            Some(SkipReason::Extension("xml"))
        );
        assert_eq!(
            ignore_by_extension(Path::new("a/b/NOTES.TXT")),
            Some(SkipReason::Extension("txt"))
        );
        assert_eq!(
            ignore_by_extension(Path::new("archive.tar.GZ")),
            Some(SkipReason::Extension("gzip"))
        );
        assert_eq!(
            ignore_by_extension(Path::new("entries.svn-base")),
            Some(SkipReason::Extension("svn"))
        );
    }

    #[test]
    fn test_media_extensions_pass() {
        for name in ["a.jpg", "b.NEF", "c.heic", "d.png", "e.mov", "noext"] {
            assert_eq!(ignore_by_extension(Path::new(name)), None, "{}", name);
        }
    }

    #[test]
    fn test_dotfile_name_is_its_extension() {
        assert_eq!(
            ignore_by_extension(Path::new("backups/.DS_Store")),
            Some(SkipReason::Extension("ds_store"))
        );
        assert_eq!(extension_of(Path::new("._foo.jpg")).as_deref(), Some("jpg"));
        assert_eq!(extension_of(Path::new("a/noext")), None);
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension(Path::new("DSC_0001.NEF"), "nef"));
        assert!(has_extension(Path::new("dsc_0001.nef"), "NEF"));
        assert!(!has_extension(Path::new("DSC_0001.png"), "nef"));
        assert!(!has_extension(Path::new("nef"), "nef"));
    }
}
