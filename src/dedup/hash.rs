//! Content fingerprinting.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use md5::{Digest, Md5};

use crate::error::{Error, Result};

/// Length of a hex-encoded MD5 digest.
pub const FINGERPRINT_LEN: usize = 32;

/// Compute the MD5 fingerprint of a file's full contents.
///
/// Returns the lowercase hex digest. The whole file is consumed or an error
/// is returned; a partial digest is never produced.
pub fn fingerprint(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|source| Error::Fingerprint {
        path: path.to_path_buf(),
        source,
    })?;

    hash_reader(file).map_err(|source| Error::Fingerprint {
        path: path.to_path_buf(),
        source,
    })
}

/// Compute the MD5 hex digest of everything a reader yields.
fn hash_reader<R: Read>(mut reader: R) -> io::Result<String> {
    let mut hasher = Md5::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

/// Check that a string looks like a fingerprint produced by [`fingerprint`].
pub fn is_fingerprint(value: &str) -> bool {
    value.len() == FINGERPRINT_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Reader that fails after yielding some bytes.
    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "disk gone"));
            }
            self.served = true;
            buf[..4].copy_from_slice(b"data");
            Ok(4)
        }
    }

    #[test]
    fn test_known_digests() {
        let dir = TempDir::new().unwrap();
        let empty = dir.path().join("empty.jpg");
        let abc = dir.path().join("abc.jpg");
        fs::write(&empty, b"").unwrap();
        fs::write(&abc, b"abc").unwrap();

        assert_eq!(
            fingerprint(&empty).unwrap(),
            "d41d8cd98f00b204e9800998ecf8427e"
        );
        assert_eq!(
            fingerprint(&abc).unwrap(),
            "900150983cd24fb0d6963f7d28e17f72"
        );
    }

    #[test]
    fn test_identical_content_same_fingerprint() {
        let dir = TempDir::new().unwrap();
        let content: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();
        let a = dir.path().join("a.jpg");
        let b = dir.path().join("nested_b.NEF");
        fs::write(&a, &content).unwrap();
        fs::write(&b, &content).unwrap();

        let fa = fingerprint(&a).unwrap();
        assert_eq!(fa, fingerprint(&b).unwrap());
        assert!(is_fingerprint(&fa));
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = fingerprint(&dir.path().join("missing.jpg")).unwrap_err();
        assert!(matches!(err, Error::Fingerprint { .. }));
    }

    #[test]
    fn test_read_failure_yields_no_digest() {
        assert!(hash_reader(FailingReader { served: false }).is_err());
    }

    #[test]
    fn test_is_fingerprint() {
        assert!(is_fingerprint("900150983cd24fb0d6963f7d28e17f72"));
        assert!(!is_fingerprint("900150983CD24FB0D6963F7D28E17F72"));
        assert!(!is_fingerprint("abc"));
        assert!(!is_fingerprint("zz0150983cd24fb0d6963f7d28e17f72"));
    }
}
