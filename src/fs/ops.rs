//! File system primitives used by the scan pipeline.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use tracing::error;

use crate::error::{Error, Result};

/// Permissions given to copied files.
pub const OUTPUT_FILE_MODE: u32 = 0o644;

/// Copy `from` to `to`, replacing any existing file, then set its mode.
///
/// Copying zero bytes is treated as a failure.
pub fn copy_file(from: &Path, to: &Path) -> Result<u64> {
    let copy_error = |message: String| Error::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        message,
    };

    let mut src = File::open(from).map_err(|e| copy_error(format!("open: {}", e)))?;
    let mut dst = File::create(to).map_err(|e| copy_error(format!("create: {}", e)))?;

    let copied = match io::copy(&mut src, &mut dst) {
        Ok(0) => Err(copy_error("no bytes copied".to_string())),
        Ok(written) => Ok(written),
        Err(e) => Err(copy_error(format!("copy: {}", e))),
    };
    drop(dst);

    // A partial or empty target must not look like a copied original.
    let written = match copied {
        Ok(written) => written,
        Err(e) => {
            remove_partial(to);
            return Err(e);
        }
    };

    set_permissions(to, OUTPUT_FILE_MODE)?;
    Ok(written)
}

fn remove_partial(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        error!("Failed to remove partial copy {}: {}", path.display(), e);
    }
}

/// Remove a file, treating "not found" as success.
pub fn delete_if_exists(path: &Path) -> Result<bool> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => {
            error!("Failed to delete {}: {}", path.display(), e);
            Err(Error::Io(e))
        }
    }
}

/// Set unix permission bits; a no-op elsewhere.
#[cfg(unix)]
pub fn set_permissions(path: &Path, mode: u32) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode)).map_err(|e| {
        error!("Failed to chmod {}: {}", path.display(), e);
        Error::Io(e)
    })
}

#[cfg(not(unix))]
pub fn set_permissions(_path: &Path, _mode: u32) -> Result<()> {
    Ok(())
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
