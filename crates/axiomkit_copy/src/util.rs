use std::fs;
use std::path::Path;

use crate::spec::{CopyError, EnumOperandKind};

////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

/// Literal operand identity: raw OS strings compared byte-for-byte.
///
/// `a/b` and `a//b` are different operands here even though [`Path`] equality
/// would treat them as equal.
pub(crate) fn is_same_operand(path_a: &Path, path_b: &Path) -> bool {
    path_a.as_os_str() == path_b.as_os_str()
}

/// Device + inode of a directory, following symlinks.
#[cfg(unix)]
pub(crate) fn derive_dir_identity(path: &Path) -> Option<(u64, u64)> {
    use std::os::unix::fs::MetadataExt;

    fs::metadata(path).ok().map(|stat| (stat.dev(), stat.ino()))
}

#[cfg(not(unix))]
pub(crate) fn derive_dir_identity(_path: &Path) -> Option<(u64, u64)> {
    None
}

/// Refuse to write through a symlink already sitting at `path_entry_dst`.
///
/// The parent is trusted, it was created or checked one level up.
pub(crate) fn validate_destination_entry(
    path_entry_dst: &Path,
    kind: EnumOperandKind,
) -> Result<(), CopyError> {
    match fs::symlink_metadata(path_entry_dst) {
        Ok(meta) if meta.file_type().is_symlink() => Err(CopyError::DestinationCreateFailed {
            kind,
            path: path_entry_dst.to_path_buf(),
            source: std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "destination entry is a symbolic link",
            ),
        }),
        _ => Ok(()),
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Symlinks

/// Recreate the link at `path_src` as a new link at `path_dst` with the same
/// target text.
pub(crate) fn create_symbolic_link(path_src: &Path, path_dst: &Path) -> Result<(), CopyError> {
    let target = fs::read_link(path_src).map_err(|e| CopyError::ReadFailure {
        path: path_src.to_path_buf(),
        source: e,
    })?;

    let map_create_error = |e: std::io::Error| CopyError::DestinationCreateFailed {
        kind: EnumOperandKind::Symlink,
        path: path_dst.to_path_buf(),
        source: e,
    };

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&target, path_dst).map_err(map_create_error)
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        let res = if path_src.is_dir() {
            symlink_dir(&target, path_dst)
        } else {
            symlink_file(&target, path_dst)
        };
        res.map_err(map_create_error)
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = target;
        Err(map_create_error(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "Symbolic links are unsupported on this platform",
        )))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
