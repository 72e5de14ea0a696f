//! Directory creation with missing ancestors.

use std::fs::DirBuilder;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::inspect::classify_path;
use crate::spec::{CopyError, EnumCopySymlinkStrategy, EnumEntryType, EnumOperandKind};

/// Permission bits for created directories (before umask).
pub const N_MODE_DIR_DEFAULT: u32 = 0o755;

/// Ensure `path` and every missing ancestor exist as directories.
///
/// Components are created top-down starting below the nearest existing
/// ancestor. Existing directories are accepted as-is; an existing component that
/// is not a directory fails with [`CopyError::DestinationCreateFailed`].
/// Ancestors may be symlinks to directories, `path` itself may not. An empty
/// path fails.
pub fn ensure_directory(path: &Path) -> Result<(), CopyError> {
    if path.as_os_str().is_empty() {
        return Err(CopyError::DestinationCreateFailed {
            kind: EnumOperandKind::Directory,
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "empty directory path"),
        });
    }

    let mut l_missing = Vec::new();
    for path_ancestor in path.ancestors() {
        if path_ancestor.as_os_str().is_empty() {
            break;
        }
        match classify_path(path_ancestor, derive_rule_component(path, path_ancestor)) {
            EnumEntryType::Directory => break,
            _ => l_missing.push(path_ancestor),
        }
    }

    let builder_dir = derive_dir_builder();
    for path_component in l_missing.into_iter().rev() {
        match builder_dir.create(path_component) {
            Ok(()) => debug!(path = %path_component.display(), "created directory"),
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                let rule_component = derive_rule_component(path, path_component);
                if classify_path(path_component, rule_component) != EnumEntryType::Directory {
                    return Err(CopyError::DestinationCreateFailed {
                        kind: EnumOperandKind::Directory,
                        path: path_component.to_path_buf(),
                        source: e,
                    });
                }
            }
            Err(e) => {
                return Err(CopyError::DestinationCreateFailed {
                    kind: EnumOperandKind::Directory,
                    path: path_component.to_path_buf(),
                    source: e,
                });
            }
        }
    }
    Ok(())
}

/// The leaf is inspected without following links.
fn derive_rule_component(path: &Path, path_component: &Path) -> EnumCopySymlinkStrategy {
    if path_component.as_os_str() == path.as_os_str() {
        EnumCopySymlinkStrategy::Skip
    } else {
        EnumCopySymlinkStrategy::Dereference
    }
}

fn derive_dir_builder() -> DirBuilder {
    #[allow(unused_mut)]
    let mut builder_dir = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder_dir.mode(N_MODE_DIR_DEFAULT);
    }
    builder_dir
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use tempfile::TempDir;

    use super::ensure_directory;
    use crate::spec::{CopyError, EnumCopyOutcome};

    #[test]
    fn ensure_creates_nested_ancestors() {
        let tmp = TempDir::new().expect("tempdir");
        let path_deep = tmp.path().join("a/b/c/d");

        ensure_directory(&path_deep).expect("ensure");
        assert!(path_deep.is_dir());
        assert!(tmp.path().join("a/b").is_dir());
    }

    #[test]
    fn ensure_is_idempotent() {
        let tmp = TempDir::new().expect("tempdir");
        let path_dir = tmp.path().join("x/y");

        ensure_directory(&path_dir).expect("first");
        fs::write(path_dir.join("keep.txt"), "k").expect("write");
        ensure_directory(&path_dir).expect("second");
        ensure_directory(tmp.path()).expect("existing root");

        assert_eq!(
            fs::read_to_string(path_dir.join("keep.txt")).expect("read"),
            "k"
        );
    }

    #[test]
    fn ensure_rejects_file_component() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("blocker");
        fs::write(&path_file, "f").expect("write");

        let err = ensure_directory(&path_file.join("sub")).expect_err("must fail");
        assert_eq!(err.outcome(), EnumCopyOutcome::DestinationCreateFailed);

        let err = ensure_directory(&path_file).expect_err("must fail");
        assert!(matches!(err, CopyError::DestinationCreateFailed { .. }));
        assert!(path_file.is_file());
    }

    #[test]
    fn ensure_rejects_empty_path() {
        let err = ensure_directory(Path::new("")).expect_err("must fail");
        assert_eq!(err.outcome(), EnumCopyOutcome::DestinationCreateFailed);
        assert_eq!(err.to_string(), "failed to make directory ''");
    }

    #[cfg(unix)]
    #[test]
    fn ensure_rejects_symlink_leaf_but_follows_symlink_ancestor() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().expect("tempdir");
        let path_outside = tmp.path().join("outside");
        let path_link = tmp.path().join("link");
        fs::create_dir_all(&path_outside).expect("mkdir");
        symlink(&path_outside, &path_link).expect("symlink");

        let err = ensure_directory(&path_link).expect_err("symlink leaf");
        assert!(matches!(err, CopyError::DestinationCreateFailed { .. }));
        assert!(path_link.is_symlink());

        ensure_directory(&path_link.join("inner")).expect("symlink ancestor");
        assert!(path_outside.join("inner").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn ensure_applies_default_mode() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().expect("tempdir");
        let path_dir = tmp.path().join("moded");
        ensure_directory(&path_dir).expect("ensure");

        let n_mode = fs::metadata(&path_dir).expect("meta").permissions().mode() & 0o777;
        // umask can only clear bits
        assert_eq!(n_mode & !0o755, 0);
        assert_ne!(n_mode & 0o700, 0);
    }
}
