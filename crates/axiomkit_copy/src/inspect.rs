//! Path classification.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::spec::{EnumCopySymlinkStrategy, EnumEntryType};

/// Classify `path` as regular file, directory, other, or missing.
///
/// Symlinks are reported as [`EnumEntryType::Other`] unless `rule_symlink` is
/// [`EnumCopySymlinkStrategy::Dereference`], in which case the link target is
/// classified (a dangling link is `Missing`). Absence and inaccessibility are
/// both `Missing`; this function never fails.
pub fn classify_path(path: &Path, rule_symlink: EnumCopySymlinkStrategy) -> EnumEntryType {
    let res_meta = match rule_symlink {
        EnumCopySymlinkStrategy::Dereference => fs::metadata(path),
        EnumCopySymlinkStrategy::Skip | EnumCopySymlinkStrategy::Recreate => {
            fs::symlink_metadata(path)
        }
    };

    match res_meta {
        Ok(meta) => classify_file_type(meta.file_type()),
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                debug!(path = %path.display(), error = %e, "path inaccessible, treated as missing");
            }
            EnumEntryType::Missing
        }
    }
}

fn classify_file_type(file_type: fs::FileType) -> EnumEntryType {
    if file_type.is_file() {
        EnumEntryType::Regular
    } else if file_type.is_dir() {
        EnumEntryType::Directory
    } else {
        EnumEntryType::Other
    }
}

/// `true` when `path` itself is a symbolic link (dangling or not).
pub(crate) fn is_symlink(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|meta| meta.file_type().is_symlink())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::classify_path;
    use crate::spec::{EnumCopySymlinkStrategy, EnumEntryType};

    #[rstest]
    #[case(EnumCopySymlinkStrategy::Skip)]
    #[case(EnumCopySymlinkStrategy::Dereference)]
    #[case(EnumCopySymlinkStrategy::Recreate)]
    fn classify_regular_directory_missing(#[case] rule_symlink: EnumCopySymlinkStrategy) {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("a.txt");
        fs::write(&path_file, "a").expect("write");

        assert_eq!(classify_path(&path_file, rule_symlink), EnumEntryType::Regular);
        assert_eq!(classify_path(tmp.path(), rule_symlink), EnumEntryType::Directory);
        assert_eq!(
            classify_path(&tmp.path().join("nope"), rule_symlink),
            EnumEntryType::Missing
        );
    }

    #[test]
    fn classify_missing_under_regular_file() {
        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("a.txt");
        fs::write(&path_file, "a").expect("write");

        assert_eq!(
            classify_path(&path_file.join("child"), EnumCopySymlinkStrategy::Skip),
            EnumEntryType::Missing
        );
    }

    #[cfg(unix)]
    #[test]
    fn classify_symlink_depends_on_policy() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().expect("tempdir");
        let path_file = tmp.path().join("a.txt");
        let path_link = tmp.path().join("link");
        let path_dangling = tmp.path().join("dangling");
        fs::write(&path_file, "a").expect("write");
        symlink(&path_file, &path_link).expect("symlink");
        symlink(tmp.path().join("gone"), &path_dangling).expect("symlink");

        assert_eq!(
            classify_path(&path_link, EnumCopySymlinkStrategy::Skip),
            EnumEntryType::Other
        );
        assert_eq!(
            classify_path(&path_link, EnumCopySymlinkStrategy::Dereference),
            EnumEntryType::Regular
        );
        assert_eq!(
            classify_path(&path_dangling, EnumCopySymlinkStrategy::Recreate),
            EnumEntryType::Other
        );
        assert_eq!(
            classify_path(&path_dangling, EnumCopySymlinkStrategy::Dereference),
            EnumEntryType::Missing
        );
    }

    #[cfg(unix)]
    #[test]
    fn classify_special_file_as_other() {
        let path_null = std::path::Path::new("/dev/null");
        if path_null.exists() {
            assert_eq!(
                classify_path(path_null, EnumCopySymlinkStrategy::Skip),
                EnumEntryType::Other
            );
        }
    }
}
