//! Top-level copy decision procedure.

use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::dir::ensure_directory;
use crate::file::copy_file;
use crate::inspect::{classify_path, is_symlink};
use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{
    CopyError, EnumCopySymlinkStrategy, EnumEntryType, EnumOperandKind, SpecCopyOptions,
};
use crate::tree::copy_tree;
use crate::util::create_symbolic_link;

/// Copy `source` to `destination`, file to file or directory to directory.
///
/// This function performs:
/// 1. Source classification; a missing source fails with
///    [`CopyError::OperandMissing`].
/// 2. Destination creation when absent, matching the source type (empty file
///    or directory). Creation failure is fatal.
/// 3. Destination re-classification and type comparison
///    ([`CopyError::TypeMismatch`] on mismatch, nothing modified).
/// 4. Dispatch to [`copy_file`] or [`copy_tree`]. Any other pair of equal
///    types is a no-op.
///
/// The returned [`ReportCopy`] may still carry per-entry failures of a tree
/// copy; check [`ReportCopy::outcome`].
pub fn copy<P, Q>(
    source: P,
    destination: Q,
    spec_cp_options: &SpecCopyOptions,
) -> Result<ReportCopy, CopyError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_src = source.as_ref();
    let path_dst = destination.as_ref();
    let rule_symlink = spec_cp_options.rule_symlink;

    let enum_type_src = classify_path(path_src, rule_symlink);
    if enum_type_src == EnumEntryType::Missing {
        return Err(CopyError::OperandMissing {
            path: path_src.to_path_buf(),
        });
    }

    let mut enum_type_dst = classify_path(path_dst, rule_symlink);
    if enum_type_dst == EnumEntryType::Missing {
        if enum_type_src == EnumEntryType::Other
            && rule_symlink == EnumCopySymlinkStrategy::Recreate
            && is_symlink(path_src)
        {
            create_symbolic_link(path_src, path_dst)?;
            let mut builder_cp_report = ReportCopyBuilder::default();
            builder_cp_report.add_copied(0);
            return Ok(builder_cp_report.build());
        }

        create_destination(path_dst, enum_type_src)?;
        enum_type_dst = classify_path(path_dst, rule_symlink);
    }

    if enum_type_src != enum_type_dst {
        return Err(CopyError::TypeMismatch {
            path_src: path_src.to_path_buf(),
            path_dst: path_dst.to_path_buf(),
        });
    }

    match enum_type_src {
        EnumEntryType::Regular => {
            let n_bytes = copy_file(path_src, path_dst, spec_cp_options.size_buffer)?;
            let mut builder_cp_report = ReportCopyBuilder::default();
            builder_cp_report.add_copied(n_bytes);
            Ok(builder_cp_report.build())
        }
        EnumEntryType::Directory => copy_tree(path_src, path_dst, spec_cp_options),
        EnumEntryType::Other | EnumEntryType::Missing => {
            debug!(
                src = %path_src.display(),
                dst = %path_dst.display(),
                "operands are neither files nor directories, nothing to copy"
            );
            Ok(ReportCopy::default())
        }
    }
}

fn create_destination(path_dst: &Path, enum_type_src: EnumEntryType) -> Result<(), CopyError> {
    match enum_type_src {
        EnumEntryType::Regular => {
            File::create(path_dst).map_err(|e| CopyError::DestinationCreateFailed {
                kind: EnumOperandKind::File,
                path: path_dst.to_path_buf(),
                source: e,
            })?;
            debug!(path = %path_dst.display(), "created empty destination file");
            Ok(())
        }
        EnumEntryType::Directory => ensure_directory(path_dst),
        EnumEntryType::Other | EnumEntryType::Missing => Ok(()),
    }
}
