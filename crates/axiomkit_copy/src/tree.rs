//! Directory tree traversal and per-entry copy.

use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::dir::ensure_directory;
use crate::file::copy_file;
use crate::inspect::{classify_path, is_symlink};
use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{
    CopyError, EnumCopyFailurePolicy, EnumCopySymlinkStrategy, EnumEntryType, EnumOperandKind,
    SpecCopyOptions,
};
use crate::util::{
    create_symbolic_link, derive_dir_identity, is_same_operand, validate_destination_entry,
};

#[derive(Debug, Clone)]
struct SpecCopyTaskDir {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
}

#[derive(Debug)]
struct SpecCopyContext<'a> {
    spec_cp_options: &'a SpecCopyOptions,
    builder_cp_report: ReportCopyBuilder,
    id_dir_dst_root: Option<(u64, u64)>,
    set_visited_dirs: HashSet<(u64, u64)>,
    l_tasks_dir: Vec<SpecCopyTaskDir>,
}

impl SpecCopyContext<'_> {
    /// Apply the failure policy to one entry error.
    fn record_failure(&mut self, err: CopyError) -> Result<(), CopyError> {
        match self.spec_cp_options.rule_failure {
            EnumCopyFailurePolicy::Abort => Err(err),
            EnumCopyFailurePolicy::Continue => {
                debug!(error = %err, "entry failed, walk continues");
                self.builder_cp_report.add_copy_error(&err);
                Ok(())
            }
        }
    }

    fn record_skip(&mut self, warning: Option<String>) {
        if let Some(warning) = warning {
            warn!("{warning}");
            self.builder_cp_report.add_warning(warning);
        }
        self.builder_cp_report.add_skipped();
    }
}

/// Copy the content of directory `dir_source` into `dir_destination`.
///
/// Regular files are copied byte-for-byte, subdirectories are created and
/// walked, and everything else is handled by
/// [`SpecCopyOptions::rule_symlink`] or skipped. The walk uses an explicit
/// stack, so tree depth is not limited by the call stack.
///
/// Returns [`CopyError::SourceMissing`] when `dir_source` cannot be read as a
/// directory and [`CopyError::IdenticalOperands`] when both paths are the same
/// literal string. Per-entry failures are collected in the returned
/// [`ReportCopy`] under [`EnumCopyFailurePolicy::Continue`], or returned as the
/// error under [`EnumCopyFailurePolicy::Abort`].
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: &SpecCopyOptions,
) -> Result<ReportCopy, CopyError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref();
    let path_dir_dst = dir_destination.as_ref();

    let iter_entries_root = fs::read_dir(path_dir_src).map_err(|e| CopyError::SourceMissing {
        kind: EnumOperandKind::Directory,
        path: path_dir_src.to_path_buf(),
        source: e,
    })?;
    if is_same_operand(path_dir_src, path_dir_dst) {
        return Err(CopyError::IdenticalOperands {
            kind: EnumOperandKind::Directory,
            path_src: path_dir_src.to_path_buf(),
            path_dst: path_dir_dst.to_path_buf(),
        });
    }
    if classify_path(path_dir_dst, spec_cp_options.rule_symlink) != EnumEntryType::Directory {
        ensure_directory(path_dir_dst)?;
    }

    let mut spec_cp_ctx = SpecCopyContext {
        spec_cp_options,
        builder_cp_report: ReportCopyBuilder::default(),
        id_dir_dst_root: derive_dir_identity(path_dir_dst),
        set_visited_dirs: HashSet::new(),
        l_tasks_dir: Vec::new(),
    };
    let id_dir_src_root = derive_dir_identity(path_dir_src);
    if id_dir_src_root.is_some() && id_dir_src_root == spec_cp_ctx.id_dir_dst_root {
        let warning = format!(
            "Source and destination are the same directory under different spellings, files will be truncated: {} -> {}",
            path_dir_src.display(),
            path_dir_dst.display()
        );
        warn!("{warning}");
        spec_cp_ctx.builder_cp_report.add_warning(warning);
    }
    if spec_cp_options.rule_symlink == EnumCopySymlinkStrategy::Dereference
        && let Some(id_dir) = id_dir_src_root
    {
        spec_cp_ctx.set_visited_dirs.insert(id_dir);
    }

    walk_directory(path_dir_src, path_dir_dst, iter_entries_root, &mut spec_cp_ctx)?;
    while let Some(spec_task) = spec_cp_ctx.l_tasks_dir.pop() {
        let iter_entries = match fs::read_dir(&spec_task.path_dir_src) {
            Ok(iter) => iter,
            Err(e) => {
                spec_cp_ctx.record_failure(CopyError::ReadFailure {
                    path: spec_task.path_dir_src,
                    source: e,
                })?;
                continue;
            }
        };
        walk_directory(
            &spec_task.path_dir_src,
            &spec_task.path_dir_dst,
            iter_entries,
            &mut spec_cp_ctx,
        )?;
    }

    let report_cp = spec_cp_ctx.builder_cp_report.build();
    info!(
        src = %path_dir_src.display(),
        dst = %path_dir_dst.display(),
        "{report_cp}"
    );
    Ok(report_cp)
}

fn walk_directory(
    path_dir_src: &Path,
    path_dir_dst: &Path,
    iter_entries: ReadDir,
    spec_cp_ctx: &mut SpecCopyContext<'_>,
) -> Result<(), CopyError> {
    let mut l_entries: Vec<(OsString, PathBuf)> = Vec::new();
    for entry_res in iter_entries {
        match entry_res {
            Ok(entry) => l_entries.push((entry.file_name(), entry.path())),
            Err(e) => {
                let warning = format!(
                    "Failed to read directory entry under {} ({e})",
                    path_dir_src.display()
                );
                warn!("{warning}");
                spec_cp_ctx.builder_cp_report.add_warning(warning);
            }
        }
    }
    l_entries.sort_by(|a, b| a.0.cmp(&b.0));

    let rule_symlink = spec_cp_ctx.spec_cp_options.rule_symlink;
    let mut l_tasks_sub = Vec::new();
    for (name_entry, path_entry_src) in l_entries {
        spec_cp_ctx.builder_cp_report.add_scanned();
        let path_entry_dst = path_dir_dst.join(&name_entry);

        match classify_path(&path_entry_src, rule_symlink) {
            EnumEntryType::Regular => {
                let res_copy = validate_destination_entry(&path_entry_dst, EnumOperandKind::File)
                    .and_then(|()| {
                        copy_file(
                            &path_entry_src,
                            &path_entry_dst,
                            spec_cp_ctx.spec_cp_options.size_buffer,
                        )
                    });
                match res_copy {
                    Ok(n_bytes) => spec_cp_ctx.builder_cp_report.add_copied(n_bytes),
                    Err(e) => spec_cp_ctx.record_failure(e)?,
                }
            }
            EnumEntryType::Directory => {
                if let Some(spec_task) =
                    handle_dir_entry(path_entry_src, path_entry_dst, spec_cp_ctx)?
                {
                    l_tasks_sub.push(spec_task);
                }
            }
            EnumEntryType::Other => {
                handle_other_entry(&path_entry_src, &path_entry_dst, spec_cp_ctx)?
            }
            EnumEntryType::Missing => spec_cp_ctx.record_skip(Some(format!(
                "Entry vanished or dangling symlink skipped: {}",
                path_entry_src.display()
            ))),
        }
    }

    // reversed so the stack pops subdirectories in name order
    spec_cp_ctx.l_tasks_dir.extend(l_tasks_sub.into_iter().rev());
    Ok(())
}

fn handle_dir_entry(
    path_dir_src_sub: PathBuf,
    path_dir_dst_sub: PathBuf,
    spec_cp_ctx: &mut SpecCopyContext<'_>,
) -> Result<Option<SpecCopyTaskDir>, CopyError> {
    let id_dir_src_sub = derive_dir_identity(&path_dir_src_sub);
    if id_dir_src_sub.is_some() && id_dir_src_sub == spec_cp_ctx.id_dir_dst_root {
        spec_cp_ctx.record_skip(Some(format!(
            "Destination directory found inside source, not descending: {}",
            path_dir_src_sub.display()
        )));
        return Ok(None);
    }
    if spec_cp_ctx.spec_cp_options.rule_symlink == EnumCopySymlinkStrategy::Dereference
        && let Some(id_dir) = id_dir_src_sub
        && !spec_cp_ctx.set_visited_dirs.insert(id_dir)
    {
        spec_cp_ctx.record_skip(Some(format!(
            "Symlink loop detected: {}",
            path_dir_src_sub.display()
        )));
        return Ok(None);
    }

    if let Err(e) = validate_destination_entry(&path_dir_dst_sub, EnumOperandKind::Directory)
        .and_then(|()| ensure_directory(&path_dir_dst_sub))
    {
        spec_cp_ctx.record_failure(e)?;
        return Ok(None);
    }
    spec_cp_ctx.builder_cp_report.add_dir();
    Ok(Some(SpecCopyTaskDir {
        path_dir_src: path_dir_src_sub,
        path_dir_dst: path_dir_dst_sub,
    }))
}

fn handle_other_entry(
    path_entry_src: &Path,
    path_entry_dst: &Path,
    spec_cp_ctx: &mut SpecCopyContext<'_>,
) -> Result<(), CopyError> {
    if spec_cp_ctx.spec_cp_options.rule_symlink == EnumCopySymlinkStrategy::Recreate
        && is_symlink(path_entry_src)
    {
        return match create_symbolic_link(path_entry_src, path_entry_dst) {
            Ok(()) => {
                spec_cp_ctx.builder_cp_report.add_copied(0);
                Ok(())
            }
            Err(e) => spec_cp_ctx.record_failure(e),
        };
    }

    debug!(path = %path_entry_src.display(), "special entry skipped");
    spec_cp_ctx.record_skip(None);
    Ok(())
}
