//! Copy option models, outcomes, and top-level error types.

use std::fmt;
use std::io;
use std::path::PathBuf;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Classification of one filesystem path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumEntryType {
    /// Regular file.
    Regular,
    /// Directory.
    Directory,
    /// Symlink, device node, FIFO, socket, ...
    Other,
    /// Nonexistent or inaccessible path.
    Missing,
}

/// Result classification of one copy operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnumCopyOutcome {
    Success,
    IdenticalOperands,
    SourceMissing,
    TypeMismatch,
    DestinationCreateFailed,
    ReadFailure,
    WriteFailure,
}

impl EnumCopyOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Success => 0,
            _ => 1,
        }
    }
}

/// Operand flavour used in user-facing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumOperandKind {
    File,
    Directory,
    Symlink,
}

impl EnumOperandKind {
    fn plural(self) -> &'static str {
        match self {
            Self::File => "files",
            Self::Directory => "directories",
            Self::Symlink => "symlinks",
        }
    }
}

impl fmt::Display for EnumOperandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File => write!(f, "file"),
            Self::Directory => write!(f, "directory"),
            Self::Symlink => write!(f, "symlink"),
        }
    }
}

/// Symlink handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopySymlinkStrategy {
    /// Treat links as `Other` and leave them out of the copy.
    Skip,
    /// Follow the link and copy the target bytes/entries.
    Dereference,
    /// Create a symbolic link at destination with the same target text.
    Recreate,
}

/// What a tree walk does after one entry fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumCopyFailurePolicy {
    /// Record the failure in the report and keep walking.
    Continue,
    /// Stop the walk and return the first failure.
    Abort,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Default stream buffer size for file content copies.
pub const N_SIZE_BUFFER_DEFAULT: usize = 64 * 1024;

/// Input options for [`crate::copy()`] and [`crate::copy_tree`].
#[derive(Debug, Clone)]
pub struct SpecCopyOptions {
    /// Symlink handling behavior.
    pub rule_symlink: EnumCopySymlinkStrategy,
    /// Tree walk behavior after a per-entry failure.
    pub rule_failure: EnumCopyFailurePolicy,
    /// Read buffer size in bytes. Zero is treated as one.
    pub size_buffer: usize,
}

impl Default for SpecCopyOptions {
    fn default() -> Self {
        Self {
            rule_symlink: EnumCopySymlinkStrategy::Skip,
            rule_failure: EnumCopyFailurePolicy::Continue,
            size_buffer: N_SIZE_BUFFER_DEFAULT,
        }
    }
}

/// One copy failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyError {
    /// Failed source or destination path.
    pub path: PathBuf,
    /// Outcome the failure maps to.
    pub outcome: EnumCopyOutcome,
    /// User-facing error text.
    pub exception: String,
}

/// Failure of a copy operation.
///
/// Display strings are the `<reason>` part of the `copy: <reason>.` line.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Top-level source operand does not exist.
    #[error("operand '{}' does not exist", .path.display())]
    OperandMissing { path: PathBuf },

    /// Source file or directory could not be opened.
    #[error("{kind} '{}' does not exist", .path.display())]
    SourceMissing {
        kind: EnumOperandKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Source and destination are the same literal path.
    #[error("{} '{}' and '{}' are the same", .kind.plural(), .path_src.display(), .path_dst.display())]
    IdenticalOperands {
        kind: EnumOperandKind,
        path_src: PathBuf,
        path_dst: PathBuf,
    },

    #[error("'{}' and '{}' have different types", .path_src.display(), .path_dst.display())]
    TypeMismatch { path_src: PathBuf, path_dst: PathBuf },

    /// Destination file or directory could not be created.
    #[error("failed to make {kind} '{}'", .path.display())]
    DestinationCreateFailed {
        kind: EnumOperandKind,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read '{}'", .path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write '{}'", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    /// Outcome this error maps to.
    pub fn outcome(&self) -> EnumCopyOutcome {
        match self {
            Self::OperandMissing { .. } | Self::SourceMissing { .. } => {
                EnumCopyOutcome::SourceMissing
            }
            Self::IdenticalOperands { .. } => EnumCopyOutcome::IdenticalOperands,
            Self::TypeMismatch { .. } => EnumCopyOutcome::TypeMismatch,
            Self::DestinationCreateFailed { .. } => EnumCopyOutcome::DestinationCreateFailed,
            Self::ReadFailure { .. } => EnumCopyOutcome::ReadFailure,
            Self::WriteFailure { .. } => EnumCopyOutcome::WriteFailure,
        }
    }

    /// Path the failure is attributed to (the source for two-operand errors).
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::OperandMissing { path }
            | Self::SourceMissing { path, .. }
            | Self::DestinationCreateFailed { path, .. }
            | Self::ReadFailure { path, .. }
            | Self::WriteFailure { path, .. } => path,
            Self::IdenticalOperands { path_src, .. } | Self::TypeMismatch { path_src, .. } => {
                path_src
            }
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
