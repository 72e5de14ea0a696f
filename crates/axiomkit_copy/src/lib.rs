//! `axiomkit_copy` v1:
//! Rust-side `cp`-like copy engine for regular files and directory trees.
//!
//! Modules:
//! - `inspect` : path classification
//! - `dir`     : directory creation with missing ancestors
//! - `file`    : byte-exact file content copy
//! - `tree`    : directory tree walk
//! - `copy`    : top-level orchestration
//! - `spec`    : enums/options/errors
//! - `report`  : run-time report model
//! - `util`    : shared helper functions

pub mod copy;
pub mod dir;
pub mod file;
pub mod inspect;
pub mod report;
pub mod spec;
pub mod tree;
mod util;

pub use copy::copy;
pub use dir::ensure_directory;
pub use file::copy_file;
pub use inspect::classify_path;
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{
    CopyError, EnumCopyFailurePolicy, EnumCopyOutcome, EnumCopySymlinkStrategy, EnumEntryType,
    EnumOperandKind, N_SIZE_BUFFER_DEFAULT, SpecCopyError, SpecCopyOptions,
};
pub use tree::copy_tree;
