//! Copy report models and mutable report builder.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use crate::spec::{CopyError, EnumCopyOutcome, SpecCopyError};

/// Aggregate counters and diagnostics for one copy run.
#[derive(Debug, Default, Clone)]
pub struct ReportCopy {
    /// Total source entries inspected (the root operand excluded).
    pub cnt_scanned: u64,
    /// Regular files and symlinks written to the destination.
    pub cnt_copied: u64,
    /// Destination directories created or reused.
    pub cnt_dirs: u64,
    /// Entries left out of the copy (special files, skipped symlinks).
    pub cnt_skipped: u64,
    /// Content bytes written.
    pub n_bytes: u64,
    /// Non-fatal warnings collected during traversal/copy.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecCopyError>,
}

impl ReportCopy {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// `Success` for a clean run, else the outcome of the first failed entry.
    pub fn outcome(&self) -> EnumCopyOutcome {
        self.errors
            .first()
            .map_or(EnumCopyOutcome::Success, |spec_error| spec_error.outcome)
    }

    /// Machine-readable counters.
    pub fn to_dict(&self) -> BTreeMap<String, u64> {
        let mut dict_counts = BTreeMap::new();
        dict_counts.insert("cnt_scanned".to_string(), self.cnt_scanned);
        dict_counts.insert("cnt_copied".to_string(), self.cnt_copied);
        dict_counts.insert("cnt_dirs".to_string(), self.cnt_dirs);
        dict_counts.insert("cnt_skipped".to_string(), self.cnt_skipped);
        dict_counts.insert("n_bytes".to_string(), self.n_bytes);
        dict_counts.insert("cnt_errors".to_string(), self.error_count() as u64);
        dict_counts.insert("cnt_warnings".to_string(), self.warning_count() as u64);
        dict_counts
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} copied={} dirs={} skipped={} bytes={} errors={} warnings={}",
            self.cnt_scanned,
            self.cnt_copied,
            self.cnt_dirs,
            self.cnt_skipped,
            self.n_bytes,
            self.error_count(),
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    /// See [`ReportCopy::cnt_scanned`].
    pub cnt_scanned: u64,
    /// See [`ReportCopy::cnt_copied`].
    pub cnt_copied: u64,
    /// See [`ReportCopy::cnt_dirs`].
    pub cnt_dirs: u64,
    /// See [`ReportCopy::cnt_skipped`].
    pub cnt_skipped: u64,
    /// See [`ReportCopy::n_bytes`].
    pub n_bytes: u64,
    /// See [`ReportCopy::errors`].
    pub errors: Vec<SpecCopyError>,
    /// See [`ReportCopy::warnings`].
    pub warnings: Vec<String>,
}

impl ReportCopyBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    /// Count one written file carrying `n_bytes` of content.
    pub fn add_copied(&mut self, n_bytes: u64) {
        self.cnt_copied += 1;
        self.n_bytes += n_bytes;
    }

    pub fn add_dir(&mut self) {
        self.cnt_dirs += 1;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    /// Add warning message.
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: PathBuf, outcome: EnumCopyOutcome, exception: String) {
        self.errors.push(SpecCopyError {
            path,
            outcome,
            exception,
        });
    }

    /// Record a [`CopyError`] raised for one entry.
    pub fn add_copy_error(&mut self, err: &CopyError) {
        self.add_error(err.path().to_path_buf(), err.outcome(), err.to_string());
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        ReportCopy {
            cnt_scanned: self.cnt_scanned,
            cnt_copied: self.cnt_copied,
            cnt_dirs: self.cnt_dirs,
            cnt_skipped: self.cnt_skipped,
            n_bytes: self.n_bytes,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}
