//! Validation outcome types.

use serde::{Deserialize, Serialize};

/// The outcome of validating one file (or one presence rule about a file).
///
/// Entries in `errors` and `warnings` keep insertion order, which is line
/// order for record-level findings. A result is never mutated once the pass
/// that produced it completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValidationResult {
    /// Base name of the file the findings are about
    pub file_name: String,
    /// True when `errors` is empty; warnings never invalidate a file
    pub is_valid: bool,
    /// Non-blank lines processed, the header counting as line 1
    pub total_lines: u64,
    /// Error-level findings, in the order they were produced
    pub errors: Vec<String>,
    /// Advisory findings, in the order they were produced
    pub warnings: Vec<String>,
}

impl FileValidationResult {
    /// A synthetic error-level result about a file, used for findings that do
    /// not come out of a record pass (missing file, forbidden file).
    pub fn file_error(file_name: &str, message: String) -> Self {
        FileValidationResult {
            file_name: file_name.to_owned(),
            is_valid: false,
            total_lines: 0,
            errors: vec![message],
            warnings: Vec::new(),
        }
    }

    /// A synthetic warning-level result about a file.
    pub fn file_warning(file_name: &str, message: String) -> Self {
        FileValidationResult {
            file_name: file_name.to_owned(),
            is_valid: true,
            total_lines: 0,
            errors: Vec::new(),
            warnings: vec![message],
        }
    }
}

/// Every result produced for one feed, in production order.
///
/// The run is append-only while validation is going on and read-only
/// afterwards; display ordering is the report's concern, not this type's.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationRun {
    /// The per-file results, in the order they were produced
    pub results: Vec<FileValidationResult>,
}

impl ValidationRun {
    /// Total error-level findings across all files.
    pub fn total_errors(&self) -> usize {
        self.results.iter().map(|r| r.errors.len()).sum()
    }

    /// Total advisory findings across all files.
    pub fn total_warnings(&self) -> usize {
        self.results.iter().map(|r| r.warnings.len()).sum()
    }

    /// How many results carry no errors.
    pub fn valid_file_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_valid).count()
    }

    /// Whether the whole feed is free of error-level findings.
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|r| r.is_valid)
    }
}
