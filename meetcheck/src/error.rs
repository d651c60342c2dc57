//! Error types for meetcheck
//!
//! Two families, matching how failures are handled:
//! - [`Error`]: fatal for the whole run (bad configuration, unreadable tables,
//!   missing required columns). Nothing is written when one of these occurs.
//! - [`CheckError`]: confined to one configured check. The runner logs it and
//!   the check contributes no violations; every other check still runs.

use thiserror::Error;

/// Fatal error for a report generation run
#[derive(Error, Debug)]
pub enum Error {
    /// Shared configuration / I/O errors
    #[error(transparent)]
    Common(#[from] meetcheck_common::Error),

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The table export tool failed or could not be started
    #[error("Failed to extract table '{table}': {message}")]
    Extraction { table: String, message: String },

    /// Malformed CSV text from an export
    #[error("CSV error in table '{table}': {source}")]
    Csv {
        table: String,
        #[source]
        source: csv::Error,
    },

    /// A column the data model depends on is absent from a table
    #[error("Table '{table}' is missing required column '{column}'")]
    MissingColumn { table: String, column: String },

    /// The rule-set has nothing enabled to run
    #[error("No checks to run in {0}")]
    NoChecks(String),

    /// Refusing to clobber an existing file
    #[error("Refusing to overwrite existing file: {0}")]
    AlreadyExists(String),

    /// Report could not be written
    #[error("Report error: {0}")]
    Report(String),
}

/// Convenience Result type using the fatal [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Recoverable failure of a single configured check
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    /// `checker` names no known rule type
    #[error("Unknown checker '{identifier}' for check '{check}'")]
    UnknownChecker { check: String, identifier: String },

    /// `params` do not fit what the rule type needs
    #[error("Invalid params for check '{check}' ({identifier}): {message}")]
    InvalidParams {
        check: String,
        identifier: String,
        message: String,
    },

    /// No time standard with this name exists in the meet data
    #[error("No time standards found for '{0}'")]
    UnknownStandard(String),

    /// No record with this name exists in the meet data
    #[error("No timing data found for record with name '{0}'")]
    UnknownRecord(String),
}
