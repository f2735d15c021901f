//! All error types for the lang2csv crate.
//!
//! These are returned from every fallible operation (scanning, parsing, writing).
//! Conditions a run can recover from (skipped packages, structural conflicts) are
//! not errors; they are reported as warnings on the run reports instead.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cannot read `{}`: {source}", path.display())]
    UnreadableSource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write `{}`: {source}", path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed row at line {line}: {message}")]
    MalformedRow { line: u64, message: String },

    #[error("syntax error at {line}:{column}: {message}")]
    SourceSyntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("in `{}`: {source}", path.display())]
    InFile {
        path: PathBuf,
        #[source]
        source: Box<Error>,
    },

    #[error("CSV error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid data: {0}")]
    DataMismatch(String),
}

impl Error {
    /// Creates an unreadable-source error for `path`.
    pub fn unreadable(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::UnreadableSource {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a write-failure error for `path`.
    pub fn write_failure(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Error::WriteFailure {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a malformed-row error.
    pub fn malformed_row(line: u64, message: impl Into<String>) -> Self {
        Error::MalformedRow {
            line,
            message: message.into(),
        }
    }

    /// Reports an I/O failure raised while writing `path` as a write failure.
    ///
    /// Other errors are returned unchanged.
    pub fn into_write_failure(self, path: impl AsRef<Path>) -> Self {
        match self {
            Error::Io(source) => Error::write_failure(path, source),
            Error::CsvParse(err) if err.is_io_error() => {
                Error::write_failure(path, std::io::Error::from(err))
            }
            other => other,
        }
    }

    /// Attaches the file the error came from.
    pub fn in_file(self, path: impl AsRef<Path>) -> Self {
        Error::InFile {
            path: path.as_ref().to_path_buf(),
            source: Box::new(self),
        }
    }

    /// True when this error (or the error it wraps) is a malformed CSV row.
    pub fn is_malformed_row(&self) -> bool {
        match self {
            Error::MalformedRow { .. } => true,
            Error::InFile { source, .. } => source.is_malformed_row(),
            _ => false,
        }
    }
}
