//! Error types.
//!
//! `IngestError` is what the loaders return; `AppError` is what the binary
//! turns into a message and a process exit code.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

/// Exit code for bad input files, malformed rows, or bad configuration.
pub const EXIT_INPUT: u8 = 2;
/// Exit code when there is nothing to load.
pub const EXIT_NO_DATA: u8 = 3;
/// Exit code for terminal / UI failures.
pub const EXIT_UI: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        AppError::new(EXIT_INPUT, err.to_string())
    }
}

/// Load-time failures. All of them are fatal: a partially loaded dataset is
/// never handed to the query layer.
#[derive(Debug)]
pub enum IngestError {
    /// A row (or the header) lacks a required field, or a date does not parse.
    MalformedRecord {
        source: PathBuf,
        /// 1-based line in the file; `None` for header-level problems.
        line: Option<usize>,
        reason: String,
    },
    Io {
        path: PathBuf,
        err: std::io::Error,
    },
    Csv {
        path: PathBuf,
        err: csv::Error,
    },
    /// `price * quantity` does not fit in a `Decimal`.
    AmountOverflow {
        date: NaiveDate,
        region: String,
    },
}

impl IngestError {
    pub(crate) fn malformed(source: &Path, line: Option<usize>, reason: impl Into<String>) -> Self {
        IngestError::MalformedRecord {
            source: source.to_path_buf(),
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: &Path, err: std::io::Error) -> Self {
        IngestError::Io {
            path: path.to_path_buf(),
            err,
        }
    }

    pub(crate) fn csv(path: &Path, err: csv::Error) -> Self {
        IngestError::Csv {
            path: path.to_path_buf(),
            err,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, IngestError::MalformedRecord { .. })
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestError::MalformedRecord {
                source,
                line: Some(line),
                reason,
            } => write!(f, "Malformed record in '{}' line {line}: {reason}", source.display()),
            IngestError::MalformedRecord {
                source,
                line: None,
                reason,
            } => write!(f, "Malformed input '{}': {reason}", source.display()),
            IngestError::Io { path, err } => write!(f, "Failed to access '{}': {err}", path.display()),
            IngestError::Csv { path, err } => write!(f, "Failed to parse CSV '{}': {err}", path.display()),
            IngestError::AmountOverflow { date, region } => {
                write!(f, "Sales amount out of range for {date} in region '{region}'")
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::MalformedRecord { .. } | IngestError::AmountOverflow { .. } => None,
            IngestError::Io { err, .. } => Some(err),
            IngestError::Csv { err, .. } => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_record_message_names_file_and_line() {
        let err = IngestError::malformed(Path::new("data/a.csv"), Some(7), "Missing required value: `date`");
        assert_eq!(
            err.to_string(),
            "Malformed record in 'data/a.csv' line 7: Missing required value: `date`"
        );
        assert!(err.is_malformed());

        let app: AppError = err.into();
        assert_eq!(app.exit_code(), EXIT_INPUT);
    }
}
