// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marquee::StoreError;
use marquee_domain::DomainError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing the data files.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The file could not be opened, written, synced, or renamed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: std::io::Error,
    },
    /// The CSV reader or writer failed.
    #[error("CSV error in {}: {source}", .path.display())]
    Csv {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        source: csv::Error,
    },
    /// A row was read but its contents make no sense.
    #[error("Malformed row at {}:{line}: {reason}", .path.display())]
    Malformed {
        /// The file involved.
        path: PathBuf,
        /// One-based line number, counting the header as line 1.
        line: u64,
        /// What was wrong.
        reason: String,
    },
    /// A value could not be turned into text.
    #[error("Cannot encode a row for {}: {reason}", .path.display())]
    Encode {
        /// The file involved.
        path: PathBuf,
        /// What failed.
        reason: String,
    },
    /// Rows were read but describe an invalid catalog.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Io { path, source } => Self::Io {
                location: path.display().to_string(),
                message: source.to_string(),
            },
            PersistenceError::Malformed { path, line, reason } => Self::Corrupt {
                location: format!("{}:{line}", path.display()),
                reason,
            },
            PersistenceError::Csv { path, source } => Self::Corrupt {
                location: path.display().to_string(),
                reason: source.to_string(),
            },
            PersistenceError::Encode { path, reason } => Self::Corrupt {
                location: path.display().to_string(),
                reason,
            },
            PersistenceError::Domain(err) => Self::Corrupt {
                location: String::from("catalog"),
                reason: err.to_string(),
            },
        }
    }
}
