// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use std::path::{Path, PathBuf};

/// Screen definitions.
pub const SCREENS_FILE: &str = "screens.csv";
/// Movie definitions.
pub const MOVIES_FILE: &str = "movies.csv";
/// The booking log.
pub const BOOKINGS_FILE: &str = "bookings.csv";
/// The wallet transaction log.
pub const WALLET_FILE: &str = "wallet_transactions.csv";
/// The seat snapshot.
pub const SNAPSHOT_FILE: &str = "seat_snapshot.csv";
/// The discrepancy journal.
pub const DISCREPANCIES_FILE: &str = "discrepancies.csv";
/// Where an old-format booking log is kept after migration.
pub const LEGACY_BOOKINGS_BACKUP: &str = "bookings.legacy.csv";

/// The fixed set of files inside a data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataFiles {
    dir: PathBuf,
}

impl DataFiles {
    /// Points at a data directory without touching the filesystem.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Creates the data directory if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<(), PersistenceError> {
        std::fs::create_dir_all(&self.dir).map_err(|err| PersistenceError::io(&self.dir, err))
    }

    /// Returns the data directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn screens(&self) -> PathBuf {
        self.dir.join(SCREENS_FILE)
    }

    #[must_use]
    pub fn movies(&self) -> PathBuf {
        self.dir.join(MOVIES_FILE)
    }

    #[must_use]
    pub fn bookings(&self) -> PathBuf {
        self.dir.join(BOOKINGS_FILE)
    }

    #[must_use]
    pub fn wallet(&self) -> PathBuf {
        self.dir.join(WALLET_FILE)
    }

    #[must_use]
    pub fn snapshot(&self) -> PathBuf {
        self.dir.join(SNAPSHOT_FILE)
    }

    #[must_use]
    pub fn discrepancies(&self) -> PathBuf {
        self.dir.join(DISCREPANCIES_FILE)
    }

    #[must_use]
    pub fn legacy_bookings_backup(&self) -> PathBuf {
        self.dir.join(LEGACY_BOOKINGS_BACKUP)
    }
}
