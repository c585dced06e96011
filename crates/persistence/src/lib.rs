// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Flat-file storage for the box office.
//!
//! Every store here is a CSV file inside one data directory. Logs are only
//! ever appended to, one synced write per row. The catalog and the seat
//! snapshot are replaced whole through a temporary file and a rename.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod bookings;
mod catalog;
mod data_files;
mod discrepancies;
mod error;
mod fields;
mod migration;
mod snapshot;
mod table;
mod wallet;

#[cfg(test)]
mod tests;

pub use bookings::{BOOKINGS_HEADER, CsvBookingStore};
pub use catalog::{MOVIES_HEADER, SCREENS_HEADER, load_catalog, save_catalog};
pub use data_files::{
    BOOKINGS_FILE, DISCREPANCIES_FILE, DataFiles, LEGACY_BOOKINGS_BACKUP, MOVIES_FILE,
    SCREENS_FILE, SNAPSHOT_FILE, WALLET_FILE,
};
pub use discrepancies::{CsvDiscrepancyJournal, DISCREPANCIES_HEADER};
pub use error::PersistenceError;
pub use migration::{MigrationReport, SkippedRow, is_legacy_booking_log, migrate_legacy_bookings};
pub use snapshot::{CsvSnapshotStore, SNAPSHOT_HEADER};
pub use table::{Table, TableRow, append_row, rewrite_atomically, truncate_torn_tail};
pub use wallet::{CsvTransactionLog, WALLET_HEADER};
