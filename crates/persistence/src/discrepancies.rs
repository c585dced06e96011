// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::fields::{format_money, format_timestamp, parse_timestamp};
use crate::table::{Table, TableRow, append_row};
use marquee::{DiscrepancyJournal, StoreError};
use marquee_audit::Discrepancy;
use std::path::{Path, PathBuf};

/// Column order of `discrepancies.csv`.
pub const DISCREPANCIES_HEADER: [&str; 6] =
    ["Timestamp", "Kind", "BookingID", "UserID", "Amount", "Detail"];

/// Discrepancy journal stored as a CSV file for operators to work through.
#[derive(Debug, Clone)]
pub struct CsvDiscrepancyJournal {
    path: PathBuf,
}

impl CsvDiscrepancyJournal {
    /// Creates a journal over `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file backing the journal.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every recorded discrepancy, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row does not parse.
    pub fn read_all(&self) -> Result<Vec<Discrepancy>, PersistenceError> {
        let table: Table = Table::read(&self.path, &DISCREPANCIES_HEADER)?;
        table.rows().map(|row| decode(&row)).collect()
    }

    /// Appends one discrepancy.
    ///
    /// # Errors
    ///
    /// Returns an error if the row cannot be written.
    pub fn write(&self, discrepancy: &Discrepancy) -> Result<(), PersistenceError> {
        let row: Vec<String> = vec![
            format_timestamp(&self.path, discrepancy.timestamp)?,
            discrepancy.kind.as_str().to_string(),
            discrepancy
                .booking_id
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default(),
            discrepancy.user_id.to_string(),
            discrepancy.amount.map(format_money).unwrap_or_default(),
            discrepancy.detail.clone(),
        ];
        append_row(&self.path, &DISCREPANCIES_HEADER, &row)
    }
}

impl DiscrepancyJournal for CsvDiscrepancyJournal {
    fn record(&mut self, discrepancy: &Discrepancy) -> Result<(), StoreError> {
        Ok(self.write(discrepancy)?)
    }
}

fn decode(row: &TableRow<'_>) -> Result<Discrepancy, PersistenceError> {
    let mut discrepancy: Discrepancy = Discrepancy::new(
        parse_timestamp(row, "Timestamp")?,
        row.parse("Kind")?,
        row.parse("UserID")?,
        row.optional("Detail").unwrap_or_default().to_string(),
    );
    if row.optional("BookingID").is_some() {
        discrepancy = discrepancy.with_booking(row.parse("BookingID")?);
    }
    if row.optional("Amount").is_some() {
        discrepancy = discrepancy.with_amount(row.parse("Amount")?);
    }
    Ok(discrepancy)
}
