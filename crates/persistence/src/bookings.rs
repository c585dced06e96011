// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The append-only booking log, `bookings.csv`.

use crate::error::PersistenceError;
use crate::fields::{
    format_money, format_optional_timestamp, format_timestamp, parse_optional_timestamp,
    parse_timestamp,
};
use crate::table::{Table, TableRow, append_row, rewrite_atomically};
use marquee::{BookingRecordStore, StoreError};
use marquee_domain::{BOOKING_SCHEMA_VERSION, BookingRecord, BookingStatus, MovieId, SeatCode};
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use tracing::debug;

/// Column order of `bookings.csv`.
pub const BOOKINGS_HEADER: [&str; 12] = [
    "SchemaVersion",
    "BookingID",
    "Timestamp",
    "UserID",
    "UserName",
    "ScreenID",
    "ShowTime",
    "SeatNumbers",
    "MovieID",
    "TotalPrice",
    "Status",
    "CancelledAt",
];

/// Booking log stored as a CSV file.
#[derive(Debug, Clone)]
pub struct CsvBookingStore {
    path: PathBuf,
}

impl CsvBookingStore {
    /// Creates a store over `path`. The file is created on first append.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every record in file order.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, uses another schema
    /// version, or holds a row that does not parse.
    pub fn read(&self) -> Result<Vec<BookingRecord>, PersistenceError> {
        let table: Table = Table::read(&self.path, &BOOKINGS_HEADER)?;
        table.rows().map(|row| decode(&row)).collect()
    }

    /// Appends one record.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be encoded or written.
    pub fn write(&self, record: &BookingRecord) -> Result<(), PersistenceError> {
        let row: Vec<String> = encode(&self.path, record)?;
        append_row(&self.path, &BOOKINGS_HEADER, &row)?;
        debug!(
            booking_id = %record.booking_id,
            status = %record.status,
            "Booking record appended"
        );
        Ok(())
    }

    /// Replaces the whole log. Only used when migrating an old log.
    ///
    /// # Errors
    ///
    /// Returns an error if the records cannot be encoded or the file cannot
    /// be rewritten.
    pub fn replace_all(&self, records: &[BookingRecord]) -> Result<(), PersistenceError> {
        let rows: Vec<Vec<String>> = records
            .iter()
            .map(|record| encode(&self.path, record))
            .collect::<Result<_, _>>()?;
        rewrite_atomically(&self.path, &BOOKINGS_HEADER, &rows)
    }
}

impl BookingRecordStore for CsvBookingStore {
    fn append(&mut self, record: &BookingRecord) -> Result<(), StoreError> {
        Ok(self.write(record)?)
    }

    fn load_all(&self) -> Result<Vec<BookingRecord>, StoreError> {
        Ok(self.read()?)
    }
}

fn encode(path: &Path, record: &BookingRecord) -> Result<Vec<String>, PersistenceError> {
    let seats: Vec<String> = record.seats.iter().map(ToString::to_string).collect();
    Ok(vec![
        BOOKING_SCHEMA_VERSION.to_string(),
        record.booking_id.to_string(),
        format_timestamp(path, record.timestamp)?,
        record.user_id.to_string(),
        record.user_name.clone(),
        record.screen_id.to_string(),
        record.showtime.to_string(),
        seats.join(";"),
        record.movie_id.value().to_string(),
        format_money(record.total_price),
        record.status.as_str().to_string(),
        format_optional_timestamp(path, record.cancelled_at)?,
    ])
}

fn decode(row: &TableRow<'_>) -> Result<BookingRecord, PersistenceError> {
    let version: u8 = row.parse("SchemaVersion")?;
    if version != BOOKING_SCHEMA_VERSION {
        return Err(row.malformed(format!(
            "schema version {version} is not {BOOKING_SCHEMA_VERSION}; migrate the log first"
        )));
    }
    let seats: Vec<SeatCode> = row
        .text("SeatNumbers")?
        .split(';')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(|code| SeatCode::parse(code).map_err(|err| row.malformed(err.to_string())))
        .collect::<Result<_, _>>()?;
    let status: BookingStatus = row.parse("Status")?;
    let cancelled_at: Option<OffsetDateTime> = parse_optional_timestamp(row, "CancelledAt")?;
    if status == BookingStatus::Cancelled && cancelled_at.is_none() {
        return Err(row.malformed("cancelled record has no CancelledAt"));
    }

    Ok(BookingRecord {
        booking_id: row.parse("BookingID")?,
        timestamp: parse_timestamp(row, "Timestamp")?,
        user_id: row.parse("UserID")?,
        user_name: row.optional("UserName").unwrap_or_default().to_string(),
        screen_id: row.parse("ScreenID")?,
        showtime: row.parse("ShowTime")?,
        seats,
        movie_id: MovieId::new(row.parse("MovieID")?),
        total_price: row.parse("TotalPrice")?,
        status,
        cancelled_at,
    })
}
