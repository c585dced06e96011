// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversion of the old booking log into versioned records.
//!
//! The old log has no booking ids and no schema version:
//!
//! ```text
//! Date,UserName,UID,ScreenID,Show_Timing,Seat_Numbers,Movie_Name,Total_Price,Ticket_Status
//! 2025-03-01,Asha,asha,SC1,10:00,"['A0', 'A1']",Dune,400,booked
//! 2025-03-02,Asha,asha,SC1,10:00,['A1'],Dune,-200,cancelled
//! ```
//!
//! Cancellations there name the seats they release rather than a booking, and
//! may release only some of a booking's seats. Each one is matched to the
//! newest still-active booking of the same user, screen, and showtime that
//! holds those seats. A partial cancellation cancels the whole booking and
//! books the remaining seats again under a new id at the same per-seat price.

use crate::error::PersistenceError;
use crate::fields::parse_date;
use crate::table::{Table, TableRow};
use marquee_domain::{
    BookingId, BookingRecord, BookingStatus, Catalog, Money, Movie, ScreenId, SeatCode, Showtime,
    UserId,
};
use std::path::Path;
use time::OffsetDateTime;
use tracing::{info, warn};

const LEGACY_REQUIRED: [&str; 6] = [
    "Date",
    "UID",
    "Show_Timing",
    "Seat_Numbers",
    "Movie_Name",
    "Ticket_Status",
];

/// A legacy row that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Line in the legacy file.
    pub line: u64,
    /// Why it was skipped.
    pub reason: String,
}

/// The outcome of a migration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    /// Converted records in log order.
    pub records: Vec<BookingRecord>,
    /// Rows that were left out.
    pub skipped: Vec<SkippedRow>,
}

/// Checks whether a booking file uses the old unversioned layout.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn is_legacy_booking_log(path: &Path) -> Result<bool, PersistenceError> {
    let table: Table = Table::read(path, &[])?;
    Ok(table.has_column("Ticket_Status") && !table.has_column("SchemaVersion"))
}

/// Converts an old booking log into version-2 records.
///
/// Movie names are resolved through `catalog`; a row without a `ScreenID`
/// takes the movie's screen. Unconvertible rows are reported in
/// [`MigrationReport::skipped`] and do not stop the migration.
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks a required column.
pub fn migrate_legacy_bookings(
    path: &Path,
    catalog: &Catalog,
) -> Result<MigrationReport, PersistenceError> {
    let table: Table = Table::read(path, &LEGACY_REQUIRED)?;
    let mut migration: Migration<'_> = Migration {
        catalog,
        report: MigrationReport::default(),
        active: Vec::new(),
    };
    for row in table.rows() {
        if let Err(err) = migration.convert(&row) {
            let reason: String = match err {
                PersistenceError::Malformed { reason, .. } => reason,
                other => other.to_string(),
            };
            warn!(line = row.line(), reason = %reason, "Legacy booking row skipped");
            migration.report.skipped.push(SkippedRow {
                line: row.line(),
                reason,
            });
        }
    }
    info!(
        records = migration.report.records.len(),
        skipped = migration.report.skipped.len(),
        "Legacy booking log migrated"
    );
    Ok(migration.report)
}

struct Migration<'a> {
    catalog: &'a Catalog,
    report: MigrationReport,
    active: Vec<BookingRecord>,
}

impl Migration<'_> {
    fn convert(&mut self, row: &TableRow<'_>) -> Result<(), PersistenceError> {
        let user_id: UserId = row.parse("UID")?;
        let showtime: Showtime = row.parse("Show_Timing")?;
        let seats: Vec<SeatCode> = parse_seat_list(row)?;
        let timestamp: OffsetDateTime = match row.optional("Date") {
            Some(value) => parse_date(row, value)?.midnight().assume_utc(),
            None => OffsetDateTime::UNIX_EPOCH,
        };
        let title: &str = row.text("Movie_Name")?;
        let movie: &Movie = self
            .catalog
            .movie_by_title(title)
            .ok_or_else(|| row.malformed(format!("movie '{title}' is not in the catalog")))?;
        let screen_id: ScreenId = match row.optional("ScreenID") {
            Some(_) => row.parse("ScreenID")?,
            None => movie.screen_id.clone(),
        };

        match row.parse::<BookingStatus>("Ticket_Status")? {
            BookingStatus::Booked => {
                let total_price: Money = match row.optional("Total_Price") {
                    Some(_) => row.parse("Total_Price")?,
                    None => movie
                        .price
                        .times(seats.len())
                        .map_err(|err| row.malformed(err.to_string()))?,
                };
                let record: BookingRecord = BookingRecord {
                    booking_id: legacy_id(row.line()),
                    timestamp,
                    user_id,
                    user_name: row.optional("UserName").unwrap_or_default().to_string(),
                    screen_id,
                    showtime,
                    seats,
                    movie_id: movie.id,
                    total_price,
                    status: BookingStatus::Booked,
                    cancelled_at: None,
                };
                self.active.push(record.clone());
                self.report.records.push(record);
            }
            BookingStatus::Cancelled => {
                let position: usize = self
                    .active
                    .iter()
                    .rposition(|booking| {
                        booking.user_id == user_id
                            && booking.screen_id == screen_id
                            && booking.showtime == showtime
                            && seats.iter().all(|seat| booking.seats.contains(seat))
                    })
                    .ok_or_else(|| row.malformed("no active booking holds these seats"))?;
                let booking: BookingRecord = self.active.remove(position);
                self.cancel(&booking, &seats, timestamp, row.line())?;
            }
        }
        Ok(())
    }

    fn cancel(
        &mut self,
        booking: &BookingRecord,
        released: &[SeatCode],
        timestamp: OffsetDateTime,
        line: u64,
    ) -> Result<(), PersistenceError> {
        let mut cancellation: BookingRecord = booking.clone();
        cancellation.timestamp = timestamp;
        cancellation.status = BookingStatus::Cancelled;
        cancellation.cancelled_at = Some(timestamp);
        self.report.records.push(cancellation);

        let remaining: Vec<SeatCode> = booking
            .seats
            .iter()
            .filter(|seat| !released.contains(seat))
            .copied()
            .collect();
        if remaining.is_empty() {
            return Ok(());
        }
        let per_seat: Money = booking.total_price.split(booking.seats.len());
        let mut rebooked: BookingRecord = booking.clone();
        rebooked.booking_id = legacy_id(line);
        rebooked.timestamp = timestamp;
        rebooked.total_price = per_seat.times(remaining.len())?;
        rebooked.seats = remaining;
        self.active.push(rebooked.clone());
        self.report.records.push(rebooked);
        Ok(())
    }
}

fn legacy_id(line: u64) -> BookingId {
    // Digits and a hyphen always make a valid id.
    BookingId::new(&format!("legacy-{line}")).unwrap_or_else(|_| BookingId::generate())
}

/// Parses `['A0', 'A1']`, `A0;A1`, or a bare `A0`.
fn parse_seat_list(row: &TableRow<'_>) -> Result<Vec<SeatCode>, PersistenceError> {
    let raw: &str = row.text("Seat_Numbers")?;
    let inner: &str = raw.trim().trim_start_matches('[').trim_end_matches(']');
    let seats: Vec<SeatCode> = inner
        .split([',', ';'])
        .map(|code| code.trim().trim_matches(|c: char| c == '\'' || c == '"').trim())
        .filter(|code| !code.is_empty())
        .map(|code| SeatCode::parse(code).map_err(|err| row.malformed(err.to_string())))
        .collect::<Result<_, _>>()?;
    if seats.is_empty() {
        return Err(row.malformed("no seats listed"));
    }
    Ok(seats)
}
