// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking records and the bookings projected from them.
//!
//! The booking log is append-only. A booking starts as one `Booked` record;
//! cancelling it appends a second record with the same booking id and status
//! `Cancelled`. `project_bookings` folds the log into one `Booking` per id.

use crate::error::DomainError;
use crate::seat::SeatCode;
use crate::types::{BookingId, Money, MovieId, ScreenId, Showtime, UserId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::str::FromStr;
use time::OffsetDateTime;

/// Current version of the persisted booking record layout.
pub const BOOKING_SCHEMA_VERSION: u8 = 2;

/// Status carried by a booking record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Seats are held and paid for.
    Booked,
    /// Seats were released and refunded.
    Cancelled,
}

impl BookingStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Booked => "BOOKED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BOOKED" => Ok(Self::Booked),
            "CANCELLED" | "CANCELED" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidBookingStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the append-only booking log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRecord {
    /// The booking this record belongs to.
    pub booking_id: BookingId,
    /// When this record was written.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// The booking owner.
    pub user_id: UserId,
    /// The owner's display name at booking time.
    pub user_name: String,
    /// The screen.
    pub screen_id: ScreenId,
    /// The showtime.
    pub showtime: Showtime,
    /// The seats, all distinct.
    pub seats: Vec<SeatCode>,
    /// The movie booked.
    pub movie_id: MovieId,
    /// Price paid for all seats at booking time.
    pub total_price: Money,
    /// Record status.
    pub status: BookingStatus,
    /// Cancellation time, present on cancellation records.
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
}

impl BookingRecord {
    /// Builds the cancellation record for an existing booking.
    ///
    /// The cancellation copies the original seats and price so the log alone
    /// is enough to compute the refund.
    #[must_use]
    pub fn cancellation_of(booking: &Booking, cancelled_at: OffsetDateTime) -> Self {
        Self {
            booking_id: booking.id.clone(),
            timestamp: cancelled_at,
            user_id: booking.user_id.clone(),
            user_name: booking.user_name.clone(),
            screen_id: booking.screen_id.clone(),
            showtime: booking.showtime.clone(),
            seats: booking.seats.clone(),
            movie_id: booking.movie_id,
            total_price: booking.total_price,
            status: BookingStatus::Cancelled,
            cancelled_at: Some(cancelled_at),
        }
    }
}

/// A booking as currently known, after folding its cancellation (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking id.
    pub id: BookingId,
    /// Creation time.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Owner.
    pub user_id: UserId,
    /// Owner display name at booking time.
    pub user_name: String,
    /// Screen.
    pub screen_id: ScreenId,
    /// Showtime.
    pub showtime: Showtime,
    /// Movie.
    pub movie_id: MovieId,
    /// Seats in selection order.
    pub seats: Vec<SeatCode>,
    /// Price paid for all seats.
    pub total_price: Money,
    /// Current status.
    pub status: BookingStatus,
    /// Present iff cancelled.
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
}

impl Booking {
    /// Checks whether the booking still holds its seats.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Booked
    }

    /// Returns the per-seat price paid.
    #[must_use]
    pub fn price_per_seat(&self) -> Money {
        self.total_price.split(self.seats.len())
    }

    /// Builds the initial log record for this booking.
    #[must_use]
    pub fn to_record(&self) -> BookingRecord {
        BookingRecord {
            booking_id: self.id.clone(),
            timestamp: self.created_at,
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            screen_id: self.screen_id.clone(),
            showtime: self.showtime.clone(),
            seats: self.seats.clone(),
            movie_id: self.movie_id,
            total_price: self.total_price,
            status: BookingStatus::Booked,
            cancelled_at: None,
        }
    }

    fn from_record(record: &BookingRecord) -> Self {
        Self {
            id: record.booking_id.clone(),
            created_at: record.timestamp,
            user_id: record.user_id.clone(),
            user_name: record.user_name.clone(),
            screen_id: record.screen_id.clone(),
            showtime: record.showtime.clone(),
            movie_id: record.movie_id,
            seats: record.seats.clone(),
            total_price: record.total_price,
            status: BookingStatus::Booked,
            cancelled_at: None,
        }
    }
}

/// Folds the booking log into one booking per id, in creation order.
///
/// Later duplicate `Booked` records for an id are ignored. A `Cancelled`
/// record cancels the booking it names if that booking is still active;
/// cancellations for unknown ids are ignored.
#[must_use]
pub fn project_bookings(records: &[BookingRecord]) -> Vec<Booking> {
    let mut bookings: Vec<Booking> = Vec::new();
    let mut index: HashMap<&BookingId, usize> = HashMap::new();

    for record in records {
        match record.status {
            BookingStatus::Booked => {
                if !index.contains_key(&record.booking_id) {
                    index.insert(&record.booking_id, bookings.len());
                    bookings.push(Booking::from_record(record));
                }
            }
            BookingStatus::Cancelled => {
                if let Some(position) = index.get(&record.booking_id)
                    && let Some(booking) = bookings.get_mut(*position)
                    && booking.is_active()
                {
                    booking.status = BookingStatus::Cancelled;
                    booking.cancelled_at = Some(record.cancelled_at.unwrap_or(record.timestamp));
                }
            }
        }
    }

    bookings
}

/// Finds one booking in the log by id.
#[must_use]
pub fn find_booking(records: &[BookingRecord], booking_id: &BookingId) -> Option<Booking> {
    project_bookings(records)
        .into_iter()
        .find(|booking| &booking.id == booking_id)
}
