// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod booking;
mod catalog;
mod error;
mod seat;
mod seat_map;
mod types;
mod wallet;

#[cfg(test)]
mod tests;

pub use booking::{
    BOOKING_SCHEMA_VERSION, Booking, BookingRecord, BookingStatus, find_booking, project_bookings,
};
pub use catalog::{Catalog, Movie, Screen, ScreenStatus};
pub use error::{DomainError, UnavailableReason};
pub use seat::{SeatCode, SeatState};
pub use seat_map::{MAX_ROWS, SeatDetail, SeatMap, SeatRowView, validate_dimensions};
pub use types::{BookingId, Customer, Money, MovieId, ScreenId, Showtime, UserId};
pub use wallet::{
    COMPENSATION, DEPOSIT, OPENING_BALANCE, PURCHASE, REFUND, REFUND_REVERSAL, WalletTransaction,
};
