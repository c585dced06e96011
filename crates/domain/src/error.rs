// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;

/// Why a seat could not be booked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    /// The seat is already held by a booking.
    AlreadyBooked,
    /// The seat code does not exist on this screen.
    OutsideGrid,
}

impl std::fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AlreadyBooked => write!(f, "already booked"),
            Self::OutsideGrid => write!(f, "not a seat on this screen"),
        }
    }
}

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Seat code text could not be parsed.
    #[error("Invalid seat code '{code}': {reason}")]
    InvalidSeatCode {
        /// The rejected input.
        code: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Seat cannot be booked.
    #[error("Seat {seat} is unavailable: {reason}")]
    SeatUnavailable {
        /// The seat code.
        seat: String,
        /// Why the seat cannot be booked.
        reason: UnavailableReason,
    },
    /// Seat is not currently booked.
    #[error("Seat {seat} is not booked")]
    SeatNotBooked {
        /// The seat code.
        seat: String,
    },
    /// Screen dimensions are out of range.
    #[error("Invalid screen dimensions {rows}x{cols}: rows must be 1-26 and columns at least 1")]
    InvalidDimensions {
        /// Requested row count.
        rows: u16,
        /// Requested column count.
        cols: u16,
    },
    /// Seat row in a restored grid has the wrong shape.
    #[error("Row {row} expected {expected} seats but got {actual}")]
    RowShapeMismatch {
        /// The row letter.
        row: char,
        /// Configured column count.
        expected: usize,
        /// Column count supplied.
        actual: usize,
    },
    /// Seat state token is neither `0` nor `X`.
    #[error("Invalid seat state '{0}': expected 0 or X")]
    InvalidSeatState(String),
    /// Identifier is empty or malformed.
    #[error("Invalid {kind}: {reason}")]
    InvalidIdentifier {
        /// What kind of identifier was rejected.
        kind: &'static str,
        /// Why it was rejected.
        reason: String,
    },
    /// Showtime label is not a 24 hour `HH:MM` time.
    #[error("Invalid showtime '{0}': expected HH:MM")]
    InvalidShowtime(String),
    /// Price must be strictly positive.
    #[error("Invalid price {0}: must be greater than zero")]
    InvalidPrice(String),
    /// Monetary amount is not acceptable for the operation.
    #[error("Invalid amount {amount}: {reason}")]
    InvalidAmount {
        /// The rejected amount.
        amount: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Movie title is empty.
    #[error("Movie title must not be empty")]
    EmptyTitle,
    /// Screen does not exist.
    #[error("Screen '{0}' not found")]
    ScreenNotFound(String),
    /// Screen exists but is not accepting bookings.
    #[error("Screen '{screen_id}' is not active (status: {status})")]
    ScreenNotActive {
        /// The screen identifier.
        screen_id: String,
        /// The current status.
        status: String,
    },
    /// Showtime does not exist on the screen.
    #[error("Showtime '{showtime}' not found on screen '{screen_id}'")]
    ShowtimeNotFound {
        /// The screen identifier.
        screen_id: String,
        /// The showtime label.
        showtime: String,
    },
    /// Screen already exists.
    #[error("Screen '{0}' already exists")]
    DuplicateScreen(String),
    /// Showtime already configured on the screen.
    #[error("Showtime '{showtime}' already exists on screen '{screen_id}'")]
    DuplicateShowtime {
        /// The screen identifier.
        screen_id: String,
        /// The showtime label.
        showtime: String,
    },
    /// Movie does not exist.
    #[error("Movie {0} not found")]
    MovieNotFound(u32),
    /// Movie exists but is not active.
    #[error("Movie {0} is not active")]
    MovieInactive(u32),
    /// Movie identifier used twice.
    #[error("Movie {0} already exists")]
    DuplicateMovie(u32),
    /// More than one active movie bound to one screen.
    #[error("Screen '{screen_id}' has more than one active movie ({first}, {second})")]
    MultipleActiveMovies {
        /// The screen identifier.
        screen_id: String,
        /// The first active movie.
        first: u32,
        /// The second active movie.
        second: u32,
    },
    /// Unrecognised screen status label.
    #[error("Invalid screen status '{0}'")]
    InvalidScreenStatus(String),
    /// Unrecognised booking status label.
    #[error("Invalid booking status '{0}'")]
    InvalidBookingStatus(String),
    /// A booking must cover at least one seat.
    #[error("A booking must include at least one seat")]
    EmptySeatSelection,
}
