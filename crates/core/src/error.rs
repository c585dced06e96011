// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marquee_domain::{BookingId, DomainError, Money, SeatCode, UserId};
use thiserror::Error;

/// Errors raised by a durable store.
///
/// Stores report failures as text so the core stays independent of any
/// particular storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Reading or writing the underlying medium failed.
    #[error("I/O failure on {location}: {message}")]
    Io {
        /// File or resource involved.
        location: String,
        /// Underlying error text.
        message: String,
    },
    /// A persisted row could not be understood.
    #[error("Corrupt record in {location}: {reason}")]
    Corrupt {
        /// File and line, or other position.
        location: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A cancellation referenced a booking the log does not contain.
    #[error("Booking {0} is not in the booking log")]
    UnknownBooking(BookingId),
}

/// Errors that can occur while booking, cancelling, or moving money.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),
    /// A requested seat is malformed, outside the grid, or repeated.
    #[error("Invalid seat selection '{seat}': {reason}")]
    InvalidSeatSelection {
        /// The seat as entered.
        seat: String,
        /// Why it was rejected.
        reason: String,
    },
    /// A requested seat is already booked.
    #[error("Seat {seat} is already booked")]
    SeatUnavailable {
        /// The seat.
        seat: SeatCode,
    },
    /// The seat count is outside what the showtime can hold.
    #[error("Cannot book {requested} seats: between 1 and {available} are available")]
    InvalidSeatCount {
        /// Seats asked for.
        requested: usize,
        /// Seats currently free.
        available: usize,
    },
    /// The wallet cannot cover the debit.
    #[error("Insufficient funds for {user_id}: balance {balance}, required {required}")]
    InsufficientFunds {
        /// The account.
        user_id: UserId,
        /// Balance before the attempt.
        balance: Money,
        /// Amount that would have been debited.
        required: Money,
    },
    /// No booking with this id exists.
    #[error("Booking {0} not found")]
    BookingNotFound(BookingId),
    /// The booking belongs to another user.
    #[error("Booking {0} belongs to another user")]
    NotYourBooking(BookingId),
    /// The booking was cancelled before.
    #[error("Booking {0} is already cancelled")]
    AlreadyCancelled(BookingId),
    /// A durable write failed.
    ///
    /// `compensated` is true when the wallet was restored before the error
    /// was returned.
    #[error("Persistence failure: {source}")]
    PersistenceFailure {
        /// The store error.
        source: StoreError,
        /// Whether a compensating wallet entry was applied.
        compensated: bool,
    },
    /// An operation failed and undoing its wallet effect failed too.
    #[error("{original}; compensation also failed: {compensation}")]
    CompensationFailed {
        /// The error that triggered compensation.
        original: Box<CoreError>,
        /// The error raised by the compensating entry.
        compensation: Box<CoreError>,
    },
    /// Seats were released but the refund could not be credited.
    #[error("Seats for booking {booking_id} were released but the refund failed: {source}")]
    RefundFailed {
        /// The booking being cancelled.
        booking_id: BookingId,
        /// The wallet error.
        source: Box<CoreError>,
    },
    /// The person confirming is not the customer the flow was started for.
    #[error("Identity {0} does not match the customer making this booking")]
    IdentityMismatch(UserId),
    /// A booking flow step was called out of order.
    #[error("Booking flow is at {actual}, expected {expected}")]
    FlowOutOfOrder {
        /// The stage the step requires.
        expected: &'static str,
        /// The stage the flow is in.
        actual: &'static str,
    },
}

impl CoreError {
    /// Wraps a store error for a write that left nothing to compensate.
    #[must_use]
    pub const fn persistence(source: StoreError) -> Self {
        Self::PersistenceFailure {
            source,
            compensated: false,
        }
    }
}
