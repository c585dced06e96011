// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Operator-facing records for the box office.
//!
//! Nothing in the booking hot path is silently dropped. Failures that leave
//! the wallet and the booking log out of step produce a `Discrepancy` for an
//! operator to resolve; oddities found while replaying the booking log produce
//! a `ReconciliationWarning` and replay continues.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use marquee_domain::{BookingId, DomainError, Money, ScreenId, SeatCode, Showtime, UserId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// What went out of step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiscrepancyKind {
    /// A purchase debit could not be credited back after the booking failed.
    CompensationFailed,
    /// Seats were freed but the refund credit failed.
    RefundFailed,
    /// A refund was credited but neither the cancellation record nor the
    /// reversing debit could be written.
    RefundReversalFailed,
}

impl DiscrepancyKind {
    /// Converts this kind to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CompensationFailed => "CompensationFailed",
            Self::RefundFailed => "RefundFailed",
            Self::RefundReversalFailed => "RefundReversalFailed",
        }
    }
}

impl FromStr for DiscrepancyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CompensationFailed" => Ok(Self::CompensationFailed),
            "RefundFailed" => Ok(Self::RefundFailed),
            "RefundReversalFailed" => Ok(Self::RefundReversalFailed),
            _ => Err(DomainError::InvalidIdentifier {
                kind: "discrepancy kind",
                reason: format!("unknown kind '{s}'"),
            }),
        }
    }
}

impl std::fmt::Display for DiscrepancyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wallet/booking inconsistency that needs operator follow-up.
///
/// Discrepancies are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// When the discrepancy was detected.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// What went out of step.
    pub kind: DiscrepancyKind,
    /// The booking involved, when known.
    pub booking_id: Option<BookingId>,
    /// The affected user.
    pub user_id: UserId,
    /// The amount left unbalanced, when known.
    pub amount: Option<Money>,
    /// Human-readable description including the underlying error.
    pub detail: String,
}

impl Discrepancy {
    /// Creates a new `Discrepancy`.
    ///
    /// # Arguments
    ///
    /// * `timestamp` - When it was detected
    /// * `kind` - What went out of step
    /// * `user_id` - The affected user
    /// * `detail` - Description including the underlying error
    #[must_use]
    pub const fn new(
        timestamp: OffsetDateTime,
        kind: DiscrepancyKind,
        user_id: UserId,
        detail: String,
    ) -> Self {
        Self {
            timestamp,
            kind,
            booking_id: None,
            user_id,
            amount: None,
            detail,
        }
    }

    /// Attaches the booking involved.
    #[must_use]
    pub fn with_booking(mut self, booking_id: BookingId) -> Self {
        self.booking_id = Some(booking_id);
        self
    }

    /// Attaches the unbalanced amount.
    #[must_use]
    pub const fn with_amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }
}

/// A non-fatal oddity found while replaying the booking log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconciliationWarning {
    /// The record names a screen with no seat maps.
    UnknownScreen {
        /// The booking.
        booking_id: BookingId,
        /// The unknown screen.
        screen_id: ScreenId,
    },
    /// The record names a showtime the screen does not run.
    UnknownShowtime {
        /// The booking.
        booking_id: BookingId,
        /// The screen.
        screen_id: ScreenId,
        /// The unknown showtime.
        showtime: Showtime,
    },
    /// The record names a seat outside the screen's grid.
    InvalidSeat {
        /// The booking.
        booking_id: BookingId,
        /// The seat.
        seat: SeatCode,
    },
    /// The seat is already held by a different booking.
    SeatConflict {
        /// The booking being replayed.
        booking_id: BookingId,
        /// The seat.
        seat: SeatCode,
        /// The booking currently holding the seat, when known.
        holder: Option<BookingId>,
    },
    /// A cancellation names a seat that is already free.
    SeatAlreadyFree {
        /// The booking being cancelled.
        booking_id: BookingId,
        /// The seat.
        seat: SeatCode,
    },
    /// A seat snapshot was present but could not be used.
    SnapshotRejected {
        /// Why it was rejected.
        reason: String,
    },
    /// An interrupted append left a partial row at the end of a log; it was
    /// removed.
    TruncatedRow {
        /// The log file.
        file: String,
        /// Line number of the removed fragment.
        line: u64,
    },
}

impl std::fmt::Display for ReconciliationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownScreen {
                booking_id,
                screen_id,
            } => write!(f, "booking {booking_id}: unknown screen '{screen_id}'"),
            Self::UnknownShowtime {
                booking_id,
                screen_id,
                showtime,
            } => write!(
                f,
                "booking {booking_id}: screen '{screen_id}' has no showtime {showtime}"
            ),
            Self::InvalidSeat { booking_id, seat } => {
                write!(f, "booking {booking_id}: seat {seat} is not on the screen")
            }
            Self::SeatConflict {
                booking_id,
                seat,
                holder,
            } => match holder {
                Some(holder) => write!(
                    f,
                    "booking {booking_id}: seat {seat} already held by booking {holder}"
                ),
                None => write!(f, "booking {booking_id}: seat {seat} already held"),
            },
            Self::SeatAlreadyFree { booking_id, seat } => {
                write!(f, "booking {booking_id}: seat {seat} was already free")
            }
            Self::SnapshotRejected { reason } => write!(f, "seat snapshot rejected: {reason}"),
            Self::TruncatedRow { file, line } => {
                write!(f, "{file}: removed partial row at line {line}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_discrepancy_builder_attaches_booking_and_amount() {
        let discrepancy: Discrepancy = Discrepancy::new(
            datetime!(2026-03-01 12:00 UTC),
            DiscrepancyKind::RefundFailed,
            UserId::new("alice").unwrap(),
            String::from("ledger write failed"),
        )
        .with_booking(BookingId::new("b1").unwrap())
        .with_amount(Money::from_units(400));

        assert_eq!(discrepancy.kind, DiscrepancyKind::RefundFailed);
        assert_eq!(discrepancy.booking_id.unwrap().as_str(), "b1");
        assert_eq!(discrepancy.amount, Some(Money::from_units(400)));
    }

    #[test]
    fn test_discrepancy_kind_round_trips_through_text() {
        for kind in [
            DiscrepancyKind::CompensationFailed,
            DiscrepancyKind::RefundFailed,
            DiscrepancyKind::RefundReversalFailed,
        ] {
            assert_eq!(kind.as_str().parse::<DiscrepancyKind>().unwrap(), kind);
        }
        assert!("Oops".parse::<DiscrepancyKind>().is_err());
    }

    #[test]
    fn test_warning_messages_name_the_booking() {
        let warning: ReconciliationWarning = ReconciliationWarning::UnknownShowtime {
            booking_id: BookingId::new("b9").unwrap(),
            screen_id: ScreenId::new("SC1").unwrap(),
            showtime: Showtime::new("23:00").unwrap(),
        };
        assert_eq!(
            warning.to_string(),
            "booking b9: screen 'SC1' has no showtime 23:00"
        );

        let conflict: ReconciliationWarning = ReconciliationWarning::SeatConflict {
            booking_id: BookingId::new("b2").unwrap(),
            seat: SeatCode::parse("A0").unwrap(),
            holder: Some(BookingId::new("b1").unwrap()),
        };
        assert!(conflict.to_string().contains("already held by booking b1"));
    }
}
