// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use marquee::{CoreError, StoreError};
use marquee_domain::DomainError;
use marquee_persistence::PersistenceError;
use thiserror::Error;

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Each variant maps to one response class at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// The request conflicts with the current state.
    #[error("Conflict ({rule}): {message}")]
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The caller may not act on this resource.
    #[error("Forbidden: '{action}': {message}")]
    Forbidden {
        /// The action that was attempted.
        action: String,
        /// A human-readable description.
        message: String,
    },
    /// The wallet cannot cover the charge.
    #[error("Payment required: {message}")]
    PaymentRequired {
        /// A human-readable description.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl ApiError {
    pub(crate) fn invalid(field: &str, message: impl std::fmt::Display) -> Self {
        Self::InvalidInput {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidSeatCode { .. } | DomainError::EmptySeatSelection => {
            ApiError::InvalidInput {
                field: String::from("seats"),
                message,
            }
        }
        DomainError::SeatUnavailable { .. } => ApiError::Conflict {
            rule: String::from("seat_available"),
            message,
        },
        DomainError::SeatNotBooked { .. } => ApiError::Conflict {
            rule: String::from("seat_booked"),
            message,
        },
        DomainError::InvalidDimensions { .. } => ApiError::InvalidInput {
            field: String::from("dimensions"),
            message,
        },
        DomainError::RowShapeMismatch { .. } | DomainError::InvalidSeatState(_) => {
            ApiError::Internal { message }
        }
        DomainError::InvalidIdentifier { kind, .. } => ApiError::InvalidInput {
            field: kind.replace(' ', "_"),
            message,
        },
        DomainError::InvalidShowtime(_) => ApiError::InvalidInput {
            field: String::from("showtime"),
            message,
        },
        DomainError::InvalidPrice(_) => ApiError::InvalidInput {
            field: String::from("price"),
            message,
        },
        DomainError::InvalidAmount { .. } => ApiError::InvalidInput {
            field: String::from("amount"),
            message,
        },
        DomainError::EmptyTitle => ApiError::InvalidInput {
            field: String::from("title"),
            message,
        },
        DomainError::InvalidScreenStatus(_) | DomainError::InvalidBookingStatus(_) => {
            ApiError::InvalidInput {
                field: String::from("status"),
                message,
            }
        }
        DomainError::ScreenNotFound(_) => ApiError::NotFound {
            resource_type: String::from("Screen"),
            message,
        },
        DomainError::ShowtimeNotFound { .. } => ApiError::NotFound {
            resource_type: String::from("Showtime"),
            message,
        },
        DomainError::MovieNotFound(_) => ApiError::NotFound {
            resource_type: String::from("Movie"),
            message,
        },
        DomainError::ScreenNotActive { .. } => ApiError::Conflict {
            rule: String::from("screen_active"),
            message,
        },
        DomainError::MovieInactive(_) => ApiError::Conflict {
            rule: String::from("movie_active"),
            message,
        },
        DomainError::DuplicateScreen(_) => ApiError::Conflict {
            rule: String::from("unique_screen"),
            message,
        },
        DomainError::DuplicateShowtime { .. } => ApiError::Conflict {
            rule: String::from("unique_showtime"),
            message,
        },
        DomainError::DuplicateMovie(_) => ApiError::Conflict {
            rule: String::from("unique_movie"),
            message,
        },
        DomainError::MultipleActiveMovies { .. } => ApiError::Conflict {
            rule: String::from("single_active_movie"),
            message,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let message: String = err.to_string();
    match err {
        CoreError::Domain(domain_err) => translate_domain_error(domain_err),
        CoreError::InvalidSeatSelection { .. } => ApiError::InvalidInput {
            field: String::from("seats"),
            message,
        },
        CoreError::InvalidSeatCount { .. } => ApiError::InvalidInput {
            field: String::from("seat_count"),
            message,
        },
        CoreError::SeatUnavailable { .. } => ApiError::Conflict {
            rule: String::from("seat_available"),
            message,
        },
        CoreError::AlreadyCancelled(_) => ApiError::Conflict {
            rule: String::from("booking_active"),
            message,
        },
        CoreError::FlowOutOfOrder { .. } => ApiError::Conflict {
            rule: String::from("flow_order"),
            message,
        },
        CoreError::InsufficientFunds { .. } => ApiError::PaymentRequired { message },
        CoreError::BookingNotFound(_) => ApiError::NotFound {
            resource_type: String::from("Booking"),
            message,
        },
        CoreError::NotYourBooking(_) => ApiError::Forbidden {
            action: String::from("cancel_booking"),
            message,
        },
        CoreError::IdentityMismatch(_) => ApiError::Forbidden {
            action: String::from("confirm_identity"),
            message,
        },
        CoreError::PersistenceFailure { .. }
        | CoreError::CompensationFailed { .. }
        | CoreError::RefundFailed { .. } => ApiError::Internal { message },
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        translate_core_error(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        translate_domain_error(err)
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        match err {
            PersistenceError::Domain(domain_err) => translate_domain_error(domain_err),
            other => Self::Internal {
                message: other.to_string(),
            },
        }
    }
}
