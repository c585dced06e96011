// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Generates a validated, non-empty string identifier newtype.
///
/// Values are trimmed; empty values and values containing the CSV
/// separators used by the flat-file stores are rejected.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            ///
            /// # Errors
            ///
            /// Returns an error if the value is empty or contains `,` or `;`.
            pub fn new(value: &str) -> Result<Self, DomainError> {
                let trimmed: &str = value.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::InvalidIdentifier {
                        kind: $kind,
                        reason: String::from("must not be empty"),
                    });
                }
                if trimmed.contains([',', ';']) {
                    return Err(DomainError::InvalidIdentifier {
                        kind: $kind,
                        reason: format!("'{trimmed}' must not contain ',' or ';'"),
                    });
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(&value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// Identifies a screen (auditorium), e.g. `SC1`.
    ScreenId,
    "screen id"
);

string_id!(
    /// Opaque user identity supplied by the identity provider.
    UserId,
    "user id"
);

string_id!(
    /// Unique booking identifier.
    ///
    /// New bookings use a UUID v4; migrated legacy bookings use `legacy-<row>`.
    BookingId,
    "booking id"
);

impl BookingId {
    /// Generates a fresh random booking identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// Numeric movie identifier assigned by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(u32);

impl MovieId {
    /// Creates a movie identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for MovieId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A show slot on a screen, stored canonically as zero-padded `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Showtime(String);

impl Showtime {
    /// Parses a 24 hour `H:MM` or `HH:MM` label.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidShowtime` if the label is not a valid time.
    pub fn new(label: &str) -> Result<Self, DomainError> {
        let trimmed: &str = label.trim();
        let invalid = || DomainError::InvalidShowtime(trimmed.to_string());

        let (hour_text, minute_text) = trimmed.split_once(':').ok_or_else(invalid)?;
        if hour_text.is_empty()
            || hour_text.len() > 2
            || minute_text.len() != 2
            || !hour_text.bytes().all(|b| b.is_ascii_digit())
            || !minute_text.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let hour: u8 = hour_text.parse().map_err(|_| invalid())?;
        let minute: u8 = minute_text.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }

        Ok(Self(format!("{hour:02}:{minute:02}")))
    }

    /// Returns the canonical label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Showtime {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Showtime> for String {
    fn from(value: Showtime) -> Self {
        value.0
    }
}

impl FromStr for Showtime {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl std::fmt::Display for Showtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A signed monetary amount in currency units.
///
/// Prices are strictly positive; wallet deltas may be negative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    /// Zero currency units.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Creates an amount of whole currency units.
    #[must_use]
    pub fn from_units(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Validates a ticket price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidPrice` unless the amount is greater than zero.
    pub fn price(amount: Decimal) -> Result<Self, DomainError> {
        if amount <= Decimal::ZERO {
            return Err(DomainError::InvalidPrice(amount.to_string()));
        }
        Ok(Self(amount))
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn amount(self) -> Decimal {
        self.0
    }

    /// Returns true when the amount is below zero.
    #[must_use]
    pub fn is_negative(self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Returns true when the amount is above zero.
    #[must_use]
    pub fn is_positive(self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the sum is out of range.
    pub fn checked_add(self, rhs: Self) -> Result<Self, DomainError> {
        self.0
            .checked_add(rhs.0)
            .map(Self)
            .ok_or_else(|| out_of_range(rhs))
    }

    /// Multiplies a per-seat price by a seat count.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the product is out of range.
    pub fn times(self, count: usize) -> Result<Self, DomainError> {
        self.0
            .checked_mul(Decimal::from(count))
            .map(Self)
            .ok_or_else(|| out_of_range(self))
    }

    /// Divides a total evenly across a seat count.
    ///
    /// Returns the total unchanged when `count` is zero. Dividing by a
    /// positive count never grows the magnitude, so this cannot overflow.
    #[must_use]
    pub fn split(self, count: usize) -> Self {
        if count == 0 {
            return self;
        }
        self.0
            .checked_div(Decimal::from(count))
            .map_or(self, Self)
    }
}

fn out_of_range(amount: Money) -> DomainError {
    DomainError::InvalidAmount {
        amount: amount.to_string(),
        reason: "amount out of range",
    }
}

impl std::ops::Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|_| DomainError::InvalidAmount {
                amount: s.to_string(),
                reason: "not a decimal number",
            })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// The validated identity of the person making a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Stable identity for the session.
    pub user_id: UserId,
    /// Display name recorded alongside bookings.
    pub name: String,
}

impl Customer {
    /// Creates a new customer identity.
    #[must_use]
    pub const fn new(user_id: UserId, name: String) -> Self {
        Self { user_id, name }
    }
}
