// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A seat identified by row letter and zero-based column, e.g. `A3`.
///
/// Parsing normalises the row letter to upper case and requires the column
/// to be written exactly as the screen labels it: decimal digits with no
/// sign, padding, or leading zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatCode {
    row: char,
    column: u16,
}

impl SeatCode {
    /// Creates a seat code from a row letter and column index.
    #[must_use]
    pub const fn new(row: char, column: u16) -> Self {
        Self {
            row: row.to_ascii_uppercase(),
            column,
        }
    }

    /// Parses seat code text such as `a3` or `B10`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeatCode` if the text is not a row letter
    /// followed by a canonical column number.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        let invalid = |reason: &'static str| DomainError::InvalidSeatCode {
            code: text.to_string(),
            reason,
        };

        let mut chars = text.chars();
        let row: char = chars.next().ok_or_else(|| invalid("empty seat code"))?;
        if !row.is_ascii_alphabetic() {
            return Err(invalid("row must be a letter"));
        }

        let column_text: &str = chars.as_str();
        if column_text.is_empty() {
            return Err(invalid("missing column number"));
        }
        if !column_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("column must be a number"));
        }
        if column_text.len() > 1 && column_text.starts_with('0') {
            return Err(invalid("column must not have leading zeros"));
        }
        let column: u16 = column_text
            .parse()
            .map_err(|_| invalid("column out of range"))?;

        Ok(Self::new(row, column))
    }

    /// Returns the upper-case row letter.
    #[must_use]
    pub const fn row(self) -> char {
        self.row
    }

    /// Returns the zero-based column index.
    #[must_use]
    pub const fn column(self) -> u16 {
        self.column
    }

    /// Returns the zero-based row index (`A` is 0).
    #[must_use]
    pub fn row_index(self) -> usize {
        u32::from(self.row).saturating_sub(u32::from('A')) as usize
    }
}

impl FromStr for SeatCode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SeatCode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SeatCode> for String {
    fn from(value: SeatCode) -> Self {
        value.to_string()
    }
}

impl std::fmt::Display for SeatCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.row, self.column)
    }
}

/// The state of one seat for one showtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatState {
    /// Free to book.
    Empty,
    /// Held by a booking.
    Booked,
}

impl SeatState {
    /// Returns the compact token used in seat snapshots (`0` or `X`).
    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Empty => '0',
            Self::Booked => 'X',
        }
    }

    /// Parses a snapshot token.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeatState` for anything but `0` or `X`.
    pub fn from_token(token: &str) -> Result<Self, DomainError> {
        match token.trim() {
            "0" => Ok(Self::Empty),
            "X" | "x" => Ok(Self::Booked),
            other => Err(DomainError::InvalidSeatState(other.to_string())),
        }
    }
}
