// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The per-(screen, showtime) seat grid.
//!
//! A `SeatMap` is the unit of mutation for booking and cancellation. It keeps
//! the grid of seat states, the booking detail for each booked seat, and a
//! running available count.
//!
//! Invariant: `available_count() + booked_count() == capacity()` after every
//! operation.

use crate::error::{DomainError, UnavailableReason};
use crate::seat::{SeatCode, SeatState};
use crate::types::{BookingId, Money, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// The largest number of rows a screen may have (`A` through `Z`).
pub const MAX_ROWS: u16 = 26;

/// Who holds a booked seat and what they paid for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatDetail {
    /// The booking holding this seat.
    pub booking_id: BookingId,
    /// The user who booked it.
    pub user_id: UserId,
    /// The user's display name at booking time.
    pub user_name: String,
    /// The per-seat price paid.
    pub price_paid: Money,
    /// When the booking was made.
    #[serde(with = "time::serde::rfc3339")]
    pub booked_at: OffsetDateTime,
}

/// A read-only view of one row of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRowView {
    /// The row letter.
    pub row: char,
    /// Seat states in column order.
    pub seats: Vec<SeatState>,
}

/// Seat states for one screen at one showtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    rows: u16,
    cols: u16,
    grid: Vec<Vec<SeatState>>,
    details: BTreeMap<SeatCode, SeatDetail>,
    available: usize,
}

impl SeatMap {
    /// Creates a grid with every seat empty.
    ///
    /// # Arguments
    ///
    /// * `rows` - Number of rows, 1 to 26
    /// * `cols` - Number of columns, at least 1
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDimensions` if either dimension is out of range.
    pub fn create(rows: u16, cols: u16) -> Result<Self, DomainError> {
        validate_dimensions(rows, cols)?;
        let grid: Vec<Vec<SeatState>> =
            vec![vec![SeatState::Empty; usize::from(cols)]; usize::from(rows)];
        Ok(Self {
            rows,
            cols,
            grid,
            details: BTreeMap::new(),
            available: usize::from(rows) * usize::from(cols),
        })
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn rows(&self) -> u16 {
        self.rows
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn cols(&self) -> u16 {
        self.cols
    }

    /// Returns the total number of seats.
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }

    /// Returns the number of empty seats.
    #[must_use]
    pub const fn available_count(&self) -> usize {
        self.available
    }

    /// Returns the number of booked seats, counted from the grid.
    #[must_use]
    pub fn booked_count(&self) -> usize {
        self.grid
            .iter()
            .flatten()
            .filter(|state| **state == SeatState::Booked)
            .count()
    }

    /// Returns the row letters in order.
    pub fn row_labels(&self) -> impl Iterator<Item = char> + '_ {
        (0..self.rows).filter_map(|index| char::from_u32(u32::from('A') + u32::from(index)))
    }

    /// Returns the column labels in order (`"0"`, `"1"`, ...).
    #[must_use]
    pub fn column_labels(&self) -> Vec<String> {
        (0..self.cols).map(|column| column.to_string()).collect()
    }

    /// Checks whether a seat code falls inside this grid.
    #[must_use]
    pub fn is_valid_seat(&self, code: SeatCode) -> bool {
        code.row().is_ascii_uppercase()
            && code.row_index() < usize::from(self.rows)
            && code.column() < self.cols
    }

    /// Parses seat code text and checks it against this grid.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSeatCode` if the text is malformed or names
    /// a seat outside the grid.
    pub fn parse_seat(&self, text: &str) -> Result<SeatCode, DomainError> {
        let code: SeatCode = SeatCode::parse(text)?;
        let column_label: String = code.column().to_string();
        if !self.is_valid_seat(code) || !self.column_labels().contains(&column_label) {
            return Err(DomainError::InvalidSeatCode {
                code: text.to_string(),
                reason: "not a seat on this screen",
            });
        }
        Ok(code)
    }

    /// Returns the state of a seat, or `None` if the code is outside the grid.
    #[must_use]
    pub fn state(&self, code: SeatCode) -> Option<SeatState> {
        if !self.is_valid_seat(code) {
            return None;
        }
        Some(self.grid[code.row_index()][usize::from(code.column())])
    }

    /// Checks whether a seat exists and is empty.
    #[must_use]
    pub fn is_available(&self, code: SeatCode) -> bool {
        self.state(code) == Some(SeatState::Empty)
    }

    /// Returns the booking detail for a seat, if it is booked and the detail is known.
    #[must_use]
    pub fn detail(&self, code: SeatCode) -> Option<&SeatDetail> {
        self.details.get(&code)
    }

    /// Books a seat.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SeatUnavailable` if the seat is outside the grid or
    /// already booked. The map is unchanged on error.
    pub fn book(&mut self, code: SeatCode, detail: SeatDetail) -> Result<(), DomainError> {
        match self.state(code) {
            None => Err(DomainError::SeatUnavailable {
                seat: code.to_string(),
                reason: UnavailableReason::OutsideGrid,
            }),
            Some(SeatState::Booked) => Err(DomainError::SeatUnavailable {
                seat: code.to_string(),
                reason: UnavailableReason::AlreadyBooked,
            }),
            Some(SeatState::Empty) => {
                self.grid[code.row_index()][usize::from(code.column())] = SeatState::Booked;
                self.details.insert(code, detail);
                self.available -= 1;
                Ok(())
            }
        }
    }

    /// Frees a booked seat and returns the detail that was attached to it.
    ///
    /// The detail is `None` for seats restored from a snapshot, which records
    /// states only.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SeatNotBooked` if the seat is outside the grid or empty.
    pub fn free(&mut self, code: SeatCode) -> Result<Option<SeatDetail>, DomainError> {
        if self.state(code) != Some(SeatState::Booked) {
            return Err(DomainError::SeatNotBooked {
                seat: code.to_string(),
            });
        }
        self.grid[code.row_index()][usize::from(code.column())] = SeatState::Empty;
        self.available += 1;
        Ok(self.details.remove(&code))
    }

    /// Overwrites one row with states read from a snapshot.
    ///
    /// Details for seats that become empty are dropped; seats that become
    /// booked carry no detail.
    ///
    /// # Errors
    ///
    /// Returns an error if the row letter is outside the grid or the number of
    /// states does not match the column count.
    pub fn restore_row(&mut self, row: char, states: &[SeatState]) -> Result<(), DomainError> {
        let probe: SeatCode = SeatCode::new(row, 0);
        if !self.is_valid_seat(probe) {
            return Err(DomainError::InvalidSeatCode {
                code: row.to_string(),
                reason: "row is not on this screen",
            });
        }
        if states.len() != usize::from(self.cols) {
            return Err(DomainError::RowShapeMismatch {
                row: probe.row(),
                expected: usize::from(self.cols),
                actual: states.len(),
            });
        }

        let row_index: usize = probe.row_index();
        for (column, state) in (0..self.cols).zip(states.iter().copied()) {
            let current: SeatState = self.grid[row_index][usize::from(column)];
            match (current, state) {
                (SeatState::Empty, SeatState::Booked) => self.available -= 1,
                (SeatState::Booked, SeatState::Empty) => {
                    self.available += 1;
                    self.details.remove(&SeatCode::new(probe.row(), column));
                }
                _ => {}
            }
            self.grid[row_index][usize::from(column)] = state;
        }
        Ok(())
    }

    /// Returns a read-only copy of the grid for display.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SeatRowView> {
        self.row_labels()
            .zip(self.grid.iter())
            .map(|(row, seats)| SeatRowView {
                row,
                seats: seats.clone(),
            })
            .collect()
    }

    /// Lists every booked seat with its detail, in row then column order.
    #[must_use]
    pub fn booked_seats(&self) -> Vec<(SeatCode, Option<&SeatDetail>)> {
        let mut booked: Vec<(SeatCode, Option<&SeatDetail>)> = Vec::new();
        for (row, seats) in self.row_labels().zip(self.grid.iter()) {
            for (column, state) in (0..self.cols).zip(seats.iter()) {
                if *state == SeatState::Booked {
                    let code: SeatCode = SeatCode::new(row, column);
                    booked.push((code, self.details.get(&code)));
                }
            }
        }
        booked
    }
}

/// Validates screen dimensions.
///
/// # Errors
///
/// Returns `DomainError::InvalidDimensions` unless rows is 1-26 and cols is at least 1.
pub const fn validate_dimensions(rows: u16, cols: u16) -> Result<(), DomainError> {
    if rows == 0 || rows > MAX_ROWS || cols == 0 {
        return Err(DomainError::InvalidDimensions { rows, cols });
    }
    Ok(())
}
