// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The advisory seat snapshot, `seat_snapshot.csv`.
//!
//! One row per (screen, showtime, row letter). Every row carries the same
//! `LogPosition`; a file whose rows disagree is treated as corrupt.

use crate::error::PersistenceError;
use crate::table::{Table, TableRow, rewrite_atomically};
use marquee::{SeatSnapshot, SeatSnapshotStore, SnapshotRow, StoreError};
use marquee_domain::SeatState;
use std::path::{Path, PathBuf};

/// Column order of `seat_snapshot.csv`.
pub const SNAPSHOT_HEADER: [&str; 5] = ["ScreenID", "ShowTime", "Row", "SeatStatus", "LogPosition"];

/// Seat snapshot stored as a CSV file, rewritten whole on every save.
#[derive(Debug, Clone)]
pub struct CsvSnapshotStore {
    path: PathBuf,
}

impl CsvSnapshotStore {
    /// Creates a store over `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file backing the store.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the snapshot, or `None` if the file is missing or empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row does not parse.
    pub fn read(&self) -> Result<Option<SeatSnapshot>, PersistenceError> {
        let table: Table = Table::read(&self.path, &SNAPSHOT_HEADER)?;
        let mut snapshot: Option<SeatSnapshot> = None;
        for row in table.rows() {
            let position: usize = row.parse("LogPosition")?;
            let decoded: SnapshotRow = decode(&row)?;
            match snapshot.as_mut() {
                None => {
                    snapshot = Some(SeatSnapshot {
                        log_position: position,
                        rows: vec![decoded],
                    });
                }
                Some(existing) if existing.log_position == position => {
                    existing.rows.push(decoded);
                }
                Some(existing) => {
                    return Err(row.malformed(format!(
                        "LogPosition {position} differs from {}",
                        existing.log_position
                    )));
                }
            }
        }
        Ok(snapshot)
    }

    /// Replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be rewritten.
    pub fn write(&self, snapshot: &SeatSnapshot) -> Result<(), PersistenceError> {
        let position: String = snapshot.log_position.to_string();
        let rows: Vec<Vec<String>> = snapshot
            .rows
            .iter()
            .map(|row| {
                let tokens: Vec<String> = row
                    .states
                    .iter()
                    .map(|state| state.token().to_string())
                    .collect();
                vec![
                    row.screen_id.to_string(),
                    row.showtime.to_string(),
                    row.row.to_string(),
                    tokens.join(","),
                    position.clone(),
                ]
            })
            .collect();
        rewrite_atomically(&self.path, &SNAPSHOT_HEADER, &rows)
    }
}

impl SeatSnapshotStore for CsvSnapshotStore {
    fn save(&mut self, snapshot: &SeatSnapshot) -> Result<(), StoreError> {
        Ok(self.write(snapshot)?)
    }

    fn load(&self) -> Result<Option<SeatSnapshot>, StoreError> {
        Ok(self.read()?)
    }
}

fn decode(row: &TableRow<'_>) -> Result<SnapshotRow, PersistenceError> {
    let letter: &str = row.text("Row")?;
    let mut chars = letter.chars();
    let (Some(first), None) = (chars.next(), chars.next()) else {
        return Err(row.malformed(format!("Row '{letter}' is not a single letter")));
    };
    if !first.is_ascii_alphabetic() {
        return Err(row.malformed(format!("Row '{letter}' is not a letter")));
    }
    let states: Vec<SeatState> = row
        .text("SeatStatus")?
        .split(',')
        .map(|token| {
            SeatState::from_token(token).map_err(|err| row.malformed(err.to_string()))
        })
        .collect::<Result<_, _>>()?;
    Ok(SnapshotRow {
        screen_id: row.parse("ScreenID")?,
        showtime: row.parse("ShowTime")?,
        row: first.to_ascii_uppercase(),
        states,
    })
}
