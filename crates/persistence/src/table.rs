// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Header-addressed CSV files.
//!
//! Every data file is a CSV table with a header row. Columns are looked up by
//! normalised header name (trimmed, lower-cased, spaces to underscores), so
//! column order in a hand-edited file does not matter.

use crate::error::PersistenceError;
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tempfile::NamedTempFile;
use tracing::warn;

fn normalize(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// A CSV file read fully into memory.
#[derive(Debug)]
pub struct Table {
    path: PathBuf,
    columns: HashMap<String, usize>,
    records: Vec<(u64, StringRecord)>,
}

impl Table {
    /// Reads a table, checking that every required column is present.
    ///
    /// A missing or empty file reads as a table with no rows.
    ///
    /// # Arguments
    ///
    /// * `path` - The file to read
    /// * `required` - Header names that must be present
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid CSV, or lacks
    /// a required column.
    pub fn read(path: &Path, required: &[&str]) -> Result<Self, PersistenceError> {
        let mut table: Self = Self {
            path: path.to_path_buf(),
            columns: HashMap::new(),
            records: Vec::new(),
        };
        let file: File = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(table),
            Err(err) => return Err(PersistenceError::io(path, err)),
        };
        let length: u64 = file
            .metadata()
            .map_err(|err| PersistenceError::io(path, err))?
            .len();
        if length == 0 {
            return Ok(table);
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(file);
        let headers: StringRecord = reader
            .headers()
            .map_err(|err| PersistenceError::csv(path, err))?
            .clone();
        for (idx, header) in headers.iter().enumerate() {
            table.columns.insert(normalize(header), idx);
        }
        for column in required {
            if !table.has_column(column) {
                return Err(PersistenceError::Malformed {
                    path: path.to_path_buf(),
                    line: 1,
                    reason: format!("missing column '{column}'"),
                });
            }
        }

        for result in reader.records() {
            let record: StringRecord = result.map_err(|err| PersistenceError::csv(path, err))?;
            if record.iter().all(|field| field.trim().is_empty()) {
                continue;
            }
            let line: u64 = record.position().map_or(0, csv::Position::line);
            table.records.push((line, record));
        }
        Ok(table)
    }

    /// Returns the file the table was read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Checks whether the file has a column.
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.contains_key(&normalize(column))
    }

    /// Returns the number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Checks whether the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the data rows in file order.
    pub fn rows(&self) -> impl Iterator<Item = TableRow<'_>> {
        self.records.iter().map(|(line, record)| TableRow {
            table: self,
            line: *line,
            record,
        })
    }
}

/// One data row of a [`Table`].
#[derive(Debug, Clone, Copy)]
pub struct TableRow<'a> {
    table: &'a Table,
    line: u64,
    record: &'a StringRecord,
}

impl TableRow<'_> {
    /// Returns the row's line number in the file.
    #[must_use]
    pub const fn line(&self) -> u64 {
        self.line
    }

    /// Returns a trimmed field, or `None` if the column is absent or blank.
    #[must_use]
    pub fn optional(&self, column: &str) -> Option<&str> {
        self.table
            .columns
            .get(&normalize(column))
            .and_then(|idx| self.record.get(*idx))
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    /// Returns a trimmed field that must not be blank.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Malformed` if the field is absent or blank.
    pub fn text(&self, column: &str) -> Result<&str, PersistenceError> {
        self.optional(column)
            .ok_or_else(|| self.malformed(format!("{column} is empty")))
    }

    /// Parses a field that must not be blank.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::Malformed` if the field is blank or does not
    /// parse.
    pub fn parse<T>(&self, column: &str) -> Result<T, PersistenceError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value: &str = self.text(column)?;
        value
            .parse::<T>()
            .map_err(|err| self.malformed(format!("{column} '{value}': {err}")))
    }

    /// Builds a `Malformed` error pointing at this row.
    #[must_use]
    pub fn malformed(&self, reason: impl Into<String>) -> PersistenceError {
        PersistenceError::Malformed {
            path: self.table.path.clone(),
            line: self.line,
            reason: reason.into(),
        }
    }
}

/// Appends one row, writing the header first if the file is new or empty.
///
/// The row is encoded in memory and written with a single `write_all`, then
/// synced before returning. If the write or sync fails the file is cut back
/// to its previous length, so a failed append leaves no row behind.
///
/// # Errors
///
/// Returns an error if the file cannot be opened, written, or synced.
pub fn append_row(path: &Path, header: &[&str], row: &[String]) -> Result<(), PersistenceError> {
    let mut file: File = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| PersistenceError::io(path, err))?;
    let original_len: u64 = file
        .metadata()
        .map_err(|err| PersistenceError::io(path, err))?
        .len();

    let mut writer = csv::Writer::from_writer(Vec::new());
    if original_len == 0 {
        writer
            .write_record(header)
            .map_err(|err| PersistenceError::csv(path, err))?;
    }
    writer
        .write_record(row)
        .map_err(|err| PersistenceError::csv(path, err))?;
    let bytes: Vec<u8> = writer.into_inner().map_err(|err| PersistenceError::Encode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;

    if let Err(err) = file.write_all(&bytes).and_then(|()| file.sync_data()) {
        if let Err(rollback) = file.set_len(original_len).and_then(|()| file.sync_data()) {
            warn!(
                path = %path.display(),
                error = %rollback,
                "Failed to cut back a partial append"
            );
        }
        return Err(PersistenceError::io(path, err));
    }
    Ok(())
}

/// Removes an unterminated fragment from the end of an append-only file.
///
/// Rows are only ever appended whole and newline-terminated, so bytes after
/// the last newline are what an interrupted append left behind. Cutting them
/// off keeps the next append from landing on the same line.
///
/// # Returns
///
/// The line number of the removed fragment, or `None` if the file was
/// missing or ended cleanly.
///
/// # Errors
///
/// Returns an error if the file cannot be read or truncated.
pub fn truncate_torn_tail(path: &Path) -> Result<Option<u64>, PersistenceError> {
    let bytes: Vec<u8> = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(PersistenceError::io(path, err)),
    };
    if bytes.is_empty() || bytes.ends_with(b"\n") {
        return Ok(None);
    }

    let kept: usize = bytes
        .iter()
        .rposition(|byte| *byte == b'\n')
        .map_or(0, |idx| idx + 1);
    let complete_lines: usize = bytes[..kept].iter().filter(|byte| **byte == b'\n').count();
    let encode = |err: std::num::TryFromIntError| PersistenceError::Encode {
        path: path.to_path_buf(),
        reason: err.to_string(),
    };
    let kept_len: u64 = u64::try_from(kept).map_err(encode)?;
    let line: u64 = u64::try_from(complete_lines).map_err(encode)? + 1;

    let file: File = OpenOptions::new()
        .write(true)
        .open(path)
        .map_err(|err| PersistenceError::io(path, err))?;
    file.set_len(kept_len)
        .and_then(|()| file.sync_data())
        .map_err(|err| PersistenceError::io(path, err))?;
    warn!(
        path = %path.display(),
        line,
        bytes = bytes.len() - kept,
        "Removed unterminated row from end of log"
    );
    Ok(Some(line))
}

/// Replaces a whole file with a header and rows.
///
/// The rows go to a temporary file in the same directory, which is synced
/// and then renamed over `path`, so readers see either the old file or the
/// new one.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be written or renamed.
pub fn rewrite_atomically(
    path: &Path,
    header: &[&str],
    rows: &[Vec<String>],
) -> Result<(), PersistenceError> {
    let directory: &Path = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp: NamedTempFile =
        NamedTempFile::new_in(directory).map_err(|err| PersistenceError::io(directory, err))?;

    let mut writer = csv::Writer::from_writer(temp.as_file());
    writer
        .write_record(header)
        .map_err(|err| PersistenceError::csv(path, err))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|err| PersistenceError::csv(path, err))?;
    }
    writer
        .flush()
        .map_err(|err| PersistenceError::io(path, err))?;
    drop(writer);

    temp.as_file()
        .sync_data()
        .map_err(|err| PersistenceError::io(path, err))?;
    temp.persist(path)
        .map_err(|err| PersistenceError::io(path, err.error))?;
    Ok(())
}
