// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::table::TableRow;
use marquee_domain::Money;
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

/// Formats a timestamp as RFC 3339.
pub(crate) fn format_timestamp(
    path: &Path,
    timestamp: OffsetDateTime,
) -> Result<String, PersistenceError> {
    timestamp
        .format(&Rfc3339)
        .map_err(|err| PersistenceError::Encode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}

/// Formats an optional timestamp, blank when absent.
pub(crate) fn format_optional_timestamp(
    path: &Path,
    timestamp: Option<OffsetDateTime>,
) -> Result<String, PersistenceError> {
    timestamp.map_or_else(|| Ok(String::new()), |value| format_timestamp(path, value))
}

/// Parses a required RFC 3339 column.
pub(crate) fn parse_timestamp(
    row: &TableRow<'_>,
    column: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    let value: &str = row.text(column)?;
    OffsetDateTime::parse(value, &Rfc3339)
        .map_err(|err| row.malformed(format!("{column} '{value}': {err}")))
}

/// Parses an optional RFC 3339 column.
pub(crate) fn parse_optional_timestamp(
    row: &TableRow<'_>,
    column: &str,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    if row.optional(column).is_none() {
        return Ok(None);
    }
    parse_timestamp(row, column).map(Some)
}

/// Formats a calendar date as `YYYY-MM-DD`.
pub(crate) fn format_date(path: &Path, date: Date) -> Result<String, PersistenceError> {
    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| PersistenceError::Encode {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
}

/// Parses a `YYYY-MM-DD` value.
pub(crate) fn parse_date(row: &TableRow<'_>, value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
        .map_err(|err| row.malformed(format!("date '{value}': {err}")))
}

/// Formats money at full precision so a replay sums exactly.
pub(crate) fn format_money(amount: Money) -> String {
    amount.amount().normalize().to_string()
}
