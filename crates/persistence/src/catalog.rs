// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Screens and movies, `screens.csv` and `movies.csv`.
//!
//! Both files are small and rewritten whole through [`rewrite_atomically`]
//! whenever the catalog changes.

use crate::error::PersistenceError;
use crate::fields::{format_date, format_money, parse_date};
use crate::table::{Table, TableRow, rewrite_atomically};
use marquee_domain::{Catalog, Movie, MovieId, Screen, ScreenStatus, Showtime};
use std::path::Path;
use tracing::info;

/// Column order of `screens.csv`.
pub const SCREENS_HEADER: [&str; 6] = [
    "ScreenID",
    "Rows",
    "Columns",
    "ShowTimes",
    "Status",
    "LastMaintenance",
];

/// Column order of `movies.csv`.
pub const MOVIES_HEADER: [&str; 5] = ["MovieID", "Title", "Price", "ScreenID", "IsActive"];

/// Loads the catalog from its two files.
///
/// Missing files load as an empty catalog. Showtimes are read from
/// `ShowTimes`, or from `Timings` in older files. A missing `Status` means
/// active and a missing `IsActive` means yes.
///
/// # Errors
///
/// Returns an error if a file cannot be read, a row does not parse, or the
/// rows together break a catalog rule.
pub fn load_catalog(screens_path: &Path, movies_path: &Path) -> Result<Catalog, PersistenceError> {
    let screens_table: Table = Table::read(screens_path, &["ScreenID", "Rows", "Columns"])?;
    let showtime_column: &str = if screens_table.has_column("ShowTimes") {
        "ShowTimes"
    } else {
        "Timings"
    };
    let screens: Vec<Screen> = screens_table
        .rows()
        .map(|row| decode_screen(&row, showtime_column))
        .collect::<Result<_, _>>()?;

    let movies_table: Table =
        Table::read(movies_path, &["MovieID", "Title", "Price", "ScreenID"])?;
    let movies: Vec<Movie> = movies_table
        .rows()
        .map(|row| decode_movie(&row))
        .collect::<Result<_, _>>()?;

    let catalog: Catalog = Catalog::from_parts(screens, movies)?;
    info!(
        screens = screens_table.len(),
        movies = movies_table.len(),
        "Catalog loaded"
    );
    Ok(catalog)
}

/// Writes the catalog to its two files.
///
/// # Errors
///
/// Returns an error if either file cannot be rewritten.
pub fn save_catalog(
    catalog: &Catalog,
    screens_path: &Path,
    movies_path: &Path,
) -> Result<(), PersistenceError> {
    let screens: Vec<Vec<String>> = catalog
        .screens()
        .map(|screen| encode_screen(screens_path, screen))
        .collect::<Result<_, _>>()?;
    rewrite_atomically(screens_path, &SCREENS_HEADER, &screens)?;

    let movies: Vec<Vec<String>> = catalog.movies().map(encode_movie).collect();
    rewrite_atomically(movies_path, &MOVIES_HEADER, &movies)
}

fn decode_screen(row: &TableRow<'_>, showtime_column: &str) -> Result<Screen, PersistenceError> {
    let showtimes: Vec<Showtime> = row
        .optional(showtime_column)
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|label| !label.is_empty())
        .map(|label| Showtime::new(label).map_err(|err| row.malformed(err.to_string())))
        .collect::<Result<_, _>>()?;
    let mut screen: Screen = Screen::new(
        row.parse("ScreenID")?,
        row.parse("Rows")?,
        row.parse("Columns")?,
        showtimes,
    )
    .map_err(|err| row.malformed(err.to_string()))?;
    if row.optional("Status").is_some() {
        screen.status = row.parse::<ScreenStatus>("Status")?;
    }
    if let Some(value) = row.optional("LastMaintenance") {
        screen.last_maintenance = Some(parse_date(row, value)?);
    }
    Ok(screen)
}

fn decode_movie(row: &TableRow<'_>) -> Result<Movie, PersistenceError> {
    let active: bool = match row.optional("IsActive") {
        None => true,
        Some(value) => match value.to_ascii_lowercase().as_str() {
            "yes" | "true" | "y" | "1" => true,
            "no" | "false" | "n" | "0" => false,
            _ => return Err(row.malformed(format!("IsActive '{value}' is not yes or no"))),
        },
    };
    Movie::new(
        MovieId::new(row.parse("MovieID")?),
        row.text("Title")?,
        row.parse("Price")?,
        row.parse("ScreenID")?,
        active,
    )
    .map_err(|err| row.malformed(err.to_string()))
}

fn encode_screen(path: &Path, screen: &Screen) -> Result<Vec<String>, PersistenceError> {
    let showtimes: Vec<&str> = screen.showtimes.iter().map(Showtime::as_str).collect();
    let last_maintenance: String = match screen.last_maintenance {
        Some(date) => format_date(path, date)?,
        None => String::new(),
    };
    Ok(vec![
        screen.id.to_string(),
        screen.rows.to_string(),
        screen.cols.to_string(),
        showtimes.join(";"),
        screen.status.as_str().to_string(),
        last_maintenance,
    ])
}

fn encode_movie(movie: &Movie) -> Vec<String> {
    vec![
        movie.id.value().to_string(),
        movie.title.clone(),
        format_money(movie.price),
        movie.screen_id.to_string(),
        String::from(if movie.active { "Yes" } else { "No" }),
    ]
}
