// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::seat_map::validate_dimensions;
use crate::types::{Money, MovieId, ScreenId, Showtime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::Date;

/// Lifecycle status of a screen.
///
/// Screens are never deleted; they move between these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ScreenStatus {
    /// Open for bookings.
    #[default]
    Active,
    /// Temporarily closed for maintenance.
    Maintenance,
    /// Retired.
    Inactive,
}

impl ScreenStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Maintenance => "Maintenance",
            Self::Inactive => "Inactive",
        }
    }
}

impl FromStr for ScreenStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "maintenance" => Ok(Self::Maintenance),
            "inactive" => Ok(Self::Inactive),
            _ => Err(DomainError::InvalidScreenStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for ScreenStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An auditorium with a fixed seat grid and a list of showtimes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screen {
    /// The screen identifier.
    pub id: ScreenId,
    /// Number of seat rows.
    pub rows: u16,
    /// Number of seat columns.
    pub cols: u16,
    /// Showtimes in configured order.
    pub showtimes: Vec<Showtime>,
    /// Lifecycle status.
    pub status: ScreenStatus,
    /// Date the screen last entered maintenance.
    pub last_maintenance: Option<Date>,
}

impl Screen {
    /// Creates an active screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the dimensions are out of range or a showtime repeats.
    pub fn new(
        id: ScreenId,
        rows: u16,
        cols: u16,
        showtimes: Vec<Showtime>,
    ) -> Result<Self, DomainError> {
        validate_dimensions(rows, cols)?;
        for (index, showtime) in showtimes.iter().enumerate() {
            if showtimes[..index].contains(showtime) {
                return Err(DomainError::DuplicateShowtime {
                    screen_id: id.to_string(),
                    showtime: showtime.to_string(),
                });
            }
        }
        Ok(Self {
            id,
            rows,
            cols,
            showtimes,
            status: ScreenStatus::Active,
            last_maintenance: None,
        })
    }

    /// Returns the number of seats.
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::from(self.rows) * usize::from(self.cols)
    }

    /// Checks whether this screen runs the given showtime.
    #[must_use]
    pub fn has_showtime(&self, showtime: &Showtime) -> bool {
        self.showtimes.contains(showtime)
    }

    /// Checks whether the screen accepts bookings.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ScreenStatus::Active
    }
}

/// A film bound to one screen at one price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// The movie identifier.
    pub id: MovieId,
    /// Display title.
    pub title: String,
    /// Current per-seat price.
    pub price: Money,
    /// The screen it plays on.
    pub screen_id: ScreenId,
    /// Whether it can be booked.
    pub active: bool,
}

impl Movie {
    /// Creates a movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the title is empty or the price is not positive.
    pub fn new(
        id: MovieId,
        title: &str,
        price: Money,
        screen_id: ScreenId,
        active: bool,
    ) -> Result<Self, DomainError> {
        let title: &str = title.trim();
        if title.is_empty() {
            return Err(DomainError::EmptyTitle);
        }
        let price: Money = Money::price(price.amount())?;
        Ok(Self {
            id,
            title: title.to_string(),
            price,
            screen_id,
            active,
        })
    }
}

/// The set of screens and movies the box office sells.
///
/// Invariant: at most one active movie per screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    screens: BTreeMap<ScreenId, Screen>,
    movies: BTreeMap<MovieId, Movie>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            screens: BTreeMap::new(),
            movies: BTreeMap::new(),
        }
    }

    /// Builds a catalog from previously persisted screens and movies.
    ///
    /// # Errors
    ///
    /// Returns an error on duplicate identifiers, a movie bound to an unknown
    /// screen, or two active movies on one screen.
    pub fn from_parts(screens: Vec<Screen>, movies: Vec<Movie>) -> Result<Self, DomainError> {
        let mut catalog: Self = Self::new();
        for screen in screens {
            catalog.add_screen(screen)?;
        }
        for movie in movies {
            if catalog.movies.contains_key(&movie.id) {
                return Err(DomainError::DuplicateMovie(movie.id.value()));
            }
            if !catalog.screens.contains_key(&movie.screen_id) {
                return Err(DomainError::ScreenNotFound(movie.screen_id.to_string()));
            }
            if movie.active
                && let Some(existing) = catalog.active_movie_on(&movie.screen_id)
            {
                return Err(DomainError::MultipleActiveMovies {
                    screen_id: movie.screen_id.to_string(),
                    first: existing.id.value(),
                    second: movie.id.value(),
                });
            }
            catalog.movies.insert(movie.id, movie);
        }
        Ok(catalog)
    }

    /// Adds a screen.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DuplicateScreen` if the id is taken.
    pub fn add_screen(&mut self, screen: Screen) -> Result<(), DomainError> {
        if self.screens.contains_key(&screen.id) {
            return Err(DomainError::DuplicateScreen(screen.id.to_string()));
        }
        self.screens.insert(screen.id.clone(), screen);
        Ok(())
    }

    /// Returns a screen by id.
    #[must_use]
    pub fn screen(&self, screen_id: &ScreenId) -> Option<&Screen> {
        self.screens.get(screen_id)
    }

    /// Returns all screens in id order, whatever their status.
    pub fn screens(&self) -> impl Iterator<Item = &Screen> {
        self.screens.values()
    }

    /// Returns screens that accept bookings.
    pub fn active_screens(&self) -> impl Iterator<Item = &Screen> {
        self.screens.values().filter(|screen| screen.is_active())
    }

    /// Changes a screen's lifecycle status.
    ///
    /// Entering maintenance stamps `last_maintenance` with `today`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ScreenNotFound` if the screen does not exist.
    pub fn set_screen_status(
        &mut self,
        screen_id: &ScreenId,
        status: ScreenStatus,
        today: Date,
    ) -> Result<(), DomainError> {
        let screen: &mut Screen = self
            .screens
            .get_mut(screen_id)
            .ok_or_else(|| DomainError::ScreenNotFound(screen_id.to_string()))?;
        screen.status = status;
        if status == ScreenStatus::Maintenance {
            screen.last_maintenance = Some(today);
        }
        Ok(())
    }

    /// Appends a showtime to a screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen does not exist or already runs the showtime.
    pub fn add_showtime(
        &mut self,
        screen_id: &ScreenId,
        showtime: Showtime,
    ) -> Result<(), DomainError> {
        let screen: &mut Screen = self
            .screens
            .get_mut(screen_id)
            .ok_or_else(|| DomainError::ScreenNotFound(screen_id.to_string()))?;
        if screen.has_showtime(&showtime) {
            return Err(DomainError::DuplicateShowtime {
                screen_id: screen_id.to_string(),
                showtime: showtime.to_string(),
            });
        }
        screen.showtimes.push(showtime);
        Ok(())
    }

    /// Adds a movie with the next free id.
    ///
    /// An active movie replaces whatever movie is currently active on its screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the screen does not exist, the title is empty, or the
    /// price is not positive.
    pub fn add_movie(
        &mut self,
        title: &str,
        price: Money,
        screen_id: ScreenId,
        active: bool,
    ) -> Result<MovieId, DomainError> {
        if !self.screens.contains_key(&screen_id) {
            return Err(DomainError::ScreenNotFound(screen_id.to_string()));
        }
        let id: MovieId = self.next_movie_id();
        let movie: Movie = Movie::new(id, title, price, screen_id, false)?;
        self.movies.insert(id, movie);
        if active {
            self.activate_movie(id)?;
        }
        Ok(id)
    }

    /// Activates a movie, deactivating any other active movie on the same screen.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MovieNotFound` if the movie does not exist.
    pub fn activate_movie(&mut self, movie_id: MovieId) -> Result<(), DomainError> {
        let screen_id: ScreenId = self
            .movies
            .get(&movie_id)
            .map(|movie| movie.screen_id.clone())
            .ok_or(DomainError::MovieNotFound(movie_id.value()))?;
        for movie in self.movies.values_mut() {
            if movie.screen_id == screen_id {
                movie.active = movie.id == movie_id;
            }
        }
        Ok(())
    }

    /// Deactivates a movie. Bookings already made are unaffected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MovieNotFound` if the movie does not exist.
    pub fn deactivate_movie(&mut self, movie_id: MovieId) -> Result<(), DomainError> {
        let movie: &mut Movie = self
            .movies
            .get_mut(&movie_id)
            .ok_or(DomainError::MovieNotFound(movie_id.value()))?;
        movie.active = false;
        Ok(())
    }

    /// Changes the current price of a movie. Existing bookings keep the price they paid.
    ///
    /// # Errors
    ///
    /// Returns an error if the movie does not exist or the price is not positive.
    pub fn set_movie_price(&mut self, movie_id: MovieId, price: Money) -> Result<(), DomainError> {
        let price: Money = Money::price(price.amount())?;
        let movie: &mut Movie = self
            .movies
            .get_mut(&movie_id)
            .ok_or(DomainError::MovieNotFound(movie_id.value()))?;
        movie.price = price;
        Ok(())
    }

    /// Returns a movie by id.
    #[must_use]
    pub fn movie(&self, movie_id: MovieId) -> Option<&Movie> {
        self.movies.get(&movie_id)
    }

    /// Returns all movies in id order.
    pub fn movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values()
    }

    /// Returns movies that can be booked.
    pub fn active_movies(&self) -> impl Iterator<Item = &Movie> {
        self.movies.values().filter(|movie| movie.active)
    }

    /// Returns the active movie bound to a screen, if any.
    #[must_use]
    pub fn active_movie_on(&self, screen_id: &ScreenId) -> Option<&Movie> {
        self.movies
            .values()
            .find(|movie| movie.active && &movie.screen_id == screen_id)
    }

    /// Finds a movie by exact title, preferring an active one.
    #[must_use]
    pub fn movie_by_title(&self, title: &str) -> Option<&Movie> {
        let title: &str = title.trim();
        self.movies
            .values()
            .filter(|movie| movie.title == title)
            .max_by_key(|movie| (movie.active, movie.id))
    }

    fn next_movie_id(&self) -> MovieId {
        self.movies
            .keys()
            .next_back()
            .map_or(MovieId::new(1), |last| MovieId::new(last.value() + 1))
    }
}
