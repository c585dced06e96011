// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The box office: every customer and admin operation over one data directory.
//!
//! `BoxOffice` owns the catalog, the seat inventory, the wallet ledger and
//! the file-backed stores. Every mutating operation takes `&mut self`, so a
//! caller sharing one box office across threads must hold a lock for the
//! whole operation; that lock is the critical section that keeps two
//! customers from booking the same seat.

use crate::config::BoxOfficeConfig;
use crate::error::ApiError;
use crate::request_response::{
    AddMovieRequest, AddScreenRequest, AvailabilityResponse, BookTicketRequest,
    BookTicketResponse, BookingSummary, CancelTicketRequest, CancelTicketResponse,
    DepositRequest, DiscrepancyResponse, MovieResponse, ScreenResponse, SeatHolderResponse,
    SeatMapResponse, SeatRowResponse, SetScreenStatusRequest, WalletResponse,
    WalletTransactionResponse,
};
use marquee::{
    BookingConfirmation, BookingService, CancellationConfirmation, HallInventory,
    ReconcileReport, SeatSnapshot, WalletLedger,
};
use marquee_audit::ReconciliationWarning;
use marquee_domain::{
    Booking, BookingId, BookingRecord, BookingStatus, Catalog, Customer, DomainError, Money,
    MovieId, Screen, ScreenId, ScreenStatus, SeatMap, Showtime, UserId, project_bookings,
};
use marquee_persistence::{
    CsvBookingStore, CsvDiscrepancyJournal, CsvSnapshotStore, CsvTransactionLog, DataFiles,
    MigrationReport, PersistenceError, is_legacy_booking_log, load_catalog,
    migrate_legacy_bookings, save_catalog, truncate_torn_tail,
};
use std::path::PathBuf;
use std::str::FromStr;
use time::{Date, OffsetDateTime};
use tracing::{info, warn};

/// Parses a request field into a domain value, naming the field on failure.
fn parse_field<T>(field: &str, value: &str) -> Result<T, ApiError>
where
    T: FromStr<Err = DomainError>,
{
    value
        .parse::<T>()
        .map_err(|err| ApiError::invalid(field, err))
}

/// The running box office.
#[derive(Debug)]
pub struct BoxOffice {
    config: BoxOfficeConfig,
    files: DataFiles,
    catalog: Catalog,
    inventory: HallInventory,
    ledger: WalletLedger<CsvTransactionLog>,
    records: CsvBookingStore,
    journal: CsvDiscrepancyJournal,
    snapshots: CsvSnapshotStore,
    startup_report: ReconcileReport,
}

impl BoxOffice {
    /// Opens the box office over a data directory.
    ///
    /// Loads the catalog, converts an old-format booking log if one is found
    /// (keeping the original as `bookings.legacy.csv`), cuts any partial
    /// trailing row off the booking and wallet logs, replays the wallet log,
    /// and rebuilds seat state from the snapshot and booking log.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or a data file
    /// cannot be read.
    pub fn open(config: BoxOfficeConfig) -> Result<Self, ApiError> {
        let files: DataFiles = DataFiles::new(&config.data_dir);
        files.ensure_dir()?;
        let catalog: Catalog = load_catalog(&files.screens(), &files.movies())?;

        let records: CsvBookingStore = CsvBookingStore::new(files.bookings());
        if is_legacy_booking_log(records.path())? {
            migrate_booking_log(&files, &records, &catalog)?;
        }

        let mut repaired: Vec<ReconciliationWarning> = Vec::new();
        for path in [files.bookings(), files.wallet()] {
            if let Some(line) = truncate_torn_tail(&path)? {
                repaired.push(ReconciliationWarning::TruncatedRow {
                    file: path.display().to_string(),
                    line,
                });
            }
        }

        let ledger: WalletLedger<CsvTransactionLog> = WalletLedger::open(
            CsvTransactionLog::new(files.wallet()),
            config.starting_balance,
        )?;

        let mut inventory: HallInventory = HallInventory::new();
        inventory.configure_from_catalog(&catalog)?;

        let snapshots: CsvSnapshotStore = CsvSnapshotStore::new(files.snapshot());
        let snapshot: Option<SeatSnapshot> = if config.use_snapshot {
            HallInventory::load_snapshot(&snapshots).unwrap_or_else(|err| {
                warn!(error = %err, "Seat snapshot unreadable; replaying the booking log");
                None
            })
        } else {
            None
        };
        let log: Vec<BookingRecord> = records.read()?;
        let mut startup_report: ReconcileReport = inventory.rehydrate(snapshot.as_ref(), &log);
        startup_report.warnings.splice(0..0, repaired);

        let mut office: Self = Self {
            journal: CsvDiscrepancyJournal::new(files.discrepancies()),
            config,
            files,
            catalog,
            inventory,
            ledger,
            records,
            snapshots,
            startup_report,
        };
        office.refresh_snapshot();
        info!(
            data_dir = %office.files.dir().display(),
            bookings = log.len(),
            from_snapshot = office.startup_report.from_snapshot,
            "Box office open"
        );
        Ok(office)
    }

    /// Returns the configuration the box office was opened with.
    #[must_use]
    pub const fn config(&self) -> &BoxOfficeConfig {
        &self.config
    }

    /// Returns what rebuilding seat state at startup found.
    #[must_use]
    pub const fn startup_report(&self) -> &ReconcileReport {
        &self.startup_report
    }

    /// Books seats for a customer and charges their wallet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for malformed fields or seats,
    /// `ApiError::NotFound` for an unknown movie or showtime,
    /// `ApiError::Conflict` if a seat is taken or the movie or screen is not
    /// bookable, `ApiError::PaymentRequired` if the wallet cannot cover the
    /// total, or `ApiError::Internal` if a write failed.
    pub fn book_ticket(
        &mut self,
        request: &BookTicketRequest,
    ) -> Result<BookTicketResponse, ApiError> {
        let user_id: UserId = parse_field("user_id", &request.user_id)?;
        let showtime: Showtime = parse_field("showtime", &request.showtime)?;
        let name: String = request
            .user_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| user_id.to_string(), ToString::to_string);
        let customer: Customer = Customer::new(user_id, name);

        let confirmation: BookingConfirmation = self.service().book(
            &customer,
            MovieId::new(request.movie_id),
            &showtime,
            &request.seats,
        )?;
        self.refresh_snapshot();
        Ok(confirmation.into())
    }

    /// Cancels a customer's booking and refunds what they paid.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown booking,
    /// `ApiError::Forbidden` if it belongs to someone else,
    /// `ApiError::Conflict` if it is already cancelled, or
    /// `ApiError::Internal` if a write failed.
    pub fn cancel_ticket(
        &mut self,
        request: &CancelTicketRequest,
    ) -> Result<CancelTicketResponse, ApiError> {
        let user_id: UserId = parse_field("user_id", &request.user_id)?;
        let booking_id: BookingId = parse_field("booking_id", &request.booking_id)?;

        let confirmation: CancellationConfirmation =
            self.service().cancel(&user_id, &booking_id)?;
        self.refresh_snapshot();
        Ok(confirmation.into())
    }

    /// Returns the seat map of one showtime.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the screen or showtime does not exist.
    pub fn seat_map_view(
        &self,
        screen_id: &str,
        showtime: &str,
    ) -> Result<SeatMapResponse, ApiError> {
        let screen_id: ScreenId = parse_field("screen_id", screen_id)?;
        let showtime: Showtime = parse_field("showtime", showtime)?;
        let map: &SeatMap = self.inventory.get_seat_map(&screen_id, &showtime)?;
        Ok(SeatMapResponse {
            screen_id: screen_id.to_string(),
            showtime: showtime.to_string(),
            columns: map.column_labels(),
            rows: map.snapshot().into_iter().map(SeatRowResponse::from).collect(),
            available: map.available_count(),
            capacity: map.capacity(),
        })
    }

    /// Lists booked seats of one showtime with the booking holding each.
    ///
    /// Holders come from the booking log, so seats restored from a snapshot
    /// are listed with full detail.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the screen or showtime does not exist,
    /// or `ApiError::Internal` if the booking log cannot be read.
    pub fn booked_seat_details(
        &self,
        screen_id: &str,
        showtime: &str,
    ) -> Result<Vec<SeatHolderResponse>, ApiError> {
        let screen_id: ScreenId = parse_field("screen_id", screen_id)?;
        let showtime: Showtime = parse_field("showtime", showtime)?;
        let map: &SeatMap = self.inventory.get_seat_map(&screen_id, &showtime)?;

        let mut holders: Vec<SeatHolderResponse> = Vec::new();
        for booking in self.bookings()? {
            let same_show: bool = booking.screen_id == screen_id && booking.showtime == showtime;
            if !booking.is_active() || !same_show {
                continue;
            }
            for seat in booking.seats.iter().filter(|seat| !map.is_available(**seat)) {
                holders.push(SeatHolderResponse {
                    seat: seat.to_string(),
                    booking_id: booking.id.to_string(),
                    user_id: booking.user_id.to_string(),
                    user_name: booking.user_name.clone(),
                    price_paid: booking.price_per_seat(),
                    booked_at: booking.created_at,
                });
            }
        }
        holders.sort_by(|a, b| a.seat.cmp(&b.seat));
        Ok(holders)
    }

    /// Reports free seats for every showtime of every active screen.
    #[must_use]
    pub fn available_seat_counts(&self) -> Vec<AvailabilityResponse> {
        self.inventory
            .available_seat_counts(&self.catalog)
            .into_iter()
            .map(AvailabilityResponse::from)
            .collect()
    }

    /// Returns a wallet balance, opening the wallet on first use.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a malformed user id, or
    /// `ApiError::Internal` if the opening transaction cannot be written.
    pub fn wallet_balance(&mut self, user_id: &str) -> Result<WalletResponse, ApiError> {
        let user_id: UserId = parse_field("user_id", user_id)?;
        let balance: Money = self.ledger.balance(&user_id)?;
        Ok(WalletResponse {
            user_id: user_id.to_string(),
            balance,
        })
    }

    /// Returns a wallet's transactions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a malformed user id, or
    /// `ApiError::Internal` if the log cannot be read.
    pub fn wallet_history(
        &self,
        user_id: &str,
    ) -> Result<Vec<WalletTransactionResponse>, ApiError> {
        let user_id: UserId = parse_field("user_id", user_id)?;
        Ok(self
            .ledger
            .history(&user_id)?
            .into_iter()
            .map(WalletTransactionResponse::from)
            .collect())
    }

    /// Adds money to a wallet.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` unless the amount is a positive
    /// decimal, or `ApiError::Internal` if the deposit cannot be written.
    pub fn deposit(
        &mut self,
        user_id: &str,
        request: &DepositRequest,
    ) -> Result<WalletResponse, ApiError> {
        let user_id: UserId = parse_field("user_id", user_id)?;
        let amount: Money = parse_field("amount", &request.amount)?;
        let balance: Money = self.ledger.deposit(&user_id, amount)?;
        Ok(WalletResponse {
            user_id: user_id.to_string(),
            balance,
        })
    }

    /// Lists a customer's bookings, active and cancelled, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a malformed user id, or
    /// `ApiError::Internal` if the booking log cannot be read.
    pub fn bookings_for(&self, user_id: &str) -> Result<Vec<BookingSummary>, ApiError> {
        let user_id: UserId = parse_field("user_id", user_id)?;
        let mut bookings: Vec<Booking> = self
            .bookings()?
            .into_iter()
            .filter(|booking| booking.user_id == user_id)
            .collect();
        bookings.reverse();
        Ok(bookings
            .iter()
            .map(|booking| {
                let title: Option<String> = self
                    .catalog
                    .movie(booking.movie_id)
                    .map(|movie| movie.title.clone());
                BookingSummary::new(booking, title)
            })
            .collect())
    }

    /// Lists a customer's bookings that still hold seats, newest first.
    ///
    /// # Errors
    ///
    /// See [`BoxOffice::bookings_for`].
    pub fn active_bookings_for(&self, user_id: &str) -> Result<Vec<BookingSummary>, ApiError> {
        Ok(self
            .bookings_for(user_id)?
            .into_iter()
            .filter(|summary| summary.status == BookingStatus::Booked.as_str())
            .collect())
    }

    /// Lists every movie.
    #[must_use]
    pub fn movies(&self) -> Vec<MovieResponse> {
        self.catalog.movies().map(MovieResponse::from).collect()
    }

    /// Lists every screen, whatever its status.
    #[must_use]
    pub fn screens(&self) -> Vec<ScreenResponse> {
        self.catalog.screens().map(ScreenResponse::from).collect()
    }

    /// Lists the discrepancy journal, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Internal` if the journal cannot be read.
    pub fn discrepancies(&self) -> Result<Vec<DiscrepancyResponse>, ApiError> {
        Ok(self
            .journal
            .read_all()?
            .into_iter()
            .map(DiscrepancyResponse::from)
            .collect())
    }

    /// Adds a screen.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for bad dimensions or showtimes,
    /// `ApiError::Conflict` if the id is taken, or `ApiError::Internal` if
    /// the catalog cannot be saved.
    pub fn add_screen(&mut self, request: &AddScreenRequest) -> Result<ScreenResponse, ApiError> {
        let screen_id: ScreenId = parse_field("screen_id", &request.screen_id)?;
        let showtimes: Vec<Showtime> = request
            .showtimes
            .iter()
            .map(|label| parse_field("showtimes", label))
            .collect::<Result<_, _>>()?;
        let screen: Screen =
            Screen::new(screen_id.clone(), request.rows, request.cols, showtimes)?;
        self.update_catalog(|catalog| catalog.add_screen(screen))?;
        info!(screen_id = %screen_id, "Screen added");
        self.screen_response(&screen_id)
    }

    /// Adds a showtime to a screen.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown screen,
    /// `ApiError::Conflict` if the screen already runs it, or
    /// `ApiError::Internal` if the catalog cannot be saved.
    pub fn add_showtime(
        &mut self,
        screen_id: &str,
        showtime: &str,
    ) -> Result<ScreenResponse, ApiError> {
        let screen_id: ScreenId = parse_field("screen_id", screen_id)?;
        let showtime: Showtime = parse_field("showtime", showtime)?;
        self.update_catalog(|catalog| catalog.add_showtime(&screen_id, showtime))?;
        info!(screen_id = %screen_id, "Showtime added");
        self.screen_response(&screen_id)
    }

    /// Changes a screen's status. Entering maintenance stamps today's date.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for an unknown status,
    /// `ApiError::NotFound` for an unknown screen, or `ApiError::Internal`
    /// if the catalog cannot be saved.
    pub fn set_screen_status(
        &mut self,
        request: &SetScreenStatusRequest,
    ) -> Result<ScreenResponse, ApiError> {
        let screen_id: ScreenId = parse_field("screen_id", &request.screen_id)?;
        let status: ScreenStatus = parse_field("status", &request.status)?;
        let today: Date = OffsetDateTime::now_utc().date();
        self.update_catalog(|catalog| catalog.set_screen_status(&screen_id, status, today))?;
        info!(screen_id = %screen_id, status = %status, "Screen status changed");
        self.screen_response(&screen_id)
    }

    /// Adds a movie with the next free id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for an empty title or bad price,
    /// `ApiError::NotFound` for an unknown screen, or `ApiError::Internal`
    /// if the catalog cannot be saved.
    pub fn add_movie(&mut self, request: &AddMovieRequest) -> Result<MovieResponse, ApiError> {
        let screen_id: ScreenId = parse_field("screen_id", &request.screen_id)?;
        let price: Money = parse_field("price", &request.price)?;
        let movie_id: MovieId = self.update_catalog(|catalog| {
            catalog.add_movie(&request.title, price, screen_id, request.active)
        })?;
        info!(movie_id = %movie_id, title = %request.title, "Movie added");
        self.movie_response(movie_id)
    }

    /// Makes a movie bookable, retiring the screen's current movie.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown movie, or
    /// `ApiError::Internal` if the catalog cannot be saved.
    pub fn activate_movie(&mut self, movie_id: u32) -> Result<MovieResponse, ApiError> {
        let movie_id: MovieId = MovieId::new(movie_id);
        self.update_catalog(|catalog| catalog.activate_movie(movie_id))?;
        self.movie_response(movie_id)
    }

    /// Stops a movie from being booked. Existing bookings are kept.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for an unknown movie, or
    /// `ApiError::Internal` if the catalog cannot be saved.
    pub fn deactivate_movie(&mut self, movie_id: u32) -> Result<MovieResponse, ApiError> {
        let movie_id: MovieId = MovieId::new(movie_id);
        self.update_catalog(|catalog| catalog.deactivate_movie(movie_id))?;
        self.movie_response(movie_id)
    }

    /// Changes a movie's price for future bookings.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a bad price,
    /// `ApiError::NotFound` for an unknown movie, or `ApiError::Internal` if
    /// the catalog cannot be saved.
    pub fn set_movie_price(
        &mut self,
        movie_id: u32,
        price: &str,
    ) -> Result<MovieResponse, ApiError> {
        let movie_id: MovieId = MovieId::new(movie_id);
        let price: Money = parse_field("price", price)?;
        self.update_catalog(|catalog| catalog.set_movie_price(movie_id, price))?;
        self.movie_response(movie_id)
    }

    fn service(
        &mut self,
    ) -> BookingService<'_, CsvBookingStore, CsvTransactionLog, CsvDiscrepancyJournal> {
        BookingService::new(
            &self.catalog,
            &mut self.inventory,
            &mut self.ledger,
            &mut self.records,
            &mut self.journal,
        )
    }

    fn bookings(&self) -> Result<Vec<Booking>, ApiError> {
        let records: Vec<BookingRecord> = self.records.read()?;
        Ok(project_bookings(&records))
    }

    /// Applies a change to a copy of the catalog, saves it, then swaps it in.
    ///
    /// Nothing changes in memory unless the save succeeds.
    fn update_catalog<T, F>(&mut self, change: F) -> Result<T, ApiError>
    where
        F: FnOnce(&mut Catalog) -> Result<T, DomainError>,
    {
        let mut updated: Catalog = self.catalog.clone();
        let value: T = change(&mut updated)?;
        save_catalog(&updated, &self.files.screens(), &self.files.movies())?;
        self.inventory.configure_from_catalog(&updated)?;
        self.catalog = updated;
        self.refresh_snapshot();
        Ok(value)
    }

    fn screen_response(&self, screen_id: &ScreenId) -> Result<ScreenResponse, ApiError> {
        self.catalog
            .screen(screen_id)
            .map(ScreenResponse::from)
            .ok_or_else(|| DomainError::ScreenNotFound(screen_id.to_string()).into())
    }

    fn movie_response(&self, movie_id: MovieId) -> Result<MovieResponse, ApiError> {
        self.catalog
            .movie(movie_id)
            .map(MovieResponse::from)
            .ok_or_else(|| DomainError::MovieNotFound(movie_id.value()).into())
    }

    /// Rewrites the seat snapshot. Failures are logged, never returned.
    fn refresh_snapshot(&mut self) {
        if !self.config.use_snapshot {
            return;
        }
        let log_position: usize = match self.records.read() {
            Ok(records) => records.len(),
            Err(err) => {
                warn!(error = %err, "Seat snapshot skipped: booking log unreadable");
                return;
            }
        };
        if let Err(err) = self
            .inventory
            .persist_snapshot(&mut self.snapshots, log_position)
        {
            warn!(error = %err, "Seat snapshot could not be written");
        }
    }
}

/// Replaces an old-format booking log with converted records.
///
/// The old file is renamed to the backup name first, so a failed conversion
/// never loses it.
fn migrate_booking_log(
    files: &DataFiles,
    records: &CsvBookingStore,
    catalog: &Catalog,
) -> Result<(), ApiError> {
    let backup: PathBuf = files.legacy_bookings_backup();
    std::fs::rename(records.path(), &backup).map_err(|err| {
        ApiError::from(PersistenceError::Io {
            path: backup.clone(),
            source: err,
        })
    })?;
    let report: MigrationReport = migrate_legacy_bookings(&backup, catalog)?;
    for skipped in &report.skipped {
        warn!(line = skipped.line, reason = %skipped.reason, "Legacy booking not migrated");
    }
    records.replace_all(&report.records)?;
    info!(
        records = report.records.len(),
        skipped = report.skipped.len(),
        backup = %backup.display(),
        "Booking log converted to the current format"
    );
    Ok(())
}
