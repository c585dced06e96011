// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking and cancellation orchestration.
//!
//! A booking touches three things that cannot be written atomically: the
//! wallet log, the seat map and the booking log. `BookingService` orders the
//! steps so that any failure after the wallet moves is undone with a
//! compensating wallet entry, and anything that cannot be undone is
//! journaled as a `Discrepancy`.

use crate::error::CoreError;
use crate::inventory::{HallInventory, seat_detail};
use crate::ledger::WalletLedger;
use crate::store::{BookingRecordStore, DiscrepancyJournal, TransactionLog};
use marquee_audit::{Discrepancy, DiscrepancyKind};
use marquee_domain::{
    Booking, BookingId, BookingRecord, BookingStatus, COMPENSATION, Catalog, Customer,
    DomainError, Money, Movie, MovieId, PURCHASE, REFUND, REFUND_REVERSAL, Screen, ScreenId,
    SeatCode, SeatMap, Showtime, UserId, find_booking,
};
use time::OffsetDateTime;
use tracing::{error, info, warn};

/// Result of a committed booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    /// The new booking.
    pub booking_id: BookingId,
    /// The screen.
    pub screen_id: ScreenId,
    /// The showtime.
    pub showtime: Showtime,
    /// The movie.
    pub movie_id: MovieId,
    /// The movie title at booking time.
    pub movie_title: String,
    /// Seats booked, in selection order.
    pub seats: Vec<SeatCode>,
    /// Amount debited.
    pub total_price: Money,
    /// Wallet balance after the debit.
    pub new_balance: Money,
}

/// Result of a committed cancellation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationConfirmation {
    /// The cancelled booking.
    pub booking_id: BookingId,
    /// Seats released.
    pub seats: Vec<SeatCode>,
    /// Amount credited back.
    pub refund_amount: Money,
    /// Wallet balance after the refund.
    pub new_balance: Money,
}

/// A seat selection that passed every check against the catalog and inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatSelection {
    /// The movie being booked.
    pub movie: Movie,
    /// The showtime.
    pub showtime: Showtime,
    /// Distinct, currently free seats.
    pub seats: Vec<SeatCode>,
}

impl SeatSelection {
    /// Returns the price of the whole selection at the movie's current price.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the total is out of range.
    pub fn total_price(&self) -> Result<Money, DomainError> {
        self.movie.price.times(self.seats.len())
    }
}

/// Looks up a bookable movie and the seat map for one of its showtimes.
///
/// # Errors
///
/// Returns an error if the movie is unknown or inactive, its screen is not
/// active, or the screen does not run the showtime.
pub fn bookable_show<'a>(
    catalog: &'a Catalog,
    inventory: &'a HallInventory,
    movie_id: MovieId,
    showtime: &Showtime,
) -> Result<(&'a Movie, &'a SeatMap), CoreError> {
    let movie: &Movie = catalog
        .movie(movie_id)
        .ok_or(DomainError::MovieNotFound(movie_id.value()))?;
    if !movie.active {
        return Err(DomainError::MovieInactive(movie_id.value()).into());
    }
    let screen: &Screen = catalog
        .screen(&movie.screen_id)
        .ok_or_else(|| DomainError::ScreenNotFound(movie.screen_id.to_string()))?;
    if !screen.is_active() {
        return Err(DomainError::ScreenNotActive {
            screen_id: screen.id.to_string(),
            status: screen.status.to_string(),
        }
        .into());
    }
    if !screen.has_showtime(showtime) {
        return Err(DomainError::ShowtimeNotFound {
            screen_id: screen.id.to_string(),
            showtime: showtime.to_string(),
        }
        .into());
    }
    let map: &SeatMap = inventory.get_seat_map(&screen.id, showtime)?;
    Ok((movie, map))
}

/// Validates a whole seat selection without changing anything.
///
/// Every seat must parse against the screen's labels, appear once, and be
/// free right now.
///
/// # Errors
///
/// Returns the first problem found: a catalog error from [`bookable_show`],
/// `DomainError::EmptySeatSelection`, `CoreError::InvalidSeatSelection` for
/// a malformed or repeated seat, or `CoreError::SeatUnavailable` for a seat
/// that is already booked.
pub fn validate_selection(
    catalog: &Catalog,
    inventory: &HallInventory,
    movie_id: MovieId,
    showtime: &Showtime,
    seat_codes: &[String],
) -> Result<SeatSelection, CoreError> {
    let (movie, map) = bookable_show(catalog, inventory, movie_id, showtime)?;
    if seat_codes.is_empty() {
        return Err(DomainError::EmptySeatSelection.into());
    }

    let mut seats: Vec<SeatCode> = Vec::with_capacity(seat_codes.len());
    for text in seat_codes {
        let seat: SeatCode =
            map.parse_seat(text.trim())
                .map_err(|err| CoreError::InvalidSeatSelection {
                    seat: text.clone(),
                    reason: err.to_string(),
                })?;
        if seats.contains(&seat) {
            return Err(CoreError::InvalidSeatSelection {
                seat: text.clone(),
                reason: String::from("seat selected more than once"),
            });
        }
        if !map.is_available(seat) {
            return Err(CoreError::SeatUnavailable { seat });
        }
        seats.push(seat);
    }

    Ok(SeatSelection {
        movie: movie.clone(),
        showtime: showtime.clone(),
        seats,
    })
}

/// Coordinates the catalog, seat inventory, wallet and booking log.
///
/// Holds no state of its own.
pub struct BookingService<'a, R, L, J>
where
    R: BookingRecordStore,
    L: TransactionLog,
    J: DiscrepancyJournal,
{
    catalog: &'a Catalog,
    inventory: &'a mut HallInventory,
    ledger: &'a mut WalletLedger<L>,
    records: &'a mut R,
    journal: &'a mut J,
}

impl<'a, R, L, J> BookingService<'a, R, L, J>
where
    R: BookingRecordStore,
    L: TransactionLog,
    J: DiscrepancyJournal,
{
    /// Creates a service over borrowed collaborators.
    pub const fn new(
        catalog: &'a Catalog,
        inventory: &'a mut HallInventory,
        ledger: &'a mut WalletLedger<L>,
        records: &'a mut R,
        journal: &'a mut J,
    ) -> Self {
        Self {
            catalog,
            inventory,
            ledger,
            records,
            journal,
        }
    }

    /// Books seats and charges the customer's wallet.
    ///
    /// Everything is validated before anything changes. The wallet is then
    /// debited, the seats booked and one `Booked` record appended. If booking
    /// the seats or appending the record fails, the seats are released and
    /// the debit is credited back before the error is returned.
    ///
    /// # Arguments
    ///
    /// * `customer` - Who is booking
    /// * `movie_id` - The movie
    /// * `showtime` - A showtime on the movie's screen
    /// * `seat_codes` - Seat codes as entered, e.g. `["A0", "a1"]`
    ///
    /// # Errors
    ///
    /// Returns a validation error or `CoreError::InsufficientFunds` with no
    /// side effects, `CoreError::PersistenceFailure` with `compensated` set
    /// after a successful compensation, or `CoreError::CompensationFailed`
    /// if the wallet could not be restored.
    pub fn book(
        &mut self,
        customer: &Customer,
        movie_id: MovieId,
        showtime: &Showtime,
        seat_codes: &[String],
    ) -> Result<BookingConfirmation, CoreError> {
        let selection: SeatSelection =
            validate_selection(self.catalog, self.inventory, movie_id, showtime, seat_codes)?;
        self.commit(customer, &selection)
    }

    /// Books a selection that was validated earlier, such as by a
    /// [`BookingFlow`](crate::BookingFlow).
    ///
    /// The selection is validated again against the current catalog and
    /// inventory before the wallet is touched, so a seat taken since then
    /// fails with no side effects and the current price is charged.
    ///
    /// # Errors
    ///
    /// See [`BookingService::book`].
    pub fn commit_selection(
        &mut self,
        customer: &Customer,
        selection: &SeatSelection,
    ) -> Result<BookingConfirmation, CoreError> {
        let seat_codes: Vec<String> = selection.seats.iter().map(ToString::to_string).collect();
        let current: SeatSelection = validate_selection(
            self.catalog,
            self.inventory,
            selection.movie.id,
            &selection.showtime,
            &seat_codes,
        )?;
        self.commit(customer, &current)
    }

    fn commit(
        &mut self,
        customer: &Customer,
        selection: &SeatSelection,
    ) -> Result<BookingConfirmation, CoreError> {
        let total_price: Money = selection.total_price()?;
        let new_balance: Money = self
            .ledger
            .apply(&customer.user_id, -total_price, PURCHASE)?;

        let booking: Booking = Booking {
            id: BookingId::generate(),
            created_at: OffsetDateTime::now_utc(),
            user_id: customer.user_id.clone(),
            user_name: customer.name.clone(),
            screen_id: selection.movie.screen_id.clone(),
            showtime: selection.showtime.clone(),
            movie_id: selection.movie.id,
            seats: selection.seats.clone(),
            total_price,
            status: BookingStatus::Booked,
            cancelled_at: None,
        };

        if let Err(err) = self.occupy_and_record(&booking) {
            return Err(self.compensate(&booking, err));
        }

        info!(
            booking_id = %booking.id,
            user_id = %booking.user_id,
            screen_id = %booking.screen_id,
            showtime = %booking.showtime,
            seats = booking.seats.len(),
            total_price = %total_price,
            "Booking committed"
        );

        Ok(BookingConfirmation {
            booking_id: booking.id,
            screen_id: booking.screen_id,
            showtime: booking.showtime,
            movie_id: booking.movie_id,
            movie_title: selection.movie.title.clone(),
            seats: booking.seats,
            total_price,
            new_balance,
        })
    }

    /// Cancels a booking and refunds what was paid for it.
    ///
    /// Seats are freed first; seats that are already free are logged and
    /// skipped. The refund is the total recorded at booking time. If the
    /// refund fails the seats stay free and a discrepancy is journaled. If
    /// the cancellation record cannot be written, the refund is reversed and
    /// the seats are booked again.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::BookingNotFound`, `CoreError::NotYourBooking` or
    /// `CoreError::AlreadyCancelled` with no side effects,
    /// `CoreError::RefundFailed` if the wallet credit failed,
    /// `CoreError::PersistenceFailure` if the record append failed and was
    /// undone, or `CoreError::CompensationFailed` if undoing it failed.
    pub fn cancel(
        &mut self,
        user_id: &UserId,
        booking_id: &BookingId,
    ) -> Result<CancellationConfirmation, CoreError> {
        let records: Vec<BookingRecord> =
            self.records.load_all().map_err(CoreError::persistence)?;
        let booking: Booking = find_booking(&records, booking_id)
            .ok_or_else(|| CoreError::BookingNotFound(booking_id.clone()))?;
        if &booking.user_id != user_id {
            return Err(CoreError::NotYourBooking(booking_id.clone()));
        }
        if !booking.is_active() {
            return Err(CoreError::AlreadyCancelled(booking_id.clone()));
        }

        let released: Vec<SeatCode> = self.release_seats(&booking);
        let refund: Money = booking.total_price;

        let new_balance: Money = match self.ledger.apply(user_id, refund, REFUND) {
            Ok(balance) => balance,
            Err(err) => {
                error!(
                    booking_id = %booking.id,
                    user_id = %user_id,
                    amount = %refund,
                    error = %err,
                    "Refund failed after seats were released"
                );
                self.report_discrepancy(
                    Discrepancy::new(
                        OffsetDateTime::now_utc(),
                        DiscrepancyKind::RefundFailed,
                        user_id.clone(),
                        err.to_string(),
                    )
                    .with_booking(booking.id.clone())
                    .with_amount(refund),
                );
                return Err(CoreError::RefundFailed {
                    booking_id: booking.id,
                    source: Box::new(err),
                });
            }
        };

        if let Err(source) = self
            .records
            .mark_cancelled(&booking.id, OffsetDateTime::now_utc())
        {
            let original: CoreError = CoreError::persistence(source.clone());
            self.reoccupy(&booking, &released);
            return match self.ledger.apply(user_id, -refund, REFUND_REVERSAL) {
                Ok(_) => Err(CoreError::PersistenceFailure {
                    source,
                    compensated: true,
                }),
                Err(reversal) => {
                    error!(
                        booking_id = %booking.id,
                        user_id = %user_id,
                        amount = %refund,
                        error = %reversal,
                        "Cancellation record and refund reversal both failed"
                    );
                    self.report_discrepancy(
                        Discrepancy::new(
                            OffsetDateTime::now_utc(),
                            DiscrepancyKind::RefundReversalFailed,
                            user_id.clone(),
                            format!("{original}; reversal failed: {reversal}"),
                        )
                        .with_booking(booking.id.clone())
                        .with_amount(refund),
                    );
                    Err(CoreError::CompensationFailed {
                        original: Box::new(original),
                        compensation: Box::new(reversal),
                    })
                }
            };
        }

        info!(
            booking_id = %booking.id,
            user_id = %user_id,
            refund = %refund,
            "Booking cancelled"
        );

        Ok(CancellationConfirmation {
            booking_id: booking.id,
            seats: booking.seats,
            refund_amount: refund,
            new_balance,
        })
    }

    /// Books every seat of the booking and appends its record.
    ///
    /// On failure every seat this call booked has been released again.
    fn occupy_and_record(&mut self, booking: &Booking) -> Result<(), CoreError> {
        let map: &mut SeatMap = self
            .inventory
            .get_seat_map_mut(&booking.screen_id, &booking.showtime)?;
        let mut booked: Vec<SeatCode> = Vec::with_capacity(booking.seats.len());
        for seat in &booking.seats {
            if let Err(err) = map.book(*seat, seat_detail(booking)) {
                for done in &booked {
                    if let Err(rollback) = map.free(*done) {
                        warn!(
                            booking_id = %booking.id,
                            seat = %done,
                            error = %rollback,
                            "Failed to release seat while rolling back booking"
                        );
                    }
                }
                return Err(match err {
                    DomainError::SeatUnavailable { .. } => {
                        CoreError::SeatUnavailable { seat: *seat }
                    }
                    other => other.into(),
                });
            }
            booked.push(*seat);
        }

        if let Err(source) = self.records.append(&booking.to_record()) {
            self.release_seats(booking);
            return Err(CoreError::persistence(source));
        }
        Ok(())
    }

    /// Credits back a purchase whose booking did not commit.
    fn compensate(&mut self, booking: &Booking, original: CoreError) -> CoreError {
        match self
            .ledger
            .apply(&booking.user_id, booking.total_price, COMPENSATION)
        {
            Ok(balance) => {
                warn!(
                    booking_id = %booking.id,
                    user_id = %booking.user_id,
                    amount = %booking.total_price,
                    balance = %balance,
                    error = %original,
                    "Booking failed after payment; purchase credited back"
                );
                match original {
                    CoreError::PersistenceFailure { source, .. } => {
                        CoreError::PersistenceFailure {
                            source,
                            compensated: true,
                        }
                    }
                    other => other,
                }
            }
            Err(compensation) => {
                error!(
                    booking_id = %booking.id,
                    user_id = %booking.user_id,
                    amount = %booking.total_price,
                    error = %original,
                    compensation_error = %compensation,
                    "Booking failed after payment and the purchase could not be credited back"
                );
                self.report_discrepancy(
                    Discrepancy::new(
                        OffsetDateTime::now_utc(),
                        DiscrepancyKind::CompensationFailed,
                        booking.user_id.clone(),
                        format!("{original}; compensation failed: {compensation}"),
                    )
                    .with_booking(booking.id.clone())
                    .with_amount(booking.total_price),
                );
                CoreError::CompensationFailed {
                    original: Box::new(original),
                    compensation: Box::new(compensation),
                }
            }
        }
    }

    /// Frees the booking's seats and returns the ones that were actually freed.
    fn release_seats(&mut self, booking: &Booking) -> Vec<SeatCode> {
        let map: &mut SeatMap = match self
            .inventory
            .get_seat_map_mut(&booking.screen_id, &booking.showtime)
        {
            Ok(map) => map,
            Err(err) => {
                warn!(
                    booking_id = %booking.id,
                    screen_id = %booking.screen_id,
                    showtime = %booking.showtime,
                    error = %err,
                    "No seat map for booking; nothing to release"
                );
                return Vec::new();
            }
        };

        let mut released: Vec<SeatCode> = Vec::with_capacity(booking.seats.len());
        for seat in &booking.seats {
            let held_by_other: bool = map
                .detail(*seat)
                .is_some_and(|detail| detail.booking_id != booking.id);
            if held_by_other {
                warn!(booking_id = %booking.id, seat = %seat, "Seat is held by another booking");
                continue;
            }
            match map.free(*seat) {
                Ok(_) => released.push(*seat),
                Err(_) => {
                    warn!(booking_id = %booking.id, seat = %seat, "Seat was already free");
                }
            }
        }
        released
    }

    /// Books the given seats for the booking again after a failed cancellation.
    fn reoccupy(&mut self, booking: &Booking, seats: &[SeatCode]) {
        let Ok(map) = self
            .inventory
            .get_seat_map_mut(&booking.screen_id, &booking.showtime)
        else {
            return;
        };
        for seat in seats {
            if let Err(err) = map.book(*seat, seat_detail(booking)) {
                warn!(booking_id = %booking.id, seat = %seat, error = %err, "Could not re-book seat");
            }
        }
    }

    fn report_discrepancy(&mut self, discrepancy: Discrepancy) {
        if let Err(err) = self.journal.record(&discrepancy) {
            error!(
                kind = %discrepancy.kind,
                user_id = %discrepancy.user_id,
                detail = %discrepancy.detail,
                error = %err,
                "Could not journal discrepancy"
            );
        }
    }
}
