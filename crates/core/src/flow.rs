// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The step-by-step booking conversation.
//!
//! A `BookingFlow` walks one customer from choosing a movie to paying. Each
//! step validates its input and advances the stage; calling a step out of
//! order is an error and leaves the flow where it was. Nothing outside the
//! flow changes until `confirm(true)`.

use crate::error::CoreError;
use crate::inventory::HallInventory;
use crate::service::{
    BookingConfirmation, BookingService, SeatSelection, bookable_show, validate_selection,
};
use crate::store::{BookingRecordStore, DiscrepancyJournal, TransactionLog};
use marquee_domain::{
    Catalog, Customer, DomainError, Money, Movie, MovieId, Screen, SeatMap, Showtime, UserId,
};
use std::mem::discriminant;
use tracing::info;

/// Where a booking flow currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowStage {
    /// Waiting for a movie.
    SelectingMovie,
    /// Waiting for a showtime of the chosen movie.
    SelectingShowtime,
    /// Waiting for how many seats to book.
    SelectingSeatCount,
    /// Waiting for the customer to confirm who they are.
    ConfirmingIdentity,
    /// Waiting for the seat codes.
    SelectingSeats,
    /// Waiting for the customer to accept the total.
    AwaitingPaymentConfirmation,
    /// The booking was made.
    Committed(BookingConfirmation),
    /// The customer declined or the booking failed.
    Aborted,
}

impl FlowStage {
    /// Returns a short name for the stage.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectingMovie => "SelectingMovie",
            Self::SelectingShowtime => "SelectingShowtime",
            Self::SelectingSeatCount => "SelectingSeatCount",
            Self::ConfirmingIdentity => "ConfirmingIdentity",
            Self::SelectingSeats => "SelectingSeats",
            Self::AwaitingPaymentConfirmation => "AwaitingPaymentConfirmation",
            Self::Committed(_) => "Committed",
            Self::Aborted => "Aborted",
        }
    }

    /// Checks whether the flow has finished.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed(_) | Self::Aborted)
    }
}

/// One customer's booking in progress.
#[derive(Debug, Clone)]
pub struct BookingFlow {
    customer: Customer,
    stage: FlowStage,
    movie: Option<Movie>,
    showtime: Option<Showtime>,
    seat_count: usize,
    selection: Option<SeatSelection>,
}

impl BookingFlow {
    /// Starts a flow for a customer.
    #[must_use]
    pub const fn new(customer: Customer) -> Self {
        Self {
            customer,
            stage: FlowStage::SelectingMovie,
            movie: None,
            showtime: None,
            seat_count: 0,
            selection: None,
        }
    }

    /// Returns the current stage.
    #[must_use]
    pub const fn stage(&self) -> &FlowStage {
        &self.stage
    }

    /// Returns the customer the flow is for.
    #[must_use]
    pub const fn customer(&self) -> &Customer {
        &self.customer
    }

    /// Chooses the movie.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not selecting a movie, or the movie is
    /// unknown, inactive, or on a screen that is not active.
    pub fn select_movie(&mut self, catalog: &Catalog, movie_id: MovieId) -> Result<(), CoreError> {
        self.require(&FlowStage::SelectingMovie)?;
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
        self.movie = Some(movie.clone());
        self.stage = FlowStage::SelectingShowtime;
        Ok(())
    }

    /// Chooses the showtime and returns how many seats are free.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not selecting a showtime, the screen
    /// does not run it, or it is sold out.
    pub fn select_showtime(
        &mut self,
        catalog: &Catalog,
        inventory: &HallInventory,
        showtime: &Showtime,
    ) -> Result<usize, CoreError> {
        self.require(&FlowStage::SelectingShowtime)?;
        let (_, map): (&Movie, &SeatMap) =
            bookable_show(catalog, inventory, self.movie_id()?, showtime)?;
        let available: usize = map.available_count();
        if available == 0 {
            return Err(CoreError::InvalidSeatCount {
                requested: 1,
                available,
            });
        }
        self.showtime = Some(showtime.clone());
        self.stage = FlowStage::SelectingSeatCount;
        Ok(available)
    }

    /// Chooses how many seats to book.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeatCount` unless `count` is between one and
    /// the number of free seats.
    pub fn select_seat_count(
        &mut self,
        catalog: &Catalog,
        inventory: &HallInventory,
        count: usize,
    ) -> Result<(), CoreError> {
        self.require(&FlowStage::SelectingSeatCount)?;
        let (_, map): (&Movie, &SeatMap) =
            bookable_show(catalog, inventory, self.movie_id()?, self.showtime()?)?;
        let available: usize = map.available_count();
        if count == 0 || count > available {
            return Err(CoreError::InvalidSeatCount {
                requested: count,
                available,
            });
        }
        self.seat_count = count;
        self.stage = FlowStage::ConfirmingIdentity;
        Ok(())
    }

    /// Confirms the person booking is the customer the flow was started for.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::IdentityMismatch` if the identities differ.
    pub fn confirm_identity(&mut self, user_id: &UserId) -> Result<(), CoreError> {
        self.require(&FlowStage::ConfirmingIdentity)?;
        if user_id != &self.customer.user_id {
            return Err(CoreError::IdentityMismatch(user_id.clone()));
        }
        self.stage = FlowStage::SelectingSeats;
        Ok(())
    }

    /// Chooses the seats and returns the total to pay.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidSeatCount` if the number of codes differs
    /// from the chosen count, or any error from seat validation.
    pub fn select_seats(
        &mut self,
        catalog: &Catalog,
        inventory: &HallInventory,
        seat_codes: &[String],
    ) -> Result<Money, CoreError> {
        self.require(&FlowStage::SelectingSeats)?;
        if seat_codes.len() != self.seat_count {
            return Err(CoreError::InvalidSeatCount {
                requested: seat_codes.len(),
                available: self.seat_count,
            });
        }
        let selection: SeatSelection = validate_selection(
            catalog,
            inventory,
            self.movie_id()?,
            self.showtime()?,
            seat_codes,
        )?;
        let total: Money = selection.total_price()?;
        self.selection = Some(selection);
        self.stage = FlowStage::AwaitingPaymentConfirmation;
        Ok(total)
    }

    /// Accepts or declines the total.
    ///
    /// Declining aborts with no side effects. Accepting commits the booking
    /// through the service; the flow ends `Committed` on success and
    /// `Aborted` on failure.
    ///
    /// # Errors
    ///
    /// Returns an error if the flow is not awaiting confirmation, or any
    /// error from committing the booking.
    pub fn confirm<R, L, J>(
        &mut self,
        accept: bool,
        service: &mut BookingService<'_, R, L, J>,
    ) -> Result<&FlowStage, CoreError>
    where
        R: BookingRecordStore,
        L: TransactionLog,
        J: DiscrepancyJournal,
    {
        self.require(&FlowStage::AwaitingPaymentConfirmation)?;
        let Some(selection) = self.selection.take() else {
            return Err(self.out_of_order("SelectingSeats"));
        };
        if !accept {
            info!(user_id = %self.customer.user_id, "Booking declined at payment");
            self.stage = FlowStage::Aborted;
            return Ok(&self.stage);
        }
        match service.commit_selection(&self.customer, &selection) {
            Ok(confirmation) => {
                self.stage = FlowStage::Committed(confirmation);
                Ok(&self.stage)
            }
            Err(err) => {
                self.stage = FlowStage::Aborted;
                Err(err)
            }
        }
    }

    fn require(&self, expected: &FlowStage) -> Result<(), CoreError> {
        if discriminant(&self.stage) != discriminant(expected) {
            return Err(self.out_of_order(expected.name()));
        }
        Ok(())
    }

    const fn out_of_order(&self, expected: &'static str) -> CoreError {
        CoreError::FlowOutOfOrder {
            expected,
            actual: self.stage.name(),
        }
    }

    fn movie_id(&self) -> Result<MovieId, CoreError> {
        self.movie
            .as_ref()
            .map(|movie| movie.id)
            .ok_or_else(|| self.out_of_order("SelectingMovie"))
    }

    fn showtime(&self) -> Result<&Showtime, CoreError> {
        self.showtime
            .as_ref()
            .ok_or_else(|| self.out_of_order("SelectingShowtime"))
    }
}
