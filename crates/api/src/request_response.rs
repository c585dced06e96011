// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Requests carry raw text; the box office validates it into domain types.
//! Money is serialised as a decimal string.

use marquee::{BookingConfirmation, CancellationConfirmation, ShowAvailability};
use marquee_audit::Discrepancy;
use marquee_domain::{Booking, Money, Movie, Screen, SeatRowView, WalletTransaction};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// API request to book seats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTicketRequest {
    /// The customer booking.
    pub user_id: String,
    /// Display name stored with the booking; defaults to `user_id`.
    #[serde(default)]
    pub user_name: Option<String>,
    /// The movie.
    pub movie_id: u32,
    /// A showtime on the movie's screen, `HH:MM`.
    pub showtime: String,
    /// Seat codes such as `A0`.
    pub seats: Vec<String>,
}

/// API response for a successful booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookTicketResponse {
    /// The new booking id.
    pub booking_id: String,
    /// The screen.
    pub screen_id: String,
    /// The showtime.
    pub showtime: String,
    /// The movie.
    pub movie_id: u32,
    /// The movie title.
    pub movie_title: String,
    /// The seats booked.
    pub seats: Vec<String>,
    /// Amount charged.
    pub total_price: Money,
    /// Wallet balance after the charge.
    pub new_balance: Money,
}

impl From<BookingConfirmation> for BookTicketResponse {
    fn from(confirmation: BookingConfirmation) -> Self {
        Self {
            booking_id: confirmation.booking_id.to_string(),
            screen_id: confirmation.screen_id.to_string(),
            showtime: confirmation.showtime.to_string(),
            movie_id: confirmation.movie_id.value(),
            movie_title: confirmation.movie_title,
            seats: confirmation.seats.iter().map(ToString::to_string).collect(),
            total_price: confirmation.total_price,
            new_balance: confirmation.new_balance,
        }
    }
}

/// API request to cancel a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelTicketRequest {
    /// The customer cancelling; must own the booking.
    pub user_id: String,
    /// The booking.
    pub booking_id: String,
}

/// API response for a successful cancellation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelTicketResponse {
    /// The cancelled booking.
    pub booking_id: String,
    /// Seats released.
    pub seats: Vec<String>,
    /// Amount credited back.
    pub refund_amount: Money,
    /// Wallet balance after the refund.
    pub new_balance: Money,
}

impl From<CancellationConfirmation> for CancelTicketResponse {
    fn from(confirmation: CancellationConfirmation) -> Self {
        Self {
            booking_id: confirmation.booking_id.to_string(),
            seats: confirmation.seats.iter().map(ToString::to_string).collect(),
            refund_amount: confirmation.refund_amount,
            new_balance: confirmation.new_balance,
        }
    }
}

/// One booking as listed in a customer's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    /// The booking id.
    pub booking_id: String,
    /// When it was made.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The screen.
    pub screen_id: String,
    /// The showtime.
    pub showtime: String,
    /// The movie.
    pub movie_id: u32,
    /// The movie title, if the movie is still in the catalog.
    pub movie_title: Option<String>,
    /// The seats.
    pub seats: Vec<String>,
    /// Amount paid.
    pub total_price: Money,
    /// `BOOKED` or `CANCELLED`.
    pub status: String,
    /// When it was cancelled.
    #[serde(with = "time::serde::rfc3339::option")]
    pub cancelled_at: Option<OffsetDateTime>,
}

impl BookingSummary {
    pub(crate) fn new(booking: &Booking, movie_title: Option<String>) -> Self {
        Self {
            booking_id: booking.id.to_string(),
            created_at: booking.created_at,
            screen_id: booking.screen_id.to_string(),
            showtime: booking.showtime.to_string(),
            movie_id: booking.movie_id.value(),
            movie_title,
            seats: booking.seats.iter().map(ToString::to_string).collect(),
            total_price: booking.total_price,
            status: booking.status.as_str().to_string(),
            cancelled_at: booking.cancelled_at,
        }
    }
}

/// One row of a seat map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRowResponse {
    /// The row letter.
    pub row: String,
    /// `0` for free and `X` for booked, in column order.
    pub seats: Vec<String>,
}

impl From<SeatRowView> for SeatRowResponse {
    fn from(view: SeatRowView) -> Self {
        Self {
            row: view.row.to_string(),
            seats: view
                .seats
                .iter()
                .map(|state| state.token().to_string())
                .collect(),
        }
    }
}

/// The seat map of one showtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatMapResponse {
    /// The screen.
    pub screen_id: String,
    /// The showtime.
    pub showtime: String,
    /// Column labels, `0` upwards.
    pub columns: Vec<String>,
    /// Rows from `A`.
    pub rows: Vec<SeatRowResponse>,
    /// Free seats.
    pub available: usize,
    /// All seats.
    pub capacity: usize,
}

/// Who holds a booked seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatHolderResponse {
    /// The seat.
    pub seat: String,
    /// The booking holding it.
    pub booking_id: String,
    /// The booking owner.
    pub user_id: String,
    /// The owner's name at booking time.
    pub user_name: String,
    /// Per-seat price paid.
    pub price_paid: Money,
    /// When the booking was made.
    #[serde(with = "time::serde::rfc3339")]
    pub booked_at: OffsetDateTime,
}

/// Free seats for one showtime of an active screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    /// The screen.
    pub screen_id: String,
    /// Title of the screen's active movie, or "No movie assigned".
    pub movie_title: String,
    /// The showtime.
    pub showtime: String,
    /// Free seats.
    pub available: usize,
    /// All seats.
    pub capacity: usize,
}

impl From<ShowAvailability> for AvailabilityResponse {
    fn from(show: ShowAvailability) -> Self {
        Self {
            screen_id: show.screen_id.to_string(),
            movie_title: show.movie_title,
            showtime: show.showtime.to_string(),
            available: show.available,
            capacity: show.capacity,
        }
    }
}

/// A wallet balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletResponse {
    /// The account owner.
    pub user_id: String,
    /// Current balance.
    pub balance: Money,
}

/// API request to add money to a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepositRequest {
    /// Amount as a decimal string, e.g. `"250.00"`.
    pub amount: String,
}

/// One wallet transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletTransactionResponse {
    /// When it was applied.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Signed amount.
    pub amount: Money,
    /// Balance afterwards.
    pub balance: Money,
    /// What it was for.
    pub description: String,
}

impl From<WalletTransaction> for WalletTransactionResponse {
    fn from(transaction: WalletTransaction) -> Self {
        Self {
            timestamp: transaction.timestamp,
            amount: transaction.amount,
            balance: transaction.balance,
            description: transaction.description,
        }
    }
}

/// A movie in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieResponse {
    /// The movie id.
    pub movie_id: u32,
    /// The title.
    pub title: String,
    /// Current per-seat price.
    pub price: Money,
    /// The screen it plays on.
    pub screen_id: String,
    /// Whether it can be booked.
    pub active: bool,
}

impl From<&Movie> for MovieResponse {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.id.value(),
            title: movie.title.clone(),
            price: movie.price,
            screen_id: movie.screen_id.to_string(),
            active: movie.active,
        }
    }
}

/// A screen in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenResponse {
    /// The screen id.
    pub screen_id: String,
    /// Row count.
    pub rows: u16,
    /// Column count.
    pub cols: u16,
    /// Showtimes in configured order.
    pub showtimes: Vec<String>,
    /// `Active`, `Maintenance` or `Inactive`.
    pub status: String,
    /// When it last entered maintenance.
    pub last_maintenance: Option<Date>,
}

impl From<&Screen> for ScreenResponse {
    fn from(screen: &Screen) -> Self {
        Self {
            screen_id: screen.id.to_string(),
            rows: screen.rows,
            cols: screen.cols,
            showtimes: screen.showtimes.iter().map(ToString::to_string).collect(),
            status: screen.status.as_str().to_string(),
            last_maintenance: screen.last_maintenance,
        }
    }
}

/// API request to add a screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddScreenRequest {
    /// The new screen id.
    pub screen_id: String,
    /// Row count, 1 to 26.
    pub rows: u16,
    /// Column count, at least 1.
    pub cols: u16,
    /// Showtimes, `HH:MM`.
    #[serde(default)]
    pub showtimes: Vec<String>,
}

/// API request to change a screen's status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetScreenStatusRequest {
    /// The screen.
    pub screen_id: String,
    /// `Active`, `Maintenance` or `Inactive`.
    pub status: String,
}

/// API request to add a movie.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddMovieRequest {
    /// The title.
    pub title: String,
    /// Per-seat price as a decimal string.
    pub price: String,
    /// The screen it plays on.
    pub screen_id: String,
    /// Whether it replaces the screen's current movie straight away.
    pub active: bool,
}

/// An entry in the discrepancy journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscrepancyResponse {
    /// When it was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// What went out of step.
    pub kind: String,
    /// The booking involved.
    pub booking_id: Option<String>,
    /// The affected user.
    pub user_id: String,
    /// The unbalanced amount.
    pub amount: Option<Money>,
    /// Description.
    pub detail: String,
}

impl From<Discrepancy> for DiscrepancyResponse {
    fn from(discrepancy: Discrepancy) -> Self {
        Self {
            timestamp: discrepancy.timestamp,
            kind: discrepancy.kind.as_str().to_string(),
            booking_id: discrepancy.booking_id.map(|id| id.to_string()),
            user_id: discrepancy.user_id.to_string(),
            amount: discrepancy.amount,
            detail: discrepancy.detail,
        }
    }
}
