// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The box office boundary.
//!
//! [`BoxOffice`] is the one type an outer surface talks to. It takes raw
//! request values, validates them into domain types, runs the operation
//! against the flat-file stores and answers with serialisable responses or
//! an [`ApiError`].

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod box_office;
mod config;
mod error;
mod request_response;

#[cfg(test)]
mod tests;

pub use box_office::BoxOffice;
pub use config::{BoxOfficeConfig, DEFAULT_DATA_DIR};
pub use error::{ApiError, translate_core_error, translate_domain_error};
pub use request_response::{
    AddMovieRequest, AddScreenRequest, AvailabilityResponse, BookTicketRequest,
    BookTicketResponse, BookingSummary, CancelTicketRequest, CancelTicketResponse,
    DepositRequest, DiscrepancyResponse, MovieResponse, ScreenResponse, SeatHolderResponse,
    SeatMapResponse, SeatRowResponse, SetScreenStatusRequest, WalletResponse,
    WalletTransactionResponse,
};
