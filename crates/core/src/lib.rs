// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The Marquee booking core.
//!
//! `HallInventory` holds the seat maps, `WalletLedger` the balances, and a
//! `BookingRecordStore` the append-only booking log that both are
//! reconciled against. `BookingService` coordinates them for one booking or
//! cancellation at a time; `BookingFlow` drives the same booking one step
//! at a time.

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

mod error;
mod flow;
mod inventory;
mod ledger;
pub mod memory;
mod service;
mod store;

#[cfg(test)]
mod tests;

pub use error::{CoreError, StoreError};
pub use flow::{BookingFlow, FlowStage};
pub use inventory::{
    HallInventory, NO_MOVIE_ASSIGNED, ReconcileReport, SeatSnapshot, ShowAvailability,
    SnapshotRow, seat_detail,
};
pub use ledger::{DEFAULT_STARTING_BALANCE, WalletLedger};
pub use service::{
    BookingConfirmation, BookingService, CancellationConfirmation, SeatSelection, bookable_show,
    validate_selection,
};
pub use store::{BookingRecordStore, DiscrepancyJournal, SeatSnapshotStore, TransactionLog};
