// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage seams.
//!
//! The core only ever appends to its logs. Implementations decide how an
//! append becomes durable; `marquee-persistence` provides flat-file ones and
//! [`crate::memory`] provides in-memory ones.

use crate::error::StoreError;
use crate::inventory::SeatSnapshot;
use marquee_audit::Discrepancy;
use marquee_domain::{Booking, BookingId, BookingRecord, WalletTransaction, find_booking};
use time::OffsetDateTime;

/// Append-only log of booking and cancellation records.
///
/// This log is the ground truth for seat state.
pub trait BookingRecordStore {
    /// Durably appends one record. Prior records are never changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be made durable.
    fn append(&mut self, record: &BookingRecord) -> Result<(), StoreError>;

    /// Returns every record in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    fn load_all(&self) -> Result<Vec<BookingRecord>, StoreError>;

    /// Cancels a booking by appending a `Cancelled` record for it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::UnknownBooking` if the log has no such booking,
    /// or any error from reading or appending.
    fn mark_cancelled(
        &mut self,
        booking_id: &BookingId,
        cancelled_at: OffsetDateTime,
    ) -> Result<BookingRecord, StoreError> {
        let records: Vec<BookingRecord> = self.load_all()?;
        let booking: Booking = find_booking(&records, booking_id)
            .ok_or_else(|| StoreError::UnknownBooking(booking_id.clone()))?;
        let record: BookingRecord = BookingRecord::cancellation_of(&booking, cancelled_at);
        self.append(&record)?;
        Ok(record)
    }
}

/// Append-only wallet transaction log.
pub trait TransactionLog {
    /// Durably appends one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction could not be made durable.
    fn append(&mut self, transaction: &WalletTransaction) -> Result<(), StoreError>;

    /// Returns every transaction in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be read.
    fn load_all(&self) -> Result<Vec<WalletTransaction>, StoreError>;
}

/// Advisory seat-state cache.
pub trait SeatSnapshotStore {
    /// Replaces the stored snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written.
    fn save(&mut self, snapshot: &SeatSnapshot) -> Result<(), StoreError>;

    /// Returns the stored snapshot, or `None` if there is none.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot exists but cannot be read.
    fn load(&self) -> Result<Option<SeatSnapshot>, StoreError>;
}

/// Where discrepancies go for operator follow-up.
pub trait DiscrepancyJournal {
    /// Records one discrepancy.
    ///
    /// # Errors
    ///
    /// Returns an error if the discrepancy could not be written.
    fn record(&mut self, discrepancy: &Discrepancy) -> Result<(), StoreError>;
}
