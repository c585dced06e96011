// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory store implementations.

use crate::error::StoreError;
use crate::inventory::SeatSnapshot;
use crate::store::{BookingRecordStore, DiscrepancyJournal, SeatSnapshotStore, TransactionLog};
use marquee_audit::Discrepancy;
use marquee_domain::{BookingRecord, WalletTransaction};

/// A booking log held in a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemoryBookingStore {
    records: Vec<BookingRecord>,
}

impl MemoryBookingStore {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Creates a log pre-populated with records.
    #[must_use]
    pub const fn with_records(records: Vec<BookingRecord>) -> Self {
        Self { records }
    }

    /// Returns the records appended so far.
    #[must_use]
    pub fn records(&self) -> &[BookingRecord] {
        &self.records
    }
}

impl BookingRecordStore for MemoryBookingStore {
    fn append(&mut self, record: &BookingRecord) -> Result<(), StoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<BookingRecord>, StoreError> {
        Ok(self.records.clone())
    }
}

/// A wallet transaction log held in a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionLog {
    transactions: Vec<WalletTransaction>,
}

impl MemoryTransactionLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            transactions: Vec::new(),
        }
    }

    /// Returns the transactions appended so far.
    #[must_use]
    pub fn transactions(&self) -> &[WalletTransaction] {
        &self.transactions
    }
}

impl TransactionLog for MemoryTransactionLog {
    fn append(&mut self, transaction: &WalletTransaction) -> Result<(), StoreError> {
        self.transactions.push(transaction.clone());
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<WalletTransaction>, StoreError> {
        Ok(self.transactions.clone())
    }
}

/// Holds at most one snapshot.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    snapshot: Option<SeatSnapshot>,
}

impl MemorySnapshotStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self { snapshot: None }
    }
}

impl SeatSnapshotStore for MemorySnapshotStore {
    fn save(&mut self, snapshot: &SeatSnapshot) -> Result<(), StoreError> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn load(&self) -> Result<Option<SeatSnapshot>, StoreError> {
        Ok(self.snapshot.clone())
    }
}

/// Collects discrepancies in a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct MemoryJournal {
    entries: Vec<Discrepancy>,
}

impl MemoryJournal {
    /// Creates an empty journal.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the discrepancies recorded so far.
    #[must_use]
    pub fn entries(&self) -> &[Discrepancy] {
        &self.entries
    }
}

impl DiscrepancyJournal for MemoryJournal {
    fn record(&mut self, discrepancy: &Discrepancy) -> Result<(), StoreError> {
        self.entries.push(discrepancy.clone());
        Ok(())
    }
}
