// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::memory::{MemoryBookingStore, MemoryJournal, MemoryTransactionLog};
use crate::{
    BookingRecordStore, BookingService, HallInventory, StoreError, TransactionLog, WalletLedger,
};
use marquee_domain::{
    BookingId, BookingRecord, BookingStatus, Catalog, Customer, Money, MovieId, ScreenId,
    SeatCode, Showtime, UserId, WalletTransaction,
};
use time::macros::datetime;

pub const MOVIE: MovieId = MovieId::new(1);

pub fn screen_id(value: &str) -> ScreenId {
    ScreenId::new(value).unwrap()
}

pub fn showtime(value: &str) -> Showtime {
    Showtime::new(value).unwrap()
}

pub fn user(value: &str) -> UserId {
    UserId::new(value).unwrap()
}

pub fn customer(value: &str) -> Customer {
    Customer::new(user(value), format!("{value} name"))
}

pub fn seats(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|code| (*code).to_string()).collect()
}

pub fn money(units: i64) -> Money {
    Money::from_units(units)
}

/// Screen SC1 (3x3, 10:00 and 13:00) showing movie 1 at 200.
pub fn create_test_catalog() -> Catalog {
    let mut catalog: Catalog = Catalog::new();
    catalog
        .add_screen(
            marquee_domain::Screen::new(
                screen_id("SC1"),
                3,
                3,
                vec![showtime("10:00"), showtime("13:00")],
            )
            .unwrap(),
        )
        .unwrap();
    catalog
        .add_movie("M1", money(200), screen_id("SC1"), true)
        .unwrap();
    catalog
}

pub fn create_test_record(
    booking_id: &str,
    screen: &str,
    time: &str,
    codes: &[&str],
    status: BookingStatus,
) -> BookingRecord {
    BookingRecord {
        booking_id: BookingId::new(booking_id).unwrap(),
        timestamp: datetime!(2026-03-01 09:00 UTC),
        user_id: user("alice"),
        user_name: String::from("Alice"),
        screen_id: screen_id(screen),
        showtime: showtime(time),
        seats: codes.iter().map(|code| SeatCode::parse(code).unwrap()).collect(),
        movie_id: MOVIE,
        total_price: money(200).times(codes.len()).unwrap(),
        status,
        cancelled_at: match status {
            BookingStatus::Booked => None,
            BookingStatus::Cancelled => Some(datetime!(2026-03-01 09:30 UTC)),
        },
    }
}

pub struct TestHall<R: BookingRecordStore, L: TransactionLog> {
    pub catalog: Catalog,
    pub inventory: HallInventory,
    pub ledger: WalletLedger<L>,
    pub records: R,
    pub journal: MemoryJournal,
}

impl<R: BookingRecordStore, L: TransactionLog> TestHall<R, L> {
    pub fn service(&mut self) -> BookingService<'_, R, L, MemoryJournal> {
        BookingService::new(
            &self.catalog,
            &mut self.inventory,
            &mut self.ledger,
            &mut self.records,
            &mut self.journal,
        )
    }

    pub fn available(&self, time: &str) -> usize {
        self.inventory
            .get_seat_map(&screen_id("SC1"), &showtime(time))
            .unwrap()
            .available_count()
    }
}

pub fn create_test_hall_with<R: BookingRecordStore, L: TransactionLog>(
    records: R,
    log: L,
) -> TestHall<R, L> {
    let catalog: Catalog = create_test_catalog();
    let mut inventory: HallInventory = HallInventory::new();
    inventory.configure_from_catalog(&catalog).unwrap();
    TestHall {
        catalog,
        inventory,
        ledger: WalletLedger::open(log, money(1000)).unwrap(),
        records,
        journal: MemoryJournal::new(),
    }
}

pub type MemoryHall = TestHall<MemoryBookingStore, MemoryTransactionLog>;

pub fn create_test_hall() -> MemoryHall {
    create_test_hall_with(MemoryBookingStore::new(), MemoryTransactionLog::new())
}

fn disk_full(location: &str) -> StoreError {
    StoreError::Io {
        location: location.to_string(),
        message: String::from("disk full"),
    }
}

/// A booking log whose appends can be made to fail by status.
#[derive(Debug, Default)]
pub struct FailingBookingStore {
    pub inner: MemoryBookingStore,
    pub fail_booked: bool,
    pub fail_cancelled: bool,
}

impl BookingRecordStore for FailingBookingStore {
    fn append(&mut self, record: &BookingRecord) -> Result<(), StoreError> {
        let fail: bool = match record.status {
            BookingStatus::Booked => self.fail_booked,
            BookingStatus::Cancelled => self.fail_cancelled,
        };
        if fail {
            return Err(disk_full("bookings"));
        }
        self.inner.append(record)
    }

    fn load_all(&self) -> Result<Vec<BookingRecord>, StoreError> {
        self.inner.load_all()
    }
}

/// A wallet log that refuses transactions with the listed descriptions.
#[derive(Debug, Default)]
pub struct FailingTransactionLog {
    pub inner: MemoryTransactionLog,
    pub failing: Vec<&'static str>,
}

impl FailingTransactionLog {
    pub fn refusing(descriptions: &[&'static str]) -> Self {
        Self {
            inner: MemoryTransactionLog::new(),
            failing: descriptions.to_vec(),
        }
    }
}

impl TransactionLog for FailingTransactionLog {
    fn append(&mut self, transaction: &WalletTransaction) -> Result<(), StoreError> {
        if self
            .failing
            .iter()
            .any(|description| *description == transaction.description)
        {
            return Err(disk_full("wallet"));
        }
        self.inner.append(transaction)
    }

    fn load_all(&self) -> Result<Vec<WalletTransaction>, StoreError> {
        self.inner.load_all()
    }
}
