// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::BOOKED_AT;
use crate::{
    Booking, BookingId, BookingRecord, BookingStatus, Money, MovieId, ScreenId, SeatCode,
    Showtime, UserId, find_booking, project_bookings,
};
use time::Duration;

fn create_test_record(booking_id: &str, user: &str, seats: &[&str]) -> BookingRecord {
    BookingRecord {
        booking_id: BookingId::new(booking_id).unwrap(),
        timestamp: BOOKED_AT,
        user_id: UserId::new(user).unwrap(),
        user_name: String::from("Test User"),
        screen_id: ScreenId::new("SC1").unwrap(),
        showtime: Showtime::new("10:00").unwrap(),
        seats: seats.iter().map(|s| SeatCode::parse(s).unwrap()).collect(),
        movie_id: MovieId::new(1),
        total_price: Money::from_units(200).times(seats.len()).unwrap(),
        status: BookingStatus::Booked,
        cancelled_at: None,
    }
}

fn cancel(record: &BookingRecord) -> BookingRecord {
    let booking: Booking = find_booking(std::slice::from_ref(record), &record.booking_id).unwrap();
    BookingRecord::cancellation_of(&booking, BOOKED_AT + Duration::hours(1))
}

#[test]
fn test_projection_keeps_creation_order() {
    let records: Vec<BookingRecord> = vec![
        create_test_record("b1", "alice", &["A0"]),
        create_test_record("b2", "bob", &["A1"]),
    ];
    let bookings: Vec<Booking> = project_bookings(&records);
    let ids: Vec<&str> = bookings.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec!["b1", "b2"]);
    assert!(bookings.iter().all(Booking::is_active));
}

#[test]
fn test_cancellation_record_folds_into_booking() {
    let booked: BookingRecord = create_test_record("b1", "alice", &["A0", "A1"]);
    let cancelled: BookingRecord = cancel(&booked);
    let bookings: Vec<Booking> = project_bookings(&[booked, cancelled.clone()]);

    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].status, BookingStatus::Cancelled);
    assert_eq!(bookings[0].cancelled_at, cancelled.cancelled_at);
    assert_eq!(bookings[0].total_price, Money::from_units(400));
}

#[test]
fn test_cancellation_copies_original_price_and_seats() {
    let booked: BookingRecord = create_test_record("b1", "alice", &["A0", "A1"]);
    let cancelled: BookingRecord = cancel(&booked);
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(cancelled.total_price, booked.total_price);
    assert_eq!(cancelled.seats, booked.seats);
    assert!(cancelled.cancelled_at.is_some());
}

#[test]
fn test_duplicate_booked_record_is_ignored() {
    let first: BookingRecord = create_test_record("b1", "alice", &["A0"]);
    let mut replayed: BookingRecord = create_test_record("b1", "alice", &["B0"]);
    replayed.timestamp = BOOKED_AT + Duration::minutes(5);
    let bookings: Vec<Booking> = project_bookings(&[first, replayed]);
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0].seats[0].to_string(), "A0");
}

#[test]
fn test_cancellation_for_unknown_booking_is_ignored() {
    let booked: BookingRecord = create_test_record("b1", "alice", &["A0"]);
    let mut orphan: BookingRecord = cancel(&booked);
    orphan.booking_id = BookingId::new("ghost").unwrap();
    let bookings: Vec<Booking> = project_bookings(&[booked, orphan]);
    assert_eq!(bookings.len(), 1);
    assert!(bookings[0].is_active());
}

#[test]
fn test_rebooking_a_cancelled_seat_creates_independent_booking() {
    let first: BookingRecord = create_test_record("b1", "alice", &["A0"]);
    let cancelled: BookingRecord = cancel(&first);
    let second: BookingRecord = create_test_record("b2", "bob", &["A0"]);
    let bookings: Vec<Booking> = project_bookings(&[first, cancelled, second]);

    let active: Vec<&Booking> = bookings.iter().filter(|b| b.is_active()).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id.as_str(), "b2");
}

#[test]
fn test_price_per_seat_divides_total() {
    let record: BookingRecord = create_test_record("b1", "alice", &["A0", "A1"]);
    let booking: Booking = find_booking(&[record], &BookingId::new("b1").unwrap()).unwrap();
    assert_eq!(booking.price_per_seat(), Money::from_units(200));
}

#[test]
fn test_booking_status_parses_legacy_spellings() {
    assert_eq!("booked".parse::<BookingStatus>().unwrap(), BookingStatus::Booked);
    assert_eq!(
        "Canceled".parse::<BookingStatus>().unwrap(),
        BookingStatus::Cancelled
    );
    assert!("pending".parse::<BookingStatus>().is_err());
}
