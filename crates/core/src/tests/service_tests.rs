// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    FailingBookingStore, FailingTransactionLog, MOVIE, create_test_hall, create_test_hall_with,
    customer, money, screen_id, seats, showtime, user,
};
use crate::memory::{MemoryBookingStore, MemoryTransactionLog};
use crate::{BookingConfirmation, BookingRecordStore, CancellationConfirmation, CoreError};
use marquee_audit::DiscrepancyKind;
use marquee_domain::{
    BookingStatus, COMPENSATION, DomainError, MovieId, REFUND, ScreenStatus, SeatCode, SeatState,
    project_bookings,
};
use time::macros::date;

#[test]
fn test_scenario_a_booking_debits_wallet_and_books_seats() {
    let mut hall = create_test_hall();

    let confirmation: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]))
        .unwrap();

    assert_eq!(confirmation.total_price, money(400));
    assert_eq!(confirmation.new_balance, money(600));
    assert_eq!(confirmation.movie_title, "M1");
    assert_eq!(hall.available("10:00"), 7);
    let map = hall
        .inventory
        .get_seat_map(&screen_id("SC1"), &showtime("10:00"))
        .unwrap();
    assert_eq!(map.state(SeatCode::parse("A0").unwrap()), Some(SeatState::Booked));
    assert_eq!(map.state(SeatCode::parse("A1").unwrap()), Some(SeatState::Booked));
    assert_eq!(hall.records.records().len(), 1);
    assert_eq!(hall.records.records()[0].booking_id, confirmation.booking_id);
}

#[test]
fn test_scenario_b_second_user_cannot_book_taken_seat() {
    let mut hall = create_test_hall();
    hall.service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]))
        .unwrap();

    let result: Result<BookingConfirmation, CoreError> =
        hall.service()
            .book(&customer("bob"), MOVIE, &showtime("10:00"), &seats(&["A0"]));

    assert_eq!(
        result.unwrap_err(),
        CoreError::SeatUnavailable {
            seat: SeatCode::parse("A0").unwrap()
        }
    );
    assert_eq!(hall.ledger.balance(&user("bob")).unwrap(), money(1000));
    assert_eq!(hall.available("10:00"), 7);
}

#[test]
fn test_scenario_c_cancellation_refunds_and_frees_seats() {
    let mut hall = create_test_hall();
    let booked: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]))
        .unwrap();

    let cancelled: CancellationConfirmation = hall
        .service()
        .cancel(&user("alice"), &booked.booking_id)
        .unwrap();

    assert_eq!(cancelled.refund_amount, money(400));
    assert_eq!(cancelled.new_balance, money(1000));
    assert_eq!(hall.available("10:00"), 9);
    let records = hall.records.records();
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].status, BookingStatus::Cancelled);
    assert!(records[1].cancelled_at.is_some());
}

#[test]
fn test_scenario_d_insufficient_funds_changes_nothing() {
    let mut hall = create_test_hall();
    hall.ledger
        .apply(&user("bob"), money(-900), "test setup")
        .unwrap();

    let result: Result<BookingConfirmation, CoreError> =
        hall.service()
            .book(&customer("bob"), MOVIE, &showtime("10:00"), &seats(&["B2"]));

    assert!(matches!(
        result,
        Err(CoreError::InsufficientFunds { ref balance, ref required, .. })
            if *balance == money(100) && *required == money(200)
    ));
    assert_eq!(hall.ledger.balance(&user("bob")).unwrap(), money(100));
    assert_eq!(hall.available("10:00"), 9);
    assert!(hall.records.records().is_empty());
}

#[test]
fn test_failed_validation_leaves_wallet_untouched() {
    let mut hall = create_test_hall();
    let before = hall.ledger.balance(&user("alice")).unwrap();

    let attempts: Vec<Vec<String>> = vec![
        seats(&["A0", "Z9"]),
        seats(&["A0", "A01"]),
        seats(&["A0", "a0"]),
        seats(&[]),
    ];
    for attempt in attempts {
        let result = hall
            .service()
            .book(&customer("alice"), MOVIE, &showtime("10:00"), &attempt);
        assert!(result.is_err());
    }

    assert_eq!(hall.ledger.balance(&user("alice")).unwrap(), before);
    assert_eq!(hall.available("10:00"), 9);
    assert!(hall.records.records().is_empty());
}

#[test]
fn test_invalid_seat_selection_names_the_seat() {
    let mut hall = create_test_hall();

    let result = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A3"]));

    match result {
        Err(CoreError::InvalidSeatSelection { seat, .. }) => assert_eq!(seat, "A3"),
        other => panic!("expected InvalidSeatSelection, got {other:?}"),
    }
}

#[test]
fn test_repeated_seat_is_rejected() {
    let mut hall = create_test_hall();

    let result = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["b1", "B1"]));

    assert!(matches!(result, Err(CoreError::InvalidSeatSelection { .. })));
}

#[test]
fn test_booking_rejects_unknown_or_inactive_movie() {
    let mut hall = create_test_hall();
    let unknown = hall.service().book(
        &customer("alice"),
        MovieId::new(99),
        &showtime("10:00"),
        &seats(&["A0"]),
    );
    assert_eq!(
        unknown.unwrap_err(),
        CoreError::Domain(DomainError::MovieNotFound(99))
    );

    hall.catalog.deactivate_movie(MOVIE).unwrap();
    let inactive = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0"]));
    assert_eq!(
        inactive.unwrap_err(),
        CoreError::Domain(DomainError::MovieInactive(1))
    );
}

#[test]
fn test_booking_rejects_showtime_not_on_screen() {
    let mut hall = create_test_hall();

    let result = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("22:00"), &seats(&["A0"]));

    assert!(matches!(
        result,
        Err(CoreError::Domain(DomainError::ShowtimeNotFound { .. }))
    ));
}

#[test]
fn test_booking_rejects_screen_under_maintenance() {
    let mut hall = create_test_hall();
    hall.catalog
        .set_screen_status(&screen_id("SC1"), ScreenStatus::Maintenance, date!(2026 - 03 - 01))
        .unwrap();

    let result = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0"]));

    assert!(matches!(
        result,
        Err(CoreError::Domain(DomainError::ScreenNotActive { .. }))
    ));
}

#[test]
fn test_same_seat_is_bookable_at_another_showtime() {
    let mut hall = create_test_hall();
    hall.service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0"]))
        .unwrap();

    let later = hall
        .service()
        .book(&customer("bob"), MOVIE, &showtime("13:00"), &seats(&["A0"]));

    assert!(later.is_ok());
    assert_eq!(hall.available("10:00"), 8);
    assert_eq!(hall.available("13:00"), 8);
}

#[test]
fn test_cancel_rejects_unknown_foreign_and_repeated_cancellations() {
    let mut hall = create_test_hall();
    let booked: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["C2"]))
        .unwrap();

    let missing = hall
        .service()
        .cancel(&user("alice"), &marquee_domain::BookingId::new("nope").unwrap());
    assert!(matches!(missing, Err(CoreError::BookingNotFound(_))));

    let foreign = hall.service().cancel(&user("bob"), &booked.booking_id);
    assert!(matches!(foreign, Err(CoreError::NotYourBooking(_))));
    assert_eq!(hall.available("10:00"), 8);

    hall.service()
        .cancel(&user("alice"), &booked.booking_id)
        .unwrap();
    let again = hall.service().cancel(&user("alice"), &booked.booking_id);
    assert!(matches!(again, Err(CoreError::AlreadyCancelled(_))));
    assert_eq!(hall.ledger.balance(&user("alice")).unwrap(), money(1000));
}

#[test]
fn test_refund_uses_price_paid_not_current_price() {
    let mut hall = create_test_hall();
    let booked: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]))
        .unwrap();
    hall.catalog.set_movie_price(MOVIE, money(350)).unwrap();

    let cancelled: CancellationConfirmation = hall
        .service()
        .cancel(&user("alice"), &booked.booking_id)
        .unwrap();

    assert_eq!(cancelled.refund_amount, money(400));
    assert_eq!(cancelled.new_balance, money(1000));
}

#[test]
fn test_cancelled_seat_can_be_booked_again() {
    let mut hall = create_test_hall();
    let first: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0"]))
        .unwrap();
    hall.service()
        .cancel(&user("alice"), &first.booking_id)
        .unwrap();

    let second = hall
        .service()
        .book(&customer("bob"), MOVIE, &showtime("10:00"), &seats(&["A0"]));

    assert!(second.is_ok());
    let bookings = project_bookings(hall.records.records());
    assert_eq!(bookings.len(), 2);
    assert!(!bookings[0].is_active());
    assert!(bookings[1].is_active());
}

#[test]
fn test_record_failure_credits_purchase_back() {
    let mut hall = create_test_hall_with(
        FailingBookingStore {
            fail_booked: true,
            ..FailingBookingStore::default()
        },
        MemoryTransactionLog::new(),
    );

    let result = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]));

    assert!(matches!(
        result,
        Err(CoreError::PersistenceFailure {
            compensated: true,
            ..
        })
    ));
    assert_eq!(hall.ledger.balance(&user("alice")).unwrap(), money(1000));
    assert_eq!(hall.available("10:00"), 9);
    let descriptions: Vec<String> = hall
        .ledger
        .history(&user("alice"))
        .unwrap()
        .into_iter()
        .map(|transaction| transaction.description)
        .collect();
    assert_eq!(descriptions[0], COMPENSATION);
    assert!(hall.journal.entries().is_empty());
}

#[test]
fn test_failed_compensation_is_journaled() {
    let mut hall = create_test_hall_with(
        FailingBookingStore {
            fail_booked: true,
            ..FailingBookingStore::default()
        },
        FailingTransactionLog::refusing(&[COMPENSATION]),
    );

    let result = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]));

    assert!(matches!(result, Err(CoreError::CompensationFailed { .. })));
    assert_eq!(hall.available("10:00"), 9);
    let entries = hall.journal.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, DiscrepancyKind::CompensationFailed);
    assert_eq!(entries[0].amount, Some(money(400)));
    assert_eq!(entries[0].user_id, user("alice"));
}

#[test]
fn test_failed_refund_keeps_seats_free_and_is_journaled() {
    let mut hall = create_test_hall_with(
        MemoryBookingStore::new(),
        FailingTransactionLog::refusing(&[REFUND]),
    );
    let booked: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]))
        .unwrap();

    let result = hall.service().cancel(&user("alice"), &booked.booking_id);

    assert!(matches!(result, Err(CoreError::RefundFailed { .. })));
    assert_eq!(hall.available("10:00"), 9);
    assert_eq!(hall.ledger.balance(&user("alice")).unwrap(), money(600));
    let entries = hall.journal.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, DiscrepancyKind::RefundFailed);
    assert_eq!(entries[0].booking_id.as_ref(), Some(&booked.booking_id));
}

#[test]
fn test_failed_cancellation_record_reverses_refund_and_rebooks_seats() {
    let mut hall = create_test_hall_with(FailingBookingStore::default(), MemoryTransactionLog::new());
    let booked: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["A0", "A1"]))
        .unwrap();
    hall.records.fail_cancelled = true;

    let result = hall.service().cancel(&user("alice"), &booked.booking_id);

    assert!(matches!(
        result,
        Err(CoreError::PersistenceFailure {
            compensated: true,
            ..
        })
    ));
    assert_eq!(hall.ledger.balance(&user("alice")).unwrap(), money(600));
    assert_eq!(hall.available("10:00"), 7);
    let records = hall.records.load_all().unwrap();
    assert_eq!(records.len(), 1);
    assert!(project_bookings(&records)[0].is_active());
}

#[test]
fn test_seat_detail_records_price_per_seat() {
    let mut hall = create_test_hall();
    let booked: BookingConfirmation = hall
        .service()
        .book(&customer("alice"), MOVIE, &showtime("10:00"), &seats(&["B0", "B1", "B2"]))
        .unwrap();

    let map = hall
        .inventory
        .get_seat_map(&screen_id("SC1"), &showtime("10:00"))
        .unwrap();
    let detail = map.detail(SeatCode::parse("B1").unwrap()).unwrap();
    assert_eq!(detail.booking_id, booked.booking_id);
    assert_eq!(detail.price_paid, money(200));
    assert_eq!(detail.user_name, "alice name");
}
