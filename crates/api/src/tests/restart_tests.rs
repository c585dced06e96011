// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    available, book, create_book_request, create_cancel_request, create_test_box_office,
    create_test_config,
};
use crate::{
    ApiError, BookTicketResponse, BookingSummary, BoxOffice, BoxOfficeConfig, SeatMapResponse,
};
use marquee_audit::ReconciliationWarning;
use marquee_domain::Money;
use marquee_persistence::DataFiles;
use std::fs;
use tempfile::TempDir;

fn reopen(dir: &TempDir) -> BoxOffice {
    BoxOffice::open(create_test_config(dir)).unwrap()
}

#[test]
fn test_reopen_restores_seats_from_snapshot() {
    let dir: TempDir = TempDir::new().unwrap();
    {
        let mut office: BoxOffice = create_test_box_office(&dir);
        book(&mut office, "alice", &["A0", "A1"]);
        book(&mut office, "bob", &["C2"]);
    }

    let mut office: BoxOffice = reopen(&dir);

    assert!(office.startup_report().from_snapshot);
    assert!(office.startup_report().warnings.is_empty());
    let view: SeatMapResponse = office.seat_map_view("SC1", "10:00").unwrap();
    assert_eq!(view.rows[0].seats, vec!["X", "X", "0"]);
    assert_eq!(view.rows[2].seats, vec!["0", "0", "X"]);
    assert_eq!(
        office.wallet_balance("alice").unwrap().balance,
        Money::from_units(600)
    );
}

#[test]
fn test_reopen_without_snapshot_replays_the_log() {
    let dir: TempDir = TempDir::new().unwrap();
    {
        let mut office: BoxOffice = create_test_box_office(&dir);
        let booking: BookTicketResponse = book(&mut office, "alice", &["A0", "A1"]);
        book(&mut office, "bob", &["B1"]);
        office
            .cancel_ticket(&create_cancel_request("alice", &booking.booking_id))
            .unwrap();
    }
    let mut config: BoxOfficeConfig = create_test_config(&dir);
    config.use_snapshot = false;

    let office: BoxOffice = BoxOffice::open(config).unwrap();

    assert!(!office.startup_report().from_snapshot);
    assert_eq!(office.startup_report().seats_booked, 1);
    assert_eq!(available(&office, "10:00"), 8);
}

#[test]
fn test_older_snapshot_is_brought_up_to_date() {
    let dir: TempDir = TempDir::new().unwrap();
    let files: DataFiles = DataFiles::new(dir.path());
    {
        let mut office: BoxOffice = create_test_box_office(&dir);
        let first: BookTicketResponse = book(&mut office, "alice", &["A0"]);
        let older: String = fs::read_to_string(files.snapshot()).unwrap();
        book(&mut office, "bob", &["B0", "B1"]);
        office
            .cancel_ticket(&create_cancel_request("alice", &first.booking_id))
            .unwrap();
        fs::write(files.snapshot(), older).unwrap();
    }

    let office: BoxOffice = reopen(&dir);

    assert!(office.startup_report().from_snapshot);
    assert_eq!(office.startup_report().seats_booked, 2);
    assert_eq!(office.startup_report().seats_freed, 1);
    let view: SeatMapResponse = office.seat_map_view("SC1", "10:00").unwrap();
    assert_eq!(view.rows[0].seats, vec!["0", "0", "0"]);
    assert_eq!(view.rows[1].seats, vec!["X", "X", "0"]);
}

#[test]
fn test_snapshot_ahead_of_the_log_is_rejected() {
    let dir: TempDir = TempDir::new().unwrap();
    let files: DataFiles = DataFiles::new(dir.path());
    {
        let mut office: BoxOffice = create_test_box_office(&dir);
        book(&mut office, "alice", &["A0"]);
    }
    fs::remove_file(files.bookings()).unwrap();

    let office: BoxOffice = reopen(&dir);

    assert!(!office.startup_report().from_snapshot);
    assert!(matches!(
        office.startup_report().warnings.first(),
        Some(ReconciliationWarning::SnapshotRejected { .. })
    ));
    assert_eq!(available(&office, "10:00"), 9);
}

#[test]
fn test_unreadable_snapshot_falls_back_to_replay() {
    let dir: TempDir = TempDir::new().unwrap();
    let files: DataFiles = DataFiles::new(dir.path());
    {
        let mut office: BoxOffice = create_test_box_office(&dir);
        book(&mut office, "alice", &["B2"]);
    }
    fs::write(files.snapshot(), "this,is\nnot,a snapshot\n").unwrap();

    let office: BoxOffice = reopen(&dir);

    assert!(!office.startup_report().from_snapshot);
    assert_eq!(available(&office, "10:00"), 8);
    assert!(fs::read_to_string(files.snapshot())
        .unwrap()
        .starts_with("ScreenID,ShowTime,Row,SeatStatus,LogPosition"));
}

#[test]
fn test_snapshot_with_corrupt_seat_token_keeps_logged_bookings() {
    let dir: TempDir = TempDir::new().unwrap();
    let files: DataFiles = DataFiles::new(dir.path());
    {
        let mut office: BoxOffice = create_test_box_office(&dir);
        book(&mut office, "alice", &["A0"]);
    }
    let snapshot: String = fs::read_to_string(files.snapshot()).unwrap();
    assert!(snapshot.contains("\"X,0,0\""));
    fs::write(files.snapshot(), snapshot.replace("\"X,0,0\"", "\"Q,0,0\"")).unwrap();

    let mut office: BoxOffice = reopen(&dir);

    assert!(!office.startup_report().from_snapshot);
    let view: SeatMapResponse = office.seat_map_view("SC1", "10:00").unwrap();
    assert_eq!(view.rows[0].seats, vec!["X", "0", "0"]);
    let taken: Result<BookTicketResponse, ApiError> =
        office.book_ticket(&create_book_request("bob", "10:00", &["A0"]));
    assert!(matches!(taken, Err(ApiError::Conflict { .. })));
}

#[test]
fn test_partial_trailing_rows_are_removed_at_open() {
    let dir: TempDir = TempDir::new().unwrap();
    let files: DataFiles = DataFiles::new(dir.path());
    {
        let mut office: BoxOffice = create_test_box_office(&dir);
        book(&mut office, "alice", &["A0"]);
    }
    let mut bookings: String = fs::read_to_string(files.bookings()).unwrap();
    bookings.push_str("2,torn-booking,2026-03-01T");
    fs::write(files.bookings(), bookings).unwrap();
    let mut wallet: String = fs::read_to_string(files.wallet()).unwrap();
    wallet.push_str("2026-03-01T10:00:00Z,alice,-2");
    fs::write(files.wallet(), wallet).unwrap();

    let mut office: BoxOffice = reopen(&dir);

    let truncated: usize = office
        .startup_report()
        .warnings
        .iter()
        .filter(|warning| matches!(warning, ReconciliationWarning::TruncatedRow { .. }))
        .count();
    assert_eq!(truncated, 2);
    assert_eq!(available(&office, "10:00"), 8);
    assert_eq!(
        office.wallet_balance("alice").unwrap().balance,
        Money::from_units(800)
    );
    book(&mut office, "bob", &["B0"]);
    assert_eq!(reopen(&dir).bookings_for("bob").unwrap().len(), 1);
}

#[test]
fn test_legacy_booking_log_is_converted_at_open() {
    let dir: TempDir = TempDir::new().unwrap();
    let files: DataFiles = DataFiles::new(dir.path());
    drop(create_test_box_office(&dir));
    let legacy: &str = "Date,UserName,UID,ScreenID,Show_Timing,Seat_Numbers,Movie_Name,Total_Price,Ticket_Status\n\
        2025-03-01,Asha,asha,SC1,10:00,\"['A0', 'A1']\",Dune,400,booked\n\
        2025-03-02,Asha,asha,SC1,10:00,['A1'],Dune,-200,cancelled\n\
        2025-03-02,Ravi,ravi,SC1,10:00,['C1'],Dune,200,booked\n";
    fs::write(files.bookings(), legacy).unwrap();

    let office: BoxOffice = reopen(&dir);

    assert_eq!(fs::read_to_string(files.legacy_bookings_backup()).unwrap(), legacy);
    assert!(fs::read_to_string(files.bookings())
        .unwrap()
        .starts_with("SchemaVersion,BookingID"));
    let view: SeatMapResponse = office.seat_map_view("SC1", "10:00").unwrap();
    assert_eq!(view.rows[0].seats, vec!["X", "0", "0"]);
    assert_eq!(view.rows[2].seats, vec!["0", "X", "0"]);

    let asha: Vec<BookingSummary> = office.active_bookings_for("asha").unwrap();
    assert_eq!(asha.len(), 1);
    assert_eq!(asha[0].booking_id, "legacy-3");
    assert_eq!(asha[0].seats, vec!["A0"]);
    assert_eq!(asha[0].total_price, Money::from_units(200));
    assert_eq!(office.bookings_for("asha").unwrap().len(), 2);
}
