// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::create_test_detail;
use crate::{DomainError, SeatCode, SeatMap, SeatState, UnavailableReason};

fn seat(text: &str) -> SeatCode {
    SeatCode::parse(text).unwrap()
}

fn assert_counts_consistent(map: &SeatMap) {
    assert_eq!(map.available_count() + map.booked_count(), map.capacity());
}

#[test]
fn test_new_map_is_all_empty() {
    let map: SeatMap = SeatMap::create(3, 3).unwrap();
    assert_eq!(map.capacity(), 9);
    assert_eq!(map.available_count(), 9);
    assert_eq!(map.booked_count(), 0);
    assert!(
        map.snapshot()
            .iter()
            .all(|row| row.seats.iter().all(|state| *state == SeatState::Empty))
    );
}

#[test]
fn test_create_rejects_bad_dimensions() {
    assert!(matches!(
        SeatMap::create(0, 3),
        Err(DomainError::InvalidDimensions { .. })
    ));
    assert!(SeatMap::create(27, 3).is_err());
    assert!(SeatMap::create(3, 0).is_err());
    assert!(SeatMap::create(26, 1).is_ok());
}

#[test]
fn test_row_and_column_labels() {
    let map: SeatMap = SeatMap::create(3, 4).unwrap();
    let rows: Vec<char> = map.row_labels().collect();
    assert_eq!(rows, vec!['A', 'B', 'C']);
    assert_eq!(map.column_labels(), vec!["0", "1", "2", "3"]);
}

#[test]
fn test_is_valid_seat_checks_bounds() {
    let map: SeatMap = SeatMap::create(3, 3).unwrap();
    assert!(map.is_valid_seat(seat("A0")));
    assert!(map.is_valid_seat(seat("C2")));
    assert!(!map.is_valid_seat(seat("D0")));
    assert!(!map.is_valid_seat(seat("A3")));
}

#[test]
fn test_parse_seat_normalises_case_and_rejects_outside_grid() {
    let map: SeatMap = SeatMap::create(3, 3).unwrap();
    assert_eq!(map.parse_seat("b1").unwrap(), seat("B1"));
    assert!(matches!(
        map.parse_seat("A9"),
        Err(DomainError::InvalidSeatCode { .. })
    ));
    assert!(map.parse_seat("A01").is_err());
}

#[test]
fn test_book_marks_seat_and_decrements_available() {
    let mut map: SeatMap = SeatMap::create(3, 3).unwrap();
    map.book(seat("A0"), create_test_detail("b1", "alice"))
        .unwrap();

    assert_eq!(map.state(seat("A0")), Some(SeatState::Booked));
    assert_eq!(map.available_count(), 8);
    assert_eq!(
        map.detail(seat("A0")).unwrap().booking_id.as_str(),
        "b1"
    );
    assert_counts_consistent(&map);
}

#[test]
fn test_book_twice_fails_with_seat_unavailable() {
    let mut map: SeatMap = SeatMap::create(3, 3).unwrap();
    map.book(seat("A0"), create_test_detail("b1", "alice"))
        .unwrap();

    let result = map.book(seat("A0"), create_test_detail("b2", "bob"));

    assert!(matches!(
        result,
        Err(DomainError::SeatUnavailable {
            reason: UnavailableReason::AlreadyBooked,
            ..
        })
    ));
    assert_eq!(map.detail(seat("A0")).unwrap().user_id.as_str(), "alice");
    assert_eq!(map.available_count(), 8);
}

#[test]
fn test_book_outside_grid_fails_without_change() {
    let mut map: SeatMap = SeatMap::create(2, 2).unwrap();
    let result = map.book(seat("Z9"), create_test_detail("b1", "alice"));
    assert!(matches!(
        result,
        Err(DomainError::SeatUnavailable {
            reason: UnavailableReason::OutsideGrid,
            ..
        })
    ));
    assert_eq!(map.available_count(), 4);
}

#[test]
fn test_free_returns_detail_and_restores_count() {
    let mut map: SeatMap = SeatMap::create(3, 3).unwrap();
    map.book(seat("B2"), create_test_detail("b1", "alice"))
        .unwrap();

    let detail = map.free(seat("B2")).unwrap().unwrap();

    assert_eq!(detail.booking_id.as_str(), "b1");
    assert_eq!(map.state(seat("B2")), Some(SeatState::Empty));
    assert_eq!(map.available_count(), 9);
    assert!(map.detail(seat("B2")).is_none());
}

#[test]
fn test_free_empty_seat_fails_with_seat_not_booked() {
    let mut map: SeatMap = SeatMap::create(3, 3).unwrap();
    assert!(matches!(
        map.free(seat("A0")),
        Err(DomainError::SeatNotBooked { .. })
    ));
    assert!(map.free(seat("Q0")).is_err());
    assert_eq!(map.available_count(), 9);
}

#[test]
fn test_counts_stay_consistent_across_mixed_operations() {
    let mut map: SeatMap = SeatMap::create(4, 5).unwrap();
    let codes: Vec<SeatCode> = ["A0", "A4", "B2", "C3", "D0", "D4"]
        .iter()
        .map(|text| seat(text))
        .collect();

    for (index, code) in codes.iter().enumerate() {
        map.book(*code, create_test_detail(&format!("b{index}"), "alice"))
            .unwrap();
        assert_counts_consistent(&map);
    }
    let _ = map.book(codes[0], create_test_detail("again", "bob"));
    assert_counts_consistent(&map);
    for code in codes.iter().step_by(2) {
        map.free(*code).unwrap();
        assert_counts_consistent(&map);
    }
    let _ = map.free(codes[0]);
    assert_counts_consistent(&map);
    assert_eq!(map.booked_count(), 3);
}

#[test]
fn test_restore_row_sets_states_without_details() {
    let mut map: SeatMap = SeatMap::create(2, 3).unwrap();
    map.restore_row(
        'B',
        &[SeatState::Booked, SeatState::Empty, SeatState::Booked],
    )
    .unwrap();

    assert_eq!(map.available_count(), 4);
    assert_eq!(map.state(seat("B0")), Some(SeatState::Booked));
    assert!(map.detail(seat("B0")).is_none());
    assert_eq!(map.free(seat("B2")).unwrap(), None);
    assert_counts_consistent(&map);
}

#[test]
fn test_restore_row_rejects_wrong_shape() {
    let mut map: SeatMap = SeatMap::create(2, 3).unwrap();
    assert!(matches!(
        map.restore_row('A', &[SeatState::Booked]),
        Err(DomainError::RowShapeMismatch { .. })
    ));
    assert!(map.restore_row('C', &[SeatState::Empty; 3]).is_err());
    assert_eq!(map.available_count(), 6);
}

#[test]
fn test_booked_seats_lists_in_grid_order() {
    let mut map: SeatMap = SeatMap::create(3, 3).unwrap();
    map.book(seat("C1"), create_test_detail("b2", "bob")).unwrap();
    map.book(seat("A2"), create_test_detail("b1", "alice"))
        .unwrap();

    let booked: Vec<String> = map
        .booked_seats()
        .iter()
        .map(|(code, _)| code.to_string())
        .collect();
    assert_eq!(booked, vec!["A2", "C1"]);
}

#[test]
fn test_seat_state_tokens() {
    assert_eq!(SeatState::from_token("0").unwrap(), SeatState::Empty);
    assert_eq!(SeatState::from_token(" X ").unwrap(), SeatState::Booked);
    for token in ["Q", "", "1", "XX"] {
        assert!(
            matches!(SeatState::from_token(token), Err(DomainError::InvalidSeatState(_))),
            "{token:?} should be rejected"
        );
    }
}
