// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BookingId, DomainError, Money, ScreenId, SeatCode, Showtime, UserId};
use rust_decimal::Decimal;

#[test]
fn test_showtime_is_zero_padded() {
    let showtime: Showtime = Showtime::new("9:30").unwrap();
    assert_eq!(showtime.as_str(), "09:30");
    assert_eq!(Showtime::new(" 21:05 ").unwrap().as_str(), "21:05");
}

#[test]
fn test_showtime_rejects_out_of_range_and_malformed_labels() {
    for label in ["24:00", "12:60", "1230", "12:5", "ab:cd", "", "123:00"] {
        assert!(
            matches!(Showtime::new(label), Err(DomainError::InvalidShowtime(_))),
            "{label} should be rejected"
        );
    }
}

#[test]
fn test_identifiers_reject_empty_and_separator_characters() {
    assert!(ScreenId::new("   ").is_err());
    assert!(UserId::new("a,b").is_err());
    assert!(BookingId::new("x;y").is_err());
    assert_eq!(ScreenId::new(" SC1 ").unwrap().as_str(), "SC1");
}

#[test]
fn test_generated_booking_ids_are_unique() {
    let first: BookingId = BookingId::generate();
    let second: BookingId = BookingId::generate();
    assert_ne!(first, second);
}

#[test]
fn test_money_price_must_be_positive() {
    assert!(Money::price(Decimal::ZERO).is_err());
    assert!(Money::price(Decimal::from(-5)).is_err());
    assert_eq!(
        Money::price(Decimal::from(200)).unwrap(),
        Money::from_units(200)
    );
}

#[test]
fn test_money_times_and_split() {
    let price: Money = Money::from_units(200);
    assert_eq!(price.times(2).unwrap(), Money::from_units(400));
    assert_eq!(Money::from_units(400).split(2), price);
    assert_eq!(price.to_string(), "200.00");
}

#[test]
fn test_money_arithmetic_reports_overflow() {
    let huge: Money = Money::price(Decimal::MAX).unwrap();
    assert!(matches!(
        huge.times(2),
        Err(DomainError::InvalidAmount { .. })
    ));
    assert!(matches!(
        huge.checked_add(Money::from_units(1)),
        Err(DomainError::InvalidAmount { .. })
    ));
    assert_eq!(huge.times(1).unwrap(), huge);
    assert_eq!(
        Money::from_units(150).checked_add(Money::from_units(-50)).unwrap(),
        Money::from_units(100)
    );
}

#[test]
fn test_money_sign_checks() {
    assert!(Money::from_units(-1).is_negative());
    assert!(!Money::ZERO.is_negative());
    assert!(!Money::ZERO.is_positive());
    assert!(Money::from_units(1).is_positive());
    assert_eq!(-Money::from_units(3), Money::from_units(-3));
}

#[test]
fn test_money_parses_decimal_text() {
    let parsed: Money = "12.50".parse().unwrap();
    assert_eq!(parsed.amount(), Decimal::new(1250, 2));
    assert!("twelve".parse::<Money>().is_err());
}

#[test]
fn test_seat_code_normalises_row_letter() {
    let code: SeatCode = SeatCode::parse("a3").unwrap();
    assert_eq!(code.row(), 'A');
    assert_eq!(code.column(), 3);
    assert_eq!(code.to_string(), "A3");
}

#[test]
fn test_seat_code_rejects_non_canonical_columns() {
    for text in ["A01", "A-1", "A 1", "A", "3A", "", "A1.0"] {
        assert!(
            matches!(
                SeatCode::parse(text),
                Err(DomainError::InvalidSeatCode { .. })
            ),
            "{text} should be rejected"
        );
    }
}

#[test]
fn test_seat_code_serializes_as_text() {
    let code: SeatCode = SeatCode::parse("B10").unwrap();
    let json: String = serde_json::to_string(&code).unwrap();
    assert_eq!(json, "\"B10\"");
    let back: SeatCode = serde_json::from_str(&json).unwrap();
    assert_eq!(back, code);
}
