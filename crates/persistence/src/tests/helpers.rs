// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use marquee_domain::{
    BookingId, BookingRecord, BookingStatus, Catalog, Money, MovieId, Screen, ScreenId, SeatCode,
    Showtime, UserId,
};
use std::path::Path;
use time::OffsetDateTime;
use time::macros::datetime;

pub fn screen_id(value: &str) -> ScreenId {
    ScreenId::new(value).unwrap()
}

pub fn showtime(value: &str) -> Showtime {
    Showtime::new(value).unwrap()
}

pub fn user(value: &str) -> UserId {
    UserId::new(value).unwrap()
}

pub fn seat(code: &str) -> SeatCode {
    SeatCode::parse(code).unwrap()
}

pub fn write_file(path: &Path, contents: &str) {
    std::fs::write(path, contents).unwrap();
}

pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

/// Screen SC1 (3x4, 10:00 and 13:00) showing "Dune" at 200, and an idle SC2.
pub fn create_test_catalog() -> Catalog {
    let mut catalog: Catalog = Catalog::new();
    catalog
        .add_screen(
            Screen::new(
                screen_id("SC1"),
                3,
                4,
                vec![showtime("10:00"), showtime("13:00")],
            )
            .unwrap(),
        )
        .unwrap();
    catalog
        .add_screen(Screen::new(screen_id("SC2"), 2, 2, vec![showtime("18:30")]).unwrap())
        .unwrap();
    catalog
        .add_movie("Dune", Money::from_units(200), screen_id("SC1"), true)
        .unwrap();
    catalog
}

pub fn create_test_record(id: &str, codes: &[&str], status: BookingStatus) -> BookingRecord {
    let cancelled_at: Option<OffsetDateTime> =
        (status == BookingStatus::Cancelled).then_some(datetime!(2026-03-02 09:30 UTC));
    BookingRecord {
        booking_id: BookingId::new(id).unwrap(),
        timestamp: datetime!(2026-03-01 18:00:05.25 UTC),
        user_id: user("alice"),
        user_name: String::from("Alice, Esq."),
        screen_id: screen_id("SC1"),
        showtime: showtime("10:00"),
        seats: codes.iter().map(|code| seat(code)).collect(),
        movie_id: MovieId::new(1),
        total_price: Money::from_units(200).times(codes.len()).unwrap(),
        status,
        cancelled_at,
    }
}
