// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use crate::{
    AddMovieRequest, AddScreenRequest, BookTicketRequest, BookTicketResponse, BoxOffice,
    BoxOfficeConfig, CancelTicketRequest,
};
use tempfile::TempDir;

pub fn create_test_config(dir: &TempDir) -> BoxOfficeConfig {
    BoxOfficeConfig::new(dir.path())
}

/// Opens a box office with screen SC1 (3x3, 10:00 and 13:00) showing
/// "Dune" (movie 1) at 200.
pub fn create_test_box_office(dir: &TempDir) -> BoxOffice {
    let mut office: BoxOffice = BoxOffice::open(create_test_config(dir)).unwrap();
    office
        .add_screen(&AddScreenRequest {
            screen_id: String::from("SC1"),
            rows: 3,
            cols: 3,
            showtimes: vec![String::from("10:00"), String::from("13:00")],
        })
        .unwrap();
    office
        .add_movie(&AddMovieRequest {
            title: String::from("Dune"),
            price: String::from("200"),
            screen_id: String::from("SC1"),
            active: true,
        })
        .unwrap();
    office
}

pub fn create_book_request(user_id: &str, showtime: &str, seats: &[&str]) -> BookTicketRequest {
    BookTicketRequest {
        user_id: user_id.to_string(),
        user_name: Some(format!("{user_id} name")),
        movie_id: 1,
        showtime: showtime.to_string(),
        seats: seats.iter().map(|seat| (*seat).to_string()).collect(),
    }
}

pub fn create_cancel_request(user_id: &str, booking_id: &str) -> CancelTicketRequest {
    CancelTicketRequest {
        user_id: user_id.to_string(),
        booking_id: booking_id.to_string(),
    }
}

pub fn book(office: &mut BoxOffice, user_id: &str, seats: &[&str]) -> BookTicketResponse {
    office
        .book_ticket(&create_book_request(user_id, "10:00", seats))
        .unwrap()
}

pub fn available(office: &BoxOffice, showtime: &str) -> usize {
    office.seat_map_view("SC1", showtime).unwrap().available
}
