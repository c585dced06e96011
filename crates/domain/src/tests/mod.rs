// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod booking;
mod seat_map;
mod types;

use crate::{BookingId, Money, SeatDetail, UserId};
use time::OffsetDateTime;
use time::macros::datetime;

pub const BOOKED_AT: OffsetDateTime = datetime!(2026-03-01 18:30 UTC);

pub fn create_test_detail(booking_id: &str, user_id: &str) -> SeatDetail {
    SeatDetail {
        booking_id: BookingId::new(booking_id).unwrap(),
        user_id: UserId::new(user_id).unwrap(),
        user_name: String::from("Test User"),
        price_paid: Money::from_units(200),
        booked_at: BOOKED_AT,
    }
}
