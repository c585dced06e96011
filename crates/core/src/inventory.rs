// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! All seat maps for all (screen, showtime) pairs.
//!
//! `HallInventory` is a cache over the booking log. `reconcile` rebuilds it
//! from the log alone; `rehydrate` starts from a snapshot when one is usable
//! and applies only the records written after it.

use crate::error::StoreError;
use crate::store::SeatSnapshotStore;
use marquee_audit::ReconciliationWarning;
use marquee_domain::{
    Booking, BookingId, BookingRecord, Catalog, DomainError, ScreenId, SeatDetail, SeatMap,
    SeatState, Showtime, project_bookings,
};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info, warn};

/// Label reported for a screen with no active movie.
pub const NO_MOVIE_ASSIGNED: &str = "No movie assigned";

/// One persisted row of seat states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRow {
    /// The screen.
    pub screen_id: ScreenId,
    /// The showtime.
    pub showtime: Showtime,
    /// The row letter.
    pub row: char,
    /// Seat states in column order.
    pub states: Vec<SeatState>,
}

/// A compact dump of every seat map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeatSnapshot {
    /// How many booking records the snapshot reflects.
    pub log_position: usize,
    /// One entry per (screen, showtime, row).
    pub rows: Vec<SnapshotRow>,
}

/// What a reconcile or rehydrate pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Seats marked booked by this pass.
    pub seats_booked: usize,
    /// Seats freed by this pass.
    pub seats_freed: usize,
    /// Seats skipped because the same booking already held them.
    pub duplicates_skipped: usize,
    /// Non-fatal problems found along the way.
    pub warnings: Vec<ReconciliationWarning>,
    /// Whether the pass started from a snapshot.
    pub from_snapshot: bool,
}

/// Availability of one active (screen, showtime).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowAvailability {
    /// The screen.
    pub screen_id: ScreenId,
    /// Title of the active movie, or [`NO_MOVIE_ASSIGNED`].
    pub movie_title: String,
    /// The showtime.
    pub showtime: Showtime,
    /// Free seats.
    pub available: usize,
    /// Total seats.
    pub capacity: usize,
}

/// Owns every `SeatMap`, keyed by (screen, showtime).
#[derive(Debug, Clone, Default)]
pub struct HallInventory {
    dimensions: BTreeMap<ScreenId, (u16, u16)>,
    maps: BTreeMap<(ScreenId, Showtime), SeatMap>,
}

impl HallInventory {
    /// Creates an inventory with no screens.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dimensions: BTreeMap::new(),
            maps: BTreeMap::new(),
        }
    }

    /// Ensures a seat map exists for each of the screen's showtimes.
    ///
    /// Seat maps that already exist are left untouched, so reconfiguring never
    /// discards live bookings.
    ///
    /// # Arguments
    ///
    /// * `screen_id` - The screen
    /// * `rows` - Row count, 1 to 26
    /// * `cols` - Column count, at least 1
    /// * `showtimes` - Showtimes the screen runs
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDimensions` if the dimensions are out of range.
    pub fn configure_screen(
        &mut self,
        screen_id: &ScreenId,
        rows: u16,
        cols: u16,
        showtimes: &[Showtime],
    ) -> Result<(), DomainError> {
        let template: SeatMap = SeatMap::create(rows, cols)?;
        self.dimensions.insert(screen_id.clone(), (rows, cols));
        for showtime in showtimes {
            self.maps
                .entry((screen_id.clone(), showtime.clone()))
                .or_insert_with(|| template.clone());
        }
        Ok(())
    }

    /// Configures every screen in the catalog, whatever its status.
    ///
    /// Screens under maintenance keep their seat maps so their bookings can
    /// still be replayed and cancelled.
    ///
    /// # Errors
    ///
    /// Returns an error if a screen has invalid dimensions.
    pub fn configure_from_catalog(&mut self, catalog: &Catalog) -> Result<(), DomainError> {
        for screen in catalog.screens() {
            self.configure_screen(&screen.id, screen.rows, screen.cols, &screen.showtimes)?;
        }
        Ok(())
    }

    /// Returns the seat map for a (screen, showtime).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ScreenNotFound` if the screen is unknown, or
    /// `DomainError::ShowtimeNotFound` if the screen does not run the showtime.
    pub fn get_seat_map(
        &self,
        screen_id: &ScreenId,
        showtime: &Showtime,
    ) -> Result<&SeatMap, DomainError> {
        self.check_key(screen_id, showtime)?;
        self.maps
            .get(&(screen_id.clone(), showtime.clone()))
            .ok_or_else(|| showtime_not_found(screen_id, showtime))
    }

    pub(crate) fn get_seat_map_mut(
        &mut self,
        screen_id: &ScreenId,
        showtime: &Showtime,
    ) -> Result<&mut SeatMap, DomainError> {
        self.check_key(screen_id, showtime)?;
        self.maps
            .get_mut(&(screen_id.clone(), showtime.clone()))
            .ok_or_else(|| showtime_not_found(screen_id, showtime))
    }

    /// Returns every (screen, showtime) key in order.
    pub fn keys(&self) -> impl Iterator<Item = &(ScreenId, Showtime)> {
        self.maps.keys()
    }

    /// Applies every active booking in the log to the seat maps.
    ///
    /// Seats already held by the same booking are skipped, so running this
    /// twice over the same log leaves the same state as running it once.
    /// Records naming an unknown screen, showtime or seat are reported as
    /// warnings and skipped.
    pub fn reconcile(&mut self, records: &[BookingRecord]) -> ReconcileReport {
        let mut report: ReconcileReport = ReconcileReport::default();
        for booking in project_bookings(records)
            .iter()
            .filter(|booking| booking.is_active())
        {
            self.occupy(booking, &mut report);
        }
        log_report(&report);
        report
    }

    /// Restores seat state from a snapshot if it is usable, else from the log.
    ///
    /// A snapshot is used only when it covers every configured seat map with
    /// the configured shape and does not claim more records than the log
    /// holds. The records written after it are then applied: bookings
    /// cancelled since the snapshot are freed and bookings created since are
    /// booked. Otherwise every seat map is cleared and `reconcile` runs.
    pub fn rehydrate(
        &mut self,
        snapshot: Option<&SeatSnapshot>,
        records: &[BookingRecord],
    ) -> ReconcileReport {
        let mut rejected: Option<ReconciliationWarning> = None;

        if let Some(snapshot) = snapshot {
            if snapshot.log_position > records.len() {
                rejected = Some(ReconciliationWarning::SnapshotRejected {
                    reason: format!(
                        "snapshot reflects {} records but the log holds {}",
                        snapshot.log_position,
                        records.len()
                    ),
                });
            } else {
                match self.restore(snapshot) {
                    Ok(()) => {
                        let mut report: ReconcileReport =
                            self.apply_tail(records, snapshot.log_position);
                        report.from_snapshot = true;
                        log_report(&report);
                        return report;
                    }
                    Err(reason) => {
                        rejected = Some(ReconciliationWarning::SnapshotRejected { reason });
                    }
                }
            }
        }

        self.clear();
        let mut report: ReconcileReport = self.reconcile(records);
        if let Some(warning) = rejected {
            warn!(%warning, "Falling back to a full replay of the booking log");
            report.warnings.insert(0, warning);
        }
        report
    }

    /// Builds a snapshot of every seat map.
    #[must_use]
    pub fn snapshot(&self, log_position: usize) -> SeatSnapshot {
        let rows: Vec<SnapshotRow> = self
            .maps
            .iter()
            .flat_map(|((screen_id, showtime), map)| {
                map.snapshot().into_iter().map(|view| SnapshotRow {
                    screen_id: screen_id.clone(),
                    showtime: showtime.clone(),
                    row: view.row,
                    states: view.seats,
                })
            })
            .collect();
        SeatSnapshot { log_position, rows }
    }

    /// Writes a snapshot reflecting the first `log_position` booking records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot save the snapshot.
    pub fn persist_snapshot<S: SeatSnapshotStore>(
        &self,
        store: &mut S,
        log_position: usize,
    ) -> Result<(), StoreError> {
        store.save(&self.snapshot(log_position))
    }

    /// Reads the stored snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if a snapshot exists but cannot be read.
    pub fn load_snapshot<S: SeatSnapshotStore>(
        store: &S,
    ) -> Result<Option<SeatSnapshot>, StoreError> {
        store.load()
    }

    /// Reports free and total seats for every showtime of every active screen.
    #[must_use]
    pub fn available_seat_counts(&self, catalog: &Catalog) -> Vec<ShowAvailability> {
        let mut counts: Vec<ShowAvailability> = Vec::new();
        for screen in catalog.active_screens() {
            let movie_title: String = catalog
                .active_movie_on(&screen.id)
                .map_or_else(|| NO_MOVIE_ASSIGNED.to_string(), |movie| movie.title.clone());
            for showtime in &screen.showtimes {
                if let Ok(map) = self.get_seat_map(&screen.id, showtime) {
                    counts.push(ShowAvailability {
                        screen_id: screen.id.clone(),
                        movie_title: movie_title.clone(),
                        showtime: showtime.clone(),
                        available: map.available_count(),
                        capacity: map.capacity(),
                    });
                }
            }
        }
        counts
    }

    fn check_key(&self, screen_id: &ScreenId, showtime: &Showtime) -> Result<(), DomainError> {
        if !self.dimensions.contains_key(screen_id) {
            return Err(DomainError::ScreenNotFound(screen_id.to_string()));
        }
        if !self
            .maps
            .contains_key(&(screen_id.clone(), showtime.clone()))
        {
            return Err(showtime_not_found(screen_id, showtime));
        }
        Ok(())
    }

    fn clear(&mut self) {
        for map in self.maps.values_mut() {
            if let Ok(empty) = SeatMap::create(map.rows(), map.cols()) {
                *map = empty;
            }
        }
    }

    fn restore(&mut self, snapshot: &SeatSnapshot) -> Result<(), String> {
        let mut restored: BTreeMap<(ScreenId, Showtime), SeatMap> = BTreeMap::new();
        let mut covered: HashSet<(ScreenId, Showtime, char)> = HashSet::new();

        for row in &snapshot.rows {
            let key: (ScreenId, Showtime) = (row.screen_id.clone(), row.showtime.clone());
            let Some(live) = self.maps.get(&key) else {
                return Err(format!(
                    "screen '{}' showtime {} is not configured",
                    row.screen_id, row.showtime
                ));
            };
            if !covered.insert((row.screen_id.clone(), row.showtime.clone(), row.row)) {
                return Err(format!(
                    "row {} of screen '{}' showtime {} appears twice",
                    row.row, row.screen_id, row.showtime
                ));
            }
            let map: &mut SeatMap = match restored.entry(key) {
                std::collections::btree_map::Entry::Occupied(entry) => entry.into_mut(),
                std::collections::btree_map::Entry::Vacant(entry) => entry.insert(
                    SeatMap::create(live.rows(), live.cols()).map_err(|err| err.to_string())?,
                ),
            };
            map.restore_row(row.row, &row.states).map_err(|err| {
                format!("screen '{}' showtime {}: {err}", row.screen_id, row.showtime)
            })?;
        }

        for ((screen_id, showtime), live) in &self.maps {
            let rows_seen: usize = live
                .row_labels()
                .filter(|row| covered.contains(&(screen_id.clone(), showtime.clone(), *row)))
                .count();
            if rows_seen != usize::from(live.rows()) {
                return Err(format!(
                    "screen '{screen_id}' showtime {showtime} is missing from the snapshot"
                ));
            }
        }

        self.maps = restored;
        Ok(())
    }

    fn apply_tail(&mut self, records: &[BookingRecord], log_position: usize) -> ReconcileReport {
        let mut report: ReconcileReport = ReconcileReport::default();
        let (head, _) = records.split_at(log_position);
        let active_before: HashSet<BookingId> = project_bookings(head)
            .into_iter()
            .filter(Booking::is_active)
            .map(|booking| booking.id)
            .collect();
        let after: Vec<Booking> = project_bookings(records);

        for booking in after
            .iter()
            .filter(|booking| !booking.is_active() && active_before.contains(&booking.id))
        {
            self.release(booking, &mut report);
        }
        for booking in after
            .iter()
            .filter(|booking| booking.is_active() && !active_before.contains(&booking.id))
        {
            self.occupy(booking, &mut report);
        }
        report
    }

    /// Books the seats of one active booking, tolerating seats it already holds.
    fn occupy(&mut self, booking: &Booking, report: &mut ReconcileReport) {
        let Some(map) = self.map_for(booking, report) else {
            return;
        };
        for seat in &booking.seats {
            match map.state(*seat) {
                None => report.warnings.push(ReconciliationWarning::InvalidSeat {
                    booking_id: booking.id.clone(),
                    seat: *seat,
                }),
                Some(SeatState::Booked) => {
                    let holder: Option<BookingId> =
                        map.detail(*seat).map(|detail| detail.booking_id.clone());
                    if holder.as_ref() == Some(&booking.id) {
                        report.duplicates_skipped += 1;
                    } else {
                        report.warnings.push(ReconciliationWarning::SeatConflict {
                            booking_id: booking.id.clone(),
                            seat: *seat,
                            holder,
                        });
                    }
                }
                Some(SeatState::Empty) => {
                    if map.book(*seat, seat_detail(booking)).is_ok() {
                        report.seats_booked += 1;
                    }
                }
            }
        }
    }

    /// Frees the seats of one cancelled booking, leaving seats held by others.
    fn release(&mut self, booking: &Booking, report: &mut ReconcileReport) {
        let Some(map) = self.map_for(booking, report) else {
            return;
        };
        for seat in &booking.seats {
            let held_by_other: bool = map
                .detail(*seat)
                .is_some_and(|detail| detail.booking_id != booking.id);
            if held_by_other {
                debug!(booking_id = %booking.id, seat = %seat, "Seat now held by another booking");
                continue;
            }
            match map.free(*seat) {
                Ok(_) => report.seats_freed += 1,
                Err(_) => report.warnings.push(ReconciliationWarning::SeatAlreadyFree {
                    booking_id: booking.id.clone(),
                    seat: *seat,
                }),
            }
        }
    }

    fn map_for(&mut self, booking: &Booking, report: &mut ReconcileReport) -> Option<&mut SeatMap> {
        if !self.dimensions.contains_key(&booking.screen_id) {
            report.warnings.push(ReconciliationWarning::UnknownScreen {
                booking_id: booking.id.clone(),
                screen_id: booking.screen_id.clone(),
            });
            return None;
        }
        let map: Option<&mut SeatMap> = self
            .maps
            .get_mut(&(booking.screen_id.clone(), booking.showtime.clone()));
        if map.is_none() {
            report.warnings.push(ReconciliationWarning::UnknownShowtime {
                booking_id: booking.id.clone(),
                screen_id: booking.screen_id.clone(),
                showtime: booking.showtime.clone(),
            });
        }
        map
    }
}

/// Builds the per-seat detail recorded for a booking.
#[must_use]
pub fn seat_detail(booking: &Booking) -> SeatDetail {
    SeatDetail {
        booking_id: booking.id.clone(),
        user_id: booking.user_id.clone(),
        user_name: booking.user_name.clone(),
        price_paid: booking.price_per_seat(),
        booked_at: booking.created_at,
    }
}

fn showtime_not_found(screen_id: &ScreenId, showtime: &Showtime) -> DomainError {
    DomainError::ShowtimeNotFound {
        screen_id: screen_id.to_string(),
        showtime: showtime.to_string(),
    }
}

fn log_report(report: &ReconcileReport) {
    for warning in &report.warnings {
        warn!(%warning, "Reconciliation warning");
    }
    info!(
        seats_booked = report.seats_booked,
        seats_freed = report.seats_freed,
        duplicates_skipped = report.duplicates_skipped,
        warnings = report.warnings.len(),
        from_snapshot = report.from_snapshot,
        "Seat inventory reconciled"
    );
}
