//! Availability calculator: bookable appointment slots for one day.
//!
//! Candidate slots are enumerated on a fixed step grid inside each barber's
//! open ranges, then checked against existing bookings and the current time.
//! The whole computation is a pure function over an in-memory snapshot.

use chrono::{DateTime, NaiveDate, Utc};

use crate::api::{BarberId, BarberPreference, CandidateSlot};
use crate::models::TimeRange;

/// Tuning constants for slot enumeration.
#[derive(Debug, Clone, Copy)]
pub struct AvailabilityConfig {
    /// Candidate start-time granularity in minutes.
    pub step_minutes: u32,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self { step_minutes: 30 }
    }
}

/// One barber's open ranges for the requested day, after exceptions.
#[derive(Debug, Clone)]
pub struct BarberDay {
    pub barber_id: BarberId,
    /// Disjoint, sorted by start. Empty when the barber is off all day.
    pub open: Vec<TimeRange>,
}

/// A booked interval that blocks candidate slots.
#[derive(Debug, Clone, Copy)]
pub struct BookedSlot {
    /// `None` blocks every barber: the booking has no assignment yet, so
    /// any barber might end up taking it.
    pub barber_id: Option<BarberId>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookedSlot {
    fn blocks(&self, barber_id: BarberId, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        let applies = match self.barber_id {
            None => true,
            Some(id) => id == barber_id,
        };
        // Half-open overlap: [start, end) intersects [self.start, self.end).
        applies && self.start < end && start < self.end
    }
}

/// Compute candidate slots for `date` and a service of `duration_minutes`.
///
/// For a specific-barber request every candidate is reported with its
/// availability flag. For an any-barber request candidates are merged by
/// start time: a start is available when at least one barber is free, and
/// `barber_id` is left unset so booking can still choose.
///
/// Candidates starting at or before `now` are dropped entirely. Output is
/// sorted by start time.
pub fn compute_slots(
    date: NaiveDate,
    duration_minutes: u32,
    preference: BarberPreference,
    barbers: &[BarberDay],
    booked: &[BookedSlot],
    now: DateTime<Utc>,
    config: &AvailabilityConfig,
) -> Vec<CandidateSlot> {
    let step = config.step_minutes.max(1);
    if duration_minutes == 0 {
        return Vec::new();
    }

    match preference {
        BarberPreference::Specific(barber_id) => {
            let Some(day) = barbers.iter().find(|b| b.barber_id == barber_id) else {
                return Vec::new();
            };
            barber_slots(day, date, duration_minutes, step, booked, now)
                .into_iter()
                .map(|(start, end, available)| CandidateSlot {
                    start,
                    end,
                    barber_id: Some(barber_id),
                    available,
                })
                .collect()
        }
        BarberPreference::Any => {
            // Merge per-barber candidates by start: available iff any barber
            // is free at that start.
            let mut merged: Vec<(DateTime<Utc>, DateTime<Utc>, bool)> = Vec::new();
            for day in barbers {
                for (start, end, available) in
                    barber_slots(day, date, duration_minutes, step, booked, now)
                {
                    match merged.iter_mut().find(|(s, _, _)| *s == start) {
                        Some(existing) => existing.2 = existing.2 || available,
                        None => merged.push((start, end, available)),
                    }
                }
            }
            merged.sort_by_key(|(start, _, _)| *start);
            merged
                .into_iter()
                .map(|(start, end, available)| CandidateSlot {
                    start,
                    end,
                    barber_id: None,
                    available,
                })
                .collect()
        }
    }
}

/// Enumerate one barber's step-aligned candidates with availability flags.
fn barber_slots(
    day: &BarberDay,
    date: NaiveDate,
    duration_minutes: u32,
    step: u32,
    booked: &[BookedSlot],
    now: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>, bool)> {
    let mut slots = Vec::new();

    for range in &day.open {
        let mut start_minute = range.start.value();
        // A candidate fits while its full duration stays inside the range.
        while start_minute + duration_minutes <= range.end.value() {
            let start = crate::models::TimeOfDay::new(start_minute).on_date(date);
            let end = start + chrono::Duration::minutes(duration_minutes as i64);

            if start > now {
                let free = !booked.iter().any(|b| b.blocks(day.barber_id, start, end));
                slots.push((start, end, free));
            }
            start_minute += step;
        }
    }

    slots
}
