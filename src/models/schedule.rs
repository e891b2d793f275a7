//! Barber schedule domain model: weekly working hours, time-off exceptions,
//! and the open-range computation that feeds the availability calculator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::{BarberId, TimeOffId, WorkingHoursId};
use crate::models::time::TimeRange;

/// One open-for-business time range for one barber on one weekday.
///
/// Invariant (enforced at insert time): start < end, at most one row per
/// barber per weekday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHours {
    pub id: WorkingHoursId,
    pub barber_id: BarberId,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    pub hours: TimeRange,
    pub is_active: bool,
}

/// A subtraction from working hours: a day off or a break.
///
/// `window == None` removes the whole day for each date in the range;
/// a window subtracts only that time-of-day sub-range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOff {
    pub id: TimeOffId,
    pub barber_id: BarberId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Partial-day window; absent means the entire day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub is_approved: bool,
}

impl TimeOff {
    /// Whether this exception applies on `date`.
    pub fn covers_date(&self, date: NaiveDate) -> bool {
        self.is_approved && self.start_date <= date && date <= self.end_date
    }
}

/// Compute a barber's disjoint open ranges for one day: the day's working
/// hours minus every applicable exception.
///
/// A full-day exception removes everything; a partial exception subtracts
/// its window. Exceptions that do not intersect any working interval are
/// no-ops. Output is sorted by start time.
pub fn open_ranges(
    intervals: &[WorkingHours],
    exceptions: &[TimeOff],
    date: NaiveDate,
) -> Vec<TimeRange> {
    let mut open: Vec<TimeRange> = Vec::new();

    for interval in intervals.iter().filter(|w| w.is_active) {
        let mut pieces = vec![interval.hours];
        for exc in exceptions
            .iter()
            .filter(|e| e.barber_id == interval.barber_id && e.covers_date(date))
        {
            match exc.window {
                None => {
                    pieces.clear();
                    break;
                }
                Some(window) => {
                    pieces = pieces
                        .iter()
                        .flat_map(|p| p.subtract(&window))
                        .collect();
                }
            }
        }
        open.extend(pieces);
    }

    open.sort_by_key(|r| r.start);
    open
}
