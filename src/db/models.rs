//! Persisted record models shared by repository implementations and the
//! service layer. Input (`New*`) structs leave id assignment to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::models::{TimeOff, WorkingHours};

use crate::api::{
    AppointmentId, AppointmentStatus, BarberId, QueueEntryId, QueueStatus, ServiceId,
};
use crate::models::TimeRange;

/// Barber catalog record. Read-only to the core computations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barber {
    pub id: BarberId,
    pub name: String,
    pub is_active: bool,
    /// Clocked in right now; feeds the queue wait estimate.
    pub is_clocked_in: bool,
}

/// Service catalog record; resolves the duration for availability requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceType {
    pub id: ServiceId,
    pub name: String,
    pub base_price: f64,
    pub duration_minutes: u32,
    pub is_active: bool,
}

/// A booked appointment. Treated as an opaque interval by the calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub customer_name: String,
    pub customer_phone: String,
    /// `None` until a barber is assigned at booking or check-in time.
    pub barber_id: Option<BarberId>,
    pub service_id: ServiceId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub status: AppointmentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    pub fn end_at(&self) -> DateTime<Utc> {
        self.scheduled_at + chrono::Duration::minutes(self.duration_minutes as i64)
    }

    /// Half-open overlap against an arbitrary interval.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.scheduled_at < end && start < self.end_at()
    }
}

/// Insert payload for a new appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAppointment {
    pub customer_name: String,
    pub customer_phone: String,
    pub barber_id: Option<BarberId>,
    pub service_id: ServiceId,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One waiting customer in the walk-in queue.
///
/// Position and wait estimate are derived by the estimator, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: QueueEntryId,
    pub customer_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requested_barber_id: Option<BarberId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: QueueStatus,
    pub checked_in_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub called_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Barber who took the customer, set when service starts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub served_by: Option<BarberId>,
}

impl QueueEntry {
    /// Actual service duration in minutes, when both timestamps exist.
    pub fn service_minutes(&self) -> Option<i64> {
        match (self.started_at, self.completed_at) {
            (Some(start), Some(end)) if end > start => {
                Some((end - start).num_minutes())
            }
            _ => None,
        }
    }
}

/// Insert payload for a walk-in check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQueueEntry {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub requested_barber_id: Option<BarberId>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Insert payload for a weekly working-hours row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewWorkingHours {
    pub barber_id: BarberId,
    /// 0 = Monday .. 6 = Sunday.
    pub day_of_week: u8,
    pub hours: TimeRange,
    pub is_active: bool,
}

/// Insert payload for a time-off exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTimeOff {
    pub barber_id: BarberId,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    #[serde(default)]
    pub window: Option<TimeRange>,
    #[serde(default)]
    pub reason: Option<String>,
    pub is_approved: bool,
}

/// Filter for appointment listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentFilter {
    #[serde(default)]
    pub date: Option<chrono::NaiveDate>,
    #[serde(default)]
    pub barber_id: Option<BarberId>,
    #[serde(default)]
    pub status: Option<AppointmentStatus>,
}
