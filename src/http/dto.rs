//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies and query strings live here; response payloads mostly
//! reuse the serializable view types from `crate::api` and the persisted
//! models from `crate::db::models`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Re-export existing DTOs that are already serializable
pub use crate::api::{CandidateSlot, QueueEntryView, QueueView};
pub use crate::db::models::{Appointment, Barber, QueueEntry, ServiceType, TimeOff, WorkingHours};

use crate::api::{BarberId, ServiceId};
use crate::db::models::{NewAppointment, NewQueueEntry};

/// Query parameters for the availability endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityQuery {
    /// Date to compute slots for, "YYYY-MM-DD"
    pub date: String,
    /// Service the customer wants
    pub service_id: i64,
    /// Preferred barber; absent means any barber
    #[serde(default)]
    pub barber_id: Option<i64>,
}

/// Availability response: the computed candidate slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub date: String,
    pub service_id: i64,
    pub slots: Vec<CandidateSlot>,
    /// Count of slots still bookable
    pub available: usize,
}

/// Query parameters for listing appointments.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppointmentsQuery {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub barber_id: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for booking an appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub customer_name: String,
    pub customer_phone: String,
    /// Preferred barber; absent leaves the booking unassigned
    #[serde(default)]
    pub barber_id: Option<i64>,
    pub service_id: i64,
    /// Slot start instant (RFC 3339)
    pub scheduled_at: DateTime<Utc>,
    /// Override of the service's duration; absent uses the catalog value
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<BookAppointmentRequest> for NewAppointment {
    fn from(req: BookAppointmentRequest) -> Self {
        Self {
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            barber_id: req.barber_id.map(BarberId::new),
            service_id: ServiceId::new(req.service_id),
            scheduled_at: req.scheduled_at,
            duration_minutes: req.duration_minutes.unwrap_or(0),
            notes: req.notes,
        }
    }
}

/// Request body for an appointment status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    /// New status, snake_case ("confirmed", "checked_in", ...)
    pub status: String,
}

/// Request body for a walk-in check-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckInRequest {
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: Option<String>,
    /// Preferred barber; absent means first available
    #[serde(default)]
    pub barber_id: Option<i64>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<CheckInRequest> for NewQueueEntry {
    fn from(req: CheckInRequest) -> Self {
        Self {
            customer_name: req.customer_name,
            customer_phone: req.customer_phone,
            requested_barber_id: req.barber_id.map(BarberId::new),
            notes: req.notes,
        }
    }
}

/// Request body for starting a service from the queue.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StartServiceRequest {
    /// Barber taking the customer
    #[serde(default)]
    pub barber_id: Option<i64>,
}

/// Aggregate queue counters for the stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueStatsResponse {
    pub waiting: usize,
    pub called: usize,
    pub in_service: usize,
    pub completed_today: usize,
    pub estimated_wait_new: u32,
}

/// Request body for adding a weekly working-hours row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateWorkingHoursRequest {
    pub barber_id: i64,
    /// 0 = Monday .. 6 = Sunday
    pub day_of_week: u8,
    /// "HH:MM"
    pub start: String,
    /// "HH:MM"
    pub end: String,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Request body for a time-off exception.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOffRequest {
    pub barber_id: i64,
    /// "YYYY-MM-DD"
    pub start_date: String,
    /// "YYYY-MM-DD", inclusive
    pub end_date: String,
    /// Partial-day window start; absent with `end_time` absent means all day
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default = "default_true")]
    pub is_approved: bool,
}

fn default_true() -> bool {
    true
}

/// Response body for created rows: the assigned id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: i64,
}

/// One open range in a barber's day, "HH:MM" ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRangeDto {
    pub start: String,
    pub end: String,
}

/// A barber's open ranges for one date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarberAvailabilityResponse {
    pub barber_id: i64,
    pub date: String,
    pub open: Vec<OpenRangeDto>,
}

/// Barbers with open time today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingTodayResponse {
    pub date: String,
    pub barbers: Vec<Barber>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Storage backend status
    pub database: String,
}
