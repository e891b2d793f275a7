//! Repository trait definitions: the abstract interface every storage
//! backend implements.
//!
//! Traits are split per concern so callers can accept only the capability
//! they need. `FullRepository` bundles all of them for application wiring.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` to work with async Rust.

mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::api::{
    AppointmentId, AppointmentStatus, BarberId, QueueEntryId, QueueStatus, ServiceId,
    TimeOffId, WorkingHoursId,
};
use crate::db::models::{
    Appointment, AppointmentFilter, Barber, NewAppointment, NewQueueEntry, NewTimeOff,
    NewWorkingHours, QueueEntry, ServiceType, TimeOff, WorkingHours,
};

/// Repository trait for the barber and service catalogs.
///
/// The core computations only read these; upserts exist for bootstrap
/// seeding and tests.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Insert or replace a barber record, returning its id.
    async fn upsert_barber(&self, barber: Barber) -> RepositoryResult<BarberId>;

    /// Fetch one barber; `Ok(None)` when the id is unknown.
    async fn get_barber(&self, id: BarberId) -> RepositoryResult<Option<Barber>>;

    /// List all barbers, active or not.
    async fn list_barbers(&self) -> RepositoryResult<Vec<Barber>>;

    /// Flip a barber's clocked-in flag.
    async fn set_barber_clocked_in(&self, id: BarberId, clocked_in: bool)
        -> RepositoryResult<()>;

    /// Insert or replace a service type, returning its id.
    async fn upsert_service(&self, service: ServiceType) -> RepositoryResult<ServiceId>;

    /// Fetch one service type; `Ok(None)` when the id is unknown.
    async fn get_service(&self, id: ServiceId) -> RepositoryResult<Option<ServiceType>>;

    /// List all service types.
    async fn list_services(&self) -> RepositoryResult<Vec<ServiceType>>;
}

/// Repository trait for weekly working hours and time-off exceptions.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Insert a working-hours row.
    ///
    /// Fails with a validation error when the barber already has a row for
    /// that weekday (the non-overlap invariant).
    async fn insert_working_hours(
        &self,
        hours: NewWorkingHours,
    ) -> RepositoryResult<WorkingHoursId>;

    /// Delete a working-hours row.
    async fn delete_working_hours(&self, id: WorkingHoursId) -> RepositoryResult<()>;

    /// All working-hours rows for a barber, ordered by weekday.
    async fn working_hours_for_barber(
        &self,
        barber_id: BarberId,
    ) -> RepositoryResult<Vec<WorkingHours>>;

    /// All working-hours rows for a weekday (0 = Monday), across barbers.
    async fn working_hours_for_day(&self, day_of_week: u8)
        -> RepositoryResult<Vec<WorkingHours>>;

    /// Insert a time-off exception.
    async fn insert_time_off(&self, time_off: NewTimeOff) -> RepositoryResult<TimeOffId>;

    /// Delete a time-off exception.
    async fn delete_time_off(&self, id: TimeOffId) -> RepositoryResult<()>;

    /// All time-off rows for a barber, newest first.
    async fn time_off_for_barber(&self, barber_id: BarberId) -> RepositoryResult<Vec<TimeOff>>;

    /// All time-off rows whose date range covers `date`.
    async fn time_off_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<TimeOff>>;
}

/// Repository trait for booked appointments.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Insert a new appointment with `scheduled` status, returning the record.
    async fn insert_appointment(&self, appointment: NewAppointment)
        -> RepositoryResult<Appointment>;

    /// Fetch one appointment; `Ok(None)` when the id is unknown.
    async fn get_appointment(&self, id: AppointmentId)
        -> RepositoryResult<Option<Appointment>>;

    /// List appointments matching the filter, ordered by scheduled time.
    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> RepositoryResult<Vec<Appointment>>;

    /// Overwrite an appointment's status.
    ///
    /// Transition legality is the caller's concern; this is a plain write.
    async fn set_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> RepositoryResult<Appointment>;
}

/// Repository trait for the walk-in queue.
#[async_trait]
pub trait QueueRepository: Send + Sync {
    /// Insert a new entry with `waiting` status, returning the record.
    async fn insert_queue_entry(
        &self,
        entry: NewQueueEntry,
        checked_in_at: DateTime<Utc>,
    ) -> RepositoryResult<QueueEntry>;

    /// Fetch one entry; `Ok(None)` when the id is unknown.
    async fn get_queue_entry(&self, id: QueueEntryId)
        -> RepositoryResult<Option<QueueEntry>>;

    /// All entries in check-in order, every status included.
    async fn queue_entries(&self) -> RepositoryResult<Vec<QueueEntry>>;

    /// Overwrite an entry's status, stamping the matching timestamp
    /// (`called_at`, `started_at`, or `completed_at`) with `at`.
    ///
    /// Transition legality is the caller's concern; this is a plain write.
    async fn set_queue_status(
        &self,
        id: QueueEntryId,
        status: QueueStatus,
        served_by: Option<BarberId>,
        at: DateTime<Utc>,
    ) -> RepositoryResult<QueueEntry>;

    /// Entries completed on `date`, for rolling service-time averages.
    async fn completed_on(&self, date: NaiveDate) -> RepositoryResult<Vec<QueueEntry>>;
}

/// The full set of repository capabilities the application wires together.
pub trait FullRepository:
    CatalogRepository + ScheduleRepository + AppointmentRepository + QueueRepository
{
}

impl<T> FullRepository for T where
    T: CatalogRepository + ScheduleRepository + AppointmentRepository + QueueRepository
{
}

impl std::fmt::Debug for dyn FullRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("dyn FullRepository")
    }
}
