//! Service layer: business logic over the repository traits.
//!
//! These functions are the recommended entry points for application code.
//! They validate input, enforce status transition rules, assemble snapshots
//! for the availability calculator and the queue estimator, and translate
//! storage faults into a caller-facing error taxonomy.

use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::api::{
    AppointmentId, AppointmentStatus, BarberId, BarberPreference, CandidateSlot, QueueEntryId,
    QueueEntryView, QueueStatus, QueueView, ServiceId, TimeOffId, WorkingHoursId,
};
use crate::models::{open_ranges, parse_date, weekday_index, TimeRange};
use crate::services::{
    compute_slots, estimate_queue, AvailabilityConfig, BarberDay, BookedSlot, EstimatorConfig,
    ServiceAverages,
};

use super::models::{
    Appointment, AppointmentFilter, Barber, NewAppointment, NewQueueEntry, NewTimeOff,
    NewWorkingHours, QueueEntry, ServiceType, TimeOff, WorkingHours,
};
use super::repo_config::ShopSettings;
use super::repository::{FullRepository, RepositoryError};

/// Errors surfaced by the service layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or semantically invalid caller input.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A referenced entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The write lost a race or violates a uniqueness rule.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested status change is not in the transition table.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// A storage fault bubbled up unchanged.
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Check that the storage backend answers at all.
pub async fn health_check(repo: &dyn FullRepository) -> ServiceResult<()> {
    repo.list_barbers().await?;
    Ok(())
}

// ==================== Availability ====================

/// Compute candidate slots for a date, service, and barber preference.
///
/// The snapshot is assembled here: active barbers' open ranges for the day
/// (weekly hours minus approved time off) and every booking that still
/// occupies its slot. The calculator itself is pure.
pub async fn available_slots(
    repo: &dyn FullRepository,
    date_str: &str,
    service_id: ServiceId,
    preference: BarberPreference,
    now: DateTime<Utc>,
    shop: &ShopSettings,
) -> ServiceResult<Vec<CandidateSlot>> {
    let date = parse_date(date_str).map_err(ServiceError::InvalidInput)?;

    let service = repo
        .get_service(service_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Service {}", service_id)))?;
    if !service.is_active {
        return Err(ServiceError::InvalidInput(format!(
            "Service {} is not offered anymore",
            service_id
        )));
    }
    if service.duration_minutes == 0 {
        return Err(ServiceError::InvalidInput(format!(
            "Service {} has no positive duration",
            service_id
        )));
    }

    // A preference for a barber nobody knows yields no slots rather than an
    // error; the client treats it like a fully booked day.
    if let Some(barber_id) = preference.specific() {
        match repo.get_barber(barber_id).await? {
            Some(b) if b.is_active => {}
            _ => {
                debug!(barber_id = barber_id.value(), "unknown or inactive barber requested");
                return Ok(Vec::new());
            }
        }
    }

    let barbers = barber_days(repo, date, preference).await?;
    let booked = blocking_appointments(repo, date).await?;

    let config = AvailabilityConfig {
        step_minutes: shop.slot_step_minutes,
    };
    let slots = compute_slots(
        date,
        service.duration_minutes,
        preference,
        &barbers,
        &booked,
        now,
        &config,
    );
    debug!(
        date = %date,
        service_id = service_id.value(),
        candidates = slots.len(),
        "computed availability"
    );
    Ok(slots)
}

/// Snapshot each relevant barber's open ranges for `date`.
async fn barber_days(
    repo: &dyn FullRepository,
    date: NaiveDate,
    preference: BarberPreference,
) -> ServiceResult<Vec<BarberDay>> {
    let weekday = weekday_index(date);
    let hours = repo.working_hours_for_day(weekday).await?;
    let exceptions = repo.time_off_for_date(date).await?;

    let mut days = Vec::new();
    for barber in repo.list_barbers().await? {
        if !barber.is_active || !preference.matches(barber.id) {
            continue;
        }
        let own_hours: Vec<WorkingHours> = hours
            .iter()
            .filter(|h| h.barber_id == barber.id)
            .cloned()
            .collect();
        days.push(BarberDay {
            barber_id: barber.id,
            open: open_ranges(&own_hours, &exceptions, date),
        });
    }
    Ok(days)
}

/// Every appointment on `date` that still occupies its slot.
async fn blocking_appointments(
    repo: &dyn FullRepository,
    date: NaiveDate,
) -> ServiceResult<Vec<BookedSlot>> {
    let filter = AppointmentFilter {
        date: Some(date),
        ..Default::default()
    };
    let booked = repo
        .list_appointments(filter)
        .await?
        .into_iter()
        .filter(|a| a.status.blocks_slot())
        .map(|a| BookedSlot {
            barber_id: a.barber_id,
            start: a.scheduled_at,
            end: a.end_at(),
        })
        .collect();
    Ok(booked)
}

// ==================== Appointments ====================

/// Book an appointment, re-checking the slot at write time.
///
/// The availability a client saw may be one booking stale; the overlap check
/// here is authoritative and rejects with `Conflict`.
pub async fn book_appointment(
    repo: &dyn FullRepository,
    mut appointment: NewAppointment,
    now: DateTime<Utc>,
) -> ServiceResult<Appointment> {
    if appointment.customer_name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Customer name is required".into()));
    }
    if appointment.scheduled_at <= now {
        return Err(ServiceError::InvalidInput(
            "Appointments must start in the future".into(),
        ));
    }

    let service = repo
        .get_service(appointment.service_id)
        .await?
        .ok_or_else(|| {
            ServiceError::NotFound(format!("Service {}", appointment.service_id))
        })?;
    if !service.is_active {
        return Err(ServiceError::InvalidInput(format!(
            "Service {} is not offered anymore",
            appointment.service_id
        )));
    }
    if appointment.duration_minutes == 0 {
        appointment.duration_minutes = service.duration_minutes;
    }
    if appointment.duration_minutes == 0 {
        return Err(ServiceError::InvalidInput(
            "Appointment duration must be positive".into(),
        ));
    }

    if let Some(barber_id) = appointment.barber_id {
        match repo.get_barber(barber_id).await? {
            Some(b) if b.is_active => {}
            _ => {
                return Err(ServiceError::NotFound(format!("Barber {}", barber_id)));
            }
        }
    }

    let start = appointment.scheduled_at;
    let end = start + chrono::Duration::minutes(appointment.duration_minutes as i64);
    if slot_taken(repo, appointment.barber_id, start, end).await? {
        warn!(
            scheduled_at = %start,
            barber_id = ?appointment.barber_id.map(|b| b.value()),
            "booking rejected: slot already taken"
        );
        return Err(ServiceError::Conflict(
            "The requested time slot is no longer available".into(),
        ));
    }

    let created = repo.insert_appointment(appointment).await?;
    info!(appointment_id = created.id.value(), scheduled_at = %created.scheduled_at, "appointment booked");
    Ok(created)
}

/// Whether `[start, end)` collides with a blocking appointment.
///
/// A specific barber collides with their own bookings and with unassigned
/// ones. An unassigned request collides only when every active barber is
/// occupied for the window.
async fn slot_taken(
    repo: &dyn FullRepository,
    barber_id: Option<BarberId>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ServiceResult<bool> {
    let filter = AppointmentFilter {
        date: Some(start.date_naive()),
        ..Default::default()
    };
    let blocking: Vec<Appointment> = repo
        .list_appointments(filter)
        .await?
        .into_iter()
        .filter(|a| a.status.blocks_slot() && a.overlaps(start, end))
        .collect();

    match barber_id {
        Some(id) => Ok(blocking
            .iter()
            .any(|a| a.barber_id.is_none() || a.barber_id == Some(id))),
        None => {
            let active: Vec<BarberId> = repo
                .list_barbers()
                .await?
                .into_iter()
                .filter(|b| b.is_active)
                .map(|b| b.id)
                .collect();
            if active.is_empty() {
                return Ok(!blocking.is_empty());
            }
            Ok(active.iter().all(|id| {
                blocking
                    .iter()
                    .any(|a| a.barber_id.is_none() || a.barber_id == Some(*id))
            }))
        }
    }
}

/// Fetch one appointment.
pub async fn get_appointment(
    repo: &dyn FullRepository,
    id: AppointmentId,
) -> ServiceResult<Appointment> {
    repo.get_appointment(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Appointment {}", id)))
}

/// List appointments matching the filter, ordered by scheduled time.
pub async fn list_appointments(
    repo: &dyn FullRepository,
    filter: AppointmentFilter,
) -> ServiceResult<Vec<Appointment>> {
    Ok(repo.list_appointments(filter).await?)
}

/// Move an appointment to a new status, enforcing the transition table.
pub async fn update_appointment_status(
    repo: &dyn FullRepository,
    id: AppointmentId,
    next: AppointmentStatus,
) -> ServiceResult<Appointment> {
    let current = get_appointment(repo, id).await?;
    if !current.status.can_transition_to(next) {
        return Err(ServiceError::InvalidTransition(format!(
            "Appointment {} cannot go from {} to {}",
            id, current.status, next
        )));
    }
    let updated = repo.set_appointment_status(id, next).await?;
    info!(appointment_id = id.value(), status = %next, "appointment status updated");
    Ok(updated)
}

/// Cancel an appointment, freeing its slot.
pub async fn cancel_appointment(
    repo: &dyn FullRepository,
    id: AppointmentId,
) -> ServiceResult<Appointment> {
    update_appointment_status(repo, id, AppointmentStatus::Cancelled).await
}

// ==================== Walk-in queue ====================

/// Compute the current queue view: positions, waits, counters.
pub async fn queue_view(
    repo: &dyn FullRepository,
    now: DateTime<Utc>,
    shop: &ShopSettings,
) -> ServiceResult<QueueView> {
    let entries = repo.queue_entries().await?;
    let completed = repo.completed_on(now.date_naive()).await?;
    let averages = ServiceAverages::from_completed(&completed);
    let clocked_in = repo
        .list_barbers()
        .await?
        .iter()
        .filter(|b| b.is_active && b.is_clocked_in)
        .count();

    let config = EstimatorConfig {
        default_service_minutes: shop.default_service_minutes,
    };
    Ok(estimate_queue(&entries, &averages, clocked_in, now, &config))
}

/// Entries completed so far today, newest timestamps included.
pub async fn completed_today(
    repo: &dyn FullRepository,
    now: DateTime<Utc>,
) -> ServiceResult<Vec<QueueEntry>> {
    Ok(repo.completed_on(now.date_naive()).await?)
}

/// Check a walk-in into the queue and report their position and wait.
pub async fn check_in_walk_in(
    repo: &dyn FullRepository,
    entry: NewQueueEntry,
    now: DateTime<Utc>,
    shop: &ShopSettings,
) -> ServiceResult<QueueEntryView> {
    if entry.customer_name.trim().is_empty() {
        return Err(ServiceError::InvalidInput("Customer name is required".into()));
    }
    if let Some(barber_id) = entry.requested_barber_id {
        match repo.get_barber(barber_id).await? {
            Some(b) if b.is_active => {}
            _ => {
                return Err(ServiceError::NotFound(format!("Barber {}", barber_id)));
            }
        }
    }

    let created = repo.insert_queue_entry(entry, now).await?;
    info!(queue_entry_id = created.id.value(), "walk-in checked in");

    let view = queue_view(repo, now, shop).await?;
    view.entries
        .into_iter()
        .find(|e| e.id == created.id)
        .ok_or_else(|| {
            RepositoryError::internal("Fresh queue entry missing from its own view").into()
        })
}

/// Call the next customer to the chair.
pub async fn call_customer(
    repo: &dyn FullRepository,
    id: QueueEntryId,
    now: DateTime<Utc>,
) -> ServiceResult<QueueEntry> {
    transition_queue_entry(repo, id, QueueStatus::Called, None, now).await
}

/// Start serving a called customer, recording who took them.
pub async fn start_service(
    repo: &dyn FullRepository,
    id: QueueEntryId,
    barber_id: Option<BarberId>,
    now: DateTime<Utc>,
) -> ServiceResult<QueueEntry> {
    if let Some(barber_id) = barber_id {
        if repo.get_barber(barber_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!("Barber {}", barber_id)));
        }
    }
    transition_queue_entry(repo, id, QueueStatus::InService, barber_id, now).await
}

/// Finish a service; the entry leaves the queue and feeds the averages.
pub async fn complete_service(
    repo: &dyn FullRepository,
    id: QueueEntryId,
    now: DateTime<Utc>,
) -> ServiceResult<QueueEntry> {
    transition_queue_entry(repo, id, QueueStatus::Done, None, now).await
}

/// Remove a waiting or called customer; everyone behind moves up.
pub async fn remove_from_queue(
    repo: &dyn FullRepository,
    id: QueueEntryId,
    now: DateTime<Utc>,
) -> ServiceResult<QueueEntry> {
    transition_queue_entry(repo, id, QueueStatus::Removed, None, now).await
}

async fn transition_queue_entry(
    repo: &dyn FullRepository,
    id: QueueEntryId,
    next: QueueStatus,
    served_by: Option<BarberId>,
    now: DateTime<Utc>,
) -> ServiceResult<QueueEntry> {
    let current = repo
        .get_queue_entry(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Queue entry {}", id)))?;
    if !current.status.can_transition_to(next) {
        return Err(ServiceError::InvalidTransition(format!(
            "Queue entry {} cannot go from {} to {}",
            id, current.status, next
        )));
    }
    let updated = repo.set_queue_status(id, next, served_by, now).await?;
    info!(queue_entry_id = id.value(), status = %next, "queue entry status updated");
    Ok(updated)
}

// ==================== Schedule management ====================

/// Add a weekly working-hours row for a barber.
///
/// One row per barber per weekday; a duplicate weekday is a `Conflict`.
pub async fn create_working_hours(
    repo: &dyn FullRepository,
    hours: NewWorkingHours,
) -> ServiceResult<WorkingHoursId> {
    if hours.day_of_week > 6 {
        return Err(ServiceError::InvalidInput(format!(
            "Day of week must be 0-6 (Monday-Sunday), got {}",
            hours.day_of_week
        )));
    }
    if repo.get_barber(hours.barber_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("Barber {}", hours.barber_id)));
    }
    match repo.insert_working_hours(hours).await {
        Ok(id) => Ok(id),
        Err(RepositoryError::ValidationError { message, .. }) => {
            Err(ServiceError::Conflict(message))
        }
        Err(e) => Err(e.into()),
    }
}

/// Seed a standard Monday-Saturday week for a barber.
pub async fn create_default_week(
    repo: &dyn FullRepository,
    barber_id: BarberId,
    hours: TimeRange,
) -> ServiceResult<Vec<WorkingHoursId>> {
    let mut ids = Vec::with_capacity(6);
    for day_of_week in 0..6 {
        let id = create_working_hours(
            repo,
            NewWorkingHours {
                barber_id,
                day_of_week,
                hours,
                is_active: true,
            },
        )
        .await?;
        ids.push(id);
    }
    Ok(ids)
}

/// Delete a working-hours row.
pub async fn delete_working_hours(
    repo: &dyn FullRepository,
    id: WorkingHoursId,
) -> ServiceResult<()> {
    match repo.delete_working_hours(id).await {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound { message, .. }) => Err(ServiceError::NotFound(message)),
        Err(e) => Err(e.into()),
    }
}

/// List a barber's weekly working hours, ordered by weekday.
pub async fn working_hours_for_barber(
    repo: &dyn FullRepository,
    barber_id: BarberId,
) -> ServiceResult<Vec<WorkingHours>> {
    if repo.get_barber(barber_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("Barber {}", barber_id)));
    }
    Ok(repo.working_hours_for_barber(barber_id).await?)
}

/// Record a time-off exception for a barber.
pub async fn request_time_off(
    repo: &dyn FullRepository,
    time_off: NewTimeOff,
) -> ServiceResult<TimeOffId> {
    if time_off.start_date > time_off.end_date {
        return Err(ServiceError::InvalidInput(
            "Time off start date must not be after its end date".into(),
        ));
    }
    if repo.get_barber(time_off.barber_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("Barber {}", time_off.barber_id)));
    }
    Ok(repo.insert_time_off(time_off).await?)
}

/// Cancel a time-off exception.
pub async fn cancel_time_off(repo: &dyn FullRepository, id: TimeOffId) -> ServiceResult<()> {
    match repo.delete_time_off(id).await {
        Ok(()) => Ok(()),
        Err(RepositoryError::NotFound { message, .. }) => Err(ServiceError::NotFound(message)),
        Err(e) => Err(e.into()),
    }
}

/// A barber's time-off records, newest first.
pub async fn time_off_for_barber(
    repo: &dyn FullRepository,
    barber_id: BarberId,
) -> ServiceResult<Vec<TimeOff>> {
    Ok(repo.time_off_for_barber(barber_id).await?)
}

/// Barbers with any open time on `date`: active, scheduled that weekday,
/// and not on approved full-day leave.
pub async fn barbers_working_on(
    repo: &dyn FullRepository,
    date_str: &str,
) -> ServiceResult<Vec<Barber>> {
    let date = parse_date(date_str).map_err(ServiceError::InvalidInput)?;
    let weekday = weekday_index(date);
    let hours = repo.working_hours_for_day(weekday).await?;
    let exceptions = repo.time_off_for_date(date).await?;

    let mut working = Vec::new();
    for barber in repo.list_barbers().await? {
        if !barber.is_active {
            continue;
        }
        let own_hours: Vec<WorkingHours> = hours
            .iter()
            .filter(|h| h.barber_id == barber.id)
            .cloned()
            .collect();
        if !open_ranges(&own_hours, &exceptions, date).is_empty() {
            working.push(barber);
        }
    }
    Ok(working)
}

/// One barber's open ranges for one date, after exceptions.
pub async fn barber_day_availability(
    repo: &dyn FullRepository,
    barber_id: BarberId,
    date_str: &str,
) -> ServiceResult<Vec<TimeRange>> {
    let date = parse_date(date_str).map_err(ServiceError::InvalidInput)?;
    if repo.get_barber(barber_id).await?.is_none() {
        return Err(ServiceError::NotFound(format!("Barber {}", barber_id)));
    }
    let weekday = weekday_index(date);
    let hours: Vec<WorkingHours> = repo
        .working_hours_for_barber(barber_id)
        .await?
        .into_iter()
        .filter(|h| h.day_of_week == weekday)
        .collect();
    let exceptions = repo.time_off_for_date(date).await?;
    Ok(open_ranges(&hours, &exceptions, date))
}

// ==================== Catalog ====================

/// List all barbers.
pub async fn list_barbers(repo: &dyn FullRepository) -> ServiceResult<Vec<Barber>> {
    Ok(repo.list_barbers().await?)
}

/// List all service types.
pub async fn list_services(repo: &dyn FullRepository) -> ServiceResult<Vec<ServiceType>> {
    Ok(repo.list_services().await?)
}

/// Clock a barber in or out; the flag feeds the queue wait estimate.
pub async fn set_barber_clocked_in(
    repo: &dyn FullRepository,
    barber_id: BarberId,
    clocked_in: bool,
) -> ServiceResult<()> {
    match repo.set_barber_clocked_in(barber_id, clocked_in).await {
        Ok(()) => {
            info!(barber_id = barber_id.value(), clocked_in, "barber clock status changed");
            Ok(())
        }
        Err(RepositoryError::NotFound { message, .. }) => Err(ServiceError::NotFound(message)),
        Err(e) => Err(e.into()),
    }
}
