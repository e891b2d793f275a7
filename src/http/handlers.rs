//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! existing service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;

use super::dto::{
    AppointmentsQuery, AvailabilityQuery, AvailabilityResponse, BarberAvailabilityResponse,
    BookAppointmentRequest, CheckInRequest, CreateWorkingHoursRequest, CreatedResponse,
    HealthResponse, OpenRangeDto, QueueStatsResponse, StartServiceRequest, TimeOffRequest,
    UpdateStatusRequest, WorkingTodayResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::api::{
    AppointmentId, AppointmentStatus, BarberId, BarberPreference, QueueEntryId, QueueEntryView,
    QueueView, ServiceId, TimeOffId, WorkingHoursId,
};
use crate::db::models::{
    Appointment, AppointmentFilter, Barber, NewTimeOff, NewWorkingHours, QueueEntry, ServiceType,
    WorkingHours,
};
use crate::db::services as db_services;
use crate::models::{parse_date, TimeRange};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and storage is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Availability
// =============================================================================

/// GET /v1/availability?date&service_id&barber_id
///
/// Candidate slots for a date, service, and optional barber preference.
pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> HandlerResult<AvailabilityResponse> {
    let preference = BarberPreference::from_option(query.barber_id.map(BarberId::new));
    let slots = db_services::available_slots(
        state.repository.as_ref(),
        &query.date,
        ServiceId::new(query.service_id),
        preference,
        Utc::now(),
        &state.shop,
    )
    .await?;

    let available = slots.iter().filter(|s| s.available).count();
    Ok(Json(AvailabilityResponse {
        date: query.date,
        service_id: query.service_id,
        slots,
        available,
    }))
}

// =============================================================================
// Appointments
// =============================================================================

/// GET /v1/appointments?date&barber_id&status
pub async fn list_appointments(
    State(state): State<AppState>,
    Query(query): Query<AppointmentsQuery>,
) -> HandlerResult<Vec<Appointment>> {
    let date = query
        .date
        .as_deref()
        .map(parse_date)
        .transpose()
        .map_err(AppError::BadRequest)?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<AppointmentStatus>)
        .transpose()
        .map_err(AppError::BadRequest)?;

    let filter = AppointmentFilter {
        date,
        barber_id: query.barber_id.map(BarberId::new),
        status,
    };
    let appointments =
        db_services::list_appointments(state.repository.as_ref(), filter).await?;
    Ok(Json(appointments))
}

/// POST /v1/appointments
///
/// Book an appointment. The slot is re-checked at write time; a stale
/// availability view gets a 409.
pub async fn create_appointment(
    State(state): State<AppState>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let created =
        db_services::book_appointment(state.repository.as_ref(), request.into(), Utc::now())
            .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PATCH /v1/appointments/{id}/status
pub async fn update_appointment_status(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateStatusRequest>,
) -> HandlerResult<Appointment> {
    let status: AppointmentStatus =
        request.status.parse().map_err(AppError::BadRequest)?;
    let updated = db_services::update_appointment_status(
        state.repository.as_ref(),
        AppointmentId::new(id),
        status,
    )
    .await?;
    Ok(Json(updated))
}

/// DELETE /v1/appointments/{id}
///
/// Cancels the appointment; the slot becomes bookable again.
pub async fn cancel_appointment(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Appointment> {
    let cancelled =
        db_services::cancel_appointment(state.repository.as_ref(), AppointmentId::new(id))
            .await?;
    Ok(Json(cancelled))
}

// =============================================================================
// Walk-in queue
// =============================================================================

/// GET /v1/queue
pub async fn get_queue(State(state): State<AppState>) -> HandlerResult<QueueView> {
    let view =
        db_services::queue_view(state.repository.as_ref(), Utc::now(), &state.shop).await?;
    Ok(Json(view))
}

/// POST /v1/queue
///
/// Check a walk-in into the queue; returns their position and estimate.
pub async fn check_in(
    State(state): State<AppState>,
    Json(request): Json<CheckInRequest>,
) -> Result<(StatusCode, Json<QueueEntryView>), AppError> {
    let view = db_services::check_in_walk_in(
        state.repository.as_ref(),
        request.into(),
        Utc::now(),
        &state.shop,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// POST /v1/queue/{id}/call
pub async fn call_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<QueueEntry> {
    let entry =
        db_services::call_customer(state.repository.as_ref(), QueueEntryId::new(id), Utc::now())
            .await?;
    Ok(Json(entry))
}

/// POST /v1/queue/{id}/start
pub async fn start_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<StartServiceRequest>,
) -> HandlerResult<QueueEntry> {
    let entry = db_services::start_service(
        state.repository.as_ref(),
        QueueEntryId::new(id),
        request.barber_id.map(BarberId::new),
        Utc::now(),
    )
    .await?;
    Ok(Json(entry))
}

/// POST /v1/queue/{id}/complete
pub async fn complete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<QueueEntry> {
    let entry = db_services::complete_service(
        state.repository.as_ref(),
        QueueEntryId::new(id),
        Utc::now(),
    )
    .await?;
    Ok(Json(entry))
}

/// POST /v1/queue/{id}/remove
pub async fn remove_from_queue(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<QueueEntry> {
    let entry = db_services::remove_from_queue(
        state.repository.as_ref(),
        QueueEntryId::new(id),
        Utc::now(),
    )
    .await?;
    Ok(Json(entry))
}

/// GET /v1/queue/stats
pub async fn queue_stats(State(state): State<AppState>) -> HandlerResult<QueueStatsResponse> {
    let now = Utc::now();
    let view = db_services::queue_view(state.repository.as_ref(), now, &state.shop).await?;
    let completed = db_services::completed_today(state.repository.as_ref(), now).await?;

    Ok(Json(QueueStatsResponse {
        waiting: view.waiting,
        called: view.called,
        in_service: view.in_service,
        completed_today: completed.len(),
        estimated_wait_new: view.estimated_wait_new,
    }))
}

// =============================================================================
// Schedules
// =============================================================================

/// GET /v1/schedules/barber/{id}
pub async fn get_barber_schedule(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HandlerResult<Vec<WorkingHours>> {
    let hours =
        db_services::working_hours_for_barber(state.repository.as_ref(), BarberId::new(id))
            .await?;
    Ok(Json(hours))
}

/// POST /v1/schedules
pub async fn create_working_hours(
    State(state): State<AppState>,
    Json(request): Json<CreateWorkingHoursRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let hours =
        TimeRange::parse(&request.start, &request.end).map_err(AppError::BadRequest)?;
    let id = db_services::create_working_hours(
        state.repository.as_ref(),
        NewWorkingHours {
            barber_id: BarberId::new(request.barber_id),
            day_of_week: request.day_of_week,
            hours,
            is_active: request.is_active,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.value() })))
}

/// DELETE /v1/schedules/{id}
pub async fn delete_working_hours(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::delete_working_hours(state.repository.as_ref(), WorkingHoursId::new(id))
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/schedules/time-off
pub async fn create_time_off(
    State(state): State<AppState>,
    Json(request): Json<TimeOffRequest>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let start_date = parse_date(&request.start_date).map_err(AppError::BadRequest)?;
    let end_date = parse_date(&request.end_date).map_err(AppError::BadRequest)?;
    let window = match (request.start_time.as_deref(), request.end_time.as_deref()) {
        (Some(start), Some(end)) => {
            Some(TimeRange::parse(start, end).map_err(AppError::BadRequest)?)
        }
        (None, None) => None,
        _ => {
            return Err(AppError::BadRequest(
                "start_time and end_time must be given together".into(),
            ));
        }
    };

    let id = db_services::request_time_off(
        state.repository.as_ref(),
        NewTimeOff {
            barber_id: BarberId::new(request.barber_id),
            start_date,
            end_date,
            window,
            reason: request.reason,
            is_approved: request.is_approved,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id: id.value() })))
}

/// DELETE /v1/schedules/time-off/{id}
pub async fn delete_time_off(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::cancel_time_off(state.repository.as_ref(), TimeOffId::new(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/schedules/working-today
pub async fn working_today(State(state): State<AppState>) -> HandlerResult<WorkingTodayResponse> {
    let date = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let barbers =
        db_services::barbers_working_on(state.repository.as_ref(), &date).await?;
    Ok(Json(WorkingTodayResponse { date, barbers }))
}

/// GET /v1/schedules/availability/{barber_id}/{date}
pub async fn barber_availability(
    State(state): State<AppState>,
    Path((barber_id, date)): Path<(i64, String)>,
) -> HandlerResult<BarberAvailabilityResponse> {
    let open = db_services::barber_day_availability(
        state.repository.as_ref(),
        BarberId::new(barber_id),
        &date,
    )
    .await?;
    Ok(Json(BarberAvailabilityResponse {
        barber_id,
        date,
        open: open
            .into_iter()
            .map(|r| OpenRangeDto {
                start: r.start.to_string(),
                end: r.end.to_string(),
            })
            .collect(),
    }))
}

// =============================================================================
// Catalog
// =============================================================================

/// GET /v1/barbers
pub async fn list_barbers(State(state): State<AppState>) -> HandlerResult<Vec<Barber>> {
    let barbers = db_services::list_barbers(state.repository.as_ref()).await?;
    Ok(Json(barbers))
}

/// GET /v1/services
pub async fn list_services(State(state): State<AppState>) -> HandlerResult<Vec<ServiceType>> {
    let services = db_services::list_services(state.repository.as_ref()).await?;
    Ok(Json(services))
}

/// POST /v1/barbers/{id}/clock-in
pub async fn clock_in(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::set_barber_clocked_in(state.repository.as_ref(), BarberId::new(id), true)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/barbers/{id}/clock-out
pub async fn clock_out(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    db_services::set_barber_clocked_in(state.repository.as_ref(), BarberId::new(id), false)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
