//! Router configuration for the HTTP API.
//!
//! This module sets up all routes, middleware (CORS, compression, tracing),
//! and creates the axum router ready for serving.

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration - permissive for development, should be restricted in production
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the API router with versioned endpoints
    let api_v1 = Router::new()
        // Availability
        .route("/availability", get(handlers::get_availability))
        // Appointments
        .route("/appointments", get(handlers::list_appointments))
        .route("/appointments", post(handlers::create_appointment))
        .route(
            "/appointments/{id}/status",
            patch(handlers::update_appointment_status),
        )
        .route("/appointments/{id}", delete(handlers::cancel_appointment))
        // Walk-in queue
        .route("/queue", get(handlers::get_queue))
        .route("/queue", post(handlers::check_in))
        .route("/queue/stats", get(handlers::queue_stats))
        .route("/queue/{id}/call", post(handlers::call_customer))
        .route("/queue/{id}/start", post(handlers::start_service))
        .route("/queue/{id}/complete", post(handlers::complete_service))
        .route("/queue/{id}/remove", post(handlers::remove_from_queue))
        // Schedules
        .route("/schedules", post(handlers::create_working_hours))
        .route("/schedules/{id}", delete(handlers::delete_working_hours))
        .route("/schedules/barber/{id}", get(handlers::get_barber_schedule))
        .route("/schedules/time-off", post(handlers::create_time_off))
        .route("/schedules/time-off/{id}", delete(handlers::delete_time_off))
        .route("/schedules/working-today", get(handlers::working_today))
        .route(
            "/schedules/availability/{barber_id}/{date}",
            get(handlers::barber_availability),
        )
        // Catalog
        .route("/barbers", get(handlers::list_barbers))
        .route("/barbers/{id}/clock-in", post(handlers::clock_in))
        .route("/barbers/{id}/clock-out", post(handlers::clock_out))
        .route("/services", get(handlers::list_services));

    // Combine all routes
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
