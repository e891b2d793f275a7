//! # Chairside Backend
//!
//! Scheduling and walk-in queue engine for a barbershop point of sale.
//!
//! This crate powers the booking surface of the shop: it computes bookable
//! appointment slots from barber schedules, exceptions, and existing
//! bookings, and it estimates walk-in queue positions and waits. A REST API
//! via Axum exposes both to the front of house.
//!
//! ## Features
//!
//! - **Availability**: candidate slots per day, service, and barber preference
//! - **Queue**: check-in, call, serve, and complete walk-ins with live
//!   position and wait estimates
//! - **Schedules**: weekly working hours and time-off exceptions per barber
//! - **Appointments**: booking with write-time conflict checks and a strict
//!   status lifecycle
//! - **HTTP API**: RESTful endpoints for the front-of-house client
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`api`]: identifiers, statuses, and derived-view DTO types
//! - [`models`]: time-of-day arithmetic and the schedule domain model
//! - [`db`]: repository pattern, service layer, and persistence
//! - [`services`]: the pure availability and queue computations
//! - [`http`]: Axum-based HTTP server and request handlers

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod db;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
