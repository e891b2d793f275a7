//! Core read-side computations: the availability calculator and the queue
//! estimator.
//!
//! Both are pure functions over snapshots of stored data. They never touch
//! the repository themselves; the service layer in `crate::db::services`
//! gathers the inputs and hands them over.

pub mod availability;
pub mod queue_estimator;

pub use availability::{compute_slots, AvailabilityConfig, BarberDay, BookedSlot};
pub use queue_estimator::{estimate_queue, EstimatorConfig, ServiceAverages};


#[cfg(test)]
#[path = "queue_estimator_tests.rs"]
mod queue_estimator_tests;
