//! Behavioral tests for the queue estimator.

use chrono::{DateTime, Duration, Utc};

use crate::api::{BarberId, QueueEntryId, QueueStatus};
use crate::db::models::QueueEntry;

use super::queue_estimator::{estimate_queue, EstimatorConfig, ServiceAverages};

fn base_time() -> DateTime<Utc> {
    "2026-03-02T09:00:00Z".parse().unwrap()
}

fn entry(id: i64, minutes_after: i64, status: QueueStatus) -> QueueEntry {
    QueueEntry {
        id: QueueEntryId::new(id),
        customer_name: format!("customer-{}", id),
        customer_phone: None,
        requested_barber_id: None,
        notes: None,
        status,
        checked_in_at: base_time() + Duration::minutes(minutes_after),
        called_at: None,
        started_at: None,
        completed_at: None,
        served_by: None,
    }
}

fn completed(barber: i64, service_minutes: i64) -> QueueEntry {
    let started = base_time();
    QueueEntry {
        status: QueueStatus::Done,
        started_at: Some(started),
        completed_at: Some(started + Duration::minutes(service_minutes)),
        served_by: Some(BarberId::new(barber)),
        ..entry(0, -120, QueueStatus::Done)
    }
}

fn config(avg: u32) -> EstimatorConfig {
    EstimatorConfig {
        default_service_minutes: avg,
    }
}

#[test]
fn test_positions_and_estimates_follow_checkin_order() {
    let entries = vec![
        entry(1, 0, QueueStatus::Waiting),
        entry(2, 5, QueueStatus::Waiting),
        entry(3, 10, QueueStatus::Waiting),
    ];
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(15),
        &config(20),
    );

    let positions: Vec<u32> = view.entries.iter().map(|e| e.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
    let estimates: Vec<u32> = view.entries.iter().map(|e| e.estimated_wait_minutes).collect();
    assert_eq!(estimates, vec![0, 20, 40]);
    assert_eq!(view.waiting, 3);
}

#[test]
fn test_checkin_order_wins_over_input_order() {
    let entries = vec![
        entry(2, 5, QueueStatus::Waiting),
        entry(1, 0, QueueStatus::Waiting),
    ];
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(10),
        &config(20),
    );
    assert_eq!(view.entries[0].id, QueueEntryId::new(1));
    assert_eq!(view.entries[0].position, 1);
    assert_eq!(view.entries[1].id, QueueEntryId::new(2));
}

#[test]
fn test_called_entries_keep_their_place() {
    let entries = vec![
        entry(1, 0, QueueStatus::Called),
        entry(2, 5, QueueStatus::Waiting),
    ];
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(10),
        &config(20),
    );
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[0].position, 1);
    assert_eq!(view.entries[0].status, QueueStatus::Called);
    assert_eq!(view.waiting, 1);
    assert_eq!(view.called, 1);
}

#[test]
fn test_done_and_removed_are_excluded() {
    let entries = vec![
        entry(1, 0, QueueStatus::Done),
        entry(2, 5, QueueStatus::Removed),
        entry(3, 10, QueueStatus::Waiting),
    ];
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(15),
        &config(20),
    );
    assert_eq!(view.entries.len(), 1);
    assert_eq!(view.entries[0].id, QueueEntryId::new(3));
    assert_eq!(view.entries[0].position, 1);
    assert_eq!(view.entries[0].estimated_wait_minutes, 0);
}

#[test]
fn test_removal_rerankes_everyone_behind() {
    let mut entries = vec![
        entry(1, 0, QueueStatus::Waiting),
        entry(2, 5, QueueStatus::Waiting),
        entry(3, 10, QueueStatus::Waiting),
    ];
    entries[1].status = QueueStatus::Removed;
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(15),
        &config(20),
    );
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[1].id, QueueEntryId::new(3));
    assert_eq!(view.entries[1].position, 2);
    assert_eq!(view.entries[1].estimated_wait_minutes, 20);
}

#[test]
fn test_barber_preference_only_waits_on_contenders() {
    // Entry 3 wants barber 2; entry 2 is committed to barber 1, so only the
    // no-preference entry 1 can delay entry 3.
    let mut entries = vec![
        entry(1, 0, QueueStatus::Waiting),
        entry(2, 5, QueueStatus::Waiting),
        entry(3, 10, QueueStatus::Waiting),
    ];
    entries[1].requested_barber_id = Some(BarberId::new(1));
    entries[2].requested_barber_id = Some(BarberId::new(2));
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        2,
        base_time() + Duration::minutes(15),
        &config(20),
    );
    assert_eq!(view.entries[2].estimated_wait_minutes, 20);
}

#[test]
fn test_observed_averages_override_the_default() {
    let completed = vec![completed(1, 40), completed(1, 20)];
    let averages = ServiceAverages::from_completed(&completed);

    let entries = vec![
        entry(1, 0, QueueStatus::Waiting),
        entry(2, 5, QueueStatus::Waiting),
    ];
    let view = estimate_queue(
        &entries,
        &averages,
        1,
        base_time() + Duration::minutes(10),
        &config(25),
    );
    // One person ahead at an observed 30-minute average.
    assert_eq!(view.entries[1].estimated_wait_minutes, 30);
}

#[test]
fn test_per_barber_average_applies_to_preference() {
    let completed = vec![completed(1, 60), completed(2, 10)];
    let averages = ServiceAverages::from_completed(&completed);

    let mut entries = vec![
        entry(1, 0, QueueStatus::Waiting),
        entry(2, 5, QueueStatus::Waiting),
    ];
    entries[1].requested_barber_id = Some(BarberId::new(1));
    let view = estimate_queue(
        &entries,
        &averages,
        2,
        base_time() + Duration::minutes(10),
        &config(25),
    );
    // Barber 1 runs slow; the estimate uses that barber's 60-minute average.
    assert_eq!(view.entries[1].estimated_wait_minutes, 60);
}

#[test]
fn test_new_walkin_estimate_divides_by_clocked_in_barbers() {
    let entries = vec![
        entry(1, 0, QueueStatus::Waiting),
        entry(2, 5, QueueStatus::Waiting),
        entry(3, 10, QueueStatus::Waiting),
        entry(4, 15, QueueStatus::Waiting),
    ];
    let one = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(20),
        &config(20),
    );
    assert_eq!(one.estimated_wait_new, 80);

    let two = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        2,
        base_time() + Duration::minutes(20),
        &config(20),
    );
    assert_eq!(two.estimated_wait_new, 40);

    // Zero clocked-in barbers still yields a finite estimate.
    let zero = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        0,
        base_time() + Duration::minutes(20),
        &config(20),
    );
    assert_eq!(zero.estimated_wait_new, 80);
}

#[test]
fn test_empty_queue_is_all_zeros() {
    let view = estimate_queue(&[], &ServiceAverages::default(), 2, base_time(), &config(25));
    assert!(view.entries.is_empty());
    assert_eq!(view.waiting, 0);
    assert_eq!(view.called, 0);
    assert_eq!(view.in_service, 0);
    assert_eq!(view.estimated_wait_new, 0);
}

#[test]
fn test_waited_minutes_reflects_elapsed_time() {
    let entries = vec![entry(1, 0, QueueStatus::Waiting)];
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(42),
        &config(25),
    );
    assert_eq!(view.entries[0].waited_minutes, 42);
}

#[test]
fn test_in_service_counter() {
    let entries = vec![
        entry(1, 0, QueueStatus::InService),
        entry(2, 5, QueueStatus::Waiting),
    ];
    let view = estimate_queue(
        &entries,
        &ServiceAverages::default(),
        1,
        base_time() + Duration::minutes(10),
        &config(25),
    );
    assert_eq!(view.in_service, 1);
    assert_eq!(view.entries.len(), 1);
}

#[test]
fn test_averages_ignore_entries_without_timestamps() {
    let mut broken = completed(1, 30);
    broken.completed_at = None;
    let averages = ServiceAverages::from_completed(&[broken]);
    assert_eq!(averages.minutes_for(None, 25), 25.0);
}
