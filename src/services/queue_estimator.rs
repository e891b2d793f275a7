//! Queue estimator: positions and wait estimates for the walk-in queue.
//!
//! Positions rank waiting and called entries by check-in time. Wait
//! estimates multiply the count of people ahead by an average service
//! duration, preferring observed per-barber averages over the configured
//! fallback. Everything here is derived per call; nothing is stored.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::api::{BarberId, QueueEntryView, QueueStatus, QueueView};
use crate::db::models::QueueEntry;

/// Tuning constants for wait estimation.
#[derive(Debug, Clone, Copy)]
pub struct EstimatorConfig {
    /// Fallback average service duration when no completions exist yet.
    pub default_service_minutes: u32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            default_service_minutes: 25,
        }
    }
}

/// Rolling service-time averages from recently completed entries.
#[derive(Debug, Clone, Default)]
pub struct ServiceAverages {
    overall: Option<f64>,
    per_barber: HashMap<BarberId, f64>,
}

impl ServiceAverages {
    /// Build averages from completed entries with usable timestamps.
    pub fn from_completed(entries: &[QueueEntry]) -> Self {
        let mut overall_sum = 0.0;
        let mut overall_count = 0u32;
        let mut barber_sums: HashMap<BarberId, (f64, u32)> = HashMap::new();

        for entry in entries {
            let Some(minutes) = entry.service_minutes() else {
                continue;
            };
            let minutes = minutes as f64;
            overall_sum += minutes;
            overall_count += 1;
            if let Some(barber_id) = entry.served_by {
                let slot = barber_sums.entry(barber_id).or_insert((0.0, 0));
                slot.0 += minutes;
                slot.1 += 1;
            }
        }

        let overall = (overall_count > 0).then(|| overall_sum / overall_count as f64);
        let per_barber = barber_sums
            .into_iter()
            .map(|(id, (sum, count))| (id, sum / count as f64))
            .collect();

        Self { overall, per_barber }
    }

    /// Average minutes per service for a barber (or overall when `None`),
    /// falling back to the configured default.
    pub fn minutes_for(&self, barber_id: Option<BarberId>, fallback: u32) -> f64 {
        let observed = match barber_id {
            Some(id) => self.per_barber.get(&id).copied().or(self.overall),
            None => self.overall,
        };
        observed.unwrap_or(fallback as f64)
    }
}

/// Compute the full queue view from a snapshot of entries.
///
/// `entries` must be in check-in order; done and removed entries are
/// ignored. `clocked_in_barbers` divides the new-walk-in estimate, floored
/// at one so an empty shop still yields a finite number.
pub fn estimate_queue(
    entries: &[QueueEntry],
    averages: &ServiceAverages,
    clocked_in_barbers: usize,
    now: DateTime<Utc>,
    config: &EstimatorConfig,
) -> QueueView {
    let fallback = config.default_service_minutes;

    let mut active: Vec<&QueueEntry> = entries
        .iter()
        .filter(|e| e.status.is_active())
        .collect();
    active.sort_by_key(|e| e.checked_in_at);

    let mut views = Vec::with_capacity(active.len());
    for (index, entry) in active.iter().enumerate() {
        // An entry with a barber preference only waits on earlier entries
        // that could occupy that barber; a no-preference entry waits on all.
        let ahead = match entry.requested_barber_id {
            Some(barber_id) => active[..index]
                .iter()
                .filter(|e| {
                    e.requested_barber_id.is_none()
                        || e.requested_barber_id == Some(barber_id)
                })
                .count(),
            None => index,
        };
        let avg = averages.minutes_for(entry.requested_barber_id, fallback);
        let estimated_wait_minutes = (ahead as f64 * avg).round() as u32;
        let waited_minutes = (now - entry.checked_in_at).num_minutes().max(0) as u32;

        views.push(QueueEntryView {
            id: entry.id,
            customer_name: entry.customer_name.clone(),
            requested_barber_id: entry.requested_barber_id,
            status: entry.status,
            position: (index + 1) as u32,
            estimated_wait_minutes,
            checked_in_at: entry.checked_in_at,
            waited_minutes,
        });
    }

    let waiting = active.iter().filter(|e| e.status == QueueStatus::Waiting).count();
    let called = active.iter().filter(|e| e.status == QueueStatus::Called).count();
    let in_service = entries
        .iter()
        .filter(|e| e.status == QueueStatus::InService)
        .count();

    // A new walk-in joins behind everyone; barbers working in parallel
    // shorten that tail.
    let overall_avg = averages.minutes_for(None, fallback);
    let parallelism = clocked_in_barbers.max(1) as f64;
    let estimated_wait_new =
        ((active.len() as f64 * overall_avg) / parallelism).round() as u32;

    QueueView {
        entries: views,
        waiting,
        called,
        in_service,
        estimated_wait_new,
    }
}
