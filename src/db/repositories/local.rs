//! In-memory repository implementation.
//!
//! Backs the default `local-repo` feature: a `parking_lot::RwLock` over plain
//! vectors, suitable for unit tests and single-process local development.
//! Reads clone records out, so every call sees a consistent snapshot.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;

use crate::api::{
    AppointmentId, AppointmentStatus, BarberId, QueueEntryId, QueueStatus, ServiceId,
    TimeOffId, WorkingHoursId,
};
use crate::db::models::{
    Appointment, AppointmentFilter, Barber, NewAppointment, NewQueueEntry, NewTimeOff,
    NewWorkingHours, QueueEntry, ServiceType, TimeOff, WorkingHours,
};
use crate::db::repository::{
    AppointmentRepository, CatalogRepository, ErrorContext, QueueRepository,
    RepositoryError, RepositoryResult, ScheduleRepository,
};

#[derive(Default)]
struct Store {
    barbers: Vec<Barber>,
    services: Vec<ServiceType>,
    working_hours: Vec<WorkingHours>,
    time_off: Vec<TimeOff>,
    appointments: Vec<Appointment>,
    queue: Vec<QueueEntry>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory repository for unit testing and local development.
pub struct LocalRepository {
    store: RwLock<Store>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(Store::default()),
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogRepository for LocalRepository {
    async fn upsert_barber(&self, barber: Barber) -> RepositoryResult<BarberId> {
        let mut store = self.store.write();
        let id = barber.id;
        match store.barbers.iter_mut().find(|b| b.id == id) {
            Some(existing) => *existing = barber,
            None => store.barbers.push(barber),
        }
        Ok(id)
    }

    async fn get_barber(&self, id: BarberId) -> RepositoryResult<Option<Barber>> {
        Ok(self.store.read().barbers.iter().find(|b| b.id == id).cloned())
    }

    async fn list_barbers(&self) -> RepositoryResult<Vec<Barber>> {
        Ok(self.store.read().barbers.clone())
    }

    async fn set_barber_clocked_in(
        &self,
        id: BarberId,
        clocked_in: bool,
    ) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let barber = store
            .barbers
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Barber {} not found", id),
                    ErrorContext::new("set_barber_clocked_in")
                        .with_entity("barber")
                        .with_entity_id(id),
                )
            })?;
        barber.is_clocked_in = clocked_in;
        Ok(())
    }

    async fn upsert_service(&self, service: ServiceType) -> RepositoryResult<ServiceId> {
        let mut store = self.store.write();
        let id = service.id;
        match store.services.iter_mut().find(|s| s.id == id) {
            Some(existing) => *existing = service,
            None => store.services.push(service),
        }
        Ok(id)
    }

    async fn get_service(&self, id: ServiceId) -> RepositoryResult<Option<ServiceType>> {
        Ok(self.store.read().services.iter().find(|s| s.id == id).cloned())
    }

    async fn list_services(&self) -> RepositoryResult<Vec<ServiceType>> {
        Ok(self.store.read().services.clone())
    }
}

#[async_trait]
impl ScheduleRepository for LocalRepository {
    async fn insert_working_hours(
        &self,
        hours: NewWorkingHours,
    ) -> RepositoryResult<WorkingHoursId> {
        let mut store = self.store.write();
        let duplicate = store.working_hours.iter().any(|w| {
            w.barber_id == hours.barber_id && w.day_of_week == hours.day_of_week
        });
        if duplicate {
            return Err(RepositoryError::validation_with_context(
                format!(
                    "Barber {} already has working hours for weekday {}",
                    hours.barber_id, hours.day_of_week
                ),
                ErrorContext::new("insert_working_hours")
                    .with_entity("working_hours")
                    .with_entity_id(hours.barber_id),
            ));
        }
        let id = WorkingHoursId::new(store.next_id());
        store.working_hours.push(WorkingHours {
            id,
            barber_id: hours.barber_id,
            day_of_week: hours.day_of_week,
            hours: hours.hours,
            is_active: hours.is_active,
        });
        Ok(id)
    }

    async fn delete_working_hours(&self, id: WorkingHoursId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let before = store.working_hours.len();
        store.working_hours.retain(|w| w.id != id);
        if store.working_hours.len() == before {
            return Err(RepositoryError::not_found(format!(
                "Working hours {} not found",
                id
            )));
        }
        Ok(())
    }

    async fn working_hours_for_barber(
        &self,
        barber_id: BarberId,
    ) -> RepositoryResult<Vec<WorkingHours>> {
        let mut rows: Vec<WorkingHours> = self
            .store
            .read()
            .working_hours
            .iter()
            .filter(|w| w.barber_id == barber_id)
            .cloned()
            .collect();
        rows.sort_by_key(|w| w.day_of_week);
        Ok(rows)
    }

    async fn working_hours_for_day(
        &self,
        day_of_week: u8,
    ) -> RepositoryResult<Vec<WorkingHours>> {
        Ok(self
            .store
            .read()
            .working_hours
            .iter()
            .filter(|w| w.day_of_week == day_of_week)
            .cloned()
            .collect())
    }

    async fn insert_time_off(&self, time_off: NewTimeOff) -> RepositoryResult<TimeOffId> {
        if time_off.end_date < time_off.start_date {
            return Err(RepositoryError::validation(format!(
                "Time off end date {} precedes start date {}",
                time_off.end_date, time_off.start_date
            )));
        }
        let mut store = self.store.write();
        let id = TimeOffId::new(store.next_id());
        store.time_off.push(TimeOff {
            id,
            barber_id: time_off.barber_id,
            start_date: time_off.start_date,
            end_date: time_off.end_date,
            window: time_off.window,
            reason: time_off.reason,
            is_approved: time_off.is_approved,
        });
        Ok(id)
    }

    async fn delete_time_off(&self, id: TimeOffId) -> RepositoryResult<()> {
        let mut store = self.store.write();
        let before = store.time_off.len();
        store.time_off.retain(|t| t.id != id);
        if store.time_off.len() == before {
            return Err(RepositoryError::not_found(format!(
                "Time off {} not found",
                id
            )));
        }
        Ok(())
    }

    async fn time_off_for_barber(&self, barber_id: BarberId) -> RepositoryResult<Vec<TimeOff>> {
        let mut rows: Vec<TimeOff> = self
            .store
            .read()
            .time_off
            .iter()
            .filter(|t| t.barber_id == barber_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    async fn time_off_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<TimeOff>> {
        Ok(self
            .store
            .read()
            .time_off
            .iter()
            .filter(|t| t.start_date <= date && date <= t.end_date)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppointmentRepository for LocalRepository {
    async fn insert_appointment(
        &self,
        appointment: NewAppointment,
    ) -> RepositoryResult<Appointment> {
        let mut store = self.store.write();
        let record = Appointment {
            id: AppointmentId::new(store.next_id()),
            customer_name: appointment.customer_name,
            customer_phone: appointment.customer_phone,
            barber_id: appointment.barber_id,
            service_id: appointment.service_id,
            scheduled_at: appointment.scheduled_at,
            duration_minutes: appointment.duration_minutes,
            status: AppointmentStatus::Scheduled,
            notes: appointment.notes,
            created_at: Utc::now(),
        };
        store.appointments.push(record.clone());
        Ok(record)
    }

    async fn get_appointment(
        &self,
        id: AppointmentId,
    ) -> RepositoryResult<Option<Appointment>> {
        Ok(self
            .store
            .read()
            .appointments
            .iter()
            .find(|a| a.id == id)
            .cloned())
    }

    async fn list_appointments(
        &self,
        filter: AppointmentFilter,
    ) -> RepositoryResult<Vec<Appointment>> {
        let mut rows: Vec<Appointment> = self
            .store
            .read()
            .appointments
            .iter()
            .filter(|a| {
                filter
                    .date
                    .map_or(true, |d| a.scheduled_at.date_naive() == d)
                    && filter.barber_id.map_or(true, |b| a.barber_id == Some(b))
                    && filter.status.map_or(true, |s| a.status == s)
            })
            .cloned()
            .collect();
        rows.sort_by_key(|a| a.scheduled_at);
        Ok(rows)
    }

    async fn set_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> RepositoryResult<Appointment> {
        let mut store = self.store.write();
        let appointment = store
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| {
                RepositoryError::not_found_with_context(
                    format!("Appointment {} not found", id),
                    ErrorContext::new("set_appointment_status")
                        .with_entity("appointment")
                        .with_entity_id(id),
                )
            })?;
        appointment.status = status;
        Ok(appointment.clone())
    }
}

#[async_trait]
impl QueueRepository for LocalRepository {
    async fn insert_queue_entry(
        &self,
        entry: NewQueueEntry,
        checked_in_at: DateTime<Utc>,
    ) -> RepositoryResult<QueueEntry> {
        let mut store = self.store.write();
        let record = QueueEntry {
            id: QueueEntryId::new(store.next_id()),
            customer_name: entry.customer_name,
            customer_phone: entry.customer_phone,
            requested_barber_id: entry.requested_barber_id,
            notes: entry.notes,
            status: QueueStatus::Waiting,
            checked_in_at,
            called_at: None,
            started_at: None,
            completed_at: None,
            served_by: None,
        };
        store.queue.push(record.clone());
        Ok(record)
    }

    async fn get_queue_entry(
        &self,
        id: QueueEntryId,
    ) -> RepositoryResult<Option<QueueEntry>> {
        Ok(self.store.read().queue.iter().find(|e| e.id == id).cloned())
    }

    async fn queue_entries(&self) -> RepositoryResult<Vec<QueueEntry>> {
        let mut rows = self.store.read().queue.clone();
        rows.sort_by_key(|e| e.checked_in_at);
        Ok(rows)
    }

    async fn set_queue_status(
        &self,
        id: QueueEntryId,
        status: QueueStatus,
        served_by: Option<BarberId>,
        at: DateTime<Utc>,
    ) -> RepositoryResult<QueueEntry> {
        let mut store = self.store.write();
        let entry = store.queue.iter_mut().find(|e| e.id == id).ok_or_else(|| {
            RepositoryError::not_found_with_context(
                format!("Queue entry {} not found", id),
                ErrorContext::new("set_queue_status")
                    .with_entity("queue_entry")
                    .with_entity_id(id),
            )
        })?;
        entry.status = status;
        match status {
            QueueStatus::Called => entry.called_at = Some(at),
            QueueStatus::InService => entry.started_at = Some(at),
            QueueStatus::Done => entry.completed_at = Some(at),
            QueueStatus::Waiting | QueueStatus::Removed => {}
        }
        if served_by.is_some() {
            entry.served_by = served_by;
        }
        Ok(entry.clone())
    }

    async fn completed_on(&self, date: NaiveDate) -> RepositoryResult<Vec<QueueEntry>> {
        Ok(self
            .store
            .read()
            .queue
            .iter()
            .filter(|e| {
                e.status == QueueStatus::Done
                    && e.completed_at.map_or(false, |t| t.date_naive() == date)
            })
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn barber(id: i64, name: &str) -> Barber {
        Barber {
            id: BarberId::new(id),
            name: name.to_string(),
            is_active: true,
            is_clocked_in: true,
        }
    }

    #[tokio::test]
    async fn test_barber_upsert_and_get() {
        let repo = LocalRepository::new();
        repo.upsert_barber(barber(1, "Marco")).await.unwrap();

        let found = repo.get_barber(BarberId::new(1)).await.unwrap();
        assert_eq!(found.unwrap().name, "Marco");
        assert!(repo.get_barber(BarberId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upsert_replaces_existing() {
        let repo = LocalRepository::new();
        repo.upsert_barber(barber(1, "Marco")).await.unwrap();
        repo.upsert_barber(barber(1, "Marco R.")).await.unwrap();

        let all = repo.list_barbers().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Marco R.");
    }

    #[tokio::test]
    async fn test_duplicate_weekday_rejected() {
        let repo = LocalRepository::new();
        let hours = NewWorkingHours {
            barber_id: BarberId::new(1),
            day_of_week: 0,
            hours: crate::models::TimeRange::parse("09:00", "18:00").unwrap(),
            is_active: true,
        };
        repo.insert_working_hours(hours.clone()).await.unwrap();

        let err = repo.insert_working_hours(hours).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[tokio::test]
    async fn test_queue_entries_sorted_by_check_in() {
        let repo = LocalRepository::new();
        let base = Utc::now();
        for (name, offset) in [("B", 5), ("A", 0), ("C", 10)] {
            repo.insert_queue_entry(
                NewQueueEntry {
                    customer_name: name.to_string(),
                    customer_phone: None,
                    requested_barber_id: None,
                    notes: None,
                },
                base + chrono::Duration::minutes(offset),
            )
            .await
            .unwrap();
        }

        let entries = repo.queue_entries().await.unwrap();
        let names: Vec<&str> = entries.iter().map(|e| e.customer_name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_set_queue_status_stamps_timestamps() {
        let repo = LocalRepository::new();
        let now = Utc::now();
        let entry = repo
            .insert_queue_entry(
                NewQueueEntry {
                    customer_name: "A".to_string(),
                    customer_phone: None,
                    requested_barber_id: None,
                    notes: None,
                },
                now,
            )
            .await
            .unwrap();

        let called = repo
            .set_queue_status(entry.id, QueueStatus::Called, None, now)
            .await
            .unwrap();
        assert_eq!(called.called_at, Some(now));

        let started = repo
            .set_queue_status(entry.id, QueueStatus::InService, Some(BarberId::new(1)), now)
            .await
            .unwrap();
        assert_eq!(started.started_at, Some(now));
        assert_eq!(started.served_by, Some(BarberId::new(1)));
    }

    #[tokio::test]
    async fn test_completed_on_filters_by_date() {
        let repo = LocalRepository::new();
        let now = Utc::now();
        let entry = repo
            .insert_queue_entry(
                NewQueueEntry {
                    customer_name: "A".to_string(),
                    customer_phone: None,
                    requested_barber_id: None,
                    notes: None,
                },
                now,
            )
            .await
            .unwrap();
        repo.set_queue_status(entry.id, QueueStatus::Done, None, now)
            .await
            .unwrap();

        assert_eq!(repo.completed_on(now.date_naive()).await.unwrap().len(), 1);
        let other_day = now.date_naive() + chrono::Duration::days(1);
        assert!(repo.completed_on(other_day).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_appointment_filtering() {
        let repo = LocalRepository::new();
        let day = chrono::NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let at = day.and_hms_opt(10, 0, 0).unwrap().and_utc();
        repo.insert_appointment(NewAppointment {
            customer_name: "Sam".to_string(),
            customer_phone: "555".to_string(),
            barber_id: Some(BarberId::new(1)),
            service_id: ServiceId::new(1),
            scheduled_at: at,
            duration_minutes: 30,
            notes: None,
        })
        .await
        .unwrap();

        let filter = AppointmentFilter {
            date: Some(day),
            barber_id: Some(BarberId::new(1)),
            status: None,
        };
        assert_eq!(repo.list_appointments(filter).await.unwrap().len(), 1);

        let other = AppointmentFilter {
            date: Some(day),
            barber_id: Some(BarberId::new(2)),
            status: None,
        };
        assert!(repo.list_appointments(other).await.unwrap().is_empty());
    }
}
