//! End-to-end service layer scenarios against the in-memory repository.
//!
//! These walk through a realistic shop day: schedules get set up, customers
//! book and walk in, and availability and the queue stay consistent
//! throughout.

use chrono::{DateTime, Duration, Utc};

use chairside::api::{AppointmentStatus, BarberId, BarberPreference, QueueStatus, ServiceId};
use chairside::db::models::{
    Barber, NewAppointment, NewQueueEntry, NewTimeOff, ServiceType,
};
use chairside::db::repo_config::ShopSettings;
use chairside::db::repository::CatalogRepository;
use chairside::db::services::{self, ServiceError};
use chairside::db::LocalRepository;
use chairside::models::{parse_date, TimeRange};

// 2026-03-02 is a Monday.
const DAY: &str = "2026-03-02";

fn opening() -> DateTime<Utc> {
    "2026-03-02T09:00:00Z".parse().unwrap()
}

fn at(hhmm: &str) -> DateTime<Utc> {
    format!("2026-03-02T{}:00Z", hhmm).parse().unwrap()
}

fn shop() -> ShopSettings {
    ShopSettings::default()
}

/// Two barbers on a standard week, haircut and shave on the menu.
async fn seed_shop(repo: &LocalRepository) -> (BarberId, BarberId, ServiceId, ServiceId) {
    let marco = BarberId::new(1);
    let teo = BarberId::new(2);
    for (id, name) in [(marco, "Marco"), (teo, "Teo")] {
        repo.upsert_barber(Barber {
            id,
            name: name.to_string(),
            is_active: true,
            is_clocked_in: true,
        })
        .await
        .unwrap();
        services::create_default_week(repo, id, TimeRange::parse("09:00", "18:00").unwrap())
            .await
            .unwrap();
    }

    let haircut = ServiceId::new(1);
    let shave = ServiceId::new(2);
    for (id, name, minutes) in [(haircut, "Haircut", 30), (shave, "Shave", 20)] {
        repo.upsert_service(ServiceType {
            id,
            name: name.to_string(),
            base_price: 25.0,
            duration_minutes: minutes,
            is_active: true,
        })
        .await
        .unwrap();
    }

    (marco, teo, haircut, shave)
}

fn booking(
    name: &str,
    barber: Option<BarberId>,
    service: ServiceId,
    start: DateTime<Utc>,
) -> NewAppointment {
    NewAppointment {
        customer_name: name.to_string(),
        customer_phone: "555-0101".to_string(),
        barber_id: barber,
        service_id: service,
        scheduled_at: start,
        duration_minutes: 0,
        notes: None,
    }
}

fn walk_in(name: &str, barber: Option<BarberId>) -> NewQueueEntry {
    NewQueueEntry {
        customer_name: name.to_string(),
        customer_phone: None,
        requested_barber_id: barber,
        notes: None,
    }
}

#[tokio::test]
async fn test_booked_day_narrows_availability() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    // 9:00-18:00 at a 30-minute step and duration: 18 candidates per barber.
    let before = services::available_slots(
        &repo,
        DAY,
        haircut,
        BarberPreference::Specific(marco),
        yesterday,
        &shop(),
    )
    .await
    .unwrap();
    assert_eq!(before.len(), 18);

    services::book_appointment(&repo, booking("Ana", Some(marco), haircut, at("10:00")), yesterday)
        .await
        .unwrap();
    services::book_appointment(&repo, booking("Bruno", Some(marco), haircut, at("15:30")), yesterday)
        .await
        .unwrap();

    let after = services::available_slots(
        &repo,
        DAY,
        haircut,
        BarberPreference::Specific(marco),
        yesterday,
        &shop(),
    )
    .await
    .unwrap();
    let blocked: Vec<_> = after.iter().filter(|s| !s.available).collect();
    assert_eq!(blocked.len(), 2);
    assert_eq!(blocked[0].start, at("10:00"));
    assert_eq!(blocked[1].start, at("15:30"));
}

#[tokio::test]
async fn test_any_barber_availability_survives_one_booked_chair() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    services::book_appointment(&repo, booking("Ana", Some(marco), haircut, at("10:00")), yesterday)
        .await
        .unwrap();

    let slots = services::available_slots(
        &repo,
        DAY,
        haircut,
        BarberPreference::Any,
        yesterday,
        &shop(),
    )
    .await
    .unwrap();
    // Teo is still free at 10:00.
    let ten = slots.iter().find(|s| s.start == at("10:00")).unwrap();
    assert!(ten.available);
    assert!(ten.barber_id.is_none());
}

#[tokio::test]
async fn test_midday_request_hides_the_morning() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;

    let slots = services::available_slots(
        &repo,
        DAY,
        haircut,
        BarberPreference::Specific(marco),
        at("13:05"),
        &shop(),
    )
    .await
    .unwrap();
    assert!(slots.iter().all(|s| s.start > at("13:05")));
    assert_eq!(slots[0].start, at("13:30"));
}

#[tokio::test]
async fn test_shorter_service_uses_the_same_grid() {
    let repo = LocalRepository::new();
    let (marco, _teo, _haircut, shave) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    let slots = services::available_slots(
        &repo,
        DAY,
        shave,
        BarberPreference::Specific(marco),
        yesterday,
        &shop(),
    )
    .await
    .unwrap();
    // A 20-minute shave still enumerates on the 30-minute grid; the last
    // start is 17:30 since 17:30 + 0:20 fits before close.
    assert_eq!(slots.last().unwrap().start, at("17:30"));
    assert_eq!(slots.len(), 18);
}

#[tokio::test]
async fn test_time_off_window_and_booking_compose() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    services::request_time_off(
        &repo,
        NewTimeOff {
            barber_id: marco,
            start_date: parse_date(DAY).unwrap(),
            end_date: parse_date(DAY).unwrap(),
            window: Some(TimeRange::parse("12:00", "14:00").unwrap()),
            reason: Some("training".into()),
            is_approved: true,
        },
    )
    .await
    .unwrap();
    services::book_appointment(&repo, booking("Ana", Some(marco), haircut, at("09:00")), yesterday)
        .await
        .unwrap();

    let slots = services::available_slots(
        &repo,
        DAY,
        haircut,
        BarberPreference::Specific(marco),
        yesterday,
        &shop(),
    )
    .await
    .unwrap();
    // Nothing enumerated inside the 12:00-14:00 window at all.
    assert!(slots.iter().all(|s| s.start < at("12:00") || s.start >= at("14:00")));
    let nine = slots.iter().find(|s| s.start == at("09:00")).unwrap();
    assert!(!nine.available);
}

#[tokio::test]
async fn test_unapproved_time_off_changes_nothing() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    services::request_time_off(
        &repo,
        NewTimeOff {
            barber_id: marco,
            start_date: parse_date(DAY).unwrap(),
            end_date: parse_date(DAY).unwrap(),
            window: None,
            reason: Some("pending request".into()),
            is_approved: false,
        },
    )
    .await
    .unwrap();

    let slots = services::available_slots(
        &repo,
        DAY,
        haircut,
        BarberPreference::Specific(marco),
        yesterday,
        &shop(),
    )
    .await
    .unwrap();
    assert_eq!(slots.len(), 18);
}

#[tokio::test]
async fn test_stale_availability_loses_the_booking_race() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    // Both customers saw 10:00 as free; the second write must fail.
    services::book_appointment(&repo, booking("Ana", Some(marco), haircut, at("10:00")), yesterday)
        .await
        .unwrap();
    let err =
        services::book_appointment(&repo, booking("Bruno", Some(marco), haircut, at("10:00")), yesterday)
            .await
            .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // The same instant with the other chair still works.
    let teo = BarberId::new(2);
    services::book_appointment(&repo, booking("Bruno", Some(teo), haircut, at("10:00")), yesterday)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_unassigned_booking_conflicts_only_when_shop_is_full() {
    let repo = LocalRepository::new();
    let (marco, teo, haircut, _) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    services::book_appointment(&repo, booking("Ana", Some(marco), haircut, at("10:00")), yesterday)
        .await
        .unwrap();
    // One chair left, so an unassigned booking still fits.
    services::book_appointment(&repo, booking("Bruno", None, haircut, at("10:00")), yesterday)
        .await
        .unwrap();

    // Now both chairs are spoken for.
    let err = services::book_appointment(
        &repo,
        booking("Caro", Some(teo), haircut, at("10:00")),
        yesterday,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn test_appointment_lifecycle_through_the_chair() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;
    let yesterday = opening() - Duration::days(1);

    let appt =
        services::book_appointment(&repo, booking("Ana", Some(marco), haircut, at("10:00")), yesterday)
            .await
            .unwrap();
    assert_eq!(appt.status, AppointmentStatus::Scheduled);
    assert_eq!(appt.duration_minutes, 30);

    for next in [
        AppointmentStatus::Confirmed,
        AppointmentStatus::CheckedIn,
        AppointmentStatus::InProgress,
        AppointmentStatus::Completed,
    ] {
        services::update_appointment_status(&repo, appt.id, next).await.unwrap();
    }

    // Completed is terminal.
    let err = services::cancel_appointment(&repo, appt.id).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_walk_in_queue_full_morning() {
    let repo = LocalRepository::new();
    let (marco, teo, _, _) = seed_shop(&repo).await;

    let ana = services::check_in_walk_in(&repo, walk_in("Ana", None), opening(), &shop())
        .await
        .unwrap();
    let bruno = services::check_in_walk_in(
        &repo,
        walk_in("Bruno", Some(marco)),
        opening() + Duration::minutes(3),
        &shop(),
    )
    .await
    .unwrap();
    let caro = services::check_in_walk_in(
        &repo,
        walk_in("Caro", None),
        opening() + Duration::minutes(7),
        &shop(),
    )
    .await
    .unwrap();
    assert_eq!((ana.position, bruno.position, caro.position), (1, 2, 3));

    // Ana goes to Teo's chair.
    services::call_customer(&repo, ana.id, opening() + Duration::minutes(8))
        .await
        .unwrap();
    services::start_service(&repo, ana.id, Some(teo), opening() + Duration::minutes(10))
        .await
        .unwrap();

    let view = services::queue_view(&repo, opening() + Duration::minutes(11), &shop())
        .await
        .unwrap();
    assert_eq!(view.in_service, 1);
    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[0].id, bruno.id);
    assert_eq!(view.entries[0].position, 1);

    // Ana's cut finishes in 25 minutes and feeds the averages.
    let done = services::complete_service(&repo, ana.id, opening() + Duration::minutes(35))
        .await
        .unwrap();
    assert_eq!(done.status, QueueStatus::Done);
    assert_eq!(done.service_minutes(), Some(25));

    let completed = services::completed_today(&repo, opening() + Duration::minutes(36))
        .await
        .unwrap();
    assert_eq!(completed.len(), 1);
}

#[tokio::test]
async fn test_removed_entry_cannot_come_back() {
    let repo = LocalRepository::new();
    seed_shop(&repo).await;

    let ana = services::check_in_walk_in(&repo, walk_in("Ana", None), opening(), &shop())
        .await
        .unwrap();
    services::remove_from_queue(&repo, ana.id, opening() + Duration::minutes(2))
        .await
        .unwrap();

    let err = services::call_customer(&repo, ana.id, opening() + Duration::minutes(3))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidTransition(_)));
}

#[tokio::test]
async fn test_sunday_has_no_slots_on_a_default_week() {
    let repo = LocalRepository::new();
    let (marco, _teo, haircut, _) = seed_shop(&repo).await;

    // 2026-03-08 is a Sunday; the default week is Monday through Saturday.
    let slots = services::available_slots(
        &repo,
        "2026-03-08",
        haircut,
        BarberPreference::Specific(marco),
        opening() - Duration::days(7),
        &shop(),
    )
    .await
    .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn test_working_today_and_day_availability_agree() {
    let repo = LocalRepository::new();
    let (marco, teo, _, _) = seed_shop(&repo).await;

    services::request_time_off(
        &repo,
        NewTimeOff {
            barber_id: teo,
            start_date: parse_date(DAY).unwrap(),
            end_date: parse_date("2026-03-06").unwrap(),
            window: None,
            reason: Some("vacation".into()),
            is_approved: true,
        },
    )
    .await
    .unwrap();

    let working = services::barbers_working_on(&repo, DAY).await.unwrap();
    assert_eq!(working.len(), 1);
    assert_eq!(working[0].id, marco);

    assert!(services::barber_day_availability(&repo, teo, DAY)
        .await
        .unwrap()
        .is_empty());
    assert!(!services::barber_day_availability(&repo, marco, DAY)
        .await
        .unwrap()
        .is_empty());

    // Teo is back the following Monday.
    let next_week = services::barbers_working_on(&repo, "2026-03-09").await.unwrap();
    assert_eq!(next_week.len(), 2);
}
