//! Tests for the schedule service.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockDoctorRepository, MockResourceBoundsRepository, MockScheduleRepository,
    MockShiftAssignmentRepository, ShiftAssignmentRepositoryError,
};
use crate::domain::{DaysOff, Doctor, DoctorName, ErrorCode, StaffBound};

type Service = ScheduleService<
    MockScheduleRepository,
    MockDoctorRepository,
    MockResourceBoundsRepository,
    MockShiftAssignmentRepository,
>;

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_now(),
    })
}

fn doctor(name: &str, days_off: &[u32]) -> Doctor {
    Doctor::new(
        DoctorId::random(),
        DoctorName::new(name).expect("valid name"),
        days_off
            .iter()
            .map(|day| NaiveDate::from_ymd_opt(2026, 2, *day).expect("valid date"))
            .collect::<DaysOff>(),
    )
}

fn schedule_with(status: ScheduleStatus) -> Schedule {
    let mut schedule = Schedule::draft(ScheduleId::random(), Month::February, 2026, fixture_now());
    schedule.transition(status, fixture_now());
    schedule
}

struct Mocks {
    schedules: MockScheduleRepository,
    doctors: MockDoctorRepository,
    bounds: MockResourceBoundsRepository,
    assignments: MockShiftAssignmentRepository,
}

impl Mocks {
    fn new() -> Self {
        Self {
            schedules: MockScheduleRepository::new(),
            doctors: MockDoctorRepository::new(),
            bounds: MockResourceBoundsRepository::new(),
            assignments: MockShiftAssignmentRepository::new(),
        }
    }

    fn with_doctors(mut self, roster: Vec<Doctor>) -> Self {
        self.doctors
            .expect_list()
            .returning(move || Ok(roster.clone()));
        self
    }

    fn with_default_bounds(mut self) -> Self {
        self.bounds.expect_list().returning(|_| Ok(Vec::new()));
        self
    }

    fn into_service(self, options: GeneratorOptions) -> Service {
        ScheduleService::new(
            ScheduleStores {
                schedules: Arc::new(self.schedules),
                doctors: Arc::new(self.doctors),
                bounds: Arc::new(self.bounds),
                assignments: Arc::new(self.assignments),
            },
            fixture_clock(),
            options,
        )
    }
}

fn seeded() -> GeneratorOptions {
    GeneratorOptions {
        time_budget: Duration::from_secs(10),
        seed: Some(17),
    }
}

fn generate_february() -> GenerateScheduleRequest {
    GenerateScheduleRequest {
        month: Month::February,
        year: 2026,
        bounds: None,
    }
}

#[tokio::test]
async fn generate_creates_missing_schedule_and_stores_roster() {
    let mut mocks = Mocks::new()
        .with_doctors(vec![doctor("Ross", &[3]), doctor("Green", &[])])
        .with_default_bounds();
    mocks
        .schedules
        .expect_find_by_period()
        .times(1)
        .return_once(|_, _| Ok(None));
    mocks.schedules.expect_insert().times(1).return_once(|_| Ok(()));
    mocks.schedules.expect_save_status().times(0);
    mocks
        .assignments
        .expect_replace_for_schedule()
        .withf(|schedule: &Schedule, assignments: &[ShiftAssignment]| {
            schedule.status() == ScheduleStatus::Generated && assignments.len() == 28
        })
        .times(1)
        .return_once(|_, _| Ok(()));

    let generated = mocks
        .into_service(seeded())
        .generate(generate_february())
        .await
        .expect("roster generated");

    assert_eq!(generated.schedule.status(), ScheduleStatus::Generated);
    assert_eq!(generated.assignments.len(), 28);
}

#[tokio::test]
async fn infeasible_generation_marks_failure_and_keeps_old_roster() {
    let existing = schedule_with(ScheduleStatus::Generated);
    let all_month: Vec<u32> = (1..=28).collect();
    let mut mocks = Mocks::new()
        .with_doctors(vec![doctor("Ross", &all_month)])
        .with_default_bounds();
    mocks
        .schedules
        .expect_find_by_period()
        .times(1)
        .return_once(move |_, _| Ok(Some(existing)));
    mocks
        .schedules
        .expect_save_status()
        .withf(|schedule: &Schedule| schedule.status() == ScheduleStatus::Failed)
        .times(1)
        .return_once(|_| Ok(true));
    mocks.assignments.expect_replace_for_schedule().times(0);

    let err = mocks
        .into_service(seeded())
        .generate(generate_february())
        .await
        .expect_err("infeasible");

    assert_eq!(err.code(), ErrorCode::InfeasibleConstraints);
    let days = err
        .details()
        .and_then(|details| details.get("days"))
        .and_then(|days| days.as_array())
        .map(Vec::len);
    assert_eq!(days, Some(28));
}

#[tokio::test]
async fn failed_roster_write_leaves_the_status_alone() {
    let existing = schedule_with(ScheduleStatus::Draft);
    let mut mocks = Mocks::new()
        .with_doctors(vec![doctor("Ross", &[]), doctor("Green", &[])])
        .with_default_bounds();
    mocks
        .schedules
        .expect_find_by_period()
        .return_once(move |_, _| Ok(Some(existing)));
    mocks.schedules.expect_save_status().times(0);
    mocks
        .assignments
        .expect_replace_for_schedule()
        .times(1)
        .return_once(|_, _| Err(ShiftAssignmentRepositoryError::connection("refused")));

    let err = mocks
        .into_service(seeded())
        .generate(generate_february())
        .await
        .expect_err("roster write failed");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn spent_budget_is_a_generation_timeout() {
    let mut mocks = Mocks::new()
        .with_doctors(vec![doctor("Ross", &[]), doctor("Green", &[])])
        .with_default_bounds();
    let existing = schedule_with(ScheduleStatus::Draft);
    mocks
        .schedules
        .expect_find_by_period()
        .return_once(move |_, _| Ok(Some(existing)));
    mocks
        .schedules
        .expect_save_status()
        .times(1)
        .return_once(|_| Ok(true));
    mocks.assignments.expect_replace_for_schedule().times(0);

    let err = mocks
        .into_service(GeneratorOptions {
            time_budget: Duration::ZERO,
            seed: Some(1),
        })
        .generate(generate_february())
        .await
        .expect_err("timeout");
    assert_eq!(err.code(), ErrorCode::GenerationTimeout);
}

#[tokio::test]
async fn finalized_schedules_are_not_regenerated() {
    let existing = schedule_with(ScheduleStatus::Finalized);
    let mut mocks = Mocks::new();
    mocks
        .schedules
        .expect_find_by_period()
        .return_once(move |_, _| Ok(Some(existing)));
    mocks.doctors.expect_list().times(0);
    mocks.assignments.expect_replace_for_schedule().times(0);

    let err = mocks
        .into_service(seeded())
        .generate(generate_february())
        .await
        .expect_err("finalized");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn request_bounds_are_clamped_and_stored_before_generating() {
    let existing = schedule_with(ScheduleStatus::Draft);
    let mut mocks = Mocks::new()
        .with_doctors(vec![doctor("Ross", &[]), doctor("Green", &[])])
        .with_default_bounds();
    mocks
        .schedules
        .expect_find_by_period()
        .return_once(move |_, _| Ok(Some(existing)));
    mocks
        .bounds
        .expect_upsert()
        .withf(|_, stored: &[StaffBound]| {
            stored.len() == 1 && stored[0].min_staff() == 2 && stored[0].max_staff() == 2
        })
        .times(1)
        .return_once(|_, _| Ok(()));
    mocks
        .assignments
        .expect_replace_for_schedule()
        .withf(|_, assignments: &[ShiftAssignment]| assignments.len() == 29)
        .times(1)
        .return_once(|_, _| Ok(()));

    let mut request = generate_february();
    request.bounds = Some(vec![BoundsRequest {
        day: 10,
        min_staff: 5,
        max_staff: 2,
    }]);
    let generated = mocks
        .into_service(seeded())
        .generate(request)
        .await
        .expect("roster generated");
    assert_eq!(generated.assignments.len(), 29);
}

#[rstest]
#[case(2024)]
#[case(2037)]
#[tokio::test]
async fn years_outside_the_window_are_rejected(#[case] year: i32) {
    let mut mocks = Mocks::new();
    mocks.schedules.expect_insert().times(0);

    let err = mocks
        .into_service(seeded())
        .create(Month::March, year)
        .await
        .expect_err("year out of range");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn duplicate_period_is_a_conflict() {
    let mut mocks = Mocks::new();
    mocks
        .schedules
        .expect_insert()
        .times(1)
        .return_once(|_| Err(ScheduleRepositoryError::duplicate_period(3_u32, 2026)));

    let err = mocks
        .into_service(seeded())
        .create(Month::March, 2026)
        .await
        .expect_err("duplicate");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[case(ScheduleStatus::Draft, false)]
#[case(ScheduleStatus::Failed, false)]
#[case(ScheduleStatus::Generated, true)]
#[case(ScheduleStatus::Finalized, true)]
#[tokio::test]
async fn only_generated_schedules_finalize(#[case] status: ScheduleStatus, #[case] ok: bool) {
    let existing = schedule_with(status);
    let id = existing.id();
    let mut mocks = Mocks::new();
    mocks
        .schedules
        .expect_find_by_id()
        .returning(move |_| Ok(Some(existing.clone())));
    mocks.schedules.expect_save_status().returning(|_| Ok(true));

    let result = mocks.into_service(seeded()).finalize(&id).await;
    match result {
        Ok(schedule) => {
            assert!(ok, "{status} schedule should not finalize");
            assert!(schedule.is_finalized());
        }
        Err(err) => {
            assert!(!ok, "{status} schedule should finalize");
            assert_eq!(err.code(), ErrorCode::Conflict);
        }
    }
}

#[tokio::test]
async fn delete_reports_missing_schedule() {
    let mut mocks = Mocks::new();
    mocks
        .schedules
        .expect_find_by_id()
        .return_once(|_| Ok(None));
    mocks.schedules.expect_delete().times(0);

    let err = mocks
        .into_service(seeded())
        .delete(&ScheduleId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn export_renders_every_day() {
    let existing = schedule_with(ScheduleStatus::Generated);
    let id = existing.id();
    let ross = doctor("Ross", &[]);
    let shift = ShiftAssignment::new(
        id,
        ross.id(),
        NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date"),
    );
    let mut mocks = Mocks::new().with_doctors(vec![ross]);
    mocks
        .schedules
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(existing)));
    mocks
        .assignments
        .expect_list_by_schedule()
        .return_once(move |_| Ok(vec![shift]));

    let export = mocks
        .into_service(seeded())
        .export(&id)
        .await
        .expect("export");
    assert_eq!(export.filename, "rota-2026-02.csv");
    assert_eq!(export.csv.lines().count(), 29);
    assert!(export.csv.contains("2026-02-01,Sunday,X"));
}

#[tokio::test]
async fn shifts_of_unknown_schedule_are_not_found() {
    let mut mocks = Mocks::new();
    mocks
        .schedules
        .expect_find_by_id()
        .return_once(|_| Ok(None));
    mocks.assignments.expect_list_by_schedule().times(0);

    let err = mocks
        .into_service(seeded())
        .shifts(&ScheduleId::random())
        .await
        .expect_err("missing");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn generation_locks_serialise_one_period() {
    let locks = PeriodLocks::default();
    let held = locks.acquire(Month::May, 2026).await;

    let blocked =
        tokio::time::timeout(Duration::from_millis(50), locks.acquire(Month::May, 2026)).await;
    assert!(blocked.is_err(), "second holder must wait");

    let other = tokio::time::timeout(Duration::from_millis(50), locks.acquire(Month::June, 2026))
        .await;
    assert!(other.is_ok(), "other periods proceed");

    drop(held);
    let reacquired =
        tokio::time::timeout(Duration::from_millis(50), locks.acquire(Month::May, 2026)).await;
    assert!(reacquired.is_ok());
}

#[tokio::test]
async fn finalize_rechecks_status_after_waiting_for_the_period() {
    use crate::outbound::memory::InMemoryRotaStore;

    let store = Arc::new(InMemoryRotaStore::new());
    let existing = schedule_with(ScheduleStatus::Generated);
    let id = existing.id();
    ScheduleRepository::insert(store.as_ref(), &existing)
        .await
        .expect("schedule stored");
    let service = Arc::new(ScheduleService::new(
        ScheduleStores {
            schedules: store.clone(),
            doctors: store.clone(),
            bounds: store.clone(),
            assignments: store.clone(),
        },
        fixture_clock(),
        seeded(),
    ));

    let held = service.locks.acquire(Month::February, 2026).await;
    let pending = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.finalize(&id).await }
    });
    tokio::task::yield_now().await;
    let mut failed = existing.clone();
    failed.transition(ScheduleStatus::Failed, fixture_now());
    assert!(store.save_status(&failed).await.expect("status stored"));
    drop(held);

    let err = pending
        .await
        .expect("finalize task joins")
        .expect_err("failed schedule stays unfinalized");
    assert_eq!(err.code(), ErrorCode::Conflict);
    let stored = ScheduleRepository::find_by_id(store.as_ref(), &id)
        .await
        .expect("lookup")
        .expect("schedule present");
    assert_eq!(stored.status(), ScheduleStatus::Failed);
}
