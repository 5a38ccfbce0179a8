//! Resource bounds service implementing [`ResourceBoundsCommand`].
//!
//! Requested bounds are clamped against the current doctor count and never
//! rejected; only a day outside the schedule's month is an error. Writes hold
//! the schedule's [`PeriodLocks`] entry so they cannot interleave with
//! generation or finalize.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    BoundsRequest, DoctorRepository, ResourceBoundsCommand, ResourceBoundsRepository,
    ScheduleRepository,
};
use crate::domain::rota_service_support::{
    effective_bounds, ensure_editable, map_bounds_repository_error, map_doctor_repository_error,
    require_schedule,
};
use crate::domain::{
    Error, PeriodLocks, ResourceBounds, Schedule, ScheduleId, SchedulingError, StaffBound,
};

/// Per-day staffing bounds of a schedule.
#[derive(Clone)]
pub struct ResourceBoundsService<S, D, B> {
    schedules: Arc<S>,
    doctors: Arc<D>,
    bounds: Arc<B>,
    locks: Arc<PeriodLocks>,
}

impl<S, D, B> ResourceBoundsService<S, D, B> {
    pub fn new(schedules: Arc<S>, doctors: Arc<D>, bounds: Arc<B>) -> Self {
        Self {
            schedules,
            doctors,
            bounds,
            locks: Arc::new(PeriodLocks::default()),
        }
    }

    /// Share period locks with the schedule service.
    #[must_use]
    pub fn with_period_locks(mut self, locks: Arc<PeriodLocks>) -> Self {
        self.locks = locks;
        self
    }
}

impl<S, D, B> ResourceBoundsService<S, D, B>
where
    S: ScheduleRepository,
    D: DoctorRepository,
    B: ResourceBoundsRepository,
{
    async fn table(&self, schedule: &Schedule) -> Result<ResourceBounds, Error> {
        let doctor_count = self
            .doctors
            .list()
            .await
            .map_err(map_doctor_repository_error)?
            .len();
        effective_bounds(self.bounds.as_ref(), schedule, doctor_count).await
    }

    async fn write(
        &self,
        schedule_id: &ScheduleId,
        requests: &[BoundsRequest],
    ) -> Result<ResourceBounds, Error> {
        let period = require_schedule(self.schedules.as_ref(), schedule_id).await?;
        let _guard = self.locks.acquire(period.month(), period.year()).await;
        let schedule = require_schedule(self.schedules.as_ref(), schedule_id).await?;
        ensure_editable(&schedule)?;
        let mut table = self.table(&schedule).await?;
        let mut changed = Vec::with_capacity(requests.len());
        for request in requests {
            changed.push(table.set(request.day, request.min_staff, request.max_staff)?);
        }
        self.bounds
            .upsert(schedule_id, &changed)
            .await
            .map_err(map_bounds_repository_error)?;
        debug!(schedule_id = %schedule_id, days = changed.len(), "bounds stored");
        Ok(table)
    }
}

#[async_trait]
impl<S, D, B> ResourceBoundsCommand for ResourceBoundsService<S, D, B>
where
    S: ScheduleRepository,
    D: DoctorRepository,
    B: ResourceBoundsRepository,
{
    async fn list(&self, schedule_id: &ScheduleId) -> Result<Vec<StaffBound>, Error> {
        let schedule = require_schedule(self.schedules.as_ref(), schedule_id).await?;
        Ok(self.table(&schedule).await?.to_vec())
    }

    async fn get_bounds(&self, schedule_id: &ScheduleId, day: u32) -> Result<StaffBound, Error> {
        let schedule = require_schedule(self.schedules.as_ref(), schedule_id).await?;
        let reason = || format!("day {day} is outside the schedule's month");
        self.table(&schedule)
            .await?
            .get(day)
            .ok_or_else(|| SchedulingError::validation("day", reason()).into())
    }

    async fn set_bounds(
        &self,
        schedule_id: &ScheduleId,
        request: BoundsRequest,
    ) -> Result<StaffBound, Error> {
        let table = self.write(schedule_id, &[request]).await?;
        table
            .get(request.day)
            .ok_or_else(|| Error::internal("stored bound missing from table"))
    }

    async fn set_all(
        &self,
        schedule_id: &ScheduleId,
        requests: Vec<BoundsRequest>,
    ) -> Result<Vec<StaffBound>, Error> {
        Ok(self.write(schedule_id, &requests).await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockDoctorRepository, MockResourceBoundsRepository, MockScheduleRepository,
    };
    use crate::domain::{DaysOff, Doctor, DoctorId, DoctorName, ErrorCode, Month, ScheduleStatus};
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    type Service = ResourceBoundsService<
        MockScheduleRepository,
        MockDoctorRepository,
        MockResourceBoundsRepository,
    >;

    fn june(status: ScheduleStatus) -> Schedule {
        let now = Utc
            .with_ymd_and_hms(2026, 5, 1, 9, 0, 0)
            .single()
            .expect("valid timestamp");
        let mut schedule = Schedule::draft(ScheduleId::random(), Month::June, 2026, now);
        schedule.transition(status, now);
        schedule
    }

    fn doctors(count: usize) -> MockDoctorRepository {
        let roster: Vec<Doctor> = (0..count)
            .map(|index| {
                Doctor::new(
                    DoctorId::random(),
                    DoctorName::new(format!("Doctor {index}")).expect("valid name"),
                    DaysOff::default(),
                )
            })
            .collect();
        let mut repo = MockDoctorRepository::new();
        repo.expect_list().returning(move || Ok(roster.clone()));
        repo
    }

    fn schedules(schedule: Schedule) -> MockScheduleRepository {
        let mut repo = MockScheduleRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(schedule.clone())));
        repo
    }

    fn service(
        schedule: Schedule,
        doctor_count: usize,
        bounds: MockResourceBoundsRepository,
    ) -> Service {
        ResourceBoundsService::new(
            Arc::new(schedules(schedule)),
            Arc::new(doctors(doctor_count)),
            Arc::new(bounds),
        )
    }

    #[tokio::test]
    async fn set_bounds_clamps_min_above_max() {
        let schedule = june(ScheduleStatus::Draft);
        let id = schedule.id();
        let mut bounds = MockResourceBoundsRepository::new();
        bounds.expect_list().returning(|_| Ok(Vec::new()));
        bounds
            .expect_upsert()
            .withf(|_, stored: &[StaffBound]| {
                stored.len() == 1 && stored[0].min_staff() == 2 && stored[0].max_staff() == 2
            })
            .times(1)
            .return_once(|_, _| Ok(()));

        let stored = service(schedule, 4, bounds)
            .set_bounds(
                &id,
                BoundsRequest {
                    day: 3,
                    min_staff: 5,
                    max_staff: 2,
                },
            )
            .await
            .expect("clamped write");
        assert_eq!((stored.min_staff(), stored.max_staff()), (2, 2));
    }

    #[rstest]
    #[case(0)]
    #[case(31)]
    #[tokio::test]
    async fn days_outside_the_month_are_invalid(#[case] day: u32) {
        let schedule = june(ScheduleStatus::Draft);
        let id = schedule.id();
        let mut bounds = MockResourceBoundsRepository::new();
        bounds.expect_list().returning(|_| Ok(Vec::new()));
        bounds.expect_upsert().times(0);

        let err = service(schedule, 2, bounds)
            .set_bounds(
                &id,
                BoundsRequest {
                    day,
                    min_staff: 1,
                    max_staff: 1,
                },
            )
            .await
            .expect_err("out of month");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn finalized_schedules_refuse_edits() {
        let schedule = june(ScheduleStatus::Finalized);
        let id = schedule.id();
        let mut bounds = MockResourceBoundsRepository::new();
        bounds.expect_upsert().times(0);

        let err = service(schedule, 2, bounds)
            .set_all(&id, Vec::new())
            .await
            .expect_err("finalized");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn edits_waiting_on_a_finalize_see_the_finalized_status() {
        let schedule = june(ScheduleStatus::Generated);
        let id = schedule.id();
        let status = Arc::new(std::sync::Mutex::new(ScheduleStatus::Generated));
        let seen = Arc::clone(&status);
        let mut repo = MockScheduleRepository::new();
        repo.expect_find_by_id().returning(move |_| {
            let mut current = schedule.clone();
            let now = current.updated_at();
            current.transition(*seen.lock().expect("status lock"), now);
            Ok(Some(current))
        });
        let mut bounds = MockResourceBoundsRepository::new();
        bounds.expect_list().returning(|_| Ok(Vec::new()));
        bounds.expect_upsert().times(0);
        let locks = Arc::new(PeriodLocks::default());
        let service = Arc::new(
            ResourceBoundsService::new(Arc::new(repo), Arc::new(doctors(2)), Arc::new(bounds))
                .with_period_locks(Arc::clone(&locks)),
        );

        let held = locks.acquire(Month::June, 2026).await;
        let pending = tokio::spawn({
            let service = Arc::clone(&service);
            async move { service.set_all(&id, Vec::new()).await }
        });
        tokio::task::yield_now().await;
        *status.lock().expect("status lock") = ScheduleStatus::Finalized;
        drop(held);

        let err = pending
            .await
            .expect("edit task joins")
            .expect_err("finalized while waiting");
        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn list_reclamps_stored_bounds_for_fewer_doctors() {
        let schedule = june(ScheduleStatus::Generated);
        let id = schedule.id();
        let mut bounds = MockResourceBoundsRepository::new();
        bounds
            .expect_list()
            .returning(|_| Ok(vec![StaffBound::clamped(1, 4, 4, 4)]));

        let table = service(schedule, 2, bounds).list(&id).await.expect("table");
        assert_eq!(table.len(), 30);
        assert_eq!((table[0].min_staff(), table[0].max_staff()), (2, 2));
        assert_eq!((table[1].min_staff(), table[1].max_staff()), (1, 2));
    }

    #[tokio::test]
    async fn get_bounds_for_unknown_schedule_is_not_found() {
        let mut schedules = MockScheduleRepository::new();
        schedules.expect_find_by_id().return_once(|_| Ok(None));
        let service = ResourceBoundsService::new(
            Arc::new(schedules),
            Arc::new(MockDoctorRepository::new()),
            Arc::new(MockResourceBoundsRepository::new()),
        );

        let err = service
            .get_bounds(&ScheduleId::random(), 1)
            .await
            .expect_err("missing schedule");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
