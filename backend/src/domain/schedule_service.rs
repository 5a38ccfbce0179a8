//! Schedule lifecycle service implementing [`ScheduleCommand`] and
//! [`ScheduleQuery`].
//!
//! Every write to a period (generation, finalize, delete, bounds edits) is
//! serialised through [`PeriodLocks`]; the solver itself runs on the blocking
//! pool and its wait is bounded by the configured time budget. Assignments
//! and the `generated` status are stored together after a successful run, so
//! a failed attempt leaves the previous roster untouched.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use mockable::Clock;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};

use crate::domain::ports::{
    BoundsRequest, DoctorRepository, GenerateScheduleRequest, GeneratedSchedule,
    ResourceBoundsRepository, ScheduleCommand, ScheduleQuery, ScheduleRepository,
    ScheduleRepositoryError, ShiftAssignmentRepository,
};
use crate::domain::rota_service_support::{
    effective_bounds, ensure_editable, map_assignment_repository_error,
    map_bounds_repository_error, map_doctor_repository_error, map_schedule_repository_error,
    require_schedule, validate_year,
};
use crate::domain::{
    DoctorId, Error, GenerationInput, GeneratorOptions, Month, ResourceBounds, Schedule,
    ScheduleExport, ScheduleFilter, ScheduleGenerator, ScheduleId, ScheduleStatus, SchedulingError,
    ShiftAssignment, render_csv,
};

/// Extra wait granted on top of the solver budget before giving up on it.
const WAIT_GRACE: Duration = Duration::from_millis(500);

/// Repositories the schedule service reads and writes.
pub struct ScheduleStores<S, D, B, A> {
    pub schedules: Arc<S>,
    pub doctors: Arc<D>,
    pub bounds: Arc<B>,
    pub assignments: Arc<A>,
}

/// One async mutex per `(month, year)` period.
///
/// Share one instance between the services that write to schedules.
#[derive(Debug, Default)]
pub struct PeriodLocks {
    slots: Mutex<HashMap<(Month, i32), Arc<tokio::sync::Mutex<()>>>>,
}

impl PeriodLocks {
    /// Wait until no other task holds the period's lock.
    pub async fn acquire(&self, month: Month, year: i32) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry((month, year)).or_default())
        };
        slot.lock_owned().await
    }
}

/// Schedule service backing the schedule command and query ports.
#[derive(Clone)]
pub struct ScheduleService<S, D, B, A> {
    schedules: Arc<S>,
    doctors: Arc<D>,
    bounds: Arc<B>,
    assignments: Arc<A>,
    clock: Arc<dyn Clock>,
    generator: ScheduleGenerator,
    locks: Arc<PeriodLocks>,
}

impl<S, D, B, A> ScheduleService<S, D, B, A> {
    pub fn new(
        stores: ScheduleStores<S, D, B, A>,
        clock: Arc<dyn Clock>,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            schedules: stores.schedules,
            doctors: stores.doctors,
            bounds: stores.bounds,
            assignments: stores.assignments,
            clock,
            generator: ScheduleGenerator::new(options),
            locks: Arc::new(PeriodLocks::default()),
        }
    }

    /// Serialise period writes with other services holding `locks`.
    #[must_use]
    pub fn with_period_locks(mut self, locks: Arc<PeriodLocks>) -> Self {
        self.locks = locks;
        self
    }
}

impl<S, D, B, A> ScheduleService<S, D, B, A>
where
    S: ScheduleRepository,
    D: DoctorRepository,
    B: ResourceBoundsRepository,
    A: ShiftAssignmentRepository,
{
    async fn find_or_create(
        &self,
        month: Month,
        year: i32,
        now: DateTime<Utc>,
    ) -> Result<Schedule, Error> {
        if let Some(existing) = self
            .schedules
            .find_by_period(month, year)
            .await
            .map_err(map_schedule_repository_error)?
        {
            return Ok(existing);
        }

        let schedule = Schedule::draft(ScheduleId::random(), month, year, now);
        match self.schedules.insert(&schedule).await {
            Ok(()) => {
                info!(schedule_id = %schedule.id(), %month, year, "schedule created");
                Ok(schedule)
            }
            Err(err @ ScheduleRepositoryError::DuplicatePeriod { .. }) => self
                .schedules
                .find_by_period(month, year)
                .await
                .map_err(map_schedule_repository_error)?
                .ok_or_else(|| map_schedule_repository_error(err)),
            Err(err) => Err(map_schedule_repository_error(err)),
        }
    }

    async fn save_status(&self, schedule: &Schedule) -> Result<(), Error> {
        let saved = self
            .schedules
            .save_status(schedule)
            .await
            .map_err(map_schedule_repository_error)?;
        if saved {
            Ok(())
        } else {
            Err(SchedulingError::not_found("schedule", schedule.id()).into())
        }
    }

    async fn apply_bounds(
        &self,
        schedule_id: &ScheduleId,
        table: &mut ResourceBounds,
        requests: &[BoundsRequest],
    ) -> Result<(), Error> {
        let mut changed = Vec::with_capacity(requests.len());
        for request in requests {
            changed.push(table.set(request.day, request.min_staff, request.max_staff)?);
        }
        self.bounds
            .upsert(schedule_id, &changed)
            .await
            .map_err(map_bounds_repository_error)
    }

    async fn run_generator(&self, input: GenerationInput) -> Result<Vec<ShiftAssignment>, Error> {
        let generator = self.generator;
        let wait = generator.options().time_budget + WAIT_GRACE;
        let task = tokio::task::spawn_blocking(move || generator.generate(&input));
        match tokio::time::timeout(wait, task).await {
            Ok(Ok(result)) => result.map_err(|err| SchedulingError::from(err).into()),
            Ok(Err(join_error)) => Err(Error::internal(format!(
                "roster generation task failed: {join_error}"
            ))),
            Err(_) => Err(SchedulingError::GenerationTimeout.into()),
        }
    }
}

#[async_trait]
impl<S, D, B, A> ScheduleCommand for ScheduleService<S, D, B, A>
where
    S: ScheduleRepository,
    D: DoctorRepository,
    B: ResourceBoundsRepository,
    A: ShiftAssignmentRepository,
{
    async fn create(&self, month: Month, year: i32) -> Result<Schedule, Error> {
        let now = self.clock.utc();
        validate_year(year, now.year())?;
        let schedule = Schedule::draft(ScheduleId::random(), month, year, now);
        self.schedules
            .insert(&schedule)
            .await
            .map_err(map_schedule_repository_error)?;
        info!(schedule_id = %schedule.id(), %month, year, "schedule created");
        Ok(schedule)
    }

    async fn generate(&self, request: GenerateScheduleRequest) -> Result<GeneratedSchedule, Error> {
        let GenerateScheduleRequest {
            month,
            year,
            bounds,
        } = request;
        validate_year(year, self.clock.utc().year())?;

        let _guard = self.locks.acquire(month, year).await;
        let mut schedule = self.find_or_create(month, year, self.clock.utc()).await?;
        ensure_editable(&schedule)?;

        let doctors = self
            .doctors
            .list()
            .await
            .map_err(map_doctor_repository_error)?;
        let mut table = effective_bounds(self.bounds.as_ref(), &schedule, doctors.len()).await?;
        if let Some(requests) = bounds.as_deref() {
            self.apply_bounds(&schedule.id(), &mut table, requests).await?;
        }

        let doctor_count = doctors.len();
        let input = GenerationInput {
            schedule_id: schedule.id(),
            month,
            year,
            doctors,
            bounds: table,
        };
        let started = Instant::now();
        match self.run_generator(input).await {
            Ok(assignments) => {
                schedule.transition(ScheduleStatus::Generated, self.clock.utc());
                self.assignments
                    .replace_for_schedule(&schedule, &assignments)
                    .await
                    .map_err(map_assignment_repository_error)?;
                info!(
                    schedule_id = %schedule.id(),
                    doctors = doctor_count,
                    assignments = assignments.len(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "schedule generated"
                );
                Ok(GeneratedSchedule {
                    schedule,
                    assignments,
                })
            }
            Err(error) => {
                warn!(
                    schedule_id = %schedule.id(),
                    code = ?error.code(),
                    details = ?error.details(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "schedule generation failed"
                );
                schedule.transition(ScheduleStatus::Failed, self.clock.utc());
                if let Err(status_error) = self.save_status(&schedule).await {
                    warn!(
                        schedule_id = %schedule.id(),
                        error = %status_error,
                        "failed to record generation failure"
                    );
                }
                Err(error)
            }
        }
    }

    async fn finalize(&self, id: &ScheduleId) -> Result<Schedule, Error> {
        let period = require_schedule(self.schedules.as_ref(), id).await?;
        let _guard = self.locks.acquire(period.month(), period.year()).await;
        let mut schedule = require_schedule(self.schedules.as_ref(), id).await?;
        match schedule.status() {
            ScheduleStatus::Finalized => return Ok(schedule),
            ScheduleStatus::Generated => {}
            other => {
                return Err(SchedulingError::conflict(format!(
                    "a {other} schedule cannot be finalized"
                ))
                .into());
            }
        }
        schedule.transition(ScheduleStatus::Finalized, self.clock.utc());
        self.save_status(&schedule).await?;
        info!(schedule_id = %id, "schedule finalized");
        Ok(schedule)
    }

    async fn delete(&self, id: &ScheduleId) -> Result<(), Error> {
        let period = require_schedule(self.schedules.as_ref(), id).await?;
        let _guard = self.locks.acquire(period.month(), period.year()).await;
        let removed = self
            .schedules
            .delete(id)
            .await
            .map_err(map_schedule_repository_error)?;
        if !removed {
            return Err(SchedulingError::not_found("schedule", id).into());
        }
        info!(schedule_id = %id, "schedule deleted");
        Ok(())
    }
}

#[async_trait]
impl<S, D, B, A> ScheduleQuery for ScheduleService<S, D, B, A>
where
    S: ScheduleRepository,
    D: DoctorRepository,
    B: ResourceBoundsRepository,
    A: ShiftAssignmentRepository,
{
    async fn get(&self, id: &ScheduleId) -> Result<Schedule, Error> {
        require_schedule(self.schedules.as_ref(), id).await
    }

    async fn list(&self, filter: ScheduleFilter) -> Result<Vec<Schedule>, Error> {
        self.schedules
            .list(filter)
            .await
            .map_err(map_schedule_repository_error)
    }

    async fn shifts(&self, id: &ScheduleId) -> Result<Vec<ShiftAssignment>, Error> {
        require_schedule(self.schedules.as_ref(), id).await?;
        self.assignments
            .list_by_schedule(id)
            .await
            .map_err(map_assignment_repository_error)
    }

    async fn shift_for(
        &self,
        doctor_id: &DoctorId,
        date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, Error> {
        self.assignments
            .find_by_doctor_and_date(doctor_id, date)
            .await
            .map_err(map_assignment_repository_error)
    }

    async fn export(&self, id: &ScheduleId) -> Result<ScheduleExport, Error> {
        let schedule = require_schedule(self.schedules.as_ref(), id).await?;
        let doctors = self
            .doctors
            .list()
            .await
            .map_err(map_doctor_repository_error)?;
        let assignments = self
            .assignments
            .list_by_schedule(id)
            .await
            .map_err(map_assignment_repository_error)?;
        Ok(render_csv(&schedule, &doctors, &assignments)?)
    }
}

#[cfg(test)]
#[path = "schedule_service_tests.rs"]
mod tests;
