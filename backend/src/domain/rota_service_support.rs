//! Internal helpers shared by the rota services.

use crate::domain::ports::{
    DoctorRepositoryError, ResourceBoundsRepository, ResourceBoundsRepositoryError,
    ScheduleRepository, ScheduleRepositoryError, ShiftAssignmentRepositoryError,
};
use crate::domain::{Error, ResourceBounds, Schedule, ScheduleId, SchedulingError};

/// Oldest accepted schedule year, relative to the current year.
pub(crate) const YEARS_BACK: i32 = 1;
/// Furthest accepted schedule year, relative to the current year.
pub(crate) const YEARS_AHEAD: i32 = 10;

pub(crate) fn map_doctor_repository_error(error: DoctorRepositoryError) -> Error {
    match error {
        DoctorRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("doctor repository unavailable: {message}"))
        }
        DoctorRepositoryError::Query { message } => {
            Error::internal(format!("doctor repository error: {message}"))
        }
        DoctorRepositoryError::DuplicateName { name } => {
            SchedulingError::conflict(format!("a doctor named {name} already exists")).into()
        }
    }
}

pub(crate) fn map_schedule_repository_error(error: ScheduleRepositoryError) -> Error {
    match error {
        ScheduleRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("schedule repository unavailable: {message}"))
        }
        ScheduleRepositoryError::Query { message } => {
            Error::internal(format!("schedule repository error: {message}"))
        }
        ScheduleRepositoryError::DuplicatePeriod { month, year } => SchedulingError::conflict(
            format!("a schedule for {month:02}/{year} already exists"),
        )
        .into(),
    }
}

pub(crate) fn map_bounds_repository_error(error: ResourceBoundsRepositoryError) -> Error {
    match error {
        ResourceBoundsRepositoryError::Connection { message } => Error::service_unavailable(
            format!("resource bounds repository unavailable: {message}"),
        ),
        ResourceBoundsRepositoryError::Query { message } => {
            Error::internal(format!("resource bounds repository error: {message}"))
        }
    }
}

pub(crate) fn map_assignment_repository_error(error: ShiftAssignmentRepositoryError) -> Error {
    match error {
        ShiftAssignmentRepositoryError::Connection { message } => Error::service_unavailable(
            format!("shift assignment repository unavailable: {message}"),
        ),
        ShiftAssignmentRepositoryError::Query { message } => {
            Error::internal(format!("shift assignment repository error: {message}"))
        }
    }
}

/// Accept years in `[current - YEARS_BACK, current + YEARS_AHEAD]`.
pub(crate) fn validate_year(year: i32, current_year: i32) -> Result<(), SchedulingError> {
    let earliest = current_year - YEARS_BACK;
    let latest = current_year + YEARS_AHEAD;
    if (earliest..=latest).contains(&year) {
        Ok(())
    } else {
        Err(SchedulingError::validation(
            "year",
            format!("must be between {earliest} and {latest}"),
        ))
    }
}

/// Load a schedule or fail with `not_found`.
pub(crate) async fn require_schedule<S>(repo: &S, id: &ScheduleId) -> Result<Schedule, Error>
where
    S: ScheduleRepository + ?Sized,
{
    repo.find_by_id(id)
        .await
        .map_err(map_schedule_repository_error)?
        .ok_or_else(|| SchedulingError::not_found("schedule", id).into())
}

/// Reject edits to a finalized schedule.
pub(crate) fn ensure_editable(schedule: &Schedule) -> Result<(), Error> {
    if schedule.is_finalized() {
        Err(SchedulingError::conflict(format!("schedule {} is finalized", schedule.id())).into())
    } else {
        Ok(())
    }
}

/// Bounds table of `schedule` clamped against `doctor_count`.
pub(crate) async fn effective_bounds<B>(
    repo: &B,
    schedule: &Schedule,
    doctor_count: usize,
) -> Result<ResourceBounds, Error>
where
    B: ResourceBoundsRepository + ?Sized,
{
    let stored = repo
        .list(&schedule.id())
        .await
        .map_err(map_bounds_repository_error)?;
    Ok(ResourceBounds::from_entries(
        &schedule.days(),
        stored,
        doctor_count,
    ))
}
