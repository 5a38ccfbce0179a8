//! Driving port for reading schedules and their rosters.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{
    DoctorId, Error, Schedule, ScheduleExport, ScheduleFilter, ScheduleId, ShiftAssignment,
};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleQuery: Send + Sync {
    async fn get(&self, id: &ScheduleId) -> Result<Schedule, Error>;

    /// Schedule history, newest period first, narrowed by `filter`.
    async fn list(&self, filter: ScheduleFilter) -> Result<Vec<Schedule>, Error>;

    async fn shifts(&self, id: &ScheduleId) -> Result<Vec<ShiftAssignment>, Error>;

    /// The doctor's assignment on `date`, if any.
    async fn shift_for(
        &self,
        doctor_id: &DoctorId,
        date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, Error>;

    /// Day × doctor CSV grid of a schedule.
    async fn export(&self, id: &ScheduleId) -> Result<ScheduleExport, Error>;
}
