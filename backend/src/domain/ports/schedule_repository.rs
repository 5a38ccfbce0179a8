//! Port for schedule persistence.

use async_trait::async_trait;

use crate::domain::{Month, Schedule, ScheduleFilter, ScheduleId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by schedule repository adapters.
    pub enum ScheduleRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "schedule repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "schedule repository query failed: {message}",
        /// A schedule for this period already exists.
        DuplicatePeriod { month: u32, year: i32 } =>
            "a schedule for {month:02}/{year} already exists",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError>;

    async fn find_by_id(
        &self,
        id: &ScheduleId,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError>;

    async fn find_by_period(
        &self,
        month: Month,
        year: i32,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError>;

    /// Schedules matching `filter`, newest period first.
    async fn list(&self, filter: ScheduleFilter) -> Result<Vec<Schedule>, ScheduleRepositoryError>;

    /// Persist status and `updated_at`. Returns `false` when the schedule is gone.
    async fn save_status(&self, schedule: &Schedule) -> Result<bool, ScheduleRepositoryError>;

    /// Remove a schedule with its bounds and assignments.
    async fn delete(&self, id: &ScheduleId) -> Result<bool, ScheduleRepositoryError>;
}
