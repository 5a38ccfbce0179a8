//! Driving port for schedule lifecycle mutations.

use async_trait::async_trait;

use crate::domain::{Error, Month, Schedule, ScheduleId, ShiftAssignment};

use super::BoundsRequest;

/// Request to (re)generate the roster of a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateScheduleRequest {
    pub month: Month,
    pub year: i32,
    /// Bounds stored before generating; omitted days keep their values.
    pub bounds: Option<Vec<BoundsRequest>>,
}

/// Outcome of a successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSchedule {
    pub schedule: Schedule,
    pub assignments: Vec<ShiftAssignment>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScheduleCommand: Send + Sync {
    /// Create an empty draft for a period that has no schedule yet.
    async fn create(&self, month: Month, year: i32) -> Result<Schedule, Error>;

    /// Run the generator and replace the period's assignments.
    ///
    /// Creates the schedule when the period has none. Nothing is persisted
    /// when generation fails apart from the `failed` status.
    async fn generate(&self, request: GenerateScheduleRequest) -> Result<GeneratedSchedule, Error>;

    /// Lock a schedule against regeneration and bounds edits.
    async fn finalize(&self, id: &ScheduleId) -> Result<Schedule, Error>;

    async fn delete(&self, id: &ScheduleId) -> Result<(), Error>;
}
