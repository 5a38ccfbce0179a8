//! Driving port for editing per-day staffing bounds.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{Error, ScheduleId, StaffBound};

/// Requested bounds for one day, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsRequest {
    pub day: u32,
    pub min_staff: u32,
    pub max_staff: u32,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceBoundsCommand: Send + Sync {
    /// Effective bounds for every day of the schedule's month.
    async fn list(&self, schedule_id: &ScheduleId) -> Result<Vec<StaffBound>, Error>;

    async fn get_bounds(&self, schedule_id: &ScheduleId, day: u32) -> Result<StaffBound, Error>;

    /// Store one day's bounds, clamped into the valid region.
    async fn set_bounds(
        &self,
        schedule_id: &ScheduleId,
        request: BoundsRequest,
    ) -> Result<StaffBound, Error>;

    /// Store several days at once; returns the full table afterwards.
    async fn set_all(
        &self,
        schedule_id: &ScheduleId,
        requests: Vec<BoundsRequest>,
    ) -> Result<Vec<StaffBound>, Error>;
}
