//! Monthly schedule aggregate and its lifecycle.
//!
//! A schedule is keyed by its `(month, year)` period, which never changes
//! after creation. Status moves `Draft → Generated | Failed` with every
//! generation attempt and ends at `Finalized`, which locks the roster.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::calendar::{Month, days_of};
use super::identifiers::define_uuid_id;

define_uuid_id! {
    /// Server-assigned schedule identifier.
    ScheduleId
}

/// Lifecycle state of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleStatus {
    Draft,
    Generated,
    Failed,
    Finalized,
}

impl ScheduleStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Generated => "generated",
            Self::Failed => "failed",
            Self::Finalized => "finalized",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a stored status string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown schedule status: {0}")]
pub struct UnknownScheduleStatus(pub String);

impl FromStr for ScheduleStatus {
    type Err = UnknownScheduleStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "generated" => Ok(Self::Generated),
            "failed" => Ok(Self::Failed),
            "finalized" => Ok(Self::Finalized),
            other => Err(UnknownScheduleStatus(other.to_owned())),
        }
    }
}

/// A schedule for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    id: ScheduleId,
    month: Month,
    year: i32,
    status: ScheduleStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored fields used to rebuild a [`Schedule`].
#[derive(Debug, Clone)]
pub struct ScheduleRecord {
    pub id: ScheduleId,
    pub month: Month,
    pub year: i32,
    pub status: ScheduleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    /// Start a new draft schedule for the given period.
    pub fn draft(id: ScheduleId, month: Month, year: i32, now: DateTime<Utc>) -> Self {
        Self {
            id,
            month,
            year,
            status: ScheduleStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> ScheduleId {
        self.id
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn status(&self) -> ScheduleStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.status, ScheduleStatus::Finalized)
    }

    /// Day numbers of the schedule's month.
    pub fn days(&self) -> Vec<u32> {
        days_of(self.month, self.year)
    }

    /// Move to `status`, stamping `now` as the update time.
    pub fn transition(&mut self, status: ScheduleStatus, now: DateTime<Utc>) {
        self.status = status;
        self.updated_at = now;
    }
}

/// Optional period narrowing for schedule history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScheduleFilter {
    pub month: Option<Month>,
    pub year: Option<i32>,
}

impl ScheduleFilter {
    pub fn matches(&self, schedule: &Schedule) -> bool {
        self.month.is_none_or(|month| month == schedule.month)
            && self.year.is_none_or(|year| year == schedule.year)
    }
}

impl From<ScheduleRecord> for Schedule {
    fn from(value: ScheduleRecord) -> Self {
        Self {
            id: value.id,
            month: value.month,
            year: value.year,
            status: value.status,
            created_at: value.created_at,
            updated_at: value.updated_at,
        }
    }
}
