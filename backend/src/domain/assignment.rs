//! Committed doctor-to-date pairings produced by roster generation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::identifiers::define_uuid_id;
use super::{DoctorId, ScheduleId};

define_uuid_id! {
    /// Identifier of a single shift assignment.
    ShiftAssignmentId
}

/// "This doctor works this date" within one schedule.
///
/// Assignments are read-only to clients; only generation creates them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftAssignment {
    pub id: ShiftAssignmentId,
    pub schedule_id: ScheduleId,
    pub doctor_id: DoctorId,
    pub date: NaiveDate,
}

impl ShiftAssignment {
    /// Create an assignment with a fresh identifier.
    pub fn new(schedule_id: ScheduleId, doctor_id: DoctorId, date: NaiveDate) -> Self {
        Self {
            id: ShiftAssignmentId::random(),
            schedule_id,
            doctor_id,
            date,
        }
    }
}
