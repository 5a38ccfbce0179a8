//! Port for generated shift assignments.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{DoctorId, Schedule, ScheduleId, ShiftAssignment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by shift assignment repository adapters.
    pub enum ShiftAssignmentRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "shift assignment repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "shift assignment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShiftAssignmentRepository: Send + Sync {
    /// Atomically swap a schedule's assignments for `assignments` and store
    /// the schedule's status and update time alongside them.
    ///
    /// Either every old row is removed, every new row stored and the status
    /// written, or nothing changes. A missing schedule is a `Query` error.
    async fn replace_for_schedule(
        &self,
        schedule: &Schedule,
        assignments: &[ShiftAssignment],
    ) -> Result<(), ShiftAssignmentRepositoryError>;

    /// Assignments of a schedule ordered by date.
    async fn list_by_schedule(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Vec<ShiftAssignment>, ShiftAssignmentRepositoryError>;

    async fn find_by_doctor_and_date(
        &self,
        doctor_id: &DoctorId,
        date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, ShiftAssignmentRepositoryError>;

    /// Every assignment of a doctor across schedules, ordered by date.
    async fn list_by_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<ShiftAssignment>, ShiftAssignmentRepositoryError>;
}
