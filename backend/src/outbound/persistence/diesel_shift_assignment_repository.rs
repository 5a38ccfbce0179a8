//! PostgreSQL-backed `ShiftAssignmentRepository` implementation using Diesel ORM.
//!
//! Regeneration swaps a schedule's assignments and writes its status inside
//! one transaction, so readers never observe a half-written roster or a
//! roster whose status disagrees with it.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};

use crate::domain::ports::{ShiftAssignmentRepository, ShiftAssignmentRepositoryError};
use crate::domain::{DoctorId, Schedule, ScheduleId, ShiftAssignment, ShiftAssignmentId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{ScheduleStatusUpdate, ShiftAssignmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{schedules, shift_assignments};

/// Diesel-backed implementation of the shift assignment repository port.
#[derive(Clone)]
pub struct DieselShiftAssignmentRepository {
    pool: DbPool,
}

impl DieselShiftAssignmentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ShiftAssignmentRepositoryError {
    map_basic_pool_error(error, ShiftAssignmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ShiftAssignmentRepositoryError {
    map_basic_diesel_error(
        error,
        ShiftAssignmentRepositoryError::query,
        ShiftAssignmentRepositoryError::connection,
    )
}

impl From<&ShiftAssignment> for ShiftAssignmentRow {
    fn from(assignment: &ShiftAssignment) -> Self {
        Self {
            id: *assignment.id.as_uuid(),
            schedule_id: *assignment.schedule_id.as_uuid(),
            doctor_id: *assignment.doctor_id.as_uuid(),
            shift_date: assignment.date,
        }
    }
}

impl From<ShiftAssignmentRow> for ShiftAssignment {
    fn from(row: ShiftAssignmentRow) -> Self {
        Self {
            id: ShiftAssignmentId::from_uuid(row.id),
            schedule_id: ScheduleId::from_uuid(row.schedule_id),
            doctor_id: DoctorId::from_uuid(row.doctor_id),
            date: row.shift_date,
        }
    }
}

#[async_trait]
impl ShiftAssignmentRepository for DieselShiftAssignmentRepository {
    async fn replace_for_schedule(
        &self,
        schedule: &Schedule,
        assignments: &[ShiftAssignment],
    ) -> Result<(), ShiftAssignmentRepositoryError> {
        let schedule_uuid = *schedule.id().as_uuid();
        let status = ScheduleStatusUpdate {
            status: schedule.status().as_str(),
            updated_at: schedule.updated_at(),
        };
        let rows: Vec<ShiftAssignmentRow> = assignments.iter().map(Into::into).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        conn.transaction(|conn| {
            async move {
                let updated =
                    diesel::update(schedules::table.filter(schedules::id.eq(schedule_uuid)))
                        .set(&status)
                        .execute(conn)
                        .await?;
                if updated == 0 {
                    return Err(diesel::result::Error::NotFound);
                }
                diesel::delete(
                    shift_assignments::table
                        .filter(shift_assignments::schedule_id.eq(schedule_uuid)),
                )
                .execute(conn)
                .await?;
                if !rows.is_empty() {
                    diesel::insert_into(shift_assignments::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_by_schedule(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Vec<ShiftAssignment>, ShiftAssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ShiftAssignmentRow> = shift_assignments::table
            .filter(shift_assignments::schedule_id.eq(schedule_id.as_uuid()))
            .order((shift_assignments::shift_date.asc(), shift_assignments::doctor_id.asc()))
            .select(ShiftAssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_by_doctor_and_date(
        &self,
        doctor_id: &DoctorId,
        date: NaiveDate,
    ) -> Result<Option<ShiftAssignment>, ShiftAssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ShiftAssignmentRow> = shift_assignments::table
            .filter(shift_assignments::doctor_id.eq(doctor_id.as_uuid()))
            .filter(shift_assignments::shift_date.eq(date))
            .select(ShiftAssignmentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_by_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<ShiftAssignment>, ShiftAssignmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ShiftAssignmentRow> = shift_assignments::table
            .filter(shift_assignments::doctor_id.eq(doctor_id.as_uuid()))
            .order(shift_assignments::shift_date.asc())
            .select(ShiftAssignmentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
