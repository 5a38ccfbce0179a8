//! PostgreSQL-backed `ScheduleRepository` implementation using Diesel ORM.
//!
//! The `(month, year)` unique constraint guarantees one schedule per period;
//! a violation surfaces as [`ScheduleRepositoryError::DuplicatePeriod`].
//! Deleting a schedule cascades to its bounds and assignments.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ScheduleRepository, ScheduleRepositoryError};
use crate::domain::{
    Month, Schedule, ScheduleFilter, ScheduleId, ScheduleRecord, ScheduleStatus,
};

use super::diesel_basic_error_mapping::{map_basic_pool_error, map_unique_diesel_error};
use super::models::{ScheduleRow, ScheduleStatusUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::schedules;

/// Diesel-backed implementation of the schedule repository port.
#[derive(Clone)]
pub struct DieselScheduleRepository {
    pool: DbPool,
}

impl DieselScheduleRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScheduleRepositoryError {
    map_basic_pool_error(error, ScheduleRepositoryError::connection)
}

/// Map Diesel errors, reporting unique violations against `schedule`'s period.
fn map_insert_error(error: diesel::result::Error, schedule: &Schedule) -> ScheduleRepositoryError {
    map_unique_diesel_error(
        error,
        ScheduleRepositoryError::query,
        ScheduleRepositoryError::connection,
        || ScheduleRepositoryError::duplicate_period(schedule.month().number(), schedule.year()),
    )
}

fn map_diesel_error(error: diesel::result::Error) -> ScheduleRepositoryError {
    map_unique_diesel_error(
        error,
        ScheduleRepositoryError::query,
        ScheduleRepositoryError::connection,
        || ScheduleRepositoryError::query("unexpected unique violation"),
    )
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "month numbers are always 1 to 12"
)]
fn month_column(month: Month) -> i16 {
    month.number() as i16
}

fn schedule_to_row(schedule: &Schedule) -> ScheduleRow {
    ScheduleRow {
        id: *schedule.id().as_uuid(),
        month: month_column(schedule.month()),
        year: schedule.year(),
        status: schedule.status().as_str().to_owned(),
        created_at: schedule.created_at(),
        updated_at: schedule.updated_at(),
    }
}

/// Convert a database row into a domain schedule, rejecting corrupt values.
fn row_to_schedule(row: ScheduleRow) -> Result<Schedule, ScheduleRepositoryError> {
    let ScheduleRow {
        id,
        month,
        year,
        status,
        created_at,
        updated_at,
    } = row;

    let month = u32::try_from(month)
        .map_err(|_| ScheduleRepositoryError::query(format!("stored month {month}")))
        .and_then(|index| {
            Month::from_index(index)
                .map_err(|err| ScheduleRepositoryError::query(format!("stored month: {err}")))
        })?;
    let status = status
        .parse::<ScheduleStatus>()
        .map_err(|err| ScheduleRepositoryError::query(format!("stored status: {err}")))?;

    Ok(ScheduleRecord {
        id: ScheduleId::from_uuid(id),
        month,
        year,
        status,
        created_at,
        updated_at,
    }
    .into())
}

#[async_trait]
impl ScheduleRepository for DieselScheduleRepository {
    async fn insert(&self, schedule: &Schedule) -> Result<(), ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = schedule_to_row(schedule);

        diesel::insert_into(schedules::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, schedule))?;
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ScheduleId,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ScheduleRow> = schedules::table
            .filter(schedules::id.eq(id.as_uuid()))
            .select(ScheduleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_schedule).transpose()
    }

    async fn find_by_period(
        &self,
        month: Month,
        year: i32,
    ) -> Result<Option<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ScheduleRow> = schedules::table
            .filter(schedules::month.eq(month_column(month)))
            .filter(schedules::year.eq(year))
            .select(ScheduleRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_schedule).transpose()
    }

    async fn list(&self, filter: ScheduleFilter) -> Result<Vec<Schedule>, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let mut query = schedules::table.into_boxed();
        if let Some(month) = filter.month {
            query = query.filter(schedules::month.eq(month_column(month)));
        }
        if let Some(year) = filter.year {
            query = query.filter(schedules::year.eq(year));
        }
        let rows: Vec<ScheduleRow> = query
            .order((schedules::year.desc(), schedules::month.desc()))
            .select(ScheduleRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_schedule).collect()
    }

    async fn save_status(&self, schedule: &Schedule) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = ScheduleStatusUpdate {
            status: schedule.status().as_str(),
            updated_at: schedule.updated_at(),
        };

        let updated =
            diesel::update(schedules::table.filter(schedules::id.eq(schedule.id().as_uuid())))
                .set(&changes)
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        Ok(updated > 0)
    }

    async fn delete(&self, id: &ScheduleId) -> Result<bool, ScheduleRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(schedules::table.filter(schedules::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}
