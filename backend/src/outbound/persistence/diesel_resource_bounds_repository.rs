//! PostgreSQL-backed `ResourceBoundsRepository` implementation using Diesel ORM.
//!
//! Only days that were explicitly set are stored; the service fills the rest
//! with defaults. Writes upsert on `(schedule_id, day)`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ResourceBoundsRepository, ResourceBoundsRepositoryError};
use crate::domain::{ScheduleId, StaffBound};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::ResourceBoundRow;
use super::pool::{DbPool, PoolError};
use super::schema::resource_bounds;

/// Diesel-backed implementation of the resource bounds repository port.
#[derive(Clone)]
pub struct DieselResourceBoundsRepository {
    pool: DbPool,
}

impl DieselResourceBoundsRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ResourceBoundsRepositoryError {
    map_basic_pool_error(error, ResourceBoundsRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ResourceBoundsRepositoryError {
    map_basic_diesel_error(
        error,
        ResourceBoundsRepositoryError::query,
        ResourceBoundsRepositoryError::connection,
    )
}

fn to_column(value: u32, field: &str) -> Result<i32, ResourceBoundsRepositoryError> {
    i32::try_from(value)
        .map_err(|_| ResourceBoundsRepositoryError::query(format!("{field} {value} out of range")))
}

fn bound_to_row(
    schedule_id: &ScheduleId,
    bound: &StaffBound,
) -> Result<ResourceBoundRow, ResourceBoundsRepositoryError> {
    let day = i16::try_from(bound.day()).map_err(|_| {
        ResourceBoundsRepositoryError::query(format!("day {} out of range", bound.day()))
    })?;
    Ok(ResourceBoundRow {
        schedule_id: *schedule_id.as_uuid(),
        day,
        min_staff: to_column(bound.min_staff(), "min_staff")?,
        max_staff: to_column(bound.max_staff(), "max_staff")?,
    })
}

/// Convert a stored row back into a bound.
///
/// Stored values are only range-checked here; the service re-clamps them
/// against the current doctor count.
fn row_to_bound(row: ResourceBoundRow) -> Result<StaffBound, ResourceBoundsRepositoryError> {
    let corrupt = || {
        ResourceBoundsRepositoryError::query(format!(
            "stored bound for day {} is out of range",
            row.day
        ))
    };
    let day = u32::try_from(row.day).map_err(|_| corrupt())?;
    let min_staff = u32::try_from(row.min_staff).map_err(|_| corrupt())?;
    let max_staff = u32::try_from(row.max_staff).map_err(|_| corrupt())?;
    Ok(StaffBound::clamped(day, min_staff, max_staff, usize::MAX))
}

#[async_trait]
impl ResourceBoundsRepository for DieselResourceBoundsRepository {
    async fn list(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Vec<StaffBound>, ResourceBoundsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ResourceBoundRow> = resource_bounds::table
            .filter(resource_bounds::schedule_id.eq(schedule_id.as_uuid()))
            .order(resource_bounds::day.asc())
            .select(ResourceBoundRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_bound).collect()
    }

    async fn upsert(
        &self,
        schedule_id: &ScheduleId,
        bounds: &[StaffBound],
    ) -> Result<(), ResourceBoundsRepositoryError> {
        if bounds.is_empty() {
            return Ok(());
        }
        let rows = bounds
            .iter()
            .map(|bound| bound_to_row(schedule_id, bound))
            .collect::<Result<Vec<_>, _>>()?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::insert_into(resource_bounds::table)
            .values(&rows)
            .on_conflict((resource_bounds::schedule_id, resource_bounds::day))
            .do_update()
            .set((
                resource_bounds::min_staff.eq(excluded(resource_bounds::min_staff)),
                resource_bounds::max_staff.eq(excluded(resource_bounds::max_staff)),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
