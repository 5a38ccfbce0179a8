//! PostgreSQL-backed `DoctorRepository` implementation using Diesel ORM.
//!
//! Doctors live in `doctors`, their days off in `doctor_days_off`. Writes that
//! touch both tables run in one transaction. Name uniqueness is enforced by
//! the `name_key` constraint and surfaces as
//! [`DoctorRepositoryError::DuplicateName`].

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use uuid::Uuid;

use crate::domain::ports::{DoctorRepository, DoctorRepositoryError};
use crate::domain::{Doctor, DoctorId, DoctorName};

use super::diesel_basic_error_mapping::{map_basic_pool_error, map_unique_diesel_error};
use super::models::{DayOffRow, DoctorRow, DoctorUpdate, NewDoctorRow};
use super::pool::{DbPool, PoolError};
use super::schema::{doctor_days_off, doctors};

/// Diesel-backed implementation of the doctor repository port.
#[derive(Clone)]
pub struct DieselDoctorRepository {
    pool: DbPool,
}

impl DieselDoctorRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DoctorRepositoryError {
    map_basic_pool_error(error, DoctorRepositoryError::connection)
}

/// Map Diesel errors, reporting unique violations against `name`.
fn map_diesel_error(error: diesel::result::Error, name: &DoctorName) -> DoctorRepositoryError {
    map_unique_diesel_error(
        error,
        DoctorRepositoryError::query,
        DoctorRepositoryError::connection,
        || DoctorRepositoryError::duplicate_name(name.to_string()),
    )
}

fn map_read_error(error: diesel::result::Error) -> DoctorRepositoryError {
    map_unique_diesel_error(
        error,
        DoctorRepositoryError::query,
        DoctorRepositoryError::connection,
        || DoctorRepositoryError::query("unexpected unique violation"),
    )
}

/// Convert a row and its days off into a domain doctor.
fn row_to_doctor(
    row: DoctorRow,
    days_off: Vec<NaiveDate>,
) -> Result<Doctor, DoctorRepositoryError> {
    let name = DoctorName::new(&row.name)
        .map_err(|err| DoctorRepositoryError::query(format!("stored doctor name: {err}")))?;
    Ok(Doctor::new(
        DoctorId::from_uuid(row.id),
        name,
        days_off.into_iter().collect(),
    ))
}

fn day_off_rows(doctor: &Doctor) -> Vec<DayOffRow> {
    let doctor_id = *doctor.id().as_uuid();
    doctor
        .days_off()
        .iter()
        .map(|day_off| DayOffRow {
            doctor_id,
            day_off: *day_off,
        })
        .collect()
}

#[async_trait]
impl DoctorRepository for DieselDoctorRepository {
    async fn list(&self) -> Result<Vec<Doctor>, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<DoctorRow> = doctors::table
            .order((doctors::name_key.asc(), doctors::id.asc()))
            .select(DoctorRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;
        let day_rows: Vec<DayOffRow> = doctor_days_off::table
            .order((doctor_days_off::doctor_id, doctor_days_off::day_off))
            .select(DayOffRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        let mut days_by_doctor: HashMap<Uuid, Vec<NaiveDate>> = HashMap::new();
        for row in day_rows {
            days_by_doctor
                .entry(row.doctor_id)
                .or_default()
                .push(row.day_off);
        }

        rows.into_iter()
            .map(|row| {
                let days_off = days_by_doctor.remove(&row.id).unwrap_or_default();
                row_to_doctor(row, days_off)
            })
            .collect()
    }

    async fn find_by_id(&self, id: &DoctorId) -> Result<Option<Doctor>, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<DoctorRow> = doctors::table
            .filter(doctors::id.eq(id.as_uuid()))
            .select(DoctorRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_read_error)?;
        let Some(row) = row else {
            return Ok(None);
        };

        let days_off: Vec<NaiveDate> = doctor_days_off::table
            .filter(doctor_days_off::doctor_id.eq(id.as_uuid()))
            .order(doctor_days_off::day_off)
            .select(doctor_days_off::day_off)
            .load(&mut conn)
            .await
            .map_err(map_read_error)?;

        row_to_doctor(row, days_off).map(Some)
    }

    async fn insert(&self, doctor: &Doctor) -> Result<(), DoctorRepositoryError> {
        let name_key = doctor.name().normalized();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewDoctorRow {
            id: *doctor.id().as_uuid(),
            name: doctor.name().as_ref(),
            name_key: &name_key,
        };
        let days = day_off_rows(doctor);

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(doctors::table)
                    .values(&new_row)
                    .execute(conn)
                    .await?;
                if !days.is_empty() {
                    diesel::insert_into(doctor_days_off::table)
                        .values(&days)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(())
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, doctor.name()))
    }

    async fn update(&self, doctor: &Doctor) -> Result<bool, DoctorRepositoryError> {
        let doctor_id = *doctor.id().as_uuid();
        let name_key = doctor.name().normalized();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = DoctorUpdate {
            name: doctor.name().as_ref(),
            name_key: &name_key,
        };
        let days = day_off_rows(doctor);

        conn.transaction(|conn| {
            async move {
                let updated = diesel::update(doctors::table.filter(doctors::id.eq(doctor_id)))
                    .set(&changes)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                diesel::delete(
                    doctor_days_off::table.filter(doctor_days_off::doctor_id.eq(doctor_id)),
                )
                .execute(conn)
                .await?;
                if !days.is_empty() {
                    diesel::insert_into(doctor_days_off::table)
                        .values(&days)
                        .execute(conn)
                        .await?;
                }
                Ok::<_, diesel::result::Error>(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(|err| map_diesel_error(err, doctor.name()))
    }

    async fn delete(&self, id: &DoctorId) -> Result<bool, DoctorRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Days off and shift assignments go with the doctor via ON DELETE CASCADE.
        let removed = diesel::delete(doctors::table.filter(doctors::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_read_error)?;
        Ok(removed > 0)
    }
}
