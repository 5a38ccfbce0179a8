//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live in the
//! repositories, where failures can be mapped to the right port error.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{doctor_days_off, doctors, resource_bounds, schedules, shift_assignments};

// ---------------------------------------------------------------------------
// Doctor models
// ---------------------------------------------------------------------------

/// Row struct for reading from the doctors table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = doctors)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DoctorRow {
    pub id: Uuid,
    pub name: String,
}

/// Insertable struct for creating new doctor records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = doctors)]
pub(crate) struct NewDoctorRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub name_key: &'a str,
}

/// Changeset struct for renaming a doctor.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = doctors)]
pub(crate) struct DoctorUpdate<'a> {
    pub name: &'a str,
    pub name_key: &'a str,
}

/// One day off of one doctor.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = doctor_days_off)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DayOffRow {
    pub doctor_id: Uuid,
    pub day_off: NaiveDate,
}

// ---------------------------------------------------------------------------
// Schedule models
// ---------------------------------------------------------------------------

/// Row struct for reading and inserting schedules.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = schedules)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScheduleRow {
    pub id: Uuid,
    pub month: i16,
    pub year: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset struct for status transitions.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = schedules)]
pub(crate) struct ScheduleStatusUpdate<'a> {
    pub status: &'a str,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading and upserting per-day bounds.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = resource_bounds)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ResourceBoundRow {
    pub schedule_id: Uuid,
    pub day: i16,
    pub min_staff: i32,
    pub max_staff: i32,
}

/// Row struct for reading and inserting shift assignments.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = shift_assignments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ShiftAssignmentRow {
    pub id: Uuid,
    pub schedule_id: Uuid,
    pub doctor_id: Uuid,
    pub shift_date: NaiveDate,
}
