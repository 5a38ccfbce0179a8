//! Read-only shift assignment handlers.
//!
//! ```text
//! GET /api/v1/shifts?scheduleId=...
//! GET /api/v1/shifts/lookup?doctorId=...&date=2026-03-14
//! ```

use actix_web::{get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::{DoctorId, Error, ScheduleId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::rota_dto::ShiftResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_date, parse_id};

const SCHEDULE_ID: FieldName = FieldName::new("scheduleId");
const DOCTOR_ID: FieldName = FieldName::new("doctorId");
const DATE: FieldName = FieldName::new("date");

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShiftsQuery {
    /// Schedule whose assignments are listed.
    pub schedule_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ShiftLookupQuery {
    pub doctor_id: Option<String>,
    /// ISO 8601 date.
    pub date: Option<String>,
}

fn required<'a>(value: &'a Option<String>, field: FieldName) -> Result<&'a str, Error> {
    value.as_deref().ok_or_else(|| missing_field_error(field))
}

/// Every assignment of a schedule, ordered by date.
#[utoipa::path(
    get,
    path = "/api/v1/shifts",
    params(ShiftsQuery),
    responses(
        (status = 200, description = "Assignments", body = [ShiftResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["shifts"],
    operation_id = "listShifts"
)]
#[get("/shifts")]
pub async fn list_shifts(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ShiftsQuery>,
) -> ApiResult<web::Json<Vec<ShiftResponse>>> {
    session.require_operator()?;
    let id: ScheduleId = parse_id(required(&query.schedule_id, SCHEDULE_ID)?, SCHEDULE_ID)?;
    let shifts = state.schedules_query.shifts(&id).await?;
    Ok(web::Json(shifts.iter().map(ShiftResponse::from).collect()))
}

/// The doctor's assignment on a date, or `null` when they are not working.
#[utoipa::path(
    get,
    path = "/api/v1/shifts/lookup",
    params(ShiftLookupQuery),
    responses(
        (status = 200, description = "Assignment or null", body = Option<ShiftResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema)
    ),
    tags = ["shifts"],
    operation_id = "lookupShift"
)]
#[get("/shifts/lookup")]
pub async fn lookup_shift(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ShiftLookupQuery>,
) -> ApiResult<web::Json<Option<ShiftResponse>>> {
    session.require_operator()?;
    let doctor_id: DoctorId = parse_id(required(&query.doctor_id, DOCTOR_ID)?, DOCTOR_ID)?;
    let date = parse_date(required(&query.date, DATE)?, DATE)?;
    let shift = state.schedules_query.shift_for(&doctor_id, date).await?;
    Ok(web::Json(shift.as_ref().map(ShiftResponse::from)))
}
