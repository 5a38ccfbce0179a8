//! Schedule lifecycle handlers.
//!
//! ```text
//! GET    /api/v1/schedules?month=3&year=2026
//! POST   /api/v1/schedules {"month":"March","year":2026}
//! POST   /api/v1/schedules/generate {"month":3,"year":2026,"bounds":[...]}
//! GET    /api/v1/schedules/{id}
//! DELETE /api/v1/schedules/{id}
//! POST   /api/v1/schedules/{id}/finalize
//! GET    /api/v1/schedules/{id}/export
//! ```

use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{BoundsRequest, GenerateScheduleRequest};
use crate::domain::{Error, Month, ScheduleFilter, ScheduleId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::rota_dto::{
    DayBoundsRequest, GeneratedScheduleResponse, MonthInput, ScheduleResponse,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_id, parse_month};

const SCHEDULE_ID: FieldName = FieldName::new("scheduleId");
const MONTH: FieldName = FieldName::new("month");
const YEAR: FieldName = FieldName::new("year");

#[derive(Debug, Deserialize)]
pub(super) struct SchedulePath {
    id: String,
}

/// Optional period narrowing for the history listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ScheduleHistoryQuery {
    /// Month number or name.
    pub month: Option<String>,
    pub year: Option<i32>,
}

impl ScheduleHistoryQuery {
    fn filter(&self) -> Result<ScheduleFilter, Error> {
        let month = self
            .month
            .as_deref()
            .map(|raw| parse_month(raw, MONTH))
            .transpose()?;
        Ok(ScheduleFilter {
            month,
            year: self.year,
        })
    }
}

/// Request payload naming a schedule period.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateScheduleRequest {
    pub month: Option<MonthInput>,
    #[schema(example = 2026)]
    pub year: Option<i32>,
}

/// Request payload for roster generation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub month: Option<MonthInput>,
    #[schema(example = 2026)]
    pub year: Option<i32>,
    /// Bounds to store before generating; other days keep their values.
    pub bounds: Option<Vec<DayBoundsRequest>>,
}

fn period(month: Option<MonthInput>, year: Option<i32>) -> Result<(Month, i32), Error> {
    let month = month.ok_or_else(|| missing_field_error(MONTH))?;
    let year = year.ok_or_else(|| missing_field_error(YEAR))?;
    Ok((month.resolve(MONTH)?, year))
}

fn schedule_id(path: &SchedulePath) -> Result<ScheduleId, Error> {
    parse_id(&path.id, SCHEDULE_ID)
}

/// Schedule history, newest period first.
#[utoipa::path(
    get,
    path = "/api/v1/schedules",
    params(ScheduleHistoryQuery),
    responses(
        (status = 200, description = "Schedules", body = [ScheduleResponse]),
        (status = 400, description = "Invalid month", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "listSchedules"
)]
#[get("/schedules")]
pub async fn list_schedules(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ScheduleHistoryQuery>,
) -> ApiResult<web::Json<Vec<ScheduleResponse>>> {
    session.require_operator()?;
    let filter = query.filter()?;
    let schedules = state.schedules_query.list(filter).await?;
    Ok(web::Json(schedules.iter().map(ScheduleResponse::from).collect()))
}

/// Create an empty draft schedule for a period.
#[utoipa::path(
    post,
    path = "/api/v1/schedules",
    request_body = CreateScheduleRequest,
    responses(
        (status = 201, description = "Schedule created", body = ScheduleResponse),
        (status = 400, description = "Invalid period", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Period already scheduled", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "createSchedule"
)]
#[post("/schedules")]
pub async fn create_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateScheduleRequest>,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    let CreateScheduleRequest { month, year } = payload.into_inner();
    let (month, year) = period(month, year)?;
    let schedule = state.schedules.create(month, year).await?;
    Ok(HttpResponse::Created().json(ScheduleResponse::from(&schedule)))
}

/// Generate (or regenerate) the roster of a period.
#[utoipa::path(
    post,
    path = "/api/v1/schedules/generate",
    request_body = GenerateRequest,
    responses(
        (status = 200, description = "Roster generated", body = GeneratedScheduleResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Schedule is finalized", body = ErrorSchema),
        (status = 422, description = "Too few doctors on some days", body = ErrorSchema),
        (status = 504, description = "Generation timed out", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "generateSchedule"
)]
#[post("/schedules/generate")]
pub async fn generate_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<GenerateRequest>,
) -> ApiResult<web::Json<GeneratedScheduleResponse>> {
    session.require_operator()?;
    let GenerateRequest {
        month,
        year,
        bounds,
    } = payload.into_inner();
    let (month, year) = period(month, year)?;
    let request = GenerateScheduleRequest {
        month,
        year,
        bounds: bounds.map(|entries| entries.into_iter().map(BoundsRequest::from).collect()),
    };
    let generated = state.schedules.generate(request).await?;
    Ok(web::Json(GeneratedScheduleResponse::from(generated)))
}

#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Schedule", body = ScheduleResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "getSchedule"
)]
#[get("/schedules/{id}")]
pub async fn get_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SchedulePath>,
) -> ApiResult<web::Json<ScheduleResponse>> {
    session.require_operator()?;
    let schedule = state.schedules_query.get(&schedule_id(&path)?).await?;
    Ok(web::Json(ScheduleResponse::from(&schedule)))
}

/// Delete a schedule together with its bounds and shifts.
#[utoipa::path(
    delete,
    path = "/api/v1/schedules/{id}",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 204, description = "Schedule deleted"),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "deleteSchedule"
)]
#[delete("/schedules/{id}")]
pub async fn delete_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SchedulePath>,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    state.schedules.delete(&schedule_id(&path)?).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Lock a generated schedule against further changes.
#[utoipa::path(
    post,
    path = "/api/v1/schedules/{id}/finalize",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "Schedule finalized", body = ScheduleResponse),
        (status = 404, description = "Unknown schedule", body = ErrorSchema),
        (status = 409, description = "Schedule has no roster yet", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "finalizeSchedule"
)]
#[post("/schedules/{id}/finalize")]
pub async fn finalize_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SchedulePath>,
) -> ApiResult<web::Json<ScheduleResponse>> {
    session.require_operator()?;
    let schedule = state.schedules.finalize(&schedule_id(&path)?).await?;
    Ok(web::Json(ScheduleResponse::from(&schedule)))
}

/// Download the roster as a day-by-doctor CSV table.
#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}/export",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "CSV roster", content_type = "text/csv", body = String),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["schedules"],
    operation_id = "exportSchedule"
)]
#[get("/schedules/{id}/export")]
pub async fn export_schedule(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<SchedulePath>,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    let export = state.schedules_query.export(&schedule_id(&path)?).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(export.filename)],
        })
        .body(export.csv))
}

#[cfg(test)]
#[path = "schedules_tests.rs"]
mod tests;
