//! Per-day staffing bounds handlers.
//!
//! Requested values are clamped into the valid range rather than rejected;
//! the response carries what was actually stored.
//!
//! ```text
//! GET /api/v1/schedules/{id}/bounds
//! PUT /api/v1/schedules/{id}/bounds [{"day":1,"minStaff":1,"maxStaff":2}]
//! GET /api/v1/schedules/{id}/bounds/{day}
//! PUT /api/v1/schedules/{id}/bounds/{day} {"minStaff":2,"maxStaff":3}
//! ```

use actix_web::{get, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::BoundsRequest;
use crate::domain::{Error, ScheduleId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::rota_dto::{DayBoundsRequest, StaffBoundResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

const SCHEDULE_ID: FieldName = FieldName::new("scheduleId");

#[derive(Debug, Deserialize)]
pub(super) struct BoundsPath {
    id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct DayBoundsPath {
    id: String,
    day: u32,
}

/// Bounds for the day named in the path.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffRangeRequest {
    #[schema(example = 2)]
    pub min_staff: u32,
    #[schema(example = 3)]
    pub max_staff: u32,
}

fn schedule_id(raw: &str) -> Result<ScheduleId, Error> {
    parse_id(raw, SCHEDULE_ID)
}

#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}/bounds",
    params(("id" = String, Path, description = "Schedule id")),
    responses(
        (status = 200, description = "One entry per day", body = [StaffBoundResponse]),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["bounds"],
    operation_id = "listBounds"
)]
#[get("/schedules/{id}/bounds")]
pub async fn list_bounds(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BoundsPath>,
) -> ApiResult<web::Json<Vec<StaffBoundResponse>>> {
    session.require_operator()?;
    let bounds = state.bounds.list(&schedule_id(&path.id)?).await?;
    Ok(web::Json(
        bounds.into_iter().map(StaffBoundResponse::from).collect(),
    ))
}

/// Store bounds for several days at once.
#[utoipa::path(
    put,
    path = "/api/v1/schedules/{id}/bounds",
    params(("id" = String, Path, description = "Schedule id")),
    request_body = [DayBoundsRequest],
    responses(
        (status = 200, description = "Full bounds table", body = [StaffBoundResponse]),
        (status = 400, description = "Day outside the month", body = ErrorSchema),
        (status = 404, description = "Unknown schedule", body = ErrorSchema),
        (status = 409, description = "Schedule is finalized", body = ErrorSchema)
    ),
    tags = ["bounds"],
    operation_id = "replaceBounds"
)]
#[put("/schedules/{id}/bounds")]
pub async fn replace_bounds(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<BoundsPath>,
    payload: web::Json<Vec<DayBoundsRequest>>,
) -> ApiResult<web::Json<Vec<StaffBoundResponse>>> {
    session.require_operator()?;
    let requests = payload
        .into_inner()
        .into_iter()
        .map(BoundsRequest::from)
        .collect();
    let bounds = state
        .bounds
        .set_all(&schedule_id(&path.id)?, requests)
        .await?;
    Ok(web::Json(
        bounds.into_iter().map(StaffBoundResponse::from).collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/schedules/{id}/bounds/{day}",
    params(
        ("id" = String, Path, description = "Schedule id"),
        ("day" = u32, Path, description = "Day of month")
    ),
    responses(
        (status = 200, description = "Bounds", body = StaffBoundResponse),
        (status = 400, description = "Day outside the month", body = ErrorSchema),
        (status = 404, description = "Unknown schedule", body = ErrorSchema)
    ),
    tags = ["bounds"],
    operation_id = "getDayBounds"
)]
#[get("/schedules/{id}/bounds/{day}")]
pub async fn get_day_bounds(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DayBoundsPath>,
) -> ApiResult<web::Json<StaffBoundResponse>> {
    session.require_operator()?;
    let bound = state
        .bounds
        .get_bounds(&schedule_id(&path.id)?, path.day)
        .await?;
    Ok(web::Json(StaffBoundResponse::from(bound)))
}

/// Set one day's bounds; `minStaff > maxStaff` is clamped down.
#[utoipa::path(
    put,
    path = "/api/v1/schedules/{id}/bounds/{day}",
    params(
        ("id" = String, Path, description = "Schedule id"),
        ("day" = u32, Path, description = "Day of month")
    ),
    request_body = StaffRangeRequest,
    responses(
        (status = 200, description = "Stored bounds", body = StaffBoundResponse),
        (status = 400, description = "Day outside the month", body = ErrorSchema),
        (status = 404, description = "Unknown schedule", body = ErrorSchema),
        (status = 409, description = "Schedule is finalized", body = ErrorSchema)
    ),
    tags = ["bounds"],
    operation_id = "setDayBounds"
)]
#[put("/schedules/{id}/bounds/{day}")]
pub async fn set_day_bounds(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DayBoundsPath>,
    payload: web::Json<StaffRangeRequest>,
) -> ApiResult<web::Json<StaffBoundResponse>> {
    session.require_operator()?;
    let StaffRangeRequest {
        min_staff,
        max_staff,
    } = payload.into_inner();
    let request = BoundsRequest {
        day: path.day,
        min_staff,
        max_staff,
    };
    let bound = state
        .bounds
        .set_bounds(&schedule_id(&path.id)?, request)
        .await?;
    Ok(web::Json(StaffBoundResponse::from(bound)))
}
