//! Doctor registry handlers.
//!
//! ```text
//! GET    /api/v1/doctors
//! POST   /api/v1/doctors {"name":"Dr Okafor","daysOff":["2026-03-02"]}
//! GET    /api/v1/doctors/{id}
//! PUT    /api/v1/doctors/{id} {"name":"Dr Okafor","daysOff":[]}
//! DELETE /api/v1/doctors/{id}
//! PUT    /api/v1/doctors/{id}/days-off/{date}
//! DELETE /api/v1/doctors/{id}/days-off/{date}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::DoctorUpdate;
use crate::domain::{DoctorId, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::rota_dto::{DoctorDetailResponse, DoctorResponse};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_date, parse_dates, parse_id,
};

const DOCTOR_ID: FieldName = FieldName::new("doctorId");
const DATE: FieldName = FieldName::new("date");
const DAYS_OFF: FieldName = FieldName::new("daysOff");

#[derive(Debug, Deserialize)]
pub(super) struct DoctorPath {
    id: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct DayOffPath {
    id: String,
    date: String,
}

/// Request payload for registering a doctor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDoctorRequest {
    #[schema(example = "Dr Okafor")]
    pub name: Option<String>,
    #[serde(default)]
    pub days_off: Vec<String>,
}

/// Request payload for editing a doctor; omitted fields are unchanged.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDoctorRequest {
    pub name: Option<String>,
    pub days_off: Option<Vec<String>>,
}

fn doctor_id(path: &DoctorPath) -> Result<DoctorId, Error> {
    parse_id(&path.id, DOCTOR_ID)
}

/// List registered doctors ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/doctors",
    responses(
        (status = 200, description = "Doctors", body = [DoctorResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "listDoctors"
)]
#[get("/doctors")]
pub async fn list_doctors(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DoctorResponse>>> {
    session.require_operator()?;
    let doctors = state.doctors.list().await?;
    Ok(web::Json(doctors.iter().map(DoctorResponse::from).collect()))
}

/// Register a doctor. Names longer than 20 characters are truncated.
#[utoipa::path(
    post,
    path = "/api/v1/doctors",
    request_body = CreateDoctorRequest,
    responses(
        (status = 201, description = "Doctor registered", body = DoctorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Name already registered", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "createDoctor"
)]
#[post("/doctors")]
pub async fn create_doctor(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDoctorRequest>,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    let CreateDoctorRequest { name, days_off } = payload.into_inner();
    let name = name.ok_or_else(|| missing_field_error(FieldName::new("name")))?;
    let days_off = parse_dates(&days_off, DAYS_OFF)?;
    let doctor = state.doctors.add(&name, days_off).await?;
    Ok(HttpResponse::Created().json(DoctorResponse::from(&doctor)))
}

/// Fetch a doctor with their assigned shifts.
#[utoipa::path(
    get,
    path = "/api/v1/doctors/{id}",
    params(("id" = String, Path, description = "Doctor id")),
    responses(
        (status = 200, description = "Doctor", body = DoctorDetailResponse),
        (status = 400, description = "Invalid id", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown doctor", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "getDoctor"
)]
#[get("/doctors/{id}")]
pub async fn get_doctor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DoctorPath>,
) -> ApiResult<web::Json<DoctorDetailResponse>> {
    session.require_operator()?;
    let id = doctor_id(&path)?;
    let detail = state.doctors.get(&id).await?;
    Ok(web::Json(DoctorDetailResponse::from(detail)))
}

/// Rename a doctor and/or replace their days off.
#[utoipa::path(
    put,
    path = "/api/v1/doctors/{id}",
    params(("id" = String, Path, description = "Doctor id")),
    request_body = UpdateDoctorRequest,
    responses(
        (status = 200, description = "Doctor updated", body = DoctorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown doctor", body = ErrorSchema),
        (status = 409, description = "Name already registered", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "updateDoctor"
)]
#[put("/doctors/{id}")]
pub async fn update_doctor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DoctorPath>,
    payload: web::Json<UpdateDoctorRequest>,
) -> ApiResult<web::Json<DoctorResponse>> {
    session.require_operator()?;
    let id = doctor_id(&path)?;
    let UpdateDoctorRequest { name, days_off } = payload.into_inner();
    let days_off = days_off
        .map(|dates| parse_dates(&dates, DAYS_OFF))
        .transpose()?;
    let doctor = state
        .doctors
        .update(&id, DoctorUpdate { name, days_off })
        .await?;
    Ok(web::Json(DoctorResponse::from(&doctor)))
}

/// Remove a doctor and every shift assigned to them.
#[utoipa::path(
    delete,
    path = "/api/v1/doctors/{id}",
    params(("id" = String, Path, description = "Doctor id")),
    responses(
        (status = 204, description = "Doctor removed"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Unknown doctor", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "deleteDoctor"
)]
#[delete("/doctors/{id}")]
pub async fn delete_doctor(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DoctorPath>,
) -> ApiResult<HttpResponse> {
    session.require_operator()?;
    let id = doctor_id(&path)?;
    state.doctors.remove(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mark a date as a day off; repeating the call is harmless.
#[utoipa::path(
    put,
    path = "/api/v1/doctors/{id}/days-off/{date}",
    params(
        ("id" = String, Path, description = "Doctor id"),
        ("date" = String, Path, description = "ISO 8601 date")
    ),
    responses(
        (status = 200, description = "Doctor", body = DoctorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown doctor", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "addDayOff"
)]
#[put("/doctors/{id}/days-off/{date}")]
pub async fn add_day_off(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DayOffPath>,
) -> ApiResult<web::Json<DoctorResponse>> {
    session.require_operator()?;
    let id = parse_id(&path.id, DOCTOR_ID)?;
    let date = parse_date(&path.date, DATE)?;
    let doctor = state.doctors.add_day_off(&id, date).await?;
    Ok(web::Json(DoctorResponse::from(&doctor)))
}

/// Clear a day off; clearing an absent date is harmless.
#[utoipa::path(
    delete,
    path = "/api/v1/doctors/{id}/days-off/{date}",
    params(
        ("id" = String, Path, description = "Doctor id"),
        ("date" = String, Path, description = "ISO 8601 date")
    ),
    responses(
        (status = 200, description = "Doctor", body = DoctorResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown doctor", body = ErrorSchema)
    ),
    tags = ["doctors"],
    operation_id = "removeDayOff"
)]
#[delete("/doctors/{id}/days-off/{date}")]
pub async fn remove_day_off(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<DayOffPath>,
) -> ApiResult<web::Json<DoctorResponse>> {
    session.require_operator()?;
    let id = parse_id(&path.id, DOCTOR_ID)?;
    let date = parse_date(&path.date, DATE)?;
    let doctor = state.doctors.remove_day_off(&id, date).await?;
    Ok(web::Json(DoctorResponse::from(&doctor)))
}

#[cfg(test)]
#[path = "doctors_tests.rs"]
mod tests;
