//! Request and response payloads shared by the rota handlers.
//!
//! Identifiers, dates and timestamps travel as strings; handlers parse them
//! with the helpers in [`super::validation`].

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{BoundsRequest, DoctorDetail, GeneratedSchedule};
use crate::domain::{Doctor, Error, Month, Schedule, ShiftAssignment, StaffBound};
use crate::inbound::http::validation::{FieldName, invalid_month_error, parse_month};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A month given either by number (`2`) or by name (`"February"`, `"feb"`).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(untagged)]
pub enum MonthInput {
    Index(u32),
    Name(String),
}

impl MonthInput {
    pub(crate) fn resolve(&self, field: FieldName) -> Result<Month, Error> {
        match self {
            Self::Index(index) => Month::from_index(*index)
                .map_err(|_| invalid_month_error(field, &index.to_string())),
            Self::Name(name) => parse_month(name, field),
        }
    }
}

/// Staffing bounds for one day of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayBoundsRequest {
    #[schema(example = 14)]
    pub day: u32,
    #[schema(example = 1)]
    pub min_staff: u32,
    #[schema(example = 3)]
    pub max_staff: u32,
}

impl From<DayBoundsRequest> for BoundsRequest {
    fn from(value: DayBoundsRequest) -> Self {
        Self {
            day: value.day,
            min_staff: value.min_staff,
            max_staff: value.max_staff,
        }
    }
}

/// Response payload for a doctor.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Dr Okafor")]
    pub name: String,
    pub days_off: Vec<String>,
}

impl From<&Doctor> for DoctorResponse {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id().to_string(),
            name: doctor.name().to_string(),
            days_off: doctor
                .days_off()
                .iter()
                .map(|date| date.format(DATE_FORMAT).to_string())
                .collect(),
        }
    }
}

/// Response payload for a doctor together with their shifts.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDetailResponse {
    #[serde(flatten)]
    pub doctor: DoctorResponse,
    pub shifts: Vec<ShiftResponse>,
}

impl From<DoctorDetail> for DoctorDetailResponse {
    fn from(detail: DoctorDetail) -> Self {
        Self {
            doctor: DoctorResponse::from(&detail.doctor),
            shifts: detail.assignments.iter().map(ShiftResponse::from).collect(),
        }
    }
}

/// Response payload for one shift assignment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ShiftResponse {
    pub id: String,
    pub schedule_id: String,
    pub doctor_id: String,
    #[schema(example = "2026-03-14")]
    pub date: String,
}

impl From<&ShiftAssignment> for ShiftResponse {
    fn from(assignment: &ShiftAssignment) -> Self {
        Self {
            id: assignment.id.to_string(),
            schedule_id: assignment.schedule_id.to_string(),
            doctor_id: assignment.doctor_id.to_string(),
            date: assignment.date.format(DATE_FORMAT).to_string(),
        }
    }
}

/// Response payload for a schedule record.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub id: String,
    #[schema(example = 3)]
    pub month: u32,
    #[schema(example = "March")]
    pub month_name: String,
    #[schema(example = 2026)]
    pub year: i32,
    #[schema(example = "generated")]
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Schedule> for ScheduleResponse {
    fn from(schedule: &Schedule) -> Self {
        Self {
            id: schedule.id().to_string(),
            month: schedule.month().number(),
            month_name: schedule.month().name().to_owned(),
            year: schedule.year(),
            status: schedule.status().as_str().to_owned(),
            created_at: schedule.created_at().to_rfc3339(),
            updated_at: schedule.updated_at().to_rfc3339(),
        }
    }
}

/// Response payload for a successful generation.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedScheduleResponse {
    pub schedule: ScheduleResponse,
    pub shifts: Vec<ShiftResponse>,
}

impl From<GeneratedSchedule> for GeneratedScheduleResponse {
    fn from(generated: GeneratedSchedule) -> Self {
        Self {
            schedule: ScheduleResponse::from(&generated.schedule),
            shifts: generated
                .assignments
                .iter()
                .map(ShiftResponse::from)
                .collect(),
        }
    }
}

/// Response payload for one day's stored bounds.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StaffBoundResponse {
    pub day: u32,
    pub min_staff: u32,
    pub max_staff: u32,
}

impl From<StaffBound> for StaffBoundResponse {
    fn from(bound: StaffBound) -> Self {
        Self {
            day: bound.day(),
            min_staff: bound.min_staff(),
            max_staff: bound.max_staff(),
        }
    }
}
