//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path and query parameters arrive as strings; these helpers turn them into
//! domain values and report failures as `invalid_request` errors carrying the
//! offending field in `details`.

use std::str::FromStr;

use chrono::NaiveDate;
use serde_json::json;

use crate::domain::{Error, Month};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidDate,
    InvalidMonth,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidMonth => "invalid_month",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn invalid_date_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be an ISO 8601 date (YYYY-MM-DD)"))
        .with_value(ErrorCode::InvalidDate, value)
}

pub(crate) fn invalid_month_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be a month name or a number from 1 to 12"),
    )
    .with_value(ErrorCode::InvalidMonth, value)
}

/// Parse a UUID-backed identifier such as [`crate::domain::DoctorId`].
pub(crate) fn parse_id<T>(value: &str, field: FieldName) -> Result<T, Error>
where
    T: FromStr<Err = uuid::Error>,
{
    value
        .trim()
        .parse()
        .map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_date(value: &str, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| invalid_date_error(field, value))
}

pub(crate) fn parse_dates(values: &[String], field: FieldName) -> Result<Vec<NaiveDate>, Error> {
    values.iter().map(|raw| parse_date(raw, field)).collect()
}

pub(crate) fn parse_month(value: &str, field: FieldName) -> Result<Month, Error> {
    value
        .parse()
        .map_err(|_| invalid_month_error(field, value))
}
