//! Typed failures raised by the scheduling domain.
//!
//! Services return [`SchedulingError`] internally and convert it into the
//! transport-agnostic [`Error`] payload at the driving-port boundary.

use serde_json::json;

use super::Error;

/// Failure taxonomy of the scheduling core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulingError {
    /// The month is neither a known month name nor an index in `1..=12`.
    #[error("invalid month: {value}")]
    InvalidMonth { value: String },
    /// Some days have fewer available doctors than their minimum staffing.
    #[error("staffing bounds cannot be met on days {days:?}")]
    InfeasibleConstraints { days: Vec<u32> },
    /// The roster search exceeded its time budget.
    #[error("schedule generation exceeded its time budget")]
    GenerationTimeout,
    /// A referenced entity does not exist.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },
    /// A field failed validation.
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },
    /// The request conflicts with stored state.
    #[error("{reason}")]
    Conflict { reason: String },
}

impl SchedulingError {
    /// Build a [`SchedulingError::NotFound`] for the given entity.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Build a [`SchedulingError::Validation`] for the given field.
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Build a [`SchedulingError::Conflict`].
    pub fn conflict(reason: impl Into<String>) -> Self {
        Self::Conflict {
            reason: reason.into(),
        }
    }
}

impl From<SchedulingError> for Error {
    fn from(value: SchedulingError) -> Self {
        let message = value.to_string();
        match value {
            SchedulingError::InvalidMonth { value } => Error::invalid_request(message)
                .with_details(json!({ "field": "month", "value": value, "code": "invalid_month" })),
            SchedulingError::InfeasibleConstraints { days } => Error::infeasible_constraints(&days),
            SchedulingError::GenerationTimeout => Error::generation_timeout(message),
            SchedulingError::NotFound { entity, id } => {
                Error::not_found(message).with_details(json!({ "entity": entity, "id": id }))
            }
            SchedulingError::Validation { field, reason } => Error::invalid_request(message)
                .with_details(json!({ "field": field, "reason": reason })),
            SchedulingError::Conflict { .. } => Error::conflict(message),
        }
    }
}
