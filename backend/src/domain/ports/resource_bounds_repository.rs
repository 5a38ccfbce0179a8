//! Port for per-day staffing bounds.

use async_trait::async_trait;

use crate::domain::{ScheduleId, StaffBound};

use super::define_port_error;

define_port_error! {
    /// Errors raised by resource bounds repository adapters.
    pub enum ResourceBoundsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "resource bounds repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "resource bounds repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceBoundsRepository: Send + Sync {
    /// Stored bounds of a schedule in day order. Days never set are absent.
    async fn list(
        &self,
        schedule_id: &ScheduleId,
    ) -> Result<Vec<StaffBound>, ResourceBoundsRepositoryError>;

    /// Insert or overwrite the given days, leaving other days untouched.
    async fn upsert(
        &self,
        schedule_id: &ScheduleId,
        bounds: &[StaffBound],
    ) -> Result<(), ResourceBoundsRepositoryError>;
}
