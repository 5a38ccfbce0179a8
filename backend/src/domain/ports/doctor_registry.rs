//! Driving port for doctor registry use-cases.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Doctor, DoctorId, Error, ShiftAssignment};

/// Doctor together with every shift they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorDetail {
    pub doctor: Doctor,
    pub assignments: Vec<ShiftAssignment>,
}

/// Partial update of a doctor. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoctorUpdate {
    pub name: Option<String>,
    /// Replaces the whole days-off set.
    pub days_off: Option<Vec<NaiveDate>>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRegistry: Send + Sync {
    /// Register a doctor. The name is trimmed and truncated.
    async fn add(&self, name: &str, days_off: Vec<NaiveDate>) -> Result<Doctor, Error>;

    /// Doctors ordered by name.
    async fn list(&self) -> Result<Vec<Doctor>, Error>;

    async fn get(&self, id: &DoctorId) -> Result<DoctorDetail, Error>;

    async fn update(&self, id: &DoctorId, update: DoctorUpdate) -> Result<Doctor, Error>;

    async fn remove(&self, id: &DoctorId) -> Result<(), Error>;

    /// Mark `date` as a day off. Adding an existing date is a no-op.
    async fn add_day_off(&self, id: &DoctorId, date: NaiveDate) -> Result<Doctor, Error>;

    /// Clear `date` from the days off. Removing an absent date is a no-op.
    async fn remove_day_off(&self, id: &DoctorId, date: NaiveDate) -> Result<Doctor, Error>;
}
