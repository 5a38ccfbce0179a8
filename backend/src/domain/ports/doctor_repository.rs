//! Port for doctor registry persistence.

use async_trait::async_trait;

use crate::domain::{Doctor, DoctorId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by doctor repository adapters.
    pub enum DoctorRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "doctor repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "doctor repository query failed: {message}",
        /// Another doctor already uses this name (case-insensitive).
        DuplicateName { name: String } => "a doctor named {name} already exists",
    }
}

/// Storage for doctors and their days off.
///
/// Implementations enforce case-insensitive name uniqueness and cascade a
/// doctor's shift assignments on delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorRepository: Send + Sync {
    /// All doctors, ordered by name.
    async fn list(&self) -> Result<Vec<Doctor>, DoctorRepositoryError>;

    async fn find_by_id(&self, id: &DoctorId) -> Result<Option<Doctor>, DoctorRepositoryError>;

    async fn insert(&self, doctor: &Doctor) -> Result<(), DoctorRepositoryError>;

    /// Overwrite name and days off. Returns `false` when the doctor is gone.
    async fn update(&self, doctor: &Doctor) -> Result<bool, DoctorRepositoryError>;

    /// Remove a doctor and their assignments. Returns `false` when absent.
    async fn delete(&self, id: &DoctorId) -> Result<bool, DoctorRepositoryError>;
}
