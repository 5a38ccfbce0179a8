//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the rota repository ports backed by PostgreSQL
//! via Diesel, with async support through `diesel-async` and `bb8` pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Scheduling rules stay in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Database-enforced invariants**: unique names, one schedule per period,
//!   one shift per doctor per date, and cascading deletes are constraints in
//!   `migrations/`, so concurrent writers cannot break them.
//! - **Strongly typed errors**: Diesel and pool failures map to each port's
//!   error enum.
//!
//! # Example
//!
//! ```no_run
//! use rota::outbound::persistence::{
//!     DbPool, DieselDoctorRepository, PoolConfig, run_pending_migrations,
//! };
//!
//! # async fn wire() -> Result<(), Box<dyn std::error::Error>> {
//! let url = "postgres://rota@localhost/rota";
//! run_pending_migrations(url).await?;
//! let pool = DbPool::new(PoolConfig::new(url)).await?;
//! let doctors = DieselDoctorRepository::new(pool);
//! # let _ = doctors;
//! # Ok(())
//! # }
//! ```

mod diesel_basic_error_mapping;
mod diesel_doctor_repository;
mod diesel_resource_bounds_repository;
mod diesel_schedule_repository;
mod diesel_shift_assignment_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_doctor_repository::DieselDoctorRepository;
pub use diesel_resource_bounds_repository::DieselResourceBoundsRepository;
pub use diesel_schedule_repository::DieselScheduleRepository;
pub use diesel_shift_assignment_repository::DieselShiftAssignmentRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
