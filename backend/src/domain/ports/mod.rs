//! Domain ports: the edges of the hexagon.
//!
//! Driven ports (`*Repository`) are implemented by the PostgreSQL and
//! in-memory adapters. Driving ports (`DoctorRegistry`, `ScheduleCommand`,
//! `ScheduleQuery`, `ResourceBoundsCommand`, `LoginService`) are what HTTP
//! handlers call. Every repository reports failures through its own error
//! enum generated by [`define_port_error!`].

mod macros;
pub(crate) use macros::define_port_error;

mod doctor_registry;
mod doctor_repository;
mod login_service;
mod resource_bounds_command;
mod resource_bounds_repository;
mod schedule_command;
mod schedule_query;
mod schedule_repository;
mod shift_assignment_repository;

#[cfg(test)]
pub use doctor_registry::MockDoctorRegistry;
pub use doctor_registry::{DoctorDetail, DoctorRegistry, DoctorUpdate};
#[cfg(test)]
pub use doctor_repository::MockDoctorRepository;
pub use doctor_repository::{DoctorRepository, DoctorRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FIXTURE_ADMIN_ID, FixtureLoginService, LoginService};
#[cfg(test)]
pub use resource_bounds_command::MockResourceBoundsCommand;
pub use resource_bounds_command::{BoundsRequest, ResourceBoundsCommand};
#[cfg(test)]
pub use resource_bounds_repository::MockResourceBoundsRepository;
pub use resource_bounds_repository::{ResourceBoundsRepository, ResourceBoundsRepositoryError};
#[cfg(test)]
pub use schedule_command::MockScheduleCommand;
pub use schedule_command::{GenerateScheduleRequest, GeneratedSchedule, ScheduleCommand};
#[cfg(test)]
pub use schedule_query::MockScheduleQuery;
pub use schedule_query::ScheduleQuery;
#[cfg(test)]
pub use schedule_repository::MockScheduleRepository;
pub use schedule_repository::{ScheduleRepository, ScheduleRepositoryError};
#[cfg(test)]
pub use shift_assignment_repository::MockShiftAssignmentRepository;
pub use shift_assignment_repository::{ShiftAssignmentRepository, ShiftAssignmentRepositoryError};
