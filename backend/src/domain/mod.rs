//! Scheduling domain: entities, the roster generator, ports, and services.
//!
//! Purpose: keep the clinic scheduling rules free of transport and storage
//! concerns. Adapters in `inbound` and `outbound` talk to this module only
//! through the traits in [`ports`].
//!
//! Public surface:
//! - Calendar utility: [`Month`], [`month_days`], [`calendar_days`].
//! - Registry entities: [`Doctor`], [`DoctorName`], [`DaysOff`].
//! - Schedules: [`Schedule`], [`ScheduleStatus`], [`ResourceBounds`],
//!   [`StaffBound`], [`ShiftAssignment`].
//! - Generation: [`ScheduleGenerator`], [`GenerationInput`],
//!   [`GeneratorOptions`], [`GenerationError`].
//! - Services: [`DoctorRegistryService`], [`ResourceBoundsService`],
//!   [`ScheduleService`].
//! - Errors: [`SchedulingError`] internally, [`Error`] at the port boundary.

pub mod assignment;
pub mod auth;
pub mod bounds;
pub mod calendar;
pub mod doctor;
mod doctor_registry_service;
pub mod error;
pub mod export;
pub mod generator;
mod identifiers;
pub mod ports;
mod resource_bounds_service;
mod rota_service_support;
pub mod schedule;
mod schedule_service;
pub mod scheduling_error;
pub mod trace_id;

pub use self::assignment::{ShiftAssignment, ShiftAssignmentId};
pub use self::auth::{LoginCredentials, LoginValidationError, UserId};
pub use self::bounds::{ResourceBounds, StaffBound};
pub use self::calendar::{
    CalendarDay, Month, calendar_days, date_of, days_of, is_leap_year, month_days,
};
pub use self::doctor::{DOCTOR_NAME_MAX_CHARS, DaysOff, Doctor, DoctorId, DoctorName};
pub use self::doctor_registry_service::DoctorRegistryService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::export::{ScheduleExport, render_csv};
pub use self::generator::{
    DEFAULT_TIME_BUDGET, GenerationError, GenerationInput, GeneratorOptions, ScheduleGenerator,
};
pub use self::resource_bounds_service::ResourceBoundsService;
pub use self::schedule::{
    Schedule, ScheduleFilter, ScheduleId, ScheduleRecord, ScheduleStatus, UnknownScheduleStatus,
};
pub use self::schedule_service::{PeriodLocks, ScheduleService, ScheduleStores};
pub use self::scheduling_error::SchedulingError;
pub use self::trace_id::TraceId;
