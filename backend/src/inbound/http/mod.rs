//! HTTP inbound adapter exposing the `/api/v1` REST surface.

use actix_web::web;

pub mod auth;
pub mod bounds;
pub mod doctors;
pub mod error;
pub mod health;
pub mod rota_dto;
pub mod schedules;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod shifts;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` handler on a scope.
///
/// Literal segments such as `/schedules/generate` are registered before the
/// `{id}` routes that would otherwise shadow them.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use rota::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::login)
        .service(auth::logout)
        .service(doctors::list_doctors)
        .service(doctors::create_doctor)
        .service(doctors::get_doctor)
        .service(doctors::update_doctor)
        .service(doctors::delete_doctor)
        .service(doctors::add_day_off)
        .service(doctors::remove_day_off)
        .service(schedules::list_schedules)
        .service(schedules::create_schedule)
        .service(schedules::generate_schedule)
        .service(schedules::get_schedule)
        .service(schedules::delete_schedule)
        .service(schedules::finalize_schedule)
        .service(schedules::export_schedule)
        .service(bounds::list_bounds)
        .service(bounds::replace_bounds)
        .service(bounds::get_day_bounds)
        .service(bounds::set_day_bounds)
        .service(shifts::list_shifts)
        .service(shifts::lookup_shift);
}
