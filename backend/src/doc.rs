//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the OpenAPI document for the REST API. It registers:
//!
//! - **Paths**: every `/api/v1` handler plus the health probes.
//! - **Schemas**: request and response DTOs from [`crate::inbound::http`],
//!   and the [`ErrorSchema`]/[`ErrorCodeSchema`] wrappers that describe the
//!   domain error envelope without coupling domain types to utoipa.
//! - **Security**: the session cookie issued by `POST /api/v1/login`.
//!
//! Swagger UI serves the document in debug builds; `openapi-dump` prints it.

use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::bounds::StaffRangeRequest;
use crate::inbound::http::doctors::{CreateDoctorRequest, UpdateDoctorRequest};
use crate::inbound::http::rota_dto::{
    DayBoundsRequest, DoctorDetailResponse, DoctorResponse, GeneratedScheduleResponse,
    MonthInput, ScheduleResponse, ShiftResponse, StaffBoundResponse,
};
use crate::inbound::http::schedules::{CreateScheduleRequest, GenerateRequest};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Rota schedule generation API",
        description = "Doctor registry, monthly schedules, staffing bounds, and roster generation.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::doctors::list_doctors,
        crate::inbound::http::doctors::create_doctor,
        crate::inbound::http::doctors::get_doctor,
        crate::inbound::http::doctors::update_doctor,
        crate::inbound::http::doctors::delete_doctor,
        crate::inbound::http::doctors::add_day_off,
        crate::inbound::http::doctors::remove_day_off,
        crate::inbound::http::schedules::list_schedules,
        crate::inbound::http::schedules::create_schedule,
        crate::inbound::http::schedules::generate_schedule,
        crate::inbound::http::schedules::get_schedule,
        crate::inbound::http::schedules::delete_schedule,
        crate::inbound::http::schedules::finalize_schedule,
        crate::inbound::http::schedules::export_schedule,
        crate::inbound::http::bounds::list_bounds,
        crate::inbound::http::bounds::replace_bounds,
        crate::inbound::http::bounds::get_day_bounds,
        crate::inbound::http::bounds::set_day_bounds,
        crate::inbound::http::shifts::list_shifts,
        crate::inbound::http::shifts::lookup_shift,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        LoginRequest,
        CreateDoctorRequest,
        UpdateDoctorRequest,
        DoctorResponse,
        DoctorDetailResponse,
        MonthInput,
        CreateScheduleRequest,
        GenerateRequest,
        DayBoundsRequest,
        StaffRangeRequest,
        ScheduleResponse,
        GeneratedScheduleResponse,
        StaffBoundResponse,
        ShiftResponse,
    )),
    tags(
        (name = "auth", description = "Session login and logout"),
        (name = "doctors", description = "Doctor registry and days off"),
        (name = "schedules", description = "Monthly schedules, generation, and export"),
        (name = "bounds", description = "Per-day staffing bounds"),
        (name = "shifts", description = "Generated shift assignments"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the generated OpenAPI document.

    use super::*;
    use rstest::rstest;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
        assert_object_schema_has_field(error_schema, "traceId");
    }

    #[rstest]
    #[case("/api/v1/login")]
    #[case("/api/v1/doctors/{id}/days-off/{date}")]
    #[case("/api/v1/schedules/generate")]
    #[case("/api/v1/schedules/{id}/bounds/{day}")]
    #[case("/api/v1/shifts/lookup")]
    #[case("/health/ready")]
    fn openapi_lists_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths.paths.contains_key(path),
            "missing path {path}; have {:?}",
            doc.paths.paths.keys().collect::<Vec<_>>()
        );
    }

    #[rstest]
    #[case("/api/v1/doctors/{id}", "404")]
    #[case("/api/v1/schedules/generate", "422")]
    #[case("/api/v1/shifts/lookup", "400")]
    fn error_responses_reference_the_error_schema(#[case] path: &str, #[case] status: &str) {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get(path).expect("path registered");
        let operation = item
            .get
            .as_ref()
            .or(item.post.as_ref())
            .expect("operation present");
        let Some(RefOr::T(response)) = operation.responses.responses.get(status) else {
            panic!("missing inline {status} response for {path}");
        };
        let content = response
            .content
            .get("application/json")
            .expect("json error body");
        match content.schema.as_ref() {
            Some(RefOr::Ref(reference)) => {
                assert!(reference.ref_location.ends_with(ERROR_SCHEMA_NAME));
            }
            _ => panic!("error body should reference the shared schema"),
        }
    }

    #[rstest]
    fn openapi_registers_the_session_cookie_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
