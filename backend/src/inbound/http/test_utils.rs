//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};

use crate::domain::Error;
use crate::domain::ports::{
    FixtureLoginService, MockDoctorRegistry, MockResourceBoundsCommand, MockScheduleCommand,
    MockScheduleQuery,
};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Driving-port doubles; login always uses the fixture administrator.
#[derive(Default)]
pub struct MockPorts {
    pub doctors: MockDoctorRegistry,
    pub bounds: MockResourceBoundsCommand,
    pub schedules: MockScheduleCommand,
    pub schedules_query: MockScheduleQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            login: Arc::new(FixtureLoginService),
            doctors: Arc::new(self.doctors),
            bounds: Arc::new(self.bounds),
            schedules: Arc::new(self.schedules),
            schedules_query: Arc::new(self.schedules_query),
        })
    }
}

/// Full `/api/v1` surface backed by the given doubles.
pub fn test_app_with(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Log in as the fixture administrator and return the session cookie.
pub async fn login_and_get_cookie(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let login_req = actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(&LoginRequest {
            username: "admin".into(),
            password: "password".into(),
        })
        .to_request();
    let login_res = actix_test::call_service(app, login_req).await;
    assert!(login_res.status().is_success(), "fixture login failed");
    login_res
        .response()
        .cookies()
        .find(|c| c.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Decode an error payload from a response.
pub async fn body_error(response: ServiceResponse) -> Error {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("error payload")
}
