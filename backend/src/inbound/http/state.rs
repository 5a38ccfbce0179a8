//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    DoctorRegistry, LoginService, ResourceBoundsCommand, ScheduleCommand, ScheduleQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub doctors: Arc<dyn DoctorRegistry>,
    pub bounds: Arc<dyn ResourceBoundsCommand>,
    pub schedules: Arc<dyn ScheduleCommand>,
    pub schedules_query: Arc<dyn ScheduleQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub doctors: Arc<dyn DoctorRegistry>,
    pub bounds: Arc<dyn ResourceBoundsCommand>,
    pub schedules: Arc<dyn ScheduleCommand>,
    pub schedules_query: Arc<dyn ScheduleQuery>,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use rota::domain::ports::FixtureLoginService;
    /// use rota::domain::{
    ///     DoctorRegistryService, GeneratorOptions, ResourceBoundsService, ScheduleService,
    ///     ScheduleStores,
    /// };
    /// use rota::inbound::http::state::{HttpState, HttpStatePorts};
    /// use rota::outbound::memory::InMemoryRotaStore;
    ///
    /// let store = Arc::new(InMemoryRotaStore::default());
    /// let schedules = Arc::new(ScheduleService::new(
    ///     ScheduleStores {
    ///         schedules: store.clone(),
    ///         doctors: store.clone(),
    ///         bounds: store.clone(),
    ///         assignments: store.clone(),
    ///     },
    ///     Arc::new(mockable::DefaultClock),
    ///     GeneratorOptions::default(),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: Arc::new(FixtureLoginService),
    ///     doctors: Arc::new(DoctorRegistryService::new(store.clone(), store.clone())),
    ///     bounds: Arc::new(ResourceBoundsService::new(
    ///         store.clone(),
    ///         store.clone(),
    ///         store.clone(),
    ///     )),
    ///     schedules: schedules.clone(),
    ///     schedules_query: schedules,
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            doctors,
            bounds,
            schedules,
            schedules_query,
        } = ports;
        Self {
            login,
            doctors,
            bounds,
            schedules,
            schedules_query,
        }
    }
}
