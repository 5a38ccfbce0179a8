//! Builders wiring repository adapters into the shared HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use rota::domain::ports::{
    DoctorRepository, FixtureLoginService, ResourceBoundsRepository, ScheduleRepository,
    ShiftAssignmentRepository,
};
use rota::domain::{
    DoctorRegistryService, GeneratorOptions, PeriodLocks, ResourceBoundsService, ScheduleService,
    ScheduleStores,
};
use rota::inbound::http::state::{HttpState, HttpStatePorts};
use rota::outbound::memory::InMemoryRotaStore;
use rota::outbound::persistence::{
    DbPool, DieselDoctorRepository, DieselResourceBoundsRepository, DieselScheduleRepository,
    DieselShiftAssignmentRepository,
};
use tracing::info;

use super::ServerConfig;

/// Build every driving port over one set of repositories.
fn ports_from_stores<S, D, B, A>(
    stores: ScheduleStores<S, D, B, A>,
    clock: Arc<dyn Clock>,
    options: GeneratorOptions,
) -> HttpStatePorts
where
    S: ScheduleRepository + 'static,
    D: DoctorRepository + 'static,
    B: ResourceBoundsRepository + 'static,
    A: ShiftAssignmentRepository + 'static,
{
    let locks = Arc::new(PeriodLocks::default());
    let doctors = Arc::new(DoctorRegistryService::new(
        stores.doctors.clone(),
        stores.assignments.clone(),
    ));
    let bounds = Arc::new(
        ResourceBoundsService::new(
            stores.schedules.clone(),
            stores.doctors.clone(),
            stores.bounds.clone(),
        )
        .with_period_locks(locks.clone()),
    );
    let schedules =
        Arc::new(ScheduleService::new(stores, clock, options).with_period_locks(locks));
    HttpStatePorts {
        login: Arc::new(FixtureLoginService),
        doctors,
        bounds,
        schedules: schedules.clone(),
        schedules_query: schedules,
    }
}

fn diesel_stores(
    pool: &DbPool,
) -> ScheduleStores<
    DieselScheduleRepository,
    DieselDoctorRepository,
    DieselResourceBoundsRepository,
    DieselShiftAssignmentRepository,
> {
    ScheduleStores {
        schedules: Arc::new(DieselScheduleRepository::new(pool.clone())),
        doctors: Arc::new(DieselDoctorRepository::new(pool.clone())),
        bounds: Arc::new(DieselResourceBoundsRepository::new(pool.clone())),
        assignments: Arc::new(DieselShiftAssignmentRepository::new(pool.clone())),
    }
}

fn memory_stores(
    store: &Arc<InMemoryRotaStore>,
) -> ScheduleStores<InMemoryRotaStore, InMemoryRotaStore, InMemoryRotaStore, InMemoryRotaStore> {
    ScheduleStores {
        schedules: store.clone(),
        doctors: store.clone(),
        bounds: store.clone(),
        assignments: store.clone(),
    }
}

/// Build the HTTP state over PostgreSQL when a pool is configured, otherwise
/// over a fresh in-memory store.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let ports = match &config.db_pool {
        Some(pool) => ports_from_stores(diesel_stores(pool), clock, config.generator),
        None => {
            info!("no database configured; rosters are kept in memory");
            let store = Arc::new(InMemoryRotaStore::new());
            ports_from_stores(memory_stores(&store), clock, config.generator)
        }
    };
    web::Data::new(HttpState::new(ports))
}
