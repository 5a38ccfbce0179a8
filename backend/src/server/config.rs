//! Server settings assembled by `main` before the listener starts.

use std::net::SocketAddr;

use actix_session::SessionMiddleware;
use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use rota::domain::GeneratorOptions;
use rota::inbound::http::session_config::SessionSettings;
use rota::outbound::persistence::DbPool;

#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;

/// Lifetime of an idle session cookie.
const SESSION_TTL_HOURS: i64 = 2;

/// Attributes of the encrypted `session` cookie.
#[derive(Clone)]
pub struct SessionCookie {
    key: Key,
    secure: bool,
    same_site: SameSite,
}

impl SessionCookie {
    pub fn new(key: Key, secure: bool, same_site: SameSite) -> Self {
        Self {
            key,
            secure,
            same_site,
        }
    }

    /// Session middleware issuing this cookie on `/`.
    pub(crate) fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name("session".into())
            .cookie_path("/".into())
            .cookie_secure(self.secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

impl From<SessionSettings> for SessionCookie {
    fn from(settings: SessionSettings) -> Self {
        Self::new(settings.key, settings.cookie_secure, settings.same_site)
    }
}

/// Everything [`super::create_server`] needs.
pub struct ServerConfig {
    pub(crate) session: SessionCookie,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) generator: GeneratorOptions,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// In-memory storage and default generator options until overridden.
    #[must_use]
    pub fn new(session: impl Into<SessionCookie>, bind_addr: SocketAddr) -> Self {
        Self {
            session: session.into(),
            bind_addr,
            db_pool: None,
            generator: GeneratorOptions::default(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Store doctors, schedules, bounds, and shifts in PostgreSQL.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_generator_options(mut self, options: GeneratorOptions) -> Self {
        self.generator = options;
        self
    }

    #[cfg(feature = "metrics")]
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}
