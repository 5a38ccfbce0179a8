//! Embedded schema migrations.
//!
//! Migrations under `backend/migrations` are compiled into the binary and
//! applied at startup over a short-lived synchronous connection, run on the
//! blocking pool so the async runtime stays responsive.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// Every migration shipped with this build.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Errors raised while applying migrations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// The migration connection could not be opened.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },

    /// A migration failed or the migration task died.
    #[error("failed to apply migrations: {message}")]
    Apply { message: String },
}

impl MigrationError {
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn apply(message: impl Into<String>) -> Self {
        Self::Apply {
            message: message.into(),
        }
    }
}

/// Apply every pending migration and return how many ran.
///
/// # Errors
///
/// Returns [`MigrationError::Connection`] when the database is unreachable and
/// [`MigrationError::Apply`] when a migration fails.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let database_url = database_url.to_owned();
    let applied = tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|err| MigrationError::connection(err.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map(|versions| versions.len())
            .map_err(|err| MigrationError::apply(err.to_string()))
    })
    .await
    .map_err(|err| MigrationError::apply(format!("migration task failed: {err}")))??;

    info!(applied, "database migrations applied");
    Ok(applied)
}
