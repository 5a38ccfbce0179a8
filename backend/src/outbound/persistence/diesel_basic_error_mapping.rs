//! Shared Diesel error mapping for the rota repositories.
//!
//! Every repository port error has `Connection` and `Query` variants; the
//! doctor and schedule ports add a duplicate variant raised from unique
//! constraint violations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

fn log_diesel_error(error: &DieselError) {
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(error),
            "diesel operation failed"
        ),
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; only a closed
/// connection is reported as a connection failure.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    log_diesel_error(&error);

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            connection("database connection error")
        }
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}

/// As [`map_basic_diesel_error`], routing unique violations to `duplicate`.
pub fn map_unique_diesel_error<E, Q, C, D>(
    error: DieselError,
    query: Q,
    connection: C,
    duplicate: D,
) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
    D: FnOnce() -> E,
{
    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        debug!(
            constraint = info.constraint_name(),
            message = info.message(),
            "unique constraint violated"
        );
        return duplicate();
    }
    map_basic_diesel_error(error, query, connection)
}
