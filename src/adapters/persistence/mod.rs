use sqlx::PgPool;

use crate::app_error::AppError;

pub mod applications;
pub mod content;
pub mod sequences;
pub mod users;
pub mod voices;

/// The one Postgres-backed implementation of every repository port.
#[derive(Clone)]
pub struct PostgresPersistence {
    pub pool: PgPool,
}

impl PostgresPersistence {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error, translating a named unique-constraint violation
/// into the given domain error instead of a generic database failure.
pub(crate) fn map_constraint(
    e: sqlx::Error,
    constraint: &str,
    mapped: impl FnOnce() -> AppError,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.constraint() == Some(constraint)
    {
        return mapped();
    }
    AppError::from(e)
}
