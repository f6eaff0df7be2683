mod catalog;
mod orders;
mod users;

use sqlx::PgPool;

use crate::error::AppError;

/// PostgreSQL-backed repositories sharing one connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps constraint violations to client errors; everything else stays a database error.
fn constraint_error(err: sqlx::Error, on_unique: &str, on_foreign_key: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::AlreadyExists(on_unique.to_string());
        }
        if db_err.is_foreign_key_violation() {
            return AppError::InvalidInput(on_foreign_key.to_string());
        }
    }
    AppError::Database(err)
}
