//! Shared database helpers for HuddleUp repositories

/// Postgres SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// True when the error is a Postgres unique constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}
