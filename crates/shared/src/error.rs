//! Error types for FleetDesk storage collaborators

use thiserror::Error;

/// Failure reported by a tenant or record store.
///
/// Legitimate absence is never an error; stores return `Ok(None)` instead.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or did not answer in time
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness constraint was violated
    #[error("Conflict: {0}")]
    Conflict(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                // PostgreSQL unique violation
                if db_err.code().as_deref() == Some("23505") {
                    return StoreError::Conflict(db_err.message().to_string());
                }
                StoreError::Unavailable(db_err.to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}
