//! Error types for database probing.

use thiserror::Error;

/// Failure of a single probe against the database.
///
/// The check pipeline never lets these escape: each one becomes the failure
/// of the check that issued the probe.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A query was issued before `connect` succeeded.
    #[error("not connected to the database")]
    NotConnected,

    /// The connection descriptor could not be turned into a Postgres URL.
    #[error("invalid database DSN: {0}")]
    InvalidDsn(String),

    /// The statement itself failed (missing function, bad SQL, dropped link).
    #[error("query failed: {0}")]
    Query(#[from] sqlx::Error),
}
