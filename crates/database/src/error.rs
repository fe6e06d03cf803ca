// In crates/database/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to connect to the database: {0}")]
    ConnectionError(sqlx::Error),
    #[error("Database migration failed: {0}")]
    MigrateError(#[from] sqlx::migrate::MigrateError),
    #[error("Database operation failed: {0}")]
    OperationFailed(sqlx::Error),
    #[error("Stored trade row is malformed: {0}")]
    CorruptRow(#[from] core_types::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
