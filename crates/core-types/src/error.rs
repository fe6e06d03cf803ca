// In crates/core-types/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum Error {
    #[error("Invalid trade: {0}")]
    InvalidTrade(String),

    #[error("Trade {0} is already closed")]
    AlreadyClosed(uuid::Uuid),

    #[error("Unknown trade direction: {0}")]
    InvalidDirection(String),

    #[error("Unknown trade status: {0}")]
    InvalidStatus(String),
}

pub type Result<T> = std::result::Result<T, Error>;
