// In crates/web-server/src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Trade store error: {0}")]
    Database(#[from] database::Error),

    #[error("Failed to bind server address: {0}")]
    ServerBindError(std::io::Error),

    #[error("Server terminated: {0}")]
    Serve(std::io::Error),
}

impl From<core_types::Error> for Error {
    fn from(err: core_types::Error) -> Self {
        Error::BadRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Database(_) | Error::ServerBindError(_) | Error::Serve(_) => {
                tracing::error!(error = %self, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
