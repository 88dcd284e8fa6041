//! API request and response types.
//!
//! Query parameter names follow the public contract (`tipo`, `capacidad`).

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::GridError;

/// Query parameters for registering a renewable source.
#[derive(Debug, Deserialize)]
pub struct RenewableQuery {
    /// Source kind, e.g. `"solar"`.
    #[serde(rename = "tipo")]
    pub kind: String,
    /// Capacity to grant; must be > 0.
    #[serde(rename = "capacidad")]
    pub capacity: i64,
}

/// Body returned by the start endpoint.
#[derive(Debug, Serialize)]
pub struct StartResponse {
    /// `false` when the simulation was already running.
    pub started: bool,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Errors returned by request handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing request parameters.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The grid rejected the operation.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Grid(GridError::InvalidCapacity { .. } | GridError::InvalidKind { .. }) => {
                StatusCode::BAD_REQUEST
            }
            Self::Grid(GridError::InvalidScenario(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
