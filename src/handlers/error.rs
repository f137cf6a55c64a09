//! Error responses.
//!
//! Clients receive `{"error": "<message>"}`. Internal detail is logged where
//! the failure happens and never reaches the body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::config::StatusCodePolicy;
use crate::repository::OperationError;

/// No route matches the verb and operation name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("method not allowed")]
pub struct UnhandledOperation;

/// Response body for every failure.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Status code for an operation failure under `policy`.
pub fn status_for(policy: StatusCodePolicy, err: &OperationError) -> StatusCode {
    match policy {
        StatusCodePolicy::Uniform => StatusCode::BAD_REQUEST,
        StatusCodePolicy::Split => match err {
            OperationError::InvalidInput => StatusCode::BAD_REQUEST,
            OperationError::NotFound | OperationError::DoesNotExist => StatusCode::NOT_FOUND,
            OperationError::AlreadyExists => StatusCode::CONFLICT,
            OperationError::FetchFailed
            | OperationError::DecodeFailed
            | OperationError::EncodeFailed
            | OperationError::WriteFailed
            | OperationError::DeleteFailed => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

pub fn operation_error(policy: StatusCodePolicy, err: OperationError) -> Response {
    error_response(status_for(policy, &err), err.to_string())
}

impl IntoResponse for UnhandledOperation {
    fn into_response(self) -> Response {
        error_response(StatusCode::METHOD_NOT_ALLOWED, self.to_string())
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorBody { error: message })).into_response()
}
