//! Response envelope and error mapping.
//!
//! Every body, success or failure, is `{"code", "message", "data"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use memo_core::{MemoError, PolicyError};
use serde::Serialize;

/// JSON envelope wrapping every response body
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// HTTP status code, repeated for clients that only read bodies
    pub code: u16,
    /// Human readable outcome
    pub message: String,
    /// Payload; `null` for failures and empty results
    pub data: Option<T>,
}

/// Successful response carrying `data`
#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// `200 OK` with a payload
    pub fn ok(data: T) -> Self {
        Self {
            status: StatusCode::OK,
            data: Some(data),
        }
    }

    /// `201 Created` with a payload
    pub fn created(data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// `200 OK` without a payload
    pub fn empty() -> Self {
        Self {
            status: StatusCode::OK,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = Envelope {
            code: self.status.as_u16(),
            message: "success".to_string(),
            data: self.data,
        };
        (self.status, Json(body)).into_response()
    }
}

/// Failed request
#[derive(Debug)]
pub struct ApiError(pub MemoError);

impl ApiError {
    /// Rejected request input
    pub fn invalid(message: impl Into<String>) -> Self {
        Self(MemoError::invalid(message))
    }

    /// Status code for the wrapped error
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            MemoError::Invalid { .. } => StatusCode::BAD_REQUEST,
            MemoError::Unauthenticated { .. } => StatusCode::FORBIDDEN,
            MemoError::Policy(PolicyError::AmbiguousOwner) => StatusCode::NOT_ACCEPTABLE,
            MemoError::NotFound { .. } => StatusCode::NOT_FOUND,
            MemoError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<MemoError> for ApiError {
    fn from(error: MemoError) -> Self {
        Self(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "memo request failed");
        }
        let body = Envelope::<()> {
            code: status.as_u16(),
            message: self.0.to_string(),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

/// Handler result type
pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;
