use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::backend::ClientError;
use crate::command::DispatchError;

pub enum ApiError {
    /// The request names nothing to send.
    Validation(&'static str),
    InFlight,
    Backend(ClientError),
}

impl From<DispatchError> for ApiError {
    fn from(e: DispatchError) -> Self {
        match e {
            DispatchError::InFlight => ApiError::InFlight,
            DispatchError::Client(e) => ApiError::Backend(e),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(reason) => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(reason)),
            )
                .into_response(),
            ApiError::InFlight => (
                StatusCode::CONFLICT,
                Json(ErrorResponse::new("dispatch_in_flight")),
            )
                .into_response(),
            ApiError::Backend(e @ ClientError::MalformedResponse(_)) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("malformed_response", &e.to_string())),
            )
                .into_response(),
            ApiError::Backend(e) => (
                StatusCode::BAD_GATEWAY,
                Json(ErrorResponse::with_message("backend_error", &e.to_string())),
            )
                .into_response(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: None,
        }
    }

    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
