//! HTTP error type.
//!
//! [`ApiError`] maps library errors and handler-level rejections to status
//! codes. Bodies are short plain-text messages.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

#[derive(Debug)]
pub enum ApiError {
    /// Malformed client input (empty password, non-numeric job ID).
    BadRequest(&'static str),
    /// The job has not completed, or never existed.
    NotFound,
    /// The service is draining.
    Forbidden,
    /// Anything that is not the client's fault.
    Internal(String),
}

impl From<hashjob::Error> for ApiError {
    fn from(err: hashjob::Error) -> Self {
        match &err {
            hashjob::Error::InvalidRequest { .. } => ApiError::BadRequest("Bad Request"),
            hashjob::Error::ServiceShutdown => ApiError::Forbidden,
            hashjob::Error::IdsExhausted => ApiError::Internal(err.to_string()),
            hashjob::Error::ChannelError { context } => ApiError::Internal(context.clone()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            ApiError::NotFound => (
                StatusCode::NOT_FOUND,
                "Password has not been hashed".to_string(),
            ),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden".to_string()),
            ApiError::Internal(_detail) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Internal error: {}", _detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, message).into_response()
    }
}
