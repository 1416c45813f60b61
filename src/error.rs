use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use tracing::{error, warn};

/// Server-side error taxonomy, mapped to HTTP statuses by the central
/// `IntoResponse` impl. Internal faults are logged in full and masked
/// in the response body.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed request payload (400)
    #[error("{0}")]
    Validation(String),

    /// Unknown recording id or missing blob (404)
    #[error("{0}")]
    NotFound(String),

    /// Requested byte range cannot be satisfied (416)
    #[error("range not satisfiable")]
    RangeNotSatisfiable {
        /// Total blob length, reported in `Content-Range: bytes */len`
        len: u64,
    },

    /// Caller exceeded the summary request budget (429)
    #[error("too many summary requests, try again later")]
    RateLimited,

    /// Language-model provider failed after all retry attempts (502)
    #[error("summary generation failed: {0}")]
    Upstream(String),

    /// Anything else; logged with full context, message hidden (500)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::RangeNotSatisfiable { len } => {
                let mut response = (
                    StatusCode::RANGE_NOT_SATISFIABLE,
                    Json(ErrorBody {
                        error: self.to_string(),
                    }),
                )
                    .into_response();
                if let Ok(value) = format!("bytes */{len}").parse() {
                    response.headers_mut().insert(header::CONTENT_RANGE, value);
                }
                return response;
            }
            AppError::RateLimited => {
                warn!("summary request rejected: rate limit exceeded");
                (StatusCode::TOO_MANY_REQUESTS, self.to_string())
            }
            AppError::Upstream(msg) => {
                error!("upstream provider failure: {}", msg);
                (StatusCode::BAD_GATEWAY, self.to_string())
            }
            AppError::Internal(err) => {
                error!("internal error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
