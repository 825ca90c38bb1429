use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use postfeed_core::{CoreError, ErrorExt, ValidationError};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

/// Error half of every handler: a status plus the `{"error", "code"}` body.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code,
            message: message.into(),
        }
    }

    /// Maps a core failure to a response. Server-side failures are logged and
    /// reported to the client as `fallback` only.
    pub fn from_core(error: CoreError, fallback: &str) -> Self {
        match &error {
            CoreError::Validation(e) => Self::from(e.clone()),
            CoreError::InvalidInput { .. } => Self {
                status: StatusCode::BAD_REQUEST,
                code: error.error_code(),
                message: error.user_friendly_message(),
            },
            CoreError::Timeout { .. } => {
                error.log_warn();
                Self {
                    status: StatusCode::GATEWAY_TIMEOUT,
                    code: error.error_code(),
                    message: error.user_friendly_message(),
                }
            }
            _ => {
                error.log_error();
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    code: error.error_code(),
                    message: fallback.to_string(),
                }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: error.error_code(),
            message: error.user_friendly_message(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postfeed_core::DatabaseError;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let error = ApiError::from_core(
            CoreError::Validation(ValidationError::LinkAndContent),
            "failed to create post",
        );
        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code, "POST_LINK_AND_CONTENT");
        assert_eq!(
            error.message,
            "a post cannot have both a link and content populated"
        );
    }

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let error = ApiError::from_core(CoreError::Timeout { seconds: 10 }, "failed");
        assert_eq!(error.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(error.code, "TIMEOUT");
    }

    #[test]
    fn test_storage_failure_hides_detail() {
        let error = ApiError::from_core(
            CoreError::Database(DatabaseError::QueryFailed {
                query: "insert post".to_string(),
            }),
            "failed to create post",
        );
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(error.message, "failed to create post");
        assert_eq!(error.code, "DATABASE");
    }
}
