use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::{ErrorCode, PearlError};
use crate::output;

pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::ValidationError | ErrorCode::DecodeError | ErrorCode::InvalidId => {
            StatusCode::BAD_REQUEST
        }
        ErrorCode::TaskNotFound => StatusCode::NOT_FOUND,
        ErrorCode::NotInitialized | ErrorCode::DatabaseError | ErrorCode::ConfigError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for PearlError {
    fn into_response(self) -> Response {
        let status = status_for(self.code);
        if status.is_server_error() {
            tracing::error!(code = self.code.as_str(), error = %self.message, "request failed");
        } else {
            tracing::debug!(code = self.code.as_str(), error = %self.message, "request rejected");
        }
        (status, Json(output::json::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(ErrorCode::InvalidId), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::DecodeError), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorCode::TaskNotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_for(ErrorCode::DatabaseError), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_response_status() {
        let response = PearlError::task_not_found("x").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
