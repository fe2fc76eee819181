//! HTTP error mapping
//!
//! Every failure leaves the server as `{ "error": { "code", "message" } }`
//! with a status derived from the error kind.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use poker_application::PokerError;
use poker_domain::{DomainError, ErrorKind};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

/// An error on its way to becoming an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: String,
    message: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "not_found".to_string(),
            message: message.into(),
        }
    }

    fn invalid_input(status: StatusCode, message: String) -> Self {
        Self {
            status,
            code: "invalid_input".to_string(),
            message,
        }
    }
}

/// Status for an error kind; unclassified errors are internal.
pub fn status_for(kind: Option<ErrorKind>) -> StatusCode {
    match kind {
        Some(ErrorKind::NotFound) => StatusCode::NOT_FOUND,
        Some(ErrorKind::InvalidInput) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::IllegalTransition) => StatusCode::CONFLICT,
        Some(ErrorKind::Closed) => StatusCode::GONE,
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<PokerError> for ApiError {
    fn from(e: PokerError) -> Self {
        let status = status_for(e.kind());
        if status.is_server_error() {
            error!("Request failed: {}", e);
        }
        Self {
            status,
            code: e.code().to_string(),
            message: e.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(e: DomainError) -> Self {
        PokerError::from(e).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_input(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_input(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::invalid_input(StatusCode::BAD_REQUEST, format!("Invalid JSON body: {}", e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorEnvelope {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::SessionNotFound("000001".into()), StatusCode::NOT_FOUND),
            (DomainError::InvalidCard("7".into()), StatusCode::BAD_REQUEST),
            (
                DomainError::IllegalTransition("not revealed".into()),
                StatusCode::CONFLICT,
            ),
            (DomainError::SessionAlreadyClosed("000001".into()), StatusCode::GONE),
        ];
        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status(), status);
        }
    }

    #[test]
    fn test_remote_and_internal_errors() {
        let remote = PokerError::Remote {
            kind: ErrorKind::Closed,
            code: "session_already_closed".into(),
            message: "closed".into(),
        };
        let api = ApiError::from(remote);
        assert_eq!(api.status(), StatusCode::GONE);
        assert_eq!(api.code(), "session_already_closed");

        let api = ApiError::from(PokerError::CodeSpaceExhausted(64));
        assert_eq!(api.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api.code(), "code_space_exhausted");
    }
}
