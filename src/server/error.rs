//! API error types and JSON response formatting.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::scope::ParseScopeError;
use crate::store::StoreError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details in the response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// API error type that converts to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add details to the error.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Database not found error.
    pub fn database_not_found(name: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "DATABASE_NOT_FOUND",
            format!("Database '{}' not found", name),
        )
        .with_details(serde_json::json!({ "database": name }))
    }

    /// Send not found error.
    pub fn send_not_found(database: &str, id: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "SEND_NOT_FOUND",
            format!("Send '{}' not found in database '{}'", id, database),
        )
        .with_details(serde_json::json!({ "database": database, "id": id }))
    }

    /// No profile saved for a user.
    pub fn profile_not_found(user: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "PROFILE_NOT_FOUND",
            format!("No profile for user '{}'", user),
        )
        .with_details(serde_json::json!({ "user": user }))
    }

    /// A scope that needs a viewer was requested without one.
    pub fn missing_user(scope: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "MISSING_USER",
            format!("Scope '{}' requires a 'user' query parameter", scope),
        )
        .with_details(serde_json::json!({ "scope": scope }))
    }

    /// Request body was not a usable record.
    pub fn invalid_record(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_RECORD", message)
    }

    /// Unparseable `as_of` instant.
    pub fn invalid_timestamp(value: &str) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "INVALID_TIMESTAMP",
            format!("'{}' is not an RFC 3339 timestamp", value),
        )
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                code = self.code,
                message = %self.message,
                "server error response"
            );
        } else if self.status.is_client_error() {
            tracing::debug!(
                status = self.status.as_u16(),
                code = self.code,
                message = %self.message,
                "client error response"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
                details: self.details,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<ParseScopeError> for ApiError {
    fn from(err: ParseScopeError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_SCOPE", err.to_string())
            .with_details(serde_json::json!({ "scope": err.0 }))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match &err {
            StoreError::SendNotFound(id) => Self::new(
                StatusCode::NOT_FOUND,
                "SEND_NOT_FOUND",
                format!("Send '{}' not found", id),
            ),
            StoreError::SelfFollow(_) => {
                Self::new(StatusCode::BAD_REQUEST, "SELF_FOLLOW", err.to_string())
            }
            StoreError::AlreadyFollowing { .. } => {
                Self::new(StatusCode::CONFLICT, "ALREADY_FOLLOWING", err.to_string())
            }
            StoreError::NotFollowing { .. } => {
                Self::new(StatusCode::NOT_FOUND, "NOT_FOLLOWING", err.to_string())
            }
            StoreError::InvalidUserId(_) => {
                Self::new(StatusCode::BAD_REQUEST, "INVALID_USER_ID", err.to_string())
            }
            StoreError::EmailNotFound(email) => {
                Self::new(StatusCode::NOT_FOUND, "EMAIL_NOT_FOUND", err.to_string())
                    .with_details(serde_json::json!({ "email": email }))
            }
            StoreError::NotInitialized(path) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_NOT_INITIALIZED",
                format!("Database at '{}' is not initialized", path),
            ),
            StoreError::InvalidFormat(msg) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "CORRUPTED_VALUE",
                msg.clone(),
            ),
            _ => Self::internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn logged(err: ApiError) -> String {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            let _ = err.into_response();
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_server_errors_logged_at_error() {
        let output = logged(ApiError::from(StoreError::InvalidFormat("bad crc".into())));
        assert!(output.contains("ERROR"), "{}", output);
        assert!(output.contains("CORRUPTED_VALUE"), "{}", output);
        assert!(output.contains("server error response"), "{}", output);
    }

    #[test]
    fn test_client_errors_logged_at_debug() {
        let output = logged(ApiError::send_not_found("gym", "s1"));
        assert!(output.contains("DEBUG"), "{}", output);
        assert!(output.contains("SEND_NOT_FOUND"), "{}", output);
        assert!(!output.contains("ERROR"), "{}", output);
    }

    #[test]
    fn test_store_error_mapping() {
        let err = ApiError::from(StoreError::InvalidUserId("a\\0b".into()));
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.code, "INVALID_USER_ID");

        let err = ApiError::from(StoreError::EmailNotFound("x@example.com".into()));
        assert_eq!(err.status, StatusCode::NOT_FOUND);
        assert_eq!(err.code, "EMAIL_NOT_FOUND");
    }
}
