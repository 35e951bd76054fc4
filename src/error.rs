use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum LockboxError {
    #[error("access denied: {0}")]
    AuthorizationDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),
}

impl LockboxError {
    pub fn denied(reason: impl Into<String>) -> Self {
        LockboxError::AuthorizationDenied(reason.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        LockboxError::NotFound(what.into())
    }
}

/// Classifies failures worth retrying. For SQLite that is lock contention
/// (SQLITE_BUSY / SQLITE_LOCKED, primary codes 5 and 6 in any extended form)
/// plus pool exhaustion; constraint violations and everything else are final.
pub trait IsRetryable {
    fn is_retryable(&self) -> bool;
}

impl IsRetryable for LockboxError {
    fn is_retryable(&self) -> bool {
        match self {
            LockboxError::Database(SqlxError::Database(db)) => {
                let busy_code = db
                    .code()
                    .and_then(|c| c.parse::<i64>().ok())
                    .is_some_and(|c| matches!(c & 0xff, 5 | 6));
                busy_code || db.message().contains("database is locked")
            }
            LockboxError::Database(SqlxError::PoolTimedOut) => true,
            _ => false,
        }
    }
}

impl IntoResponse for LockboxError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match self {
            LockboxError::AuthorizationDenied(reason) => (
                StatusCode::FORBIDDEN,
                ApiErrorBody {
                    code: "FORBIDDEN".to_string(),
                    message: reason,
                },
            ),
            LockboxError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: what,
                },
            ),
            LockboxError::DuplicateKey(_) => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "DUPLICATE_KEY".to_string(),
                    message: "A record with that key already exists.".to_string(),
                },
            ),
            LockboxError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiErrorBody {
                    code: "INTERNAL_ERROR".to_string(),
                    message: "An internal server error occurred.".to_string(),
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
