use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

/// Postgres SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("storage unreachable")]
    Unavailable,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        // 500 details stay server-side only.
        let message = match &self {
            ApiError::Internal(e) => {
                error!(error = %e, "internal error");
                "internal error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Any body the extractor cannot turn into a payload is malformed input:
/// bad syntax, wrong field type, or a missing json content-type all map to
/// the same 400 as a failed field check.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

/// Single classification point for storage errors. A uniqueness violation on
/// the email column becomes a 409; a missing row becomes a 404; everything
/// else is an opaque 500.
impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => ApiError::NotFound("user not found".into()),
            sqlx::Error::Database(db) if is_unique_violation(db.code().as_deref(), db.message()) => {
                ApiError::Conflict("email already exists".into())
            }
            _ => ApiError::Internal(e.into()),
        }
    }
}

/// Structured SQLSTATE check first; substring match on the driver message only
/// when no code is available.
pub fn is_unique_violation(code: Option<&str>, message: &str) -> bool {
    match code {
        Some(code) => code == UNIQUE_VIOLATION,
        None => {
            let msg = message.to_ascii_lowercase();
            msg.contains("duplicate key") || msg.contains("unique constraint")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_by_sqlstate() {
        assert!(is_unique_violation(Some("23505"), "whatever"));
        assert!(!is_unique_violation(Some("23503"), "whatever"));
    }

    #[test]
    fn unique_violation_by_message_fallback() {
        assert!(is_unique_violation(
            None,
            "ERROR: duplicate key value violates unique constraint \"users_email_key\""
        ));
        assert!(is_unique_violation(None, "UNIQUE constraint failed: users.email"));
        assert!(!is_unique_violation(None, "connection reset by peer"));
    }

    #[test]
    fn sqlstate_takes_precedence_over_message() {
        // A non-unique code with a misleading message must not classify as
        // a conflict.
        assert!(!is_unique_violation(Some("57014"), "duplicate key"));
    }

    #[test]
    fn row_not_found_maps_to_404() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn statuses_match_taxonomy() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict("x".into()).status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::Unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
