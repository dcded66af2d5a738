use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use shutter::errors::ShutterError;
use thiserror::Error;

/// Domain errors surfaced by the API layer.
///
/// Store-level "not found" values are translated into these; they never
/// escape as store errors. Store failures (persistence problems) map to an
/// opaque 500.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not authenticated")]
    NotAuthenticated,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Invalid username")]
    InvalidUsername,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Invalid postId")]
    InvalidPostId,
    #[error("Invalid commentId")]
    InvalidCommentId,
    #[error("Not found")]
    NotFound,
    #[error("Comment does not belong to any known post")]
    OrphanComment,
    #[error("Invalid userId at {0}")]
    BrokenReference(String),
    #[error(transparent)]
    Store(#[from] ShutterError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAuthenticated | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::PermissionDenied => StatusCode::FORBIDDEN,
            ApiError::InvalidUsername => StatusCode::BAD_REQUEST,
            ApiError::UsernameTaken => StatusCode::CONFLICT,
            ApiError::InvalidPostId | ApiError::InvalidCommentId | ApiError::NotFound => {
                StatusCode::NOT_FOUND
            }
            ApiError::OrphanComment
            | ApiError::BrokenReference(_)
            | ApiError::Store(_)
            | ApiError::Io(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            log::error!("Request failed: {:?}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_carry_user_facing_messages() {
        assert_eq!(ApiError::NotAuthenticated.to_string(), "Not authenticated");
        assert_eq!(ApiError::InvalidPostId.to_string(), "Invalid postId");
        assert_eq!(
            ApiError::BrokenReference("post(p1).author".to_string()).to_string(),
            "Invalid userId at post(p1).author"
        );
    }

    #[test]
    fn statuses_match_the_error_class() {
        assert_eq!(ApiError::NotAuthenticated.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::PermissionDenied.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::UsernameTaken.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::InvalidPostId.status(), StatusCode::NOT_FOUND);
    }
}
