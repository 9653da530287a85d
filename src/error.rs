use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Everything a handler can fail with. Each variant maps to one status
/// class at the response boundary; store and identity-provider failures
/// surface their upstream message as-is.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    MissingField(&'static str),

    #[error("Invalid request")]
    Malformed,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Invalid auth token")]
    InvalidToken,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("Target user not found")]
    TargetNotFound,

    #[error("That username is already taken.")]
    UsernameTaken,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Identity(#[from] reqwest::Error),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        use ApiError::*;
        match self {
            MissingField(_) | Malformed => StatusCode::BAD_REQUEST,
            Unauthorized | InvalidToken => StatusCode::UNAUTHORIZED,
            Forbidden => StatusCode::FORBIDDEN,
            NotFound | TargetNotFound => StatusCode::NOT_FOUND,
            UsernameTaken => StatusCode::CONFLICT,
            RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Database(_) | Identity(_) | Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<String> for ApiError {
    fn from(err: String) -> Self {
        Self::Internal(anyhow::Error::msg(err))
    }
}

impl From<&str> for ApiError {
    fn from(err: &str) -> Self {
        Self::Internal(anyhow::Error::msg(err.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(ApiError::MissingField("id is required").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Malformed.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::InvalidToken.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::TargetNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::UsernameTaken.status(), StatusCode::CONFLICT);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn conflict_keeps_its_own_message() {
        assert_eq!(ApiError::UsernameTaken.to_string(), "That username is already taken.");
    }
}
