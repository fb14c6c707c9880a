use diesel::result::Error as DbError;
use diesel::ConnectionError;
use serde_json::json;
use thiserror::Error;
use tracing::error;
use warp::http::StatusCode;
use warp::reply::{self, Reply, Response};

/// Everything a request handler can fail with. Validation problems carry a
/// user-visible message; database problems are logged and hidden behind a
/// generic reply.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Unauthorized access. Please log in.")]
    Unauthorized,

    #[error("Unauthorized access. Admin privileges required.")]
    Forbidden,

    #[error("No badge artwork found for submission ID {0}.")]
    InvalidCandidate(i32),

    #[error("{0} not found.")]
    NotFound(&'static str),

    #[error("Submissions are currently closed. You cannot submit at this time.")]
    WindowClosed,

    #[error("{0}")]
    Validation(String),

    #[error("database failure")]
    Persistence(#[from] DbError),

    #[error("database unavailable")]
    Connect(#[from] ConnectionError),
}

pub fn validation(message: impl Into<String>) -> Error {
    Error::Validation(message.into())
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::Forbidden => StatusCode::FORBIDDEN,
            Error::InvalidCandidate(_) | Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::WindowClosed => StatusCode::FORBIDDEN,
            Error::Persistence(_) | Error::Connect(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Render as a JSON error reply. Persistence causes never reach the
    /// client; they are logged here and replaced with a generic message.
    pub fn into_response(self) -> Response {
        let message = match &self {
            Error::Persistence(source) => {
                error!(%source, "database error while handling request");
                String::from("An error occurred. Please try again.")
            }
            Error::Connect(source) => {
                error!(%source, "could not open database connection");
                String::from("An error occurred. Please try again.")
            }
            other => other.to_string(),
        };
        let status = self.status();
        reply::with_status(reply::json(&json!({ "error": message })), status).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_taxonomy() {
        assert_eq!(Error::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(Error::InvalidCandidate(7).status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::NotFound("badge").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            Error::Persistence(DbError::NotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_candidate_names_the_offender() {
        let message = Error::InvalidCandidate(42).to_string();
        assert!(message.contains("42"));
    }
}
