use std::{fmt, io};
use axum::{http::StatusCode, response::{IntoResponse, Response}};

/// Error types for the wiki application
#[derive(Debug)]
pub enum WikiError {
    Io(io::Error),
    NotFound,
    InvalidTitle,
    Template(String),
    Config(String),
}

impl From<io::Error> for WikiError {
    fn from(err: io::Error) -> Self {
        WikiError::Io(err)
    }
}

impl fmt::Display for WikiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WikiError::Io(e) => write!(f, "I/O error: {}", e),
            WikiError::NotFound => f.write_str("Not found"),
            WikiError::InvalidTitle => f.write_str("Invalid page title"),
            WikiError::Template(e) => write!(f, "Template error: {}", e),
            WikiError::Config(e) => write!(f, "Configuration error: {}", e),
        }
    }
}

impl std::error::Error for WikiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            WikiError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        match self {
            // An invalid title is indistinguishable from a missing route.
            WikiError::NotFound | WikiError::InvalidTitle => {
                (StatusCode::NOT_FOUND, "Not found").into_response()
            }
            WikiError::Io(_) | WikiError::Template(_) | WikiError::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
            }
        }
    }
}
