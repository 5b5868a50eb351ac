use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("Post not found with id: {0}")]
    PostNotFound(i64),
    #[error("internal error: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        DomainError::InvalidInput(message.into())
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: &'a str,
}

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self {
            DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DomainError::PostNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        // internal details stay in the logs
        let message = match self {
            DomainError::Internal(_) => "An unexpected error occurred".to_string(),
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: status.canonical_reason().unwrap_or("Error"),
            message: message.as_str(),
        };
        HttpResponse::build(status).json(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_kinds_to_status_codes() {
        assert_eq!(
            DomainError::invalid_input("bad").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DomainError::PostNotFound(7).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DomainError::Internal("db down".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(
            DomainError::PostNotFound(42).to_string(),
            "Post not found with id: 42"
        );
    }
}
