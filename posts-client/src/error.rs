use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostsClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

impl PostsClientError {
    /// Builds an error from a non-success response, preferring the server's
    /// `message` field over the raw body.
    pub async fn from_http_response(resp: Response) -> Self {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .ok()
            .and_then(|body| body.message)
            .unwrap_or(text);

        match status {
            StatusCode::NOT_FOUND => PostsClientError::NotFound(message),
            StatusCode::BAD_REQUEST => PostsClientError::InvalidRequest(message),
            other => PostsClientError::Server {
                status: other.as_u16(),
                message,
            },
        }
    }
}
