//! Error boundary for request handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::LoadError;

/// Failure that reaches the top of a request
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The resolved document failed to load
    #[error("Failed to load temp page: {0}")]
    Load(#[from] LoadError),

    /// A page template failed to render
    #[error("Template error: {0}")]
    Template(anyhow::Error),
}

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Load(LoadError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                StatusCode::NOT_FOUND
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Plain-text rendering, used when the error page itself cannot be rendered
impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
