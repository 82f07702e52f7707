use crate::http::{HttpError, Response};
use crate::source::FetchError;
use mesh::CodecError;
use reqwest::{Method, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by the triangulation service.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("invalid point set: {0}")]
    InvalidPointSet(CodecError),
    #[error("point set has {count} points, at least 3 are required")]
    InsufficientPoints { count: usize },
    #[error("failed to encode mesh: {0}")]
    Encode(CodecError),
    #[error("no route for {0}")]
    NotFound(String),
    #[error("method {0} not allowed")]
    MethodNotAllowed(Method),
    #[error("no complete request received within {0:?}")]
    RequestTimeout(Duration),
    #[error("bad request: {0}")]
    BadRequest(#[from] HttpError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ServerError>;

impl ServerError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::Fetch(FetchError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServerError::Fetch(FetchError::Unavailable(_) | FetchError::Timeout(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServerError::Fetch(
                FetchError::Upstream { .. }
                | FetchError::InvalidUrl(_)
                | FetchError::RequestFailed(_),
            ) => StatusCode::BAD_GATEWAY,
            ServerError::InvalidPointSet(_)
            | ServerError::InsufficientPoints { .. }
            | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            ServerError::RequestTimeout(_) => StatusCode::REQUEST_TIMEOUT,
            ServerError::Encode(_) | ServerError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code for the JSON error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            ServerError::Fetch(FetchError::NotFound(_)) => "POINTSET_NOT_FOUND",
            ServerError::Fetch(FetchError::Unavailable(_) | FetchError::Timeout(_)) => {
                "POINTSET_MANAGER_UNAVAILABLE"
            }
            ServerError::Fetch(_) => "POINTSET_MANAGER_ERROR",
            ServerError::InvalidPointSet(_) => "INVALID_POINTSET",
            ServerError::InsufficientPoints { .. } => "INSUFFICIENT_POINTS",
            ServerError::BadRequest(_) => "BAD_REQUEST",
            ServerError::NotFound(_) => "NOT_FOUND",
            ServerError::MethodNotAllowed(_) => "METHOD_NOT_ALLOWED",
            ServerError::RequestTimeout(_) => "REQUEST_TIMEOUT",
            ServerError::Encode(_) | ServerError::Io(_) => "INTERNAL_ERROR",
        }
    }

    pub fn to_response(&self) -> Response {
        let response = Response::json_error(self.status(), self.code(), self.to_string());
        match self {
            ServerError::MethodNotAllowed(_) => response.with_header("Allow", "GET"),
            _ => response,
        }
    }
}
