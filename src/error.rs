//! Error types for the peer protocol.
//!
//! Local cache operations never fail. Everything that can go wrong happens on
//! the wire: either this node fails to fetch from a peer ([`FetchError`]) or a
//! peer sends this node a request it cannot satisfy ([`ServeError`]).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Failure of an outbound fetch. Callers fall back to loading locally.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection failure or timeout.
    #[error("request to peer failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("server returned: {status}")]
    Status { status: reqwest::StatusCode },

    #[error("reading response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Failure to answer an inbound peer request.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("serving unexpected path: {0}")]
    UnexpectedPath(String),

    #[error("bad request")]
    BadRequest,

    #[error("invalid percent-encoding in segment: {0}")]
    BadEncoding(String),

    #[error("no such group: {0}")]
    NoSuchGroup(String),

    #[error("{0}")]
    Lookup(String),
}

impl ServeError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServeError::UnexpectedPath(_) | ServeError::BadRequest | ServeError::BadEncoding(_) => {
                StatusCode::BAD_REQUEST
            }
            ServeError::NoSuchGroup(_) => StatusCode::NOT_FOUND,
            ServeError::Lookup(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServeError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
