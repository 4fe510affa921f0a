//! Custom Axum extractors.
//!
//! Provides `SessionId`, which identifies the visitor a cart belongs to via
//! the `X-Session-Id` header.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

pub const SESSION_HEADER: &str = "x-session-id";

/// Session id carried in the `X-Session-Id` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Errors returned by the [`SessionId`] extractor.
#[derive(Debug, thiserror::Error)]
pub enum SessionIdError {
    #[error("missing X-Session-Id header")]
    Missing,
    #[error("X-Session-Id header is not a UUID")]
    Invalid,
}

impl IntoResponse for SessionIdError {
    fn into_response(self) -> Response {
        let status = match self {
            SessionIdError::Missing => StatusCode::UNAUTHORIZED,
            SessionIdError::Invalid => StatusCode::BAD_REQUEST,
        };
        (status, self.to_string()).into_response()
    }
}

impl<S: Send + Sync> FromRequestParts<S> for SessionId {
    type Rejection = SessionIdError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(SESSION_HEADER)
            .ok_or(SessionIdError::Missing)?
            .to_str()
            .map_err(|_| SessionIdError::Invalid)?;
        Uuid::parse_str(value.trim())
            .map(SessionId)
            .map_err(|_| SessionIdError::Invalid)
    }
}
