//! Error taxonomy and HTTP response mapping.
//!
//! Three concerns, three types: [`ConfigError`] at construction,
//! [`SignError`] at issuance, [`AuthError`] per request. `AuthError`
//! carries a stable machine-readable code and maps to a JSON response via
//! `IntoResponse`, so the middleware can short-circuit with `?`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Construction-time failures. Fatal: an authenticator is never built from
/// bad key material or a non-record claim shape.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The signing key material was empty.
    #[error("signing key must not be empty")]
    EmptyKey,

    /// The key material could not be used with the configured algorithm.
    #[error("invalid signing key: {0}")]
    InvalidKey(String),

    /// The claim prototype does not serialize to a JSON object.
    #[error("claims prototype must serialize to a JSON object")]
    InvalidClaimsShape,
}

/// Token issuance failures, surfaced to the caller of `sign`.
#[derive(Debug, Error)]
pub enum SignError {
    /// The authenticator was built verify-only (no private key).
    #[error("authenticator holds no signing key")]
    MissingSigningKey,

    /// The encoder rejected the claims or the key.
    #[error("token signing failed: {0}")]
    Encoding(#[from] jsonwebtoken::errors::Error),
}

/// Per-request authentication failures.
///
/// Every variant is terminal for the request: there is no retry and no
/// partial success. Variants are distinct even where they share a response
/// code, so callers of `parse` can still tell a bad signature from an
/// algorithm mismatch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization` header on the request.
    #[error("missing Authorization header")]
    MissingToken,

    /// The header is present but is not a `Bearer` token.
    #[error("Authorization header is missing the Bearer prefix")]
    InvalidFormat,

    /// The `exp` claim is in the past (or exactly now).
    #[error("token has expired")]
    TokenExpired,

    /// The `nbf` claim is in the future.
    #[error("token is not yet valid")]
    TokenNotActive,

    /// Not three dot-separated base64url segments of valid JSON.
    #[error("token is malformed")]
    TokenMalformed,

    /// The header declares a different algorithm than configured.
    #[error("unexpected signing method")]
    UnexpectedSigningMethod,

    /// The signature segment does not verify.
    #[error("token signature is invalid")]
    SignatureInvalid,

    /// The verification key is unusable.
    #[error("invalid verification key")]
    InvalidKey,

    /// The verification key has the wrong type for the algorithm.
    #[error("wrong verification key type")]
    InvalidKeyType,

    /// The decoded claims do not form a JSON object; a misconfiguration,
    /// not a caller fault.
    #[error("claims shape is invalid")]
    InvalidClaimsShape,

    /// Any other validation failure, with the underlying message.
    #[error("token is invalid: {0}")]
    TokenInvalid(String),
}

impl AuthError {
    /// The stable machine-readable code carried in the response body.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingToken => "missing_token",
            Self::InvalidFormat => "invalid_token_format",
            Self::TokenExpired => "token_expired",
            Self::TokenNotActive => "token_not_active",
            Self::TokenMalformed => "token_malformed",
            Self::InvalidKey => "invalid_key",
            Self::InvalidKeyType => "invalid_key_type",
            Self::InvalidClaimsShape => "internal_error",
            Self::UnexpectedSigningMethod | Self::SignatureInvalid | Self::TokenInvalid(_) => {
                "token_invalid"
            }
        }
    }

    /// The HTTP status for the terminal response. All authentication
    /// failures are 401; a broken claim shape is a server misconfiguration
    /// and maps to 500.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidClaimsShape => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: &'static str,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code(),
            message: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
