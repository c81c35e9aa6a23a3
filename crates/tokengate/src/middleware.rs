//! Authentication middleware for protected routes.
//!
//! Extracts the Bearer token from the Authorization header, validates it
//! with the shared [`TokenAuthenticator`], and injects the decoded claims
//! into request extensions. On failure the request short-circuits with a
//! classified JSON error response; on success the inner service runs.
//!
//! # Wiring
//!
//! ```rust,ignore
//! let auth = Arc::new(TokenAuthenticator::<MyClaims>::hs256(secret)?.with_auto_inject(true));
//!
//! let app = Router::new()
//!     .route("/api/v1/me", get(me_handler))
//!     .route_layer(middleware::from_fn_with_state(auth, require_auth::<MyClaims>));
//! ```

use crate::authenticator::TokenAuthenticator;
use crate::claims::ClaimSet;
use crate::error::AuthError;
use crate::project::InjectedClaims;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::instrument;

const BEARER_PREFIX: &str = "Bearer ";

/// Extract the Bearer token from the Authorization header.
fn extract_bearer_token(req: &Request) -> Result<&str, AuthError> {
    let Some(value) = req.headers().get(AUTHORIZATION) else {
        tracing::debug!(target: "tokengate.middleware", "missing Authorization header");
        return Err(AuthError::MissingToken);
    };

    let value = value.to_str().map_err(|_| {
        tracing::debug!(target: "tokengate.middleware", "Authorization header is not valid UTF-8");
        AuthError::InvalidFormat
    })?;

    value.strip_prefix(BEARER_PREFIX).ok_or_else(|| {
        tracing::debug!(target: "tokengate.middleware", "Authorization header lacks Bearer prefix");
        AuthError::InvalidFormat
    })
}

/// Authentication middleware over a shared [`TokenAuthenticator`].
///
/// # Response
///
/// - 401 with a classified JSON body if the token is missing or invalid
///   (500 for a claim-shape misconfiguration)
/// - Continues to the next handler with the decoded claims in request
///   extensions if the token is valid; when auto-injection is enabled the
///   projected [`InjectedClaims`] map is stored as well
#[instrument(skip_all, name = "tokengate.middleware")]
pub async fn require_auth<C: ClaimSet>(
    State(auth): State<Arc<TokenAuthenticator<C>>>,
    mut req: Request,
    next: Next,
) -> Result<impl IntoResponse, AuthError> {
    let token = extract_bearer_token(&req)?;

    let claims = auth.parse(token)?;

    if auth.auto_inject() {
        let injected = auth.project(&claims)?;
        req.extensions_mut().insert(injected);
    }

    // The full decoded record is always available to downstream handlers.
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Extension trait for reading authentication results off a request.
///
/// Returns `None` when the auth middleware was not applied to the route
/// (or, for [`ClaimsExt::injected_claims`], when auto-injection is off).
pub trait ClaimsExt {
    /// The decoded claim record stored by [`require_auth`].
    fn claims<C: ClaimSet>(&self) -> Option<&C>;

    /// The projected claim fields stored when auto-injection is enabled.
    fn injected_claims(&self) -> Option<&InjectedClaims>;
}

impl<B> ClaimsExt for axum::http::Request<B> {
    fn claims<C: ClaimSet>(&self) -> Option<&C> {
        self.extensions().get::<C>()
    }

    fn injected_claims(&self) -> Option<&InjectedClaims> {
        self.extensions().get::<InjectedClaims>()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: &str) -> Request {
        axum::http::Request::builder()
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_missing_header_is_missing_token() {
        let req = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(
            extract_bearer_token(&req).unwrap_err(),
            AuthError::MissingToken
        );
    }

    #[test]
    fn test_header_without_bearer_prefix_is_invalid_format() {
        let req = request_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(
            extract_bearer_token(&req).unwrap_err(),
            AuthError::InvalidFormat
        );

        // The prefix check is case-sensitive and includes the space.
        let req = request_with_auth("bearer abc.def.ghi");
        assert_eq!(
            extract_bearer_token(&req).unwrap_err(),
            AuthError::InvalidFormat
        );
    }

    #[test]
    fn test_bearer_prefix_is_stripped() {
        let req = request_with_auth("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&req).unwrap(), "abc.def.ghi");
    }
}
