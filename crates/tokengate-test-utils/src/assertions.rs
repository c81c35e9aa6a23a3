//! Custom test assertions for expressive tests.

use axum::http::StatusCode;
use axum::response::Response;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use http_body_util::BodyExt;
use serde_json::Value;

/// Custom assertions on raw token strings.
///
/// # Example
/// ```rust,ignore
/// token
///     .assert_three_segments()
///     .assert_signed_with("HS256")
///     .assert_claim("username", &json!("alice"));
/// ```
pub trait TokenAssertions {
    /// Assert that the token has the header.claims.signature structure.
    fn assert_three_segments(&self) -> &Self;

    /// Assert that the token header declares the given algorithm.
    fn assert_signed_with(&self, alg: &str) -> &Self;

    /// Assert that the claims segment contains the given value.
    fn assert_claim(&self, key: &str, expected: &Value) -> &Self;
}

impl TokenAssertions for String {
    fn assert_three_segments(&self) -> &Self {
        let parts: Vec<_> = self.split('.').collect();
        assert_eq!(
            parts.len(),
            3,
            "token must have 3 segments (header.claims.signature), got {}",
            parts.len()
        );
        self
    }

    fn assert_signed_with(&self, alg: &str) -> &Self {
        let header = decode_segment(self, 0);
        assert_eq!(
            header["alg"], *alg,
            "expected token signed with {alg}, header was {header}"
        );
        assert_eq!(header["typ"], "JWT");
        self
    }

    fn assert_claim(&self, key: &str, expected: &Value) -> &Self {
        let claims = decode_segment(self, 1);
        assert_eq!(
            &claims[key], expected,
            "claim {key} mismatch in payload {claims}"
        );
        self
    }
}

fn decode_segment(token: &str, index: usize) -> Value {
    let segment = token
        .split('.')
        .nth(index)
        .unwrap_or_else(|| panic!("token has no segment {index}"));
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .expect("segment is not valid base64url");
    serde_json::from_slice(&bytes).expect("segment is not valid JSON")
}

/// Assert an authentication failure response: status plus the stable
/// machine-readable code in the JSON body. Returns the parsed body for
/// further assertions.
///
/// # Panics
///
/// Panics when status, body shape, or code do not match.
pub async fn assert_auth_error(
    response: Response,
    expected_status: StatusCode,
    expected_code: &str,
) -> Value {
    assert_eq!(response.status(), expected_status);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read response body")
        .to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("response body is not JSON");

    assert_eq!(
        body["error"], *expected_code,
        "unexpected error code in body {body}"
    );
    assert!(
        body["message"].is_string(),
        "error body must carry a human-readable message: {body}"
    );
    body
}
