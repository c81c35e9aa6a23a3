//! JWT authentication middleware for axum.
//!
//! `tokengate` signs and validates JWTs for a statically declared claim
//! type and adapts validation to an axum request pipeline: a request either
//! fully authenticates and continues with its decoded claims in request
//! extensions, or is rejected with a classified JSON error response.
//!
//! # Example
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use tokengate::{ClaimSet, FieldSpec, RegisteredClaims, TokenAuthenticator};
//!
//! #[derive(Clone, Default, Serialize, Deserialize)]
//! struct MyClaims {
//!     user_id: u64,
//!     role: String,
//!     #[serde(flatten)]
//!     registered: RegisteredClaims,
//! }
//!
//! impl ClaimSet for MyClaims {
//!     const FIELDS: &'static [FieldSpec] = &[
//!         FieldSpec::new("user_id"),
//!         FieldSpec::new("role"),
//!         FieldSpec::new("registered").reserved(),
//!     ];
//!
//!     fn registered(&self) -> &RegisteredClaims {
//!         &self.registered
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let auth = TokenAuthenticator::<MyClaims>::hs256("my-32-byte-long-secret-key-123456")?
//!     .with_auto_inject(true);
//!
//! let claims = MyClaims {
//!     user_id: 42,
//!     role: "admin".to_string(),
//!     registered: RegisteredClaims::issued_now().expires_in(chrono::Duration::hours(24)),
//! };
//!
//! let token = auth.sign(&claims)?;
//! let decoded = auth.parse(&token)?;
//! assert_eq!(decoded.user_id, 42);
//! # Ok(())
//! # }
//! ```
//!
//! For route protection, share the authenticator behind an `Arc` and apply
//! [`middleware::require_auth`] with `axum::middleware::from_fn_with_state`.

#![warn(clippy::pedantic)]

/// Signing algorithm identifiers.
pub mod algorithm;

/// Token issuance and validation.
pub mod authenticator;

/// Claim model and field descriptors.
pub mod claims;

/// Deserializable configuration surface.
pub mod config;

/// Error taxonomy and HTTP response mapping.
pub mod error;

/// Key material supplied at construction.
pub mod key;

/// Axum middleware for protected routes.
pub mod middleware;

/// Field-to-context projection.
pub mod project;

pub use algorithm::{KeyFamily, SigningAlgorithm, UnknownAlgorithm};
pub use authenticator::{TokenAuthenticator, MAX_TOKEN_SIZE_BYTES};
pub use claims::{Audience, ClaimSet, FieldSpec, RegisteredClaims};
pub use config::AuthConfig;
pub use error::{AuthError, ConfigError, SignError};
pub use key::KeyMaterial;
pub use middleware::{require_auth, ClaimsExt};
pub use project::InjectedClaims;
