//! Test utilities for tokengate.
//!
//! Provides a reference claim type, fluent token builders, keypair
//! fixtures, signature-tampering helpers, and response assertions. This
//! crate is a dev-dependency of `tokengate` itself and is available to any
//! consumer that wants ready-made fixtures for its own auth tests.

/// Reference claim type exercising every field-descriptor tier.
pub mod claims;

/// Builder patterns for test claim construction.
pub mod token_builders;

/// Deterministically shaped key fixtures.
pub mod keys;

/// Token corruption helpers.
pub mod tamper;

/// Custom assertions for tokens and auth responses.
pub mod assertions;

pub use assertions::{assert_auth_error, TokenAssertions};
pub use claims::TestClaims;
pub use keys::{generate_ed25519_fixture, hmac_secret, Ed25519Fixture};
pub use tamper::flip_signature_bit;
pub use token_builders::TestTokenBuilder;
