//! Builder patterns for test data construction.
//!
//! Provides a fluent API for creating test claims with sane defaults.

use crate::claims::TestClaims;
use chrono::{Duration, Utc};
use tokengate::RegisteredClaims;

/// Builder for creating test claims.
///
/// # Example
/// ```rust,ignore
/// let claims = TestTokenBuilder::new()
///     .for_user("alice")
///     .with_role("admin")
///     .expires_in(3600)
///     .build();
/// ```
pub struct TestTokenBuilder {
    uid: u64,
    name: String,
    role: String,
    exp: Option<i64>,
    nbf: Option<i64>,
    iat: i64,
}

impl TestTokenBuilder {
    /// Create a new builder with defaults: user `alice`, role `admin`,
    /// expiry one hour out.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            uid: 42,
            name: "alice".to_string(),
            role: "admin".to_string(),
            exp: Some((now + Duration::seconds(3600)).timestamp()),
            nbf: None,
            iat: now.timestamp(),
        }
    }

    /// Set the user name.
    pub fn for_user(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the numeric user id.
    pub fn with_uid(mut self, uid: u64) -> Self {
        self.uid = uid;
        self
    }

    /// Set the role.
    pub fn with_role(mut self, role: &str) -> Self {
        self.role = role.to_string();
        self
    }

    /// Set expiration in seconds from now.
    pub fn expires_in(mut self, seconds: i64) -> Self {
        self.exp = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    /// Set an expiration that passed the given number of seconds ago.
    pub fn expired_since(mut self, seconds: i64) -> Self {
        self.exp = Some((Utc::now() - Duration::seconds(seconds)).timestamp());
        self
    }

    /// Drop the expiration claim entirely.
    pub fn without_expiry(mut self) -> Self {
        self.exp = None;
        self
    }

    /// Set a not-before time the given number of seconds in the future.
    pub fn not_valid_for(mut self, seconds: i64) -> Self {
        self.nbf = Some((Utc::now() + Duration::seconds(seconds)).timestamp());
        self
    }

    /// Build the claims.
    pub fn build(self) -> TestClaims {
        TestClaims {
            uid: self.uid,
            name: self.name,
            role: self.role,
            registered: RegisteredClaims {
                exp: self.exp,
                nbf: self.nbf,
                iat: Some(self.iat),
                ..RegisteredClaims::default()
            },
        }
    }
}

impl Default for TestTokenBuilder {
    fn default() -> Self {
        Self::new()
    }
}
