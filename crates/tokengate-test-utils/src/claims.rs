//! Reference claim type for tests.
//!
//! `TestClaims` exercises every tier of the context-key resolution: an
//! explicit inject alias (`uid` -> `user_id`), a serde rename (`name` ->
//! `username`), a bare field (`role`), and a reserved registered block.

use serde::{Deserialize, Serialize};
use tokengate::{ClaimSet, FieldSpec, RegisteredClaims};

/// Claim type used across tokengate's own tests.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestClaims {
    /// Injected under the alias `user_id`.
    pub uid: u64,

    /// Serialized (and injected) as `username`.
    #[serde(rename = "username")]
    pub name: String,

    /// No alias, no rename: injected under its own name.
    pub role: String,

    /// Registered block; never injected.
    #[serde(flatten)]
    pub registered: RegisteredClaims,
}

impl ClaimSet for TestClaims {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::new("uid").inject_as("user_id"),
        FieldSpec::new("name").serialized("username"),
        FieldSpec::new("role"),
        FieldSpec::new("registered").reserved(),
    ];

    fn registered(&self) -> &RegisteredClaims {
        &self.registered
    }
}
