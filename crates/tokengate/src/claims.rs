//! Claim model: registered claims, audience handling, and the static
//! field-descriptor contract for application claim types.
//!
//! # Security
//!
//! The `sub` field contains user or client identifiers which should not be
//! exposed in logs. A custom Debug implementation redacts this field.

use chrono::{Duration, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The `aud` claim: a single audience or a list of audiences.
///
/// RFC 7519 allows either form on the wire; the untagged representation
/// round-trips both faithfully.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    /// A single audience string.
    One(String),
    /// Multiple audiences.
    Many(Vec<String>),
}

impl Audience {
    /// Whether the given audience is named by this claim.
    #[must_use]
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Self::One(aud) => aud == audience,
            Self::Many(auds) => auds.iter().any(|a| a == audience),
        }
    }
}

/// The registered (reserved) claim set of RFC 7519.
///
/// All fields are optional; timestamps are Unix epoch seconds. Applications
/// embed this block in their own claim type with `#[serde(flatten)]` and
/// mark it [`FieldSpec::reserved`] so it is skipped during context
/// injection.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Issuer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,

    /// Subject - redacted in Debug output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Audience (one or many).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aud: Option<Audience>,

    /// Expiration timestamp (Unix epoch seconds). The boundary is
    /// exclusive: a token whose `exp` equals the current second is expired.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    /// Not-before timestamp (Unix epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<i64>,

    /// Issued-at timestamp (Unix epoch seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Unique token identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl fmt::Debug for RegisteredClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredClaims")
            .field("iss", &self.iss)
            .field("sub", &self.sub.as_ref().map(|_| "[REDACTED]"))
            .field("aud", &self.aud)
            .field("exp", &self.exp)
            .field("nbf", &self.nbf)
            .field("iat", &self.iat)
            .field("jti", &self.jti)
            .finish()
    }
}

impl RegisteredClaims {
    /// An empty claim block with `iat` set to the current time.
    #[must_use]
    pub fn issued_now() -> Self {
        Self {
            iat: Some(Utc::now().timestamp()),
            ..Self::default()
        }
    }

    /// Set the issuer.
    #[must_use]
    pub fn issuer(mut self, iss: impl Into<String>) -> Self {
        self.iss = Some(iss.into());
        self
    }

    /// Set the subject.
    #[must_use]
    pub fn subject(mut self, sub: impl Into<String>) -> Self {
        self.sub = Some(sub.into());
        self
    }

    /// Set the expiration to `ttl` from now.
    #[must_use]
    pub fn expires_in(mut self, ttl: Duration) -> Self {
        self.exp = Some((Utc::now() + ttl).timestamp());
        self
    }

    /// Set the not-before time to `delay` from now.
    #[must_use]
    pub fn not_before_in(mut self, delay: Duration) -> Self {
        self.nbf = Some((Utc::now() + delay).timestamp());
        self
    }

    /// Assign a freshly generated UUIDv4 token identifier.
    #[must_use]
    pub fn with_generated_jti(mut self) -> Self {
        self.jti = Some(Uuid::new_v4().to_string());
        self
    }
}

/// Static descriptor for one custom field of a claim type.
///
/// Descriptors are declared once per claim type, in field declaration
/// order, and replace the runtime type inspection the context-injection
/// logic would otherwise need. The context key for a field resolves by
/// priority: explicit inject alias, then serialized name, then the field's
/// own name.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    /// The Rust field name; the final fallback for the context key and for
    /// the serialized lookup key.
    pub name: &'static str,
    /// The serde rename of the field, if any.
    pub serialized: Option<&'static str>,
    /// Explicit context-injection alias; takes priority over `serialized`.
    pub inject: Option<&'static str>,
    /// Marks the embedded registered-claims block; never injected.
    pub reserved: bool,
    /// Excludes the field from injection entirely (the analogue of a
    /// serialization name marked "omit").
    pub skip: bool,
}

impl FieldSpec {
    /// Descriptor for a plain field with no renames or aliases.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            serialized: None,
            inject: None,
            reserved: false,
            skip: false,
        }
    }

    /// Record the field's serde rename.
    #[must_use]
    pub const fn serialized(mut self, name: &'static str) -> Self {
        self.serialized = Some(name);
        self
    }

    /// Set an explicit context-injection alias.
    #[must_use]
    pub const fn inject_as(mut self, key: &'static str) -> Self {
        self.inject = Some(key);
        self
    }

    /// Mark the field as the embedded registered-claims block.
    #[must_use]
    pub const fn reserved(mut self) -> Self {
        self.reserved = true;
        self
    }

    /// Exclude the field from context injection.
    #[must_use]
    pub const fn skipped(mut self) -> Self {
        self.skip = true;
        self
    }
}

/// Contract for application claim types.
///
/// `Default` acts as the fresh-instance factory: every parse decodes into
/// an independent instance, so concurrent requests never share claim state.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use tokengate::{ClaimSet, FieldSpec, RegisteredClaims};
///
/// #[derive(Clone, Default, Serialize, Deserialize)]
/// struct StaffClaims {
///     uid: u64,
///     #[serde(rename = "username")]
///     name: String,
///     role: String,
///     #[serde(flatten)]
///     registered: RegisteredClaims,
/// }
///
/// impl ClaimSet for StaffClaims {
///     const FIELDS: &'static [FieldSpec] = &[
///         FieldSpec::new("uid").inject_as("user_id"),
///         FieldSpec::new("name").serialized("username"),
///         FieldSpec::new("role"),
///         FieldSpec::new("registered").reserved(),
///     ];
///
///     fn registered(&self) -> &RegisteredClaims {
///         &self.registered
///     }
/// }
/// ```
pub trait ClaimSet:
    Serialize + DeserializeOwned + Default + Clone + Send + Sync + 'static
{
    /// Field descriptors, in declaration order.
    const FIELDS: &'static [FieldSpec];

    /// Access to the embedded registered claims for temporal validation.
    fn registered(&self) -> &RegisteredClaims;
}

/// A bare registered-claims block is itself a valid claim set with no
/// custom fields.
impl ClaimSet for RegisteredClaims {
    const FIELDS: &'static [FieldSpec] = &[];

    fn registered(&self) -> &RegisteredClaims {
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_round_trips_both_wire_forms() {
        let one: Audience = serde_json::from_str(r#""api""#).unwrap();
        assert_eq!(one, Audience::One("api".to_string()));
        assert_eq!(serde_json::to_string(&one).unwrap(), r#""api""#);

        let many: Audience = serde_json::from_str(r#"["api","web"]"#).unwrap();
        assert!(many.contains("web"));
        assert!(!many.contains("cli"));
        assert_eq!(serde_json::to_string(&many).unwrap(), r#"["api","web"]"#);
    }

    #[test]
    fn test_registered_claims_omit_absent_fields() {
        let claims = RegisteredClaims::default().issuer("tokengate");
        let json = serde_json::to_string(&claims).unwrap();
        assert_eq!(json, r#"{"iss":"tokengate"}"#);

        let decoded: RegisteredClaims = serde_json::from_str(r"{}").unwrap();
        assert_eq!(decoded, RegisteredClaims::default());
    }

    #[test]
    fn test_debug_redacts_subject() {
        let claims = RegisteredClaims::default().subject("user-1234");
        let debug = format!("{claims:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("user-1234"));
    }

    #[test]
    fn test_builder_helpers_populate_temporal_claims() {
        let claims = RegisteredClaims::issued_now()
            .expires_in(Duration::seconds(60))
            .with_generated_jti();

        let iat = claims.iat.unwrap();
        let exp = claims.exp.unwrap();
        assert!(exp - iat >= 59 && exp - iat <= 61);
        assert!(!claims.jti.unwrap().is_empty());
    }

    #[test]
    fn test_field_spec_builders_compose() {
        const SPEC: FieldSpec = FieldSpec::new("uid")
            .serialized("user_id")
            .inject_as("id");
        assert_eq!(SPEC.name, "uid");
        assert_eq!(SPEC.serialized, Some("user_id"));
        assert_eq!(SPEC.inject, Some("id"));
        assert!(!SPEC.reserved);

        const RESERVED: FieldSpec = FieldSpec::new("registered").reserved();
        assert!(RESERVED.reserved);
    }
}
