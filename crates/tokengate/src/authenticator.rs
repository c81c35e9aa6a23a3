//! Token issuance and validation.
//!
//! # Security
//!
//! - Tokens are size-checked BEFORE parsing (DoS prevention)
//! - The header's declared algorithm must equal the configured algorithm,
//!   checked before any signature work (algorithm-confusion defense)
//! - Temporal claims use an exclusive expiry boundary: `exp == now` is
//!   already expired

use crate::algorithm::{KeyFamily, SigningAlgorithm};
use crate::claims::ClaimSet;
use crate::config::AuthConfig;
use crate::error::{AuthError, ConfigError, SignError};
use crate::key::KeyMaterial;
use crate::project::{InjectedClaims, ProjectionPlan};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use jsonwebtoken::{crypto, DecodingKey, EncodingKey, Header};
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;

/// Maximum allowed token size in bytes (8KB).
///
/// Tokens larger than this are rejected before base64 decoding and
/// signature verification. Typical tokens are 200-500 bytes; the limit
/// leaves room for large claim sets while bounding the work an
/// unauthenticated caller can trigger.
pub const MAX_TOKEN_SIZE_BYTES: usize = 8192;

/// The decoded portion of a token header we act on.
#[derive(Debug, Deserialize)]
struct TokenHeader {
    alg: String,
}

/// Signs, parses, and validates tokens for one claim type.
///
/// Immutable after construction and safe to share across request-handling
/// tasks behind an `Arc`; every parse decodes into a fresh claim instance.
/// There is no process-wide default instance: build one at startup and hand
/// it to the router.
pub struct TokenAuthenticator<C: ClaimSet> {
    algorithm: SigningAlgorithm,
    encoding_key: Option<EncodingKey>,
    decoding_key: DecodingKey,
    auto_inject: bool,
    plan: ProjectionPlan,
    _claims: PhantomData<fn() -> C>,
}

impl<C: ClaimSet> TokenAuthenticator<C> {
    /// Build an authenticator from an algorithm and key material.
    ///
    /// Validates the key material against the algorithm's family, checks
    /// that the claim prototype serializes to a JSON object, and
    /// precomputes the field-to-context projection.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyKey`] if the material holds no bytes
    /// - [`ConfigError::InvalidKey`] if the material does not fit the
    ///   algorithm (wrong kind, unparseable PEM)
    /// - [`ConfigError::InvalidClaimsShape`] if `C::default()` does not
    ///   serialize to a JSON object
    pub fn new(algorithm: SigningAlgorithm, key: KeyMaterial) -> Result<Self, ConfigError> {
        if key.is_empty() {
            return Err(ConfigError::EmptyKey);
        }

        match serde_json::to_value(C::default()) {
            Ok(Value::Object(_)) => {}
            _ => return Err(ConfigError::InvalidClaimsShape),
        }

        let (encoding_key, decoding_key) = build_keys(algorithm, key)?;

        Ok(Self {
            algorithm,
            encoding_key,
            decoding_key,
            auto_inject: false,
            plan: ProjectionPlan::for_claims::<C>(),
            _claims: PhantomData,
        })
    }

    /// Convenience constructor for the common HS256 shared-secret case.
    ///
    /// # Errors
    ///
    /// Same as [`TokenAuthenticator::new`].
    pub fn hs256(secret: impl AsRef<[u8]>) -> Result<Self, ConfigError> {
        Self::new(
            SigningAlgorithm::Hs256,
            KeyMaterial::secret(secret.as_ref().to_vec()),
        )
    }

    /// Build from deserialized settings. HMAC family only; asymmetric
    /// algorithms need PEM material and go through [`TokenAuthenticator::new`].
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidKey`] for a non-HMAC algorithm, otherwise the
    /// same as [`TokenAuthenticator::new`].
    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        if config.algorithm.family() != KeyFamily::Hmac {
            return Err(ConfigError::InvalidKey(format!(
                "{} requires PEM key material; use TokenAuthenticator::new",
                config.algorithm
            )));
        }
        Self::new(
            config.algorithm,
            KeyMaterial::secret(config.secret.expose_secret().as_bytes().to_vec()),
        )
        .map(|auth| auth.with_auto_inject(config.auto_inject))
    }

    /// Switch automatic claim injection on or off (default: off).
    #[must_use]
    pub fn with_auto_inject(mut self, enabled: bool) -> Self {
        self.auto_inject = enabled;
        self
    }

    /// The configured signing algorithm.
    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Whether decoded fields are copied into the request context on every
    /// successful parse during interception.
    #[must_use]
    pub fn auto_inject(&self) -> bool {
        self.auto_inject
    }

    /// Sign the given claims into a three-segment token string.
    ///
    /// # Errors
    ///
    /// [`SignError::MissingSigningKey`] on a verify-only authenticator,
    /// [`SignError::Encoding`] if the encoder rejects the claims or key.
    pub fn sign(&self, claims: &C) -> Result<String, SignError> {
        let key = self
            .encoding_key
            .as_ref()
            .ok_or(SignError::MissingSigningKey)?;
        let header = Header::new(self.algorithm.into());
        Ok(jsonwebtoken::encode(&header, claims, key)?)
    }

    /// Parse and validate a token, returning the decoded claims.
    ///
    /// Checks run in a fixed, short-circuiting order: structure and
    /// decoding first (no cryptographic work on malformed input), then
    /// algorithm identity, then the signature, then temporal claims.
    ///
    /// # Errors
    ///
    /// The first [`AuthError`] encountered in that order.
    pub fn parse(&self, token: &str) -> Result<C, AuthError> {
        self.parse_at(token, Utc::now().timestamp())
    }

    /// Deterministic validation against an explicit `now` timestamp.
    ///
    /// Prefer [`TokenAuthenticator::parse`] in production code. This
    /// variant exists so that temporal boundary conditions can be
    /// unit-tested without wall-clock dependence.
    pub(crate) fn parse_at(&self, token: &str, now: i64) -> Result<C, AuthError> {
        if token.len() > MAX_TOKEN_SIZE_BYTES {
            tracing::debug!(
                target: "tokengate.parse",
                token_size = token.len(),
                max_size = MAX_TOKEN_SIZE_BYTES,
                "token rejected: size exceeds maximum allowed"
            );
            return Err(AuthError::TokenMalformed);
        }

        // Token format: header.claims.signature, exactly three segments.
        let (message, signature_b64) = token
            .rsplit_once('.')
            .ok_or(AuthError::TokenMalformed)?;
        let (header_b64, claims_b64) = message
            .split_once('.')
            .ok_or(AuthError::TokenMalformed)?;
        if claims_b64.contains('.') {
            return Err(AuthError::TokenMalformed);
        }

        let header_bytes = URL_SAFE_NO_PAD.decode(header_b64).map_err(|e| {
            tracing::debug!(target: "tokengate.parse", error = %e, "header base64 decode failed");
            AuthError::TokenMalformed
        })?;
        let header: TokenHeader = serde_json::from_slice(&header_bytes).map_err(|e| {
            tracing::debug!(target: "tokengate.parse", error = %e, "header JSON decode failed");
            AuthError::TokenMalformed
        })?;

        let claims_bytes = URL_SAFE_NO_PAD.decode(claims_b64).map_err(|e| {
            tracing::debug!(target: "tokengate.parse", error = %e, "claims base64 decode failed");
            AuthError::TokenMalformed
        })?;
        // Fresh instance per parse; the prototype is never reused.
        let claims: C = serde_json::from_slice(&claims_bytes).map_err(|e| {
            tracing::debug!(target: "tokengate.parse", error = %e, "claims JSON decode failed");
            AuthError::TokenMalformed
        })?;

        // Algorithm identity must be settled before signature verification,
        // otherwise a token signed under a weaker algorithm could be
        // verified under this key's interpretation.
        if header.alg != self.algorithm.as_str() {
            tracing::warn!(
                target: "tokengate.parse",
                declared = %header.alg,
                configured = %self.algorithm,
                "token rejected: unexpected signing method"
            );
            return Err(AuthError::UnexpectedSigningMethod);
        }

        match crypto::verify(
            signature_b64,
            message.as_bytes(),
            &self.decoding_key,
            self.algorithm.into(),
        ) {
            Ok(true) => {}
            Ok(false) => {
                tracing::debug!(target: "tokengate.parse", "token rejected: signature mismatch");
                return Err(AuthError::SignatureInvalid);
            }
            Err(e) => return Err(classify_verify_error(&e)),
        }

        let registered = claims.registered();
        if let Some(exp) = registered.exp {
            // Exclusive boundary: a token expiring exactly now is expired.
            if exp <= now {
                tracing::debug!(target: "tokengate.parse", exp, now, "token rejected: expired");
                return Err(AuthError::TokenExpired);
            }
        }
        if let Some(nbf) = registered.nbf {
            if nbf > now {
                tracing::debug!(target: "tokengate.parse", nbf, now, "token rejected: not yet valid");
                return Err(AuthError::TokenNotActive);
            }
        }

        Ok(claims)
    }

    /// Project decoded claims into a context map using the plan computed
    /// at construction. Useful outside the middleware (e.g. WebSocket
    /// handshakes).
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidClaimsShape`] if the claims do not serialize to
    /// a JSON object.
    pub fn project(&self, claims: &C) -> Result<InjectedClaims, AuthError> {
        self.plan.project(claims)
    }
}

impl<C: ClaimSet> fmt::Debug for TokenAuthenticator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenAuthenticator")
            .field("algorithm", &self.algorithm)
            .field("keys", &"[REDACTED]")
            .field("auto_inject", &self.auto_inject)
            .finish()
    }
}

/// Build encoder and decoder keys, enforcing family/material agreement.
fn build_keys(
    algorithm: SigningAlgorithm,
    key: KeyMaterial,
) -> Result<(Option<EncodingKey>, DecodingKey), ConfigError> {
    match (algorithm.family(), key) {
        (KeyFamily::Hmac, KeyMaterial::Secret(secret)) => Ok((
            Some(EncodingKey::from_secret(&secret)),
            DecodingKey::from_secret(&secret),
        )),
        (KeyFamily::Hmac, KeyMaterial::Pem { .. }) => Err(ConfigError::InvalidKey(
            "HMAC algorithms take a shared secret, not PEM material".to_string(),
        )),
        (family, KeyMaterial::Pem { private, public }) => {
            let encoding = match private {
                Some(pem) => Some(encoding_key_from_pem(family, &pem)?),
                None => None,
            };
            let decoding = decoding_key_from_pem(family, &public)?;
            Ok((encoding, decoding))
        }
        (_, KeyMaterial::Secret(_)) => Err(ConfigError::InvalidKey(
            "asymmetric algorithms take PEM-encoded keys, not a shared secret".to_string(),
        )),
    }
}

fn encoding_key_from_pem(family: KeyFamily, pem: &[u8]) -> Result<EncodingKey, ConfigError> {
    let key = match family {
        KeyFamily::Rsa => EncodingKey::from_rsa_pem(pem),
        KeyFamily::Ec => EncodingKey::from_ec_pem(pem),
        KeyFamily::Ed => EncodingKey::from_ed_pem(pem),
        KeyFamily::Hmac => {
            return Err(ConfigError::InvalidKey(
                "HMAC algorithms take a shared secret".to_string(),
            ))
        }
    };
    key.map_err(|e| ConfigError::InvalidKey(e.to_string()))
}

fn decoding_key_from_pem(family: KeyFamily, pem: &[u8]) -> Result<DecodingKey, ConfigError> {
    let key = match family {
        KeyFamily::Rsa => DecodingKey::from_rsa_pem(pem),
        KeyFamily::Ec => DecodingKey::from_ec_pem(pem),
        KeyFamily::Ed => DecodingKey::from_ed_pem(pem),
        KeyFamily::Hmac => {
            return Err(ConfigError::InvalidKey(
                "HMAC algorithms take a shared secret".to_string(),
            ))
        }
    };
    key.map_err(|e| ConfigError::InvalidKey(e.to_string()))
}

/// Map a verification failure onto the error taxonomy.
///
/// Any corruption of the signature segment, including bad base64, reports
/// as `SignatureInvalid` so a tampered token never reads as merely
/// malformed.
fn classify_verify_error(err: &jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;

    match err.kind() {
        ErrorKind::Base64(_) | ErrorKind::InvalidSignature => AuthError::SignatureInvalid,
        ErrorKind::InvalidKeyFormat
        | ErrorKind::InvalidEcdsaKey
        | ErrorKind::InvalidRsaKey(_) => AuthError::InvalidKey,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => AuthError::InvalidKeyType,
        _ => AuthError::TokenInvalid(err.to_string()),
    }
}
