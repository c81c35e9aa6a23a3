//! Configuration surface for building an authenticator from deserialized
//! settings (environment, file). Supplied once at startup, never reloaded.

use crate::algorithm::SigningAlgorithm;
use secrecy::SecretString;
use serde::Deserialize;

/// Authenticator settings for the shared-secret (HMAC) family.
///
/// The secret is wrapped in [`SecretString`] so it cannot leak through
/// Debug output or serialization.
#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    /// Signing algorithm identifier (e.g. `"HS256"`).
    #[serde(default = "default_algorithm")]
    pub algorithm: SigningAlgorithm,

    /// Shared signing secret.
    pub secret: SecretString,

    /// Whether decoded claim fields are copied into the request context on
    /// every successful parse.
    #[serde(default)]
    pub auto_inject: bool,
}

fn default_algorithm() -> SigningAlgorithm {
    SigningAlgorithm::Hs256
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_apply_when_fields_absent() {
        let config: AuthConfig =
            serde_json::from_str(r#"{"secret":"0123456789abcdef0123456789abcdef"}"#).unwrap();
        assert_eq!(config.algorithm, SigningAlgorithm::Hs256);
        assert!(!config.auto_inject);
    }

    #[test]
    fn test_debug_does_not_expose_secret() {
        let config: AuthConfig = serde_json::from_str(
            r#"{"algorithm":"HS512","secret":"super-secret-value","auto_inject":true}"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, SigningAlgorithm::Hs512);
        assert!(config.auto_inject);
        assert!(!format!("{config:?}").contains("super-secret-value"));
    }
}
