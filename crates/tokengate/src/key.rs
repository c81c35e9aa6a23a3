//! Key material supplied at construction.
//!
//! # Security
//!
//! Key material is never printed: the Debug implementation redacts all
//! bytes. The material is consumed at construction to build the encoder and
//! decoder keys and is not retained in raw form.

use std::fmt;

/// Raw key material for an authenticator.
///
/// The HMAC family takes a shared secret; the asymmetric families take
/// PEM-encoded keys. A verify-only authenticator omits the private half and
/// refuses to sign.
#[derive(Clone)]
pub enum KeyMaterial {
    /// Shared secret for HS256/HS384/HS512.
    Secret(Vec<u8>),

    /// PEM-encoded keypair for the RSA, ECDSA, and Ed25519 families.
    Pem {
        /// PEM-encoded private key (PKCS#1 or PKCS#8); `None` for
        /// verify-only authenticators.
        private: Option<Vec<u8>>,
        /// PEM-encoded public key.
        public: Vec<u8>,
    },
}

impl KeyMaterial {
    /// Shared-secret material for the HMAC family.
    pub fn secret(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Secret(bytes.into())
    }

    /// PEM keypair material for asymmetric families.
    pub fn pem(private: impl Into<Vec<u8>>, public: impl Into<Vec<u8>>) -> Self {
        Self::Pem {
            private: Some(private.into()),
            public: public.into(),
        }
    }

    /// Verify-only PEM material: parsing works, signing fails.
    pub fn public_pem(public: impl Into<Vec<u8>>) -> Self {
        Self::Pem {
            private: None,
            public: public.into(),
        }
    }

    /// Whether the material is unusable because it holds no bytes.
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        match self {
            Self::Secret(bytes) => bytes.is_empty(),
            Self::Pem { private, public } => {
                public.is_empty() || private.as_ref().is_some_and(|p| p.is_empty())
            }
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secret(_) => f.debug_tuple("Secret").field(&"[REDACTED]").finish(),
            Self::Pem { private, .. } => f
                .debug_struct("Pem")
                .field("private", &private.as_ref().map(|_| "[REDACTED]"))
                .field("public", &"[REDACTED]")
                .finish(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_material_is_detected() {
        assert!(KeyMaterial::secret(Vec::<u8>::new()).is_empty());
        assert!(!KeyMaterial::secret(b"secret".to_vec()).is_empty());
        assert!(KeyMaterial::public_pem(Vec::<u8>::new()).is_empty());
        assert!(KeyMaterial::pem(Vec::<u8>::new(), b"pub".to_vec()).is_empty());
    }

    #[test]
    fn test_debug_redacts_material() {
        let debug = format!("{:?}", KeyMaterial::secret(b"super-secret".to_vec()));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("super-secret"));

        let debug = format!(
            "{:?}",
            KeyMaterial::pem(b"privkey-bytes".to_vec(), b"pubkey-bytes".to_vec())
        );
        assert!(!debug.contains("privkey-bytes"));
        assert!(!debug.contains("pubkey-bytes"));
    }
}
