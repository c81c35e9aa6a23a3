//! Token issuance and validation integration tests.
//!
//! Exercises the wire format, round-trip fidelity, tamper sensitivity, and
//! the asymmetric (EdDSA) path with generated PEM fixtures.

// Test code is allowed to use expect/unwrap for assertions
#![allow(clippy::unwrap_used, clippy::expect_used)]

use serde_json::json;
use tokengate::{
    AuthError, KeyMaterial, SignError, SigningAlgorithm, TokenAuthenticator,
};
use tokengate_test_utils::{
    flip_signature_bit, generate_ed25519_fixture, hmac_secret, TestClaims, TestTokenBuilder,
    TokenAssertions,
};

fn hs256() -> TokenAuthenticator<TestClaims> {
    TokenAuthenticator::hs256(hmac_secret()).unwrap()
}

#[test]
fn test_token_wire_format() {
    let token = hs256().sign(&TestTokenBuilder::new().build()).unwrap();

    token
        .assert_three_segments()
        .assert_signed_with("HS256")
        .assert_claim("username", &json!("alice"))
        .assert_claim("role", &json!("admin"));
}

#[test]
fn test_round_trip_preserves_all_configured_fields() {
    let auth = hs256();
    let claims = TestTokenBuilder::new()
        .with_uid(1001)
        .for_user("carol")
        .with_role("auditor")
        .build();

    let token = auth.sign(&claims).unwrap();
    assert_eq!(auth.parse(&token).unwrap(), claims);
}

#[test]
fn test_every_signature_bit_flip_is_detected_as_signature_invalid() {
    let auth = hs256();
    let token = auth.sign(&TestTokenBuilder::new().build()).unwrap();
    let (_, signature) = token.rsplit_once('.').unwrap();

    let mut flips_tested = 0;
    for byte_index in 0..signature.len() {
        for bit in 0..8 {
            // Flips that break UTF-8 or the segment structure cannot be
            // presented as a token string in the first place.
            let Some(tampered) = flip_signature_bit(&token, byte_index, bit) else {
                continue;
            };
            flips_tested += 1;
            assert_eq!(
                auth.parse(&tampered).unwrap_err(),
                AuthError::SignatureInvalid,
                "flip at byte {byte_index} bit {bit} misclassified"
            );
        }
    }
    assert!(flips_tested > 100, "tamper sweep covered too few flips");
}

#[test]
fn test_expired_token_is_rejected() {
    let auth = hs256();
    let token = auth
        .sign(&TestTokenBuilder::new().expired_since(60).build())
        .unwrap();
    assert_eq!(auth.parse(&token).unwrap_err(), AuthError::TokenExpired);
}

#[test]
fn test_future_token_is_rejected() {
    let auth = hs256();
    let token = auth
        .sign(&TestTokenBuilder::new().not_valid_for(3600).build())
        .unwrap();
    assert_eq!(auth.parse(&token).unwrap_err(), AuthError::TokenNotActive);
}

#[test]
fn test_token_without_expiry_is_accepted() {
    let auth = hs256();
    let token = auth
        .sign(&TestTokenBuilder::new().without_expiry().build())
        .unwrap();
    assert!(auth.parse(&token).is_ok());
}

#[test]
fn test_eddsa_round_trip_with_pem_material() {
    let fixture = generate_ed25519_fixture();
    let auth = TokenAuthenticator::<TestClaims>::new(
        SigningAlgorithm::EdDsa,
        KeyMaterial::pem(fixture.private_key_pem, fixture.public_key_pem),
    )
    .unwrap();

    let claims = TestTokenBuilder::new().for_user("dave").build();
    let token = auth.sign(&claims).unwrap();
    token.assert_signed_with("EdDSA");
    assert_eq!(auth.parse(&token).unwrap(), claims);
}

#[test]
fn test_verify_only_authenticator_parses_but_refuses_to_sign() {
    let fixture = generate_ed25519_fixture();
    let signer = TokenAuthenticator::<TestClaims>::new(
        SigningAlgorithm::EdDsa,
        KeyMaterial::pem(fixture.private_key_pem, fixture.public_key_pem.clone()),
    )
    .unwrap();
    let verifier = TokenAuthenticator::<TestClaims>::new(
        SigningAlgorithm::EdDsa,
        KeyMaterial::public_pem(fixture.public_key_pem),
    )
    .unwrap();

    let token = signer.sign(&TestTokenBuilder::new().build()).unwrap();
    assert!(verifier.parse(&token).is_ok());

    let err = verifier.sign(&TestTokenBuilder::new().build()).unwrap_err();
    assert!(matches!(err, SignError::MissingSigningKey));
}

#[test]
fn test_hmac_token_presented_to_eddsa_authenticator_is_confusion() {
    let fixture = generate_ed25519_fixture();
    let eddsa = TokenAuthenticator::<TestClaims>::new(
        SigningAlgorithm::EdDsa,
        KeyMaterial::public_pem(fixture.public_key_pem),
    )
    .unwrap();

    let token = hs256().sign(&TestTokenBuilder::new().build()).unwrap();
    assert_eq!(
        eddsa.parse(&token).unwrap_err(),
        AuthError::UnexpectedSigningMethod
    );
}
