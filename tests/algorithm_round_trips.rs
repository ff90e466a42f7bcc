//! Per-algorithm round-trip tests
//!
//! Every signed algorithm must:
//! 1. Encode a token with its private key or secret
//! 2. Verify the token with the matching public key
//! 3. Preserve all claims through the round-trip
//!
//! and reject keys from another family.

use jwtoken::*;
use serde_json::json;
use std::fs::File;

fn fixture(name: &str) -> File {
    File::open(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
        .unwrap_or_else(|e| panic!("fixture {name}: {e}"))
}

fn claims() -> Claims {
    let mut claims = Claims::new();
    claims.set_issuer("https://example.com");
    claims.set_subject("test-user");
    claims.set_audience(["test-app"]);
    claims.set("scope", "read write");
    claims.set("roles", json!(["admin", "user"]));
    claims
}

fn round_trip(algorithm: Algorithm, signing: &Key, verifying: &Key) {
    let token = Token::encode(claims(), signing, algorithm)
        .unwrap_or_else(|e| panic!("{algorithm} encode failed: {e}"));
    assert_eq!(token.algorithm(), algorithm);

    let verified = Token::verify(token.as_str(), verifying)
        .unwrap_or_else(|e| panic!("{algorithm} verify failed: {e}"));
    assert_eq!(verified.claims(), &claims());
    assert_eq!(verified.header().token_type(), Some("JWT"));

    // Private keys verify through their public half
    assert!(Token::verify(token.as_str(), signing).is_ok());
}

// ============================================================================
// HMAC Algorithm Round-Trips (HS256, HS384, HS512)
// ============================================================================

mod hmac_tests {
    use super::*;
    use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
    use hmac::{Hmac, Mac};
    use sha2::Sha384;

    #[test]
    fn round_trip_hmac() {
        let key = Key::secret("test-secret-hmac-key");
        for algorithm in [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512] {
            round_trip(algorithm, &key, &key);
        }
    }

    #[test]
    fn hs384_matches_independent_mac() {
        let secret = b"test-secret-hs384-key";
        let token = Token::encode(claims(), &Key::secret(&secret[..]), Algorithm::HS384).unwrap();
        let (signing_input, signature) = token.as_str().rsplit_once('.').unwrap();

        let mut mac = Hmac::<Sha384>::new_from_slice(secret).unwrap();
        mac.update(signing_input.as_bytes());
        let expected = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        assert_eq!(signature, expected);
    }

    #[test]
    fn hmac_rejects_wrong_secret() {
        let token = Token::encode(claims(), &Key::secret("one"), Algorithm::HS256).unwrap();
        let err = Token::verify(token.as_str(), &Key::secret("two")).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::Signature));
        assert!(matches!(err.cause(), Error::InvalidSignature));
    }
}

// ============================================================================
// ECDSA Algorithm Round-Trips (ES256, ES384, ES512)
// ============================================================================

mod ecdsa_tests {
    use super::*;

    fn pair(bits: u16) -> (Key, Key) {
        let private = load_ec_private_key(fixture(&format!("ec_p{bits}_private.pem"))).unwrap();
        let public = load_ec_public_key(fixture(&format!("ec_p{bits}_public.pem"))).unwrap();
        (private, public)
    }

    #[test]
    fn round_trip_es256() {
        let (private, public) = pair(256);
        round_trip(Algorithm::ES256, &private, &public);
    }

    #[test]
    fn round_trip_es384() {
        let (private, public) = pair(384);
        round_trip(Algorithm::ES384, &private, &public);
    }

    #[test]
    fn round_trip_es512() {
        let (private, public) = pair(521);
        round_trip(Algorithm::ES512, &private, &public);
    }

    #[test]
    fn ecdsa_signature_is_der() {
        let (private, _) = pair(256);
        let signature = Algorithm::ES256.sign(b"data", &private).unwrap();
        // SEQUENCE of two INTEGERs
        assert_eq!(signature[0], 0x30);
        assert_eq!(signature[1] as usize, signature.len() - 2);
    }

    #[test]
    fn ecdsa_rejects_curve_mismatch() {
        let (private, public) = pair(384);
        let result = Token::encode(claims(), &private, Algorithm::ES256);
        assert!(matches!(
            result.unwrap_err().cause(),
            Error::InvalidCombination {
                algorithm: Algorithm::ES256,
                family: KeyFamily::Ecdsa,
            }
        ));

        let signature = Algorithm::ES384.sign(b"data", &private).unwrap();
        assert!(matches!(
            Algorithm::ES512.verify(b"data", &signature, &public),
            Err(Error::InvalidCombination { .. })
        ));
    }

    #[test]
    fn ecdsa_rejects_other_public_key() {
        let (private, _) = pair(256);
        let other = load_ec_public_key(fixture("ec_p256_other_public.pem")).unwrap();
        let token = Token::encode(claims(), &private, Algorithm::ES256).unwrap();
        let err = Token::verify(token.as_str(), &other).unwrap_err();
        assert!(matches!(err.cause(), Error::InvalidSignature));
    }

    #[test]
    fn ecdsa_public_key_cannot_sign() {
        let (_, public) = pair(256);
        assert!(matches!(
            Algorithm::ES256.sign(b"data", &public),
            Err(Error::InvalidKeyType(_))
        ));
    }
}

// ============================================================================
// RSA Algorithm Round-Trips (RS256-512, PS256-512)
// ============================================================================

mod rsa_tests {
    use super::*;

    fn pair() -> (Key, Key) {
        let private = load_rsa_private_key(fixture("rsa_private_pkcs1.pem")).unwrap();
        let public = load_rsa_public_key(fixture("rsa_public.pem")).unwrap();
        (private, public)
    }

    #[test]
    fn round_trip_pkcs1() {
        let (private, public) = pair();
        for algorithm in [Algorithm::RS256, Algorithm::RS384, Algorithm::RS512] {
            round_trip(algorithm, &private, &public);
        }
    }

    #[test]
    fn round_trip_pss() {
        let (private, public) = pair();
        for algorithm in [Algorithm::PS256, Algorithm::PS384, Algorithm::PS512] {
            round_trip(algorithm, &private, &public);
        }
    }

    #[test]
    fn rs256_is_deterministic() {
        let (private, _) = pair();
        let a = Algorithm::RS256.sign(b"data", &private).unwrap();
        let b = Algorithm::RS256.sign(b"data", &private).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 256);
    }

    #[test]
    fn padding_schemes_do_not_cross_verify() {
        let (private, public) = pair();
        let signature = Algorithm::RS256.sign(b"data", &private).unwrap();
        assert!(matches!(
            Algorithm::PS256.verify(b"data", &signature, &public),
            Err(Error::InvalidSignature)
        ));
    }

    fn openssl_token(name: &str) -> String {
        std::fs::read_to_string(format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR")))
            .unwrap()
            .trim()
            .to_string()
    }

    /// Tokens signed by `openssl dgst -sigopt rsa_padding_mode:pss` with
    /// salt lengths other than the digest length
    #[test]
    fn pss_accepts_any_salt_length() {
        let (private, public) = pair();
        for (name, algorithm) in [
            ("ps256_max_salt.jwt", Algorithm::PS256),
            ("ps384_short_salt.jwt", Algorithm::PS384),
            ("ps512_zero_salt.jwt", Algorithm::PS512),
        ] {
            let text = openssl_token(name);
            let verified = Token::verify(&text, &public)
                .unwrap_or_else(|e| panic!("{name} verify failed: {e}"));
            assert_eq!(verified.algorithm(), algorithm);
            assert_eq!(verified.claims().subject().as_deref(), Some("x"));
            assert!(Token::verify(&text, &private).is_ok());
        }
    }

    #[test]
    fn pss_any_salt_still_rejects_tampering() {
        let (_, public) = pair();
        let text = openssl_token("ps256_max_salt.jwt");
        let (input, signature) = text.rsplit_once('.').unwrap();

        // {"sub":"y"}
        let header = input.split('.').next().unwrap();
        let forged = format!("{header}.eyJzdWIiOiJ5In0.{signature}");
        let err = Token::verify(&forged, &public).unwrap_err();
        assert!(matches!(err.cause(), Error::InvalidSignature));

        let other_key = load_ec_public_key(fixture("ec_p256_public.pem")).unwrap();
        let err = Token::verify(&text, &other_key).unwrap_err();
        assert!(matches!(err.cause(), Error::InvalidCombination { .. }));
    }

    #[test]
    fn pss_any_salt_rejects_pkcs1_signatures() {
        let (private, public) = pair();
        for width in ["256", "384", "512"] {
            let rs: Algorithm = format!("RS{width}").parse().unwrap();
            let ps: Algorithm = format!("PS{width}").parse().unwrap();
            let signature = rs.sign(b"data", &private).unwrap();
            assert!(matches!(
                ps.verify(b"data", &signature, &public),
                Err(Error::InvalidSignature)
            ));
        }
    }
}

// ============================================================================
// Key Family Mismatches
// ============================================================================

mod family_mismatch_tests {
    use super::*;

    fn keys() -> Vec<Key> {
        vec![
            Key::secret("secret"),
            load_ec_private_key(fixture("ec_p256_private.pem")).unwrap(),
            load_rsa_private_key(fixture("rsa_private_pkcs8.pem")).unwrap(),
        ]
    }

    #[test]
    fn signing_with_wrong_family_is_invalid_combination() {
        for algorithm in Algorithm::all() {
            if algorithm == Algorithm::None {
                continue;
            }
            for key in keys().iter().filter(|key| key.family() != algorithm.family()) {
                let result = algorithm.sign(b"data", key);
                assert!(
                    matches!(
                        result,
                        Err(Error::InvalidCombination { algorithm: a, family })
                            if a == algorithm && family == key.family()
                    ),
                    "{algorithm} with {} key",
                    key.family()
                );
            }
        }
    }

    #[test]
    fn encode_wraps_mismatch_with_signature_stage() {
        let err = Token::encode(claims(), &Key::secret("secret"), Algorithm::RS256).unwrap_err();
        assert!(matches!(
            err,
            Error::EncodeFailed {
                stage: Stage::Signature,
                ..
            }
        ));
    }

    #[test]
    fn hmac_token_cannot_be_verified_with_rsa_key() {
        let token = Token::encode(claims(), &Key::secret("secret"), Algorithm::HS256).unwrap();
        let rsa = load_rsa_public_key(fixture("rsa_public.pem")).unwrap();
        let err = Token::verify(token.as_str(), &rsa).unwrap_err();
        assert!(matches!(
            err.cause(),
            Error::InvalidCombination {
                algorithm: Algorithm::HS256,
                family: KeyFamily::Rsa,
            }
        ));
    }
}
