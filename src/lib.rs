//! # jwtoken - JSON Web Tokens with a verified-token cache
//!
//! **jwtoken** builds, signs, decodes and verifies JSON Web Tokens across the
//! ECDSA, HMAC, RSA and RSA-PSS algorithm families, checks time-bound claims
//! with clock-skew tolerance, and caches verified tokens so repeated requests
//! skip the signature check.
//!
//! ## Quick Start
//!
//! ```
//! use jwtoken::{Algorithm, Claims, Key, Token};
//! use std::time::Duration;
//!
//! let key = Key::secret("secret");
//!
//! let mut claims = Claims::new();
//! claims.set_subject("1234567890");
//! let token = Token::encode(claims, &key, Algorithm::HS512)?;
//!
//! let verified = Token::verify(token.as_str(), &key)?;
//! assert!(verified.is_valid(Duration::from_secs(60)));
//! assert_eq!(verified.claims().subject().as_deref(), Some("1234567890"));
//! # Ok::<(), jwtoken::Error>(())
//! ```
//!
//! ## Token Flow
//!
//! ```text
//! Claims + Key + Algorithm ──encode──▶ Token ──as_str──▶ "header.claims.signature"
//!
//! "header.claims.signature" ──decode──▶ Token (no signature check, no key)
//! "header.claims.signature" ──verify──▶ Token (signature checked with key)
//! ```
//!
//! Failures name the operation and the stage that failed
//! ([`Error::EncodeFailed`], [`Error::DecodeFailed`], [`Error::VerifyFailed`])
//! and wrap the root cause, reachable with [`Error::cause`].
//!
//! ## Algorithm Support
//!
//! | Family  | Identifiers          | Key                          |
//! |---------|----------------------|------------------------------|
//! | HMAC    | HS256, HS384, HS512  | [`Key::secret`]              |
//! | ECDSA   | ES256, ES384, ES512  | P-256, P-384, P-521 PEM keys |
//! | RSA     | RS256, RS384, RS512  | RSA PEM keys                 |
//! | RSA-PSS | PS256, PS384, PS512  | RSA PEM keys                 |
//! | none    | none                 | [`Key::none`]                |
//!
//! ECDSA signatures are ASN.1 DER encoded. Private keys sign and verify;
//! public keys only verify.
//!
//! ## Loading Keys
//!
//! ```ignore
//! use jwtoken::{load_ec_private_key, load_rsa_public_key};
//! use std::fs::File;
//!
//! let signing = load_ec_private_key(File::open("ec_p256_private.pem")?)?;
//! let verifying = load_rsa_public_key(File::open("rsa_cert.pem")?)?;
//! ```
//!
//! Public keys load from a `PUBLIC KEY` block or a certificate.
//!
//! ## Caching
//!
//! [`Cache`] keeps verified tokens keyed by their text. It runs a sweep task
//! on the ambient Tokio runtime, configured through [`CacheConfig`].
//! [`bearer::authenticate`] ties header extraction, the cache and verification
//! together for request layers.

pub mod bearer;

mod algorithm;
mod cache;
mod claims;
mod error;
mod keys;
mod limits;
mod token;
mod utils;

pub use algorithm::{Algorithm, HashWidth};
pub use cache::{Cache, CacheConfig};
pub use claims::{
    AUDIENCE, Claims, EXPIRATION, IDENTIFIER, ISSUED_AT, ISSUER, NOT_BEFORE, SUBJECT,
};
pub use error::{Error, Result, Stage};
pub use keys::{
    EcdsaCurve, EcdsaPrivateKey, EcdsaPublicKey, Key, KeyFamily, KeyKind, PrivateKey, PublicKey,
    RsaPrivateKey, RsaPublicKey, SecretKey, load_ec_private_key, load_ec_public_key, load_key,
    load_rsa_private_key, load_rsa_public_key,
};
pub use token::{Header, JWT_TYPE, Token};
