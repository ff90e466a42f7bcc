//! Key types for JWT signing and verification
//!
//! This module provides a type-safe abstraction over the key material the
//! algorithms accept:
//! - Shared secrets (for HMAC algorithms)
//! - Asymmetric private keys (ECDSA/RSA signing, and verification through
//!   their public half)
//! - Asymmetric public keys (ECDSA/RSA verification)
//! - The none-sentinel (for the unsigned `none` algorithm)
//!
//! Keys are immutable and cheap to clone; parsed key pairs are shared.

mod pem;

pub use self::pem::{
    KeyKind, load_ec_private_key, load_ec_public_key, load_key, load_rsa_private_key,
    load_rsa_public_key,
};

use crate::error::{Error, Result};
use aws_lc_rs::signature::{
    self, EcdsaKeyPair, EcdsaSigningAlgorithm, EcdsaVerificationAlgorithm, KeyPair, RsaKeyPair,
};
use std::sync::Arc;

/// Key family, the unit of compatibility between keys and algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyFamily {
    Hmac,
    Ecdsa,
    Rsa,
    None,
}

impl KeyFamily {
    pub const fn as_str(&self) -> &'static str {
        match self {
            KeyFamily::Hmac => "HMAC",
            KeyFamily::Ecdsa => "ECDSA",
            KeyFamily::Rsa => "RSA",
            KeyFamily::None => "none",
        }
    }
}

impl std::fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ECDSA curve identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcdsaCurve {
    /// P-256 (secp256r1), used by ES256
    P256,
    /// P-384 (secp384r1), used by ES384
    P384,
    /// P-521 (secp521r1), used by ES512
    P521,
}

impl EcdsaCurve {
    const ALL: [EcdsaCurve; 3] = [EcdsaCurve::P256, EcdsaCurve::P384, EcdsaCurve::P521];

    pub(crate) fn signing_algorithm(&self) -> &'static EcdsaSigningAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_ASN1_SIGNING,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_ASN1_SIGNING,
            EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_ASN1_SIGNING,
        }
    }

    pub(crate) fn verification_algorithm(&self) -> &'static EcdsaVerificationAlgorithm {
        match self {
            EcdsaCurve::P256 => &signature::ECDSA_P256_SHA256_ASN1,
            EcdsaCurve::P384 => &signature::ECDSA_P384_SHA384_ASN1,
            EcdsaCurve::P521 => &signature::ECDSA_P521_SHA512_ASN1,
        }
    }
}

/// A key usable with one algorithm family
#[derive(Debug, Clone)]
pub enum Key {
    /// Shared secret for HMAC algorithms
    Secret(SecretKey),

    /// Asymmetric private key for ECDSA/RSA signing
    Private(PrivateKey),

    /// Asymmetric public key for ECDSA/RSA verification
    Public(PublicKey),

    /// Sentinel accepted only by the `none` algorithm
    None,
}

impl Key {
    /// Create a shared-secret key from bytes
    pub fn secret(secret: impl Into<Vec<u8>>) -> Self {
        Key::Secret(SecretKey::new(secret.into()))
    }

    /// The sentinel key for the `none` algorithm
    pub const fn none() -> Self {
        Key::None
    }

    /// Create an ECDSA public key from an uncompressed SEC1 point
    pub fn ecdsa_public(point: impl Into<Vec<u8>>, curve: EcdsaCurve) -> Self {
        Key::Public(PublicKey::Ecdsa(EcdsaPublicKey {
            point: point.into(),
            curve,
        }))
    }

    /// Create an RSA public key from a PKCS#1 RSAPublicKey DER document
    pub fn rsa_public(der: impl Into<Vec<u8>>) -> Self {
        Key::Public(PublicKey::Rsa(RsaPublicKey { der: der.into() }))
    }

    /// Parse an ECDSA private key from SEC1 or PKCS#8 DER
    pub fn ecdsa_private_der(der: &[u8]) -> Result<Self> {
        for curve in EcdsaCurve::ALL {
            let alg = curve.signing_algorithm();
            let parsed = EcdsaKeyPair::from_pkcs8(alg, der)
                .or_else(|_| EcdsaKeyPair::from_private_key_der(alg, der));

            if let Ok(pair) = parsed {
                return Ok(Key::Private(PrivateKey::Ecdsa(EcdsaPrivateKey {
                    pair: Arc::new(pair),
                    curve,
                })));
            }
        }

        Err(Error::CannotParseKey {
            family: KeyFamily::Ecdsa,
            reason: "not a P-256, P-384 or P-521 private key".into(),
        })
    }

    /// Parse an RSA private key from PKCS#1 or PKCS#8 DER
    pub fn rsa_private_der(der: &[u8]) -> Result<Self> {
        let pair = RsaKeyPair::from_der(der)
            .or_else(|_| RsaKeyPair::from_pkcs8(der))
            .map_err(|e| Error::CannotParseKey {
                family: KeyFamily::Rsa,
                reason: e.to_string(),
            })?;

        Ok(Key::Private(PrivateKey::Rsa(RsaPrivateKey {
            pair: Arc::new(pair),
        })))
    }

    /// Family of algorithms this key works with
    pub fn family(&self) -> KeyFamily {
        match self {
            Key::Secret(_) => KeyFamily::Hmac,
            Key::Private(PrivateKey::Ecdsa(_)) | Key::Public(PublicKey::Ecdsa(_)) => {
                KeyFamily::Ecdsa
            }
            Key::Private(PrivateKey::Rsa(_)) | Key::Public(PublicKey::Rsa(_)) => KeyFamily::Rsa,
            Key::None => KeyFamily::None,
        }
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Secret(_) => "secret",
            Key::Private(PrivateKey::Ecdsa(_)) => "ECDSA private",
            Key::Private(PrivateKey::Rsa(_)) => "RSA private",
            Key::Public(PublicKey::Ecdsa(_)) => "ECDSA public",
            Key::Public(PublicKey::Rsa(_)) => "RSA public",
            Key::None => "none",
        }
    }
}

/// Shared secret for HMAC algorithms
#[derive(Clone)]
pub struct SecretKey {
    secret: Vec<u8>,
}

impl SecretKey {
    /// Create a new shared secret
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl std::fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl From<&str> for SecretKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

impl From<&[u8]> for SecretKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

/// Asymmetric private key
#[derive(Debug, Clone)]
pub enum PrivateKey {
    Ecdsa(EcdsaPrivateKey),
    Rsa(RsaPrivateKey),
}

/// Parsed ECDSA key pair
#[derive(Clone)]
pub struct EcdsaPrivateKey {
    pair: Arc<EcdsaKeyPair>,
    curve: EcdsaCurve,
}

impl EcdsaPrivateKey {
    pub(crate) fn pair(&self) -> &EcdsaKeyPair {
        &self.pair
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }

    /// Uncompressed SEC1 point of the public half
    pub fn public_point(&self) -> &[u8] {
        self.pair.public_key().as_ref()
    }
}

impl std::fmt::Debug for EcdsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdsaPrivateKey")
            .field("curve", &self.curve)
            .finish_non_exhaustive()
    }
}

/// Parsed RSA key pair
#[derive(Clone)]
pub struct RsaPrivateKey {
    pair: Arc<RsaKeyPair>,
}

impl RsaPrivateKey {
    pub(crate) fn pair(&self) -> &RsaKeyPair {
        &self.pair
    }

    /// PKCS#1 RSAPublicKey DER of the public half
    pub fn public_der(&self) -> &[u8] {
        self.pair.public_key().as_ref()
    }
}

impl std::fmt::Debug for RsaPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RsaPrivateKey")
            .field("modulus_len", &self.pair.public_modulus_len())
            .finish_non_exhaustive()
    }
}

/// Asymmetric public key
#[derive(Debug, Clone)]
pub enum PublicKey {
    Ecdsa(EcdsaPublicKey),
    Rsa(RsaPublicKey),
}

/// ECDSA public key (uncompressed SEC1 point)
#[derive(Debug, Clone)]
pub struct EcdsaPublicKey {
    point: Vec<u8>,
    curve: EcdsaCurve,
}

impl EcdsaPublicKey {
    /// Get the encoded point
    pub fn as_bytes(&self) -> &[u8] {
        &self.point
    }

    /// Get the curve
    pub fn curve(&self) -> EcdsaCurve {
        self.curve
    }
}

/// RSA public key (PKCS#1 RSAPublicKey DER)
#[derive(Debug, Clone)]
pub struct RsaPublicKey {
    der: Vec<u8>,
}

impl RsaPublicKey {
    /// Get the DER-encoded key bytes
    pub fn as_der(&self) -> &[u8] {
        &self.der
    }
}
