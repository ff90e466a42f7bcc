//! Signature algorithms
//!
//! [`Algorithm`] is a closed set of the 13 JWS identifiers. Each variant carries
//! its family and hash width together; the wire name is derived from the
//! variant and parsed back through [`FromStr`](std::str::FromStr).

mod ecdsa;
mod hmac;
mod pss;
mod rsa;

use crate::error::{Error, Result};
use crate::keys::{Key, KeyFamily};
use crate::limits::MAX_DECODED_SIGNATURE_SIZE;

/// Hash width selected by the numeric suffix of an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashWidth {
    Sha256,
    Sha384,
    Sha512,
}

impl HashWidth {
    pub const fn bits(&self) -> u16 {
        match self {
            HashWidth::Sha256 => 256,
            HashWidth::Sha384 => 384,
            HashWidth::Sha512 => 512,
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix {
            "256" => Some(HashWidth::Sha256),
            "384" => Some(HashWidth::Sha384),
            "512" => Some(HashWidth::Sha512),
            _ => None,
        }
    }
}

/// Algorithm identifier from a JWT header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// ECDSA with an ASN.1 DER encoded (R,S) signature
    Ecdsa(HashWidth),
    /// HMAC
    Hmac(HashWidth),
    /// RSASSA-PSS
    RsaPss(HashWidth),
    /// RSASSA-PKCS1-v1_5
    Rsa(HashWidth),
    /// Unsecured token, empty signature
    None,
}

impl Algorithm {
    pub const ES256: Algorithm = Algorithm::Ecdsa(HashWidth::Sha256);
    pub const ES384: Algorithm = Algorithm::Ecdsa(HashWidth::Sha384);
    pub const ES512: Algorithm = Algorithm::Ecdsa(HashWidth::Sha512);
    pub const HS256: Algorithm = Algorithm::Hmac(HashWidth::Sha256);
    pub const HS384: Algorithm = Algorithm::Hmac(HashWidth::Sha384);
    pub const HS512: Algorithm = Algorithm::Hmac(HashWidth::Sha512);
    pub const PS256: Algorithm = Algorithm::RsaPss(HashWidth::Sha256);
    pub const PS384: Algorithm = Algorithm::RsaPss(HashWidth::Sha384);
    pub const PS512: Algorithm = Algorithm::RsaPss(HashWidth::Sha512);
    pub const RS256: Algorithm = Algorithm::Rsa(HashWidth::Sha256);
    pub const RS384: Algorithm = Algorithm::Rsa(HashWidth::Sha384);
    pub const RS512: Algorithm = Algorithm::Rsa(HashWidth::Sha512);

    /// All supported identifiers
    pub const fn all() -> [Algorithm; 13] {
        [
            Algorithm::ES256,
            Algorithm::ES384,
            Algorithm::ES512,
            Algorithm::HS256,
            Algorithm::HS384,
            Algorithm::HS512,
            Algorithm::PS256,
            Algorithm::PS384,
            Algorithm::PS512,
            Algorithm::RS256,
            Algorithm::RS384,
            Algorithm::RS512,
            Algorithm::None,
        ]
    }

    /// Convert to string representation
    pub const fn as_str(&self) -> &'static str {
        use HashWidth::*;

        match self {
            Algorithm::Ecdsa(Sha256) => "ES256",
            Algorithm::Ecdsa(Sha384) => "ES384",
            Algorithm::Ecdsa(Sha512) => "ES512",
            Algorithm::Hmac(Sha256) => "HS256",
            Algorithm::Hmac(Sha384) => "HS384",
            Algorithm::Hmac(Sha512) => "HS512",
            Algorithm::RsaPss(Sha256) => "PS256",
            Algorithm::RsaPss(Sha384) => "PS384",
            Algorithm::RsaPss(Sha512) => "PS512",
            Algorithm::Rsa(Sha256) => "RS256",
            Algorithm::Rsa(Sha384) => "RS384",
            Algorithm::Rsa(Sha512) => "RS512",
            Algorithm::None => "none",
        }
    }

    /// Key family this algorithm requires
    pub const fn family(&self) -> KeyFamily {
        match self {
            Algorithm::Ecdsa(_) => KeyFamily::Ecdsa,
            Algorithm::Hmac(_) => KeyFamily::Hmac,
            Algorithm::RsaPss(_) | Algorithm::Rsa(_) => KeyFamily::Rsa,
            Algorithm::None => KeyFamily::None,
        }
    }

    /// Sign `data` with `key`
    pub fn sign(&self, data: &[u8], key: &Key) -> Result<Vec<u8>> {
        self.reject_sentinel(key)?;

        match *self {
            Algorithm::Ecdsa(width) => ecdsa::sign(width, data, key),
            Algorithm::Hmac(width) => hmac::sign(width, data, key),
            Algorithm::RsaPss(width) => rsa::sign(rsa::Padding::Pss, width, data, key),
            Algorithm::Rsa(width) => rsa::sign(rsa::Padding::Pkcs1, width, data, key),
            Algorithm::None => {
                require_none_key(key)?;
                Ok(Vec::new())
            }
        }
    }

    /// Verify `signature` over `data` with `key`
    pub fn verify(&self, data: &[u8], signature: &[u8], key: &Key) -> Result<()> {
        if signature.len() > MAX_DECODED_SIGNATURE_SIZE {
            return Err(Error::InvalidSignature);
        }
        self.reject_sentinel(key)?;

        match *self {
            Algorithm::Ecdsa(width) => ecdsa::verify(width, data, signature, key),
            Algorithm::Hmac(width) => hmac::verify(width, data, signature, key),
            Algorithm::RsaPss(width) => {
                rsa::verify(rsa::Padding::Pss, width, data, signature, key)
            }
            Algorithm::Rsa(width) => {
                rsa::verify(rsa::Padding::Pkcs1, width, data, signature, key)
            }
            Algorithm::None => {
                require_none_key(key)?;
                if signature.is_empty() {
                    Ok(())
                } else {
                    Err(Error::InvalidSignature)
                }
            }
        }
    }

    /// The none-sentinel carries no key material for a signed algorithm
    fn reject_sentinel(&self, key: &Key) -> Result<()> {
        match (self, key) {
            (Algorithm::None, _) | (_, Key::Secret(_) | Key::Private(_) | Key::Public(_)) => Ok(()),
            (_, Key::None) => Err(Error::InvalidKeyType(key.key_type().to_string())),
        }
    }

    pub(crate) fn mismatch(&self, key: &Key) -> Error {
        Error::InvalidCombination {
            algorithm: *self,
            family: key.family(),
        }
    }
}

fn require_none_key(key: &Key) -> Result<()> {
    match key {
        Key::None => Ok(()),
        other => Err(Algorithm::None.mismatch(other)),
    }
}

impl std::str::FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s == "none" {
            return Ok(Algorithm::None);
        }

        let invalid = || Error::InvalidAlgorithm(s.to_string());
        if !s.is_ascii() || s.len() != 5 {
            return Err(invalid());
        }

        let (prefix, suffix) = s.split_at(2);
        let width = HashWidth::from_suffix(suffix).ok_or_else(invalid)?;
        match prefix {
            "ES" => Ok(Algorithm::Ecdsa(width)),
            "HS" => Ok(Algorithm::Hmac(width)),
            "PS" => Ok(Algorithm::RsaPss(width)),
            "RS" => Ok(Algorithm::Rsa(width)),
            _ => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Algorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for Algorithm {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
