use crate::algorithm::{Algorithm, HashWidth};
use crate::error::{Error, Result};
use crate::keys::{Key, PrivateKey, PublicKey};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaEncoding, UnparsedPublicKey, VerificationAlgorithm};

/// RSA signature padding scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Padding {
    /// RSASSA-PKCS1-v1_5 (RS*)
    Pkcs1,
    /// RSASSA-PSS (PS*); signs with a digest-length salt, verifies any salt length
    Pss,
}

impl Padding {
    fn algorithm(self, width: HashWidth) -> Algorithm {
        match self {
            Padding::Pkcs1 => Algorithm::Rsa(width),
            Padding::Pss => Algorithm::RsaPss(width),
        }
    }

    fn encoding(self, width: HashWidth) -> &'static dyn RsaEncoding {
        match (self, width) {
            (Padding::Pkcs1, HashWidth::Sha256) => &signature::RSA_PKCS1_SHA256,
            (Padding::Pkcs1, HashWidth::Sha384) => &signature::RSA_PKCS1_SHA384,
            (Padding::Pkcs1, HashWidth::Sha512) => &signature::RSA_PKCS1_SHA512,
            (Padding::Pss, HashWidth::Sha256) => &signature::RSA_PSS_SHA256,
            (Padding::Pss, HashWidth::Sha384) => &signature::RSA_PSS_SHA384,
            (Padding::Pss, HashWidth::Sha512) => &signature::RSA_PSS_SHA512,
        }
    }

    fn verification(self, width: HashWidth) -> &'static dyn VerificationAlgorithm {
        match (self, width) {
            (Padding::Pkcs1, HashWidth::Sha256) => &signature::RSA_PKCS1_2048_8192_SHA256,
            (Padding::Pkcs1, HashWidth::Sha384) => &signature::RSA_PKCS1_2048_8192_SHA384,
            (Padding::Pkcs1, HashWidth::Sha512) => &signature::RSA_PKCS1_2048_8192_SHA512,
            (Padding::Pss, HashWidth::Sha256) => &signature::RSA_PSS_2048_8192_SHA256,
            (Padding::Pss, HashWidth::Sha384) => &signature::RSA_PSS_2048_8192_SHA384,
            (Padding::Pss, HashWidth::Sha512) => &signature::RSA_PSS_2048_8192_SHA512,
        }
    }
}

pub(super) fn sign(padding: Padding, width: HashWidth, data: &[u8], key: &Key) -> Result<Vec<u8>> {
    let private = match key {
        Key::Private(PrivateKey::Rsa(private)) => private,
        Key::Public(PublicKey::Rsa(_)) => {
            return Err(Error::InvalidKeyType(key.key_type().to_string()));
        }
        other => return Err(padding.algorithm(width).mismatch(other)),
    };

    let pair = private.pair();
    let mut signature = vec![0u8; pair.public_modulus_len()];
    pair.sign(
        padding.encoding(width),
        &SystemRandom::new(),
        data,
        &mut signature,
    )
    .map_err(|_| Error::SigningFailed)?;

    Ok(signature)
}

/// Verify an RSA signature; a private key verifies through its public half
pub(super) fn verify(
    padding: Padding,
    width: HashWidth,
    data: &[u8],
    signature: &[u8],
    key: &Key,
) -> Result<()> {
    let der = match key {
        Key::Private(PrivateKey::Rsa(private)) => private.public_der(),
        Key::Public(PublicKey::Rsa(public)) => public.as_der(),
        other => return Err(padding.algorithm(width).mismatch(other)),
    };

    let verified =
        UnparsedPublicKey::new(padding.verification(width), der).verify(data, signature);
    match (verified, padding) {
        (Ok(()), _) => Ok(()),
        (Err(_), Padding::Pss) => super::pss::verify(width, data, signature, der),
        (Err(_), Padding::Pkcs1) => Err(Error::InvalidSignature),
    }
}
