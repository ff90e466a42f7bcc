use crate::algorithm::{Algorithm, HashWidth};
use crate::error::{Error, Result};
use crate::keys::{EcdsaCurve, Key, KeyFamily, PrivateKey, PublicKey};

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::UnparsedPublicKey;

/// Curve mandated by each ES* identifier
fn required_curve(width: HashWidth) -> EcdsaCurve {
    match width {
        HashWidth::Sha256 => EcdsaCurve::P256,
        HashWidth::Sha384 => EcdsaCurve::P384,
        HashWidth::Sha512 => EcdsaCurve::P521,
    }
}

fn check_curve(width: HashWidth, curve: EcdsaCurve) -> Result<()> {
    if curve == required_curve(width) {
        Ok(())
    } else {
        Err(Error::InvalidCombination {
            algorithm: Algorithm::Ecdsa(width),
            family: KeyFamily::Ecdsa,
        })
    }
}

/// Sign, producing an ASN.1 DER encoded signature
pub(super) fn sign(width: HashWidth, data: &[u8], key: &Key) -> Result<Vec<u8>> {
    let private = match key {
        Key::Private(PrivateKey::Ecdsa(private)) => private,
        Key::Public(PublicKey::Ecdsa(_)) => {
            return Err(Error::InvalidKeyType(key.key_type().to_string()));
        }
        other => return Err(Algorithm::Ecdsa(width).mismatch(other)),
    };
    check_curve(width, private.curve())?;

    let rng = SystemRandom::new();
    let signature = private
        .pair()
        .sign(&rng, data)
        .map_err(|_| Error::SigningFailed)?;

    Ok(signature.as_ref().to_vec())
}

/// Verify an ASN.1 DER encoded signature
///
/// A private key verifies through its public half.
pub(super) fn verify(width: HashWidth, data: &[u8], signature: &[u8], key: &Key) -> Result<()> {
    let (point, curve) = match key {
        Key::Private(PrivateKey::Ecdsa(private)) => (private.public_point(), private.curve()),
        Key::Public(PublicKey::Ecdsa(public)) => (public.as_bytes(), public.curve()),
        other => return Err(Algorithm::Ecdsa(width).mismatch(other)),
    };
    check_curve(width, curve)?;

    UnparsedPublicKey::new(curve.verification_algorithm(), point)
        .verify(data, signature)
        .map_err(|_| Error::InvalidSignature)
}
