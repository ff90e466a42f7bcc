//! RSASSA-PSS verification with salt length auto-detection
//!
//! The fast path in [`super::rsa`] only accepts a salt as long as the digest.
//! Signers are free to pick any salt length (OpenSSL's `saltlen:max` is a
//! common default), so verification recovers the encoded message, reads the
//! salt length out of it and checks the signature with that length.

use crate::algorithm::HashWidth;
use crate::error::{Error, Result};

use der::Decode;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pss, RsaPublicKey};
use sha2::digest::DynDigest;
use sha2::{Digest, Sha256, Sha384, Sha512};

/// Largest modulus aws-lc-rs accepts for verification
const MAX_MODULUS_BITS: usize = 8192;

/// Verify a PSS signature whatever salt length the signer used
///
/// `der` is a PKCS#1 `RSAPublicKey`.
pub(super) fn verify(width: HashWidth, data: &[u8], signature: &[u8], der: &[u8]) -> Result<()> {
    let key = public_key(der)?;
    match width {
        HashWidth::Sha256 => verify_with::<Sha256>(&key, data, signature),
        HashWidth::Sha384 => verify_with::<Sha384>(&key, data, signature),
        HashWidth::Sha512 => verify_with::<Sha512>(&key, data, signature),
    }
}

fn public_key(der: &[u8]) -> Result<RsaPublicKey> {
    let parsed = rsa::pkcs1::RsaPublicKey::from_der(der).map_err(|_| Error::InvalidSignature)?;
    RsaPublicKey::new_with_max_size(
        BigUint::from_bytes_be(parsed.modulus.as_bytes()),
        BigUint::from_bytes_be(parsed.public_exponent.as_bytes()),
        MAX_MODULUS_BITS,
    )
    .map_err(|_| Error::InvalidSignature)
}

fn verify_with<D>(key: &RsaPublicKey, data: &[u8], signature: &[u8]) -> Result<()>
where
    D: 'static + Digest + DynDigest + Send + Sync,
{
    let salt_len = salt_len::<D>(key, signature).ok_or(Error::InvalidSignature)?;
    key.verify(Pss::new_with_salt::<D>(salt_len), &D::digest(data), signature)
        .map_err(|_| Error::InvalidSignature)
}

/// Recover the salt length from the encoded message (RFC 8017, 9.1.2)
///
/// Only reads the structure; the hash comparison is left to the `rsa` crate.
fn salt_len<D: Digest>(key: &RsaPublicKey, signature: &[u8]) -> Option<usize> {
    if signature.len() != key.size() {
        return None;
    }
    let s = BigUint::from_bytes_be(signature);
    if &s >= key.n() {
        return None;
    }

    let em_bits = key.n().bits() - 1;
    let em_len = em_bits.div_ceil(8);
    let h_len = <D as Digest>::output_size();
    let raw = s.modpow(key.e(), key.n()).to_bytes_be();
    if raw.len() > em_len || em_len < h_len + 2 {
        return None;
    }

    let mut em = vec![0u8; em_len - raw.len()];
    em.extend_from_slice(&raw);
    if em[em_len - 1] != 0xbc {
        return None;
    }

    let (db, rest) = em.split_at_mut(em_len - h_len - 1);
    mgf1_xor::<D>(db, &rest[..h_len]);
    db[0] &= 0xffu8 >> (8 * em_len - em_bits);

    let start = db.iter().position(|&b| b != 0)?;
    (db[start] == 0x01).then(|| db.len() - start - 1)
}

fn mgf1_xor<D: Digest>(out: &mut [u8], seed: &[u8]) {
    for (counter, chunk) in out.chunks_mut(<D as Digest>::output_size()).enumerate() {
        let block = Digest::finalize(
            D::new()
                .chain_update(seed)
                .chain_update((counter as u32).to_be_bytes()),
        );
        for (byte, mask) in chunk.iter_mut().zip(block.iter()) {
            *byte ^= mask;
        }
    }
}
