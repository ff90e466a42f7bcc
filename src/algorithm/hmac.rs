use crate::algorithm::{Algorithm, HashWidth};
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};

/// Sign with HMAC of the given width
pub(super) fn sign(width: HashWidth, data: &[u8], key: &Key) -> Result<Vec<u8>> {
    let secret = secret(width, key)?;
    mac(width, data, secret)
}

/// Verify an HMAC signature with constant-time comparison
pub(super) fn verify(width: HashWidth, data: &[u8], signature: &[u8], key: &Key) -> Result<()> {
    let secret = secret(width, key)?;
    let expected = mac(width, data, secret)?;

    if signature.len() != expected.len() {
        return Err(Error::InvalidSignature);
    }

    if constant_time_eq(signature, &expected) {
        Ok(())
    } else {
        Err(Error::InvalidSignature)
    }
}

fn secret(width: HashWidth, key: &Key) -> Result<&[u8]> {
    match key {
        Key::Secret(secret) => Ok(secret.as_bytes()),
        other => Err(Algorithm::Hmac(width).mismatch(other)),
    }
}

fn mac(width: HashWidth, data: &[u8], secret: &[u8]) -> Result<Vec<u8>> {
    let invalid = |_| Error::InvalidKeyType("secret".to_string());

    let digest = match width {
        HashWidth::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret).map_err(invalid)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashWidth::Sha384 => {
            let mut mac = Hmac::<Sha384>::new_from_slice(secret).map_err(invalid)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
        HashWidth::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(secret).map_err(invalid)?;
            mac.update(data);
            mac.finalize().into_bytes().to_vec()
        }
    };

    Ok(digest)
}
