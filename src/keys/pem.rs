//! PEM loaders for asymmetric keys
//!
//! Each loader runs three stages and tags failures accordingly: reading the
//! stream (`CannotReadPem`), decoding the PEM armour (`CannotDecodePem`) and
//! parsing the DER payload (`CannotParseKey`). Public-key loaders finally check
//! the parsed key belongs to the requested family (`NoKeyOfExpectedType`).

use super::{Key, KeyFamily};
use crate::error::{Error, Result};
use crate::limits::MAX_PEM_SIZE;
use crate::utils::der::{SpkiKey, parse_spki, spki_from_certificate};
use std::io::Read;

/// Expected kind of key in a PEM document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    EcPrivate,
    EcPublic,
    RsaPrivate,
    RsaPublic,
}

/// Load a key of the given kind
pub fn load_key(reader: impl Read, kind: KeyKind) -> Result<Key> {
    match kind {
        KeyKind::EcPrivate => load_ec_private_key(reader),
        KeyKind::EcPublic => load_ec_public_key(reader),
        KeyKind::RsaPrivate => load_rsa_private_key(reader),
        KeyKind::RsaPublic => load_rsa_public_key(reader),
    }
}

/// Load an ECDSA private key (SEC1 `EC PRIVATE KEY` or PKCS#8 `PRIVATE KEY`)
pub fn load_ec_private_key(reader: impl Read) -> Result<Key> {
    let der = read_pem(reader)?;
    Key::ecdsa_private_der(&der)
}

/// Load an RSA private key (PKCS#1 `RSA PRIVATE KEY` or PKCS#8 `PRIVATE KEY`)
pub fn load_rsa_private_key(reader: impl Read) -> Result<Key> {
    let der = read_pem(reader)?;
    Key::rsa_private_der(&der)
}

/// Load an ECDSA public key from a SubjectPublicKeyInfo or a certificate
pub fn load_ec_public_key(reader: impl Read) -> Result<Key> {
    let der = read_pem(reader)?;
    match public_key_from_der(&der, KeyFamily::Ecdsa)? {
        SpkiKey::Ecdsa { point, curve } => Ok(Key::ecdsa_public(point, curve)),
        _ => Err(Error::NoKeyOfExpectedType(KeyFamily::Ecdsa)),
    }
}

/// Load an RSA public key from a SubjectPublicKeyInfo or a certificate
pub fn load_rsa_public_key(reader: impl Read) -> Result<Key> {
    let der = read_pem(reader)?;
    match public_key_from_der(&der, KeyFamily::Rsa)? {
        SpkiKey::Rsa(der) => Ok(Key::rsa_public(der)),
        _ => Err(Error::NoKeyOfExpectedType(KeyFamily::Rsa)),
    }
}

/// Read the stream and strip the PEM armour
fn read_pem(reader: impl Read) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_PEM_SIZE)
        .read_to_end(&mut bytes)
        .map_err(Error::CannotReadPem)?;

    let block = ::pem::parse(&bytes).map_err(|e| Error::CannotDecodePem(e.to_string()))?;
    Ok(block.into_contents())
}

/// Parse DER as SubjectPublicKeyInfo, falling back to a certificate
fn public_key_from_der(der: &[u8], family: KeyFamily) -> Result<SpkiKey> {
    match parse_spki(der) {
        Ok(key) => Ok(key),
        Err(spki_reason) => {
            let spki = spki_from_certificate(der).map_err(|cert_reason| Error::CannotParseKey {
                family,
                reason: format!("{spki_reason}; {cert_reason}"),
            })?;
            parse_spki(&spki).map_err(|reason| Error::CannotParseKey { family, reason })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn test_read_failure_is_tagged() {
        assert!(matches!(
            load_rsa_public_key(FailingReader),
            Err(Error::CannotReadPem(_))
        ));
    }

    #[test]
    fn test_missing_armour_is_tagged() {
        assert!(matches!(
            load_ec_private_key(&b"no pem here"[..]),
            Err(Error::CannotDecodePem(_))
        ));
    }

    #[test]
    fn test_garbage_payload_is_tagged() {
        let pem = "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
        assert!(matches!(
            load_ec_public_key(pem.as_bytes()),
            Err(Error::CannotParseKey {
                family: KeyFamily::Ecdsa,
                ..
            })
        ));
    }

    #[test]
    fn test_load_key_dispatches_on_kind() {
        assert!(matches!(
            load_key(&b""[..], KeyKind::RsaPrivate),
            Err(Error::CannotDecodePem(_))
        ));
    }
}
