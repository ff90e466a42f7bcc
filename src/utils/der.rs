//! DER utilities for extracting public keys from SubjectPublicKeyInfo and
//! X.509 certificates
//!
//! Uses the RustCrypto `spki`, `der` and `x509-cert` crates. Extracted keys are
//! returned in the raw form the aws-lc-rs verifiers take: the PKCS#1
//! RSAPublicKey for RSA, the uncompressed SEC1 point for ECDSA.

use crate::keys::EcdsaCurve;
use der::{Decode, Encode};
use spki::{ObjectIdentifier, SubjectPublicKeyInfoRef};
use x509_cert::Certificate;

const RSA_ENCRYPTION_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.113549.1.1.1");
const EC_PUBLIC_KEY_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

const SECP256R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
const SECP384R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.34");
const SECP521R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

/// Public key extracted from a SubjectPublicKeyInfo
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SpkiKey {
    /// PKCS#1 RSAPublicKey DER
    Rsa(Vec<u8>),
    /// Uncompressed SEC1 point and its curve
    Ecdsa { point: Vec<u8>, curve: EcdsaCurve },
    /// Any other key algorithm
    Other(ObjectIdentifier),
}

/// Parse a DER SubjectPublicKeyInfo
pub(crate) fn parse_spki(der: &[u8]) -> Result<SpkiKey, String> {
    let spki = SubjectPublicKeyInfoRef::try_from(der).map_err(|e| format!("spki: {e}"))?;
    let key_bytes = spki
        .subject_public_key
        .as_bytes()
        .ok_or_else(|| "spki: public key has unused bits".to_string())?
        .to_vec();

    let oid = spki.algorithm.oid;
    if oid == RSA_ENCRYPTION_OID {
        Ok(SpkiKey::Rsa(key_bytes))
    } else if oid == EC_PUBLIC_KEY_OID {
        let curve_oid = spki
            .algorithm
            .parameters_oid()
            .map_err(|e| format!("spki: missing curve: {e}"))?;
        let curve = curve_from_oid(curve_oid)
            .ok_or_else(|| format!("spki: unsupported curve {curve_oid}"))?;
        Ok(SpkiKey::Ecdsa {
            point: key_bytes,
            curve,
        })
    } else {
        Ok(SpkiKey::Other(oid))
    }
}

/// Re-encode the SubjectPublicKeyInfo embedded in a DER certificate
pub(crate) fn spki_from_certificate(der: &[u8]) -> Result<Vec<u8>, String> {
    let cert = Certificate::from_der(der).map_err(|e| format!("certificate: {e}"))?;
    cert.tbs_certificate
        .subject_public_key_info
        .to_der()
        .map_err(|e| format!("certificate: {e}"))
}

fn curve_from_oid(oid: ObjectIdentifier) -> Option<EcdsaCurve> {
    [
        (SECP256R1_OID, EcdsaCurve::P256),
        (SECP384R1_OID, EcdsaCurve::P384),
        (SECP521R1_OID, EcdsaCurve::P521),
    ]
    .into_iter()
    .find_map(|(known, curve)| (known == oid).then_some(curve))
}
