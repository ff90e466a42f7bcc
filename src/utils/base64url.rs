//! Base64URL encoding/decoding per RFC 4648
//!
//! This module provides a thin wrapper around the `base64` crate with
//! size limit validation for security.

use crate::error::{Error, Result};
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};

/// Encode bytes to Base64URL string without padding
pub(crate) fn encode_bytes(input: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode Base64URL string to bytes with maximum size limit
pub(crate) fn decode_bytes(input: &str, max_size: usize) -> Result<Vec<u8>> {
    let result = URL_SAFE_NO_PAD
        .decode(input)
        .map_err(|e| Error::InvalidBase64(format!("Base64URL decode failed: {e}")))?;

    if result.len() > max_size {
        return Err(Error::InvalidBase64(format!(
            "Decoded size exceeds limit: {} bytes (max: {})",
            result.len(),
            max_size
        )));
    }

    Ok(result)
}
