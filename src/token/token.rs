//! The [`Token`] type and its encode, decode and verify operations
//!
//! A token is immutable once built. Its canonical text is three
//! base64url-no-padding segments joined by `.`:
//!
//! ```text
//! base64url(header JSON) . base64url(claims JSON) . base64url(signature)
//! ```

use crate::algorithm::Algorithm;
use crate::claims::Claims;
use crate::error::{Error, Result, Stage};
use crate::keys::Key;
use crate::limits::{
    MAX_DECODED_CLAIMS_SIZE, MAX_DECODED_HEADER_SIZE, MAX_DECODED_SIGNATURE_SIZE,
    MAX_TOKEN_LENGTH,
};
use crate::token::Header;
use crate::utils::base64url;
use std::time::Duration;
use tracing::debug;

/// An encoded, decoded or verified JWT
///
/// ```
/// use jwtoken::{Algorithm, Claims, Key, Token};
///
/// let key = Key::secret("secret");
/// let mut claims = Claims::new();
/// claims.set_subject("1234567890");
///
/// let token = Token::encode(claims, &key, Algorithm::HS512)?;
/// let verified = Token::verify(token.as_str(), &key)?;
/// assert_eq!(verified.claims().subject().as_deref(), Some("1234567890"));
/// # Ok::<(), jwtoken::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Token {
    text: String,
    signing_input_len: usize,
    header: Header,
    claims: Claims,
    key: Option<Key>,
}

/// Encoded tokens must stay decodable
fn check_length(size: usize) -> Result<()> {
    if size > MAX_TOKEN_LENGTH {
        return Err(Error::encode(
            Stage::Claims,
            Error::TokenTooLarge {
                size,
                max: MAX_TOKEN_LENGTH,
            },
        ));
    }
    Ok(())
}

/// Segments of a token text, checked for count and size only
struct Segments<'a> {
    header: &'a str,
    claims: &'a str,
    signature: &'a str,
    signing_input: &'a str,
}

impl<'a> Segments<'a> {
    fn split(text: &'a str) -> Result<Self> {
        if text.len() > MAX_TOKEN_LENGTH {
            return Err(Error::TokenTooLarge {
                size: text.len(),
                max: MAX_TOKEN_LENGTH,
            });
        }

        let mut parts = text.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(header), Some(claims), Some(signature), None) => Ok(Self {
                header,
                claims,
                signature,
                signing_input: &text[..header.len() + 1 + claims.len()],
            }),
            _ => Err(Error::InvalidFormat),
        }
    }

    fn header(&self) -> Result<Header> {
        let json = base64url::decode_bytes(self.header, MAX_DECODED_HEADER_SIZE)?;
        Header::from_json(&json)
    }

    fn claims(&self) -> Result<Claims> {
        let json = base64url::decode_bytes(self.claims, MAX_DECODED_CLAIMS_SIZE)?;
        Ok(serde_json::from_slice(&json)?)
    }

    fn signature(&self) -> Result<Vec<u8>> {
        base64url::decode_bytes(self.signature, MAX_DECODED_SIGNATURE_SIZE)
    }
}

impl Token {
    /// Build and sign a token
    ///
    /// Fails with [`Error::EncodeFailed`] tagged with the stage that failed.
    /// Claims too large for the token to be decoded again fail at the claims
    /// stage with [`Error::TokenTooLarge`].
    pub fn encode(claims: Claims, key: &Key, algorithm: Algorithm) -> Result<Self> {
        let header = Header::new(algorithm);
        let header_json = header
            .to_json()
            .map_err(|e| Error::encode(Stage::Header, e))?;
        let claims_json =
            serde_json::to_vec(&claims).map_err(|e| Error::encode(Stage::Claims, e.into()))?;

        let signing_input = format!(
            "{}.{}",
            base64url::encode_bytes(&header_json),
            base64url::encode_bytes(&claims_json)
        );
        check_length(signing_input.len() + 1)?;
        let signature = algorithm
            .sign(signing_input.as_bytes(), key)
            .map_err(|e| Error::encode(Stage::Signature, e))?;

        let signing_input_len = signing_input.len();
        let mut text = signing_input;
        text.push('.');
        text.push_str(&base64url::encode_bytes(&signature));
        check_length(text.len())?;

        Ok(Self {
            text,
            signing_input_len,
            header,
            claims,
            key: Some(key.clone()),
        })
    }

    /// Parse a token without checking its signature
    ///
    /// The result carries no key; [`Token::key`] fails on it.
    pub fn decode(text: &str) -> Result<Self> {
        let segments = Segments::split(text).map_err(|e| Error::decode(Stage::Parts, e))?;
        let header = segments
            .header()
            .map_err(|e| Error::decode(Stage::Header, e))?;
        let claims = segments
            .claims()
            .map_err(|e| Error::decode(Stage::Claims, e))?;

        Ok(Self {
            text: text.to_string(),
            signing_input_len: segments.signing_input.len(),
            header,
            claims,
            key: None,
        })
    }

    /// Parse a token and check its signature with `key`
    ///
    /// Claims are only parsed once the signature holds.
    pub fn verify(text: &str, key: &Key) -> Result<Self> {
        let result = Self::verify_inner(text, key);
        if let Err(e) = &result {
            debug!(
                stage = e.stage().map(|s| s.as_str()),
                error = %e.cause(),
                "token verification failed"
            );
        }
        result
    }

    fn verify_inner(text: &str, key: &Key) -> Result<Self> {
        let segments = Segments::split(text).map_err(|e| Error::verify(Stage::Parts, e))?;
        let header = segments
            .header()
            .map_err(|e| Error::verify(Stage::Header, e))?;

        let signature = segments
            .signature()
            .map_err(|e| Error::verify(Stage::Signature, e))?;
        header
            .algorithm()
            .verify(segments.signing_input.as_bytes(), &signature, key)
            .map_err(|e| Error::verify(Stage::Signature, e))?;

        let claims = segments
            .claims()
            .map_err(|e| Error::verify(Stage::Claims, e))?;

        Ok(Self {
            text: text.to_string(),
            signing_input_len: segments.signing_input.len(),
            header,
            claims,
            key: Some(key.clone()),
        })
    }

    /// Canonical token text
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    pub fn algorithm(&self) -> Algorithm {
        self.header.algorithm()
    }

    pub fn claims(&self) -> &Claims {
        &self.claims
    }

    /// Base64url encoded signature segment
    pub fn signature(&self) -> &str {
        self.text
            .get(self.signing_input_len + 1..)
            .unwrap_or_default()
    }

    /// Key the token was encoded or verified with
    pub fn key(&self) -> Result<&Key> {
        self.key.as_ref().ok_or(Error::NoKeyAvailable)
    }

    /// Check the time-bound claims with the given clock-skew tolerance
    pub fn is_valid(&self, leeway: Duration) -> bool {
        self.claims.is_valid(leeway)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Tokens compare by their canonical text
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Token {}
