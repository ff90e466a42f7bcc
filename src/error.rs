//! Errors for jwtoken
//!
//! Operations that pass through several stages (encode, decode, verify) wrap
//! the lower-level cause in a stage-tagged variant, so the outermost error
//! names both the failing operation and the root cause. Use [`Error::cause`]
//! to get at the root.

use crate::algorithm::Algorithm;
use crate::keys::KeyFamily;
use thiserror::Error;

/// Stage of an encode, decode or verify operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Splitting the token text into segments
    Parts,
    /// Building or parsing the header segment
    Header,
    /// Building or parsing the claims segment
    Claims,
    /// Producing or checking the signature segment
    Signature,
}

impl Stage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Stage::Parts => "parts",
            Stage::Header => "header",
            Stage::Claims => "claims",
            Stage::Signature => "signature",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// jwtoken errors
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Stage Errors
    // ============================================================================
    /// Encoding failed at `stage`
    #[error("Cannot encode token {stage}: {source}")]
    EncodeFailed {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    /// Decoding failed at `stage`
    #[error("Cannot decode token {stage}: {source}")]
    DecodeFailed {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    /// Verification failed at `stage`
    #[error("Cannot verify token {stage}: {source}")]
    VerifyFailed {
        stage: Stage,
        #[source]
        source: Box<Error>,
    },

    // ============================================================================
    // Format Errors
    // ============================================================================
    /// Invalid JWT format (not three `.`-separated parts)
    #[error("Invalid JWT format: expected three parts separated by '.'")]
    InvalidFormat,

    /// Token text, or a decoded segment, exceeds its size limit
    #[error("Token too large: {size} bytes (maximum: {max} bytes)")]
    TokenTooLarge { size: usize, max: usize },

    /// Base64URL decoding failed
    #[error("Base64URL decoding failed: {0}")]
    InvalidBase64(String),

    /// JSON parsing or serialization failed
    #[error("JSON processing failed: {0}")]
    InvalidJson(String),

    // ============================================================================
    // Algorithm and Key Errors
    // ============================================================================
    /// Unknown algorithm identifier
    #[error("Algorithm '{0}' is not supported")]
    InvalidAlgorithm(String),

    /// Key cannot serve this operation, such as a public key asked to sign
    #[error("Key of type '{0}' cannot be used for this operation")]
    InvalidKeyType(String),

    /// Key family or curve does not match the algorithm
    #[error("Algorithm '{algorithm}' cannot be combined with a {family} key")]
    InvalidCombination {
        algorithm: Algorithm,
        family: KeyFamily,
    },

    /// Signature does not match the signing input and key
    #[error("Signature verification failed")]
    InvalidSignature,

    /// Crypto backend refused to sign
    #[error("Signing failed")]
    SigningFailed,

    /// Decoded tokens carry no key
    #[error("Token carries no key")]
    NoKeyAvailable,

    // ============================================================================
    // PEM Loading Errors
    // ============================================================================
    /// Reading the PEM source failed
    #[error("Cannot read PEM: {0}")]
    CannotReadPem(#[source] std::io::Error),

    /// PEM armour is malformed
    #[error("Cannot decode PEM: {0}")]
    CannotDecodePem(String),

    /// PEM body is not a valid key of the expected family
    #[error("Cannot parse {family} key: {reason}")]
    CannotParseKey { family: KeyFamily, reason: String },

    /// Public key or certificate holds a key of another family
    #[error("PEM holds no {0} key")]
    NoKeyOfExpectedType(KeyFamily),

    // ============================================================================
    // Request Errors
    // ============================================================================
    /// Authorization header missing or not `Bearer <token>`
    #[error("Invalid Authorization header: {0}")]
    InvalidAuthorization(&'static str),

    /// Claims are outside their validity window
    #[error("Token is expired or not yet valid")]
    TokenNotValid,

    // ============================================================================
    // Cache Errors
    // ============================================================================
    /// Cache created outside a Tokio runtime
    #[error("No Tokio runtime to run the cache sweeper on")]
    NoRuntime,
}

impl Error {
    pub(crate) fn encode(stage: Stage, source: Error) -> Self {
        Error::EncodeFailed {
            stage,
            source: Box::new(source),
        }
    }

    pub(crate) fn decode(stage: Stage, source: Error) -> Self {
        Error::DecodeFailed {
            stage,
            source: Box::new(source),
        }
    }

    pub(crate) fn verify(stage: Stage, source: Error) -> Self {
        Error::VerifyFailed {
            stage,
            source: Box::new(source),
        }
    }

    /// Innermost cause, skipping stage wrappers
    pub fn cause(&self) -> &Error {
        match self {
            Error::EncodeFailed { source, .. }
            | Error::DecodeFailed { source, .. }
            | Error::VerifyFailed { source, .. } => source.cause(),
            other => other,
        }
    }

    /// Stage tag of a stage error, if any
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Error::EncodeFailed { stage, .. }
            | Error::DecodeFailed { stage, .. }
            | Error::VerifyFailed { stage, .. } => Some(*stage),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidJson(e.to_string())
    }
}

/// Result type alias for jwtoken operations
pub type Result<T> = std::result::Result<T, Error>;
