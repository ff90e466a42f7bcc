//! Size limit constants for input validation

/// Maximum length for a JWT token string (64KB)
pub(crate) const MAX_TOKEN_LENGTH: usize = 64 * 1024;

/// Maximum size for decoded JWT header JSON (8KB)
pub(crate) const MAX_DECODED_HEADER_SIZE: usize = 8 * 1024;

/// Maximum size for decoded JWT claims JSON (64KB)
pub(crate) const MAX_DECODED_CLAIMS_SIZE: usize = 64 * 1024;

/// Maximum size for decoded signature bytes (1KB)
/// RSA-4096 signatures are 512 bytes, ES512 DER signatures stay under 140
pub(crate) const MAX_DECODED_SIGNATURE_SIZE: usize = 1024;

/// Maximum size for a PEM document handed to the key loaders (1MB)
pub(crate) const MAX_PEM_SIZE: u64 = 1024 * 1024;
