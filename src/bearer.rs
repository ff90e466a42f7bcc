//! Bearer-token plumbing for request layers
//!
//! The core has no HTTP awareness beyond this module: it reads a token from
//! an `Authorization: Bearer <token>` header and keeps the verified token in
//! the request's [`Extensions`] for later processing stages. Translating
//! errors into 401/403 responses is left to the caller.

use crate::cache::Cache;
use crate::error::{Error, Result};
use crate::keys::Key;
use crate::token::Token;
use http::header::AUTHORIZATION;
use http::{Extensions, HeaderMap};
use std::time::Duration;
use tracing::trace;

const BEARER: &str = "Bearer";

/// Private key type for the request-scoped token
#[derive(Clone)]
struct Authenticated(Token);

/// Extract the token from an Authorization header value
///
/// The value must hold exactly two whitespace-separated fields, the first
/// being literally `Bearer`.
pub fn token_from_authorization(value: &str) -> Result<&str> {
    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(BEARER), Some(token), None) => Ok(token),
        (Some(BEARER), _, _) => Err(Error::InvalidAuthorization("expected 'Bearer <token>'")),
        (Some(_), _, _) => Err(Error::InvalidAuthorization("scheme is not Bearer")),
        (None, _, _) => Err(Error::InvalidAuthorization("empty header")),
    }
}

/// Extract the token from a request's Authorization header
pub fn token_from_headers(headers: &HeaderMap) -> Result<&str> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(Error::InvalidAuthorization("header missing"))?
        .to_str()
        .map_err(|_| Error::InvalidAuthorization("header is not visible ASCII"))?;
    token_from_authorization(value)
}

/// Store a verified token in request-scoped extensions
///
/// Returns the token previously stored, if any.
pub fn store(extensions: &mut Extensions, token: Token) -> Option<Token> {
    extensions
        .insert(Authenticated(token))
        .map(|Authenticated(previous)| previous)
}

/// Token stored by [`store`]
pub fn token(extensions: &Extensions) -> Option<&Token> {
    extensions
        .get::<Authenticated>()
        .map(|Authenticated(token)| token)
}

/// Authenticate a request from its headers
///
/// Consults `cache` first; on a miss the token is verified with `key`,
/// checked for validity under the cache leeway (no leeway without a cache)
/// and cached. A cache must only ever be used with one key.
pub fn authenticate(headers: &HeaderMap, key: &Key, cache: Option<&Cache>) -> Result<Token> {
    let text = token_from_headers(headers)?;

    if let Some(token) = cache.and_then(|cache| cache.get(text)) {
        trace!("bearer token served from cache");
        return Ok(token);
    }

    let token = Token::verify(text, key)?;
    let leeway = cache.map_or(Duration::ZERO, |cache| cache.config().leeway);
    if !token.is_valid(leeway) {
        return Err(Error::TokenNotValid);
    }

    if let Some(cache) = cache {
        cache.put(token.clone());
    }
    Ok(token)
}
