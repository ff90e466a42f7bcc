use crate::algorithm::Algorithm;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Token type written into every header
pub const JWT_TYPE: &str = "JWT";

/// JWT header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    algorithm: Algorithm,
    token_type: Option<String>,
}

#[derive(Serialize)]
struct RawHeader<'a> {
    alg: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    typ: Option<&'a str>,
}

impl Header {
    /// Header for a new token signed with `algorithm`
    pub fn new(algorithm: Algorithm) -> Self {
        Self {
            algorithm,
            token_type: Some(JWT_TYPE.to_string()),
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Token type (`typ`), `"JWT"` for tokens built here
    pub fn token_type(&self) -> Option<&str> {
        self.token_type.as_deref()
    }

    pub(crate) fn to_json(&self) -> Result<Vec<u8>> {
        let raw = RawHeader {
            alg: self.algorithm.as_str(),
            typ: self.token_type.as_deref(),
        };
        Ok(serde_json::to_vec(&raw)?)
    }

    pub(crate) fn from_json(json: &[u8]) -> Result<Self> {
        // `alg` stays a string until validated
        #[derive(Deserialize)]
        struct OwnedHeader {
            alg: String,
            #[serde(default)]
            typ: Option<String>,
        }

        let raw: OwnedHeader = serde_json::from_slice(json).map_err(Error::from)?;
        Ok(Self {
            algorithm: raw.alg.parse()?,
            token_type: raw.typ,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_json_shape() {
        let json = Header::new(Algorithm::HS256).to_json().unwrap();
        assert_eq!(json, br#"{"alg":"HS256","typ":"JWT"}"#);
    }

    #[test]
    fn test_header_parse() {
        let header = Header::from_json(br#"{"typ":"JWT","alg":"ES384","kid":"k1"}"#).unwrap();
        assert_eq!(header.algorithm(), Algorithm::ES384);
        assert_eq!(header.token_type(), Some("JWT"));

        let header = Header::from_json(br#"{"alg":"none"}"#).unwrap();
        assert_eq!(header.algorithm(), Algorithm::None);
        assert_eq!(header.token_type(), None);
    }

    #[test]
    fn test_header_unknown_algorithm() {
        let result = Header::from_json(br#"{"alg":"HS1024","typ":"JWT"}"#);
        assert!(matches!(result, Err(Error::InvalidAlgorithm(ref a)) if a == "HS1024"));
    }

    #[test]
    fn test_header_missing_algorithm() {
        let result = Header::from_json(br#"{"typ":"JWT"}"#);
        assert!(matches!(result, Err(Error::InvalidJson(_))));
    }
}
