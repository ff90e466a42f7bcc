//! Token claims
//!
//! [`Claims`] is a JSON object of dynamically-typed values. Besides the
//! generic accessors it offers typed getters that coerce between
//! representations, and dedicated accessors for the reserved claims of
//! [RFC 7519 Section 4.1](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1).
//! Time-valued reserved claims are always stored as integer Unix seconds.

mod validity;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const ISSUER: &str = "iss";
pub const SUBJECT: &str = "sub";
pub const AUDIENCE: &str = "aud";
pub const EXPIRATION: &str = "exp";
pub const NOT_BEFORE: &str = "nbf";
pub const ISSUED_AT: &str = "iat";
pub const IDENTIFIER: &str = "jti";

/// A set of claims carried in a token payload
///
/// ```
/// use jwtoken::Claims;
///
/// let mut claims = Claims::new();
/// claims.set_subject("1234567890");
/// claims.set("admin", "true");
///
/// assert_eq!(claims.subject().as_deref(), Some("1234567890"));
/// assert_eq!(claims.get_bool("admin"), Some(true));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims {
    values: Map<String, Value>,
}

impl Claims {
    /// Create an empty claim set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over all claims
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    // ============================================================================
    // Generic accessors
    // ============================================================================

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a claim, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.values.insert(key.into(), value.into())
    }

    /// Remove a claim, returning the previous value
    pub fn delete(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    // ============================================================================
    // Typed accessors
    // ============================================================================

    /// Get a claim as string; non-string values are rendered as JSON
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Get a claim as boolean
    ///
    /// Accepts a JSON boolean or one of the tokens `1`, `t`, `T`, `TRUE`,
    /// `true`, `True`, `0`, `f`, `F`, `FALSE`, `false`, `False`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => parse_bool(s),
            _ => None,
        }
    }

    /// Get a claim as integer; floats are truncated, strings are parsed
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite() && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get a claim as float; strings are parsed
    pub fn get_float(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    /// Get a claim as time from Unix seconds or an RFC 3339 string
    pub fn get_time(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.get(key)? {
            Value::String(s) => DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            Value::Number(_) => DateTime::from_timestamp(self.get_int(key)?, 0),
            _ => None,
        }
    }

    /// Set a claim to a time, stored as Unix seconds
    pub fn set_time(&mut self, key: impl Into<String>, time: DateTime<Utc>) -> Option<Value> {
        self.set(key, time.timestamp())
    }

    // ============================================================================
    // Reserved claims
    // ============================================================================

    pub fn issuer(&self) -> Option<String> {
        self.get_string(ISSUER)
    }

    pub fn set_issuer(&mut self, issuer: impl Into<String>) -> Option<Value> {
        self.set(ISSUER, issuer.into())
    }

    pub fn delete_issuer(&mut self) -> Option<Value> {
        self.delete(ISSUER)
    }

    pub fn subject(&self) -> Option<String> {
        self.get_string(SUBJECT)
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) -> Option<Value> {
        self.set(SUBJECT, subject.into())
    }

    pub fn delete_subject(&mut self) -> Option<Value> {
        self.delete(SUBJECT)
    }

    /// Token identifier (`jti`)
    pub fn identifier(&self) -> Option<String> {
        self.get_string(IDENTIFIER)
    }

    pub fn set_identifier(&mut self, identifier: impl Into<String>) -> Option<Value> {
        self.set(IDENTIFIER, identifier.into())
    }

    pub fn delete_identifier(&mut self) -> Option<Value> {
        self.delete(IDENTIFIER)
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.get_time(ISSUED_AT)
    }

    pub fn set_issued_at(&mut self, time: DateTime<Utc>) -> Option<Value> {
        self.set_time(ISSUED_AT, time)
    }

    pub fn delete_issued_at(&mut self) -> Option<Value> {
        self.delete(ISSUED_AT)
    }

    pub fn not_before(&self) -> Option<DateTime<Utc>> {
        self.get_time(NOT_BEFORE)
    }

    pub fn set_not_before(&mut self, time: DateTime<Utc>) -> Option<Value> {
        self.set_time(NOT_BEFORE, time)
    }

    pub fn delete_not_before(&mut self) -> Option<Value> {
        self.delete(NOT_BEFORE)
    }

    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        self.get_time(EXPIRATION)
    }

    pub fn set_expiration(&mut self, time: DateTime<Utc>) -> Option<Value> {
        self.set_time(EXPIRATION, time)
    }

    pub fn delete_expiration(&mut self) -> Option<Value> {
        self.delete(EXPIRATION)
    }

    /// Audience as a list, whether stored as one string or an array
    pub fn audience(&self) -> Option<Vec<String>> {
        match self.get(AUDIENCE)? {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Array(items) => Some(
                items
                    .iter()
                    .map(|item| match item {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Set the audience; a single entry is stored as a plain string
    pub fn set_audience<I, S>(&mut self, audience: I) -> Option<Value>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut audience: Vec<Value> = audience
            .into_iter()
            .map(|s| Value::String(s.into()))
            .collect();

        let value = if audience.len() == 1 {
            audience.remove(0)
        } else {
            Value::Array(audience)
        };
        self.set(AUDIENCE, value)
    }

    pub fn delete_audience(&mut self) -> Option<Value> {
        self.delete(AUDIENCE)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

impl From<Map<String, Value>> for Claims {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl From<Claims> for Map<String, Value> {
    fn from(claims: Claims) -> Self {
        claims.values
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Claims {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_set_and_delete_return_previous() {
        let mut claims = Claims::new();
        assert_eq!(claims.set("a", 1), None);
        assert_eq!(claims.set("a", 2), Some(json!(1)));
        assert!(claims.contains("a"));
        assert_eq!(claims.delete("a"), Some(json!(2)));
        assert_eq!(claims.delete("a"), None);
        assert!(!claims.contains("a"));
    }

    #[test]
    fn test_get_string_stringifies() {
        let mut claims = Claims::new();
        claims.set("s", "text");
        claims.set("n", 42);
        claims.set("b", false);
        assert_eq!(claims.get_string("s").as_deref(), Some("text"));
        assert_eq!(claims.get_string("n").as_deref(), Some("42"));
        assert_eq!(claims.get_string("b").as_deref(), Some("false"));
        assert_eq!(claims.get_string("missing"), None);
    }

    #[test]
    fn test_get_bool_tokens() {
        let mut claims = Claims::new();
        for token in ["1", "t", "T", "TRUE", "true", "True"] {
            claims.set("v", token);
            assert_eq!(claims.get_bool("v"), Some(true), "{token}");
        }
        for token in ["0", "f", "F", "FALSE", "false", "False"] {
            claims.set("v", token);
            assert_eq!(claims.get_bool("v"), Some(false), "{token}");
        }
        for token in ["yes", "tRUE", ""] {
            claims.set("v", token);
            assert_eq!(claims.get_bool("v"), None, "{token}");
        }
        claims.set("v", true);
        assert_eq!(claims.get_bool("v"), Some(true));
        claims.set("v", 1);
        assert_eq!(claims.get_bool("v"), None);
    }

    #[test]
    fn test_get_numbers() {
        let mut claims = Claims::new();
        claims.set("int", 7);
        claims.set("float", 2.75);
        claims.set("text", "12");
        claims.set("ftext", "0.5");
        claims.set("junk", "twelve");

        assert_eq!(claims.get_int("int"), Some(7));
        assert_eq!(claims.get_int("float"), Some(2));
        assert_eq!(claims.get_int("text"), Some(12));
        assert_eq!(claims.get_int("junk"), None);
        assert_eq!(claims.get_float("float"), Some(2.75));
        assert_eq!(claims.get_float("int"), Some(7.0));
        assert_eq!(claims.get_float("ftext"), Some(0.5));
        assert_eq!(claims.get_float("junk"), None);
    }

    #[test]
    fn test_get_time() {
        let mut claims = Claims::new();
        claims.set("unix", 1_700_000_000);
        claims.set("rfc", "2023-11-14T22:13:20Z");
        claims.set("bad", "yesterday");

        let expected = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(claims.get_time("unix"), Some(expected));
        assert_eq!(claims.get_time("rfc"), Some(expected));
        assert_eq!(claims.get_time("bad"), None);
    }

    #[test]
    fn test_set_time_stores_seconds() {
        let mut claims = Claims::new();
        let time = DateTime::parse_from_rfc3339("2023-11-14T22:13:20.750Z")
            .unwrap()
            .with_timezone(&Utc);
        claims.set_expiration(time);
        assert_eq!(claims.get(EXPIRATION), Some(&json!(1_700_000_000)));
    }

    #[test]
    fn test_reserved_accessors() {
        let mut claims = Claims::new();
        claims.set_issuer("issuer");
        claims.set_subject("subject");
        claims.set_identifier("id-1");
        assert_eq!(claims.issuer().as_deref(), Some("issuer"));
        assert_eq!(claims.subject().as_deref(), Some("subject"));
        assert_eq!(claims.get_string("jti").as_deref(), Some("id-1"));

        assert_eq!(claims.delete_subject(), Some(json!("subject")));
        assert_eq!(claims.subject(), None);
    }

    #[test]
    fn test_audience_normalization() {
        let mut claims = Claims::new();
        claims.set_audience(["one"]);
        assert_eq!(claims.get(AUDIENCE), Some(&json!("one")));
        assert_eq!(claims.audience(), Some(vec!["one".to_string()]));

        claims.set_audience(["one", "two"]);
        assert_eq!(claims.get(AUDIENCE), Some(&json!(["one", "two"])));
        assert_eq!(
            claims.audience(),
            Some(vec!["one".to_string(), "two".to_string()])
        );
    }

    #[test]
    fn test_empty_serializes_to_object() {
        assert_eq!(serde_json::to_string(&Claims::new()).unwrap(), "{}");
    }

    #[test]
    fn test_json_round_trip() {
        let claims: Claims = [("sub", json!("x")), ("nested", json!({"a": [1, 2]}))]
            .into_iter()
            .collect();
        let text = serde_json::to_string(&claims).unwrap();
        let parsed: Claims = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, claims);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(serde_json::from_str::<Claims>("[1, 2]").is_err());
        assert!(serde_json::from_str::<Claims>("null").is_err());
    }
}
