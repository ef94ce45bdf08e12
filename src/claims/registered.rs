use super::{Claims, NumberDecoding, NumericDate};
use crate::error::ClaimError;
use serde::{Deserialize, Serialize};

/// Registered JWT claims as defined in RFC 7519 Section 4.1
///
/// This struct represents the registered claim names from [RFC 7519 Section 4.1](https://datatracker.ietf.org/doc/html/rfc7519#section-4.1).
/// Every field is optional and omitted from the JSON when `None`. Members
/// outside this set are ignored on decode; use [`MapClaims`](crate::MapClaims)
/// or a custom record to keep them.
///
/// # Examples
///
/// ```ignore
/// use jwtkit::*;
///
/// let claims = RegisteredClaims {
///     subject: Some("alice".into()),
///     expiration: Some(NumericDate::from_seconds(now + 60)),
///     ..Default::default()
/// };
/// let token = sign(&algorithm::Hmac::HS256, &claims, &Key::symmetric("secret"))?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredClaims {
    /// Issuer (iss) - identifies the principal that issued the JWT
    #[serde(rename = "iss", default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// Subject (sub) - identifies the principal that is the subject of the JWT
    #[serde(rename = "sub", default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Audience (aud) - a single recipient or an array of recipients
    #[serde(rename = "aud", default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<Audience>,

    /// Expiration Time (exp) - identifies the expiration time
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<NumericDate>,

    /// Not Before (nbf) - identifies the time before which the JWT MUST NOT be accepted
    #[serde(rename = "nbf", default, skip_serializing_if = "Option::is_none")]
    pub not_before: Option<NumericDate>,

    /// Issued At (iat) - identifies the time at which the JWT was issued
    #[serde(rename = "iat", default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<NumericDate>,

    /// JWT ID (jti) - provides a unique identifier for the JWT
    #[serde(rename = "jti", default, skip_serializing_if = "Option::is_none")]
    pub jwt_id: Option<String>,
}

impl Claims for RegisteredClaims {
    fn expiration(&self) -> Result<Option<NumericDate>, ClaimError> {
        Ok(self.expiration.clone())
    }

    fn not_before(&self) -> Result<Option<NumericDate>, ClaimError> {
        Ok(self.not_before.clone())
    }

    fn issued_at(&self) -> Result<Option<NumericDate>, ClaimError> {
        Ok(self.issued_at.clone())
    }

    fn decode(payload: &[u8], numbers: NumberDecoding) -> serde_json::Result<Self> {
        let mut claims: Self = serde_json::from_slice(payload)?;
        for date in [
            &mut claims.expiration,
            &mut claims.not_before,
            &mut claims.issued_at,
        ] {
            *date = date.take().map(|value| value.coerced(numbers));
        }
        Ok(claims)
    }
}

/// The `aud` claim: one string or an array of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Many(Vec<String>),
}

impl Audience {
    /// Whether `audience` is one of the listed recipients
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::Single(single) => single == audience,
            Audience::Many(many) => many.iter().any(|entry| entry == audience),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let entries: &[String] = match self {
            Audience::Single(single) => std::slice::from_ref(single),
            Audience::Many(many) => many,
        };
        entries.iter().map(String::as_str)
    }
}

impl From<&str> for Audience {
    fn from(audience: &str) -> Self {
        Audience::Single(audience.to_string())
    }
}

impl From<String> for Audience {
    fn from(audience: String) -> Self {
        Audience::Single(audience)
    }
}

impl From<Vec<String>> for Audience {
    fn from(audiences: Vec<String>) -> Self {
        Audience::Many(audiences)
    }
}
