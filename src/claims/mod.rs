mod map;
mod registered;

pub use map::MapClaims;
pub use registered::{Audience, RegisteredClaims};

use crate::error::{ClaimError, ClaimViolations};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use std::time::{SystemTime, UNIX_EPOCH};

/// Largest integer an `f64` represents exactly (2^53)
const MAX_SAFE_INTEGER: u64 = 1 << 53;

/// Seconds since the Unix epoch, as defined in [RFC 7519 Section 2](https://datatracker.ietf.org/doc/html/rfc7519#section-2)
///
/// The JSON number is stored losslessly. Integer and fractional values are
/// both accepted; comparisons happen at whole-second granularity with the
/// fraction truncated toward zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NumericDate(Number);

impl NumericDate {
    pub fn from_seconds(seconds: i64) -> Self {
        Self(Number::from(seconds))
    }

    pub fn from_system_time(time: SystemTime) -> Self {
        Self::from_seconds(unix_seconds(time))
    }

    pub fn from_number(number: Number) -> Self {
        Self(number)
    }

    pub fn as_number(&self) -> &Number {
        &self.0
    }

    /// Whole seconds, or `None` when the value does not fit an `i64`
    pub fn seconds(&self) -> Option<i64> {
        if let Some(seconds) = self.0.as_i64() {
            return Some(seconds);
        }

        let value = self.0.as_f64()?.trunc();
        // i64::MAX as f64 rounds up to 2^63, so the upper bound is exclusive
        if !value.is_finite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
            return None;
        }

        Some(value as i64)
    }

    /// Apply a [`NumberDecoding`] mode to the stored value
    pub fn coerced(self, numbers: NumberDecoding) -> Self {
        Self(coerce_number(self.0, numbers))
    }
}

impl From<i64> for NumericDate {
    fn from(seconds: i64) -> Self {
        Self::from_seconds(seconds)
    }
}

impl From<SystemTime> for NumericDate {
    fn from(time: SystemTime) -> Self {
        Self::from_system_time(time)
    }
}

/// How numbers in the payload are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberDecoding {
    /// Numbers carry `f64` precision; integers beyond 2^53 are rounded
    #[default]
    Float,
    /// Numbers keep their exact decimal text
    Exact,
}

/// One of the registered time-based claims
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeClaim {
    #[serde(rename = "exp")]
    Expiration,
    #[serde(rename = "nbf")]
    NotBefore,
    #[serde(rename = "iat")]
    IssuedAt,
}

impl TimeClaim {
    pub const ALL: [TimeClaim; 3] = [TimeClaim::Expiration, TimeClaim::NotBefore, TimeClaim::IssuedAt];

    /// JSON member name
    pub fn name(&self) -> &'static str {
        match self {
            TimeClaim::Expiration => "exp",
            TimeClaim::NotBefore => "nbf",
            TimeClaim::IssuedAt => "iat",
        }
    }

    /// Read this claim from a claims value
    pub fn read<C: Claims>(&self, claims: &C) -> Result<Option<NumericDate>, ClaimError> {
        match self {
            TimeClaim::Expiration => claims.expiration(),
            TimeClaim::NotBefore => claims.not_before(),
            TimeClaim::IssuedAt => claims.issued_at(),
        }
    }
}

/// A token payload
///
/// Implemented by [`MapClaims`], [`RegisteredClaims`], and any user record.
/// The time accessors default to reading `exp`, `nbf` and `iat` from the
/// record's serialized form, so a plain `#[derive(Serialize, Deserialize)]`
/// struct is validated without extra code. Custom checks go in an overridden
/// [`validate`](Claims::validate):
///
/// ```ignore
/// impl Claims for SessionClaims {
///     fn validate(&self, now: i64, leeway: u64) -> Result<(), ClaimViolations> {
///         let mut violations = validate_time_claims(self, now, leeway);
///         if self.role != "admin" {
///             violations.push(ClaimError::Custom("role must be admin".into()));
///         }
///         violations.into_result()
///     }
/// }
/// ```
pub trait Claims: Serialize + DeserializeOwned {
    /// Expiration Time (exp)
    fn expiration(&self) -> Result<Option<NumericDate>, ClaimError> {
        serialized_time_claim(self, TimeClaim::Expiration)
    }

    /// Not Before (nbf)
    fn not_before(&self) -> Result<Option<NumericDate>, ClaimError> {
        serialized_time_claim(self, TimeClaim::NotBefore)
    }

    /// Issued At (iat)
    fn issued_at(&self) -> Result<Option<NumericDate>, ClaimError> {
        serialized_time_claim(self, TimeClaim::IssuedAt)
    }

    /// Check the claims against the reference time, reporting every violation
    fn validate(&self, now: i64, leeway: u64) -> Result<(), ClaimViolations> {
        validate_time_claims(self, now, leeway).into_result()
    }

    /// Decode the payload bytes
    ///
    /// Every number goes through the [`NumberDecoding`] mode before the record
    /// is built, so `Value` and `Number` fields see the same precision as
    /// [`MapClaims`]. In float mode an integer field receiving a number beyond
    /// 2^53 fails to decode.
    fn decode(payload: &[u8], numbers: NumberDecoding) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_slice(payload)?;
        serde_json::from_value(coerce_value(value, numbers))
    }
}

/// Apply the registered time rules
///
/// - `exp < now - leeway` is [`ClaimError::Expired`]
/// - `nbf > now + leeway` is [`ClaimError::NotYetValid`]
/// - `iat > now + leeway` is [`ClaimError::IssuedInFuture`]
///
/// Absent claims are skipped. Every violation is collected.
pub fn validate_time_claims<C: Claims>(claims: &C, now: i64, leeway: u64) -> ClaimViolations {
    let mut violations = ClaimViolations::new();
    let skew = i64::try_from(leeway).unwrap_or(i64::MAX);

    for claim in TimeClaim::ALL {
        let date = match claim.read(claims) {
            Ok(Some(date)) => date,
            Ok(None) => continue,
            Err(violation) => {
                violations.push(violation);
                continue;
            }
        };

        let Some(at) = date.seconds() else {
            violations.push(ClaimError::InvalidNumericDate(claim.name().to_string()));
            continue;
        };

        match claim {
            TimeClaim::Expiration if at < now.saturating_sub(skew) => {
                violations.push(ClaimError::Expired {
                    expired_at: at,
                    now,
                    leeway,
                });
            }
            TimeClaim::NotBefore if at > now.saturating_add(skew) => {
                violations.push(ClaimError::NotYetValid {
                    not_before: at,
                    now,
                    leeway,
                });
            }
            TimeClaim::IssuedAt if at > now.saturating_add(skew) => {
                violations.push(ClaimError::IssuedInFuture {
                    issued_at: at,
                    now,
                    leeway,
                });
            }
            _ => {}
        }
    }

    violations
}

/// Seconds since the Unix epoch, negative before it
pub fn unix_seconds(time: SystemTime) -> i64 {
    match time.duration_since(UNIX_EPOCH) {
        Ok(after) => i64::try_from(after.as_secs()).unwrap_or(i64::MAX),
        Err(before) => i64::try_from(before.duration().as_secs())
            .map(|secs| -secs)
            .unwrap_or(i64::MIN),
    }
}

/// Read a time claim from a JSON object
pub(crate) fn time_claim_in(
    map: &Map<String, Value>,
    claim: TimeClaim,
) -> Result<Option<NumericDate>, ClaimError> {
    match map.get(claim.name()) {
        None => Ok(None),
        Some(Value::Number(number)) => Ok(Some(NumericDate::from_number(number.clone()))),
        Some(_) => Err(ClaimError::InvalidType(claim.name().to_string())),
    }
}

fn serialized_time_claim<C: Serialize + ?Sized>(
    claims: &C,
    claim: TimeClaim,
) -> Result<Option<NumericDate>, ClaimError> {
    match serde_json::to_value(claims) {
        Ok(Value::Object(map)) => time_claim_in(&map, claim),
        _ => Err(ClaimError::Custom(
            "claims do not serialize to a JSON object".to_string(),
        )),
    }
}

/// Reduce a number to `f64` precision in [`NumberDecoding::Float`] mode
pub(crate) fn coerce_number(number: Number, numbers: NumberDecoding) -> Number {
    if numbers == NumberDecoding::Exact {
        return number;
    }

    let safe = number.as_i64().is_some_and(|n| n.unsigned_abs() <= MAX_SAFE_INTEGER)
        || number.as_u64().is_some_and(|n| n <= MAX_SAFE_INTEGER);
    if safe {
        return number;
    }

    // Non-finite values are left as-is and rejected later by `seconds()`
    match number.as_f64().and_then(Number::from_f64) {
        Some(float) => float,
        None => number,
    }
}

/// Recursively apply [`coerce_number`] to every number in a value
pub(crate) fn coerce_value(value: Value, numbers: NumberDecoding) -> Value {
    if numbers == NumberDecoding::Exact {
        return value;
    }

    match value {
        Value::Number(number) => Value::Number(coerce_number(number, numbers)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| coerce_value(item, numbers))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, coerce_value(item, numbers)))
                .collect(),
        ),
        other => other,
    }
}
