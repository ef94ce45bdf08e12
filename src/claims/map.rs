use super::{Claims, NumberDecoding, NumericDate, TimeClaim, coerce_value, time_claim_in};
use crate::error::ClaimError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open claims mapping, member name to arbitrary JSON value
///
/// Members keep their insertion order on serialization. A present `exp`,
/// `nbf` or `iat` that is not a JSON number is reported as
/// [`ClaimError::InvalidType`] during validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapClaims(Map<String, Value>);

impl MapClaims {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Insert a member, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl Claims for MapClaims {
    fn expiration(&self) -> Result<Option<NumericDate>, ClaimError> {
        time_claim_in(&self.0, TimeClaim::Expiration)
    }

    fn not_before(&self) -> Result<Option<NumericDate>, ClaimError> {
        time_claim_in(&self.0, TimeClaim::NotBefore)
    }

    fn issued_at(&self) -> Result<Option<NumericDate>, ClaimError> {
        time_claim_in(&self.0, TimeClaim::IssuedAt)
    }

    fn decode(payload: &[u8], numbers: NumberDecoding) -> serde_json::Result<Self> {
        let map: Map<String, Value> = serde_json::from_slice(payload)?;
        Ok(Self(
            map.into_iter()
                .map(|(name, value)| (name, coerce_value(value, numbers)))
                .collect(),
        ))
    }
}

impl From<Map<String, Value>> for MapClaims {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for MapClaims {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a MapClaims {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
