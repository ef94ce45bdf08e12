use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JOSE header
///
/// An ordered JSON object. Members other than `alg`, `typ` and `kid` are kept
/// verbatim, both when parsing and when signing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Map<String, Value>);

impl Header {
    /// `{"typ":"JWT","alg":<alg>}`
    pub fn for_algorithm(alg: &str) -> Self {
        let mut members = Map::new();
        members.insert("typ".to_string(), Value::from("JWT"));
        members.insert("alg".to_string(), Value::from(alg));
        Self(members)
    }

    /// Algorithm used for signing (`alg`), if it is a string
    pub fn algorithm(&self) -> Option<&str> {
        self.0.get("alg").and_then(Value::as_str)
    }

    /// Token type (`typ`), typically "JWT"
    pub fn token_type(&self) -> Option<&str> {
        self.0.get("typ").and_then(Value::as_str)
    }

    /// Key ID (`kid`) for key selection
    pub fn key_id(&self) -> Option<&str> {
        self.0.get("kid").and_then(Value::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Insert a member, returning the previous value
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for Header {
    fn from(members: Map<String, Value>) -> Self {
        Self(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_algorithm() {
        let header = Header::for_algorithm("HS256");

        assert_eq!(header.algorithm(), Some("HS256"));
        assert_eq!(header.token_type(), Some("JWT"));
        assert_eq!(header.key_id(), None);
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"typ":"JWT","alg":"HS256"}"#
        );
    }

    #[test]
    fn test_extra_members_kept_in_order() {
        let mut header = Header::for_algorithm("ES256");
        header.insert("kid", "key-1");
        header.insert("x5t", "thumb");

        assert_eq!(header.key_id(), Some("key-1"));
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"typ":"JWT","alg":"ES256","kid":"key-1","x5t":"thumb"}"#
        );
    }

    #[test]
    fn test_non_string_alg() {
        let header: Header = serde_json::from_str(r#"{"alg":256}"#).unwrap();
        assert_eq!(header.algorithm(), None);
        assert!(header.get("alg").is_some());
    }
}
