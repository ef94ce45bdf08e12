//! Tests for custom header members, key selection by `kid`, and custom claims records

use jwtkit::algorithm::Hmac;
use jwtkit::*;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const NOW: i64 = 1_700_000_000;

fn clock() -> SystemTime {
    UNIX_EPOCH + Duration::from_secs(NOW as u64)
}

fn keyring() -> HashMap<&'static str, Key> {
    HashMap::from([
        ("2024-01", Key::symmetric("january-secret")),
        ("2024-02", Key::symmetric("february-secret")),
    ])
}

/// Resolve the key named by the token's `kid` header
fn by_kid<C>(token: &Token<C>) -> std::result::Result<Key, BoxError> {
    let kid = token.header().key_id().ok_or("token has no kid")?;
    keyring()
        .remove(kid)
        .ok_or_else(|| format!("unknown kid '{kid}'").into())
}

fn signed_with_kid(kid: &str, secret: &str) -> String {
    let claims: MapClaims = [("sub", "alice")].into_iter().collect();
    let mut token = Token::new(Hmac::HS256, claims);
    token.header_mut().insert("kid", kid);
    token.signed_string(&Key::symmetric(secret)).unwrap()
}

// ============================================================================
// Key Selection
// ============================================================================

#[test]
fn test_header_with_kid() {
    let parser = Parser::new(AlgorithmPolicy::hs256_only());

    let january = parser.parse(&signed_with_kid("2024-01", "january-secret"), by_kid).unwrap();
    assert_eq!(january.header().key_id(), Some("2024-01"));

    let february = parser.parse(&signed_with_kid("2024-02", "february-secret"), by_kid).unwrap();
    assert_eq!(february.header().key_id(), Some("2024-02"));
}

#[test]
fn test_kid_pointing_at_other_key() {
    let token = signed_with_kid("2024-02", "january-secret");
    let rejection = Parser::new(AlgorithmPolicy::hs256_only())
        .parse(&token, by_kid)
        .unwrap_err();

    assert_eq!(rejection.kind(), ErrorKind::SignatureInvalid);
}

#[test]
fn test_unknown_kid() {
    let token = signed_with_kid("2023-12", "old-secret");
    let rejection = Parser::new(AlgorithmPolicy::hs256_only())
        .parse(&token, by_kid)
        .unwrap_err();

    match rejection.error() {
        Error::KeyResolution(source) => assert_eq!(source.to_string(), "unknown kid '2023-12'"),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(rejection.token().unwrap().header().key_id(), Some("2023-12"));
}

#[test]
fn test_header_without_kid() {
    let token = sign(&Hmac::HS256, &MapClaims::new(), &Key::symmetric("secret")).unwrap();
    let rejection = Parser::new(AlgorithmPolicy::hs256_only())
        .parse(&token, by_kid)
        .unwrap_err();

    assert!(matches!(rejection.error(), Error::KeyResolution(_)));
}

#[test]
fn test_numeric_kid_is_not_a_key_id() {
    let claims = MapClaims::new();
    let mut token = Token::new(Hmac::HS256, claims);
    token.header_mut().insert("kid", 42);
    let compact = token.signed_string(&Key::symmetric("secret")).unwrap();

    let unverified: Token<MapClaims> = Parser::new(AlgorithmPolicy::hs256_only())
        .parse_unverified(&compact)
        .unwrap();
    assert_eq!(unverified.header().key_id(), None);
    assert_eq!(unverified.header().get("kid"), Some(&json!(42)));
}

// ============================================================================
// Header Preservation
// ============================================================================

#[test]
fn test_custom_header_members_round_trip() {
    let claims: MapClaims = [("sub", "alice")].into_iter().collect();
    let mut token = Token::new(Hmac::HS256, claims);
    token.header_mut().insert("kid", "key-1");
    token.header_mut().insert("cty", "application/example");
    token.header_mut().insert("x5t", "dGh1bWJwcmludA");
    token.header_mut().insert("crit", json!(["exp"]));
    let compact = token.signed_string(&Key::symmetric("secret")).unwrap();

    let parsed = Parser::new(AlgorithmPolicy::hs256_only())
        .parse(&compact, |_| Ok(Key::symmetric("secret")))
        .unwrap();

    assert_eq!(parsed.header(), token.header());
    assert_eq!(parsed.header().get("cty"), Some(&json!("application/example")));
    assert_eq!(parsed.header().get("crit"), Some(&json!(["exp"])));
}

#[test]
fn test_header_member_order_preserved() {
    let mut token = Token::new(Hmac::HS256, MapClaims::new());
    token.header_mut().insert("kid", "k");
    token.header_mut().insert("zzz", 1);
    token.header_mut().insert("aaa", 2);

    let signing_string = token.signing_string().unwrap();
    let (header, _) = signing_string.split_once('.').unwrap();
    let header = codec::decode_segment(header, Padding::Strict).unwrap();

    assert_eq!(
        String::from_utf8(header).unwrap(),
        r#"{"typ":"JWT","alg":"HS256","kid":"k","zzz":1,"aaa":2}"#
    );
}

#[test]
fn test_header_typ_variations() {
    for typ in [json!("JWT"), json!("jwt"), json!("at+jwt"), json!(null)] {
        let mut token = Token::new(Hmac::HS256, MapClaims::new());
        token.header_mut().insert("typ", typ.clone());
        let compact = token.signed_string(&Key::symmetric("secret")).unwrap();

        let parsed = Parser::new(AlgorithmPolicy::hs256_only())
            .parse(&compact, |_| Ok(Key::symmetric("secret")))
            .unwrap();
        assert_eq!(parsed.header().get("typ"), Some(&typ));
    }
}

#[test]
fn test_header_mut_invalidates_signature() {
    let mut token = Token::new(Hmac::HS256, MapClaims::new());
    token.signed_string(&Key::symmetric("secret")).unwrap();
    assert!(token.signature().is_some());

    token.header_mut().insert("kid", "rotated");
    assert!(token.signature().is_none());
    assert!(token.raw().is_none());
}

// ============================================================================
// Custom Claims Records
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    exp: Option<i64>,
}

impl Claims for SessionClaims {
    fn validate(&self, now: i64, leeway: u64) -> std::result::Result<(), ClaimViolations> {
        let mut violations = validate_time_claims(self, now, leeway);
        if self.role != "admin" {
            violations.push(ClaimError::Custom(format!("role '{}' is not admin", self.role)));
        }
        violations.into_result()
    }
}

/// A record that keeps its defaults: time rules come from its serialized form
#[derive(Debug, Serialize, Deserialize)]
struct Plain {
    sub: String,
    nbf: i64,
}

impl Claims for Plain {}

fn parser() -> Parser {
    Parser::new(AlgorithmPolicy::hs256_only()).clock(clock).build()
}

fn session(role: &str, exp: Option<i64>) -> String {
    let claims = SessionClaims {
        sub: "alice".into(),
        role: role.into(),
        exp,
    };
    sign(&Hmac::HS256, &claims, &Key::symmetric("secret")).unwrap()
}

#[test]
fn test_custom_claims_record() {
    let token = parser()
        .parse_with_claims::<SessionClaims, _>(&session("admin", Some(NOW + 60)), |_| {
            Ok(Key::symmetric("secret"))
        })
        .unwrap();

    assert_eq!(token.claims().role, "admin");
    assert_eq!(token.into_claims().exp, Some(NOW + 60));
}

#[test]
fn test_custom_violation_reported_with_time_violations() {
    let rejection = parser()
        .parse_with_claims::<SessionClaims, _>(&session("guest", Some(NOW - 60)), |_| {
            Ok(Key::symmetric("secret"))
        })
        .unwrap_err();

    let violations = rejection.error().claim_violations().unwrap();
    assert_eq!(violations.len(), 2);
    assert!(matches!(violations.as_slice()[0], ClaimError::Expired { .. }));
    assert_eq!(
        violations.as_slice()[1],
        ClaimError::Custom("role 'guest' is not admin".into())
    );
    assert_eq!(rejection.token().unwrap().claims().role, "guest");
}

#[test]
fn test_custom_record_required_claims() {
    let parser = Parser::new(AlgorithmPolicy::hs256_only())
        .clock(clock)
        .require(TimeClaim::Expiration)
        .build();

    let rejection = parser
        .parse_with_claims::<SessionClaims, _>(&session("admin", None), |_| {
            Ok(Key::symmetric("secret"))
        })
        .unwrap_err();

    assert_eq!(
        rejection.error().claim_violations().unwrap().as_slice(),
        &[ClaimError::Missing("exp".into())]
    );
}

#[test]
fn test_record_missing_field_is_malformed() {
    let token = sign(
        &Hmac::HS256,
        &MapClaims::from_iter([("sub", "alice")]),
        &Key::symmetric("secret"),
    )
    .unwrap();

    let rejection = parser()
        .parse_with_claims::<SessionClaims, _>(&token, |_| Ok(Key::symmetric("secret")))
        .unwrap_err();
    assert_eq!(rejection.kind(), ErrorKind::Malformed);
}

#[test]
fn test_default_time_rules_for_plain_record() {
    let early = Plain {
        sub: "alice".into(),
        nbf: NOW + 600,
    };
    let token = sign(&Hmac::HS256, &early, &Key::symmetric("secret")).unwrap();

    let rejection = parser()
        .parse_with_claims::<Plain, _>(&token, |_| Ok(Key::symmetric("secret")))
        .unwrap_err();
    assert!(matches!(
        rejection.error().claim_violations().unwrap().as_slice(),
        [ClaimError::NotYetValid { not_before, .. }] if *not_before == NOW + 600
    ));

    let lenient = Parser::new(AlgorithmPolicy::hs256_only())
        .clock(clock)
        .leeway(600)
        .build();
    let token = lenient
        .parse_with_claims::<Plain, _>(&token, |_| Ok(Key::symmetric("secret")))
        .unwrap();
    assert_eq!(token.claims().sub, "alice");
}
