//! # jwtkit - Issue and Verify Signed JSON Web Tokens
//!
//! > Compact, signed security tokens with a typed verification pipeline.
//!
//! **jwtkit** encodes a set of claims into a self-describing signed string, and on the receiving
//! side decodes, authenticates, and validates that string before any of its contents are trusted.
//!
//! ## Overview
//!
//! A JWT is three Base64URL segments joined by dots: a JSON header naming the signing algorithm,
//! a JSON claims payload, and a signature over the first two segments. Verification is the
//! security boundary. Accepting an algorithm the caller did not intend, skipping the signature
//! check, mishandling clock skew, or silently accepting malformed input each amount to an
//! authentication bypass.
//!
//! **jwtkit** verifies through a fixed sequence of stages, each of which must pass before the
//! next begins:
//!
//! ```text
//! compact string
//!     │ codec::decode            Malformed
//!     ▼
//! header + claims + signature
//!     │ AlgorithmPolicy          AlgorithmNotAllowed
//!     │ MethodRegistry           AlgorithmUnsupported
//!     ▼
//! unverified Token<C> ──► key resolver (caller)   KeyResolution
//!     │ SigningMethod::verify    SignatureInvalid / KeyTypeMismatch
//!     ▼
//! authenticated Token<C>
//!     │ Claims::validate         ClaimsInvalid (every violation listed)
//!     ▼
//! verified Token<C>
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use jwtkit::*;
//!
//! // Issue
//! let mut claims = MapClaims::new();
//! claims.insert("sub", "alice");
//! claims.insert("exp", now + 60);
//! let compact = sign(&algorithm::Hmac::HS256, &claims, &Key::symmetric("secret"))?;
//!
//! // Verify
//! let parser = Parser::new(AlgorithmPolicy::hs256_only());
//! let token = parser.parse(&compact, |_token| Ok(Key::symmetric("secret")))?;
//!
//! println!("Subject: {:?}", token.claims().get("sub"));
//! ```
//!
//! ## Algorithm Support
//!
//! All algorithms implement the [`SigningMethod`] trait and are registered in
//! [`MethodRegistry::default()`]:
//!
//! - **HMAC**: HS256, HS384, HS512
//! - **RSA PKCS#1 v1.5**: RS256, RS384, RS512
//! - **RSA-PSS**: PS256, PS384, PS512
//! - **ECDSA**: ES256, ES384, ES512
//! - **EdDSA**: Ed25519
//! - **none**: unsigned, see below
//!
//! ## Claims
//!
//! Any `Serialize + DeserializeOwned` type implementing [`Claims`] can be a payload. Two shapes
//! ship with the crate: [`MapClaims`] for open mappings and [`RegisteredClaims`] for the
//! RFC 7519 registered names. Time rules for `exp`, `nbf` and `iat` apply with a configurable
//! leeway, and every violation is reported, not just the first.
//!
//! ## Security
//!
//! ### Algorithm Confusion Prevention
//!
//! Every [`Parser`] carries an [`AlgorithmPolicy`]. The token's `alg` header is checked against
//! it before a method is looked up or the key resolver runs.
//!
//! ### "none" Algorithm
//!
//! Unsigned tokens verify only with a double opt-in: `"none"` listed in the policy *and* a key
//! resolver returning [`Key::UnsafeNone`]. [`AlgorithmPolicy::danger_allow_all`] does not
//! include it.
//!
//! ### Timing Attack Protection
//!
//! HMAC signature verification uses constant-time comparison via the [`constant_time_eq`](https://crates.io/crates/constant_time_eq)
//! crate, preventing timing-based key recovery attacks.
//!
//! ## References
//!
//! - [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515) — JSON Web Signature (JWS)
//! - [RFC 7518](https://datatracker.ietf.org/doc/html/rfc7518) — JSON Web Algorithms (JWA)
//! - [RFC 7519](https://datatracker.ietf.org/doc/html/rfc7519) — JSON Web Token (JWT)
//! - [RFC 8725](https://datatracker.ietf.org/doc/html/rfc8725) — JSON Web Signature Best Practices

// Core modules
pub mod codec;
pub mod error;

// Algorithm system
pub mod algorithm;
pub mod keys;

// Claims and validation
pub mod claims;

// Token types
pub mod token;

// Parser (main public API)
pub mod config;
pub mod parser;

// Transport extraction
pub mod extract;

// ============================================================================
// PUBLIC API
// ============================================================================

// Issuance and verification
pub use parser::{Clock, Parser, Rejection};
pub use token::{Header, Token, sign};

// Configuration types
pub use codec::Padding;
pub use config::ParserConfig;

// Supporting types
pub use algorithm::{AlgorithmPolicy, MethodRegistry, SigningMethod};
pub use claims::{
    Audience, Claims, MapClaims, NumberDecoding, NumericDate, RegisteredClaims, TimeClaim,
    unix_seconds, validate_time_claims,
};
pub use error::{BoxError, ClaimError, ClaimViolations, Error, ErrorKind, Result};
pub use keys::{AsymmetricKey, Key, SymmetricKey};

// Request extraction
pub use extract::{
    BearerExtractor, CookieExtractor, Extractor, HeaderExtractor, MultiExtractor,
    QueryExtractor, parse_from_request,
};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::algorithm::Hmac;
    use std::time::{Duration, SystemTime, UNIX_EPOCH};

    fn now() -> i64 {
        claims::unix_seconds(SystemTime::now())
    }

    #[test]
    fn test_full_flow_hmac() {
        let claims = RegisteredClaims {
            issuer: Some("https://example.com".into()),
            subject: Some("user123".into()),
            expiration: Some(NumericDate::from_seconds(now() + 3600)),
            issued_at: Some(NumericDate::from_seconds(now())),
            ..Default::default()
        };

        let secret = Key::symmetric("my-secret-key");
        let token_str = sign(&Hmac::HS256, &claims, &secret).expect("Sign failed");

        let token = Parser::new(AlgorithmPolicy::hs256_only())
            .parse_with_claims::<RegisteredClaims, _>(&token_str, |_| Ok(secret.clone()))
            .expect("Verification failed");

        assert!(token.is_verified());
        assert_eq!(token.claims().issuer.as_deref(), Some("https://example.com"));
        assert_eq!(token.claims().subject.as_deref(), Some("user123"));
    }

    #[test]
    fn test_signature_verification_fails() {
        let header = r#"{"alg":"HS256"}"#;
        let payload = r#"{"iss":"https://example.com","sub":"user"}"#;
        let token_str = format!(
            "{}.{}.{}",
            codec::encode(header),
            codec::encode(payload),
            codec::encode("wrong_signature")
        );

        let rejection = Parser::new(AlgorithmPolicy::hs256_only())
            .parse(&token_str, |_| Ok(Key::symmetric("secret")))
            .unwrap_err();

        assert!(matches!(rejection.error(), Error::SignatureInvalid));
        let token = rejection.token().expect("token kept for diagnostics");
        assert_eq!(token.claims().get("sub").and_then(|v| v.as_str()), Some("user"));
        assert!(!token.is_verified());
    }

    #[test]
    fn test_expired_token_is_authentic() {
        let clock = UNIX_EPOCH + Duration::from_secs(1_000);
        let claims: MapClaims = [("exp", 999)].into_iter().collect();
        let token_str = sign(&Hmac::HS256, &claims, &Key::symmetric("secret")).unwrap();

        let rejection = Parser::new(AlgorithmPolicy::hs256_only())
            .clock(move || clock)
            .build()
            .parse(&token_str, |_| Ok(Key::symmetric("secret")))
            .unwrap_err();

        assert_eq!(rejection.kind(), ErrorKind::ClaimsInvalid);
        assert!(rejection.to_string().contains("expired"));
    }
}
