mod traits;

pub mod ecdsa;
pub mod eddsa;
pub mod hmac;
pub mod none;
pub mod registry;
pub mod rsa;

pub use ecdsa::Ecdsa;
pub use eddsa::EdDsa;
pub use hmac::Hmac;
pub use none::NoneMethod;
pub use registry::MethodRegistry;
pub use rsa::Rsa;
pub use traits::SigningMethod;

use crate::error::{Error, Result};

/// Every built-in identifier except `none`
const SIGNED_ALGORITHMS: [&str; 13] = [
    "HS256", "HS384", "HS512", "RS256", "RS384", "RS512", "PS256", "PS384", "PS512", "ES256",
    "ES384", "ES512", "EdDSA",
];

/// Policy for allowed algorithms
///
/// Every [`Parser`](crate::Parser) requires one. The `alg` header of an
/// incoming token is checked against this list before any method is looked up
/// or any key is resolved, which closes the algorithm-confusion attack where
/// an attacker switches e.g. `RS256` to `HS256` and signs with the public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlgorithmPolicy {
    allowed: Vec<String>,
}

impl AlgorithmPolicy {
    /// Create a policy that allows only specific algorithms
    pub fn allow_only<I, S>(algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: algorithms.into_iter().map(Into::into).collect(),
        }
    }

    /// Policy that allows only HS256
    ///
    /// This is the recommended policy for HMAC-based validation when you control
    /// the signing key and algorithm.
    pub fn hs256_only() -> Self {
        Self::allow_only(["HS256"])
    }

    /// Policy that allows any HMAC algorithm (HS256, HS384, HS512)
    ///
    /// # Security Warning
    ///
    /// Using multiple HMAC variants with the same key is not recommended.
    /// Prefer algorithm-specific policies like [`hs256_only()`](Self::hs256_only).
    pub fn hmac_any() -> Self {
        Self::allow_only(["HS256", "HS384", "HS512"])
    }

    /// Policy that allows only RS256
    pub fn rs256_only() -> Self {
        Self::allow_only(["RS256"])
    }

    /// Policy that allows any RSA algorithm, PKCS#1 v1.5 and PSS
    pub fn rsa_any() -> Self {
        Self::allow_only(["RS256", "RS384", "RS512", "PS256", "PS384", "PS512"])
    }

    /// Policy that allows only ES256 (ECDSA with P-256)
    pub fn es256_only() -> Self {
        Self::allow_only(["ES256"])
    }

    /// Policy that allows any ECDSA algorithm (ES256, ES384, ES512)
    pub fn ecdsa_any() -> Self {
        Self::allow_only(["ES256", "ES384", "ES512"])
    }

    /// Policy that allows only EdDSA
    pub fn eddsa_only() -> Self {
        Self::allow_only(["EdDSA"])
    }

    /// Policy that allows every built-in signed algorithm
    ///
    /// # Security Warning
    ///
    /// Mixing symmetric and asymmetric algorithms under one policy is only safe
    /// when the key resolver picks the key from the algorithm, never from the
    /// token alone. Intended for tooling such as token inspectors. `none` is
    /// not included.
    pub fn danger_allow_all() -> Self {
        Self::allow_only(SIGNED_ALGORITHMS)
    }

    /// Check if an algorithm is allowed
    pub fn is_allowed(&self, algorithm: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == algorithm)
    }

    /// Validate algorithm against policy
    pub fn validate(&self, algorithm: &str) -> Result<()> {
        if self.is_allowed(algorithm) {
            Ok(())
        } else {
            Err(Error::AlgorithmNotAllowed {
                found: algorithm.to_string(),
                allowed: self.allowed.clone(),
            })
        }
    }

    /// Get list of allowed algorithms
    pub fn allowed_algorithms(&self) -> &[String] {
        &self.allowed
    }

    pub fn is_empty(&self) -> bool {
        self.allowed.is_empty()
    }
}
