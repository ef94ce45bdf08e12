//! Error types for token issuance and verification
//!
//! Every failure in the codec, the signing methods, and the verification
//! pipeline is reported through [`Error`]. Callers that only need the broad
//! category (for example to tell "not authentic" apart from "authentic but
//! expired") can match on [`Error::kind`].

use std::fmt;
use thiserror::Error;

/// Boxed error returned by key resolvers and other caller-supplied callbacks
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// jwtkit Errors
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Format Errors
    // ============================================================================
    /// Structurally invalid input: segment count, Base64URL, or JSON
    #[error("Malformed token: {0}")]
    Malformed(String),

    // ============================================================================
    // Unverifiable Errors
    // ============================================================================
    #[error("Algorithm '{found}' not allowed. Allowed: {allowed:?}")]
    AlgorithmNotAllowed { found: String, allowed: Vec<String> },

    #[error("Algorithm '{0}' is not supported")]
    AlgorithmUnsupported(String),

    /// The key resolver callback failed
    #[error("Key resolution failed: {0}")]
    KeyResolution(#[source] BoxError),

    // ============================================================================
    // Signature Errors
    // ============================================================================
    #[error("Signature verification failed")]
    SignatureInvalid,

    #[error("Key type mismatch for algorithm '{algorithm}': expected {expected}, got {actual}")]
    KeyTypeMismatch {
        algorithm: String,
        expected: &'static str,
        actual: &'static str,
    },

    // ============================================================================
    // Claims Errors
    // ============================================================================
    #[error("Claim validation failed: {0}")]
    ClaimsInvalid(ClaimViolations),

    // ============================================================================
    // Issuance and Configuration Errors
    // ============================================================================
    #[error("Signing failed: {0}")]
    Sign(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("No token present in request")]
    TokenNotFound,
}

/// Broad category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The token text could not be decoded
    Malformed,
    /// The token cannot be verified: algorithm not permitted or unknown, or no key
    Unverifiable,
    /// The signature does not authenticate the signing input
    SignatureInvalid,
    /// The resolved key has the wrong shape for the algorithm
    KeyType,
    /// The token is authentic but its claims are not acceptable
    ClaimsInvalid,
    /// Issuance failed
    Sign,
    /// The parser configuration is invalid
    Configuration,
    /// A request carried no token
    TokenNotFound,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Malformed(_) => ErrorKind::Malformed,
            Error::AlgorithmNotAllowed { .. }
            | Error::AlgorithmUnsupported(_)
            | Error::KeyResolution(_) => ErrorKind::Unverifiable,
            Error::SignatureInvalid => ErrorKind::SignatureInvalid,
            Error::KeyTypeMismatch { .. } => ErrorKind::KeyType,
            Error::ClaimsInvalid(_) => ErrorKind::ClaimsInvalid,
            Error::Sign(_) => ErrorKind::Sign,
            Error::Configuration(_) => ErrorKind::Configuration,
            Error::TokenNotFound => ErrorKind::TokenNotFound,
        }
    }

    /// Claim violations, if this is a claims error
    pub fn claim_violations(&self) -> Option<&ClaimViolations> {
        match self {
            Error::ClaimsInvalid(violations) => Some(violations),
            _ => None,
        }
    }
}

/// A single violated claim rule
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClaimError {
    #[error("Token expired at {expired_at} (now: {now}, leeway: {leeway}s)")]
    Expired {
        expired_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token not valid until {not_before} (now: {now}, leeway: {leeway}s)")]
    NotYetValid {
        not_before: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Token issued in future at {issued_at} (now: {now}, leeway: {leeway}s)")]
    IssuedInFuture {
        issued_at: i64,
        now: i64,
        leeway: u64,
    },

    #[error("Required claim '{0}' is missing")]
    Missing(String),

    #[error("Claim '{0}' is not a number")]
    InvalidType(String),

    #[error("Claim '{0}' is not a representable timestamp")]
    InvalidNumericDate(String),

    #[error("{0}")]
    Custom(String),
}

/// Every claim rule a token violated, in evaluation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClaimViolations(Vec<ClaimError>);

impl ClaimViolations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation
    pub fn push(&mut self, violation: ClaimError) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClaimError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ClaimError] {
        &self.0
    }

    /// `Ok(())` when nothing was violated, otherwise `Err(self)`
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl Extend<ClaimError> for ClaimViolations {
    fn extend<T: IntoIterator<Item = ClaimError>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

impl FromIterator<ClaimError> for ClaimViolations {
    fn from_iter<T: IntoIterator<Item = ClaimError>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ClaimViolations {
    type Item = ClaimError;
    type IntoIter = std::vec::IntoIter<ClaimError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ClaimViolations {
    type Item = &'a ClaimError;
    type IntoIter = std::slice::Iter<'a, ClaimError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ClaimViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, violation) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ClaimViolations {}

/// Result type alias for jwtkit operations
pub type Result<T> = std::result::Result<T, Error>;
