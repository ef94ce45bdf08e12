/// Key material for signing and verification
///
/// This module provides a type-safe abstraction over the key shapes the
/// built-in signing methods accept:
/// - Symmetric secrets (for HMAC algorithms)
/// - Asymmetric public keys (for RSA/ECDSA/EdDSA verification)
/// - Asymmetric private keys (for RSA/ECDSA/EdDSA signing)
/// - The inert [`Key::UnsafeNone`] marker accepted only by the `none` method
use crate::error::{Error, Result};
use std::fmt;

/// A key that can be used for signing or verification
#[derive(Debug, Clone)]
pub enum Key {
    /// Symmetric key for HMAC algorithms
    Symmetric(SymmetricKey),

    /// Asymmetric key for RSA/ECDSA/EdDSA algorithms
    Asymmetric(AsymmetricKey),

    /// Explicit opt-in to unsigned tokens
    ///
    /// # Security Warning
    ///
    /// Only the `none` method accepts this key. Returning it from a key
    /// resolver is the second half of a double opt-in: the parser's
    /// [`AlgorithmPolicy`](crate::AlgorithmPolicy) must also list `"none"`.
    UnsafeNone,
}

impl Key {
    /// Create a symmetric key from bytes
    pub fn symmetric(secret: impl Into<Vec<u8>>) -> Self {
        Key::Symmetric(SymmetricKey::new(secret.into()))
    }

    /// Create an RSA public key from DER (SubjectPublicKeyInfo or PKCS#1)
    pub fn rsa_public(der: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::RsaPublic(der.into()))
    }

    /// Create an RSA private key from PKCS#8 (or PKCS#1) DER
    pub fn rsa_private(der: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::RsaPrivate(der.into()))
    }

    /// Create an ECDSA public key from SubjectPublicKeyInfo DER or an uncompressed point
    pub fn ecdsa_public(bytes: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::EcdsaPublic(bytes.into()))
    }

    /// Create an ECDSA private key from PKCS#8 DER
    pub fn ecdsa_private(der: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::EcdsaPrivate(der.into()))
    }

    /// Create an Ed25519 public key from its raw 32 bytes
    pub fn ed25519_public(bytes: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::Ed25519Public(bytes.into()))
    }

    /// Create an Ed25519 private key from PKCS#8 DER
    pub fn ed25519_private(der: impl Into<Vec<u8>>) -> Self {
        Key::Asymmetric(AsymmetricKey::Ed25519Private(der.into()))
    }

    /// Get key type name for error messages
    pub fn key_type(&self) -> &'static str {
        match self {
            Key::Symmetric(_) => "Symmetric",
            Key::Asymmetric(key) => key.key_type(),
            Key::UnsafeNone => "UnsafeNone",
        }
    }

    /// Get as symmetric key or return error
    pub fn as_symmetric(&self, algorithm: &str) -> Result<&SymmetricKey> {
        match self {
            Key::Symmetric(key) => Ok(key),
            _ => Err(self.mismatch(algorithm, "Symmetric")),
        }
    }

    /// Get RSA public key bytes or return error
    pub fn as_rsa_public(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            Key::Asymmetric(AsymmetricKey::RsaPublic(der)) => Ok(der),
            _ => Err(self.mismatch(algorithm, "RSA public")),
        }
    }

    /// Get RSA private key bytes or return error
    pub fn as_rsa_private(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            Key::Asymmetric(AsymmetricKey::RsaPrivate(der)) => Ok(der),
            _ => Err(self.mismatch(algorithm, "RSA private")),
        }
    }

    /// Get ECDSA public key bytes or return error
    pub fn as_ecdsa_public(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            Key::Asymmetric(AsymmetricKey::EcdsaPublic(bytes)) => Ok(bytes),
            _ => Err(self.mismatch(algorithm, "ECDSA public")),
        }
    }

    /// Get ECDSA private key bytes or return error
    pub fn as_ecdsa_private(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            Key::Asymmetric(AsymmetricKey::EcdsaPrivate(der)) => Ok(der),
            _ => Err(self.mismatch(algorithm, "ECDSA private")),
        }
    }

    /// Get Ed25519 public key bytes or return error
    pub fn as_ed25519_public(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            Key::Asymmetric(AsymmetricKey::Ed25519Public(bytes)) => Ok(bytes),
            _ => Err(self.mismatch(algorithm, "Ed25519 public")),
        }
    }

    /// Get Ed25519 private key bytes or return error
    pub fn as_ed25519_private(&self, algorithm: &str) -> Result<&[u8]> {
        match self {
            Key::Asymmetric(AsymmetricKey::Ed25519Private(der)) => Ok(der),
            _ => Err(self.mismatch(algorithm, "Ed25519 private")),
        }
    }

    /// Whether this is the [`Key::UnsafeNone`] marker
    pub fn is_unsafe_none(&self) -> bool {
        matches!(self, Key::UnsafeNone)
    }

    pub(crate) fn mismatch(&self, algorithm: &str, expected: &'static str) -> Error {
        Error::KeyTypeMismatch {
            algorithm: algorithm.to_string(),
            expected,
            actual: self.key_type(),
        }
    }
}

impl From<SymmetricKey> for Key {
    fn from(key: SymmetricKey) -> Self {
        Key::Symmetric(key)
    }
}

/// Symmetric key for HMAC algorithms
#[derive(Clone)]
pub struct SymmetricKey {
    secret: Vec<u8>,
}

impl SymmetricKey {
    /// Create a new symmetric key
    pub fn new(secret: Vec<u8>) -> Self {
        Self { secret }
    }

    /// Get the secret bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.secret
    }
}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("len", &self.secret.len())
            .finish_non_exhaustive()
    }
}

impl From<Vec<u8>> for SymmetricKey {
    fn from(secret: Vec<u8>) -> Self {
        Self::new(secret)
    }
}

impl From<&[u8]> for SymmetricKey {
    fn from(secret: &[u8]) -> Self {
        Self::new(secret.to_vec())
    }
}

impl From<String> for SymmetricKey {
    fn from(secret: String) -> Self {
        Self::new(secret.into_bytes())
    }
}

impl From<&str> for SymmetricKey {
    fn from(secret: &str) -> Self {
        Self::new(secret.as_bytes().to_vec())
    }
}

/// Asymmetric key bytes, tagged with family and role
#[derive(Clone)]
pub enum AsymmetricKey {
    RsaPublic(Vec<u8>),
    RsaPrivate(Vec<u8>),
    EcdsaPublic(Vec<u8>),
    EcdsaPrivate(Vec<u8>),
    Ed25519Public(Vec<u8>),
    Ed25519Private(Vec<u8>),
}

impl AsymmetricKey {
    fn key_type(&self) -> &'static str {
        match self {
            AsymmetricKey::RsaPublic(_) => "RSA public",
            AsymmetricKey::RsaPrivate(_) => "RSA private",
            AsymmetricKey::EcdsaPublic(_) => "ECDSA public",
            AsymmetricKey::EcdsaPrivate(_) => "ECDSA private",
            AsymmetricKey::Ed25519Public(_) => "Ed25519 public",
            AsymmetricKey::Ed25519Private(_) => "Ed25519 private",
        }
    }

    /// Whether this is private key material
    pub fn is_private(&self) -> bool {
        matches!(
            self,
            AsymmetricKey::RsaPrivate(_)
                | AsymmetricKey::EcdsaPrivate(_)
                | AsymmetricKey::Ed25519Private(_)
        )
    }
}

// Private keys print their length only.
impl fmt::Debug for AsymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, bytes) = match self {
            AsymmetricKey::RsaPublic(b) => ("RsaPublic", b),
            AsymmetricKey::RsaPrivate(b) => ("RsaPrivate", b),
            AsymmetricKey::EcdsaPublic(b) => ("EcdsaPublic", b),
            AsymmetricKey::EcdsaPrivate(b) => ("EcdsaPrivate", b),
            AsymmetricKey::Ed25519Public(b) => ("Ed25519Public", b),
            AsymmetricKey::Ed25519Private(b) => ("Ed25519Private", b),
        };

        if self.is_private() {
            f.debug_struct(name)
                .field("len", &bytes.len())
                .finish_non_exhaustive()
        } else {
            f.debug_tuple(name).field(bytes).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_key_conversions() {
        let key1 = SymmetricKey::from("secret");
        assert_eq!(key1.as_bytes(), b"secret");

        let key2 = SymmetricKey::from("secret".to_string());
        assert_eq!(key2.as_bytes(), b"secret");

        let key3 = SymmetricKey::from(vec![1, 2, 3]);
        assert_eq!(key3.as_bytes(), &[1, 2, 3]);
    }

    #[test]
    fn test_key_type_checking() {
        let sym_key = Key::symmetric(b"secret");
        assert!(sym_key.as_symmetric("HS256").is_ok());
        assert!(sym_key.as_rsa_public("RS256").is_err());
        assert!(sym_key.as_ecdsa_private("ES256").is_err());

        let rsa_key = Key::rsa_public(vec![1, 2, 3]);
        match rsa_key.as_symmetric("HS256") {
            Err(Error::KeyTypeMismatch {
                algorithm,
                expected,
                actual,
            }) => {
                assert_eq!(algorithm, "HS256");
                assert_eq!(expected, "Symmetric");
                assert_eq!(actual, "RSA public");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_key_type_names() {
        assert_eq!(Key::symmetric(b"secret").key_type(), "Symmetric");
        assert_eq!(Key::rsa_private(vec![1]).key_type(), "RSA private");
        assert_eq!(Key::ecdsa_public(vec![1]).key_type(), "ECDSA public");
        assert_eq!(Key::ed25519_private(vec![1]).key_type(), "Ed25519 private");
        assert_eq!(Key::UnsafeNone.key_type(), "UnsafeNone");
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let sym = format!("{:?}", Key::symmetric("hunter2"));
        assert!(!sym.contains("hunter2"));
        assert!(!sym.contains("104"));

        let private = format!("{:?}", Key::ecdsa_private(vec![42, 42, 42]));
        assert!(!private.contains("42"));
        assert!(private.contains("len: 3"));

        let public = format!("{:?}", Key::ed25519_public(vec![7, 8]));
        assert!(public.contains("[7, 8]"));
    }
}
