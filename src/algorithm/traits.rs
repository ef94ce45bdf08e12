use crate::error::Result;
use crate::keys::Key;
use std::fmt;

/// Core capability that every signing method implements
///
/// A method is identified by a stable algorithm string (e.g. `"HS256"`) and
/// knows which [`Key`] shapes it accepts. Signatures are raw bytes; the
/// Base64URL layer lives in [`codec`](crate::codec).
pub trait SigningMethod: Send + Sync {
    /// The algorithm identifier written to and read from the `alg` header
    fn alg(&self) -> &'static str;

    /// Sign the signing input (`header.payload`)
    ///
    /// Fails with [`Error::Sign`](crate::Error::Sign) or
    /// [`Error::KeyTypeMismatch`](crate::Error::KeyTypeMismatch).
    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>>;

    /// Verify a decoded signature over the signing input
    ///
    /// Fails with [`Error::SignatureInvalid`](crate::Error::SignatureInvalid) or
    /// [`Error::KeyTypeMismatch`](crate::Error::KeyTypeMismatch).
    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()>;
}

impl fmt::Debug for dyn SigningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningMethod").field(&self.alg()).finish()
    }
}
