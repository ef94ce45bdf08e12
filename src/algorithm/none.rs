use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::Key;

/// The unsigned `none` method
///
/// # Security Warning
///
/// Accepting unsigned tokens requires two explicit opt-ins: `"none"` in the
/// parser's [`AlgorithmPolicy`](crate::AlgorithmPolicy) and a key resolver
/// that returns [`Key::UnsafeNone`]. Any other key is a type mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NoneMethod;

impl SigningMethod for NoneMethod {
    fn alg(&self) -> &'static str {
        "none"
    }

    fn sign(&self, _signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        if key.is_unsafe_none() {
            Ok(Vec::new())
        } else {
            Err(key.mismatch(self.alg(), "UnsafeNone"))
        }
    }

    fn verify(&self, _signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        if !key.is_unsafe_none() {
            return Err(key.mismatch(self.alg(), "UnsafeNone"));
        }

        if signature.is_empty() {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        }
    }
}
