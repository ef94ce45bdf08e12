use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::Key;

use constant_time_eq::constant_time_eq;
use hmac::Mac;
use hmac::digest::KeyInit;
use sha2::{Sha256, Sha384, Sha512};

/// HMAC signing methods (HS256, HS384, HS512)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hmac {
    /// HMAC with SHA-256
    HS256,
    /// HMAC with SHA-384
    HS384,
    /// HMAC with SHA-512
    HS512,
}

impl Hmac {
    fn compute(&self, signing_input: &str, secret: &[u8]) -> Option<Vec<u8>> {
        if secret.is_empty() {
            return None;
        }

        match self {
            Hmac::HS256 => mac::<hmac::Hmac<Sha256>>(signing_input, secret),
            Hmac::HS384 => mac::<hmac::Hmac<Sha384>>(signing_input, secret),
            Hmac::HS512 => mac::<hmac::Hmac<Sha512>>(signing_input, secret),
        }
    }
}

fn mac<M: Mac + KeyInit>(signing_input: &str, secret: &[u8]) -> Option<Vec<u8>> {
    let mut mac = <M as Mac>::new_from_slice(secret).ok()?;
    mac.update(signing_input.as_bytes());
    Some(mac.finalize().into_bytes().to_vec())
}

impl SigningMethod for Hmac {
    fn alg(&self) -> &'static str {
        match self {
            Hmac::HS256 => "HS256",
            Hmac::HS384 => "HS384",
            Hmac::HS512 => "HS512",
        }
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        let symmetric_key = key.as_symmetric(self.alg())?;
        self.compute(signing_input, symmetric_key.as_bytes())
            .ok_or_else(|| Error::Sign(format!("{} requires a non-empty secret", self.alg())))
    }

    /// Verify with constant-time comparison
    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let symmetric_key = key.as_symmetric(self.alg())?;
        let expected_signature = self
            .compute(signing_input, symmetric_key.as_bytes())
            .ok_or(Error::SignatureInvalid)?;

        if signature.len() != expected_signature.len() {
            return Err(Error::SignatureInvalid);
        }

        if constant_time_eq(signature, &expected_signature) {
            Ok(())
        } else {
            Err(Error::SignatureInvalid)
        }
    }
}
