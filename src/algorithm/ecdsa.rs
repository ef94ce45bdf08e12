use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::Key;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, EcdsaKeyPair, UnparsedPublicKey};

/// ECDSA signing methods with fixed-length `R || S` signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ecdsa {
    /// ECDSA with P-256 and SHA-256
    ES256,
    /// ECDSA with P-384 and SHA-384
    ES384,
    /// ECDSA with P-521 and SHA-512
    ES512,
}

impl Ecdsa {
    fn signing_algorithm(&self) -> &'static signature::EcdsaSigningAlgorithm {
        match self {
            Ecdsa::ES256 => &signature::ECDSA_P256_SHA256_FIXED_SIGNING,
            Ecdsa::ES384 => &signature::ECDSA_P384_SHA384_FIXED_SIGNING,
            Ecdsa::ES512 => &signature::ECDSA_P521_SHA512_FIXED_SIGNING,
        }
    }

    fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            Ecdsa::ES256 => &signature::ECDSA_P256_SHA256_FIXED,
            Ecdsa::ES384 => &signature::ECDSA_P384_SHA384_FIXED,
            Ecdsa::ES512 => &signature::ECDSA_P521_SHA512_FIXED,
        }
    }
}

impl SigningMethod for Ecdsa {
    fn alg(&self) -> &'static str {
        match self {
            Ecdsa::ES256 => "ES256",
            Ecdsa::ES384 => "ES384",
            Ecdsa::ES512 => "ES512",
        }
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        let der = key.as_ecdsa_private(self.alg())?;

        // Rejects keys on a curve other than the algorithm's
        let key_pair = EcdsaKeyPair::from_pkcs8(self.signing_algorithm(), der)
            .map_err(|e| Error::Sign(format!("invalid {} private key: {e}", self.alg())))?;

        let signature = key_pair
            .sign(&SystemRandom::new(), signing_input.as_bytes())
            .map_err(|_| Error::Sign(format!("{} signing failed", self.alg())))?;

        Ok(signature.as_ref().to_vec())
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let public_key = key.as_ecdsa_public(self.alg())?;

        UnparsedPublicKey::new(self.verification_algorithm(), public_key)
            .verify(signing_input.as_bytes(), signature)
            .map_err(|_| Error::SignatureInvalid)
    }
}
