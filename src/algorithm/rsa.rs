use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::Key;

use aws_lc_rs::rand::SystemRandom;
use aws_lc_rs::signature::{self, RsaKeyPair, UnparsedPublicKey};

/// RSA signing methods: PKCS#1 v1.5 (RS*) and PSS (PS*)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rsa {
    /// RSASSA-PKCS1-v1_5 with SHA-256
    RS256,
    /// RSASSA-PKCS1-v1_5 with SHA-384
    RS384,
    /// RSASSA-PKCS1-v1_5 with SHA-512
    RS512,
    /// RSASSA-PSS with SHA-256
    PS256,
    /// RSASSA-PSS with SHA-384
    PS384,
    /// RSASSA-PSS with SHA-512
    PS512,
}

impl Rsa {
    fn encoding(&self) -> &'static dyn signature::RsaEncoding {
        match self {
            Rsa::RS256 => &signature::RSA_PKCS1_SHA256,
            Rsa::RS384 => &signature::RSA_PKCS1_SHA384,
            Rsa::RS512 => &signature::RSA_PKCS1_SHA512,
            Rsa::PS256 => &signature::RSA_PSS_SHA256,
            Rsa::PS384 => &signature::RSA_PSS_SHA384,
            Rsa::PS512 => &signature::RSA_PSS_SHA512,
        }
    }

    fn verification_algorithm(&self) -> &'static dyn signature::VerificationAlgorithm {
        match self {
            Rsa::RS256 => &signature::RSA_PKCS1_2048_8192_SHA256,
            Rsa::RS384 => &signature::RSA_PKCS1_2048_8192_SHA384,
            Rsa::RS512 => &signature::RSA_PKCS1_2048_8192_SHA512,
            Rsa::PS256 => &signature::RSA_PSS_2048_8192_SHA256,
            Rsa::PS384 => &signature::RSA_PSS_2048_8192_SHA384,
            Rsa::PS512 => &signature::RSA_PSS_2048_8192_SHA512,
        }
    }
}

impl SigningMethod for Rsa {
    fn alg(&self) -> &'static str {
        match self {
            Rsa::RS256 => "RS256",
            Rsa::RS384 => "RS384",
            Rsa::RS512 => "RS512",
            Rsa::PS256 => "PS256",
            Rsa::PS384 => "PS384",
            Rsa::PS512 => "PS512",
        }
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        let der = key.as_rsa_private(self.alg())?;

        // PKCS#8 first, then bare PKCS#1 RSAPrivateKey
        let key_pair = RsaKeyPair::from_pkcs8(der)
            .or_else(|_| RsaKeyPair::from_der(der))
            .map_err(|e| Error::Sign(format!("invalid RSA private key: {e}")))?;

        let mut signature = vec![0u8; key_pair.public_modulus_len()];
        key_pair
            .sign(
                self.encoding(),
                &SystemRandom::new(),
                signing_input.as_bytes(),
                &mut signature,
            )
            .map_err(|_| Error::Sign(format!("{} signing failed", self.alg())))?;

        Ok(signature)
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let public_key_der = key.as_rsa_public(self.alg())?;

        UnparsedPublicKey::new(self.verification_algorithm(), public_key_der)
            .verify(signing_input.as_bytes(), signature)
            .map_err(|_| Error::SignatureInvalid)
    }
}
