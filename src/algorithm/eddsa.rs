use crate::algorithm::SigningMethod;
use crate::error::{Error, Result};
use crate::keys::Key;

use aws_lc_rs::signature::{self, Ed25519KeyPair, UnparsedPublicKey};

/// EdDSA over Ed25519
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdDsa;

impl SigningMethod for EdDsa {
    fn alg(&self) -> &'static str {
        "EdDSA"
    }

    fn sign(&self, signing_input: &str, key: &Key) -> Result<Vec<u8>> {
        let der = key.as_ed25519_private(self.alg())?;
        let key_pair = Ed25519KeyPair::from_pkcs8(der)
            .map_err(|e| Error::Sign(format!("invalid Ed25519 private key: {e}")))?;

        Ok(key_pair.sign(signing_input.as_bytes()).as_ref().to_vec())
    }

    fn verify(&self, signing_input: &str, signature: &[u8], key: &Key) -> Result<()> {
        let public_key = key.as_ed25519_public(self.alg())?;

        UnparsedPublicKey::new(&signature::ED25519, public_key)
            .verify(signing_input.as_bytes(), signature)
            .map_err(|_| Error::SignatureInvalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_lc_rs::rand::SystemRandom;
    use aws_lc_rs::signature::KeyPair;

    const SIGNING_INPUT: &str = "eyJhbGciOiJFZERTQSJ9.eyJzdWIiOiIxMjM0NTY3ODkwIn0";

    fn generate_ed25519_keypair() -> (Vec<u8>, Vec<u8>) {
        let pkcs8 =
            Ed25519KeyPair::generate_pkcs8(&SystemRandom::new()).expect("Failed to generate key");
        let key_pair = Ed25519KeyPair::from_pkcs8(pkcs8.as_ref()).expect("Failed to parse key");
        (
            pkcs8.as_ref().to_vec(),
            key_pair.public_key().as_ref().to_vec(),
        )
    }

    #[test]
    fn test_eddsa_sign_and_verify() {
        let (private_der, public_key) = generate_ed25519_keypair();

        let signature = EdDsa
            .sign(SIGNING_INPUT, &Key::ed25519_private(private_der))
            .unwrap();
        assert_eq!(signature.len(), 64);

        let result = EdDsa.verify(SIGNING_INPUT, &signature, &Key::ed25519_public(public_key));
        assert!(result.is_ok());
    }

    #[test]
    fn test_eddsa_tampered_input() {
        let (private_der, public_key) = generate_ed25519_keypair();
        let signature = EdDsa
            .sign(SIGNING_INPUT, &Key::ed25519_private(private_der))
            .unwrap();

        let result = EdDsa.verify("eyJhbGciOiJFZERTQSJ9.e30", &signature, &Key::ed25519_public(public_key));
        assert!(matches!(result, Err(Error::SignatureInvalid)));
    }

    #[test]
    fn test_wrong_key_type() {
        let result = EdDsa.verify(SIGNING_INPUT, &[0u8; 64], &Key::ecdsa_public(vec![4, 1, 2]));
        assert!(matches!(result, Err(Error::KeyTypeMismatch { .. })));

        let result = EdDsa.sign(SIGNING_INPUT, &Key::symmetric("secret"));
        assert!(matches!(result, Err(Error::KeyTypeMismatch { .. })));
    }
}
