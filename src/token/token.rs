//! The `Token` type shared by the issuance and verification paths
//!
//! A token built with [`Token::new`] starts unsigned and unverified. A token
//! returned by the [`Parser`](crate::Parser) carries the raw text and decoded
//! signature, and is marked verified only after signature authentication and
//! claims validation both succeeded.

use crate::algorithm::SigningMethod;
use crate::claims::Claims;
use crate::codec;
use crate::error::{Error, Result};
use crate::keys::Key;
use crate::token::Header;
use serde::Serialize;
use std::sync::Arc;

/// A JWT: header, claims, and the method that signs or verified it
///
/// # Examples
///
/// Issuing a token:
///
/// ```ignore
/// use jwtkit::*;
///
/// let mut claims = MapClaims::new();
/// claims.insert("sub", "alice");
///
/// let mut token = Token::new(algorithm::Hmac::HS256, claims);
/// token.header_mut().insert("kid", "2024-01");
/// let compact = token.signed_string(&Key::symmetric("secret"))?;
/// ```
#[derive(Debug, Clone)]
pub struct Token<C> {
    raw: Option<String>,
    method: Arc<dyn SigningMethod>,
    header: Header,
    claims: C,
    signature: Option<Vec<u8>>,
    verified: bool,
}

impl<C> Token<C> {
    /// Build a token for parser output
    pub(crate) fn parsed(
        raw: &str,
        method: Arc<dyn SigningMethod>,
        header: Header,
        claims: C,
        signature: Vec<u8>,
    ) -> Self {
        Self {
            raw: Some(raw.to_string()),
            method,
            header,
            claims,
            signature: Some(signature),
            verified: false,
        }
    }

    pub(crate) fn mark_verified(&mut self) {
        self.verified = true;
    }

    /// The compact text this token was parsed from or last signed into
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn method(&self) -> &Arc<dyn SigningMethod> {
        &self.method
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Mutable header access
    ///
    /// Clears the raw text and signature, and the verified flag, since they no
    /// longer describe the token.
    pub fn header_mut(&mut self) -> &mut Header {
        self.invalidate();
        &mut self.header
    }

    pub fn claims(&self) -> &C {
        &self.claims
    }

    /// Mutable claims access, with the same effect as [`header_mut`](Self::header_mut)
    pub fn claims_mut(&mut self) -> &mut C {
        self.invalidate();
        &mut self.claims
    }

    pub fn into_claims(self) -> C {
        self.claims
    }

    /// Decoded signature bytes
    pub fn signature(&self) -> Option<&[u8]> {
        self.signature.as_deref()
    }

    /// Whether the signature was authenticated and the claims validated
    pub fn is_verified(&self) -> bool {
        self.verified
    }

    fn invalidate(&mut self) {
        self.raw = None;
        self.signature = None;
        self.verified = false;
    }
}

impl<C: Claims> Token<C> {
    /// New unsigned token with header `{"typ":"JWT","alg":<method alg>}`
    pub fn new<M: SigningMethod + 'static>(method: M, claims: C) -> Self {
        Self::with_method(Arc::new(method), claims)
    }

    /// Like [`new`](Self::new), for a method already behind an `Arc`
    pub fn with_method(method: Arc<dyn SigningMethod>, claims: C) -> Self {
        Self {
            raw: None,
            header: Header::for_algorithm(method.alg()),
            method,
            claims,
            signature: None,
            verified: false,
        }
    }

    /// `base64url(header) "." base64url(claims)`
    ///
    /// The header's `alg` always names the token's method, whatever was
    /// written through [`header_mut`](Self::header_mut).
    pub fn signing_string(&self) -> Result<String> {
        if self.header.algorithm() == Some(self.method.alg()) {
            return signing_string(&self.header, &self.claims);
        }

        let mut header = self.header.clone();
        header.insert("alg", self.method.alg());
        signing_string(&header, &self.claims)
    }

    /// Sign and return the compact serialization
    ///
    /// The signature and compact text are stored on the token, and `alg` is
    /// re-stamped from the method. Claims are not validated on issuance.
    pub fn signed_string(&mut self, key: &Key) -> Result<String> {
        self.header.insert("alg", self.method.alg());
        let signing_input = self.signing_string()?;
        let signature = self.method.sign(&signing_input, key)?;
        let compact = format!("{signing_input}.{}", codec::encode(&signature));

        tracing::debug!(alg = self.method.alg(), "token signed");

        self.signature = Some(signature);
        self.raw = Some(compact.clone());
        Ok(compact)
    }
}

/// Sign claims in one step
///
/// Equivalent to `Token::new(method, claims).signed_string(key)` without
/// taking ownership of the claims.
pub fn sign<C: Claims>(method: &dyn SigningMethod, claims: &C, key: &Key) -> Result<String> {
    let header = Header::for_algorithm(method.alg());
    let signing_input = signing_string(&header, claims)?;
    let signature = method.sign(&signing_input, key)?;

    tracing::debug!(alg = method.alg(), "token signed");

    Ok(format!("{signing_input}.{}", codec::encode(&signature)))
}

fn signing_string<C: Serialize>(header: &Header, claims: &C) -> Result<String> {
    let header_json = serde_json::to_vec(header)
        .map_err(|e| Error::Sign(format!("header serialization failed: {e}")))?;
    let claims_json = serde_json::to_vec(claims)
        .map_err(|e| Error::Sign(format!("claims serialization failed: {e}")))?;

    Ok(format!(
        "{}.{}",
        codec::encode(header_json),
        codec::encode(claims_json)
    ))
}
