//! Compact serialization codec
//!
//! Maps between the three-segment compact form and its decoded parts. Output
//! is always unpadded Base64URL per [RFC 7515](https://datatracker.ietf.org/doc/html/rfc7515#section-2).
//! Input is unpadded by default; [`Padding::Lenient`] additionally accepts
//! segments from producers that emit `=` padding.

use crate::error::{Error, Result};
use base64::{
    Engine,
    engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD},
};
use serde::Deserialize;

/// How Base64URL segments are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Padding {
    /// Reject padded segments (RFC 7515)
    #[default]
    Strict,
    /// Pad short segments to a multiple of four before decoding
    Lenient,
}

/// Decoded parts of a compact token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments<'a> {
    pub header: Vec<u8>,
    pub payload: Vec<u8>,
    pub signature: Vec<u8>,
    /// `header "." payload` exactly as it appeared in the token text
    pub signing_input: &'a str,
}

/// Encode bytes as an unpadded Base64URL segment
pub fn encode(input: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Decode a single Base64URL segment
pub fn decode_segment(segment: &str, padding: Padding) -> Result<Vec<u8>> {
    let decoded = match padding {
        Padding::Strict => URL_SAFE_NO_PAD.decode(segment),
        Padding::Lenient => match segment.len() % 4 {
            0 => URL_SAFE.decode(segment),
            remainder => {
                let mut padded = String::with_capacity(segment.len() + 4 - remainder);
                padded.push_str(segment);
                padded.extend(std::iter::repeat_n('=', 4 - remainder));
                URL_SAFE.decode(padded)
            }
        },
    };

    decoded.map_err(|e| Error::Malformed(format!("Base64URL decode failed: {e}")))
}

/// Split a compact token into its three decoded segments
pub fn decode(token: &str, padding: Padding) -> Result<Segments<'_>> {
    let mut parts = token.split('.');
    let (Some(header_b64), Some(payload_b64), Some(signature_b64), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(Error::Malformed(
            "expected three segments separated by '.'".into(),
        ));
    };

    let signing_input = &token[..header_b64.len() + 1 + payload_b64.len()];

    Ok(Segments {
        header: decode_named(header_b64, "header", padding)?,
        payload: decode_named(payload_b64, "payload", padding)?,
        signature: decode_named(signature_b64, "signature", padding)?,
        signing_input,
    })
}

fn decode_named(segment: &str, name: &str, padding: Padding) -> Result<Vec<u8>> {
    decode_segment(segment, padding).map_err(|e| match e {
        Error::Malformed(msg) => Error::Malformed(format!("{name} segment: {msg}")),
        other => other,
    })
}
