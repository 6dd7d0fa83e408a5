//! Transport codec for the opaque auction ciphertext.
//!
//! The ciphertext crosses the HTTP surface as standard-alphabet base64 text
//! (JSON cannot carry a byte array) and crosses the gRPC surface as raw
//! bytes. This module converts between the two forms in both directions:
//! inbound request decoding and outbound result encoding.
//!
//! The relay never inspects or mutates the binary content itself.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

/// Malformed transport-encoded ciphertext.
///
/// Raised on invalid characters and on input whose length is not a valid
/// padded base64 quantum — the `STANDARD` engine requires canonical padding,
/// so truncated input fails instead of silently decoding a prefix.
#[derive(Debug, Error)]
#[error("malformed base64 ciphertext: {0}")]
pub struct DecodeError(#[from] base64::DecodeError);

/// Encode raw ciphertext bytes to transport-safe base64 text.
pub fn encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode transport-encoded ciphertext back to raw bytes.
///
/// # Errors
///
/// Returns [`DecodeError`] if `text` is not canonical standard-alphabet
/// base64.
pub fn decode(text: &str) -> Result<Vec<u8>, DecodeError> {
    Ok(STANDARD.decode(text)?)
}
