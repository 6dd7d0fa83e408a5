//! Auction result integrity digest.
//!
//! The digest lets the client verify that the ciphertext it received is the
//! one the SFE produced: base64url-encoded SHA-256, exposed in the
//! `Ad-Auction-Result` response header.
//!
//! The hash input is the *transport-encoded* (standard base64) text of the
//! ciphertext, not the raw bytes. The client hashes the
//! `serverAdAuctionResponse` string exactly as received, so both sides must
//! hash the same representation.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

/// Compute the integrity digest for a transport-encoded auction result.
///
/// Deterministic and stateless: the same encoded ciphertext always yields
/// the same digest, recomputed on every call.
pub fn auction_result_digest(encoded_ciphertext: &str) -> String {
    let hash = Sha256::digest(encoded_ciphertext.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let a = auction_result_digest("QUI=");
        let b = auction_result_digest("QUI=");
        assert_eq!(a, b);
    }

    #[test]
    fn digest_is_url_safe_and_unpadded() {
        // SHA-256 is 32 bytes; base64url without padding is 43 characters.
        let digest = auction_result_digest("QUI=");
        assert_eq!(digest.len(), 43);
        assert!(!digest.contains('='));
        assert!(!digest.contains('+'));
        assert!(!digest.contains('/'));
    }

    #[test]
    fn digest_covers_encoded_text_not_raw_bytes() {
        // Hashing the encoded form "QUI=" must differ from hashing the raw
        // bytes [0x41, 0x42] it decodes to.
        let over_encoded = auction_result_digest("QUI=");
        let over_raw = URL_SAFE_NO_PAD.encode(Sha256::digest(b"AB"));
        assert_ne!(over_encoded, over_raw);
    }

    #[test]
    fn distinct_inputs_distinct_digests() {
        assert_ne!(auction_result_digest("QUI="), auction_result_digest("QUE="));
    }
}
