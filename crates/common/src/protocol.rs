//! Request and response types for the relay's HTTP surface.
//!
//! Field names are a fixed wire contract with the demo front end: camelCase
//! keys exactly as the browser-side code sends and expects them. Do not
//! rename fields without coordinating a front-end change.

use serde::{Deserialize, Serialize};

/// Response header carrying the base64url SHA-256 digest of the encoded
/// auction result ciphertext.
pub const AD_AUCTION_RESULT_HEADER: &str = "Ad-Auction-Result";

// ---------------------------------------------------------------------------
// Ad-auction endpoint
// ---------------------------------------------------------------------------

/// Request body for `POST /ad-auction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdAuctionRequest {
    /// Encrypted auction payload from the client, base64 encoded.
    pub ad_auction_request: String,

    /// `host:port` of the seller front-end to run the auction on. Supplied
    /// per request so the demo UI can target different SFE instances.
    pub sfe_address: String,

    /// Selects the component-auction topology (distinct top-level seller)
    /// instead of the single-seller topology.
    pub is_component_auction: bool,
}

/// Successful response body for `POST /ad-auction`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdAuctionResponse {
    /// Auction result ciphertext returned by the SFE, base64 encoded because
    /// JSON cannot carry a byte array.
    pub server_ad_auction_response: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_ciphertext"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall service status; always `"ok"` — the relay holds no state that
    /// could make it unready.
    pub status: String,
    /// Number of SFE channels currently pooled.
    pub pooled_channels: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ad_auction_request_uses_camel_case_keys() {
        let req = AdAuctionRequest {
            ad_auction_request: "QUI=".into(),
            sfe_address: "localhost:9000".into(),
            is_component_auction: false,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"adAuctionRequest\""));
        assert!(json.contains("\"sfeAddress\""));
        assert!(json.contains("\"isComponentAuction\""));
    }

    #[test]
    fn ad_auction_request_round_trip() {
        let json = r#"{"adAuctionRequest":"QUI=","sfeAddress":"localhost:9000","isComponentAuction":true}"#;
        let decoded: AdAuctionRequest = serde_json::from_str(json).unwrap();
        assert_eq!(decoded.ad_auction_request, "QUI=");
        assert_eq!(decoded.sfe_address, "localhost:9000");
        assert!(decoded.is_component_auction);
    }

    #[test]
    fn ad_auction_response_field_name() {
        let resp = AdAuctionResponse {
            server_ad_auction_response: "QUI=".into(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"serverAdAuctionResponse\":\"QUI=\""));
    }

    #[test]
    fn error_response_new() {
        let e = ErrorResponse::new("bad_ciphertext", "invalid base64");
        assert_eq!(e.code, "bad_ciphertext");
        assert!(e.message.contains("invalid base64"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            pooled_channels: 2,
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.pooled_channels, 2);
    }
}
