//! The auction pipeline: decode → build → call → verify.
//!
//! Business logic is kept free of HTTP types so it can be unit tested
//! without a server harness; the axum handler is a thin adapter over
//! [`run`]. Any stage failure aborts the remaining stages and surfaces as a
//! single [`ServiceError`].

use common::ServiceError;
use tonic::metadata::MetadataMap;

use super::topology::{AuctionTopology, ConfigError};
use crate::codec::{self, DecodeError};
use crate::config::Config;
use crate::sfe::{RelayError, SfeTransport};
use crate::verify;
use common::protocol::AdAuctionRequest;

/// Successful pipeline output, ready for the transport adapter.
#[derive(Debug, Clone)]
pub struct AuctionOutcome {
    /// Auction result ciphertext, transport encoded.
    pub encoded_ciphertext: String,
    /// Integrity digest over the encoded ciphertext.
    pub digest: String,
}

/// Run one auction request through the full pipeline.
///
/// Stages are strictly sequential within a request; requests run
/// concurrently and share nothing but the transport's channel pool.
///
/// # Errors
///
/// Returns a [`ServiceError`] classifying the failed stage; no remote call
/// is attempted once an earlier stage has failed.
pub async fn run(
    cfg: &Config,
    transport: &dyn SfeTransport,
    request: AdAuctionRequest,
    metadata: MetadataMap,
) -> Result<AuctionOutcome, ServiceError> {
    let ciphertext = codec::decode(&request.ad_auction_request)?;

    let topology = AuctionTopology::from_config(cfg, request.is_component_auction)?;
    let select_ad = topology.into_select_ad_request(ciphertext)?;

    let result = transport
        .select_ad(request.sfe_address, select_ad, metadata)
        .await?;

    let encoded_ciphertext = codec::encode(&result.auction_result_ciphertext);
    let digest = verify::auction_result_digest(&encoded_ciphertext);

    Ok(AuctionOutcome {
        encoded_ciphertext,
        digest,
    })
}

// ---------------------------------------------------------------------------
// Stage error classification
// ---------------------------------------------------------------------------

impl From<DecodeError> for ServiceError {
    fn from(e: DecodeError) -> Self {
        ServiceError::BadCiphertext(e.to_string())
    }
}

impl From<ConfigError> for ServiceError {
    fn from(e: ConfigError) -> Self {
        ServiceError::InvalidTopology(e.to_string())
    }
}

impl From<RelayError> for ServiceError {
    fn from(e: RelayError) -> Self {
        ServiceError::Backend(e.to_string())
    }
}
