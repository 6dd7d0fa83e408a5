//! Axum request handlers for all relay endpoints.
//!
//! Handlers are thin adapters: they extract the request, hand it to the
//! auction pipeline, and translate the outcome into the transport response.
//! No business logic lives here.

use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    AdAuctionRequest, AdAuctionResponse, ErrorResponse, HealthResponse, AD_AUCTION_RESULT_HEADER,
};
use common::ServiceError;
use tracing::{error, warn};

use super::state::AppState;
use crate::auction::{pipeline, AuctionOutcome};
use crate::sfe::metadata::forwarded_metadata;

/// `POST /ad-auction` — relay an encrypted auction request to the SFE.
///
/// On success the response carries the re-encoded result ciphertext in the
/// JSON body and its integrity digest in the `Ad-Auction-Result` header. On
/// failure no digest header is set and the body is an [`ErrorResponse`].
pub async fn ad_auction(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<AdAuctionRequest>,
) -> Response {
    let metadata = forwarded_metadata(&headers, peer.ip());

    match pipeline::run(&state.config, state.sfe.as_ref(), request, metadata).await {
        Ok(AuctionOutcome {
            encoded_ciphertext,
            digest,
        }) => (
            StatusCode::OK,
            [(AD_AUCTION_RESULT_HEADER, digest)],
            Json(AdAuctionResponse {
                server_ad_auction_response: encoded_ciphertext,
            }),
        )
            .into_response(),
        Err(e) => error_response(e),
    }
}

/// `GET /health` — liveness check.
///
/// The relay is stateless, so this always reports `ok`; the pooled channel
/// count is included for operator visibility.
pub async fn health(State(state): State<AppState>) -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        pooled_channels: state.sfe.pooled_channels().await,
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

/// Translate a pipeline error into the transport response, logging the full
/// cause. Backend causes stay out of the response body.
fn error_response(e: ServiceError) -> Response {
    let status =
        StatusCode::from_u16(e.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %e, "ad auction failed");
    } else {
        warn!(error = %e, "ad auction rejected");
    }
    (status, Json(ErrorResponse::new(e.code(), e.public_message()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sfe::client::MockSfeTransport;
    use crate::sfe::proto::SelectAdResponse;
    use crate::sfe::RelayError;
    use axum::extract::connect_info::MockConnectInfo;
    use axum::routing::post;
    use axum::{body::Body, http::Request, Router};
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
    use serde_json::{json, Value};
    use sha2::{Digest, Sha256};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_router(transport: MockSfeTransport) -> Router {
        let state = AppState::new(Config::default(), Arc::new(transport));
        Router::new()
            .route("/ad-auction", post(ad_auction))
            .with_state(state)
            .layer(MockConnectInfo(SocketAddr::from(([127, 0, 0, 1], 41000))))
    }

    fn auction_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/ad-auction")
            .header("content-type", "application/json")
            .header("accept-language", "en-US")
            .header("user-agent", "demo-browser/1.0")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(resp: Response) -> Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn single_seller_auction_round_trips_the_ciphertext() {
        let mut transport = MockSfeTransport::new();
        transport
            .expect_select_ad()
            .withf(|_, req, _| req.protected_auction_ciphertext == vec![0x41, 0x42])
            .returning(|_, _, _| {
                Ok(SelectAdResponse {
                    auction_result_ciphertext: vec![0x41, 0x42],
                })
            });

        let resp = test_router(transport)
            .oneshot(auction_request(json!({
                "adAuctionRequest": "QUI=",
                "sfeAddress": "localhost:9000",
                "isComponentAuction": false,
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let expected_digest = URL_SAFE_NO_PAD.encode(Sha256::digest(b"QUI="));
        assert_eq!(
            resp.headers()[AD_AUCTION_RESULT_HEADER],
            expected_digest.as_str()
        );
        let body = body_json(resp).await;
        assert_eq!(body["serverAdAuctionResponse"], "QUI=");
    }

    #[tokio::test]
    async fn component_auction_reaches_the_backend_with_forked_topology() {
        let mut transport = MockSfeTransport::new();
        transport
            .expect_select_ad()
            .withf(|_, req, _| {
                let auction_config = req.auction_config.as_ref().unwrap();
                auction_config.top_level_seller != auction_config.seller
            })
            .returning(|_, _, _| {
                Ok(SelectAdResponse {
                    auction_result_ciphertext: vec![0x41, 0x42],
                })
            });

        let resp = test_router(transport)
            .oneshot(auction_request(json!({
                "adAuctionRequest": "QUI=",
                "sfeAddress": "localhost:9000",
                "isComponentAuction": true,
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn invalid_base64_is_rejected_without_a_remote_call() {
        let mut transport = MockSfeTransport::new();
        transport.expect_select_ad().times(0);

        let resp = test_router(transport)
            .oneshot(auction_request(json!({
                "adAuctionRequest": "!!! not base64 !!!",
                "sfeAddress": "localhost:9000",
                "isComponentAuction": false,
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().get(AD_AUCTION_RESULT_HEADER).is_none());
        let body = body_json(resp).await;
        assert_eq!(body["code"], "bad_ciphertext");
        assert!(body.get("serverAdAuctionResponse").is_none());
    }

    #[tokio::test]
    async fn backend_timeout_yields_502_with_no_partial_header() {
        let mut transport = MockSfeTransport::new();
        transport.expect_select_ad().returning(|_, _, _| {
            Err(RelayError::Call(tonic::Status::deadline_exceeded(
                "deadline expired while awaiting SelectAd",
            )))
        });

        let resp = test_router(transport)
            .oneshot(auction_request(json!({
                "adAuctionRequest": "QUI=",
                "sfeAddress": "localhost:9000",
                "isComponentAuction": false,
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        assert!(resp.headers().get(AD_AUCTION_RESULT_HEADER).is_none());
        let body = body_json(resp).await;
        assert_eq!(body["code"], "backend_failure");
        // Internal causes stay in the logs, not the response body.
        assert!(!body["message"].as_str().unwrap().contains("deadline"));
        assert!(body.get("serverAdAuctionResponse").is_none());
    }

    #[tokio::test]
    async fn caller_attributes_are_forwarded_as_call_metadata() {
        let mut transport = MockSfeTransport::new();
        transport
            .expect_select_ad()
            .withf(|_, _, metadata| {
                metadata.get("x-accept-language").map(|v| v.to_str().unwrap()) == Some("en-US")
                    && metadata.get("x-user-agent").map(|v| v.to_str().unwrap())
                        == Some("demo-browser/1.0")
                    && metadata.get("x-bna-client-ip").map(|v| v.to_str().unwrap())
                        == Some("127.0.0.1")
            })
            .returning(|_, _, _| {
                Ok(SelectAdResponse {
                    auction_result_ciphertext: vec![],
                })
            });

        let resp = test_router(transport)
            .oneshot(auction_request(json!({
                "adAuctionRequest": "QUI=",
                "sfeAddress": "localhost:9000",
                "isComponentAuction": false,
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn sfe_address_from_the_request_selects_the_backend() {
        let mut transport = MockSfeTransport::new();
        transport
            .expect_select_ad()
            .withf(|addr, _, _| addr == "sfe-2.internal:50051")
            .returning(|_, _, _| {
                Ok(SelectAdResponse {
                    auction_result_ciphertext: vec![1],
                })
            });

        let resp = test_router(transport)
            .oneshot(auction_request(json!({
                "adAuctionRequest": "QUI=",
                "sfeAddress": "sfe-2.internal:50051",
                "isComponentAuction": false,
            })))
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
