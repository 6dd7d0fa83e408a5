//! Hand-maintained mirror of the seller front-end `SelectAd` wire schema.
//!
//! Message and field names, field numbers, and the RPC path are an immutable
//! contract with the external auction service; they must match its schema
//! byte for byte. The definitions are checked in directly so the build needs
//! neither `protoc` nor a `build.rs` step.

/// Full gRPC method path of the `SelectAd` unary RPC.
pub const SELECT_AD_METHOD: &str =
    "/privacy_sandbox.bidding_auction_servers.SellerFrontEnd/SelectAd";

/// Per-buyer auction configuration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PerBuyerConfig {
    /// Opaque signals string forwarded to this buyer's bidding logic.
    #[prost(string, tag = "1")]
    pub buyer_signals: ::prost::alloc::string::String,
}

/// Seller-side auction configuration.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuctionConfig {
    /// Top-level seller origin. Equals `seller` in single-seller mode and a
    /// distinct origin in component-auction mode.
    #[prost(string, tag = "1")]
    pub top_level_seller: ::prost::alloc::string::String,

    /// Seller origin running this auction.
    #[prost(string, tag = "2")]
    pub seller: ::prost::alloc::string::String,

    /// Opaque auction signals string.
    #[prost(string, tag = "3")]
    pub auction_signals: ::prost::alloc::string::String,

    /// Opaque seller signals string.
    #[prost(string, tag = "4")]
    pub seller_signals: ::prost::alloc::string::String,

    /// Participating buyer origins, in auction order.
    #[prost(string, repeated, tag = "5")]
    pub buyer_list: ::prost::alloc::vec::Vec<::prost::alloc::string::String>,

    /// Per-buyer configuration keyed by buyer origin.
    #[prost(map = "string, message", tag = "6")]
    pub per_buyer_config:
        ::std::collections::HashMap<::prost::alloc::string::String, PerBuyerConfig>,
}

/// Request for the `SelectAd` RPC.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SelectAdRequest {
    /// Structured auction configuration.
    #[prost(message, optional, tag = "1")]
    pub auction_config: ::core::option::Option<AuctionConfig>,

    /// Platform the encrypted payload was produced on.
    #[prost(enumeration = "ClientType", tag = "2")]
    pub client_type: i32,

    /// Encrypted protected-auction payload, opaque to the relay.
    #[prost(bytes = "vec", tag = "3")]
    pub protected_auction_ciphertext: ::prost::alloc::vec::Vec<u8>,
}

/// Response of the `SelectAd` RPC.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SelectAdResponse {
    /// Encrypted auction result, opaque to the relay.
    #[prost(bytes = "vec", tag = "1")]
    pub auction_result_ciphertext: ::prost::alloc::vec::Vec<u8>,
}

/// Client platform the auction payload originates from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ClientType {
    /// Unset; rejected by the request builder.
    Unknown = 0,
    /// App (Android) auction payload.
    Android = 1,
    /// Browser auction payload.
    Browser = 2,
}

impl ClientType {
    /// Wire-level name of this enum value.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            ClientType::Unknown => "CLIENT_TYPE_UNKNOWN",
            ClientType::Android => "CLIENT_TYPE_ANDROID",
            ClientType::Browser => "CLIENT_TYPE_BROWSER",
        }
    }

    /// Parse a wire-level enum value name.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "CLIENT_TYPE_UNKNOWN" => Some(Self::Unknown),
            "CLIENT_TYPE_ANDROID" => Some(Self::Android),
            "CLIENT_TYPE_BROWSER" => Some(Self::Browser),
            _ => None,
        }
    }
}

pub mod seller_front_end_client {
    //! Unary client for the `SellerFrontEnd` service, bound to a reusable
    //! [`Channel`]. Channels multiplex, so cloning the channel into a fresh
    //! client per call is cheap and concurrency-safe.

    use tonic::codegen::http::uri::PathAndQuery;
    use tonic::transport::Channel;

    use super::{SelectAdRequest, SelectAdResponse, SELECT_AD_METHOD};

    /// gRPC client for the seller front-end auction service.
    #[derive(Debug, Clone)]
    pub struct SellerFrontEndClient {
        inner: tonic::client::Grpc<Channel>,
    }

    impl SellerFrontEndClient {
        /// Wrap an established (possibly lazy) channel.
        pub fn new(channel: Channel) -> Self {
            Self {
                inner: tonic::client::Grpc::new(channel),
            }
        }

        /// Run the server-side auction over the encrypted payload.
        ///
        /// # Errors
        ///
        /// Returns the gRPC [`tonic::Status`] on transport failure, deadline
        /// expiry, or an explicit backend error.
        pub async fn select_ad(
            &mut self,
            request: tonic::Request<SelectAdRequest>,
        ) -> Result<tonic::Response<SelectAdResponse>, tonic::Status> {
            self.inner
                .ready()
                .await
                .map_err(|e| tonic::Status::unknown(format!("SFE channel not ready: {e}")))?;
            let codec: tonic::codec::ProstCodec<SelectAdRequest, SelectAdResponse> =
                tonic::codec::ProstCodec::default();
            let path = PathAndQuery::from_static(SELECT_AD_METHOD);
            self.inner.unary(request, path, codec).await
        }
    }
}
