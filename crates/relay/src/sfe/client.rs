//! SelectAd transport: channel pooling and the gRPC call to the SFE.
//!
//! The backend address arrives with every request, so channels are pooled
//! per `host:port` for the lifetime of the process instead of being fixed at
//! startup or reopened per call. tonic channels multiplex concurrent calls,
//! so the pool is the only point of synchronisation and the call path itself
//! takes no locks.
//!
//! There is no retry at this layer: one failed remote call yields exactly
//! one failed HTTP response.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use tonic::metadata::MetadataMap;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use super::proto::seller_front_end_client::SellerFrontEndClient;
use super::proto::{SelectAdRequest, SelectAdResponse};
use crate::config::Config;

/// Errors produced by the relay client.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The caller-supplied SFE address does not form a valid endpoint URI.
    #[error("invalid SFE address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: tonic::transport::Error,
    },

    /// The SelectAd call failed: transport error, deadline expiry, or an
    /// explicit error status from the backend.
    #[error("SelectAd call failed: {0}")]
    Call(#[from] tonic::Status),
}

/// Transport seam for the SelectAd operation.
///
/// Abstracted behind a trait so the pipeline and HTTP handlers can be tested
/// against a mocked backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SfeTransport: Send + Sync + 'static {
    /// Invoke SelectAd on the SFE at `sfe_address` with the given call
    /// metadata attached.
    async fn select_ad(
        &self,
        sfe_address: String,
        request: SelectAdRequest,
        metadata: MetadataMap,
    ) -> Result<SelectAdResponse, RelayError>;

    /// Number of backend channels currently pooled.
    async fn pooled_channels(&self) -> usize;
}

/// Shared pool of lazily-connected channels keyed by `host:port`.
///
/// Reads are concurrent; the write lock is taken only when a new address is
/// seen for the first time. A lost insert race simply reuses the channel the
/// winner stored.
#[derive(Clone, Debug)]
pub struct ChannelPool {
    inner: Arc<RwLock<HashMap<String, Channel>>>,
    request_timeout: Duration,
    connect_timeout: Duration,
    use_tls: bool,
}

impl ChannelPool {
    /// Create an empty pool with the given per-call deadlines.
    pub fn new(request_timeout: Duration, connect_timeout: Duration, use_tls: bool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            request_timeout,
            connect_timeout,
            use_tls,
        }
    }

    /// Number of channels currently pooled.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Returns `true` if no channels are pooled.
    #[allow(dead_code)]
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Fetch the channel for `address`, creating it on first use.
    ///
    /// Channels are created lazily; connection establishment happens on the
    /// first call and surfaces there as a [`RelayError::Call`].
    ///
    /// # Errors
    ///
    /// Returns [`RelayError::Address`] if `address` cannot form a valid
    /// endpoint URI.
    pub async fn channel(&self, address: &str) -> Result<Channel, RelayError> {
        if let Some(existing) = self.inner.read().await.get(address) {
            return Ok(existing.clone());
        }

        let channel = self.open(address)?;
        let mut pool = self.inner.write().await;
        Ok(pool.entry(address.to_owned()).or_insert(channel).clone())
    }

    fn open(&self, address: &str) -> Result<Channel, RelayError> {
        let scheme = if self.use_tls { "https" } else { "http" };
        let mut endpoint = Endpoint::from_shared(format!("{scheme}://{address}"))
            .map_err(|source| RelayError::Address {
                address: address.to_owned(),
                source,
            })?
            .timeout(self.request_timeout)
            .connect_timeout(self.connect_timeout);

        if self.use_tls {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|source| RelayError::Address {
                    address: address.to_owned(),
                    source,
                })?;
        }

        Ok(endpoint.connect_lazy())
    }
}

/// Production [`SfeTransport`] backed by pooled tonic channels.
pub struct GrpcSfeTransport {
    channels: ChannelPool,
}

impl GrpcSfeTransport {
    /// Build the transport from the relay configuration.
    pub fn new(cfg: &Config) -> Self {
        Self {
            channels: ChannelPool::new(
                Duration::from_secs(cfg.sfe_request_timeout_secs),
                Duration::from_secs(cfg.sfe_connect_timeout_secs),
                cfg.sfe_use_tls,
            ),
        }
    }
}

#[async_trait]
impl SfeTransport for GrpcSfeTransport {
    async fn select_ad(
        &self,
        sfe_address: String,
        request: SelectAdRequest,
        metadata: MetadataMap,
    ) -> Result<SelectAdResponse, RelayError> {
        let channel = self.channels.channel(&sfe_address).await?;
        let mut client = SellerFrontEndClient::new(channel);

        let mut call = tonic::Request::new(request);
        *call.metadata_mut() = metadata;

        let response = client.select_ad(call).await?;
        Ok(response.into_inner())
    }

    async fn pooled_channels(&self) -> usize {
        self.channels.len().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> ChannelPool {
        ChannelPool::new(Duration::from_secs(1), Duration::from_secs(1), false)
    }

    #[tokio::test]
    async fn pool_reuses_channel_per_address() {
        let pool = pool();
        pool.channel("localhost:50051").await.unwrap();
        pool.channel("localhost:50051").await.unwrap();
        assert_eq!(pool.len().await, 1);
    }

    #[tokio::test]
    async fn pool_keys_channels_by_address() {
        let pool = pool();
        pool.channel("localhost:50051").await.unwrap();
        pool.channel("localhost:50053").await.unwrap();
        assert_eq!(pool.len().await, 2);
    }

    #[tokio::test]
    async fn invalid_address_is_an_address_error() {
        let pool = pool();
        let err = pool.channel("not a host port").await.unwrap_err();
        assert!(matches!(err, RelayError::Address { .. }));
    }

    #[tokio::test]
    async fn invalid_address_is_not_pooled() {
        let pool = pool();
        let _ = pool.channel("not a host port").await;
        assert_eq!(pool.len().await, 0);
    }

    #[tokio::test]
    async fn transport_starts_with_empty_pool() {
        let transport = GrpcSfeTransport::new(&Config::default());
        assert_eq!(transport.pooled_channels().await, 0);
    }
}
