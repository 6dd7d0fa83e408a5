//! Configuration loading and validation for the relay.
//!
//! All values are read from environment variables at startup. Every field
//! has a default matching the local demo deployment, so the relay starts
//! with no environment at all; production deployments override the seller
//! and buyer origins. The process exits with a clear error message if any
//! variable is present but invalid.

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::sfe::proto::ClientType;

/// Validated relay configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Port the HTTP server listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,

    /// Origin of this seller, used as `seller` in every auction and as
    /// `top_level_seller` in single-seller mode.
    #[serde(default = "default_seller_origin")]
    pub seller_origin: String,

    /// Origin of the distinct top-level seller used when the request selects
    /// the component-auction topology.
    #[serde(default = "default_top_level_seller_origin")]
    pub top_level_seller_origin: String,

    /// Comma-separated buyer origins, in auction order.
    #[serde(default = "default_buyer_origins")]
    pub buyer_origins: String,

    /// Opaque auction signals forwarded verbatim to the SFE.
    #[serde(default = "default_signals")]
    pub auction_signals: String,

    /// Opaque seller signals forwarded verbatim to the SFE.
    #[serde(default = "default_signals")]
    pub seller_signals: String,

    /// Buyer signals applied to every buyer without an explicit entry in
    /// [`Config::per_buyer_signals`].
    #[serde(default = "default_buyer_signals")]
    pub buyer_signals: String,

    /// Optional JSON object mapping buyer origin → signals string. Every key
    /// must appear in [`Config::buyer_origins`].
    #[serde(default)]
    pub per_buyer_signals: Option<String>,

    /// Wire-level client type name, `CLIENT_TYPE_BROWSER` or
    /// `CLIENT_TYPE_ANDROID`.
    #[serde(default = "default_client_type")]
    pub client_type: String,

    /// Per-call deadline (seconds) for the SelectAd RPC; expiry is treated
    /// as a backend failure.
    #[serde(default = "default_sfe_request_timeout")]
    pub sfe_request_timeout_secs: u64,

    /// Connect deadline (seconds) when opening a channel to a new SFE
    /// address.
    #[serde(default = "default_sfe_connect_timeout")]
    pub sfe_connect_timeout_secs: u64,

    /// Whether SFE channels use TLS (native roots). Disable for plaintext
    /// local SFE instances.
    #[serde(default = "default_sfe_use_tls")]
    pub sfe_use_tls: bool,

    /// Tracing log level (e.g. `"info"`, `"debug"`).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_listen_port() -> u16 {
    6003
}
fn default_seller_origin() -> String {
    "https://localhost:6003".into()
}
fn default_top_level_seller_origin() -> String {
    "https://localhost:6001".into()
}
fn default_buyer_origins() -> String {
    "https://localhost:5003,https://localhost:5004".into()
}
fn default_signals() -> String {
    r#"{"testKey":"someValue"}"#.into()
}
fn default_buyer_signals() -> String {
    r#"{"testKey": "someValue"}"#.into()
}
fn default_client_type() -> String {
    "CLIENT_TYPE_BROWSER".into()
}
fn default_sfe_request_timeout() -> u64 {
    10
}
fn default_sfe_connect_timeout() -> u64 {
    5
}
fn default_sfe_use_tls() -> bool {
    true
}
fn default_log_level() -> String {
    "info".into()
}

impl Config {
    /// Load and validate configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable cannot be parsed or fails
    /// validation.
    pub fn from_env() -> Result<Self> {
        let cfg = config::Config::builder()
            .add_source(config::Environment::default())
            .build()
            .context("failed to build configuration from environment")?;

        let c: Config = cfg
            .try_deserialize()
            .context("failed to deserialise configuration")?;

        c.validate()?;
        Ok(c)
    }

    /// Buyer origins in auction order.
    pub fn buyers(&self) -> Vec<String> {
        self.buyer_origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    }

    /// Per-buyer signals map: the explicit `PER_BUYER_SIGNALS` object when
    /// set, otherwise every buyer mapped to the shared buyer signals.
    ///
    /// # Errors
    ///
    /// Returns an error if `PER_BUYER_SIGNALS` is not a JSON object of
    /// strings.
    pub fn per_buyer_signals_map(&self) -> Result<HashMap<String, String>> {
        match &self.per_buyer_signals {
            Some(raw) => serde_json::from_str(raw)
                .context("PER_BUYER_SIGNALS must be a JSON object mapping buyer origin to a signals string"),
            None => Ok(self
                .buyers()
                .into_iter()
                .map(|buyer| (buyer, self.buyer_signals.clone()))
                .collect()),
        }
    }

    /// Validate all fields, returning a descriptive error on the first failure.
    fn validate(&self) -> Result<()> {
        ensure_non_empty(&self.seller_origin, "SELLER_ORIGIN")?;
        ensure_non_empty(&self.top_level_seller_origin, "TOP_LEVEL_SELLER_ORIGIN")?;

        let buyers = self.buyers();
        if buyers.is_empty() {
            anyhow::bail!("BUYER_ORIGINS must list at least one buyer origin");
        }

        if ClientType::from_str_name(&self.client_type).is_none()
            || self.client_type == "CLIENT_TYPE_UNKNOWN"
        {
            anyhow::bail!(
                "CLIENT_TYPE must be CLIENT_TYPE_BROWSER or CLIENT_TYPE_ANDROID, got {:?}",
                self.client_type
            );
        }

        let per_buyer = self.per_buyer_signals_map()?;
        for key in per_buyer.keys() {
            if !buyers.contains(key) {
                anyhow::bail!("PER_BUYER_SIGNALS key {key:?} is not in BUYER_ORIGINS");
            }
        }

        if self.sfe_request_timeout_secs == 0 {
            anyhow::bail!("SFE_REQUEST_TIMEOUT_SECS must be > 0");
        }
        if self.sfe_connect_timeout_secs == 0 {
            anyhow::bail!("SFE_CONNECT_TIMEOUT_SECS must be > 0");
        }
        Ok(())
    }
}

impl Default for Config {
    /// Demo-deployment configuration; also used by tests.
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            seller_origin: default_seller_origin(),
            top_level_seller_origin: default_top_level_seller_origin(),
            buyer_origins: default_buyer_origins(),
            auction_signals: default_signals(),
            seller_signals: default_signals(),
            buyer_signals: default_buyer_signals(),
            per_buyer_signals: None,
            client_type: default_client_type(),
            sfe_request_timeout_secs: default_sfe_request_timeout(),
            sfe_connect_timeout_secs: default_sfe_connect_timeout(),
            sfe_use_tls: default_sfe_use_tls(),
            log_level: default_log_level(),
        }
    }
}

fn ensure_non_empty(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        anyhow::bail!("{name} is required and must not be empty");
    }
    Ok(())
}
