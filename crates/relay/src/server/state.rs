//! Shared application state injected into every Axum handler.

use std::sync::Arc;

use crate::config::Config;
use crate::sfe::{GrpcSfeTransport, SfeTransport};

/// Application state shared across all request handlers.
///
/// Both fields are `Arc`-wrapped so Axum can clone the state per request
/// without copying the configuration or the channel pool.
#[derive(Clone)]
pub struct AppState {
    /// Validated relay configuration.
    pub config: Arc<Config>,
    /// SelectAd transport; the production impl pools channels per SFE
    /// address.
    pub sfe: Arc<dyn SfeTransport>,
}

impl AppState {
    /// Create a new [`AppState`] from a configuration and transport.
    pub fn new(config: Config, sfe: Arc<dyn SfeTransport>) -> Self {
        Self {
            config: Arc::new(config),
            sfe,
        }
    }
}

impl Default for AppState {
    /// Creates an [`AppState`] over the demo configuration, suitable for
    /// tests.
    fn default() -> Self {
        let config = Config::default();
        let sfe = Arc::new(GrpcSfeTransport::new(&config));
        Self::new(config, sfe)
    }
}
