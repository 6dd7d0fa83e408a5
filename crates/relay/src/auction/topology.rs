//! Per-request auction topology and SelectAd request construction.

use std::collections::HashMap;

use thiserror::Error;

use crate::config::Config;
use crate::sfe::proto::{AuctionConfig, ClientType, PerBuyerConfig, SelectAdRequest};

/// Structurally invalid auction topology.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The buyer list resolved to no entries.
    #[error("buyer list is empty")]
    EmptyBuyerList,

    /// The configured client type is not a recognised platform value.
    #[error("unrecognised client type: {0:?}")]
    UnknownClientType(String),

    /// A per-buyer signals key does not appear in the buyer list.
    #[error("per-buyer signals key {0:?} is not a configured buyer")]
    UnknownPerBuyerKey(String),

    /// The per-buyer signals override could not be parsed.
    #[error("per-buyer signals are malformed: {0}")]
    MalformedPerBuyerSignals(String),
}

/// Seller/buyer topology of a single auction.
///
/// Built fresh for every request from the static configuration plus the
/// request's component-auction flag, and dropped once the SelectAd request
/// has been constructed.
#[derive(Debug, Clone)]
pub struct AuctionTopology {
    /// Top-level seller origin; equals [`AuctionTopology::seller`] in
    /// single-seller mode.
    pub top_level_seller: String,
    /// Seller origin running this auction.
    pub seller: String,
    /// Participating buyer origins, in auction order.
    pub buyers: Vec<String>,
    /// Signals per buyer origin; every key must appear in `buyers`.
    pub per_buyer_signals: HashMap<String, String>,
    /// Opaque auction signals.
    pub auction_signals: String,
    /// Opaque seller signals.
    pub seller_signals: String,
    /// Platform the encrypted payload was produced on.
    pub client_type: ClientType,
}

impl AuctionTopology {
    /// Assemble the topology for one request.
    ///
    /// The component-auction flag is the only behavioural fork: when set,
    /// the top-level seller is the configured distinct origin; otherwise the
    /// auction is single-seller and `top_level_seller == seller`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configured client type is
    /// unrecognised or the per-buyer signals override is malformed.
    pub fn from_config(cfg: &Config, is_component_auction: bool) -> Result<Self, ConfigError> {
        let client_type = ClientType::from_str_name(&cfg.client_type)
            .filter(|ty| *ty != ClientType::Unknown)
            .ok_or_else(|| ConfigError::UnknownClientType(cfg.client_type.clone()))?;

        let per_buyer_signals = cfg
            .per_buyer_signals_map()
            .map_err(|e| ConfigError::MalformedPerBuyerSignals(e.to_string()))?;

        let top_level_seller = if is_component_auction {
            cfg.top_level_seller_origin.clone()
        } else {
            cfg.seller_origin.clone()
        };

        Ok(Self {
            top_level_seller,
            seller: cfg.seller_origin.clone(),
            buyers: cfg.buyers(),
            per_buyer_signals,
            auction_signals: cfg.auction_signals.clone(),
            seller_signals: cfg.seller_signals.clone(),
            client_type,
        })
    }

    /// Check the topology invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBuyerList`] if no buyers participate and
    /// [`ConfigError::UnknownPerBuyerKey`] if a per-buyer signals key is not
    /// a participating buyer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.buyers.is_empty() {
            return Err(ConfigError::EmptyBuyerList);
        }
        for key in self.per_buyer_signals.keys() {
            if !self.buyers.contains(key) {
                return Err(ConfigError::UnknownPerBuyerKey(key.clone()));
            }
        }
        Ok(())
    }

    /// Validate the topology and produce the SelectAd request for the given
    /// decoded ciphertext.
    ///
    /// The output field names and nesting mirror the external service
    /// schema; see [`crate::sfe::proto`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if an invariant does not hold.
    pub fn into_select_ad_request(
        self,
        ciphertext: Vec<u8>,
    ) -> Result<SelectAdRequest, ConfigError> {
        self.validate()?;

        let per_buyer_config = self
            .per_buyer_signals
            .into_iter()
            .map(|(buyer, buyer_signals)| (buyer, PerBuyerConfig { buyer_signals }))
            .collect();

        Ok(SelectAdRequest {
            auction_config: Some(AuctionConfig {
                top_level_seller: self.top_level_seller,
                seller: self.seller,
                auction_signals: self.auction_signals,
                seller_signals: self.seller_signals,
                buyer_list: self.buyers,
                per_buyer_config,
            }),
            client_type: self.client_type as i32,
            protected_auction_ciphertext: ciphertext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_seller_mode_uses_seller_as_top_level() {
        let topology = AuctionTopology::from_config(&Config::default(), false).unwrap();
        assert_eq!(topology.top_level_seller, topology.seller);
    }

    #[test]
    fn component_auction_uses_distinct_top_level_seller() {
        let topology = AuctionTopology::from_config(&Config::default(), true).unwrap();
        assert_ne!(topology.top_level_seller, topology.seller);
        assert_eq!(topology.top_level_seller, "https://localhost:6001");
        assert_eq!(topology.seller, "https://localhost:6003");
    }

    #[test]
    fn select_ad_request_mirrors_the_wire_schema() {
        let topology = AuctionTopology::from_config(&Config::default(), false).unwrap();
        let request = topology.into_select_ad_request(vec![0x41, 0x42]).unwrap();

        let auction_config = request.auction_config.unwrap();
        assert_eq!(auction_config.seller, "https://localhost:6003");
        assert_eq!(
            auction_config.buyer_list,
            vec!["https://localhost:5003", "https://localhost:5004"]
        );
        assert!(auction_config
            .per_buyer_config
            .contains_key("https://localhost:5004"));
        assert_eq!(request.client_type, ClientType::Browser as i32);
        assert_eq!(request.protected_auction_ciphertext, vec![0x41, 0x42]);
    }

    #[test]
    fn empty_buyer_list_is_rejected() {
        let mut topology = AuctionTopology::from_config(&Config::default(), false).unwrap();
        topology.buyers.clear();
        topology.per_buyer_signals.clear();
        assert!(matches!(
            topology.validate(),
            Err(ConfigError::EmptyBuyerList)
        ));
    }

    #[test]
    fn unknown_client_type_is_rejected() {
        let cfg = Config {
            client_type: "CLIENT_TYPE_TOASTER".into(),
            ..Config::default()
        };
        assert!(matches!(
            AuctionTopology::from_config(&cfg, false),
            Err(ConfigError::UnknownClientType(_))
        ));
    }

    #[test]
    fn unknown_sentinel_client_type_is_rejected() {
        let cfg = Config {
            client_type: "CLIENT_TYPE_UNKNOWN".into(),
            ..Config::default()
        };
        assert!(AuctionTopology::from_config(&cfg, false).is_err());
    }

    #[test]
    fn android_client_type_is_accepted() {
        let cfg = Config {
            client_type: "CLIENT_TYPE_ANDROID".into(),
            ..Config::default()
        };
        let topology = AuctionTopology::from_config(&cfg, false).unwrap();
        assert_eq!(topology.client_type, ClientType::Android);
    }

    #[test]
    fn per_buyer_key_outside_buyer_list_is_rejected() {
        let mut topology = AuctionTopology::from_config(&Config::default(), false).unwrap();
        topology
            .per_buyer_signals
            .insert("https://unlisted:1".into(), "{}".into());
        assert!(matches!(
            topology.validate(),
            Err(ConfigError::UnknownPerBuyerKey(_))
        ));
    }
}
