//! Call-scoped metadata forwarded with every SelectAd RPC.
//!
//! Exactly three caller attributes cross to the backend: the
//! `Accept-Language` header, the `User-Agent` header, and the connection
//! peer IP. The keys carry an `x-` prefix so they cannot collide with
//! protocol-reserved gRPC metadata names. Nothing else from the inbound
//! request is forwarded.

use std::net::IpAddr;

use axum::http::{header, HeaderMap, HeaderValue};
use tonic::metadata::{MetadataMap, MetadataValue};

/// Metadata key carrying the caller's `Accept-Language` header.
pub const ACCEPT_LANGUAGE_KEY: &str = "x-accept-language";

/// Metadata key carrying the caller's `User-Agent` header.
pub const USER_AGENT_KEY: &str = "x-user-agent";

/// Metadata key carrying the caller's connection IP address.
pub const CLIENT_IP_KEY: &str = "x-bna-client-ip";

/// Build the outbound call metadata from an inbound request.
///
/// Headers that are missing or not valid ASCII are left absent; the caller
/// IP is always present.
pub fn forwarded_metadata(headers: &HeaderMap, client_ip: IpAddr) -> MetadataMap {
    let mut metadata = MetadataMap::new();
    insert_header(&mut metadata, ACCEPT_LANGUAGE_KEY, headers.get(header::ACCEPT_LANGUAGE));
    insert_header(&mut metadata, USER_AGENT_KEY, headers.get(header::USER_AGENT));
    if let Ok(value) = MetadataValue::try_from(client_ip.to_string()) {
        metadata.insert(CLIENT_IP_KEY, value);
    }
    metadata
}

fn insert_header(metadata: &mut MetadataMap, key: &'static str, value: Option<&HeaderValue>) {
    let Some(text) = value.and_then(|v| v.to_str().ok()) else {
        return;
    };
    if let Ok(value) = MetadataValue::try_from(text) {
        metadata.insert(key, value);
    }
}
