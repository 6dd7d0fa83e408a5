//! Seller front-end (SFE) integration: wire schema, call metadata, and the
//! pooled gRPC transport.
//!
//! # Responsibilities
//! - Mirror the external `SelectAd` schema exactly (`proto`).
//! - Forward the three designated caller attributes as call metadata
//!   (`metadata`).
//! - Maintain one multiplexed channel per backend address and invoke the
//!   single remote operation (`client`).

pub mod client;
pub mod metadata;
pub mod proto;

pub use client::{GrpcSfeTransport, RelayError, SfeTransport};
