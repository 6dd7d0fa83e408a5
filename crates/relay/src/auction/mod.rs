//! Auction request construction and the per-request pipeline.
//!
//! # Module invariants
//!
//! - **No HTTP types.** This module must not import anything from
//!   `crate::server`; the pipeline is driven through plain arguments so it
//!   can be tested without a server harness.
//! - The ciphertext is opaque: nothing here reads or rewrites its bytes.

pub mod pipeline;
pub mod topology;

pub use pipeline::AuctionOutcome;
pub use topology::{AuctionTopology, ConfigError};
