//! `relay` — ad-auction relay binary entry point.
//!
//! Startup sequence:
//! 1. Load and validate [`Config`] from environment variables.
//! 2. Initialise structured JSON logging.
//! 3. Build the pooled SFE transport.
//! 4. Build the Axum router and start the server with connection info so
//!    handlers can read the caller IP.

mod auction;
mod codec;
mod config;
mod server;
mod sfe;
mod telemetry;
mod verify;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use config::Config;
use server::state::AppState;
use sfe::GrpcSfeTransport;

#[tokio::main]
async fn main() -> Result<()> {
    // -----------------------------------------------------------------------
    // 1. Configuration
    // -----------------------------------------------------------------------
    let cfg = Config::from_env().map_err(|e| {
        // Telemetry is not yet up; write to stderr directly.
        eprintln!("ERROR: configuration invalid: {e}");
        e
    })?;

    // -----------------------------------------------------------------------
    // 2. Telemetry
    // -----------------------------------------------------------------------
    telemetry::init(&cfg.log_level)?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        listen_port = cfg.listen_port,
        seller = %cfg.seller_origin,
        "ad-auction relay starting"
    );

    // -----------------------------------------------------------------------
    // 3. SFE transport
    // -----------------------------------------------------------------------
    let sfe = Arc::new(GrpcSfeTransport::new(&cfg));

    // -----------------------------------------------------------------------
    // 4. HTTP server
    // -----------------------------------------------------------------------
    let addr: SocketAddr = ([0, 0, 0, 0], cfg.listen_port).into();
    let state = AppState::new(cfg, sfe);
    let router = server::router::build(state);

    info!(addr = %addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
