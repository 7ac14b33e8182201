//! # cadenced
//!
//! Composition root that wires the adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize `tracing` with the configured filter
//! - Construct the virtual device and the step executor around it
//! - Spawn the scheduler and build the axum router on top of it
//! - Bind to a TCP port and serve
//! - Handle graceful shutdown (Ctrl-C)
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer, no domain logic belongs here.

mod config;

use std::sync::Arc;

use cadence_adapter_http_axum::state::AppState;
use cadence_adapter_virtual::VirtualDevice;
use cadence_app::{DeviceSteps, Scheduler, TokioTimer};
use tracing_subscriber::EnvFilter;

use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&config.logging.filter).unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Device
    let device = Arc::new(VirtualDevice::new(
        config.device.screen_width,
        config.device.screen_height,
    ));
    let steps = DeviceSteps::new(
        Arc::clone(&device),
        Arc::clone(&device),
        Arc::clone(&device),
        device,
    );

    // Scheduler
    let scheduler = Scheduler::spawn(steps, TokioTimer);

    // HTTP
    let app = cadence_adapter_http_axum::router::build(AppState::new(scheduler.clone()));

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(%bind_addr, "cadenced listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Cancel pending iterations before the runtime goes away.
    scheduler.clear().await?;
    tracing::info!("cadenced stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "unable to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
