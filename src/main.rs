use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use surgery_core::{CoreConfig, SurgeryStore, data_dir_from_env_value};

/// Main entry point for the surgery manager server
///
/// Resolves configuration once, opens the surgery store and serves the REST API.
///
/// # Environment Variables
/// - `SURGERY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `SURGERY_DATA_DIR`: Directory for surgery storage (default: "surgery_data"; created if missing)
/// - `RUST_LOG`: log filter (default directive: "surgery=info")
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, the store or the listener fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("surgery_run=info".parse()?)
                .add_directive("surgery_core=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tower_http=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr: SocketAddr = std::env::var("SURGERY_REST_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()
        .context("SURGERY_REST_ADDR must be a socket address")?;

    let data_dir = data_dir_from_env_value(std::env::var("SURGERY_DATA_DIR").ok());
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;
    let cfg = Arc::new(CoreConfig::new(data_dir)?);

    let store = SurgeryStore::open(cfg.clone())?;
    tracing::info!("++ Surgery data in {}", cfg.data_dir().display());

    let app = api_rest::router(AppState { store });

    tracing::info!("++ Starting surgery REST on {}", rest_addr);
    let listener = tokio::net::TcpListener::bind(rest_addr)
        .await
        .with_context(|| format!("binding {rest_addr}"))?;
    axum::serve(listener, app).await?;

    Ok(())
}
