use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use medchain_core::config::seed_demo_data_from_env_value;
use medchain_core::constants::{DEFAULT_FILE_FORMAT, DEFAULT_FILE_URL, SEED_DEMO_DATA_ENV};
use medchain_core::{CoreConfig, RecordStore};

/// Main entry point for the MedChain application
///
/// Builds the in-memory record store and serves the REST API with Swagger UI.
///
/// # Environment Variables
/// - `MEDCHAIN_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `MEDCHAIN_SEED_DEMO_DATA`: load the demo dataset at startup (default: true)
/// - `RUST_LOG`: tracing filter directives
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medchain=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("MEDCHAIN_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let seed_demo_data = seed_demo_data_from_env_value(std::env::var(SEED_DEMO_DATA_ENV).ok())?;

    let cfg = CoreConfig::new(seed_demo_data, DEFAULT_FILE_FORMAT, DEFAULT_FILE_URL)?;
    let store = RecordStore::new(Arc::new(cfg))?;

    tracing::info!("++ Starting MedChain REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(AppState::new(store))).await?;

    Ok(())
}
