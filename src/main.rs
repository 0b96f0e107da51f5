use std::sync::Arc;

use tracing::{error, info, warn};

use hue_conductor::api;
use hue_conductor::settings;
use hue_conductor::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hue_conductor=info".into()),
        )
        .init();

    let config_dir = settings::default_config_dir();
    let loaded = settings::load_settings(&config_dir)
        .unwrap_or_default()
        .with_env_overrides();

    let state = match AppState::new(loaded) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            error!(error = %e, "failed to initialize");
            std::process::exit(1);
        }
    };

    info!(bridge = %state.settings.bridge_ip, "hue-conductor starting");

    // The engine can come up before the bridge is reachable; mutations
    // will fail until it is.
    match state.bridge.test_connection().await {
        Ok(()) => info!("bridge connection verified"),
        Err(e) => warn!(error = %e, "bridge not reachable yet"),
    }

    let port = match api::start_api_server(Arc::clone(&state), state.settings.api_port).await {
        Ok(port) => port,
        Err(e) => {
            error!(error = %e, "failed to start API server");
            std::process::exit(1);
        }
    };
    info!("API server listening on http://127.0.0.1:{port}");

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    state.shutdown().await;
}
