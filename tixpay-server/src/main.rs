//! Tixpay Server
//!
//! Demo storefront for a crypto payment widget: an event catalog, per-session
//! ticket carts, a two-step checkout and the widget configuration playground.

mod api;
mod config;
mod server;
mod session;
mod shutdown;
mod state;

use clap::Parser;
use config::ConfigLoader;
use server::{build_router, run_server};
use session::SessionRegistry;
use shutdown::{spawn_config_reload_handler, spawn_session_sweeper};
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Tixpay - ticket checkout demo for a crypto payment widget
#[derive(Parser, Debug)]
#[command(name = "tixpay-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, env = "TIXPAY_CONFIG", default_value = "./tixpay.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:3000)
    #[arg(short, long, env = "TIXPAY_LISTEN")]
    listen: Option<SocketAddr>,

    /// Override the directory cart snapshots are written to
    #[arg(long, env = "TIXPAY_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting tixpay-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = Arc::new(ConfigLoader::new(&args.config, args.listen, args.data_dir));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!(error = %e, "Failed to load configuration");
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    tracing::info!(
        path = %args.config.display(),
        events = loaded_config.runtime.catalog.len(),
        "Configuration loaded"
    );
    tracing::info!(
        idle_secs = loaded_config.storage.session_idle.as_secs(),
        "Idle sessions are evicted"
    );
    match &loaded_config.storage.data_dir {
        Some(dir) => tracing::info!(data_dir = %dir.display(), "Persisting carts to disk"),
        None => tracing::info!("No data directory configured, carts are kept in memory"),
    }

    // Create application state
    let sessions = SessionRegistry::new(
        loaded_config.storage.data_dir,
        loaded_config.storage.session_idle,
    );
    let state = AppState::new(loaded_config.runtime, sessions);

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(state.clone(), config_loader);

    // Spawn the idle session sweeper
    let sweeper_notify = spawn_session_sweeper(state.sessions.clone());

    // Build the router
    let sessions = state.sessions.clone();
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the background tasks to stop
    shutdown_notify.notify_one();
    sweeper_notify.notify_one();
    tracing::info!(sessions = sessions.len().await, "Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
