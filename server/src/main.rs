use axum::routing::get;
use folio_server::auth::LogNotifier;
use folio_server::config::Config;
use folio_server::{
    AppState, ExpiryMonitor, FileStore, KeyValueStore, MemoryStore, SessionManager, build_router,
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Endpoint to expose metrics in Prometheus format
async fn prometheus_metrics(handle: PrometheusHandle) -> String {
    handle.render()
}

/// Resolve on Ctrl+C so the server can drain and the monitor can stop
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=debug,folio_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Initialize Prometheus metrics recorder (must be done before any metrics are recorded)
    let prometheus_handle = PrometheusBuilder::new().install_recorder()?;

    // Load configuration from environment
    let config = Config::from_env();
    info!(
        "Loaded configuration: host={}, port={}, session_duration={:?}",
        config.host, config.port, config.session.duration
    );

    let store: Arc<dyn KeyValueStore> = match config.storage.path {
        Some(ref path) => {
            info!("Persisting users and session to {:?}", path);
            Arc::new(FileStore::new(path))
        }
        None => {
            warn!("FOLIO_STORE_PATH not set - users and session are kept in memory only");
            Arc::new(MemoryStore::new())
        }
    };

    let auth_config = config.auth();
    let check_interval = auth_config.check_interval;
    let session_manager = Arc::new(SessionManager::with_config(store, auth_config));

    // Log the session restored from storage, expiring it if it is stale
    match session_manager.current_user().await {
        Some(user) => info!("Restored session for {}", user),
        None => info!("No active session"),
    }

    // Periodic expiry check
    let mut monitor =
        ExpiryMonitor::start(session_manager.clone(), check_interval, Arc::new(LogNotifier));

    let app_state = AppState::with_session_manager(session_manager);
    let app = build_router(app_state).route(
        "/metrics/prometheus",
        get(move || prometheus_metrics(prometheus_handle.clone())),
    );

    // Start the server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Folio server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    monitor.stop();
    info!("Folio server stopped");
    Ok(())
}
