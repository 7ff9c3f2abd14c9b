use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

pub mod handlers;
pub mod state;

pub use self::state::AppState;
use crate::constants::ALTERNATIVE_PORT;
use handlers::{
    generate_comparison, generate_series, get_imagery, get_settings, index_html, script_js,
    style_css,
};

// Create the main application router
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_html))
        .route("/style.css", get(style_css))
        .route("/script.js", get(script_js))
        .route("/api/settings", get(get_settings))
        .route("/api/imagery", get(get_imagery))
        .route("/api/series", post(generate_series))
        .route("/api/compare", post(generate_comparison))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(state: AppState) -> Result<()> {
    let port = state.settings.port;
    let listener = bind_listener(port).await?;
    let addr = listener.local_addr()?;
    let app = create_app(state);

    info!("🌐 Server running at http://{}", addr);
    info!("   🗺️  API endpoints:");
    info!("      - GET  /api/imagery?lat=&lon=&date= - one imagery lookup");
    info!("      - POST /api/series - NDVI time series for one location");
    info!("      - POST /api/compare - NDVI time series for two locations");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;
    Ok(())
}

async fn bind_listener(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    match TcpListener::bind(addr).await {
        Ok(listener) => Ok(listener),
        Err(e) if port != ALTERNATIVE_PORT => {
            warn!("⚠️  Port {} unavailable ({}), trying {}", port, e, ALTERNATIVE_PORT);
            let fallback = SocketAddr::from(([127, 0, 0, 1], ALTERNATIVE_PORT));
            TcpListener::bind(fallback)
                .await
                .with_context(|| format!("Failed to bind ports {} and {}", port, ALTERNATIVE_PORT))
        }
        Err(e) => Err(e).with_context(|| format!("Failed to bind port {}", port)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl-C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("🛑 Shutting down");
}
