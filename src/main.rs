use anyhow::{Context, Result};
use tracing::{info, warn};

use ndvi_viewer::logging::init_logger;
use ndvi_viewer::server::{start_server, AppState};
use ndvi_viewer::settings::{Settings, API_KEY_ENV};

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    info!("🌍 NDVI Viewer v{} starting...", env!("CARGO_PKG_VERSION"));

    let config_path = Settings::config_path();
    let mut settings = Settings::load_from(&config_path)
        .with_context(|| "Failed to load settings")?;

    // First start: leave an editable file behind, before env overrides are applied
    if !config_path.exists() {
        match settings.save_to(&config_path) {
            Ok(()) => info!("📝 Wrote default settings to {}", config_path.display()),
            Err(e) => warn!("Could not write default settings: {:#}", e),
        }
    }
    settings.apply_env();

    if settings.uses_demo_key() {
        warn!("⚠️  No API key configured - using the rate-limited DEMO_KEY");
        warn!("   Set {} or api_key in {}", API_KEY_ENV, config_path.display());
    }
    info!("🛰️  Imagery endpoint: {}", settings.api_endpoint);

    let state = AppState::new(settings);
    start_server(state).await?;

    Ok(())
}
