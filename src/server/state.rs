use std::sync::Arc;

use crate::imagery::{EarthImageryClient, ImagerySource};
use crate::settings::Settings;

// Application state shared by all handlers; read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub imagery: Arc<dyn ImagerySource>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let imagery = Arc::new(EarthImageryClient::from_settings(&settings));
        Self::with_source(settings, imagery)
    }

    pub fn with_source(settings: Settings, imagery: Arc<dyn ImagerySource>) -> Self {
        Self {
            settings: Arc::new(settings),
            imagery,
        }
    }
}
