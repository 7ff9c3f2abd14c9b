// Port configuration
pub const DEFAULT_PORT: u16 = 3001;
pub const ALTERNATIVE_PORT: u16 = 3002;

// Upstream imagery API
pub const DEFAULT_API_ENDPOINT: &str = "https://api.nasa.gov/planetary/earth/assets";
pub const DEMO_API_KEY: &str = "DEMO_KEY"; // public key, heavily rate-limited
pub const IMAGERY_DIM_DEGREES: f64 = 0.1;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// Map rendering
pub const MAP_ZOOM: u8 = 12;
pub const OVERLAY_HALF_SPAN_DEGREES: f64 = 0.05;
pub const OVERLAY_OPACITY: f64 = 0.6;
pub const MARKER_POPUP: &str = "NDVI Location";
pub const COMPARISON_MAP_SIZE: u32 = 300;

// Form bounds
pub const MIN_INTERVAL_DAYS: u32 = 30;
pub const MAX_INTERVAL_DAYS: u32 = 60;
pub const MIN_IMAGES: u32 = 1;
pub const MAX_IMAGES: u32 = 10;

// Form defaults
pub const DEFAULT_INTERVAL_DAYS: u32 = MIN_INTERVAL_DAYS;
pub const DEFAULT_MAX_IMAGES: u32 = 5;
pub const DEFAULT_LOCATION: (f64, f64) = (50.0, -90.0);
pub const DEFAULT_SECOND_LOCATION: (f64, f64) = (49.0, -80.0);
pub const DEFAULT_START_DATE: &str = "2022-01-01";
pub const DEFAULT_END_DATE: &str = "2023-01-01";
