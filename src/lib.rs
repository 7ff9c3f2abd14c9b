pub mod constants;
pub mod error;
pub mod geo;
pub mod imagery;
pub mod logging;
pub mod overlay;
pub mod series;
pub mod server;
pub mod settings;
pub mod utils;

pub use error::{FetchError, ViewerError};
pub use geo::{BoundingBox, Coordinate};
pub use imagery::{EarthImageryClient, FetchOutcome, ImagerySource};
pub use overlay::{DownloadLink, OverlayView};
pub use series::{ComparisonReport, SeriesConfig, SeriesFrame, SeriesReport};
pub use settings::Settings;
