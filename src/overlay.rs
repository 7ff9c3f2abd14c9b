use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::{DATE_FORMAT, MAP_ZOOM, MARKER_POPUP, OVERLAY_HALF_SPAN_DEGREES, OVERLAY_OPACITY};
use crate::geo::{BoundingBox, Coordinate};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub position: Coordinate,
    pub popup: String,
}

/// Translucent image layer drawn over the base map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOverlay {
    pub image_url: String,
    pub bounds: BoundingBox,
    pub opacity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MapSize {
    pub width: u32,
    pub height: u32,
}

/// Everything the page needs to draw one map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayView {
    pub center: Coordinate,
    pub zoom: u8,
    pub marker: MapMarker,
    pub overlay: Option<ImageOverlay>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<MapSize>,
}

impl OverlayView {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = Some(MapSize { width, height });
        self
    }

    pub fn has_overlay(&self) -> bool {
        self.overlay.is_some()
    }
}

/// Builds the map for `coordinate`, adding the image overlay when a
/// reference is available. Never fails: without imagery the view is the
/// base map and marker alone.
pub fn build(coordinate: Coordinate, imagery: Option<&str>) -> OverlayView {
    let overlay = imagery.map(|url| ImageOverlay {
        image_url: url.to_string(),
        bounds: coordinate.bounding_box(OVERLAY_HALF_SPAN_DEGREES),
        opacity: OVERLAY_OPACITY,
    });

    OverlayView {
        center: coordinate,
        zoom: MAP_ZOOM,
        marker: MapMarker {
            position: coordinate,
            popup: MARKER_POPUP.to_string(),
        },
        overlay,
        size: None,
    }
}

/// Link offering the raw upstream image for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadLink {
    pub href: String,
    pub filename: String,
    pub text: String,
}

impl DownloadLink {
    /// `location_label` is `None` for single-location runs, which keep the
    /// short `NDVI_<date>.png` name.
    pub fn new(href: &str, location_label: Option<&str>, date: NaiveDate) -> Self {
        let date = date.format(DATE_FORMAT);
        let (filename, text) = match location_label {
            Some(label) => (
                format!("NDVI_{}_{date}.png", label.replace(' ', "_")),
                format!("Click to download NDVI Image for {label}"),
            ),
            None => (
                format!("NDVI_{date}.png"),
                "Click to download NDVI Image".to_string(),
            ),
        };

        Self {
            href: href.to_string(),
            filename,
            text,
        }
    }
}
