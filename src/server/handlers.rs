use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
};
use chrono::NaiveDate;
use rust_embed::RustEmbed;
use serde::Deserialize;
use tracing::info;

use crate::constants::{
    DEFAULT_END_DATE, DEFAULT_INTERVAL_DAYS, DEFAULT_LOCATION, DEFAULT_MAX_IMAGES,
    DEFAULT_SECOND_LOCATION, DEFAULT_START_DATE, MAX_IMAGES, MAX_INTERVAL_DAYS, MIN_IMAGES,
    MIN_INTERVAL_DAYS,
};
use crate::error::ViewerError;
use crate::geo::Coordinate;
use crate::series::{self, ComparisonReport, SeriesConfig, SeriesFrame, SeriesReport};

use super::state::AppState;

#[derive(RustEmbed)]
#[folder = "frontend/"]
struct Asset;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LocationInput {
    pub lat: f64,
    pub lon: f64,
}

impl LocationInput {
    fn coordinate(self) -> Result<Coordinate, ViewerError> {
        Coordinate::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RangeInput {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval_days: u32,
    pub max_images: u32,
}

impl RangeInput {
    fn config(self) -> Result<SeriesConfig, ViewerError> {
        SeriesConfig::new(self.start, self.end, self.interval_days, self.max_images)
    }
}

#[derive(Debug, Deserialize)]
pub struct SeriesRequest {
    #[serde(flatten)]
    pub location: LocationInput,
    #[serde(flatten)]
    pub range: RangeInput,
}

#[derive(Debug, Deserialize)]
pub struct ComparisonRequest {
    pub first: LocationInput,
    pub second: LocationInput,
    #[serde(flatten)]
    pub range: RangeInput,
}

#[derive(Debug, Deserialize)]
pub struct ImageryQuery {
    pub lat: f64,
    pub lon: f64,
    pub date: NaiveDate,
}

fn embedded_asset(path: &str, content_type: &'static str) -> Response {
    match Asset::get(path) {
        Some(file) => ([(header::CONTENT_TYPE, content_type)], file.data.into_owned()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub async fn index_html() -> Response {
    embedded_asset("index.html", "text/html; charset=utf-8")
}

pub async fn style_css() -> Response {
    embedded_asset("style.css", "text/css")
}

pub async fn script_js() -> Response {
    embedded_asset("script.js", "application/javascript")
}

// Form defaults and bounds; the API key never leaves the server
pub async fn get_settings(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "location": { "lat": DEFAULT_LOCATION.0, "lon": DEFAULT_LOCATION.1 },
        "second_location": { "lat": DEFAULT_SECOND_LOCATION.0, "lon": DEFAULT_SECOND_LOCATION.1 },
        "start": DEFAULT_START_DATE,
        "end": DEFAULT_END_DATE,
        "interval_days": {
            "min": MIN_INTERVAL_DAYS,
            "max": MAX_INTERVAL_DAYS,
            "default": DEFAULT_INTERVAL_DAYS,
        },
        "max_images": {
            "min": MIN_IMAGES,
            "max": MAX_IMAGES,
            "default": DEFAULT_MAX_IMAGES,
        },
        "api_endpoint": state.settings.api_endpoint,
        "demo_key": state.settings.uses_demo_key(),
    }))
}

// Single lookup for one coordinate and date
pub async fn get_imagery(
    State(state): State<AppState>,
    query: Result<Query<ImageryQuery>, QueryRejection>,
) -> Result<Json<SeriesFrame>, ViewerError> {
    let Query(query) = query?;
    let coordinate = Coordinate::new(query.lat, query.lon)?;
    let heading = series::single_heading(query.date);

    let frame = series::render_frame(&*state.imagery, coordinate, None, query.date, heading).await;
    Ok(Json(frame))
}

// "Generate NDVI Time Series" button
pub async fn generate_series(
    State(state): State<AppState>,
    request: Result<Json<SeriesRequest>, JsonRejection>,
) -> Result<Json<SeriesReport>, ViewerError> {
    let Json(request) = request?;
    let coordinate = request.location.coordinate()?;
    let config = request.range.config()?;
    info!(%coordinate, "series requested");

    let report = series::run_single(&*state.imagery, coordinate, &config).await?;
    Ok(Json(report))
}

// "Generate NDVI Time Series for Comparison" button
pub async fn generate_comparison(
    State(state): State<AppState>,
    request: Result<Json<ComparisonRequest>, JsonRejection>,
) -> Result<Json<ComparisonReport>, ViewerError> {
    let Json(request) = request?;
    let first = request.first.coordinate()?;
    let second = request.second.coordinate()?;
    let config = request.range.config()?;
    info!(%first, %second, "comparison requested");

    let report = series::run_comparison(&*state.imagery, first, second, &config).await?;
    Ok(Json(report))
}
