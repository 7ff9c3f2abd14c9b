use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use thiserror::Error;

use crate::constants::{MAX_IMAGES, MAX_INTERVAL_DAYS, MIN_IMAGES, MIN_INTERVAL_DAYS};

/// Why an imagery lookup produced nothing usable.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Holds the whole cause chain, since reqwest's own message is often
    /// just "error sending request".
    #[error("request failed: {0}")]
    Transport(String),

    #[error("response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        // reqwest errors embed the URL, and the URL carries the key
        let e = e.without_url();
        let mut message = e.to_string();
        let mut source = std::error::Error::source(&e);
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        FetchError::Transport(message)
    }
}

/// Rejections of user input, raised before any imagery is fetched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewerError {
    #[error("Invalid date range: end date {end} must be after start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("Interval of {0} days is outside [{min}, {max}]", min = MIN_INTERVAL_DAYS, max = MAX_INTERVAL_DAYS)]
    IntervalOutOfRange(u32),

    #[error("Maximum image count {0} is outside [{min}, {max}]", min = MIN_IMAGES, max = MAX_IMAGES)]
    MaxImagesOutOfRange(u32),

    /// The request body or query string could not be decoded.
    #[error("{0}")]
    BadRequest(String),
}

impl From<JsonRejection> for ViewerError {
    fn from(rejection: JsonRejection) -> Self {
        ViewerError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ViewerError {
    fn from(rejection: QueryRejection) -> Self {
        ViewerError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ViewerError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "status": "error",
            "message": self.to_string(),
        });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ViewerError>;
