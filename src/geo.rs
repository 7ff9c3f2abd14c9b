use serde::Serialize;
use std::fmt;

use crate::error::{Result, ViewerError};

/// A point on the globe in decimal degrees.
///
/// Only constructed through [`Coordinate::new`], so a value always lies
/// within latitude [-90, 90] and longitude [-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(ViewerError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lon) {
            return Err(ViewerError::LongitudeOutOfRange(lon));
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Square box extending `half_span` degrees from this point on both axes.
    pub fn bounding_box(&self, half_span: f64) -> BoundingBox {
        BoundingBox {
            south: self.lat - half_span,
            west: self.lon - half_span,
            north: self.lat + half_span,
            east: self.lon + half_span,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub fn contains(&self, point: &Coordinate) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lon >= self.west
            && point.lon <= self.east
    }
}
