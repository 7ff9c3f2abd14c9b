#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use ndvi_viewer::{Coordinate, FetchError, FetchOutcome, ImagerySource};
use std::sync::Mutex;

type Responder = Box<dyn Fn(Coordinate, NaiveDate) -> FetchOutcome + Send + Sync>;

/// Imagery source that records every lookup and answers from a closure.
pub struct ScriptedSource {
    calls: Mutex<Vec<(Coordinate, NaiveDate)>>,
    respond: Responder,
}

impl ScriptedSource {
    pub fn new(respond: impl Fn(Coordinate, NaiveDate) -> FetchOutcome + Send + Sync + 'static) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        }
    }

    /// Every lookup finds an image named after its coordinate and date.
    pub fn always_found() -> Self {
        Self::new(|coordinate, date| {
            FetchOutcome::Found(format!(
                "https://img.example/{}_{}_{date}.png",
                coordinate.lat(),
                coordinate.lon()
            ))
        })
    }

    pub fn always_missing() -> Self {
        Self::new(|_, _| FetchOutcome::Missing {
            upstream_message: None,
        })
    }

    pub fn calls(&self) -> Vec<(Coordinate, NaiveDate)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_dates(&self) -> Vec<NaiveDate> {
        self.calls().into_iter().map(|(_, date)| date).collect()
    }
}

#[async_trait]
impl ImagerySource for ScriptedSource {
    async fn fetch(&self, coordinate: Coordinate, date: NaiveDate) -> FetchOutcome {
        self.calls.lock().unwrap().push((coordinate, date));
        (self.respond)(coordinate, date)
    }
}

pub fn parse_failure() -> FetchOutcome {
    let err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
    FetchOutcome::Failed(FetchError::Parse(err))
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn coordinate(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}
