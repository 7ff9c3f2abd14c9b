//! Date-series runs: step through a date range, fetch imagery for each
//! step and turn every result into a renderable frame.
//!
//! A run validates its range first, then walks a [`DateCursor`] until the
//! image budget is spent or the cursor passes the end date. Comparison runs
//! drive both locations from one cursor so their rows stay date-aligned
//! even when one side has no imagery.

use chrono::{Days, NaiveDate};
use serde::Serialize;
use tracing::info;

use crate::constants::{COMPARISON_MAP_SIZE, MAX_IMAGES, MAX_INTERVAL_DAYS, MIN_IMAGES, MIN_INTERVAL_DAYS};
use crate::error::{Result, ViewerError};
use crate::geo::Coordinate;
use crate::imagery::ImagerySource;
use crate::overlay::{self, DownloadLink, OverlayView};

/// Date range and stepping parameters shared by single and comparison runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesConfig {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub interval_days: u32,
    pub max_images: u32,
}

impl SeriesConfig {
    /// Checks the form bounds for interval and image count. The date range
    /// itself is checked when a run starts.
    pub fn new(start: NaiveDate, end: NaiveDate, interval_days: u32, max_images: u32) -> Result<Self> {
        if !(MIN_INTERVAL_DAYS..=MAX_INTERVAL_DAYS).contains(&interval_days) {
            return Err(ViewerError::IntervalOutOfRange(interval_days));
        }
        if !(MIN_IMAGES..=MAX_IMAGES).contains(&max_images) {
            return Err(ViewerError::MaxImagesOutOfRange(max_images));
        }
        Ok(Self {
            start,
            end,
            interval_days,
            max_images,
        })
    }

    pub fn validate_range(&self) -> Result<()> {
        if self.end <= self.start {
            return Err(ViewerError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// The dates a run will fetch, or the range error if there are none.
    pub fn dates(&self) -> Result<DateCursor> {
        self.validate_range()?;
        Ok(DateCursor {
            cursor: Some(self.start),
            end: self.end,
            step: u64::from(self.interval_days),
            shown: 0,
            max: self.max_images,
        })
    }
}

/// Walks from the start date in fixed steps, stopping after `max` dates
/// or once the cursor passes the end date.
#[derive(Debug, Clone)]
pub struct DateCursor {
    cursor: Option<NaiveDate>,
    end: NaiveDate,
    step: u64,
    shown: u32,
    max: u32,
}

impl Iterator for DateCursor {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        if self.shown >= self.max {
            return None;
        }
        let current = self.cursor.filter(|date| *date <= self.end)?;
        self.shown += 1;
        self.cursor = current.checked_add_days(Days::new(self.step));
        Some(current)
    }
}

/// One step of a run: the map for a date plus what to show around it.
#[derive(Debug, Clone, Serialize)]
pub struct SeriesFrame {
    pub date: NaiveDate,
    pub heading: String,
    pub view: OverlayView,
    pub download: Option<DownloadLink>,
    pub notice: Option<String>,
}

impl SeriesFrame {
    pub fn has_imagery(&self) -> bool {
        self.view.has_overlay()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeriesReport {
    pub location: Coordinate,
    pub config: SeriesConfig,
    pub frames: Vec<SeriesFrame>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRow {
    pub date: NaiveDate,
    pub first: SeriesFrame,
    pub second: SeriesFrame,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub first: Coordinate,
    pub second: Coordinate,
    pub config: SeriesConfig,
    pub rows: Vec<ComparisonRow>,
}

/// Fetches one date for `coordinate` and turns the outcome into a frame.
///
/// `label` names the location in the download filename.
pub(crate) async fn render_frame(
    source: &dyn ImagerySource,
    coordinate: Coordinate,
    label: Option<&str>,
    date: NaiveDate,
    heading: String,
) -> SeriesFrame {
    let outcome = source.fetch(coordinate, date).await;
    let url = outcome.url();

    SeriesFrame {
        date,
        heading,
        view: overlay::build(coordinate, url),
        download: url.map(|href| DownloadLink::new(href, label, date)),
        notice: outcome.notice(date),
    }
}

pub(crate) fn single_heading(date: NaiveDate) -> String {
    format!("NDVI Map for Date: {date}")
}

/// Runs the series for a single location.
pub async fn run_single(
    source: &dyn ImagerySource,
    coordinate: Coordinate,
    config: &SeriesConfig,
) -> Result<SeriesReport> {
    let dates = config.dates()?;
    info!(%coordinate, start = %config.start, end = %config.end, "starting NDVI series");

    let mut frames = Vec::new();
    for date in dates {
        frames.push(render_frame(source, coordinate, None, date, single_heading(date)).await);
    }

    let found = frames.iter().filter(|f| f.has_imagery()).count();
    info!(frames = frames.len(), found, "NDVI series finished");

    Ok(SeriesReport {
        location: coordinate,
        config: *config,
        frames,
    })
}

/// Runs the series for two locations, one step of each per date.
pub async fn run_comparison(
    source: &dyn ImagerySource,
    first: Coordinate,
    second: Coordinate,
    config: &SeriesConfig,
) -> Result<ComparisonReport> {
    let dates = config.dates()?;
    info!(%first, %second, start = %config.start, end = %config.end, "starting NDVI comparison");

    let mut rows = Vec::new();
    for date in dates {
        let first_frame = compared_frame(source, "Location 1", first, date).await;
        let second_frame = compared_frame(source, "Location 2", second, date).await;
        rows.push(ComparisonRow {
            date,
            first: first_frame,
            second: second_frame,
        });
    }

    info!(rows = rows.len(), "NDVI comparison finished");

    Ok(ComparisonReport {
        first,
        second,
        config: *config,
        rows,
    })
}

async fn compared_frame(
    source: &dyn ImagerySource,
    label: &str,
    coordinate: Coordinate,
    date: NaiveDate,
) -> SeriesFrame {
    let heading = format!("NDVI Map for {label} {coordinate} on {date}");
    let mut frame = render_frame(source, coordinate, Some(label), date, heading).await;
    frame.view = frame.view.with_size(COMPARISON_MAP_SIZE, COMPARISON_MAP_SIZE);
    frame
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn form_bounds_are_enforced() {
        let (start, end) = (ymd(2022, 1, 1), ymd(2023, 1, 1));

        assert_eq!(
            SeriesConfig::new(start, end, 15, 5),
            Err(ViewerError::IntervalOutOfRange(15))
        );
        assert_eq!(
            SeriesConfig::new(start, end, 61, 5),
            Err(ViewerError::IntervalOutOfRange(61))
        );
        assert_eq!(
            SeriesConfig::new(start, end, 30, 0),
            Err(ViewerError::MaxImagesOutOfRange(0))
        );
        assert_eq!(
            SeriesConfig::new(start, end, 30, 11),
            Err(ViewerError::MaxImagesOutOfRange(11))
        );
        assert!(SeriesConfig::new(start, end, 60, 10).is_ok());
    }

    #[test]
    fn end_before_or_on_start_is_invalid() {
        let backwards = SeriesConfig::new(ymd(2023, 6, 1), ymd(2023, 5, 1), 30, 5).unwrap();
        assert_eq!(
            backwards.dates().unwrap_err(),
            ViewerError::InvalidDateRange {
                start: ymd(2023, 6, 1),
                end: ymd(2023, 5, 1),
            }
        );

        let same_day = SeriesConfig::new(ymd(2023, 6, 1), ymd(2023, 6, 1), 30, 5).unwrap();
        assert!(same_day.dates().is_err());
    }

    #[test]
    fn cursor_stops_when_it_passes_the_end_date() {
        // 59 days, so the third step (2022-03-02) is past the end
        let config = SeriesConfig::new(ymd(2022, 1, 1), ymd(2022, 3, 1), 30, 5).unwrap();
        let dates: Vec<_> = config.dates().unwrap().collect();

        assert_eq!(dates, vec![ymd(2022, 1, 1), ymd(2022, 1, 31)]);
    }

    #[test]
    fn cursor_stops_at_the_image_budget() {
        let config = SeriesConfig::new(ymd(2022, 1, 1), ymd(2023, 1, 1), 30, 3).unwrap();
        let dates: Vec<_> = config.dates().unwrap().collect();

        assert_eq!(dates, vec![ymd(2022, 1, 1), ymd(2022, 1, 31), ymd(2022, 3, 2)]);
    }

    #[test]
    fn end_date_itself_is_included() {
        let config = SeriesConfig::new(ymd(2022, 1, 1), ymd(2022, 3, 2), 30, 10).unwrap();
        let dates: Vec<_> = config.dates().unwrap().collect();

        assert_eq!(dates.last(), Some(&ymd(2022, 3, 2)));
        assert_eq!(dates.len(), 3);
    }

    #[test]
    fn date_count_matches_closed_form() {
        let start = ymd(2021, 3, 15);
        for span in [1_u32, 29, 30, 59, 60, 61, 200, 365, 700] {
            let end = start + Days::new(u64::from(span));
            for interval in [30, 37, 45, 60] {
                for max in [1, 2, 5, 10] {
                    let config = SeriesConfig::new(start, end, interval, max).unwrap();
                    let dates: Vec<_> = config.dates().unwrap().collect();
                    let expected = max.min(span / interval + 1) as usize;

                    assert_eq!(dates.len(), expected, "span {span}, interval {interval}, max {max}");
                    assert!(dates.iter().all(|d| *d <= end));
                    for pair in dates.windows(2) {
                        assert_eq!((pair[1] - pair[0]).num_days(), i64::from(interval));
                    }
                }
            }
        }
    }
}
