// Per-zone and per-camera view models
use crate::domain::boundaries::fill_boundaries;
use crate::domain::downsample::downsample;
use crate::domain::error::PipelineError;
use crate::domain::reading::{Reading, ViewPoint, Zone};
use crate::domain::sanitizer::sanitize;
use crate::domain::settings::PipelineSettings;
use crate::domain::status::{classify, Status};
use crate::domain::window::DisplayWindow;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything a chart card or summary table row needs for one zone. Rebuilt
/// from scratch on every fetch; never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneSummary {
    pub zone_id: i64,
    pub last_value: Option<f64>,
    pub status: Status,
    pub last_seen_at: Option<DateTime<Utc>>,
    pub variation_percent: i64,
    pub series: Vec<ViewPoint>,
    pub y_min: f64,
    pub y_max: f64,
}

impl ZoneSummary {
    pub fn has_data(&self) -> bool {
        self.last_value.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraSummary {
    pub camera_id: i64,
    pub window: DisplayWindow,
    pub generated_at: DateTime<Utc>,
    /// False when no zone has a single usable reading in the window.
    pub has_data: bool,
    pub zones: Vec<ZoneSummary>,
}

/// Run the full normalization pipeline for one zone.
pub fn build_summary(
    zone_id: i64,
    mut raw_readings: Vec<Reading>,
    window: &DisplayWindow,
    settings: &PipelineSettings,
    now: DateTime<Utc>,
) -> Result<ZoneSummary, PipelineError> {
    settings.validate()?;

    // Stable: equal timestamps keep their source order.
    raw_readings.sort_by_key(|r| r.timestamp);
    let clean = sanitize(&raw_readings, settings.min_safe_temp, settings.max_safe_temp);

    // Liveness is decided on real data only, before any sentinels exist.
    let last_seen_at = clean.last().map(|r| r.timestamp);
    let status = classify(last_seen_at, now, &settings.status_thresholds());

    let values: Vec<f64> = clean.iter().filter_map(|r| r.temperature).collect();
    let variation_percent = variation_percent(&values);
    let last_value = values.last().copied();

    let bounded = fill_boundaries(clean, window);
    let points: Vec<ViewPoint> = bounded.into_iter().map(ViewPoint::from).collect();
    let series = downsample(points, settings.max_display_points)?;
    let (y_min, y_max) = settings.axis_scale().compute_y_range(series.iter().map(|p| p.y));

    Ok(ZoneSummary {
        zone_id,
        last_value,
        status,
        last_seen_at,
        variation_percent,
        series,
        y_min,
        y_max,
    })
}

/// Summaries for every zone of a camera, ordered by zone id.
pub fn build_camera_summary(
    camera_id: i64,
    zones: Vec<Zone>,
    window: &DisplayWindow,
    settings: &PipelineSettings,
    now: DateTime<Utc>,
) -> Result<CameraSummary, PipelineError> {
    settings.validate()?;
    let mut summaries = zones
        .into_iter()
        .map(|zone| build_summary(zone.zone_id, zone.readings, window, settings, now))
        .collect::<Result<Vec<_>, _>>()?;
    summaries.sort_by_key(|s| s.zone_id);

    Ok(CameraSummary {
        camera_id,
        window: *window,
        generated_at: now,
        has_data: summaries.iter().any(ZoneSummary::has_data),
        zones: summaries,
    })
}

/// Percent change from first to last value, rounded half away from zero.
fn variation_percent(values: &[f64]) -> i64 {
    match (values.first(), values.last()) {
        (Some(&first), Some(&last)) if values.len() >= 2 && first != 0.0 => {
            (((last - first) / first.abs()) * 100.0).round() as i64
        }
        _ => 0,
    }
}
