// Sensor reading domain models
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One sensor sample. `temperature` is `None` only for synthesized gap markers
/// or for payload values that could not be read as a number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub temperature: Option<f64>,
}

impl Reading {
    pub fn new(timestamp: DateTime<Utc>, temperature: f64) -> Self {
        Self {
            timestamp,
            temperature: Some(temperature),
        }
    }

    /// Synthetic "no data" marker used to pin chart bounds.
    pub fn gap(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            temperature: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub zone_id: i64,
    pub readings: Vec<Reading>,
}

impl Zone {
    pub fn new(zone_id: i64, readings: Vec<Reading>) -> Self {
        Self { zone_id, readings }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub camera_id: i64,
    pub zones: Vec<i64>,
}

/// Chart-ready point; `y == None` marks a rendering gap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewPoint {
    pub x: DateTime<Utc>,
    pub y: Option<f64>,
}

impl From<Reading> for ViewPoint {
    fn from(reading: Reading) -> Self {
        Self {
            x: reading.timestamp,
            y: reading.temperature,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_view_point_from_reading() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let point = ViewPoint::from(Reading::new(ts, 21.5));
        assert_eq!(point.x, ts);
        assert_eq!(point.y, Some(21.5));

        let gap = ViewPoint::from(Reading::gap(ts));
        assert_eq!(gap.y, None);
    }

    #[test]
    fn test_view_point_serializes_gap_as_null() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let json = serde_json::to_value(ViewPoint::from(Reading::gap(ts))).unwrap();
        assert_eq!(json["x"], "2025-01-01T00:00:00Z");
        assert!(json["y"].is_null());
    }
}
