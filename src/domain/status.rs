// Zone liveness classification
use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

pub const DEFAULT_FRESH_THRESHOLD_SECS: i64 = 120;
pub const DEFAULT_DELAYED_THRESHOLD_SECS: i64 = 600;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Fresh,
    Delayed,
    Stale,
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusThresholds {
    pub fresh: TimeDelta,
    pub delayed: TimeDelta,
}

impl StatusThresholds {
    pub fn from_secs(fresh_secs: i64, delayed_secs: i64) -> Self {
        Self {
            fresh: TimeDelta::seconds(fresh_secs),
            delayed: TimeDelta::seconds(delayed_secs),
        }
    }
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self::from_secs(DEFAULT_FRESH_THRESHOLD_SECS, DEFAULT_DELAYED_THRESHOLD_SECS)
    }
}

/// Classify a zone by the age of its most recent real reading.
pub fn classify(
    last_seen_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    thresholds: &StatusThresholds,
) -> Status {
    let Some(last_seen_at) = last_seen_at else {
        return Status::Never;
    };

    let age = now.signed_duration_since(last_seen_at);
    if age < thresholds.fresh {
        Status::Fresh
    } else if age < thresholds.delayed {
        Status::Delayed
    } else {
        Status::Stale
    }
}
