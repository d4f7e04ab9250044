// Display window and range normalization
use crate::domain::error::PipelineError;
use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::Serialize;

/// Resolved `[start, end]` range a display asks for. `start <= end` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DisplayWindow {
    pub fn try_new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::invalid(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    fn trailing(now: DateTime<Utc>, lookback: TimeDelta) -> Option<Self> {
        if lookback < TimeDelta::zero() {
            return None;
        }
        let start = now.checked_sub_signed(lookback)?;
        Some(Self { start, end: now })
    }

    fn default_for(now: DateTime<Utc>, default_lookback: TimeDelta) -> Self {
        Self::trailing(now, default_lookback).unwrap_or(Self { start: now, end: now })
    }
}

/// Resolve a requested window into a concrete, valid one.
///
/// Explicit bounds win whenever either is supplied; a missing side is taken
/// from the default window. Anything unparseable or inverted falls back to
/// `[now - default_lookback, now]`. Without explicit bounds a relative
/// lookback is used if present. This never fails.
pub fn normalize_window(
    desired_start: Option<&str>,
    desired_end: Option<&str>,
    lookback: Option<TimeDelta>,
    now: DateTime<Utc>,
    default_lookback: TimeDelta,
) -> DisplayWindow {
    let fallback = DisplayWindow::default_for(now, default_lookback);

    if desired_start.is_some() || desired_end.is_some() {
        let start = match desired_start {
            Some(raw) => parse_bound(raw, false),
            None => Some(fallback.start),
        };
        let end = match desired_end {
            Some(raw) => parse_bound(raw, true),
            None => Some(fallback.end),
        };

        let explicit = start
            .zip(end)
            .and_then(|(start, end)| DisplayWindow::try_new(start, end).ok());
        return explicit.unwrap_or_else(|| {
            tracing::debug!(
                ?desired_start,
                ?desired_end,
                "invalid explicit window, using default"
            );
            fallback
        });
    }

    match lookback {
        Some(lookback) => DisplayWindow::trailing(now, lookback).unwrap_or(fallback),
        None => fallback,
    }
}

/// Parse an RFC 3339 instant or a bare `YYYY-MM-DD` date. A date-only end
/// bound covers the whole day.
fn parse_bound(raw: &str, is_end: bool) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?.and_utc();
    if is_end {
        midnight.checked_add_signed(TimeDelta::days(1))
    } else {
        Some(midnight)
    }
}
