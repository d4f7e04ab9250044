// Pipeline tuning knobs
use crate::domain::axis::AxisScale;
use crate::domain::error::PipelineError;
use crate::domain::status::{
    StatusThresholds, DEFAULT_DELAYED_THRESHOLD_SECS, DEFAULT_FRESH_THRESHOLD_SECS,
};
use chrono::TimeDelta;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct PipelineSettings {
    pub min_safe_temp: f64,
    pub max_safe_temp: f64,
    pub max_display_points: usize,
    pub fresh_threshold_secs: i64,
    pub delayed_threshold_secs: i64,
    pub low_percentile: f64,
    pub high_percentile: f64,
    pub axis_pad: f64,
    pub default_lookback_hours: i64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            min_safe_temp: 5.0,
            max_safe_temp: 45.0,
            max_display_points: 1000,
            fresh_threshold_secs: DEFAULT_FRESH_THRESHOLD_SECS,
            delayed_threshold_secs: DEFAULT_DELAYED_THRESHOLD_SECS,
            low_percentile: 0.02,
            high_percentile: 0.98,
            axis_pad: 2.0,
            default_lookback_hours: 24,
        }
    }
}

impl PipelineSettings {
    /// Reject configurations that would break pipeline invariants. These are
    /// programming/deployment errors, so startup should fail on them.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.min_safe_temp.is_finite() || !self.max_safe_temp.is_finite() {
            return Err(PipelineError::invalid("safe temperature bounds must be finite"));
        }
        if self.min_safe_temp >= self.max_safe_temp {
            return Err(PipelineError::invalid(format!(
                "min_safe_temp ({}) must be below max_safe_temp ({})",
                self.min_safe_temp, self.max_safe_temp
            )));
        }
        if self.max_display_points == 0 {
            return Err(PipelineError::invalid("max_display_points must be positive"));
        }
        let in_unit = |p: f64| (0.0..=1.0).contains(&p);
        if !in_unit(self.low_percentile)
            || !in_unit(self.high_percentile)
            || self.low_percentile > self.high_percentile
        {
            return Err(PipelineError::invalid(format!(
                "percentiles must satisfy 0 <= low ({}) <= high ({}) <= 1",
                self.low_percentile, self.high_percentile
            )));
        }
        if !self.axis_pad.is_finite() || self.axis_pad < 0.0 {
            return Err(PipelineError::invalid("axis_pad must be a non-negative number"));
        }
        if self.fresh_threshold_secs < 0
            || self.fresh_threshold_secs > self.delayed_threshold_secs
            || TimeDelta::try_seconds(self.delayed_threshold_secs).is_none()
        {
            return Err(PipelineError::invalid(format!(
                "thresholds must satisfy 0 <= fresh ({}) <= delayed ({})",
                self.fresh_threshold_secs, self.delayed_threshold_secs
            )));
        }
        if TimeDelta::try_hours(self.default_lookback_hours).is_none()
            || self.default_lookback_hours < 0
        {
            return Err(PipelineError::invalid("default_lookback_hours out of range"));
        }
        Ok(())
    }

    pub fn axis_scale(&self) -> AxisScale {
        AxisScale {
            min_safe: self.min_safe_temp,
            max_safe: self.max_safe_temp,
            low_percentile: self.low_percentile,
            high_percentile: self.high_percentile,
            pad: self.axis_pad,
        }
    }

    pub fn status_thresholds(&self) -> StatusThresholds {
        StatusThresholds::from_secs(self.fresh_threshold_secs, self.delayed_threshold_secs)
    }

    pub fn default_lookback(&self) -> TimeDelta {
        TimeDelta::try_hours(self.default_lookback_hours).unwrap_or(TimeDelta::hours(24))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = PipelineSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.axis_scale(), AxisScale::default());
        assert_eq!(settings.status_thresholds(), StatusThresholds::default());
        assert_eq!(settings.default_lookback(), TimeDelta::hours(24));
    }

    #[test]
    fn test_rejects_inverted_safe_range() {
        let settings = PipelineSettings {
            min_safe_temp: 45.0,
            max_safe_temp: 45.0,
            ..PipelineSettings::default()
        };
        assert!(matches!(settings.validate(), Err(PipelineError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_zero_points() {
        let settings = PipelineSettings {
            max_display_points: 0,
            ..PipelineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_percentiles() {
        let swapped = PipelineSettings {
            low_percentile: 0.9,
            high_percentile: 0.1,
            ..PipelineSettings::default()
        };
        assert!(swapped.validate().is_err());

        let out_of_unit = PipelineSettings {
            high_percentile: 1.5,
            ..PipelineSettings::default()
        };
        assert!(out_of_unit.validate().is_err());
    }

    #[test]
    fn test_rejects_fresh_above_delayed() {
        let settings = PipelineSettings {
            fresh_threshold_secs: 900,
            ..PipelineSettings::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_pad() {
        let settings = PipelineSettings {
            axis_pad: -1.0,
            ..PipelineSettings::default()
        };
        assert!(settings.validate().is_err());
    }
}
