// Percentile-based vertical axis scaling

/// Range used when there are too few samples for percentiles to mean anything.
pub const FALLBACK_Y_RANGE: (f64, f64) = (0.0, 40.0);
pub const MIN_PERCENTILE_SAMPLES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisScale {
    pub min_safe: f64,
    pub max_safe: f64,
    pub low_percentile: f64,
    pub high_percentile: f64,
    pub pad: f64,
}

impl Default for AxisScale {
    fn default() -> Self {
        Self {
            min_safe: 5.0,
            max_safe: 45.0,
            low_percentile: 0.02,
            high_percentile: 0.98,
            pad: 2.0,
        }
    }
}

impl AxisScale {
    /// Compute `(y_min, y_max)` for the given samples, ignoring gaps.
    ///
    /// A handful of spikes must not eat the vertical resolution of the whole
    /// chart, so the range is taken between the low and high percentiles,
    /// padded, and clamped to the safe range.
    pub fn compute_y_range<I>(&self, values: I) -> (f64, f64)
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut sorted: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();

        if sorted.len() < MIN_PERCENTILE_SAMPLES {
            return FALLBACK_Y_RANGE;
        }
        sorted.sort_by(f64::total_cmp);

        let mut low = percentile(&sorted, self.low_percentile).floor();
        let mut high = percentile(&sorted, self.high_percentile).ceil();
        if low == high {
            // Constant signal: widen to the full observed extent.
            low = sorted[0].floor();
            high = sorted[sorted.len() - 1].ceil();
        }

        let y_min = (low - self.pad).max(self.min_safe);
        let y_max = (high + self.pad).min(self.max_safe);
        if y_min < y_max {
            (y_min, y_max)
        } else {
            (self.min_safe, self.max_safe)
        }
    }
}

/// Value at index `floor(p * (n - 1))` of an ascending, non-empty slice.
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let last = sorted.len() - 1;
    let idx = (p.clamp(0.0, 1.0) * last as f64).floor() as usize;
    sorted[idx.min(last)]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scale() -> AxisScale {
        AxisScale::default()
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn test_fallback_for_small_samples() {
        assert_eq!(scale().compute_y_range(Vec::new()), FALLBACK_Y_RANGE);
        assert_eq!(scale().compute_y_range(some(&[20.0, 21.0])), FALLBACK_Y_RANGE);
        // Gaps do not count towards the sample size.
        assert_eq!(
            scale().compute_y_range(vec![Some(20.0), None, Some(21.0), None]),
            FALLBACK_Y_RANGE
        );
    }

    #[test]
    fn test_constant_signal_is_widened() {
        assert_eq!(scale().compute_y_range(some(&[10.0, 10.0, 10.0])), (8.0, 12.0));
    }

    #[test]
    fn test_constant_signal_at_safe_edge_is_clamped() {
        assert_eq!(scale().compute_y_range(some(&[45.0, 45.0, 45.0])), (43.0, 45.0));
        assert_eq!(scale().compute_y_range(some(&[5.0, 5.0, 5.0])), (5.0, 7.0));
    }

    #[test]
    fn test_spikes_do_not_stretch_range() {
        let mut values = vec![20.0; 98];
        values.extend([21.0, 22.0, 23.0]);
        values.push(44.0);
        values.push(6.0);

        let (y_min, y_max) = scale().compute_y_range(some(&values));
        assert_eq!(y_min, 18.0);
        assert!(y_max <= 25.0, "y_max={}", y_max);
    }

    #[test]
    fn test_percentile_bounds_are_floored_and_ceiled() {
        let values = some(&[20.4, 20.6, 21.2, 21.7, 22.3]);
        // low = floor(20.4) = 20, high = ceil(v[floor(0.98*4)] = v[3] = 21.7) = 22
        assert_eq!(scale().compute_y_range(values), (18.0, 24.0));
    }

    #[test]
    fn test_never_degenerate_and_within_safe_bounds() {
        let cases: Vec<Vec<f64>> = vec![
            vec![100.0, 100.0, 100.0],
            vec![-10.0, -10.0, -10.0],
            vec![5.0, 45.0, 25.0, 30.0],
            vec![12.0, 12.5, 12.9],
            vec![f64::NAN, 20.0, 20.0, 20.0],
        ];

        for values in cases {
            let (y_min, y_max) = scale().compute_y_range(some(&values));
            assert!(y_min < y_max, "{:?} -> ({}, {})", values, y_min, y_max);
            assert!(y_min >= 5.0 && y_max <= 45.0, "{:?}", values);
        }
    }

    #[test]
    fn test_zero_pad_constant_signal_uses_safe_range() {
        let scale = AxisScale {
            pad: 0.0,
            ..AxisScale::default()
        };
        assert_eq!(scale.compute_y_range(some(&[10.0, 10.0, 10.0])), (5.0, 45.0));
    }
}
