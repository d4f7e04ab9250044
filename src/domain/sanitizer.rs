// Reading sanitizer - drops physically implausible or malformed samples
use crate::domain::reading::Reading;

/// Keep only readings with a finite temperature inside `[min_safe, max_safe]`.
///
/// Violations are dropped rather than clamped, and relative order is kept.
/// Faulty-sensor sentinels (e.g. 6450) fall outside any sane range and are
/// removed by the same check.
pub fn sanitize(readings: &[Reading], min_safe: f64, max_safe: f64) -> Vec<Reading> {
    readings
        .iter()
        .filter(|r| match r.temperature {
            Some(t) => t.is_finite() && t >= min_safe && t <= max_safe,
            None => false,
        })
        .copied()
        .collect()
}
