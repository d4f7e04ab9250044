// Stride downsampling for chart rendering
use crate::domain::error::PipelineError;

/// Reduce `points` to at most `max_points` by keeping every `factor`-th
/// element, `factor = ceil(len / max_points)`. Lossy but deterministic and
/// order-preserving; identity when the input already fits.
pub fn downsample<T>(points: Vec<T>, max_points: usize) -> Result<Vec<T>, PipelineError> {
    if max_points == 0 {
        return Err(PipelineError::invalid("max_points must be positive"));
    }
    if points.len() <= max_points {
        return Ok(points);
    }

    let factor = points.len().div_ceil(max_points);
    Ok(points.into_iter().step_by(factor).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_when_within_limit() {
        let points: Vec<u32> = (0..10).collect();
        assert_eq!(downsample(points.clone(), 10).unwrap(), points);
        assert_eq!(downsample(points.clone(), 1000).unwrap(), points);
        assert!(downsample(Vec::<u32>::new(), 1).unwrap().is_empty());
    }

    #[test]
    fn test_stride_five_thousand_to_one_thousand() {
        let points: Vec<u32> = (0..5000).collect();
        let sampled = downsample(points, 1000).unwrap();

        assert_eq!(sampled.len(), 1000);
        assert_eq!(sampled[0], 0);
        assert_eq!(sampled[1], 5);
        assert_eq!(sampled[999], 4995);
    }

    #[test]
    fn test_length_bound_and_subsequence() {
        for len in [1001usize, 1999, 2000, 2001, 7321] {
            for max in [1usize, 3, 999, 1000] {
                let points: Vec<usize> = (0..len).collect();
                let sampled = downsample(points, max).unwrap();

                assert!(sampled.len() <= max, "len={} max={}", len, max);
                assert!(sampled.windows(2).all(|w| w[0] < w[1]));
                assert_eq!(sampled[0], 0);
            }
        }
    }

    #[test]
    fn test_zero_max_points_is_rejected() {
        let result = downsample(vec![1, 2, 3], 0);
        assert!(matches!(result, Err(PipelineError::InvalidArgument(_))));
    }
}
