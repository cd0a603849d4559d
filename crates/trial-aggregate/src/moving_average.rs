//! Trailing moving average

use trial_core::{Error, Result};

/// Trailing moving average of `values` over `window` positions
///
/// The first `window - 1` positions average everything seen so far
/// (denominator `i + 1`); later positions average exactly `window` values.
/// Each window is summed directly, so `window == 1` returns `values`
/// unchanged.
pub fn trailing_moving_average(values: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 0 {
        return Err(Error::InvalidConfiguration(
            "moving-average window must be positive".to_string(),
        ));
    }

    Ok((0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &values[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_of_two() {
        let avg = trailing_moving_average(&[10.0, 20.0, 30.0, 40.0], 2).unwrap();
        assert_eq!(avg, vec![10.0, 15.0, 25.0, 35.0]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [0.1, 0.7, 1e12, -3.3];
        assert_eq!(trailing_moving_average(&values, 1).unwrap(), values.to_vec());
    }

    #[test]
    fn test_window_wider_than_series() {
        let avg = trailing_moving_average(&[2.0, 4.0, 6.0], 10).unwrap();
        assert_eq!(avg, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_empty_series() {
        assert!(trailing_moving_average(&[], 3).unwrap().is_empty());
    }

    #[test]
    fn test_zero_window() {
        assert!(matches!(
            trailing_moving_average(&[1.0], 0).unwrap_err(),
            Error::InvalidConfiguration(_)
        ));
    }
}
