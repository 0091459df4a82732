/// Trailing rolling mean with a shrinking leading edge.
///
/// Position `i` averages `values[i + 1 - window ..= i]`, clipped at the
/// start of the series, so the first `window - 1` positions average however
/// many values exist so far. The output has the same length as the input.

/// Window used for the long-term trend lines.
pub const TREND_WINDOW: usize = 5;

pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;

    for (i, value) in values.iter().enumerate() {
        sum += value;
        if i >= window {
            sum -= values[i - window];
        }
        let count = (i + 1).min(window);
        out.push(sum / count as f64);
    }
    out
}

/// Five-point trailing moving average.
pub fn moving_average_5(values: &[f64]) -> Vec<f64> {
    rolling_mean(values, TREND_WINDOW)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-9, "position {}: {} != {}", i, a, e);
        }
    }

    #[test]
    fn test_first_position_equals_first_value() {
        let out = moving_average_5(&[42.0, 1.0, 2.0]);
        assert_eq!(out[0], 42.0);
    }

    #[test]
    fn test_leading_edge_shrinks() {
        let out = moving_average_5(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]);
        assert_close(&out, &[1.0, 1.5, 2.0, 2.5, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_yearly_totals_trend() {
        let out = moving_average_5(&[6350.0, 8400.0, 4800.0]);
        assert_close(&out, &[6350.0, 7375.0, 19550.0 / 3.0]);
    }

    #[test]
    fn test_window_of_one_is_identity() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_close(&rolling_mean(&values, 1), &values);
    }

    #[test]
    fn test_empty_series() {
        assert!(moving_average_5(&[]).is_empty());
    }
}
