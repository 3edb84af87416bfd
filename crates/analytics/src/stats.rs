//! Descriptive statistics over plain `f64` slices.
//!
//! These helpers assume their preconditions (non-empty input, at least two
//! values for a deviation); the public operations validate before calling them.

/// Arithmetic mean. Returns NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (divisor `n - 1`).
///
/// A slice whose values are all identical yields exactly `0.0`, never a
/// rounding residue from the mean. Returns `None` for fewer than two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let first = values[0];
    if values.iter().all(|v| *v == first) {
        return Some(0.0);
    }

    let m = mean(values);
    let sum_sq = values
        .iter()
        .map(|v| {
            let diff = v - m;
            diff * diff
        })
        .sum::<f64>();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Empirical quantile with linear interpolation between order statistics.
///
/// For `n` sorted values the position is `(n - 1) * q`; a fractional position
/// interpolates between its two neighbours. Returns `None` for an empty slice.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Some(quantile_sorted(&sorted, q))
}

/// Same as [`quantile`], for input that is already sorted ascending and non-empty.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}
