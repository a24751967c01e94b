//! Least-squares slope over a trailing window

/// Slope of a degree-1 least-squares fit of the last `window` values against
/// their position index `0..n`.
///
/// Needs at least `max(5, window / 2)` points, otherwise returns the neutral
/// 0.0. Positive means rising.
pub fn slope(values: &[f64], window: usize) -> f64 {
    let start = values.len().saturating_sub(window);
    let tail = &values[start..];
    let n = tail.len();

    if n < (window / 2).max(5) {
        return 0.0;
    }

    let n_f = n as f64;
    let x_mean = (n_f - 1.0) / 2.0;
    let y_mean = tail.iter().sum::<f64>() / n_f;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in tail.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }

    if den == 0.0 {
        return 0.0;
    }
    num / den
}
