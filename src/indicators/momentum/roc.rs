//! Percent-change momentum (rate of change)

/// Fractional change of the last close versus the close `days` bars earlier.
///
/// Neutral 0.0 unless the series holds more than `days` points. Closes are
/// assumed positive.
pub fn momentum(closes: &[f64], days: usize) -> f64 {
    if closes.len() <= days {
        return 0.0;
    }
    let last = closes[closes.len() - 1];
    let base = closes[closes.len() - 1 - days];
    last / base - 1.0
}
