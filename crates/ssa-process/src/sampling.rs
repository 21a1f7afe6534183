//! Competing exponential clocks.
//!
//! With `k` independent clocks of rates `r_1..r_k`, the first one to ring
//! does so after `Exp(Σ r_i)` and is clock `i` with probability `r_i / Σ r`.
//! Sampling the minimum and the identity separately needs two uniform draws
//! and no per-clock exponential samples.

/// Waiting time until the first of the clocks rings.
///
/// `draw` is uniform in `[0, 1)`; `1 - draw` lies in `(0, 1]`, so the log is
/// always finite.  `total` must be positive.
#[inline]
pub fn waiting_time(total: f64, draw: f64) -> f64 {
    -(1.0 - draw).ln() / total
}

/// Index of the winning clock for a uniform `draw` in `[0, 1)`.
///
/// Scans `rates` in order with a running residual `r = draw * total`,
/// returning the first `i` with `r < rates[i]`.  Zero rates can never win.
/// `None` means rounding left `r` past the last rate; callers treat that as
/// a defect rather than guessing a winner.
pub fn select(rates: &[f64], total: f64, draw: f64) -> Option<usize> {
    let mut residual = draw * total;
    for (i, &rate) in rates.iter().enumerate() {
        if residual < rate {
            return Some(i);
        }
        residual -= rate;
    }
    None
}
