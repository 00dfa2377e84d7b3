//! Divergence reporting over the [`ConvergenceTrace`].
//!
//! A location is examined only when its last two values differ by more
//! than the quantity's tolerance.  It is then classified as:
//!
//! | Finding             | Test                                                             |
//! |---------------------|------------------------------------------------------------------|
//! | `Oscillating`       | the newest value recurs (within tolerance) earlier in the history |
//! | `MonotonicIncrease` | least-squares slope over the history `> slope tolerance`          |
//! | `MonotonicDecrease` | least-squares slope over the history `< −slope tolerance`         |
//!
//! The slope is fitted against the pass offsets `0, −1, …, −(n−1)` (newest
//! first), so a positive slope means the value has been growing.
//!
//! Findings are purely informational; nothing in the solver branches on them.

use std::fmt;

use crate::{ConvergenceTrace, TraceHistory, TraceLocation, TraceQuantity};

/// Shape of a non-converging history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingKind {
    Oscillating,
    MonotonicIncrease,
    MonotonicDecrease,
}

/// One non-converging location.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceFinding {
    pub location: TraceLocation,
    pub quantity: TraceQuantity,
    pub kind:     FindingKind,
    /// Newest traced value.
    pub latest:   f64,
    /// Fitted slope per pass; `None` for oscillation.
    pub slope:    Option<f64>,
}

impl fmt::Display for ConvergenceFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let q = self.quantity.label();
        match (self.kind, self.slope) {
            (FindingKind::Oscillating, _) | (_, None) => {
                write!(f, "{}: {q} oscillating (last value {:.6})", self.location, self.latest)
            }
            (FindingKind::MonotonicIncrease, Some(s)) => {
                write!(f, "{}: {q} increasing (slope {s:.6} per pass)", self.location)
            }
            (FindingKind::MonotonicDecrease, Some(s)) => {
                write!(f, "{}: {q} decreasing (slope {s:.6} per pass)", self.location)
            }
        }
    }
}

/// Analyse every traced location.  Results follow the trace's recording
/// order.
pub fn analyse_trace(trace: &ConvergenceTrace) -> Vec<ConvergenceFinding> {
    trace
        .entries()
        .iter()
        .filter_map(|e| {
            classify(&e.history, e.quantity).map(|(kind, slope)| ConvergenceFinding {
                location: e.location,
                quantity: e.quantity,
                kind,
                latest: e.history.latest().unwrap_or(0.0),
                slope,
            })
        })
        .collect()
}

/// Classify one history; `None` when it looks converged or shows no trend.
pub fn classify(history: &TraceHistory, quantity: TraceQuantity) -> Option<(FindingKind, Option<f64>)> {
    let values = history.values();
    if values.len() < 2 || (values[0] - values[1]).abs() <= quantity.tolerance() {
        return None;
    }

    let latest = values[0];
    let duplicate = values[1..]
        .iter()
        .any(|v| (latest - v).abs() < quantity.oscillation_tolerance());
    if duplicate {
        return Some((FindingKind::Oscillating, None));
    }

    let slope = least_squares_slope(values);
    if slope.abs() <= quantity.slope_tolerance() {
        return None;
    }
    let kind = if slope > 0.0 { FindingKind::MonotonicIncrease } else { FindingKind::MonotonicDecrease };
    Some((kind, Some(slope)))
}

/// Slope of the best-fit line through `(−i, values[i])`.
fn least_squares_slope(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let (mut sx, mut sy, mut sxx, mut sxy) = (0.0, 0.0, 0.0, 0.0);
    for (i, &y) in values.iter().enumerate() {
        let x = -(i as f64);
        sx += x;
        sy += y;
        sxx += x * x;
        sxy += x * y;
    }
    let denom = n * sxx - sx * sx;
    if denom == 0.0 {
        return 0.0;
    }
    (n * sxy - sx * sy) / denom
}
