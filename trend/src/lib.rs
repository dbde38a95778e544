//! Cross-activity trend analysis.
//!
//! Repeated best-segment efforts at one fixed target distance, one sample
//! per activity, fitted with an ordinary least-squares regression of speed
//! against time:
//!
//! ```notrust
//! slope     = Σ(x−x̄)(y−ȳ) / Σ(x−x̄)²
//! intercept = ȳ − slope·x̄
//! R²        = 1 − SS_residual / SS_total
//! ```
//!
//! where `x` is days since the earliest valid sample and `y` is the
//! segment's average speed in km/h. The report is a pure function of the
//! sample set and is recomputed on every query, never persisted.

use time::PrimitiveDateTime;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// One activity's best effort at a fixed target distance.
///
/// Created when a segment search for that target succeeds on that activity;
/// the set is discarded and recomputed whenever the activity set changes.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendSample {
    pub activity_id: u64,
    pub ride_date: Option<PrimitiveDateTime>,
    pub speed_kmh: f64,
    pub duration_seconds: f64,
}

/// Fitted line over a set of [`TrendSample`].
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrendReport {
    /// km/h gained (or lost) per day
    pub slope: f64,
    /// Fitted speed at the earliest sample's date, in km/h
    pub intercept: f64,
    /// Goodness of fit in `[0, 1]` for non-degenerate inputs
    pub r_squared: f64,
    /// Human-readable form of the fitted line, e.g. `y = 0.042x + 27.3`
    pub equation_label: String,
}

/// Fit speed against days since the earliest valid sample.
///
/// Samples without a date or with a non-positive speed are dropped. Fewer
/// than 2 valid samples return `None`, so callers can tell "insufficient
/// data" apart from a flat trend. The samples are sorted by date before the
/// fit, which makes the result independent of insertion order.
///
/// Degenerate inputs stay well-defined: all samples on one date give
/// `slope = 0`, zero-variance speeds give `r_squared = 0`.
pub fn trend(samples: impl IntoIterator<Item = TrendSample>) -> Option<TrendReport> {
    let mut valid = samples
        .into_iter()
        .filter_map(|sample| match sample.ride_date {
            Some(date) if sample.speed_kmh.is_finite() && sample.speed_kmh > 0.0 => {
                Some((date, sample.speed_kmh))
            }
            _ => None,
        })
        .collect::<Vec<_>>();

    if valid.len() < 2 {
        return None;
    }

    valid.sort_by(|(a, _), (b, _)| a.cmp(b));

    let earliest = valid[0].0;
    let points = valid
        .into_iter()
        .map(|(date, speed)| ((date - earliest).as_seconds_f64() / SECONDS_PER_DAY, speed))
        .collect::<Vec<_>>();

    let n = points.len() as f64;
    let mut x_sum = 0.0;
    let mut y_sum = 0.0;
    for &(x, y) in &points {
        x_sum += x;
        y_sum += y;
    }
    let x_mean = x_sum / n;
    let y_mean = y_sum / n;

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for &(x, y) in &points {
        numerator += (x - x_mean) * (y - y_mean);
        denominator += (x - x_mean) * (x - x_mean);
    }

    let slope = match denominator == 0.0 {
        // All efforts on the same date
        true => 0.0,
        false => numerator / denominator,
    };
    let intercept = y_mean - slope * x_mean;

    let mut ss_residual = 0.0;
    let mut ss_total = 0.0;
    for &(x, y) in &points {
        let predicted = slope * x + intercept;
        ss_residual += (y - predicted) * (y - predicted);
        ss_total += (y - y_mean) * (y - y_mean);
    }

    let r_squared = match ss_total == 0.0 {
        true => 0.0,
        false => 1.0 - ss_residual / ss_total,
    };

    Some(TrendReport {
        slope,
        intercept,
        r_squared,
        equation_label: format!("y = {slope:.3}x + {intercept:.3}"),
    })
}
