use crate::models::Trackpoint;

/// Total climb and descent over a trace, in meters.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Elevation {
    pub gain_meters: f64,
    pub loss_meters: f64,
}

/// Accumulate raw successive altitude differences.
///
/// Samples without an altitude are skipped without resetting the last seen
/// altitude, so a gap in the barometer data does not fabricate a climb. No
/// smoothing is applied: altitude noise inflates both totals, and callers
/// that need smoothed values must filter upstream.
pub fn elevation(points: &[Trackpoint]) -> Elevation {
    let mut gain = 0.0;
    let mut loss = 0.0;
    let mut last_altitude: Option<f64> = None;

    for point in points {
        let altitude = match point.altitude {
            Some(altitude) if altitude.is_finite() => altitude,
            _ => continue,
        };

        if let Some(previous) = last_altitude {
            let change = altitude - previous;

            if change > 0.0 {
                gain += change;
            } else {
                loss += -change;
            }
        }

        last_altitude = Some(altitude);
    }

    Elevation {
        gain_meters: gain,
        loss_meters: loss,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(altitude: Option<f64>) -> Trackpoint {
        Trackpoint {
            altitude,
            ..Trackpoint::default()
        }
    }

    #[test]
    fn gain_and_loss_accumulate_separately() {
        let points = [
            at(Some(100.0)),
            at(Some(130.0)),
            at(Some(110.0)),
            at(Some(150.0)),
        ];

        let report = elevation(&points);
        assert_eq!(report.gain_meters, 70.0);
        assert_eq!(report.loss_meters, 20.0);
    }

    #[test]
    fn missing_altitudes_do_not_reset_the_baseline() {
        let points = [at(Some(100.0)), at(None), at(None), at(Some(110.0))];

        let report = elevation(&points);
        assert_eq!(report.gain_meters, 10.0);
        assert_eq!(report.loss_meters, 0.0);
    }

    #[test]
    fn non_finite_altitudes_are_treated_as_missing() {
        let points = [
            at(Some(100.0)),
            at(Some(f64::NAN)),
            at(Some(110.0)),
            at(Some(f64::NEG_INFINITY)),
            at(Some(104.0)),
        ];

        let report = elevation(&points);
        assert_eq!(report.gain_meters, 10.0);
        assert_eq!(report.loss_meters, 6.0);
    }

    #[test]
    fn trace_without_altitude_reports_zero() {
        let points = [at(None), at(None)];

        assert_eq!(elevation(&points), Elevation::default());
        assert_eq!(elevation(&[]), Elevation::default());
    }

    #[test]
    fn flat_trace_reports_zero() {
        let points = [at(Some(42.0)), at(Some(42.0)), at(Some(42.0))];

        assert_eq!(elevation(&points), Elevation::default());
    }
}
