//! Raw samples to a canonical trajectory.
//!
//! Devices that write a cumulative distance field are trusted over GPS
//! coordinates, since they usually integrate wheel-sensor data. Traces
//! without any distance field fall back to great-circle accumulation with
//! the Haversine formula:
//!
//! ```notrust
//! d = 2R * asin(√(sin²((Φ2−Φ1)/2) + cos(Φ1)cos(Φ2)sin²((λ2−λ1)/2)))
//! ```

use crate::models::{InsufficientData, Trackpoint, Trajectory};

/// Radius of Earth in meters (spherical model)
pub const EARTH_RADIUS: f64 = 6_371_000.0;

/// Build a [`Trajectory`] from raw samples.
///
/// # Params
/// - `points` - decoded samples in file order
///
/// Cumulative distance comes from the device's `raw_distance` field when at
/// least one sample carries it, with missing samples inheriting the previous
/// value; otherwise from pairwise Haversine accumulation, where a pair with
/// a missing coordinate contributes zero so index alignment with the sample
/// array is preserved. Both branches produce a non-decreasing series that
/// starts at zero.
pub fn normalize(
    points: impl IntoIterator<Item = Trackpoint>,
) -> Result<Trajectory, InsufficientData> {
    let points = points.into_iter().collect::<Vec<_>>();

    if points.len() < 2 {
        return Err(InsufficientData { got: points.len() });
    }

    let cumulative = match points
        .iter()
        .find_map(|point| point.raw_distance.filter(|raw| raw.is_finite()))
    {
        Some(base) => from_raw_distance(&points, base),
        None => from_coordinates(&points),
    };

    Ok(Trajectory::new(points, cumulative))
}

fn from_raw_distance(points: &[Trackpoint], base: f64) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut previous = 0.0;

    for point in points {
        let next = match point.raw_distance {
            // The clamp keeps the series non-decreasing when the device
            // resets its distance counter mid-trace.
            Some(raw) if raw.is_finite() => (raw - base).max(previous),
            // A sample with a missing or non-finite field inherits the
            // previous value instead of resetting to zero.
            _ => previous,
        };

        cumulative.push(next);
        previous = next;
    }

    cumulative
}

fn from_coordinates(points: &[Trackpoint]) -> Vec<f64> {
    let mut cumulative = Vec::with_capacity(points.len());
    let mut previous = 0.0;

    cumulative.push(previous);

    for pair in points.windows(2) {
        let step = match (pair[0].coordinates(), pair[1].coordinates()) {
            (Some(from), Some(to)) => haversine(from, to),
            _ => 0.0,
        };

        previous += step;
        cumulative.push(previous);
    }

    cumulative
}

/// Distance in meters between two `(latitude, longitude)` pairs along
/// Earth's surface
fn haversine(
    (latitude_1, longitude_1): (f64, f64),
    (latitude_2, longitude_2): (f64, f64),
) -> f64 {
    let d_lat = (std::f64::consts::PI / 180.0) * (latitude_2 - latitude_1);
    let d_lon = (std::f64::consts::PI / 180.0) * (longitude_2 - longitude_1);

    // convert to radians
    let latitude_1 = (std::f64::consts::PI / 180.0) * latitude_1;
    let latitude_2 = (std::f64::consts::PI / 180.0) * latitude_2;

    EARTH_RADIUS
        * (2.0
            * ((d_lat / 2.0).sin().powi(2)
                + (d_lon / 2.0).sin().powi(2) * latitude_1.cos() * latitude_2.cos())
            .sqrt()
            .asin())
}
