use time::PrimitiveDateTime;

/// One raw GPS/altitude/time sample as decoded from a trace file.
///
/// Real files drop single fields mid-trace, so every field is optional.
/// A missing field is `None`, never zero. A `NaN` or infinite value in the
/// file counts as missing too: every consumer in this workspace checks
/// `is_finite()` before using a numeric field.
#[derive(Debug, Clone, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trackpoint {
    pub time: Option<PrimitiveDateTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Altitude of the sample in meters
    pub altitude: Option<f64>,
    /// Cumulative distance in meters as reported by the recording device
    pub raw_distance: Option<f64>,
}

impl Trackpoint {
    /// Latitude/longitude pair, present only when both coordinates are
    /// present and finite.
    pub const fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude))
                if latitude.is_finite() && longitude.is_finite() =>
            {
                Some((latitude, longitude))
            }
            _ => None,
        }
    }
}

/// A trace's samples plus the derived cumulative distance in meters.
///
/// Built only by [`normalize`](crate::normalize()), which guarantees:
///
/// - `cumulative_distance().len() == points().len()`
/// - `cumulative_distance()` is non-decreasing and starts at `0.0`
/// - at least 2 samples
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Trajectory {
    points: Vec<Trackpoint>,
    cumulative_distance: Vec<f64>,
}

impl Trajectory {
    pub(crate) fn new(points: Vec<Trackpoint>, cumulative_distance: Vec<f64>) -> Self {
        Self {
            points,
            cumulative_distance,
        }
    }

    pub fn points(&self) -> &[Trackpoint] {
        &self.points
    }

    pub fn cumulative_distance(&self) -> &[f64] {
        &self.cumulative_distance
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total covered distance in meters.
    pub fn total_distance(&self) -> f64 {
        self.cumulative_distance
            .last()
            .copied()
            .unwrap_or_default()
    }

    /// First sample timestamp that is present.
    pub fn start_time(&self) -> Option<PrimitiveDateTime> {
        self.points.iter().find_map(|point| point.time)
    }

    /// Last sample timestamp that is present.
    pub fn end_time(&self) -> Option<PrimitiveDateTime> {
        self.points.iter().rev().find_map(|point| point.time)
    }
}

/// The trace has too few usable samples to derive anything from.
///
/// This is an expected condition for short or GPS-less activities and the
/// caller decides how to surface it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a trajectory requires at least 2 trackpoints, got {got}")]
pub struct InsufficientData {
    pub got: usize,
}
