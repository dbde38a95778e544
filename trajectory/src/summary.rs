use time::PrimitiveDateTime;

use crate::elevation::elevation;
use crate::models::Trajectory;
use crate::moving::moving_time;

/// Per-activity metrics, derived once and stored alongside the raw trace so
/// later queries (batch segment scans, trend analysis) don't re-parse it.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivitySummary {
    pub total_distance_meters: f64,
    pub moving_seconds: f64,
    pub elapsed_seconds: f64,
    pub elevation_gain_meters: f64,
    pub elevation_loss_meters: f64,
    /// First valid sample timestamp; `None` for time-less traces
    pub ride_date: Option<PrimitiveDateTime>,
}

/// Derive the full summary for one trajectory.
pub fn summarize(trajectory: &Trajectory) -> ActivitySummary {
    let moving = moving_time(trajectory);
    let elevation = elevation(trajectory.points());

    ActivitySummary {
        total_distance_meters: trajectory.total_distance(),
        moving_seconds: moving.moving_seconds,
        elapsed_seconds: moving.elapsed_seconds,
        elevation_gain_meters: elevation.gain_meters,
        elevation_loss_meters: elevation.loss_meters,
        ride_date: trajectory.start_time(),
    }
}
