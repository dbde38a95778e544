//! Moving time vs elapsed time.
//!
//! GPS noise produces phantom movement while the rider is standing still,
//! and naive elapsed time overstates effort when the rider pauses. Elapsed
//! time is classified pair by pair: a pair counts as moving only when the
//! covered distance says so, and device pauses (long recording gaps) never
//! count regardless of the distance covered.

use crate::models::Trajectory;

/// Gaps longer than this are device pauses or file gaps, never movement
const MAX_GAP_SECONDS: f64 = 300.0;
/// Distance at which a pair always counts as moving
const MIN_MOVEMENT_METERS: f64 = 5.0;
/// Short gaps count as moving already at very small distances
const SHORT_GAP_SECONDS: f64 = 10.0;
/// Below this distance everything is GPS jitter
const JITTER_FLOOR_METERS: f64 = 0.1;

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MovingTime {
    /// Elapsed time excluding detected stationary periods, in seconds
    pub moving_seconds: f64,
    /// Last valid timestamp minus first valid timestamp, in seconds
    pub elapsed_seconds: f64,
}

/// Split a trajectory's time into moving and elapsed seconds.
///
/// Consecutive pairs are scanned left to right. A pair contributes its time
/// gap to moving time when the covered distance is at least 5 m, or above
/// 0.1 m with a gap of at most 10 s (real low-speed movement in short
/// intervals). Pairs with a missing timestamp, a non-positive gap, or a gap
/// over 300 s contribute nothing. Elapsed time ignores the filter entirely.
///
/// The thresholds are heuristic constants, not learned.
pub fn moving_time(trajectory: &Trajectory) -> MovingTime {
    let points = trajectory.points();
    let cumulative = trajectory.cumulative_distance();

    let mut moving_seconds = 0.0;

    for i in 1..points.len() {
        let (start, end) = match (points[i - 1].time, points[i].time) {
            (Some(start), Some(end)) => (start, end),
            _ => continue,
        };

        let gap = (end - start).as_seconds_f64();
        if gap <= 0.0 || gap > MAX_GAP_SECONDS {
            continue;
        }

        let covered = cumulative[i] - cumulative[i - 1];
        if covered >= MIN_MOVEMENT_METERS
            || (covered > JITTER_FLOOR_METERS && gap <= SHORT_GAP_SECONDS)
        {
            moving_seconds += gap;
        }
    }

    let elapsed_seconds = match (trajectory.start_time(), trajectory.end_time()) {
        (Some(first), Some(last)) => (last - first).as_seconds_f64().max(0.0),
        _ => 0.0,
    };

    MovingTime {
        moving_seconds,
        elapsed_seconds,
    }
}
