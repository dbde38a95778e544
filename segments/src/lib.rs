//! Fastest fixed-distance segment search.
//!
//! For a target distance `T` the fastest segment of a trajectory is the
//! minimum-duration contiguous window whose covered distance is at least
//! `T`. The window end rarely falls exactly on a sample, so the end time is
//! linearly interpolated between the two samples bracketing the target
//! distance:
//!
//! ```notrust
//! ratio    = (target_end - dist[j-1]) / (dist[j] - dist[j-1])
//! end_time = time[j-1] + ratio * (time[j] - time[j-1])
//! ```
//!
//! Because cumulative distance is non-decreasing, the minimal end sample
//! never moves backwards as the start advances, which makes the search a
//! single O(n) two-pointer pass per target.

mod cache;

pub use self::cache::*;

use time::PrimitiveDateTime;
use trajectory::Trajectory;

/// A target distance must be a positive, finite number of meters.
///
/// Unlike short traces or unreachable targets, a bad target is a caller bug
/// and aborts the whole call.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("segment target distance must be positive and finite, got {0} m")]
pub struct InvalidTarget(pub f64);

/// The fastest contiguous sub-trajectory covering at least a target
/// distance.
#[derive(Debug, Clone, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Segment {
    /// Sample index where the window starts
    pub start_index: usize,
    /// Sample index just past the interpolated end, always above
    /// `start_index`
    pub end_index: usize,
    pub duration_seconds: f64,
    pub target_distance_meters: f64,
    pub average_speed_kmh: f64,
    pub start_time: PrimitiveDateTime,
    /// Interpolated moment at which the covered distance reaches the target
    pub end_time: PrimitiveDateTime,
}

/// Find the minimum-duration window covering at least `target_meters`.
///
/// # Params
/// - `trajectory` - normalized trajectory to search
/// - `target_meters` - target distance, must be positive and finite
///
/// Returns `Ok(None)` when the trajectory's total distance is below the
/// target. Candidates with a non-positive duration (duplicate or backwards
/// timestamps) or with a missing boundary timestamp are discarded. Exact
/// duration ties keep the earliest start index. The search has no hidden
/// state: the same inputs always return the same segment.
pub fn fastest_segment(
    trajectory: &Trajectory,
    target_meters: f64,
) -> Result<Option<Segment>, InvalidTarget> {
    if !target_meters.is_finite() || target_meters <= 0.0 {
        return Err(InvalidTarget(target_meters));
    }

    if trajectory.total_distance() < target_meters {
        return Ok(None);
    }

    let points = trajectory.points();
    let cumulative = trajectory.cumulative_distance();

    let mut best: Option<Segment> = None;
    let mut end = 1;

    for start in 0..points.len() - 1 {
        let target_end = cumulative[start] + target_meters;

        // The end pointer only ever advances: a later start can only need
        // an equal or later end. `target_end > cumulative[start]` also
        // guarantees `end > start` after the scan.
        while end < points.len() && cumulative[end] < target_end {
            end += 1;
        }

        if end == points.len() {
            // Distance is non-decreasing, so no later start can reach the
            // target either.
            break;
        }

        let (start_time, before, after) =
            match (points[start].time, points[end - 1].time, points[end].time) {
                (Some(start_time), Some(before), Some(after)) => (start_time, before, after),
                _ => continue,
            };

        let ratio = (target_end - cumulative[end - 1]) / (cumulative[end] - cumulative[end - 1]);
        let bracket = (after - before).as_seconds_f64();
        let duration = (before - start_time).as_seconds_f64() + ratio * bracket;

        if duration <= 0.0 {
            continue;
        }

        if best
            .as_ref()
            .map_or(true, |best| duration < best.duration_seconds)
        {
            best = Some(Segment {
                start_index: start,
                end_index: end,
                duration_seconds: duration,
                target_distance_meters: target_meters,
                average_speed_kmh: (target_meters / 1000.0) / (duration / 3600.0),
                start_time,
                end_time: before + time::Duration::seconds_f64(ratio * bracket),
            });
        }
    }

    Ok(best)
}

/// Evaluate every target independently.
///
/// The whole list is validated up front, so one malformed target fails the
/// call before any work happens. Targets the trajectory is too short for
/// yield `None` without affecting the others. Results come back in input
/// order, one entry per target.
pub fn fastest_segments(
    trajectory: &Trajectory,
    targets: impl IntoIterator<Item = f64>,
) -> Result<Vec<(f64, Option<Segment>)>, InvalidTarget> {
    let targets = targets.into_iter().collect::<Vec<_>>();

    if let Some(bad) = targets
        .iter()
        .copied()
        .find(|target| !target.is_finite() || *target <= 0.0)
    {
        return Err(InvalidTarget(bad));
    }

    let mut results = Vec::with_capacity(targets.len());

    for target in targets {
        let segment = fastest_segment(trajectory, target)?;
        results.push((target, segment));
    }

    Ok(results)
}

/// Standard batch ladder: every `step_meters` up to the trajectory's own
/// rounded-down length, capped at `max_meters`.
pub fn target_ladder(total_distance_meters: f64, step_meters: f64, max_meters: f64) -> Vec<f64> {
    if step_meters <= 0.0 || total_distance_meters < step_meters {
        return Vec::new();
    }

    let top = total_distance_meters.min(max_meters);
    let count = (top / step_meters).floor() as usize;

    (1..=count).map(|rung| rung as f64 * step_meters).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::datetime;
    use trajectory::{Trackpoint, normalize};

    fn sample(second: i64, raw_distance: f64) -> Trackpoint {
        Trackpoint {
            time: Some(datetime!(2024-06-01 08:00:00) + time::Duration::seconds(second)),
            raw_distance: Some(raw_distance),
            ..Trackpoint::default()
        }
    }

    #[test]
    fn interpolates_the_end_time_between_samples() {
        // 3 km every 10 minutes; a 5 km target needs two thirds of the
        // second leg: 600 s + (2000/3000) * 600 s = 1000 s at 18 km/h.
        let trajectory = normalize([
            sample(0, 0.0),
            sample(600, 3000.0),
            sample(1200, 6000.0),
        ])
        .unwrap();

        let segment = fastest_segment(&trajectory, 5000.0).unwrap().unwrap();

        assert_eq!(segment.start_index, 0);
        assert_eq!(segment.end_index, 2);
        assert!((segment.duration_seconds - 1000.0).abs() < 1e-9);
        assert!((segment.average_speed_kmh - 18.0).abs() < 1e-9);
        assert_eq!(segment.start_time, datetime!(2024-06-01 08:00:00));
        assert!(
            (segment.end_time - datetime!(2024-06-01 08:16:40)).as_seconds_f64().abs() < 1e-6
        );
    }

    #[test]
    fn unreachable_target_yields_none() {
        let trajectory = normalize([sample(0, 0.0), sample(600, 4000.0)]).unwrap();

        assert_eq!(fastest_segment(&trajectory, 5000.0), Ok(None));
    }

    #[test]
    fn feasible_target_always_yields_a_segment() {
        let trajectory = normalize([sample(0, 0.0), sample(600, 4000.0)]).unwrap();

        assert!(fastest_segment(&trajectory, 4000.0).unwrap().is_some());
    }

    #[test]
    fn picks_the_fastest_window_not_the_first() {
        // Second kilometer is ridden twice as fast as the first.
        let trajectory = normalize([
            sample(0, 0.0),
            sample(200, 1000.0),
            sample(300, 2000.0),
        ])
        .unwrap();

        let segment = fastest_segment(&trajectory, 1000.0).unwrap().unwrap();

        assert_eq!(segment.start_index, 1);
        assert_eq!(segment.end_index, 2);
        assert_eq!(segment.duration_seconds, 100.0);
        assert!((segment.average_speed_kmh - 36.0).abs() < 1e-9);
    }

    #[test]
    fn exact_ties_keep_the_earliest_start() {
        let trajectory = normalize([
            sample(0, 0.0),
            sample(100, 1000.0),
            sample(200, 2000.0),
        ])
        .unwrap();

        let segment = fastest_segment(&trajectory, 1000.0).unwrap().unwrap();

        assert_eq!(segment.start_index, 0);
        assert_eq!(segment.end_index, 1);
    }

    #[test]
    fn exact_sample_boundary_needs_no_interpolation() {
        let trajectory = normalize([
            sample(0, 0.0),
            sample(120, 1000.0),
            sample(400, 3000.0),
        ])
        .unwrap();

        let segment = fastest_segment(&trajectory, 1000.0).unwrap().unwrap();

        assert_eq!(segment.start_index, 0);
        assert_eq!(segment.end_index, 1);
        assert_eq!(segment.duration_seconds, 120.0);
        assert_eq!(segment.end_time, datetime!(2024-06-01 08:02:00));
    }

    #[test]
    fn returned_segments_are_always_valid() {
        let trajectory = normalize([
            sample(0, 0.0),
            sample(90, 800.0),
            sample(200, 1500.0),
            sample(260, 2400.0),
            sample(400, 3100.0),
        ])
        .unwrap();

        for (target, segment) in fastest_segments(&trajectory, [500.0, 1000.0, 2000.0, 3000.0])
            .unwrap()
        {
            let segment = segment.expect("all targets are reachable");
            assert!(segment.duration_seconds > 0.0);
            assert!(segment.end_index > segment.start_index);

            let speed = (target / 1000.0) / (segment.duration_seconds / 3600.0);
            assert!((segment.average_speed_kmh - speed).abs() < 1e-9);
        }
    }

    #[test]
    fn candidates_with_missing_timestamps_are_skipped() {
        let untimed = Trackpoint {
            raw_distance: Some(1000.0),
            ..Trackpoint::default()
        };

        let trajectory = normalize([
            sample(0, 0.0),
            untimed,
            sample(300, 2000.0),
            sample(360, 3000.0),
        ])
        .unwrap();

        // Windows bracketed by the time-less sample are unusable; the
        // search falls through to the last leg.
        let segment = fastest_segment(&trajectory, 1000.0).unwrap().unwrap();

        assert_eq!(segment.start_index, 2);
        assert_eq!(segment.end_index, 3);
        assert_eq!(segment.duration_seconds, 60.0);
    }

    #[test]
    fn nan_coordinates_cannot_poison_the_search() {
        let at = |second: i64, latitude: f64, longitude: f64| Trackpoint {
            time: Some(datetime!(2024-06-01 08:00:00) + time::Duration::seconds(second)),
            latitude: Some(latitude),
            longitude: Some(longitude),
            ..Trackpoint::default()
        };

        let trajectory = normalize([
            at(0, 49.0, 28.0),
            at(10, f64::NAN, 28.01),
            at(20, 49.02, 28.02),
        ])
        .unwrap();

        // The poisoned sample covers no distance, so the target is simply
        // unreachable; no NaN duration can form and nothing panics.
        assert_eq!(fastest_segment(&trajectory, 100.0), Ok(None));
        assert!(trajectory.total_distance().is_finite());
    }

    #[test]
    fn duplicate_timestamps_never_produce_a_segment() {
        let trajectory = normalize([sample(0, 0.0), sample(0, 1000.0)]).unwrap();

        assert_eq!(fastest_segment(&trajectory, 1000.0), Ok(None));
    }

    #[test]
    fn non_positive_targets_are_a_contract_violation() {
        let trajectory = normalize([sample(0, 0.0), sample(60, 1000.0)]).unwrap();

        assert_eq!(
            fastest_segment(&trajectory, -5000.0),
            Err(InvalidTarget(-5000.0))
        );
        assert_eq!(fastest_segment(&trajectory, 0.0), Err(InvalidTarget(0.0)));
        assert_eq!(
            fastest_segments(&trajectory, [1000.0, -1.0]),
            Err(InvalidTarget(-1.0))
        );
    }

    #[test]
    fn batch_targets_are_evaluated_independently() {
        let trajectory = normalize([sample(0, 0.0), sample(600, 2000.0)]).unwrap();

        let results = fastest_segments(&trajectory, [1000.0, 10_000.0, 500.0]).unwrap();

        assert_eq!(results.len(), 3);
        assert!(results[0].1.is_some());
        assert!(results[1].1.is_none());
        assert!(results[2].1.is_some());
    }

    #[test]
    fn search_is_idempotent() {
        let trajectory = normalize([
            sample(0, 0.0),
            sample(90, 800.0),
            sample(200, 1500.0),
            sample(260, 2400.0),
        ])
        .unwrap();

        let first = fastest_segments(&trajectory, [500.0, 1000.0, 2000.0]).unwrap();
        let second = fastest_segments(&trajectory, [500.0, 1000.0, 2000.0]).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn ladder_stops_at_the_trajectory_length() {
        assert_eq!(
            target_ladder(23_456.0, 5000.0, 100_000.0),
            [5000.0, 10_000.0, 15_000.0, 20_000.0]
        );
    }

    #[test]
    fn ladder_is_capped_at_the_maximum() {
        assert_eq!(
            target_ladder(160_000.0, 50_000.0, 100_000.0),
            [50_000.0, 100_000.0]
        );
    }

    #[test]
    fn ladder_for_short_traces_is_empty() {
        assert!(target_ladder(4000.0, 5000.0, 100_000.0).is_empty());
        assert!(target_ladder(4000.0, 0.0, 100_000.0).is_empty());
    }
}
