use std::{fs::File, path::PathBuf};

use segments::{fastest_segments, target_ladder};
use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use trajectory::{Trackpoint, normalize, summarize};

const TIME_FORMAT: &[BorrowedFormatItem<'_>] =
    time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
struct TrackpointCsv {
    time: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    altitude: Option<f64>,
    distance: Option<f64>,
}

impl From<TrackpointCsv> for Trackpoint {
    fn from(row: TrackpointCsv) -> Self {
        Self {
            // An unparseable timestamp degrades to a missing one.
            time: row
                .time
                .and_then(|raw| PrimitiveDateTime::parse(&raw, TIME_FORMAT).ok()),
            latitude: row.latitude,
            longitude: row.longitude,
            altitude: row.altitude,
            raw_distance: row.distance,
        }
    }
}

#[derive(Debug, clap::Parser)]
pub struct Args {
    /// Input csv file with one trackpoint per row (time, latitude,
    /// longitude, altitude, distance; empty fields are missing)
    #[arg(default_value_os_t = std::env::current_dir().unwrap_or_default().join("trace.csv"), required = false)]
    pub input: PathBuf,
    /// Ladder step between segment targets, in kilometers
    #[arg(short, long, default_value_t = 5.0, required = false)]
    pub step: f64,
    /// Largest segment target to evaluate, in kilometers
    #[arg(short, long, default_value_t = 100.0, required = false)]
    pub max: f64,
    /// Explicit segment targets in kilometers, replaces the ladder
    #[arg(short, long, required = false)]
    pub target: Vec<f64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let Args {
        input,
        step,
        max,
        target,
    } = <Args as clap::Parser>::parse();

    let mut rdr = csv::Reader::from_reader(
        File::open(&input).map_err(|e| format!("Failed to read input file. Reason: {e}"))?,
    );

    let points = rdr
        .deserialize::<TrackpointCsv>()
        .filter_map(|this| this.ok())
        .map(Trackpoint::from)
        .collect::<Vec<_>>();

    println!("Total: {} trackpoints", points.len());

    let trajectory = normalize(points).map_err(|e| format!("Unusable trace: {e}"))?;
    let summary = summarize(&trajectory);

    println!("Distance:  {:.2} km", summary.total_distance_meters / 1000.0);
    println!(
        "Moving:    {:.0} s of {:.0} s elapsed",
        summary.moving_seconds, summary.elapsed_seconds
    );
    println!(
        "Elevation: +{:.0} m / -{:.0} m",
        summary.elevation_gain_meters, summary.elevation_loss_meters
    );

    let targets = match target.is_empty() {
        true => target_ladder(summary.total_distance_meters, step * 1000.0, max * 1000.0),
        false => target.into_iter().map(|km| km * 1000.0).collect(),
    };

    if targets.is_empty() {
        println!("Trace is shorter than the smallest target, nothing to search");
        return Ok(());
    }

    for (target, segment) in fastest_segments(&trajectory, targets)? {
        match segment {
            Some(segment) => println!(
                "{:>6.1} km | {:7.1} s | {:5.2} km/h | samples {}..{}",
                target / 1000.0,
                segment.duration_seconds,
                segment.average_speed_kmh,
                segment.start_index,
                segment.end_index,
            ),
            None => println!("{:>6.1} km | trace too short", target / 1000.0),
        }
    }

    println!("Done!");

    Ok(())
}
