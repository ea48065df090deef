// cargo run --bin trajectory-ned -- --ref-lat 34.2 --ref-lon -118.5 /tmp/trajectories/10000_trajectory.json /tmp/10000_ned.csv

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use scengen_lib::{
    geodesy::{lla_to_ned, Lla},
    scenario::DEFAULT_ORIGIN_ALTITUDE,
};
use trackformat::read_trajectory;

/// Convert every waypoint of a trajectory file to north-east-down
/// coordinates relative to a reference point
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Reference latitude [deg], defaults to the first waypoint
    #[arg(long, requires = "ref_lon", allow_negative_numbers = true)]
    ref_lat: Option<f64>,

    /// Reference longitude [deg], defaults to the first waypoint
    #[arg(long, requires = "ref_lat", allow_negative_numbers = true)]
    ref_lon: Option<f64>,

    /// Reference altitude [m], defaults to the first waypoint
    #[arg(long, allow_negative_numbers = true)]
    ref_alt: Option<f64>,

    /// Input trajectory JSON file
    input: PathBuf,

    /// Output CSV file path to write
    output: PathBuf,
}

#[derive(serde::Serialize)]
struct Row {
    time: f64,
    lat: f64,
    lon: f64,
    alt: f64,
    north: f64,
    east: f64,
    down: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let waypoints: Vec<_> = read_trajectory(&opts.input)?
        .iter()
        .enumerate()
        .map(|(i, w)| w.to_waypoint(i as f64, DEFAULT_ORIGIN_ALTITUDE))
        .collect();
    let first = match waypoints.first() {
        Some(w) => w,
        None => return Err(format!("'{}' has no waypoints", opts.input.display()).into()),
    };

    let reference = Lla::new(
        opts.ref_lat.unwrap_or(first.lat),
        opts.ref_lon.unwrap_or(first.lon),
        opts.ref_alt.unwrap_or(first.alt),
    );
    info!(
        lat = reference.lat,
        lon = reference.lon,
        alt = reference.alt,
        "Using NED reference"
    );

    let mut w = csv::Writer::from_path(&opts.output)?;
    for wp in waypoints.iter() {
        let ned = lla_to_ned(&Lla::new(wp.lat, wp.lon, wp.alt), &reference);
        w.serialize(Row {
            time: wp.time,
            lat: wp.lat,
            lon: wp.lon,
            alt: wp.alt,
            north: ned.north,
            east: ned.east,
            down: ned.down,
        })?;
    }
    w.flush()?;

    info!(
        output = %opts.output.display(),
        waypoints = waypoints.len(),
        "Wrote NED trajectory"
    );
    Ok(())
}
