// cargo run --bin filter-tracks -- --lat 34.2 --lon -118.5 --range-km 25 tracks.csv /tmp/filtered.csv --trajectories /tmp/trajectories

use clap::Parser;
use std::{fs::File, path::PathBuf};
use tracing::info;

use scengen_lib::{filter::records_within_range, units::Length};
use trackformat::{
    read_records_file, records_to_trajectories, write_track_records, write_trajectory_dir,
};

/// Keep the track records within a great-circle range of a point
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Center latitude [deg]
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,

    /// Center longitude [deg]
    #[arg(long, allow_negative_numbers = true)]
    lon: f64,

    /// Range [km]
    #[arg(short = 'r', long)]
    range_km: f64,

    /// Also write per-track trajectory files of the kept records here
    #[arg(long)]
    trajectories: Option<PathBuf>,

    /// Input track record CSV
    input: PathBuf,

    /// Output track record CSV
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let records = read_records_file(&opts.input)?;
    let kept = records_within_range(
        &records,
        opts.lat,
        opts.lon,
        Length::from_kilometers(opts.range_km),
    );
    let rows = write_track_records(File::create(&opts.output)?, &kept)?;
    info!(
        input = records.len(),
        kept = rows,
        output = %opts.output.display(),
        "Filtered track records"
    );

    if let Some(dir) = opts.trajectories.as_ref() {
        let files = write_trajectory_dir(dir, &records_to_trajectories(&kept))?;
        info!(dir = %dir.display(), files = files.len(), "Wrote trajectory files");
    }

    Ok(())
}
