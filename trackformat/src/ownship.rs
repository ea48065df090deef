//! External ownship trajectories for fly-along generation

use crate::FormatError;
use serde::Deserialize;
use std::{fmt, fs::File, io::BufReader, path::Path, str::FromStr};
use tracing::{debug, info};
use tracktypes::prelude::*;

/// Sample spacing assumed for JSON ownship records without a time [s]
pub const DEFAULT_JSON_SAMPLE_INTERVAL: f64 = 10.0;

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OwnshipFormat {
    #[default]
    Json,
    Csv,
}

impl FromStr for OwnshipFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OwnshipFormat::Json),
            "csv" => Ok(OwnshipFormat::Csv),
            _ => Err(FormatError::UnsupportedOwnshipFormat(s.to_owned())),
        }
    }
}

impl fmt::Display for OwnshipFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OwnshipFormat::Json => "json",
            OwnshipFormat::Csv => "csv",
        })
    }
}

/// Load an ownship trajectory.
///
/// JSON: an array of objects with `lat`/`latitude`, `lon`/`longitude`,
/// `alt`/`altitude` and an optional `time`.
///
/// CSV: no header, columns `lat,lon,alt[,time]`. Rows whose first three
/// columns aren't numeric are skipped, a missing time is the row index.
pub fn load_ownship<P: AsRef<Path>>(path: P, format: OwnshipFormat) -> Result<Trajectory, FormatError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FormatError::NotFound(path.to_path_buf()));
    }
    info!(path = %path.display(), ?format, "Loading ownship trajectory");
    let f = File::open(path)?;
    match format {
        OwnshipFormat::Json => load_json(BufReader::new(f)),
        OwnshipFormat::Csv => load_csv(f),
    }
}

fn load_json<R: std::io::Read>(reader: R) -> Result<Trajectory, FormatError> {
    #[derive(Deserialize)]
    struct Sample {
        #[serde(default)]
        time: Option<f64>,
        #[serde(alias = "latitude")]
        lat: f64,
        #[serde(alias = "longitude")]
        lon: f64,
        #[serde(alias = "altitude")]
        alt: f64,
    }

    let samples: Vec<Sample> = serde_json::from_reader(reader)?;
    Ok(samples
        .into_iter()
        .enumerate()
        .map(|(i, s)| {
            let time = s
                .time
                .unwrap_or(i as f64 * DEFAULT_JSON_SAMPLE_INTERVAL);
            Waypoint::new(time, s.lat, s.lon, s.alt)
        })
        .collect())
}

fn load_csv<R: std::io::Read>(reader: R) -> Result<Trajectory, FormatError> {
    let mut r = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut waypoints = Vec::new();
    for (idx, row) in r.records().enumerate() {
        let row = row?;
        let num = |i: usize| row.get(i).and_then(|v| v.trim().parse::<f64>().ok());
        let (lat, lon, alt) = match (num(0), num(1), num(2)) {
            (Some(lat), Some(lon), Some(alt)) => (lat, lon, alt),
            _ => {
                debug!(row = idx, "Skipping non-numeric ownship row");
                continue;
            }
        };
        let time = num(3).unwrap_or(idx as f64);
        waypoints.push(Waypoint::new(time, lat, lon, alt));
    }
    Ok(Trajectory::new(waypoints))
}
