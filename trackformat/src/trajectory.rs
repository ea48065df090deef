//! `<trackid>_trajectory.json` files: a JSON array of
//! `{time, lat, lon, alt}` records

use crate::{FormatError, TRAJECTORY_FILE_SUFFIX};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};
use tracing::debug;
use tracktypes::prelude::*;

/// A trajectory waypoint as found on disk, tolerant of missing time and
/// altitude
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
pub struct WaypointRecord {
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(alias = "latitude")]
    pub lat: f64,
    #[serde(alias = "longitude")]
    pub lon: f64,
    #[serde(default, alias = "altitude")]
    pub alt: Option<f64>,
}

impl WaypointRecord {
    pub fn to_waypoint(&self, default_time: f64, default_alt: f64) -> Waypoint {
        Waypoint::new(
            self.time.unwrap_or(default_time),
            self.lat,
            self.lon,
            self.alt.unwrap_or(default_alt),
        )
    }
}

/// A trajectory file discovered in a directory
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct TrajectoryFile {
    pub track_id: TrackId,
    /// The id text exactly as it appears in the file name
    pub label: String,
    pub path: PathBuf,
}

impl TrajectoryFile {
    /// Recognizes `<trackid>_trajectory.json`, the track id is the text
    /// before the first '_'
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        if !name.ends_with(TRAJECTORY_FILE_SUFFIX) {
            return None;
        }
        let id = name.split('_').next()?;
        Some(Self {
            track_id: TrackId::from(id),
            label: id.to_owned(),
            path,
        })
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

pub fn trajectory_file_name(id: &TrackId) -> String {
    format!("{id}{TRAJECTORY_FILE_SUFFIX}")
}

/// Trajectory files in `dir`, sorted lexicographically by file name
pub fn list_trajectory_files<P: AsRef<Path>>(dir: P) -> Result<Vec<TrajectoryFile>, FormatError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir.as_ref())? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(f) = TrajectoryFile::from_path(entry.path()) {
            files.push(f);
        }
    }
    files.sort_by_key(|f| f.file_name());
    Ok(files)
}

pub fn read_trajectory<P: AsRef<Path>>(path: P) -> Result<Vec<WaypointRecord>, FormatError> {
    let f = File::open(path.as_ref())?;
    let waypoints = serde_json::from_reader(BufReader::new(f))?;
    Ok(waypoints)
}

pub fn write_trajectory<P: AsRef<Path>>(path: P, trajectory: &Trajectory) -> Result<(), FormatError> {
    let f = File::create(path.as_ref())?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, trajectory)?;
    w.flush()?;
    Ok(())
}

/// Write one file per trajectory into `dir` (created if needed), returns
/// the written paths
pub fn write_trajectory_dir<P: AsRef<Path>>(
    dir: P,
    trajectories: &BTreeMap<TrackId, Trajectory>,
) -> Result<Vec<PathBuf>, FormatError> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(trajectories.len());
    for (id, traj) in trajectories.iter() {
        let p = dir.join(trajectory_file_name(id));
        write_trajectory(&p, traj)?;
        debug!(track_id = %id, path = %p.display(), waypoints = traj.len(), "Wrote trajectory");
        paths.push(p);
    }
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_convention() {
        assert_eq!(
            trajectory_file_name(&TrackId::Numeric(7)),
            "00007_trajectory.json"
        );
        let f = TrajectoryFile::from_path(PathBuf::from("/tmp/10002_trajectory.json")).unwrap();
        assert_eq!(f.track_id, TrackId::Numeric(10002));
        assert_eq!(f.label, "10002");
        let f = TrajectoryFile::from_path(PathBuf::from("N123_trajectory.json")).unwrap();
        assert_eq!(f.track_id, TrackId::Label("N123".to_owned()));
        assert!(TrajectoryFile::from_path(PathBuf::from("10002.json")).is_none());
        assert!(TrajectoryFile::from_path(PathBuf::from("10002_trajectory.csv")).is_none());
    }

    #[test]
    fn tolerant_waypoints() {
        let w: Vec<WaypointRecord> =
            serde_json::from_str(r#"[{"latitude": 1.0, "longitude": 2.0}]"#).unwrap();
        assert_eq!(w[0].time, None);
        assert_eq!(w[0].alt, None);
        assert_eq!(w[0].to_waypoint(3.0, 116.0), Waypoint::new(3.0, 1.0, 2.0, 116.0));
    }
}
