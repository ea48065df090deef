//! Flat, one-row-per-point track record CSV

use crate::{data::parse_track_data, parse_timestamp, FormatError, TRACK_APPENDED_EVENT};
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{self, BufReader},
    path::Path,
};
use tracing::{debug, warn};
use tracktypes::prelude::*;

/// One CSV row. Column order is the serialized field order.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRecord {
    pub event_name: String,
    pub track_id: String,
    pub source_id: String,
    pub track_type: String,
    pub timestamp: String,
    #[serde(default)]
    pub data: String,
    pub altitude_reference: String,
    pub source_track_id: String,
    pub longitude: f64,
    pub latitude: f64,
    #[serde(default)]
    pub altitude: Option<f64>,
    #[serde(default)]
    pub agl_altitude: Option<f64>,
    #[serde(default)]
    pub msl_altitude: Option<f64>,
    #[serde(default)]
    pub wgs84_altitude: Option<f64>,
    #[serde(default, rename = "distance_m")]
    pub distance_m: Option<f64>,
}

impl From<&TrackPoint> for TrackRecord {
    fn from(p: &TrackPoint) -> Self {
        TrackRecord {
            event_name: TRACK_APPENDED_EVENT.to_owned(),
            track_id: p.track_id.to_string(),
            source_id: p.source_id.clone(),
            track_type: p.track_type.clone(),
            timestamp: crate::format_timestamp(&p.timestamp),
            data: p.data.clone(),
            altitude_reference: p.altitude_reference.to_string(),
            source_track_id: p.source_track_id.clone(),
            longitude: p.longitude,
            latitude: p.latitude,
            altitude: Some(p.altitude),
            agl_altitude: Some(p.agl_altitude),
            msl_altitude: Some(p.msl_altitude),
            wgs84_altitude: Some(p.wgs84_altitude),
            distance_m: Some(p.distance_m),
        }
    }
}

impl TrackRecord {
    /// Best available height: MSL, then the reported altitude, then the
    /// barometric altitude embedded in the data payload
    pub fn height(&self) -> Option<f64> {
        self.msl_altitude.or(self.altitude).or_else(|| {
            parse_track_data(&self.data)
                .ok()
                .and_then(|d| d.alt_baro)
                .map(|a| a as f64)
        })
    }
}

/// Write every point of every track, returns the number of rows written
pub fn write_records<W: io::Write>(writer: W, tracks: &[Track]) -> Result<usize, FormatError> {
    let rows = tracks
        .iter()
        .flat_map(|t| t.points())
        .map(TrackRecord::from);
    write_rows(writer, rows)
}

/// Write already flattened records, e.g. a filtered subset of a file
pub fn write_track_records<W: io::Write>(writer: W, records: &[TrackRecord]) -> Result<usize, FormatError> {
    write_rows(writer, records.iter().cloned())
}

fn write_rows<W, I>(writer: W, rows: I) -> Result<usize, FormatError>
where
    W: io::Write,
    I: IntoIterator<Item = TrackRecord>,
{
    let mut w = csv::Writer::from_writer(writer);
    let mut count = 0;
    for row in rows {
        w.serialize(row)?;
        count += 1;
    }
    w.flush()?;
    Ok(count)
}

pub fn write_records_file<P: AsRef<Path>>(path: P, tracks: &[Track]) -> Result<usize, FormatError> {
    let f = File::create(path.as_ref())?;
    let rows = write_records(f, tracks)?;
    debug!(path = %path.as_ref().display(), rows, "Wrote track records");
    Ok(rows)
}

/// Read track records, rows that don't deserialize are skipped
pub fn read_records<R: io::Read>(reader: R) -> Result<Vec<TrackRecord>, FormatError> {
    let mut r = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for (idx, row) in r.deserialize::<TrackRecord>().enumerate() {
        match row {
            Ok(rec) => records.push(rec),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
            Err(e) => warn!(row = idx + 1, error = %e, "Skipping malformed track record"),
        }
    }
    Ok(records)
}

pub fn read_records_file<P: AsRef<Path>>(path: P) -> Result<Vec<TrackRecord>, FormatError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FormatError::NotFound(path.to_owned()));
    }
    let records = read_records(BufReader::new(File::open(path)?))?;
    debug!(path = %path.display(), rows = records.len(), "Read track records");
    Ok(records)
}

/// Group records by track id and project each group to a trajectory with
/// time relative to its earliest sample
pub fn records_to_trajectories(records: &[TrackRecord]) -> BTreeMap<TrackId, Trajectory> {
    let mut groups: BTreeMap<TrackId, Vec<_>> = BTreeMap::new();
    for rec in records.iter() {
        let t = match parse_timestamp(&rec.timestamp) {
            Ok(t) => t,
            Err(e) => {
                warn!(track_id = rec.track_id, error = %e, "Skipping record with invalid timestamp");
                continue;
            }
        };
        let height = match rec.height() {
            Some(h) => h,
            None => {
                warn!(track_id = rec.track_id, "Skipping record without any altitude");
                continue;
            }
        };
        groups
            .entry(TrackId::from(rec.track_id.as_str()))
            .or_default()
            .push((t, rec.latitude, rec.longitude, height));
    }

    groups
        .into_iter()
        .map(|(id, mut samples)| {
            samples.sort_by_key(|s| s.0);
            let t0 = samples[0].0;
            let traj = samples
                .into_iter()
                .map(|(t, lat, lon, alt)| {
                    let dt = (t - t0).num_milliseconds() as f64 / 1_000.0;
                    Waypoint::new(dt, lat, lon, alt)
                })
                .collect();
            (id, traj)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const CSV: &str = indoc! {"
        eventName,trackId,sourceId,trackType,timestamp,data,altitudeReference,sourceTrackId,longitude,latitude,altitude,aglAltitude,mslAltitude,wgs84Altitude,distance_m
        track.appended,10001,ARTIFICIAL,Surveillance,2024-07-25T18:21:21Z,Hex-ICAO:abcdef|Alt-Baro:900,MSL,ARTIFICIAL::10001,-118.2,33.7,900.0,315.0,905.0,850.0,12.5
        track.appended,10001,ARTIFICIAL,Surveillance,2024-07-25T18:21:11Z,Hex-ICAO:abcdef|Alt-Baro:901,MSL,ARTIFICIAL::10001,-118.1,33.6,901.0,,,,
        track.appended,10000,ARTIFICIAL,Surveillance,not-a-time,,MSL,ARTIFICIAL::10000,-118.0,33.5,1.0,,,,
        track.appended,10000,ARTIFICIAL,Surveillance,2024-07-25T18:21:11Z,Alt-Baro:777,MSL,ARTIFICIAL::10000,-118.0,33.5,,,,,
    "};

    #[test]
    fn groups_sorts_and_relativizes() {
        let records = read_records(CSV.as_bytes()).unwrap();
        assert_eq!(records.len(), 4);

        let trajs = records_to_trajectories(&records);
        assert_eq!(trajs.len(), 2);

        let t = &trajs[&TrackId::Numeric(10001)];
        assert_eq!(t.len(), 2);
        assert_eq!(t.waypoints()[0], Waypoint::new(0.0, 33.6, -118.1, 901.0));
        assert_eq!(t.waypoints()[1], Waypoint::new(10.0, 33.7, -118.2, 905.0));

        // Only the record with a valid timestamp survives, height comes from the payload
        let t = &trajs[&TrackId::Numeric(10000)];
        assert_eq!(t.len(), 1);
        assert_eq!(t.waypoints()[0].alt, 777.0);
    }

    #[test]
    fn malformed_rows_are_skipped() {
        let csv = indoc! {"
            eventName,trackId,sourceId,trackType,timestamp,data,altitudeReference,sourceTrackId,longitude,latitude
            track.appended,1,S,T,2024-07-25T18:21:11Z,,MSL,S::1,not-a-number,33.5
            track.appended,1,S,T,2024-07-25T18:21:11Z,,MSL,S::1,-118.0,33.5
        "};
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].altitude, None);
        assert_eq!(records[0].height(), None);
    }
}
