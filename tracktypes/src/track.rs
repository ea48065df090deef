use crate::{
    track_id::TrackId,
    trajectory::{Trajectory, Waypoint},
};
use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Vertical datum the reported `altitude` refers to
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Display)]
#[derive(Serialize, Deserialize)]
pub enum AltitudeReference {
    #[default]
    #[display(fmt = "MSL")]
    #[serde(rename = "MSL")]
    Msl,
    #[display(fmt = "AGL")]
    #[serde(rename = "AGL")]
    Agl,
    #[display(fmt = "WGS84")]
    #[serde(rename = "WGS84")]
    Wgs84,
}

/// One annotated surveillance sample
#[derive(Clone, PartialEq, Debug, Display)]
#[display(
    fmt = "{{track: {}, t: {}, lat: {}, lon: {}, alt: {}, ...}}",
    "track_id",
    "timestamp",
    "latitude",
    "longitude",
    "altitude"
)]
pub struct TrackPoint {
    pub track_id: TrackId,
    pub source_id: String,
    pub track_type: String,
    pub altitude_reference: AltitudeReference,
    /// `<source_id>::<track_id>`
    pub source_track_id: String,

    /// Absolute time of the sample
    pub timestamp: DateTime<Utc>,

    /// Free-text payload, see `trackformat::data`
    pub data: String,

    /// Geodetic latitude [deg]
    pub latitude: f64,
    /// Geodetic longitude [deg]
    pub longitude: f64,
    /// [m]
    pub altitude: f64,

    /// Above ground level [m]
    pub agl_altitude: f64,
    /// Mean sea level [m]
    pub msl_altitude: f64,
    /// Height above the WGS84 ellipsoid [m]
    pub wgs84_altitude: f64,

    /// Ground distance from the generator's reference point [m]
    pub distance_m: f64,
}

/// An ordered sequence of points sharing one track id
#[derive(Clone, PartialEq, Debug)]
pub struct Track {
    id: TrackId,
    points: Vec<TrackPoint>,
}

impl Track {
    pub fn new(id: TrackId) -> Self {
        Self {
            id,
            points: Vec::new(),
        }
    }

    pub fn with_capacity(id: TrackId, capacity: usize) -> Self {
        Self {
            id,
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn id(&self) -> &TrackId {
        &self.id
    }

    pub fn points(&self) -> &[TrackPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a point.
    ///
    /// Panics if the point belongs to another track or would break the
    /// time ordering, both are generator bugs.
    pub fn push(&mut self, point: TrackPoint) {
        assert_eq!(point.track_id, self.id, "Track point has a foreign track id");
        if let Some(last) = self.points.last() {
            assert!(
                point.timestamp > last.timestamp,
                "Track points must be strictly time-ordered"
            );
        }
        self.points.push(point);
    }

    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        self.points.first().map(|p| p.timestamp)
    }

    /// Time/position-only projection, time relative to the first point
    pub fn to_trajectory(&self) -> Trajectory {
        let t0 = match self.start_time() {
            Some(t) => t,
            None => return Trajectory::default(),
        };
        self.points
            .iter()
            .map(|p| {
                let dt = p.timestamp - t0;
                let time = dt
                    .num_microseconds()
                    .map(|us| us as f64 / 1_000_000.0)
                    .unwrap_or_else(|| dt.num_milliseconds() as f64 / 1_000.0);
                Waypoint::new(time, p.latitude, p.longitude, p.msl_altitude)
            })
            .collect()
    }
}

impl IntoIterator for Track {
    type Item = TrackPoint;
    type IntoIter = std::vec::IntoIter<TrackPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn point(id: u32, secs: i64, lat: f64) -> TrackPoint {
        let t0 = Utc.with_ymd_and_hms(2024, 7, 25, 18, 21, 11).unwrap();
        TrackPoint {
            track_id: TrackId::from(id),
            source_id: "ARTIFICIAL".to_owned(),
            track_type: "Surveillance".to_owned(),
            altitude_reference: AltitudeReference::Msl,
            source_track_id: format!("ARTIFICIAL::{id}"),
            timestamp: t0 + Duration::seconds(secs),
            data: String::new(),
            latitude: lat,
            longitude: -118.0,
            altitude: 1000.0,
            agl_altitude: 350.0,
            msl_altitude: 1000.0,
            wgs84_altitude: 950.0,
            distance_m: 0.0,
        }
    }

    #[test]
    fn trajectory_projection_is_relative() {
        let mut track = Track::new(TrackId::Numeric(10000));
        track.push(point(10000, 30, 34.0));
        track.push(point(10000, 40, 34.1));
        track.push(point(10000, 55, 34.2));
        let traj = track.to_trajectory();
        let times: Vec<f64> = traj.waypoints().iter().map(|w| w.time).collect();
        assert_eq!(times, vec![0.0, 10.0, 25.0]);
        assert_eq!(traj.waypoints()[2].lat, 34.2);
        assert_eq!(traj.waypoints()[0].alt, 1000.0);
    }

    #[test]
    #[should_panic(expected = "strictly time-ordered")]
    fn rejects_out_of_order_points() {
        let mut track = Track::new(TrackId::Numeric(1));
        track.push(point(1, 10, 0.0));
        track.push(point(1, 10, 0.0));
    }

    #[test]
    fn altitude_reference_display() {
        assert_eq!(AltitudeReference::Msl.to_string(), "MSL");
        assert_eq!(AltitudeReference::Wgs84.to_string(), "WGS84");
    }
}
