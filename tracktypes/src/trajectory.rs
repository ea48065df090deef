use derive_more::Display;
use serde::{Deserialize, Serialize};

/// One sample of a simplified trajectory
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Display, Serialize, Deserialize)]
#[display(fmt = "{{t: {}, lat: {}, lon: {}, alt: {}}}", "time", "lat", "lon", "alt")]
pub struct Waypoint {
    /// Relative time [s]
    pub time: f64,
    /// [deg]
    pub lat: f64,
    /// [deg]
    pub lon: f64,
    /// [m]
    pub alt: f64,
}

impl Waypoint {
    pub fn new(time: f64, lat: f64, lon: f64, alt: f64) -> Self {
        Self {
            time,
            lat,
            lon,
            alt,
        }
    }
}

/// Time-ordered waypoints, the unit of exchange with scenario assembly.
///
/// Serializes as a bare JSON array.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory {
    waypoints: Vec<Waypoint>,
}

impl Trajectory {
    pub fn new(waypoints: Vec<Waypoint>) -> Self {
        Self { waypoints }
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn first(&self) -> Option<&Waypoint> {
        self.waypoints.first()
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    /// Total duration [s], zero for fewer than two waypoints
    pub fn duration(&self) -> f64 {
        match (self.waypoints.first(), self.waypoints.last()) {
            (Some(a), Some(b)) => b.time - a.time,
            _ => 0.0,
        }
    }
}

impl FromIterator<Waypoint> for Trajectory {
    fn from_iter<T: IntoIterator<Item = Waypoint>>(iter: T) -> Self {
        Self {
            waypoints: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Trajectory {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}
