//! Tracks that hold a fixed separation from an ownship trajectory

use super::TrackSource;
use crate::{
    geodesy::{bearing_between_points, destination_point},
    track_point::{TrackIdentity, TrackPointFactory},
    units::{Length, Time},
    Error,
};
use chrono::{DateTime, Utc};
use oorandom::Rand64;
use serde::Deserialize;
use std::fmt;
use tracing::debug;
use tracktypes::prelude::*;

/// Where the relative track sits with respect to the ownship heading
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum RelativeDirection {
    #[default]
    Ahead,
    Behind,
    Opposite,
}

impl RelativeDirection {
    /// (bearing [deg], signed distance) of the offset for a given heading
    pub fn offset(self, heading: f64, separation: Length) -> (f64, f64) {
        let d = separation.as_meters();
        match self {
            RelativeDirection::Ahead => (heading, d),
            RelativeDirection::Behind => (heading, -d),
            RelativeDirection::Opposite => ((heading + 180.0).rem_euclid(360.0), d),
        }
    }
}

impl fmt::Display for RelativeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RelativeDirection::Ahead => "ahead",
            RelativeDirection::Behind => "behind",
            RelativeDirection::Opposite => "opposite",
        })
    }
}

#[derive(Clone, Debug)]
pub struct RelativeConfig {
    pub identity: TrackIdentity,
    pub start_time: DateTime<Utc>,
    pub separation: Length,
    pub direction: RelativeDirection,
    pub altitude_offset: Length,
    pub prng_seed: u64,
}

#[derive(Debug)]
pub struct OwnshipRelativeGenerator<'a> {
    ownship: &'a Trajectory,
    config: RelativeConfig,
}

impl<'a> OwnshipRelativeGenerator<'a> {
    pub fn new(ownship: &'a Trajectory, config: RelativeConfig) -> Result<Self, Error> {
        check_ownship(ownship)?;
        Ok(Self { ownship, config })
    }

    /// Heading [deg] at each ownship sample. Toward the next sample, the
    /// final sample reuses the previous heading.
    fn headings(&self) -> Vec<f64> {
        let wps = self.ownship.waypoints();
        let mut headings: Vec<f64> = wps
            .windows(2)
            .map(|w| bearing_between_points(w[0].lat, w[0].lon, w[1].lat, w[1].lon))
            .collect();
        headings.push(headings.last().copied().unwrap_or(0.0));
        headings
    }
}

impl<'a> TrackSource for OwnshipRelativeGenerator<'a> {
    fn generate(self) -> Track {
        let cfg = &self.config;
        let mut prng = Rand64::new(cfg.prng_seed.into());
        let factory = TrackPointFactory::new(cfg.identity.clone(), cfg.start_time, 0.0, 0.0);

        let mut track = Track::with_capacity(factory.track_id().clone(), self.ownship.len());
        for (wp, heading) in self.ownship.waypoints().iter().zip(self.headings()) {
            let (bearing, distance) = cfg.direction.offset(heading, cfg.separation);
            let (lat, lon) = destination_point(wp.lat, wp.lon, bearing, distance);
            let alt = wp.alt + cfg.altitude_offset.as_meters();
            track.push(factory.create_relative_to(
                lat,
                lon,
                alt,
                Time::from_secs(wp.time),
                (wp.lat, wp.lon),
                &mut prng,
            ));
        }

        debug!(
            track_id = %track.id(),
            direction = %cfg.direction,
            separation = ?cfg.separation,
            "Generated ownship-relative track"
        );
        track
    }
}

/// Ownship samples must exist and be strictly time-ordered at timestamp
/// resolution
pub(crate) fn check_ownship(ownship: &Trajectory) -> Result<(), Error> {
    if ownship.is_empty() {
        return Err(Error::EmptyOwnship);
    }
    let stamp = |wp: &Waypoint| Time::from_secs(wp.time).as_chrono_duration();
    let wps = ownship.waypoints();
    match wps.windows(2).position(|w| stamp(&w[1]) <= stamp(&w[0])) {
        Some(idx) => Err(Error::UnorderedOwnship(idx + 1)),
        None => Ok(()),
    }
}
