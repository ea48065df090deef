//! Multi-track orchestration, independent or flying along an ownship

use crate::{
    geodesy::Lla,
    maneuver::{
        ownship_relative::{check_ownship, RelativeConfig},
        GeneratorConfig, LatLon, Maneuver, ManeuverGenerator, OwnshipRelativeGenerator,
        RelativeDirection, TrackSource,
    },
    track_point::{TrackIdentity, TrackPointFactory},
    units::{Angle, Length, Time},
    Error,
};
use chrono::{DateTime, Utc};
use oorandom::Rand64;
use std::{collections::BTreeMap, ops::RangeInclusive, path::Path, path::PathBuf};
use tracing::{debug, info};
use trackformat::{load_ownship, write_records_file, OwnshipFormat};
use tracktypes::prelude::*;

#[derive(Clone, PartialEq, Debug)]
pub struct OwnshipSource {
    pub path: PathBuf,
    pub format: OwnshipFormat,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct FlyAlong {
    /// Generated with the configured maneuver when absent
    pub ownship: Option<OwnshipSource>,
    pub direction: RelativeDirection,
    pub altitude_offset: Length,
}

/// Fully resolved generation parameters
#[derive(Clone, PartialEq, Debug)]
pub struct ArtificialTrackConfig {
    pub num_tracks: usize,
    pub maneuver: Maneuver,
    pub center: Lla,
    pub altitude_range: RangeInclusive<Length>,
    /// Latitude offset between independent track centers, and the
    /// fly-along separation once converted to ground distance
    pub separation: Angle,
    pub time_delay: Time,
    pub num_points: usize,
    pub interval: Time,
    pub fly_along: Option<FlyAlong>,
    pub base_track_id: u32,
    pub seed: u64,
    pub start_time: DateTime<Utc>,
}

#[derive(Debug)]
pub struct ArtificialTrackGenerator {
    config: ArtificialTrackConfig,
}

impl ArtificialTrackGenerator {
    pub fn new(config: ArtificialTrackConfig) -> Self {
        Self { config }
    }

    pub fn generate(&self) -> Result<Vec<Track>, Error> {
        let cfg = &self.config;
        info!(
            num_tracks = cfg.num_tracks,
            maneuver = %cfg.maneuver.kind(),
            fly_along = cfg.fly_along.is_some(),
            "Generating artificial tracks"
        );

        let tracks = match cfg.fly_along.as_ref() {
            None => (0..cfg.num_tracks)
                .map(|i| {
                    let offset = i as f64 * cfg.separation;
                    let center = LatLon::new(cfg.center.lat + offset.as_degrees(), cfg.center.lon);
                    self.maneuver_track(i, center)
                })
                .collect(),
            Some(fly_along) => self.fly_along_tracks(fly_along)?,
        };
        Ok(tracks)
    }

    fn fly_along_tracks(&self, fly_along: &FlyAlong) -> Result<Vec<Track>, Error> {
        let cfg = &self.config;
        let center = LatLon::new(cfg.center.lat, cfg.center.lon);
        let (ownship, reference) = match fly_along.ownship.as_ref() {
            Some(src) => {
                info!(
                    ownship = %src.path.display(),
                    format = %src.format,
                    "Loading ownship trajectory"
                );
                let reference = load_ownship(&src.path, src.format)?;
                check_ownship(&reference)?;
                (self.external_ownship_track(&reference), reference)
            }
            None => {
                let track = self.maneuver_track(0, center);
                let reference = track.to_trajectory();
                (track, reference)
            }
        };

        let mut tracks = Vec::with_capacity(cfg.num_tracks.max(1));
        tracks.push(ownship);
        for i in 1..cfg.num_tracks {
            let relative = OwnshipRelativeGenerator::new(
                &reference,
                RelativeConfig {
                    identity: TrackIdentity::artificial(self.track_id(i)),
                    start_time: self.start_time(i),
                    separation: cfg.separation.as_ground_distance(),
                    direction: fly_along.direction,
                    altitude_offset: fly_along.altitude_offset,
                    prng_seed: self.seed(i),
                },
            )?;
            tracks.push(relative.generate());
        }
        Ok(tracks)
    }

    fn maneuver_track(&self, idx: usize, center: LatLon) -> Track {
        let cfg = &self.config;
        ManeuverGenerator::new(GeneratorConfig {
            identity: TrackIdentity::artificial(self.track_id(idx)),
            maneuver: cfg.maneuver.clone(),
            center,
            altitude_range: cfg.altitude_range.clone(),
            num_points: cfg.num_points,
            interval: cfg.interval,
            start_time: self.start_time(idx),
            prng_seed: self.seed(idx),
        })
        .generate()
    }

    /// An externally supplied ownship keeps its own samples, only gaining
    /// the track annotations
    fn external_ownship_track(&self, reference: &Trajectory) -> Track {
        let cfg = &self.config;
        let mut prng = Rand64::new(self.seed(0).into());
        let factory = TrackPointFactory::new(
            TrackIdentity::artificial(self.track_id(0)),
            self.start_time(0),
            cfg.center.lat,
            cfg.center.lon,
        );
        let mut track = Track::with_capacity(factory.track_id().clone(), reference.len());
        for wp in reference {
            track.push(factory.create(wp.lat, wp.lon, wp.alt, Time::from_secs(wp.time), &mut prng));
        }
        debug!(track_id = %track.id(), points = track.len(), "Annotated external ownship");
        track
    }

    fn track_id(&self, idx: usize) -> u32 {
        self.config.base_track_id + idx as u32
    }

    fn start_time(&self, idx: usize) -> DateTime<Utc> {
        self.config.start_time + (idx as f64 * self.config.time_delay).as_chrono_duration()
    }

    fn seed(&self, idx: usize) -> u64 {
        self.config.seed.wrapping_add(idx as u64)
    }
}

/// Persist tracks as one flat record set, returns the row count
pub fn write_tracks_csv<P: AsRef<Path>>(path: P, tracks: &[Track]) -> Result<usize, Error> {
    let path = path.as_ref();
    let rows = write_records_file(path, tracks)?;
    info!(path = %path.display(), rows, tracks = tracks.len(), "Wrote track records");
    Ok(rows)
}

pub fn tracks_to_trajectories(tracks: &[Track]) -> BTreeMap<TrackId, Trajectory> {
    tracks
        .iter()
        .map(|t| (t.id().clone(), t.to_trajectory()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maneuver::ManeuverKind;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn config(kind: ManeuverKind) -> ArtificialTrackConfig {
        ArtificialTrackConfig {
            num_tracks: 3,
            maneuver: kind.with_defaults(),
            center: Lla::new(34.217411, -118.491081, 1000.0),
            altitude_range: Length::from_meters(900.0)..=Length::from_meters(1100.0),
            separation: Angle::from_degrees(0.005),
            time_delay: Time::from_secs(30.0),
            num_points: 10,
            interval: Time::from_secs(10.0),
            fly_along: None,
            base_track_id: 10000,
            seed: 0,
            start_time: Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn independent_tracks_are_offset() {
        let cfg = config(ManeuverKind::Circular);
        let start = cfg.start_time;
        let tracks = ArtificialTrackGenerator::new(cfg).generate().unwrap();
        assert_eq!(tracks.len(), 3);
        for (i, t) in tracks.iter().enumerate() {
            assert_eq!(t.id().as_numeric(), Some(10000 + i as u32));
            assert_eq!(t.start_time().unwrap(), start + chrono::Duration::seconds(30 * i as i64));
            // every point sits on the circle around its own center
            let center_lat = 34.217411 + 0.005 * i as f64;
            for p in t.points() {
                let r = ((p.latitude - center_lat).powi(2) + (p.longitude + 118.491081).powi(2)).sqrt();
                assert_relative_eq!(r, 0.005, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn fly_along_generated_ownship() {
        let mut cfg = config(ManeuverKind::Flyby);
        cfg.num_tracks = 2;
        cfg.fly_along = Some(FlyAlong::default());
        let tracks = ArtificialTrackGenerator::new(cfg).generate().unwrap();
        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[1].len(), tracks[0].len());
        for (own, rel) in tracks[0].points().iter().zip(tracks[1].points()) {
            assert_relative_eq!(rel.distance_m, 555.0, epsilon = 1e-6);
            assert_eq!(rel.altitude, own.altitude);
        }
    }

    #[test]
    fn seeds_differ_per_track() {
        let tracks = ArtificialTrackGenerator::new(config(ManeuverKind::Random))
            .generate()
            .unwrap();
        assert_ne!(tracks[0].points()[0].data, tracks[1].points()[0].data);
    }

    #[test]
    fn trajectories_by_id() {
        let tracks = ArtificialTrackGenerator::new(config(ManeuverKind::Spiral))
            .generate()
            .unwrap();
        let trajs = tracks_to_trajectories(&tracks);
        assert_eq!(trajs.len(), 3);
        let t = &trajs[&TrackId::Numeric(10001)];
        assert_eq!(t.len(), 10);
        assert_eq!(t.first().unwrap().time, 0.0);
        assert_relative_eq!(t.duration(), 90.0);
    }
}
