//! Parametric maneuver laws and the generators that turn them into tracks

use crate::{
    track_point::{TrackIdentity, TrackPointFactory},
    units::{Length, Time},
    Error,
};
use chrono::{DateTime, Utc};
use oorandom::Rand64;
use serde::Deserialize;
use std::{fmt, ops::RangeInclusive, str::FromStr};
use tracing::debug;
use tracktypes::prelude::*;

pub use self::ownship_relative::{OwnshipRelativeGenerator, RelativeDirection};
pub use self::shapes::{
    Circular, Elliptical, Flyby, RandomJitter, Rectangle, Spiral, Square, Zigzag,
};

pub mod ownship_relative;
pub mod shapes;

/// Horizontal position [deg]
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn offset(&self, d_lat: f64, d_lon: f64) -> Self {
        Self::new(self.lat + d_lat, self.lon + d_lon)
    }
}

/// A parametric horizontal path around a center point
pub trait ManeuverLaw {
    /// Positions for a track of `num_points` samples. Polygon laws may
    /// return fewer.
    fn path(&self, center: LatLon, num_points: usize, prng: &mut Rand64) -> Vec<LatLon>;
}

/// Anything that produces one complete track
pub trait TrackSource {
    fn generate(self) -> Track;
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum ManeuverKind {
    Random,
    Circular,
    Elliptical,
    Flyby,
    Square,
    Rectangle,
    Zigzag,
    Spiral,
}

impl ManeuverKind {
    pub const ALL: [ManeuverKind; 8] = [
        ManeuverKind::Random,
        ManeuverKind::Circular,
        ManeuverKind::Elliptical,
        ManeuverKind::Flyby,
        ManeuverKind::Square,
        ManeuverKind::Rectangle,
        ManeuverKind::Zigzag,
        ManeuverKind::Spiral,
    ];

    pub fn name(self) -> &'static str {
        use ManeuverKind::*;
        match self {
            Random => "random",
            Circular => "circular",
            Elliptical => "elliptical",
            Flyby => "flyby",
            Square => "square",
            Rectangle => "rectangle",
            Zigzag => "zigzag",
            Spiral => "spiral",
        }
    }

    /// This kind with its default shape parameters
    pub fn with_defaults(self) -> Maneuver {
        use ManeuverKind::*;
        match self {
            Random => Maneuver::Random(Default::default()),
            Circular => Maneuver::Circular(Default::default()),
            Elliptical => Maneuver::Elliptical(Default::default()),
            Flyby => Maneuver::Flyby(Default::default()),
            Square => Maneuver::Square(Default::default()),
            Rectangle => Maneuver::Rectangle(Default::default()),
            Zigzag => Maneuver::Zigzag(Default::default()),
            Spiral => Maneuver::Spiral(Default::default()),
        }
    }
}

impl fmt::Display for ManeuverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ManeuverKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ManeuverKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownManeuver(s.to_owned()))
    }
}

/// A maneuver kind together with its shape parameters
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Maneuver {
    Random(RandomJitter),
    Circular(Circular),
    Elliptical(Elliptical),
    Flyby(Flyby),
    Square(Square),
    Rectangle(Rectangle),
    Zigzag(Zigzag),
    Spiral(Spiral),
}

impl Default for Maneuver {
    fn default() -> Self {
        Maneuver::Random(Default::default())
    }
}

impl Maneuver {
    pub fn kind(&self) -> ManeuverKind {
        match self {
            Maneuver::Random(_) => ManeuverKind::Random,
            Maneuver::Circular(_) => ManeuverKind::Circular,
            Maneuver::Elliptical(_) => ManeuverKind::Elliptical,
            Maneuver::Flyby(_) => ManeuverKind::Flyby,
            Maneuver::Square(_) => ManeuverKind::Square,
            Maneuver::Rectangle(_) => ManeuverKind::Rectangle,
            Maneuver::Zigzag(_) => ManeuverKind::Zigzag,
            Maneuver::Spiral(_) => ManeuverKind::Spiral,
        }
    }

    fn law(&self) -> &dyn ManeuverLaw {
        match self {
            Maneuver::Random(m) => m,
            Maneuver::Circular(m) => m,
            Maneuver::Elliptical(m) => m,
            Maneuver::Flyby(m) => m,
            Maneuver::Square(m) => m,
            Maneuver::Rectangle(m) => m,
            Maneuver::Zigzag(m) => m,
            Maneuver::Spiral(m) => m,
        }
    }
}

impl ManeuverLaw for Maneuver {
    fn path(&self, center: LatLon, num_points: usize, prng: &mut Rand64) -> Vec<LatLon> {
        self.law().path(center, num_points, prng)
    }
}

/// Everything one maneuver track needs, consumed by a single generation
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    pub identity: TrackIdentity,
    pub maneuver: Maneuver,
    pub center: LatLon,
    pub altitude_range: RangeInclusive<Length>,
    pub num_points: usize,
    pub interval: Time,
    pub start_time: DateTime<Utc>,
    pub prng_seed: u64,
}

#[derive(Debug)]
pub struct ManeuverGenerator {
    config: GeneratorConfig,
}

impl ManeuverGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        debug_assert!(config.altitude_range.start() <= config.altitude_range.end());
        Self { config }
    }
}

impl TrackSource for ManeuverGenerator {
    fn generate(self) -> Track {
        let cfg = self.config;
        let mut prng = Rand64::new(cfg.prng_seed.into());
        let factory = TrackPointFactory::new(
            cfg.identity,
            cfg.start_time,
            cfg.center.lat,
            cfg.center.lon,
        );

        let path = cfg.maneuver.path(cfg.center, cfg.num_points, &mut prng);
        let mut track = Track::with_capacity(factory.track_id().clone(), path.len());
        for (idx, pos) in path.into_iter().enumerate() {
            let alt = gen_altitude(&mut prng, &cfg.altitude_range);
            let t = idx as f64 * cfg.interval;
            track.push(factory.create(pos.lat, pos.lon, alt.as_meters(), t, &mut prng));
        }

        debug!(
            track_id = %track.id(),
            maneuver = %cfg.maneuver.kind(),
            points = track.len(),
            "Generated maneuver track"
        );
        track
    }
}

/// Independent uniform draw per point, no smoothing between samples
pub(crate) fn gen_altitude(prng: &mut Rand64, range: &RangeInclusive<Length>) -> Length {
    let (lo, hi) = (range.start().as_meters(), range.end().as_meters());
    Length::from_meters((lo + prng.rand_float() * (hi - lo)).clamp(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geodesy::haversine_distance;
    use chrono::TimeZone;

    fn config(maneuver: Maneuver, num_points: usize) -> GeneratorConfig {
        GeneratorConfig {
            identity: TrackIdentity::artificial(10000),
            maneuver,
            center: LatLon::new(34.217411, -118.491081),
            altitude_range: Length::from_meters(900.0)..=Length::from_meters(1100.0),
            num_points,
            interval: Time::from_secs(10.0),
            start_time: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            prng_seed: 3,
        }
    }

    #[test]
    fn kind_names() {
        for k in ManeuverKind::ALL {
            assert_eq!(k.name().parse::<ManeuverKind>().unwrap(), k);
            assert_eq!(k.with_defaults().kind(), k);
        }
        assert_eq!("Circular".parse::<ManeuverKind>().unwrap(), ManeuverKind::Circular);
        assert!(matches!(
            "loop-de-loop".parse::<ManeuverKind>(),
            Err(Error::UnknownManeuver(s)) if s == "loop-de-loop"
        ));
    }

    #[test]
    fn altitude_bounds_for_all_maneuvers() {
        for k in ManeuverKind::ALL {
            let track = ManeuverGenerator::new(config(k.with_defaults(), 25)).generate();
            assert!(!track.is_empty());
            for p in track.points() {
                assert!((900.0..=1100.0).contains(&p.altitude), "{k}: {}", p.altitude);
                assert_eq!(p.msl_altitude, p.altitude);
            }
        }
    }

    #[test]
    fn degenerate_altitude_band() {
        let mut cfg = config(Maneuver::default(), 5);
        cfg.altitude_range = Length::from_meters(500.0)..=Length::from_meters(500.0);
        let track = ManeuverGenerator::new(cfg).generate();
        assert!(track.points().iter().all(|p| p.altitude == 500.0));
    }

    #[test]
    fn timestamps_follow_interval() {
        let cfg = config(ManeuverKind::Spiral.with_defaults(), 6);
        let start = cfg.start_time;
        let track = ManeuverGenerator::new(cfg).generate();
        for (i, p) in track.points().iter().enumerate() {
            assert_eq!((p.timestamp - start).num_seconds(), 10 * i as i64);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = ManeuverGenerator::new(config(Maneuver::default(), 10)).generate();
        let b = ManeuverGenerator::new(config(Maneuver::default(), 10)).generate();
        assert_eq!(a, b);

        let mut cfg = config(Maneuver::default(), 10);
        cfg.prng_seed = 4;
        let c = ManeuverGenerator::new(cfg).generate();
        assert_ne!(a, c);
    }

    #[test]
    fn distance_is_from_center() {
        let cfg = config(ManeuverKind::Circular.with_defaults(), 8);
        let center = cfg.center;
        let track = ManeuverGenerator::new(cfg).generate();
        for p in track.points() {
            let d = haversine_distance(center.lat, center.lon, p.latitude, p.longitude);
            assert_eq!(p.distance_m, d);
        }
    }
}
