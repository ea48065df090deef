//! TOML configuration, resolved against defaults once at load time

use crate::{
    generator::{ArtificialTrackConfig, FlyAlong, OwnshipSource},
    geodesy::Lla,
    maneuver::{Maneuver, RelativeDirection},
    scenario::{
        self, AssemblerConfig, Sensor, SensorTargets, SensorTransform, DEFAULT_CAMERA_NAME,
    },
    units::{Angle, Length, Time},
};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::{
    collections::{BTreeMap, HashSet},
    fs,
    path::{Path, PathBuf},
};
use trackformat::{parse_timestamp, OwnshipFormat};
use tracktypes::prelude::TrackId;

pub const DEFAULT_NUM_TRACKS: usize = 3;
pub const DEFAULT_CENTER_LATITUDE: f64 = 34.217411;
pub const DEFAULT_CENTER_LONGITUDE: f64 = -118.491081;
pub const DEFAULT_CENTER_ALTITUDE: f64 = 1000.0;
pub const DEFAULT_SEPARATION_DEG: f64 = 0.005;
pub const DEFAULT_TIME_DELAY_SECS: f64 = 30.0;
pub const DEFAULT_NUM_POINTS: usize = 10;
pub const DEFAULT_INTERVAL_SECS: f64 = 10.0;
/// Track point timestamps have microsecond resolution
pub const MIN_INTERVAL_SECS: f64 = 1e-6;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file. {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file. {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration. {0}")]
    Invalid(String),
}

#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub name: Option<String>,
    pub tracks: TracksConfig,
    pub scenario: ScenarioConfig,
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_str_checked(&content)
    }

    pub fn from_str_checked(s: &str) -> Result<Self, ConfigError> {
        let cfg: Config = toml::from_str(s)?;
        cfg.tracks.check()?;
        cfg.scenario.assembler_config()?;
        Ok(cfg)
    }

    pub fn track_generator_config(&self) -> Result<ArtificialTrackConfig, ConfigError> {
        self.tracks.resolve(Utc::now())
    }

    pub fn assembler_config(&self) -> Result<AssemblerConfig, ConfigError> {
        self.scenario.assembler_config()
    }
}

/// `[tracks]`
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TracksConfig {
    pub num_tracks: Option<usize>,
    pub maneuver: Option<Maneuver>,
    pub center_latitude: Option<f64>,
    pub center_longitude: Option<f64>,
    pub center_altitude: Option<Length>,
    /// Defaults to the center altitude
    pub min_altitude: Option<Length>,
    /// Defaults to the center altitude
    pub max_altitude: Option<Length>,
    /// [deg]
    pub separation: Option<Angle>,
    pub time_delay: Option<Time>,
    pub num_points: Option<usize>,
    pub interval: Option<Time>,
    pub fly_along: Option<bool>,
    pub ownship_file: Option<PathBuf>,
    pub ownship_format: Option<String>,
    pub relative_direction: Option<RelativeDirection>,
    pub altitude_offset: Option<Length>,
    pub base_track_id: Option<u32>,
    pub seed: Option<u64>,
    /// RFC 3339, defaults to the time of resolution
    pub start_time: Option<String>,
}

impl TracksConfig {
    fn check(&self) -> Result<(), ConfigError> {
        self.resolve(DateTime::<Utc>::default()).map(|_| ())
    }

    /// Resolve against defaults, `now` stands in for a missing start time
    pub fn resolve(&self, now: DateTime<Utc>) -> Result<ArtificialTrackConfig, ConfigError> {
        let invalid = |msg: String| Err(ConfigError::Invalid(msg));

        let num_tracks = self.num_tracks.unwrap_or(DEFAULT_NUM_TRACKS);
        if num_tracks == 0 {
            return invalid("num-tracks must be at least 1".to_owned());
        }
        let num_points = self.num_points.unwrap_or(DEFAULT_NUM_POINTS);
        if num_points == 0 {
            return invalid("num-points must be at least 1".to_owned());
        }
        let interval = self
            .interval
            .unwrap_or_else(|| Time::from_secs(DEFAULT_INTERVAL_SECS));
        if interval.as_secs().is_nan() || interval.as_secs() < MIN_INTERVAL_SECS {
            return invalid(format!(
                "interval must be at least {MIN_INTERVAL_SECS} s, got {interval:?}"
            ));
        }
        let time_delay = self
            .time_delay
            .unwrap_or_else(|| Time::from_secs(DEFAULT_TIME_DELAY_SECS));
        if time_delay.as_secs().is_nan() || time_delay.as_secs() < 0.0 {
            return invalid(format!("time-delay must not be negative, got {time_delay:?}"));
        }

        let center_alt = self
            .center_altitude
            .unwrap_or_else(|| Length::from_meters(DEFAULT_CENTER_ALTITUDE));
        let min_alt = self.min_altitude.unwrap_or(center_alt);
        let max_alt = self.max_altitude.unwrap_or(center_alt);
        if min_alt > max_alt {
            return invalid(format!(
                "min-altitude ({min_alt:?}) is above max-altitude ({max_alt:?})"
            ));
        }

        let base_track_id = self.base_track_id.unwrap_or(TrackId::DEFAULT_BASE);
        if base_track_id.checked_add(num_tracks as u32).is_none() {
            return invalid(format!("base-track-id {base_track_id} overflows"));
        }

        let fly_along = if self.fly_along.unwrap_or(false) {
            let ownship = match self.ownship_file.as_ref() {
                Some(path) => {
                    let format = match self.ownship_format.as_deref() {
                        Some(f) => f
                            .parse::<OwnshipFormat>()
                            .map_err(|e| ConfigError::Invalid(e.to_string()))?,
                        None => OwnshipFormat::default(),
                    };
                    Some(OwnshipSource {
                        path: path.clone(),
                        format,
                    })
                }
                None => None,
            };
            Some(FlyAlong {
                ownship,
                direction: self.relative_direction.unwrap_or_default(),
                altitude_offset: self.altitude_offset.unwrap_or_default(),
            })
        } else {
            None
        };

        let start_time = match self.start_time.as_deref() {
            Some(s) => parse_timestamp(s).map_err(|e| ConfigError::Invalid(e.to_string()))?,
            None => now,
        };

        // The latest point of the last track must stay representable
        let span = |step: Time, count: usize| {
            (count.saturating_sub(1) as f64 * step).as_chrono_duration()
        };
        let last_time = span(interval, num_points)
            .checked_add(&span(time_delay, num_tracks))
            .and_then(|d| start_time.checked_add_signed(d));
        if last_time.is_none() {
            return invalid(format!(
                "track timestamps overflow with interval {interval:?} and time-delay {time_delay:?}"
            ));
        }

        Ok(ArtificialTrackConfig {
            num_tracks,
            maneuver: self.maneuver.clone().unwrap_or_default(),
            center: Lla::new(
                self.center_latitude.unwrap_or(DEFAULT_CENTER_LATITUDE),
                self.center_longitude.unwrap_or(DEFAULT_CENTER_LONGITUDE),
                center_alt.as_meters(),
            ),
            altitude_range: min_alt..=max_alt,
            separation: self
                .separation
                .unwrap_or_else(|| Angle::from_degrees(DEFAULT_SEPARATION_DEG)),
            time_delay,
            num_points,
            interval,
            fly_along,
            base_track_id,
            seed: self.seed.unwrap_or(0),
            start_time,
        })
    }
}

/// `[scenario]`
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ScenarioConfig {
    pub description: Option<String>,
    pub trajectory_follower_model: Option<String>,
    pub weather_preset: Option<String>,
    /// Actor names, e.g. `actor10001`
    #[serde(alias = "sensor-target")]
    pub sensor_targets: Vec<String>,
    /// Regex over actor names, exclusive with `sensor-targets`
    pub sensor_targets_matching: Option<String>,
    /// Replaces the default camera when present, even if empty
    #[serde(alias = "sensor")]
    pub sensors: Option<Vec<SensorConfig>>,
    pub active_camera: Option<String>,
}

impl ScenarioConfig {
    pub fn assembler_config(&self) -> Result<AssemblerConfig, ConfigError> {
        let matching = self.sensor_targets_matching.as_ref();
        let sensor_targets = match (self.sensor_targets.is_empty(), matching) {
            (true, None) => SensorTargets::FirstActor,
            (false, None) => SensorTargets::Named(self.sensor_targets.clone()),
            (true, Some(re)) => SensorTargets::Matching(
                Regex::new(re).map_err(|e| ConfigError::Invalid(e.to_string()))?,
            ),
            (false, Some(_)) => {
                return Err(ConfigError::Invalid(
                    "sensor-targets and sensor-targets-matching are mutually exclusive".to_owned(),
                ))
            }
        };

        let sensors = match self.sensors.as_ref() {
            Some(s) => s.iter().cloned().map(Sensor::from).collect(),
            None => scenario::default_sensors(),
        };
        let mut names = HashSet::new();
        for s in sensors.iter() {
            if !names.insert(s.sensor_name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "Duplicate configuration entry for sensor '{}'",
                    s.sensor_name
                )));
            }
        }

        let active_camera = match self.active_camera.as_ref() {
            Some(c) => c.clone(),
            None => sensors
                .first()
                .map(|s| s.sensor_name.clone())
                .unwrap_or_else(|| DEFAULT_CAMERA_NAME.to_owned()),
        };

        let defaults = AssemblerConfig::default();
        Ok(AssemblerConfig {
            description: self.description.clone().unwrap_or(defaults.description),
            trajectory_follower_model: self
                .trajectory_follower_model
                .clone()
                .unwrap_or(defaults.trajectory_follower_model),
            weather_preset: self.weather_preset.clone().unwrap_or(defaults.weather_preset),
            sensors,
            sensor_targets,
            active_camera,
        })
    }
}

/// `[[scenario.sensor]]`
#[derive(Clone, PartialEq, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SensorConfig {
    pub name: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    #[serde(default)]
    pub translation: [f64; 3],
    #[serde(default)]
    pub rotation: [f64; 3],
    /// Passed through verbatim
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

impl From<SensorConfig> for Sensor {
    fn from(c: SensorConfig) -> Self {
        Sensor {
            sensor_name: c.name,
            sensor_type: c.sensor_type,
            parent: String::new(),
            transform: SensorTransform {
                translation: c.translation,
                rotation: c.rotation,
            },
            parameters: c.parameters,
        }
    }
}
