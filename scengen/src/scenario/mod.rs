//! Assembly of a scenario document from a directory of trajectory files

use crate::Error;
use regex::Regex;
use serde_json::{json, Value};
use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};
use tracing::{debug, info, warn};
use trackformat::{list_trajectory_files, read_trajectory, TrajectoryFile};

pub use self::document::{
    Actor, AuxMappings, Clock, ComponentModel, Effector, EffectorTransform, Orchestrator, Origin,
    Renderer, ScenarioDocument, Sensor, SensorTransform, SyncTopic, TopicRef, Transform,
    ViewportConfig, Weather, World,
};
pub use self::sensors::{default_sensors, rgb_camera, DEFAULT_CAMERA_NAME};

pub mod document;
pub mod sensors;

pub const DEFAULT_DESCRIPTION: &str = "Multi-intruder scenario generated from trajectories.";
pub const DEFAULT_TRAJECTORY_FOLLOWER_MODEL: &str =
    "dev_scripts/fmu/trajectory_follower_fmu_model.fmu";
pub const DEFAULT_WEATHER_PRESET: &str = "Cloudy";

/// World origin altitude [m] when the first waypoint has none
pub const DEFAULT_ORIGIN_ALTITUDE: f64 = 116.09;

pub const CLOCK_STEP_SIZE_MS: u64 = 20;
pub const WORLD_UPDATE_INTERVAL_MS: u64 = 20;
pub const SYNC_TOPIC_INTERVAL_MS: u64 = 20;

pub const ACTOR_ASSET: &str = "vehicles/generic_airplane/generic_airplane";
pub const VEHICLE_STATE_MSG: &str = "aerosim::types::VehicleState";
pub const EFFECTOR_STATE_MSG: &str = "aerosim::types::EffectorState";
pub const TRAJECTORY_VISUALIZATION_MSG: &str = "aerosim::types::TrajectoryVisualization";

/// Publishers bound to the first actor: (model id, model path, output kind)
const SENSOR_PUBLISHERS: [(&str, &str, &str); 3] = [
    ("gnss_publisher", "fmu/gnss_sensor_fmu_model.fmu", "gnss"),
    ("adsb_publisher", "fmu/adsb_sensor_fmu_model.fmu", "adsb"),
    ("imu_publisher", "fmu/imu_sensor_fmu_model.fmu", "imu"),
];

/// Which actors receive the configured sensors
#[derive(Clone, Debug, Default)]
pub enum SensorTargets {
    #[default]
    FirstActor,
    Named(Vec<String>),
    Matching(Regex),
}

impl SensorTargets {
    fn matches(&self, actor_name: &str, is_first: bool) -> bool {
        match self {
            SensorTargets::FirstActor => is_first,
            SensorTargets::Named(names) => names.iter().any(|n| n == actor_name),
            SensorTargets::Matching(re) => re.is_match(actor_name),
        }
    }
}

#[derive(Clone, Debug)]
pub struct AssemblerConfig {
    pub description: String,
    pub trajectory_follower_model: String,
    pub weather_preset: String,
    pub sensors: Vec<Sensor>,
    pub sensor_targets: SensorTargets,
    pub active_camera: String,
}

impl Default for AssemblerConfig {
    fn default() -> Self {
        Self {
            description: DEFAULT_DESCRIPTION.to_owned(),
            trajectory_follower_model: DEFAULT_TRAJECTORY_FOLLOWER_MODEL.to_owned(),
            weather_preset: DEFAULT_WEATHER_PRESET.to_owned(),
            sensors: default_sensors(),
            sensor_targets: SensorTargets::default(),
            active_camera: DEFAULT_CAMERA_NAME.to_owned(),
        }
    }
}

/// Topic names derived from an actor name
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ActorTopics {
    pub vehicle_state: String,
    pub trajectory_visualization: String,
    pub effector_state: String,
}

impl ActorTopics {
    pub fn new(actor_name: &str) -> Self {
        Self {
            vehicle_state: format!("aerosim.{actor_name}.vehicle_state"),
            trajectory_visualization: format!("aerosim.{actor_name}.trajectory_visualization"),
            effector_state: format!("aerosim.{actor_name}.effector1.state"),
        }
    }
}

pub fn actor_name(track_label: &str) -> String {
    format!("actor{track_label}")
}

#[derive(Debug)]
pub struct ScenarioAssembler {
    config: AssemblerConfig,
}

impl ScenarioAssembler {
    pub fn new(config: AssemblerConfig) -> Self {
        Self { config }
    }

    /// Build a document from every `<trackid>_trajectory.json` in `dir`,
    /// taken in file name order. Empty trajectories are skipped.
    pub fn assemble<P: AsRef<Path>>(&self, dir: P) -> Result<ScenarioDocument, Error> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::MissingData(dir.to_owned()));
        }

        let mut doc = self.empty_document();
        let files = list_trajectory_files(dir)?;
        info!(dir = %dir.display(), files = files.len(), "Assembling scenario");

        for file in files.iter() {
            let waypoints = read_trajectory(&file.path)?;
            let first = match waypoints.first() {
                Some(wp) => wp,
                None => {
                    warn!(path = %file.path.display(), "Skipping empty trajectory file");
                    continue;
                }
            };

            let is_first = doc.world.actors.is_empty();
            if is_first {
                doc.world.origin = Some(Origin {
                    latitude: first.lat,
                    longitude: first.lon,
                    altitude: first.alt.unwrap_or(DEFAULT_ORIGIN_ALTITUDE),
                });
            }
            self.add_actor(&mut doc, file, is_first);
        }

        debug!(
            actors = doc.world.actors.len(),
            sensors = doc.world.sensors.len(),
            component_models = doc.component_models.len(),
            "Assembled scenario"
        );
        Ok(doc)
    }

    fn empty_document(&self) -> ScenarioDocument {
        let cfg = &self.config;
        ScenarioDocument {
            description: cfg.description.clone(),
            clock: Clock {
                step_size_ms: CLOCK_STEP_SIZE_MS,
                pace_1x_scale: true,
            },
            orchestrator: Orchestrator::default(),
            world: World {
                update_interval_ms: WORLD_UPDATE_INTERVAL_MS,
                origin: None,
                weather: Weather {
                    preset: cfg.weather_preset.clone(),
                },
                actors: Vec::new(),
                sensors: Vec::new(),
            },
            renderers: vec![Renderer {
                renderer_id: "0".to_owned(),
                role: "primary".to_owned(),
                sensors: cfg.sensors.iter().map(|s| s.sensor_name.clone()).collect(),
                viewport_config: ViewportConfig {
                    active_camera: cfg.active_camera.clone(),
                },
            }],
            component_models: Vec::new(),
        }
    }

    fn add_actor(&self, doc: &mut ScenarioDocument, file: &TrajectoryFile, is_first: bool) {
        let name = actor_name(&file.label);
        let topics = ActorTopics::new(&name);
        debug!(actor = %name, path = %file.path.display(), "Adding actor");

        doc.orchestrator.sync_topics.push(SyncTopic {
            topic: topics.vehicle_state.clone(),
            interval_ms: SYNC_TOPIC_INTERVAL_MS,
        });

        doc.world.actors.push(Actor {
            actor_name: name.clone(),
            actor_asset: ACTOR_ASSET.to_owned(),
            parent: String::new(),
            description: format!("Trajectory follower {}", file.label),
            transform: Transform::default(),
            state: TopicRef::new(VEHICLE_STATE_MSG, &topics.vehicle_state),
            effectors: vec![Effector {
                id: "propeller_front".to_owned(),
                relative_path: "generic_airplane/propeller".to_owned(),
                transform: EffectorTransform {
                    translation: [3.1, 0.0, 0.0],
                    rotation: [0.0, -90.0, 0.0],
                    scale: [1.0; 3],
                },
                state: TopicRef::new(EFFECTOR_STATE_MSG, &topics.effector_state),
            }],
            trajectory_visualization: TopicRef::new(
                TRAJECTORY_VISUALIZATION_MSG,
                &topics.trajectory_visualization,
            ),
        });

        if self.config.sensor_targets.matches(&name, is_first) {
            doc.world
                .sensors
                .extend(self.config.sensors.iter().cloned().map(|mut s| {
                    s.parent = name.clone();
                    s
                }));
        }

        doc.component_models
            .push(self.trajectory_follower(file, &topics));
        if is_first {
            doc.component_models.extend(sensor_publishers(&name, &topics));
        }
    }

    fn trajectory_follower(&self, file: &TrajectoryFile, topics: &ActorTopics) -> ComponentModel {
        let initial_values: BTreeMap<String, Value> = [
            ("waypoints_json_path", json!(file.path.display().to_string())),
            ("display_future_trajectory", json!(true)),
            ("display_past_trajectory", json!(true)),
            ("highlight_user_defined_waypoints", json!(true)),
            ("number_of_future_waypoints", json!(1)),
            ("use_linear_interpolation", json!(false)),
            ("time_step_in_seconds", json!(0.01)),
            ("curvature_roll_factor", json!(1.0)),
            ("max_roll_rate_deg_per_second", json!(10.0)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_owned(), v))
        .collect();

        ComponentModel {
            id: format!("trajectory_follower_{}", file.label),
            component_type: None,
            model_path: self.config.trajectory_follower_model.clone(),
            input_topics: Vec::new(),
            output_topics: vec![
                TopicRef::new(VEHICLE_STATE_MSG, &topics.vehicle_state),
                TopicRef::new(TRAJECTORY_VISUALIZATION_MSG, &topics.trajectory_visualization),
            ],
            aux_mappings: AuxMappings::default(),
            initial_values,
        }
    }
}

fn sensor_publishers<'a>(
    actor_name: &'a str,
    topics: &'a ActorTopics,
) -> impl Iterator<Item = ComponentModel> + 'a {
    SENSOR_PUBLISHERS
        .iter()
        .map(move |(id, model_path, output)| ComponentModel {
            id: (*id).to_owned(),
            component_type: Some("sensor".to_owned()),
            model_path: (*model_path).to_owned(),
            input_topics: vec![TopicRef::new(VEHICLE_STATE_MSG, &topics.vehicle_state)],
            output_topics: Vec::new(),
            aux_mappings: AuxMappings::default(),
            initial_values: std::iter::once((
                format!("output_{output}_topic_name"),
                json!(format!("aerosim.{actor_name}.sensor.{output}")),
            ))
            .collect(),
        })
}

/// Pretty-printed with 4-space indentation
pub fn write_scenario<P: AsRef<Path>>(path: P, doc: &ScenarioDocument) -> Result<(), Error> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut w = BufWriter::new(File::create(path)?);
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut w, fmt);
    serde::Serialize::serialize(doc, &mut ser)?;
    w.flush()?;
    info!(path = %path.display(), actors = doc.world.actors.len(), "Wrote scenario");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_names() {
        let t = ActorTopics::new(&actor_name("10003"));
        assert_eq!(t.vehicle_state, "aerosim.actor10003.vehicle_state");
        assert_eq!(t.trajectory_visualization, "aerosim.actor10003.trajectory_visualization");
        assert_eq!(t.effector_state, "aerosim.actor10003.effector1.state");
    }

    #[test]
    fn sensor_target_selection() {
        assert!(SensorTargets::FirstActor.matches("actor10000", true));
        assert!(!SensorTargets::FirstActor.matches("actor10001", false));

        let named = SensorTargets::Named(vec!["actor10001".to_owned()]);
        assert!(!named.matches("actor10000", true));
        assert!(named.matches("actor10001", false));

        let re = SensorTargets::Matching(Regex::new("^actor1000[12]$").unwrap());
        assert!(!re.matches("actor10000", true));
        assert!(re.matches("actor10002", false));
    }

    #[test]
    fn publishers_subscribe_to_vehicle_state() {
        let topics = ActorTopics::new("actor10000");
        let models: Vec<_> = sensor_publishers("actor10000", &topics).collect();
        assert_eq!(models.len(), 3);
        assert_eq!(models[1].id, "adsb_publisher");
        assert_eq!(models[1].input_topics[0].topic, "aerosim.actor10000.vehicle_state");
        assert_eq!(
            models[1].initial_values["output_adsb_topic_name"],
            json!("aerosim.actor10000.sensor.adsb")
        );
        assert!(models.iter().all(|m| m.output_topics.is_empty()));
    }
}
