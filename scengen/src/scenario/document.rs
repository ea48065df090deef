//! The serialized scenario document

use serde::{ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScenarioDocument {
    pub description: String,
    pub clock: Clock,
    pub orchestrator: Orchestrator,
    pub world: World,
    pub renderers: Vec<Renderer>,
    pub component_models: Vec<ComponentModel>,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Clock {
    pub step_size_ms: u64,
    pub pace_1x_scale: bool,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct Orchestrator {
    pub sync_topics: Vec<SyncTopic>,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct SyncTopic {
    pub topic: String,
    pub interval_ms: u64,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct World {
    pub update_interval_ms: u64,
    /// Unset until a non-empty trajectory has been seen, written as `{}`
    #[serde(default, with = "origin_or_empty")]
    pub origin: Option<Origin>,
    pub weather: Weather,
    pub actors: Vec<Actor>,
    pub sensors: Vec<Sensor>,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Origin {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
}

mod origin_or_empty {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Set(Origin),
        Empty {},
    }

    pub fn serialize<S: Serializer>(origin: &Option<Origin>, s: S) -> Result<S::Ok, S::Error> {
        match origin {
            Some(o) => o.serialize(s),
            None => s.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Origin>, D::Error> {
        Ok(match Repr::deserialize(d)? {
            Repr::Set(o) => Some(o),
            Repr::Empty {} => None,
        })
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Weather {
    pub preset: String,
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Actor {
    pub actor_name: String,
    pub actor_asset: String,
    pub parent: String,
    pub description: String,
    pub transform: Transform,
    pub state: TopicRef,
    pub effectors: Vec<Effector>,
    pub trajectory_visualization: TopicRef,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Transform {
    pub position: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Effector {
    pub id: String,
    pub relative_path: String,
    pub transform: EffectorTransform,
    pub state: TopicRef,
}

#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct EffectorTransform {
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
    pub scale: [f64; 3],
}

/// A typed topic binding
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TopicRef {
    pub msg_type: String,
    pub topic: String,
}

impl TopicRef {
    pub fn new<M: Into<String>, T: Into<String>>(msg_type: M, topic: T) -> Self {
        Self {
            msg_type: msg_type.into(),
            topic: topic.into(),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct Sensor {
    pub sensor_name: String,
    #[serde(rename = "type")]
    pub sensor_type: String,
    /// Actor the sensor is mounted on
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
    pub transform: SensorTransform,
    pub parameters: BTreeMap<String, Value>,
}

#[derive(Copy, Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct SensorTransform {
    pub translation: [f64; 3],
    pub rotation: [f64; 3],
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Renderer {
    pub renderer_id: String,
    pub role: String,
    pub sensors: Vec<String>,
    pub viewport_config: ViewportConfig,
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct ViewportConfig {
    pub active_camera: String,
}

/// An executable model bound to scenario topics
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ComponentModel {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_type: Option<String>,
    pub model_path: String,
    pub input_topics: Vec<TopicRef>,
    pub output_topics: Vec<TopicRef>,
    pub aux_mappings: AuxMappings,
    pub initial_values: BTreeMap<String, Value>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct AuxMappings {
    pub input: BTreeMap<String, String>,
    pub output: BTreeMap<String, String>,
}
