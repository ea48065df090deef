use super::document::{Sensor, SensorTransform};
use serde_json::json;
use std::collections::BTreeMap;

pub const DEFAULT_CAMERA_NAME: &str = "rgb_camera_0";
pub const RGB_CAMERA_TYPE: &str = "sensors/cameras/rgb_camera";

/// A chase camera behind and above the vehicle
pub fn rgb_camera<S: Into<String>>(name: S) -> Sensor {
    let parameters: BTreeMap<String, serde_json::Value> = [
        ("resolution", json!([1920, 1080])),
        ("tick_rate", json!(0.02)),
        ("frame_rate", json!(30)),
        ("fov", json!(90)),
        ("near_clip", json!(0.1)),
        ("far_clip", json!(1000.0)),
        ("capture_enabled", json!(false)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_owned(), v))
    .collect();

    Sensor {
        sensor_name: name.into(),
        sensor_type: RGB_CAMERA_TYPE.to_owned(),
        parent: String::new(),
        transform: SensorTransform {
            translation: [-15.0, 0.0, -2.0],
            rotation: [0.0, -10.0, 0.0],
        },
        parameters,
    }
}

/// Fresh on every call, callers are free to mutate the result
pub fn default_sensors() -> Vec<Sensor> {
    vec![rgb_camera(DEFAULT_CAMERA_NAME)]
}
