//! Persisted formats for generated tracks and trajectories

pub use crate::data::{parse_track_data, TrackData};
pub use crate::error::FormatError;
pub use crate::ownship::{load_ownship, OwnshipFormat};
pub use crate::records::{
    read_records, read_records_file, records_to_trajectories, write_records, write_records_file,
    write_track_records, TrackRecord,
};
pub use crate::timestamp::{format_timestamp, parse_timestamp};
pub use crate::trajectory::{
    list_trajectory_files, read_trajectory, trajectory_file_name, write_trajectory,
    write_trajectory_dir, TrajectoryFile, WaypointRecord,
};

pub mod data;
pub mod error;
pub mod ownship;
pub mod records;
pub mod timestamp;
pub mod trajectory;

pub const TRAJECTORY_FILE_SUFFIX: &str = "_trajectory.json";
pub const TRACK_APPENDED_EVENT: &str = "track.appended";
