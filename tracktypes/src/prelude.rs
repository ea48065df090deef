pub use crate::ned::Ned;
pub use crate::track::{AltitudeReference, Track, TrackPoint};
pub use crate::track_id::TrackId;
pub use crate::trajectory::{Trajectory, Waypoint};
