use crate::config::ConfigError;
use std::path::PathBuf;
use trackformat::FormatError;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("Encountered an IO error. {0}")]
    Io(#[from] std::io::Error),

    #[error("Encountered a JSON error. {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Unknown maneuver '{0}'")]
    UnknownManeuver(String),

    #[error("Trajectory directory '{}' does not exist", .0.display())]
    MissingData(PathBuf),

    #[error("The ownship trajectory has no samples")]
    EmptyOwnship,

    #[error("Ownship sample {0} is not later than the one before it")]
    UnorderedOwnship(usize),
}
