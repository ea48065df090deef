//! End-to-end artificial scenario pipeline

use crate::{
    generator::{write_tracks_csv, ArtificialTrackConfig, ArtificialTrackGenerator},
    scenario::{write_scenario, AssemblerConfig, ScenarioAssembler, ScenarioDocument},
    Error,
};
use std::path::{Path, PathBuf};
use tracing::info;
use trackformat::{read_records_file, records_to_trajectories, write_trajectory_dir};
use tracktypes::prelude::*;

pub const RECORDS_FILE_NAME: &str = "artificial_tracks.csv";
pub const TRAJECTORIES_DIR_NAME: &str = "trajectories";
pub const SCENARIO_FILE_NAME: &str = "auto_gen_scenario.json";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ArtificialOutputs {
    pub records_csv: PathBuf,
    pub trajectories_dir: PathBuf,
    pub scenario_file: PathBuf,
}

impl ArtificialOutputs {
    /// The conventional layout under a single output directory
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            records_csv: dir.join(RECORDS_FILE_NAME),
            trajectories_dir: dir.join(TRAJECTORIES_DIR_NAME),
            scenario_file: dir.join(SCENARIO_FILE_NAME),
        }
    }
}

#[derive(Debug)]
pub struct ArtificialRun {
    pub tracks: Vec<Track>,
    pub trajectory_files: Vec<PathBuf>,
    pub scenario: ScenarioDocument,
}

/// Generate tracks, persist them as flat records, convert the records to
/// trajectory files and assemble the scenario over that directory
pub fn run_artificial(
    tracks: ArtificialTrackConfig,
    assembler: AssemblerConfig,
    outputs: &ArtificialOutputs,
) -> Result<ArtificialRun, Error> {
    if let Some(parent) = outputs.records_csv.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let tracks = ArtificialTrackGenerator::new(tracks).generate()?;
    write_tracks_csv(&outputs.records_csv, &tracks)?;

    let records = read_records_file(&outputs.records_csv)?;
    let trajectories = records_to_trajectories(&records);
    let trajectory_files = write_trajectory_dir(&outputs.trajectories_dir, &trajectories)?;
    info!(
        dir = %outputs.trajectories_dir.display(),
        files = trajectory_files.len(),
        "Wrote trajectory files"
    );

    let scenario = ScenarioAssembler::new(assembler).assemble(&outputs.trajectories_dir)?;
    write_scenario(&outputs.scenario_file, &scenario)?;

    Ok(ArtificialRun {
        tracks,
        trajectory_files,
        scenario,
    })
}
