use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use scengen_lib::{
    config::{Config, ScenarioConfig, TracksConfig},
    generator::{tracks_to_trajectories, write_tracks_csv, ArtificialTrackGenerator},
    maneuver::{ManeuverKind, RelativeDirection},
    scenario::{write_scenario, ScenarioAssembler},
    units::{Angle, Length, Time},
    workflow::{run_artificial, ArtificialOutputs},
};
use trackformat::{read_records_file, records_to_trajectories, write_trajectory_dir};

#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Generation and scenario configuration toml file.
    ///
    /// Built-in defaults are used when not provided.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate artificial tracks and write them as flat track records
    GenerateTracks {
        /// Output track record CSV
        #[arg(short, long)]
        output: PathBuf,

        /// Also write per-track trajectory files into this directory
        #[arg(long)]
        trajectories: Option<PathBuf>,

        #[command(flatten)]
        tracks: TrackOverrides,
    },

    /// Convert a track record CSV into per-track trajectory files
    TracksToTrajectories {
        /// Input track record CSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Assemble a scenario document from a directory of trajectory files
    Scenario {
        /// Directory of <trackid>_trajectory.json files
        #[arg(short, long)]
        trajectories: PathBuf,

        /// Output scenario JSON
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        scenario: ScenarioOverrides,
    },

    /// Run the whole pipeline: tracks, records, trajectories, scenario
    Artificial {
        /// Output directory
        #[arg(short, long)]
        output_dir: PathBuf,

        #[command(flatten)]
        tracks: TrackOverrides,

        #[command(flatten)]
        scenario: ScenarioOverrides,
    },
}

#[derive(Args, Debug)]
struct TrackOverrides {
    /// Number of tracks
    #[arg(long)]
    num_tracks: Option<usize>,

    /// Maneuver kind (random, circular, elliptical, flyby, square,
    /// rectangle, zigzag, spiral)
    #[arg(long)]
    maneuver: Option<ManeuverKind>,

    /// Center latitude [deg]
    #[arg(long, allow_negative_numbers = true)]
    center_lat: Option<f64>,

    /// Center longitude [deg]
    #[arg(long, allow_negative_numbers = true)]
    center_lon: Option<f64>,

    /// Center altitude [m]
    #[arg(long)]
    center_alt: Option<f64>,

    /// Minimum altitude [m]
    #[arg(long)]
    min_alt: Option<f64>,

    /// Maximum altitude [m]
    #[arg(long)]
    max_alt: Option<f64>,

    /// Track separation [deg]
    #[arg(long)]
    separation: Option<f64>,

    /// Start time offset between consecutive tracks [s]
    #[arg(long)]
    time_delay: Option<f64>,

    /// Points per track
    #[arg(long)]
    num_points: Option<usize>,

    /// Sampling interval [s]
    #[arg(long)]
    interval: Option<f64>,

    /// Generate tracks 1.. relative to the first (ownship) track
    #[arg(long)]
    fly_along: bool,

    /// Ownship trajectory file for fly-along mode
    #[arg(long, requires = "fly_along")]
    ownship_file: Option<PathBuf>,

    /// Ownship trajectory file format (json or csv)
    #[arg(long, requires = "ownship_file")]
    ownship_format: Option<String>,

    /// Placement of fly-along tracks relative to the ownship
    #[arg(long, value_enum)]
    relative_direction: Option<RelativeDirection>,

    /// Seed for altitudes, jitter and transponder ids
    #[arg(long)]
    seed: Option<u64>,
}

impl TrackOverrides {
    fn apply(&self, cfg: &mut TracksConfig) {
        if let Some(kind) = self.maneuver {
            if cfg.maneuver.as_ref().map(|m| m.kind()) != Some(kind) {
                cfg.maneuver = Some(kind.with_defaults());
            }
        }
        set(&mut cfg.num_tracks, self.num_tracks);
        set(&mut cfg.center_latitude, self.center_lat);
        set(&mut cfg.center_longitude, self.center_lon);
        set(&mut cfg.center_altitude, self.center_alt.map(Length::from_meters));
        set(&mut cfg.min_altitude, self.min_alt.map(Length::from_meters));
        set(&mut cfg.max_altitude, self.max_alt.map(Length::from_meters));
        set(&mut cfg.separation, self.separation.map(Angle::from_degrees));
        set(&mut cfg.time_delay, self.time_delay.map(Time::from_secs));
        set(&mut cfg.num_points, self.num_points);
        set(&mut cfg.interval, self.interval.map(Time::from_secs));
        if self.fly_along {
            cfg.fly_along = Some(true);
        }
        set(&mut cfg.ownship_file, self.ownship_file.clone());
        set(&mut cfg.ownship_format, self.ownship_format.clone());
        set(&mut cfg.relative_direction, self.relative_direction);
        set(&mut cfg.seed, self.seed);
    }
}

#[derive(Args, Debug)]
struct ScenarioOverrides {
    /// Weather preset
    #[arg(long)]
    weather: Option<String>,

    /// Trajectory follower model path
    #[arg(long)]
    follower_model: Option<String>,

    /// Actor to attach sensors to, repeatable. Defaults to the first actor.
    #[arg(long = "sensor-target")]
    sensor_targets: Vec<String>,
}

impl ScenarioOverrides {
    fn apply(&self, cfg: &mut ScenarioConfig) {
        set(&mut cfg.weather_preset, self.weather.clone());
        set(&mut cfg.trajectory_follower_model, self.follower_model.clone());
        if !self.sensor_targets.is_empty() {
            cfg.sensor_targets = self.sensor_targets.clone();
            cfg.sensor_targets_matching = None;
        }
    }
}

fn set<T>(dst: &mut Option<T>, v: Option<T>) {
    if v.is_some() {
        *dst = v;
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();
    let opts = Opts::parse();

    let mut cfg = match opts.config.as_ref() {
        Some(p) => {
            info!(config = %p.display(), "Loading configuration");
            Config::load(p)?
        }
        None => Config::default(),
    };

    match opts.command {
        Command::GenerateTracks {
            output,
            trajectories,
            tracks,
        } => {
            tracks.apply(&mut cfg.tracks);
            let generator = ArtificialTrackGenerator::new(cfg.track_generator_config()?);
            let tracks = generator.generate()?;
            write_tracks_csv(&output, &tracks)?;
            if let Some(dir) = trajectories {
                let files = write_trajectory_dir(&dir, &tracks_to_trajectories(&tracks))?;
                info!(dir = %dir.display(), files = files.len(), "Wrote trajectory files");
            }
        }
        Command::TracksToTrajectories { input, output } => {
            let records = read_records_file(&input)?;
            let files = write_trajectory_dir(&output, &records_to_trajectories(&records))?;
            info!(dir = %output.display(), files = files.len(), "Wrote trajectory files");
        }
        Command::Scenario {
            trajectories,
            output,
            scenario,
        } => {
            scenario.apply(&mut cfg.scenario);
            let assembler = ScenarioAssembler::new(cfg.assembler_config()?);
            let doc = assembler.assemble(&trajectories)?;
            write_scenario(&output, &doc)?;
        }
        Command::Artificial {
            output_dir,
            tracks,
            scenario,
        } => {
            tracks.apply(&mut cfg.tracks);
            scenario.apply(&mut cfg.scenario);
            let outputs = ArtificialOutputs::in_dir(&output_dir);
            let run = run_artificial(
                cfg.track_generator_config()?,
                cfg.assembler_config()?,
                &outputs,
            )?;
            info!(
                tracks = run.tracks.len(),
                actors = run.scenario.world.actors.len(),
                scenario = %outputs.scenario_file.display(),
                "Artificial scenario complete"
            );
        }
    }

    Ok(())
}
