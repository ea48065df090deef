use approx::assert_relative_eq;
use chrono::{TimeZone, Utc};
use scengen_lib::{
    config::Config,
    generator::{ArtificialTrackGenerator, FlyAlong, OwnshipSource},
    geodesy::{bearing_between_points, haversine_distance},
    maneuver::ManeuverKind,
    units::Length,
    workflow::{run_artificial, ArtificialOutputs},
};
use indoc::indoc;
use std::path::Path;
use trackformat::{list_trajectory_files, load_ownship, read_trajectory, OwnshipFormat};

const FIXTURES: &str = "tests/test_fixtures";

fn circular_config() -> Config {
    Config::from_str_checked(indoc! {r#"
        [tracks]
        num-tracks = 3
        num-points = 20
        interval = 10.0
        min-altitude = 950.0
        max-altitude = 1050.0
        start-time = '2025-04-01T10:00:00Z'
            [tracks.maneuver]
            kind = 'circular'
    "#})
    .unwrap()
}

#[test]
fn three_independent_circular_tracks() {
    let cfg = circular_config().track_generator_config().unwrap();
    let tracks = ArtificialTrackGenerator::new(cfg).generate().unwrap();
    assert_eq!(tracks.len(), 3);

    for (i, track) in tracks.iter().enumerate() {
        assert_eq!(track.id().to_string(), format!("{}", 10000 + i));
        assert_eq!(track.len(), 20);

        let t0 = track.start_time().unwrap();
        let base = Utc.with_ymd_and_hms(2025, 4, 1, 10, 0, 0).unwrap();
        assert_eq!(t0, base + chrono::Duration::seconds(30 * i as i64));
        let offsets: Vec<i64> = track
            .points()
            .iter()
            .map(|p| (p.timestamp - t0).num_seconds())
            .collect();
        assert_eq!(offsets, (0..20).map(|k| 10 * k).collect::<Vec<_>>());

        for p in track.points() {
            assert!((950.0..=1050.0).contains(&p.altitude));
            assert_eq!(p.source_track_id, format!("ARTIFICIAL::{}", 10000 + i));
        }
    }
}

#[test]
fn fly_along_external_ownship() {
    let ownship_path = Path::new(FIXTURES).join("ownship_5.json");
    let mut cfg = circular_config().track_generator_config().unwrap();
    cfg.num_tracks = 2;
    cfg.fly_along = Some(FlyAlong {
        ownship: Some(OwnshipSource {
            path: ownship_path.clone(),
            format: OwnshipFormat::Json,
        }),
        ..Default::default()
    });
    let separation_m = cfg.separation.as_ground_distance().as_meters();

    let tracks = ArtificialTrackGenerator::new(cfg).generate().unwrap();
    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].len(), 5);
    assert_eq!(tracks[1].len(), 5);
    assert_eq!(tracks[1].id().to_string(), "10001");

    let ownship = load_ownship(&ownship_path, OwnshipFormat::Json).unwrap();
    let wps = ownship.waypoints();
    for (k, (own, rel)) in wps.iter().zip(tracks[1].points()).enumerate() {
        let d = haversine_distance(own.lat, own.lon, rel.latitude, rel.longitude);
        assert_relative_eq!(d, separation_m, epsilon = 1e-6);

        let heading = if k + 1 < wps.len() {
            bearing_between_points(own.lat, own.lon, wps[k + 1].lat, wps[k + 1].lon)
        } else {
            bearing_between_points(wps[k - 1].lat, wps[k - 1].lon, own.lat, own.lon)
        };
        let placed = bearing_between_points(own.lat, own.lon, rel.latitude, rel.longitude);
        assert_relative_eq!(placed, heading, epsilon = 1e-6);
        assert_eq!(rel.altitude, own.alt);
    }
}

#[test]
fn fly_along_rejects_missing_ownship_file() {
    let mut cfg = circular_config().track_generator_config().unwrap();
    cfg.fly_along = Some(FlyAlong {
        ownship: Some(OwnshipSource {
            path: Path::new(FIXTURES).join("no_such_ownship.json"),
            format: OwnshipFormat::Json,
        }),
        ..Default::default()
    });
    let err = ArtificialTrackGenerator::new(cfg).generate().unwrap_err();
    assert!(matches!(
        err,
        scengen_lib::Error::Format(trackformat::FormatError::NotFound(_))
    ));
}

#[test]
fn altitude_bounds_hold_for_every_maneuver() {
    for kind in ManeuverKind::ALL {
        let mut cfg = circular_config().track_generator_config().unwrap();
        cfg.maneuver = kind.with_defaults();
        cfg.altitude_range = Length::from_meters(300.0)..=Length::from_meters(310.0);
        let tracks = ArtificialTrackGenerator::new(cfg).generate().unwrap();
        for p in tracks.iter().flat_map(|t| t.points()) {
            assert!((300.0..=310.0).contains(&p.altitude), "{kind}: {}", p.altitude);
        }
    }
}

#[test]
fn artificial_workflow_writes_everything() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = circular_config();
    let outputs = ArtificialOutputs::in_dir(dir.path());
    let run = run_artificial(
        cfg.track_generator_config().unwrap(),
        cfg.assembler_config().unwrap(),
        &outputs,
    )
    .unwrap();

    assert!(outputs.records_csv.is_file());
    assert!(outputs.scenario_file.is_file());
    assert_eq!(run.trajectory_files.len(), 3);

    let files = list_trajectory_files(&outputs.trajectories_dir).unwrap();
    let names: Vec<String> = files.iter().map(|f| f.file_name()).collect();
    assert_eq!(
        names,
        [
            "10000_trajectory.json",
            "10001_trajectory.json",
            "10002_trajectory.json"
        ]
    );
    let wps = read_trajectory(&files[2].path).unwrap();
    assert_eq!(wps.len(), 20);
    assert_eq!(wps[0].time, Some(0.0));
    assert_eq!(wps[19].time, Some(190.0));

    let doc = &run.scenario;
    assert_eq!(doc.world.actors.len(), 3);
    let origin = doc.world.origin.unwrap();
    assert_eq!(origin.latitude, wps_first_lat(&files[0].path));

    let written: serde_json::Value =
        serde_json::from_reader(std::fs::File::open(&outputs.scenario_file).unwrap()).unwrap();
    assert_eq!(written["world"]["actors"][0]["actor_name"], "actor10000");
    assert_eq!(written["component_models"].as_array().unwrap().len(), 6);
}

fn wps_first_lat(path: &Path) -> f64 {
    read_trajectory(path).unwrap()[0].lat
}
