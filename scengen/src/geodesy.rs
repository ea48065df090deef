//! Geodetic, earth-centered-earth-fixed (ECEF) and local north-east-down
//! (NED) conversions on the WGS84 ellipsoid.
//!
//! Angles are degrees at the interface and radians internally.

use na::{Matrix3, Vector3};
use nav_types::{ECEF, WGS84};
use tracktypes::prelude::Ned;

/// Semi-major axis [m]
pub const WGS84_A: f64 = 6_378_137.0;
/// First eccentricity squared
pub const WGS84_E2: f64 = 6.694_379_990_14e-3;

/// Fixed-point iterations used by `ecef_to_geodetic`, converges to well
/// below a millimeter for WGS84 eccentricity
const ECEF_TO_GEODETIC_ITERATIONS: usize = 5;

/// Geodetic position
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Lla {
    /// [deg]
    pub lat: f64,
    /// [deg]
    pub lon: f64,
    /// Height above the ellipsoid [m]
    pub alt: f64,
}

impl Lla {
    pub fn new(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }
}

/// Prime vertical radius of curvature at geodetic latitude `lat` [rad]
fn prime_vertical_radius(lat: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * lat.sin().powi(2)).sqrt()
}

pub fn geodetic_to_ecef(lat: f64, lon: f64, alt: f64) -> Vector3<f64> {
    let (lat, lon) = (lat.to_radians(), lon.to_radians());
    let n = prime_vertical_radius(lat);
    Vector3::new(
        (n + alt) * lat.cos() * lon.cos(),
        (n + alt) * lat.cos() * lon.sin(),
        (n * (1.0 - WGS84_E2) + alt) * lat.sin(),
    )
}

pub fn ecef_to_geodetic(ecef: &Vector3<f64>) -> Lla {
    let (x, y, z) = (ecef.x, ecef.y, ecef.z);
    let lon = y.atan2(x);
    let p = x.hypot(y);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    for _ in 0..ECEF_TO_GEODETIC_ITERATIONS {
        let n = prime_vertical_radius(lat);
        lat = (z + WGS84_E2 * n * lat.sin()).atan2(p);
    }

    // Well conditioned at the poles, unlike p / cos(lat) - N
    let alt = p * lat.cos() + z * lat.sin()
        - WGS84_A * (1.0 - WGS84_E2 * lat.sin().powi(2)).sqrt();

    Lla::new(lat.to_degrees(), lon.to_degrees(), alt)
}

/// Rotation taking ECEF deltas into the NED frame at the reference point
fn ecef_to_ned_rotation(ref_lat: f64, ref_lon: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = ref_lat.to_radians().sin_cos();
    let (sin_lon, cos_lon) = ref_lon.to_radians().sin_cos();
    Matrix3::new(
        -sin_lat * cos_lon,
        -sin_lat * sin_lon,
        cos_lat,
        -sin_lon,
        cos_lon,
        0.0,
        -cos_lat * cos_lon,
        -cos_lat * sin_lon,
        -sin_lat,
    )
}

pub fn ecef_delta_to_ned(delta: &Vector3<f64>, ref_lat: f64, ref_lon: f64) -> Ned {
    let ned = ecef_to_ned_rotation(ref_lat, ref_lon) * delta;
    Ned::new(ned.x, ned.y, ned.z)
}

pub fn ned_to_ecef_delta(ned: &Ned, ref_lat: f64, ref_lon: f64) -> Vector3<f64> {
    // Orthonormal, the transpose is the inverse
    ecef_to_ned_rotation(ref_lat, ref_lon).transpose() * Vector3::new(ned.north, ned.east, ned.down)
}

pub fn lla_to_ned(p: &Lla, reference: &Lla) -> Ned {
    let target = geodetic_to_ecef(p.lat, p.lon, p.alt);
    let origin = geodetic_to_ecef(reference.lat, reference.lon, reference.alt);
    ecef_delta_to_ned(&(target - origin), reference.lat, reference.lon)
}

pub fn ned_to_lla(ned: &Ned, reference: &Lla) -> Lla {
    let origin = geodetic_to_ecef(reference.lat, reference.lon, reference.alt);
    let delta = ned_to_ecef_delta(ned, reference.lat, reference.lon);
    ecef_to_geodetic(&(origin + delta))
}

/// Great-circle distance on a sphere of radius `WGS84_A` [m]
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    WGS84_A * c
}

/// Initial forward azimuth from point 1 to point 2, in [0, 360) [deg]
pub fn bearing_between_points(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_lambda = (lon2 - lon1).to_radians();
    let x = d_lambda.sin() * phi2.cos();
    let y = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let bearing = x.atan2(y).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Point reached by travelling `distance` meters from (lat, lon) along the
/// initial bearing, on the same sphere as `haversine_distance`.
///
/// Returns (lat, lon) [deg].
pub fn destination_point(lat: f64, lon: f64, bearing: f64, distance: f64) -> (f64, f64) {
    let (phi1, lambda1) = (lat.to_radians(), lon.to_radians());
    let theta = bearing.to_radians();
    let delta = distance / WGS84_A;

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());
    (phi2.to_degrees(), lambda2.to_degrees())
}

/// Straight-line distance between two geodetic positions through ECEF [m]
pub fn euclidean_distance(a: &Lla, b: &Lla) -> f64 {
    let a_e: ECEF<f64> = WGS84::from_degrees_and_meters(a.lat, a.lon, a.alt).into();
    let b_e: ECEF<f64> = WGS84::from_degrees_and_meters(b.lat, b.lon, b.alt).into();
    a_e.distance(&b_e)
}
