//! Shape laws. Offsets are laid out directly in degrees around the
//! center; latitude offsets pair with sine or cosine as each shape dictates.

use super::{LatLon, ManeuverLaw};
use crate::units::Angle;
use oorandom::Rand64;
use serde::Deserialize;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Fraction of the way through a path of `n` points, 0 for a single point
fn progress(idx: usize, n: usize) -> f64 {
    if n > 1 {
        idx as f64 / (n - 1) as f64
    } else {
        0.0
    }
}

/// Corners and edge midpoints, then strided down toward `num_points`
fn polygon(center: LatLon, half_lat: f64, half_lon: f64, num_points: usize) -> Vec<LatLon> {
    let corners = [
        center.offset(-half_lat, -half_lon),
        center.offset(-half_lat, half_lon),
        center.offset(half_lat, half_lon),
        center.offset(half_lat, -half_lon),
    ];
    let outline: Vec<LatLon> = corners
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            let b = corners[(i + 1) % corners.len()];
            [*a, LatLon::new((a.lat + b.lat) / 2.0, (a.lon + b.lon) / 2.0)]
        })
        .collect();
    // ManeuverLaw is public, zero points yields the whole outline
    let stride = (outline.len() / num_points.max(1)).max(1);
    outline.into_iter().step_by(stride).collect()
}

/// Uniform jitter around the center
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RandomJitter {
    pub max_offset: Angle,
}

impl Default for RandomJitter {
    fn default() -> Self {
        Self {
            max_offset: Angle::from_degrees(0.01),
        }
    }
}

impl ManeuverLaw for RandomJitter {
    fn path(&self, center: LatLon, num_points: usize, prng: &mut Rand64) -> Vec<LatLon> {
        let m = self.max_offset.as_degrees();
        (0..num_points)
            .map(|_| {
                let d_lat = (prng.rand_float() * 2.0 - 1.0) * m;
                let d_lon = (prng.rand_float() * 2.0 - 1.0) * m;
                center.offset(d_lat, d_lon)
            })
            .collect()
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Circular {
    pub radius: Angle,
}

impl Default for Circular {
    fn default() -> Self {
        Self {
            radius: Angle::from_degrees(0.005),
        }
    }
}

impl ManeuverLaw for Circular {
    fn path(&self, center: LatLon, num_points: usize, _prng: &mut Rand64) -> Vec<LatLon> {
        let r = self.radius.as_degrees();
        (0..num_points)
            .map(|i| {
                let theta = TAU * i as f64 / num_points as f64;
                center.offset(r * theta.cos(), r * theta.sin())
            })
            .collect()
    }
}

/// `radius_x` spans longitude, `radius_y` latitude
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Elliptical {
    pub radius_x: Angle,
    pub radius_y: Angle,
}

impl Default for Elliptical {
    fn default() -> Self {
        Self {
            radius_x: Angle::from_degrees(0.01),
            radius_y: Angle::from_degrees(0.005),
        }
    }
}

impl ManeuverLaw for Elliptical {
    fn path(&self, center: LatLon, num_points: usize, _prng: &mut Rand64) -> Vec<LatLon> {
        let (rx, ry) = (self.radius_x.as_degrees(), self.radius_y.as_degrees());
        (0..num_points)
            .map(|i| {
                let theta = TAU * i as f64 / num_points as f64;
                center.offset(ry * theta.sin(), rx * theta.cos())
            })
            .collect()
    }
}

/// Straight pass through the center along `bearing`
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Flyby {
    pub approach_distance: Angle,
    pub exit_distance: Angle,
    pub bearing: Angle,
}

impl Default for Flyby {
    fn default() -> Self {
        Self {
            approach_distance: Angle::from_degrees(0.02),
            exit_distance: Angle::from_degrees(0.02),
            bearing: Angle::from_degrees(45.0),
        }
    }
}

impl ManeuverLaw for Flyby {
    fn path(&self, center: LatLon, num_points: usize, _prng: &mut Rand64) -> Vec<LatLon> {
        let (sin_b, cos_b) = self.bearing.as_radians().sin_cos();
        let approach = self.approach_distance.as_degrees();
        let total = approach + self.exit_distance.as_degrees();
        (0..num_points)
            .map(|i| {
                let along = -approach + total * progress(i, num_points);
                center.offset(along * cos_b, along * sin_b)
            })
            .collect()
    }
}

#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Square {
    pub side: Angle,
}

impl Default for Square {
    fn default() -> Self {
        Self {
            side: Angle::from_degrees(0.02),
        }
    }
}

impl ManeuverLaw for Square {
    fn path(&self, center: LatLon, num_points: usize, _prng: &mut Rand64) -> Vec<LatLon> {
        let half = self.side.as_degrees() / 2.0;
        polygon(center, half, half, num_points)
    }
}

/// `width` spans longitude, `height` latitude
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Rectangle {
    pub width: Angle,
    pub height: Angle,
}

impl Default for Rectangle {
    fn default() -> Self {
        Self {
            width: Angle::from_degrees(0.03),
            height: Angle::from_degrees(0.01),
        }
    }
}

impl ManeuverLaw for Rectangle {
    fn path(&self, center: LatLon, num_points: usize, _prng: &mut Rand64) -> Vec<LatLon> {
        polygon(
            center,
            self.height.as_degrees() / 2.0,
            self.width.as_degrees() / 2.0,
            num_points,
        )
    }
}

/// Progress along `direction` (0 is north) with a sinusoidal lateral swing
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Zigzag {
    pub direction: Angle,
    pub amplitude: Angle,
    pub frequency: f64,
    pub distance: Angle,
}

impl Default for Zigzag {
    fn default() -> Self {
        Self {
            direction: Angle::from_degrees(0.0),
            amplitude: Angle::from_degrees(0.005),
            frequency: 2.0,
            distance: Angle::from_degrees(0.01),
        }
    }
}

impl ManeuverLaw for Zigzag {
    fn path(&self, center: LatLon, num_points: usize, _prng: &mut Rand64) -> Vec<LatLon> {
        let dir = self.direction.as_radians();
        let (sin_d, cos_d) = dir.sin_cos();
        let (sin_l, cos_l) = (dir + FRAC_PI_2).sin_cos();
        let amplitude = self.amplitude.as_degrees();
        let distance = self.distance.as_degrees();
        (0..num_points)
            .map(|i| {
                let frac = progress(i, num_points);
                let main = distance * frac;
                let lateral = amplitude * (TAU * self.frequency * frac).sin();
                center.offset(main * cos_d + lateral * cos_l, main * sin_d + lateral * sin_l)
            })
            .collect()
    }
}

/// Outward spiral, the radius growing linearly with the sample index
#[derive(Copy, Clone, PartialEq, Debug, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Spiral {
    pub initial_radius: Angle,
    pub radius_increment: Angle,
    pub rotations: f64,
}

impl Default for Spiral {
    fn default() -> Self {
        Self {
            initial_radius: Angle::from_degrees(0.002),
            radius_increment: Angle::from_degrees(0.001),
            rotations: 3.0,
        }
    }
}

impl ManeuverLaw for Spiral {
    fn path(&self, center: LatLon, num_points: usize, _prng: &mut Rand64) -> Vec<LatLon> {
        let r0 = self.initial_radius.as_degrees();
        let dr = self.radius_increment.as_degrees();
        (0..num_points)
            .map(|i| {
                let r = r0 + dr * i as f64;
                let theta = TAU * self.rotations * i as f64 / num_points as f64;
                center.offset(r * theta.cos(), r * theta.sin())
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const C: LatLon = LatLon {
        lat: 34.0,
        lon: -118.0,
    };

    fn prng() -> Rand64 {
        Rand64::new(1)
    }

    fn span(points: &[LatLon]) -> (f64, f64) {
        let lat = points.iter().map(|p| (p.lat - C.lat).abs()).fold(0.0, f64::max);
        let lon = points.iter().map(|p| (p.lon - C.lon).abs()).fold(0.0, f64::max);
        (lat, lon)
    }

    #[test]
    fn circle_is_evenly_spaced_at_radius() {
        let path = Circular::default().path(C, 12, &mut prng());
        assert_eq!(path.len(), 12);
        for p in &path {
            let r = ((p.lat - C.lat).powi(2) + (p.lon - C.lon).powi(2)).sqrt();
            assert_relative_eq!(r, 0.005, epsilon = 1e-12);
        }
        let chord = |a: &LatLon, b: &LatLon| ((a.lat - b.lat).powi(2) + (a.lon - b.lon).powi(2)).sqrt();
        let first = chord(&path[0], &path[1]);
        for w in path.windows(2) {
            assert_relative_eq!(chord(&w[0], &w[1]), first, epsilon = 1e-12);
        }
        // theta = 0 sits due north
        assert_relative_eq!(path[0].lat, C.lat + 0.005);
        assert_relative_eq!(path[0].lon, C.lon);
    }

    #[test]
    fn ellipse_axes() {
        let path = Elliptical::default().path(C, 4, &mut prng());
        assert_relative_eq!(path[0].lon, C.lon + 0.01);
        assert_relative_eq!(path[1].lat, C.lat + 0.005, epsilon = 1e-12);
        let (lat, lon) = span(&path);
        assert_relative_eq!(lat, 0.005, epsilon = 1e-12);
        assert_relative_eq!(lon, 0.01, epsilon = 1e-12);
    }

    #[test]
    fn random_stays_in_box() {
        let path = RandomJitter::default().path(C, 200, &mut prng());
        assert_eq!(path.len(), 200);
        let (lat, lon) = span(&path);
        assert!(lat <= 0.01 && lon <= 0.01);
    }

    #[test]
    fn flyby_crosses_center() {
        let path = Flyby::default().path(C, 5, &mut prng());
        let d = 0.02 * 45f64.to_radians().cos();
        assert_relative_eq!(path[0].lat, C.lat - d, epsilon = 1e-12);
        assert_relative_eq!(path[2].lat, C.lat, epsilon = 1e-12);
        assert_relative_eq!(path[2].lon, C.lon, epsilon = 1e-12);
        assert_relative_eq!(path[4].lon, C.lon + d, epsilon = 1e-12);

        let single = Flyby::default().path(C, 1, &mut prng());
        assert_eq!(single.len(), 1);
    }

    #[test]
    fn square_outline_and_stride() {
        let all = Square::default().path(C, 20, &mut prng());
        assert_eq!(all.len(), 8);
        assert_eq!(all[0], C.offset(-0.01, -0.01));
        assert_relative_eq!(all[1].lat, C.lat - 0.01);
        assert_relative_eq!(all[1].lon, C.lon, epsilon = 1e-12);
        assert_eq!(all[2], C.offset(-0.01, 0.01));

        let corners = Square::default().path(C, 4, &mut prng());
        assert_eq!(
            corners,
            vec![
                C.offset(-0.01, -0.01),
                C.offset(-0.01, 0.01),
                C.offset(0.01, 0.01),
                C.offset(0.01, -0.01),
            ]
        );

        assert_eq!(Square::default().path(C, 0, &mut prng()), all);
    }

    #[test]
    fn rectangle_extent() {
        let path = Rectangle::default().path(C, 8, &mut prng());
        assert_eq!(path.len(), 8);
        let (lat, lon) = span(&path);
        assert_relative_eq!(lat, 0.005, epsilon = 1e-12);
        assert_relative_eq!(lon, 0.015, epsilon = 1e-12);
    }

    #[test]
    fn zigzag_progresses_north_by_default() {
        let path = Zigzag::default().path(C, 9, &mut prng());
        assert_relative_eq!(path[0].lat, C.lat);
        assert_relative_eq!(path[8].lat, C.lat + 0.01, epsilon = 1e-12);
        // two full swings, so the ends are back on the centerline
        assert_relative_eq!(path[8].lon, C.lon, epsilon = 1e-12);
        let (_, lon) = span(&path);
        assert!(lon <= 0.005 + 1e-12);
    }

    #[test]
    fn spiral_grows() {
        let path = Spiral::default().path(C, 10, &mut prng());
        let radii: Vec<f64> = path
            .iter()
            .map(|p| ((p.lat - C.lat).powi(2) + (p.lon - C.lon).powi(2)).sqrt())
            .collect();
        assert_relative_eq!(radii[0], 0.002, epsilon = 1e-12);
        assert_relative_eq!(radii[9], 0.011, epsilon = 1e-12);
        assert!(radii.windows(2).all(|w| w[1] > w[0]));
    }
}
