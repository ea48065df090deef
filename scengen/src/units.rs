//! A lightweight uom-ish set of quantities for configuration and generator
//! boundaries.

use serde::{Deserialize, Serialize};
use std::ops::Mul;

#[derive(Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Length {
    meters: f64,
}

impl std::fmt::Debug for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} m", self.meters)
    }
}

impl Length {
    pub fn from_meters(meters: f64) -> Length {
        Length { meters }
    }

    pub fn from_kilometers(km: f64) -> Length {
        Length {
            meters: km * 1000.0,
        }
    }

    pub fn as_meters(&self) -> f64 {
        self.meters
    }
}

/// Geodetic angle. Maneuver shapes are laid out directly in degrees of
/// latitude/longitude, so this doubles as their distance unit.
#[derive(Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle {
    degrees: f64,
}

impl std::fmt::Debug for Angle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees)
    }
}

impl Angle {
    /// Meters per degree of latitude, rounded
    pub const METERS_PER_DEGREE: f64 = 111_000.0;

    pub fn from_degrees(degrees: f64) -> Angle {
        Angle { degrees }
    }

    pub fn as_degrees(&self) -> f64 {
        self.degrees
    }

    pub fn as_radians(&self) -> f64 {
        self.degrees.to_radians()
    }

    /// Approximate ground distance spanned by this many degrees of latitude
    pub fn as_ground_distance(&self) -> Length {
        Length::from_meters(self.degrees * Self::METERS_PER_DEGREE)
    }
}

impl Mul<Angle> for f64 {
    type Output = Angle;

    fn mul(self, rhs: Angle) -> Self::Output {
        Angle::from_degrees(self * rhs.as_degrees())
    }
}

#[derive(Copy, Clone, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Time {
    seconds: f64,
}

impl std::fmt::Debug for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} s", self.seconds)
    }
}

impl Time {
    pub fn from_secs(seconds: f64) -> Time {
        Time { seconds }
    }

    pub fn as_secs(&self) -> f64 {
        self.seconds
    }

    pub fn as_chrono_duration(&self) -> chrono::Duration {
        chrono::Duration::microseconds((self.seconds * 1_000_000.0).round() as i64)
    }
}

impl Mul<Time> for f64 {
    type Output = Time;

    fn mul(self, rhs: Time) -> Self::Output {
        Time::from_secs(self * rhs.as_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn conversions() {
        assert_relative_eq!(Length::from_kilometers(1.5).as_meters(), 1500.0);
        assert_relative_eq!(Angle::from_degrees(180.0).as_radians(), std::f64::consts::PI);
        assert_relative_eq!(
            Angle::from_degrees(0.005).as_ground_distance().as_meters(),
            555.0,
            epsilon = 1e-9
        );
        assert_relative_eq!((3.0 * Time::from_secs(0.5)).as_secs(), 1.5);
        assert_eq!(
            Time::from_secs(1.5).as_chrono_duration(),
            chrono::Duration::milliseconds(1500)
        );
    }
}
