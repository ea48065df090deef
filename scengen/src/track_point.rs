//! Annotated track point construction shared by every generator

use crate::{geodesy::haversine_distance, units::Time};
use chrono::{DateTime, Utc};
use oorandom::Rand64;
use trackformat::TrackData;
use tracktypes::prelude::*;

pub const DEFAULT_SOURCE_ID: &str = "ARTIFICIAL";
pub const DEFAULT_TRACK_TYPE: &str = "Surveillance";

/// Synthetic AGL altitude as a fraction of MSL
pub const AGL_FACTOR: f64 = 0.35;
/// Synthetic geoid separation [m], WGS84 = MSL - this
pub const WGS84_OFFSET: f64 = 50.0;

/// Reported transponder addresses are drawn from [0x100000, 0xFFFFFF]
const HEX_ICAO_RANGE: std::ops::Range<u64> = 0x10_0000..0x100_0000;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct TrackIdentity {
    pub track_id: TrackId,
    pub source_id: String,
    pub track_type: String,
    pub altitude_reference: AltitudeReference,
}

impl TrackIdentity {
    pub fn artificial(track_id: u32) -> Self {
        Self {
            track_id: TrackId::Numeric(track_id),
            source_id: DEFAULT_SOURCE_ID.to_owned(),
            track_type: DEFAULT_TRACK_TYPE.to_owned(),
            altitude_reference: AltitudeReference::default(),
        }
    }

    pub fn source_track_id(&self) -> String {
        format!("{}::{}", self.source_id, self.track_id)
    }
}

#[derive(Clone, Debug)]
pub struct TrackPointFactory {
    identity: TrackIdentity,
    source_track_id: String,
    start_time: DateTime<Utc>,
    reference_lat: f64,
    reference_lon: f64,
}

impl TrackPointFactory {
    /// `reference_*` is the point `distance_m` is measured from
    pub fn new(
        identity: TrackIdentity,
        start_time: DateTime<Utc>,
        reference_lat: f64,
        reference_lon: f64,
    ) -> Self {
        let source_track_id = identity.source_track_id();
        Self {
            identity,
            source_track_id,
            start_time,
            reference_lat,
            reference_lon,
        }
    }

    pub fn track_id(&self) -> &TrackId {
        &self.identity.track_id
    }

    pub fn create(
        &self,
        lat: f64,
        lon: f64,
        alt: f64,
        time_offset: Time,
        prng: &mut Rand64,
    ) -> TrackPoint {
        let reference = (self.reference_lat, self.reference_lon);
        self.create_relative_to(lat, lon, alt, time_offset, reference, prng)
    }

    /// Like `create`, with `distance_m` measured from `reference` instead
    pub fn create_relative_to(
        &self,
        lat: f64,
        lon: f64,
        alt: f64,
        time_offset: Time,
        reference: (f64, f64),
        prng: &mut Rand64,
    ) -> TrackPoint {
        let hex_icao = format!("{:x}", prng.rand_range(HEX_ICAO_RANGE));
        let data = TrackData::new(hex_icao, alt as i64);
        TrackPoint {
            track_id: self.identity.track_id.clone(),
            source_id: self.identity.source_id.clone(),
            track_type: self.identity.track_type.clone(),
            altitude_reference: self.identity.altitude_reference,
            source_track_id: self.source_track_id.clone(),
            timestamp: self.start_time + time_offset.as_chrono_duration(),
            data: data.to_string(),
            latitude: lat,
            longitude: lon,
            altitude: alt,
            agl_altitude: alt * AGL_FACTOR,
            msl_altitude: alt,
            wgs84_altitude: alt - WGS84_OFFSET,
            distance_m: haversine_distance(reference.0, reference.1, lat, lon),
        }
    }
}
