//! Range filtering of flat track records

use crate::geodesy::haversine_distance;
use crate::units::Length;
use trackformat::TrackRecord;

/// Records whose position lies within `range` great-circle distance of
/// (`lat`, `lon`), in their original order
pub fn records_within_range(
    records: &[TrackRecord],
    lat: f64,
    lon: f64,
    range: Length,
) -> Vec<TrackRecord> {
    let max = range.as_meters();
    records
        .iter()
        .filter(|r| haversine_distance(lat, lon, r.latitude, r.longitude) <= max)
        .cloned()
        .collect()
}
