//! The free-text `data` payload carried by each track record.
//!
//! Grammar: `key:value` fields separated by '|', e.g.
//! `Hex-ICAO:a1b2c3|Alt-Baro:1000`.

use crate::FormatError;
use nom::{
    bytes::complete::{take_till, take_till1},
    character::complete::char,
    combinator::all_consuming,
    multi::separated_list0,
    sequence::separated_pair,
    IResult,
};
use std::fmt;

pub const HEX_ICAO_KEY: &str = "Hex-ICAO";
pub const ALT_BARO_KEY: &str = "Alt-Baro";

#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct TrackData {
    /// 24-bit ICAO address, lower-case hex
    pub hex_icao: Option<String>,
    /// Barometric altitude, whole meters
    pub alt_baro: Option<i64>,
    /// Unrecognized fields, in order of appearance
    pub extra: Vec<(String, String)>,
}

impl TrackData {
    pub fn new(hex_icao: String, alt_baro: i64) -> Self {
        Self {
            hex_icao: Some(hex_icao),
            alt_baro: Some(alt_baro),
            extra: Vec::new(),
        }
    }
}

impl fmt::Display for TrackData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        if let Some(hex) = &self.hex_icao {
            write!(f, "{HEX_ICAO_KEY}:{hex}")?;
            sep = "|";
        }
        if let Some(alt) = self.alt_baro {
            write!(f, "{sep}{ALT_BARO_KEY}:{alt}")?;
            sep = "|";
        }
        for (k, v) in self.extra.iter() {
            write!(f, "{sep}{k}:{v}")?;
            sep = "|";
        }
        Ok(())
    }
}

fn field(s: &str) -> IResult<&str, (&str, &str)> {
    separated_pair(
        take_till1(|c| c == ':' || c == '|'),
        char(':'),
        take_till(|c| c == '|'),
    )(s)
}

pub fn parse_track_data(s: &str) -> Result<TrackData, FormatError> {
    let (_, fields) = all_consuming(separated_list0(char('|'), field))(s.trim())
        .map_err(|_| FormatError::Data(s.to_owned()))?;

    let mut data = TrackData::default();
    for (key, value) in fields {
        match key.trim() {
            HEX_ICAO_KEY => data.hex_icao = Some(value.trim().to_lowercase()),
            ALT_BARO_KEY => {
                let alt = value
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| FormatError::Data(s.to_owned()))?;
                data.alt_baro = Some(alt);
            }
            k => data.extra.push((k.to_owned(), value.to_owned())),
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_payload() {
        let d = parse_track_data("Hex-ICAO:a1b2c3|Alt-Baro:1043").unwrap();
        assert_eq!(d.hex_icao.as_deref(), Some("a1b2c3"));
        assert_eq!(d.alt_baro, Some(1043));
        assert!(d.extra.is_empty());
        assert_eq!(d.to_string(), "Hex-ICAO:a1b2c3|Alt-Baro:1043");
    }

    #[test]
    fn unknown_fields_are_kept() {
        let d = parse_track_data("Squawk:7700|Hex-ICAO:ABCDEF|Callsign:").unwrap();
        assert_eq!(d.hex_icao.as_deref(), Some("abcdef"));
        assert_eq!(d.alt_baro, None);
        assert_eq!(
            d.extra,
            vec![
                ("Squawk".to_owned(), "7700".to_owned()),
                ("Callsign".to_owned(), String::new())
            ]
        );
    }

    #[test]
    fn empty_payload() {
        assert_eq!(parse_track_data("").unwrap(), TrackData::default());
    }

    #[test]
    fn malformed_payloads() {
        assert!(parse_track_data("no-separator").is_err());
        assert!(parse_track_data("Alt-Baro:high").is_err());
        assert!(parse_track_data("|Hex-ICAO:abc").is_err());
    }
}
