use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Identity shared by every point of a track.
///
/// Numeric ids render zero-padded to 5 digits. Ids that don't parse as a
/// number are kept verbatim as an opaque label.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum TrackId {
    Numeric(u32),
    Label(String),
}

impl TrackId {
    pub const DEFAULT_BASE: u32 = 10000;

    pub fn as_numeric(&self) -> Option<u32> {
        match self {
            TrackId::Numeric(n) => Some(*n),
            TrackId::Label(_) => None,
        }
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackId::Numeric(n) => write!(f, "{n:05}"),
            TrackId::Label(l) => f.write_str(l),
        }
    }
}

impl From<u32> for TrackId {
    fn from(value: u32) -> Self {
        TrackId::Numeric(value)
    }
}

impl From<&str> for TrackId {
    fn from(value: &str) -> Self {
        let s = value.trim();
        // Accept "10000" as well as "10000.0", which shows up when ids
        // pass through float-typed columns
        if let Ok(n) = s.parse::<u32>() {
            TrackId::Numeric(n)
        } else if let Some(n) = s
            .parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
        {
            TrackId::Numeric(n as u32)
        } else {
            TrackId::Label(s.to_owned())
        }
    }
}

impl From<String> for TrackId {
    fn from(value: String) -> Self {
        TrackId::from(value.as_str())
    }
}

impl From<TrackId> for String {
    fn from(value: TrackId) -> Self {
        value.to_string()
    }
}

impl FromStr for TrackId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(TrackId::from(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_padded_rendering() {
        assert_eq!(TrackId::from(10000u32).to_string(), "10000");
        assert_eq!(TrackId::from(7u32).to_string(), "00007");
    }

    #[test]
    fn parse_numeric_and_label() {
        assert_eq!(TrackId::from("00042"), TrackId::Numeric(42));
        assert_eq!(TrackId::from("10001.0"), TrackId::Numeric(10001));
        assert_eq!(TrackId::from("a1b2"), TrackId::Label("a1b2".to_owned()));
        assert_eq!(TrackId::from("a1b2").to_string(), "a1b2");
        assert_eq!(TrackId::from("-3"), TrackId::Label("-3".to_owned()));
    }
}
