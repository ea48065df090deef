use derive_more::Display;

/// North-east-down offset relative to some reference point [m]
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default, Display)]
#[display(fmt = "{{n: {}, e: {}, d: {}}}", "north", "east", "down")]
pub struct Ned {
    pub north: f64,
    pub east: f64,
    pub down: f64,
}

impl Ned {
    pub fn new(north: f64, east: f64, down: f64) -> Self {
        Self { north, east, down }
    }
}
