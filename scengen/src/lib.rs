pub extern crate nalgebra as na;

pub use crate::error::{Error, Result};

pub mod config;
pub mod error;
pub mod filter;
pub mod generator;
pub mod geodesy;
pub mod maneuver;
pub mod scenario;
pub mod track_point;
pub mod units;
pub mod workflow;
