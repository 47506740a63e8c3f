//! Sun position and the precomputed ephemeris table for a regulated window.

pub mod config;
pub mod position;
pub mod table;

pub use config::EphemerisConfig;
pub use position::SolarPosition;
pub use table::{SolarSample, SolarTable, reference_winter_solstice};
