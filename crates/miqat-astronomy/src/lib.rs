//! Solar astronomy for miqat.
//!
//! [`astronomical`] holds the pure ephemeris formulas, [`SolarCoordinates`]
//! turns a Julian day into equatorial coordinates, and [`SolarTime`] derives a
//! day's transit, sunrise, sunset and twilight times at one location.

pub mod astronomical;
pub mod math;
pub mod qibla;
pub mod solar_coordinates;
pub mod solar_time;

pub use qibla::{qibla, MAKKAH};
pub use solar_coordinates::SolarCoordinates;
pub use solar_time::{SolarTime, SUNRISE_ALTITUDE};
