//! Core types shared by the miqat crates.

pub mod clock;
pub mod coordinates;
pub mod error;
pub mod rounding;
pub mod types;

pub use clock::ClockTime;
pub use coordinates::{Coordinates, UNSAFE_LATITUDE};
pub use error::MiqatError;
pub use rounding::{round_minute, Rounding};
pub use types::{HighLatitudeRule, Madhab, PolarCircleResolution, Prayer, Shafaq};
