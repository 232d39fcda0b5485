//! Calculation conventions for miqat: method presets, parameters, and the
//! fallbacks used when the sun misbehaves at high latitudes.

pub mod high_latitude;
pub mod method;
pub mod parameters;
pub mod polar;

pub use high_latitude::NightPortions;
pub use method::CalculationMethod;
pub use parameters::{CalculationParameters, CalculationParametersBuilder, IshaRule, PrayerAdjustments};
pub use polar::PolarResolution;
