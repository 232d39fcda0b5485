//! Substitute solar geometry for days on which the sun does not rise or set.

use chrono::{NaiveDate, TimeDelta};
use miqat_astronomy::SolarTime;
use miqat_types::{Coordinates, PolarCircleResolution};
use tracing::{debug, warn};

/// Latitude step used when moving toward the equator.
pub const LATITUDE_VARIATION_STEP: f64 = 0.5;

/// Furthest day offset searched in either direction (half a year, rounded up).
pub const MAX_DAY_OFFSET: i64 = 183;

/// Solar geometry to use for `date`, possibly borrowed from another day or
/// another latitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarResolution {
    /// The requested date; prayer instants are placed on it.
    pub date: NaiveDate,
    /// Day whose geometry is used.
    pub solar_date: NaiveDate,
    /// Day after `solar_date`.
    pub tomorrow: NaiveDate,
    pub coordinates: Coordinates,
    pub solar_time: SolarTime,
    pub tomorrow_solar_time: SolarTime,
}

impl PolarResolution {
    /// Geometry of the date itself, untouched.
    pub fn direct(date: NaiveDate, coordinates: Coordinates) -> Self {
        Self::at(date, date, coordinates)
    }

    fn at(date: NaiveDate, solar_date: NaiveDate, coordinates: Coordinates) -> Self {
        let tomorrow = solar_date.succ_opt().unwrap_or(solar_date);
        Self {
            date,
            solar_date,
            tomorrow,
            coordinates,
            solar_time: SolarTime::new(solar_date, coordinates),
            tomorrow_solar_time: SolarTime::new(tomorrow, coordinates),
        }
    }

    /// True when both days have a sunrise and a sunset.
    pub fn is_valid(&self) -> bool {
        self.solar_time.is_valid() && self.tomorrow_solar_time.is_valid()
    }
}

/// Applies `resolver`. Falls back to the direct geometry (with its NaN
/// sunrise/sunset) when the strategy finds nothing.
pub fn resolve(resolver: PolarCircleResolution, date: NaiveDate, coordinates: Coordinates) -> PolarResolution {
    let found = match resolver {
        PolarCircleResolution::AqrabYaum => aqrab_yaum(date, coordinates),
        PolarCircleResolution::AqrabBalad => aqrab_balad(date, coordinates),
        PolarCircleResolution::Unresolved => return PolarResolution::direct(date, coordinates),
    };

    match found {
        Some(resolution) => {
            debug!(
                ?resolver,
                %date,
                solar_date = %resolution.solar_date,
                latitude = resolution.coordinates.latitude(),
                "polar circle resolved"
            );
            resolution
        }
        None => {
            warn!(?resolver, %date, %coordinates, "polar circle resolution found no usable day");
            PolarResolution::direct(date, coordinates)
        }
    }
}

/// Nearest day: tries +1, −1, +2, −2, … days until both that day and the
/// next have a sunrise and a sunset.
fn aqrab_yaum(date: NaiveDate, coordinates: Coordinates) -> Option<PolarResolution> {
    for days in 1..=MAX_DAY_OFFSET {
        for direction in [1, -1] {
            let Some(candidate) = date.checked_add_signed(TimeDelta::days(direction * days)) else {
                continue;
            };
            let resolution = PolarResolution::at(date, candidate, coordinates);
            if resolution.is_valid() {
                return Some(resolution);
            }
        }
    }
    None
}

/// Nearest location: steps the latitude toward the equator, keeping the
/// longitude, while it stays at or beyond the unsafe latitude.
fn aqrab_balad(date: NaiveDate, coordinates: Coordinates) -> Option<PolarResolution> {
    let step = coordinates.latitude().signum() * LATITUDE_VARIATION_STEP;
    let mut latitude = coordinates.latitude() - step;

    loop {
        let moved = coordinates.with_latitude(latitude);
        let resolution = PolarResolution::at(date, date, moved);
        if resolution.is_valid() {
            return Some(resolution);
        }
        if !moved.is_unsafe() {
            return None;
        }
        latitude -= step;
    }
}
