//! Fallbacks for twilight times that are unreachable or implausibly far
//! from sunrise/sunset.
//!
//! Every function here works on resolved instants. Once sunrise, sunset and
//! the night length are known, a Fajr and an Isha always exist.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use miqat_astronomy::astronomical::{season_adjusted_evening_twilight, season_adjusted_morning_twilight};
use miqat_types::{Coordinates, HighLatitudeRule, Shafaq};
use tracing::debug;

use crate::parameters::CalculationParameters;

/// Fractions of the night bounding Fajr (before sunrise) and Isha (after sunset).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NightPortions {
    pub fajr: f64,
    pub isha: f64,
}

pub fn night_portions(rule: HighLatitudeRule, params: &CalculationParameters) -> NightPortions {
    match rule {
        HighLatitudeRule::MiddleOfTheNight => NightPortions { fajr: 1.0 / 2.0, isha: 1.0 / 2.0 },
        HighLatitudeRule::SeventhOfTheNight => NightPortions { fajr: 1.0 / 7.0, isha: 1.0 / 7.0 },
        HighLatitudeRule::TwilightAngle => NightPortions {
            fajr: params.fajr_angle / 60.0,
            isha: params.isha_angle / 60.0,
        },
    }
}

fn fraction_of(night: TimeDelta, portion: f64) -> TimeDelta {
    TimeDelta::milliseconds((night.num_milliseconds() as f64 * portion) as i64)
}

/// Earliest acceptable Fajr: `portions.fajr` of the night before sunrise.
pub fn safe_fajr(sunrise: DateTime<Utc>, night: TimeDelta, portions: NightPortions) -> DateTime<Utc> {
    sunrise - fraction_of(night, portions.fajr)
}

/// Latest acceptable Isha: `portions.isha` of the night after sunset.
pub fn safe_isha(sunset: DateTime<Utc>, night: TimeDelta, portions: NightPortions) -> DateTime<Utc> {
    sunset + fraction_of(night, portions.isha)
}

/// Moonsighting Committee bound for Fajr: a latitude- and season-dependent
/// number of minutes before sunrise.
pub fn seasonal_fajr(sunrise: DateTime<Utc>, coordinates: &Coordinates, date: NaiveDate) -> DateTime<Utc> {
    let minutes = season_adjusted_morning_twilight(coordinates.latitude(), date.ordinal(), date.year());
    sunrise - TimeDelta::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Moonsighting Committee bound for Isha after sunset.
pub fn seasonal_isha(
    sunset: DateTime<Utc>,
    coordinates: &Coordinates,
    date: NaiveDate,
    shafaq: Shafaq,
) -> DateTime<Utc> {
    let minutes =
        season_adjusted_evening_twilight(coordinates.latitude(), date.ordinal(), date.year(), shafaq);
    sunset + TimeDelta::milliseconds((minutes * 60_000.0).round() as i64)
}

/// Direct Fajr unless it is missing or earlier than the bound.
pub fn resolve_fajr(direct: Option<DateTime<Utc>>, safe: DateTime<Utc>) -> DateTime<Utc> {
    match direct {
        Some(fajr) if fajr >= safe => fajr,
        Some(fajr) => {
            debug!(%fajr, %safe, "fajr earlier than night-fraction bound, using bound");
            safe
        }
        None => {
            debug!(%safe, "fajr twilight unreachable, using night-fraction bound");
            safe
        }
    }
}

/// Direct Isha unless it is missing or later than the bound.
pub fn resolve_isha(direct: Option<DateTime<Utc>>, safe: DateTime<Utc>) -> DateTime<Utc> {
    match direct {
        Some(isha) if isha <= safe => isha,
        Some(isha) => {
            debug!(%isha, %safe, "isha later than night-fraction bound, using bound");
            safe
        }
        None => {
            debug!(%safe, "isha twilight unreachable, using night-fraction bound");
            safe
        }
    }
}
