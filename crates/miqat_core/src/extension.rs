//! Extension trait for `NaiveDate`.

use chrono::NaiveDate;
use miqat_rules::CalculationParameters;
use miqat_types::{Coordinates, MiqatError};

use crate::prayer_times::PrayerTimes;
use crate::sunnah::SunnahTimes;

/// Extends `NaiveDate` with prayer-time calculation.
pub trait MiqatDateExt {
    /// Prayer times for this date, or `None` if any prayer is unresolved.
    fn prayer_times(&self, coordinates: Coordinates, params: &CalculationParameters) -> Option<PrayerTimes>;

    /// Prayer times for this date. Safe version with the failure reason.
    fn try_prayer_times(
        &self,
        coordinates: Coordinates,
        params: &CalculationParameters,
    ) -> Result<PrayerTimes, MiqatError>;

    /// Middle and last third of the night starting on this date.
    fn sunnah_times(
        &self,
        coordinates: Coordinates,
        params: &CalculationParameters,
    ) -> Result<SunnahTimes, MiqatError>;
}

impl MiqatDateExt for NaiveDate {
    fn prayer_times(&self, coordinates: Coordinates, params: &CalculationParameters) -> Option<PrayerTimes> {
        self.try_prayer_times(coordinates, params).ok()
    }

    fn try_prayer_times(
        &self,
        coordinates: Coordinates,
        params: &CalculationParameters,
    ) -> Result<PrayerTimes, MiqatError> {
        PrayerTimes::new(*self, coordinates, params)
    }

    fn sunnah_times(
        &self,
        coordinates: Coordinates,
        params: &CalculationParameters,
    ) -> Result<SunnahTimes, MiqatError> {
        SunnahTimes::new(&self.try_prayer_times(coordinates, params)?)
    }
}
