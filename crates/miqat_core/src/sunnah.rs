use chrono::{DateTime, TimeDelta, Utc};
use miqat_types::{round_minute, MiqatError, Rounding};
use serde::Serialize;

use crate::prayer_times::PrayerTimes;

/// Night-prayer markers between today's Maghrib and tomorrow's Fajr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SunnahTimes {
    pub middle_of_the_night: DateTime<Utc>,
    pub last_third_of_the_night: DateTime<Utc>,
}

impl SunnahTimes {
    /// Fails if the following day cannot be computed.
    pub fn new(prayer_times: &PrayerTimes) -> Result<Self, MiqatError> {
        let next_date = prayer_times
            .date
            .succ_opt()
            .ok_or_else(|| MiqatError::invalid_date(prayer_times.date.to_string()))?;
        let tomorrow = PrayerTimes::new(next_date, *prayer_times.coordinates(), prayer_times.parameters())?;

        let night = tomorrow.fajr - prayer_times.maghrib;
        let maghrib = prayer_times.maghrib;

        Ok(Self {
            middle_of_the_night: round_minute(maghrib + night / 2, Rounding::Nearest),
            last_third_of_the_night: round_minute(
                maghrib + TimeDelta::milliseconds(night.num_milliseconds() * 2 / 3),
                Rounding::Nearest,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};
    use miqat_rules::CalculationMethod;
    use miqat_types::Coordinates;

    #[test]
    fn test_night_markers() {
        let params = CalculationMethod::MuslimWorldLeague.parameters();
        let coords = Coordinates::new(35.7750, -78.6336).unwrap();
        let date = NaiveDate::from_ymd_opt(2015, 7, 12).unwrap();
        let times = PrayerTimes::new(date, coords, &params).unwrap();
        let sunnah = SunnahTimes::new(&times).unwrap();

        assert!(times.maghrib < sunnah.middle_of_the_night);
        assert!(sunnah.middle_of_the_night < sunnah.last_third_of_the_night);

        // Middle of a night that runs from 00:32 to about 08:30 UTC.
        let lower = Utc.with_ymd_and_hms(2015, 7, 13, 4, 0, 0).unwrap();
        let upper = Utc.with_ymd_and_hms(2015, 7, 13, 5, 0, 0).unwrap();
        assert!(sunnah.middle_of_the_night > lower);
        assert!(sunnah.middle_of_the_night < upper);
    }
}
