//! Prayer-time calculation: single days, night markers and multi-day schedules.

pub mod extension;
pub mod prayer_times;
pub mod schedule;
pub mod sunnah;

pub use miqat_astronomy::{qibla, SolarTime, MAKKAH};
pub use miqat_places::{find_place, get_place, Place, PlaceIndex};
pub use miqat_rules::{
    CalculationMethod, CalculationParameters, CalculationParametersBuilder, IshaRule, PrayerAdjustments,
};
pub use miqat_types::{
    round_minute, ClockTime, Coordinates, HighLatitudeRule, Madhab, MiqatError, PolarCircleResolution, Prayer,
    Rounding, Shafaq,
};

pub use extension::MiqatDateExt;
pub use prayer_times::{format_gap, PrayerTimes};
pub use schedule::{
    get_times, parse_date, parse_days, parse_offset, validate_date, DayTimes, Schedule, ScheduleRequest,
    ScheduleResponse, DEFAULT_DAYS, MAX_DAYS,
};
pub use sunnah::SunnahTimes;

/// Common imports.
pub mod prelude {
    pub use crate::extension::MiqatDateExt;
    pub use crate::prayer_times::PrayerTimes;
    pub use crate::schedule::{get_times, Schedule, ScheduleRequest};
    pub use miqat_rules::{CalculationMethod, CalculationParameters};
    pub use miqat_types::{ClockTime, Coordinates, Madhab, MiqatError, Prayer};
}
