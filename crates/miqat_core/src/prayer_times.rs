//! One day's prayer times at one place.

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use miqat_rules::high_latitude::{self, NightPortions};
use miqat_rules::{polar, CalculationMethod, CalculationParameters, IshaRule, PolarResolution};
use miqat_types::{round_minute, ClockTime, Coordinates, MiqatError, PolarCircleResolution, Prayer};
use serde::Serialize;
use smallvec::SmallVec;

/// Instants in prayer order; `None` where the prayer stayed unresolved.
pub(crate) type DayInstants = [Option<DateTime<Utc>>; 6];

/// At and above this latitude the Moonsighting Committee bounds twilight by
/// a seventh of the night.
const MOONSIGHTING_SEVENTH_LATITUDE: f64 = 55.0;

/// Seconds added to the transit so Dhuhr falls after the zenith. Past 30 s
/// so that rounding to the nearest minute cannot pull it back before noon.
const DHUHR_OFFSET_SECONDS: f64 = 31.0;

/// Fractional UTC hours on `date` to an instant, truncated to whole seconds.
fn instant(date: NaiveDate, hours: f64) -> Option<DateTime<Utc>> {
    if !hours.is_finite() {
        return None;
    }
    let h = hours.floor();
    let m = ((hours - h) * 60.0).floor();
    let s = ((hours - (h + m / 60.0)) * 3600.0).floor();
    let seconds = TimeDelta::try_seconds((h * 3600.0 + m * 60.0 + s) as i64)?;
    date.and_hms_opt(0, 0, 0)?.and_utc().checked_add_signed(seconds)
}

fn solar_geometry(date: NaiveDate, coordinates: Coordinates, params: &CalculationParameters) -> PolarResolution {
    let direct = PolarResolution::direct(date, coordinates);
    match params.polar_circle_resolution {
        PolarCircleResolution::Unresolved => direct,
        _ if direct.is_valid() => direct,
        resolver => polar::resolve(resolver, date, coordinates),
    }
}

/// Astronomical instants before adjustments and rounding.
fn base_instants(date: NaiveDate, coordinates: Coordinates, params: &CalculationParameters) -> DayInstants {
    let geometry = solar_geometry(date, coordinates, params);
    let solar = &geometry.solar_time;
    let next_day = date.succ_opt().unwrap_or(date);

    let dhuhr = instant(date, solar.transit + DHUHR_OFFSET_SECONDS / 3600.0);
    let sunrise = instant(date, solar.sunrise);
    let sunset = instant(date, solar.sunset);
    let asr = instant(date, solar.afternoon(params.madhab.shadow_length()));
    let tomorrow_sunrise = instant(next_day, geometry.tomorrow_solar_time.sunrise);

    let night = match (sunset, tomorrow_sunrise) {
        (Some(sunset), Some(tomorrow)) => Some(tomorrow - sunset),
        _ => None,
    };

    let portions: NightPortions = params.night_portions(&coordinates);
    let moonsighting = params.method == CalculationMethod::MoonsightingCommittee;
    let seventh = moonsighting && coordinates.latitude() >= MOONSIGHTING_SEVENTH_LATITUDE;

    let direct_fajr = instant(date, solar.depression(params.fajr_angle, false));
    let fajr = match sunrise {
        Some(sunrise) => {
            let direct = match night {
                Some(night) if seventh => Some(sunrise - night / 7),
                _ => direct_fajr,
            };
            let safe = if moonsighting {
                Some(high_latitude::seasonal_fajr(sunrise, &coordinates, date))
            } else {
                night.map(|night| high_latitude::safe_fajr(sunrise, night, portions))
            };
            match safe {
                Some(safe) => Some(high_latitude::resolve_fajr(direct, safe)),
                None => direct,
            }
        }
        None => direct_fajr,
    };

    let isha = match params.isha() {
        IshaRule::Interval(minutes) => sunset.map(|sunset| sunset + TimeDelta::minutes(i64::from(minutes))),
        IshaRule::Angle(angle) => {
            let direct_isha = instant(date, solar.depression(angle, true));
            match sunset {
                Some(sunset) => {
                    let direct = match night {
                        Some(night) if seventh => Some(sunset + night / 7),
                        _ => direct_isha,
                    };
                    let safe = if moonsighting {
                        Some(high_latitude::seasonal_isha(sunset, &coordinates, date, params.shafaq))
                    } else {
                        night.map(|night| high_latitude::safe_isha(sunset, night, portions))
                    };
                    match safe {
                        Some(safe) => Some(high_latitude::resolve_isha(direct, safe)),
                        None => direct,
                    }
                }
                None => direct_isha,
            }
        }
    };

    let mut maghrib = sunset;
    if let (Some(angle), Some(sunset), Some(isha)) = (params.maghrib_angle, sunset, isha) {
        if let Some(by_angle) = instant(date, solar.depression(angle, true)) {
            if sunset < by_angle && by_angle < isha {
                maghrib = Some(by_angle);
            }
        }
    }

    [fajr, sunrise, dhuhr, asr, maghrib, isha]
}

fn adjusted(instants: DayInstants, params: &CalculationParameters) -> DayInstants {
    let adjustments = params.total_adjustments();
    let mut out = instants;
    for prayer in Prayer::ALL {
        let minutes = TimeDelta::minutes(i64::from(adjustments.get(prayer)));
        out[prayer.index()] = instants[prayer.index()].map(|at| round_minute(at + minutes, params.rounding));
    }
    out
}

/// Resolved instants must be strictly increasing in prayer order.
fn check_order(date: NaiveDate, instants: &DayInstants) -> Result<(), MiqatError> {
    let mut previous: Option<(Prayer, DateTime<Utc>)> = None;
    for prayer in Prayer::ALL {
        let Some(at) = instants[prayer.index()] else { continue };
        if let Some((earlier, earlier_at)) = previous {
            if at <= earlier_at {
                return Err(MiqatError::OrderViolation { date, earlier, later: prayer });
            }
        }
        previous = Some((prayer, at));
    }
    Ok(())
}

/// Adjusted and rounded instants for one day. Unreachable prayers are
/// `None`; an ordering problem among the rest is an error.
pub(crate) fn compute_day(
    date: NaiveDate,
    coordinates: Coordinates,
    params: &CalculationParameters,
) -> Result<DayInstants, MiqatError> {
    let instants = adjusted(base_instants(date, coordinates, params), params);
    check_order(date, &instants)?;
    Ok(instants)
}

/// The six instants of one day, all resolved and in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerTimes {
    pub date: NaiveDate,
    pub fajr: DateTime<Utc>,
    pub sunrise: DateTime<Utc>,
    pub dhuhr: DateTime<Utc>,
    pub asr: DateTime<Utc>,
    pub maghrib: DateTime<Utc>,
    pub isha: DateTime<Utc>,
    #[serde(skip)]
    coordinates: Coordinates,
    #[serde(skip)]
    parameters: CalculationParameters,
}

impl PrayerTimes {
    /// Computes the day. Fails with [`MiqatError::Unresolved`] if any prayer
    /// stays unreachable after the high-latitude and polar fallbacks.
    pub fn new(
        date: NaiveDate,
        coordinates: Coordinates,
        parameters: &CalculationParameters,
    ) -> Result<Self, MiqatError> {
        let instants = compute_day(date, coordinates, parameters)?;

        let unresolved: SmallVec<[Prayer; 6]> = Prayer::ALL
            .into_iter()
            .filter(|p| instants[p.index()].is_none())
            .collect();

        match instants {
            [Some(fajr), Some(sunrise), Some(dhuhr), Some(asr), Some(maghrib), Some(isha)] => Ok(Self {
                date,
                fajr,
                sunrise,
                dhuhr,
                asr,
                maghrib,
                isha,
                coordinates,
                parameters: parameters.clone(),
            }),
            _ => Err(MiqatError::Unresolved { date, prayers: unresolved }),
        }
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn parameters(&self) -> &CalculationParameters {
        &self.parameters
    }

    pub fn time_for_prayer(&self, prayer: Prayer) -> DateTime<Utc> {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    /// Latest prayer whose time has arrived, or `None` before Fajr.
    pub fn current_prayer(&self, at: DateTime<Utc>) -> Option<Prayer> {
        Prayer::ALL
            .into_iter()
            .rev()
            .find(|&p| self.time_for_prayer(p) <= at)
    }

    /// First prayer still ahead, or `None` after Isha.
    pub fn next_prayer(&self, at: DateTime<Utc>) -> Option<Prayer> {
        Prayer::ALL.into_iter().find(|&p| self.time_for_prayer(p) > at)
    }

    /// Time from `at` until the prayer's wall-clock time, looking at most one
    /// day ahead: a time already passed counts from the same time tomorrow.
    pub fn time_until(&self, prayer: Prayer, at: DateTime<Utc>) -> TimeDelta {
        let mut target = self.time_for_prayer(prayer);
        while target < at {
            target += TimeDelta::days(1);
        }
        target - at
    }

    /// Local wall-clock times for a fixed UTC offset in minutes.
    pub fn local_times(&self, offset_minutes: i32) -> [ClockTime; 6] {
        Prayer::ALL.map(|p| ClockTime::from_utc(self.time_for_prayer(p), offset_minutes))
    }
}

/// Formats a gap as `"2h 5m"`, or `"5m"` under an hour.
pub fn format_gap(gap: TimeDelta) -> String {
    let hours = gap.num_hours();
    let minutes = gap.num_minutes() - hours * 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use miqat_types::{HighLatitudeRule, Madhab, Rounding};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn minutes_of_day(clock: ClockTime) -> i64 {
        clock.minutes_since_midnight()
    }

    #[test]
    fn test_raleigh_north_america_hanafi() {
        let params = CalculationMethod::NorthAmerica.parameters().madhab(Madhab::Hanafi);
        let coords = Coordinates::new(35.7750, -78.6336).unwrap();
        let times = PrayerTimes::new(date(2015, 7, 12), coords, &params).unwrap();

        // EDT is UTC-4.
        let local = times.local_times(-240);
        let expected = [(4, 42), (6, 8), (13, 21), (18, 22), (20, 32), (21, 57)];
        for (clock, (h, m)) in local.iter().zip(expected) {
            let diff = minutes_of_day(*clock) - (h * 60 + m);
            assert!(diff.abs() <= 1, "{} expected {:02}:{:02}", clock, h, m);
        }
    }

    #[test]
    fn test_mecca_dhuhr_near_solar_noon() {
        let params = CalculationMethod::Karachi.parameters();
        let mecca = Coordinates::new(21.4225, 39.8262).unwrap();
        let times = PrayerTimes::new(date(2024, 1, 1), mecca, &params).unwrap();
        let noon = Utc.with_ymd_and_hms(2024, 1, 1, 9, 20, 0).unwrap();
        assert!(times.dhuhr > noon);
        assert!(times.dhuhr < noon + TimeDelta::minutes(10));
        assert_eq!(times.dhuhr.second(), 0);
    }

    #[test]
    fn test_dhuhr_follows_transit_for_every_preset() {
        let mecca = Coordinates::new(21.4225, 39.8262).unwrap();
        for method in CalculationMethod::ALL {
            let params = method.parameters();
            for d in date(2024, 1, 1).iter_days().take(366) {
                let transit = miqat_astronomy::SolarTime::new(d, mecca).transit;
                let dhuhr = adjusted(base_instants(d, mecca, &params), &params)[Prayer::Dhuhr.index()].unwrap();
                let midnight = d.and_hms_opt(0, 0, 0).unwrap().and_utc();
                let hours = (dhuhr - midnight).num_milliseconds() as f64 / 3_600_000.0;
                assert!(hours > transit, "{} on {}: dhuhr {} before transit {}", method, d, dhuhr, transit);
            }
        }
    }

    #[test]
    fn test_high_latitude_rule_defaults_to_recommended() {
        let oslo = Coordinates::new(59.91, 10.75).unwrap();
        let d = date(2024, 6, 21);
        let unset = CalculationMethod::MuslimWorldLeague.parameters();
        assert_eq!(unset.high_latitude_rule, None);

        let seventh = unset.clone().high_latitude_rule(HighLatitudeRule::SeventhOfTheNight);
        let middle = unset.clone().high_latitude_rule(HighLatitudeRule::MiddleOfTheNight);
        let auto = PrayerTimes::new(d, oslo, &unset).unwrap();
        let by_seventh = PrayerTimes::new(d, oslo, &seventh).unwrap();
        assert_eq!((auto.fajr, auto.isha), (by_seventh.fajr, by_seventh.isha));
        assert!(auto.isha < PrayerTimes::new(d, oslo, &middle).unwrap().isha);
    }

    #[test]
    fn test_antimeridian_days_stay_ordered() {
        let params = CalculationMethod::MuslimWorldLeague.parameters();
        for lng in [178.0, 180.0, -179.0, -179.9] {
            let coords = Coordinates::new(-13.8, lng).unwrap();
            for d in date(2024, 1, 1).iter_days().take(366) {
                let times = PrayerTimes::new(d, coords, &params);
                assert!(times.is_ok(), "{} at {}: {:?}", d, lng, times);
            }
        }
    }

    #[test]
    fn test_high_latitude_isha_is_resolved() {
        let params = CalculationMethod::MuslimWorldLeague.parameters();
        let coords = Coordinates::new(60.0, 10.0).unwrap();
        let times = PrayerTimes::new(date(2024, 6, 21), coords, &params).unwrap();
        assert!(times.maghrib < times.isha);
        assert!(times.isha - times.maghrib < TimeDelta::hours(4));
    }

    #[test]
    fn test_polar_day_unresolved_by_default() {
        let params = CalculationMethod::MuslimWorldLeague.parameters();
        let coords = Coordinates::new(85.0, 0.0).unwrap();
        let err = PrayerTimes::new(date(2024, 6, 21), coords, &params).unwrap_err();
        match err {
            MiqatError::Unresolved { prayers, .. } => {
                assert!(prayers.contains(&Prayer::Sunrise));
                assert!(prayers.contains(&Prayer::Maghrib));
                assert!(!prayers.contains(&Prayer::Dhuhr));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_polar_day_nearest_day_resolves() {
        let params = CalculationMethod::MuslimWorldLeague
            .parameters()
            .polar_circle_resolution(PolarCircleResolution::AqrabYaum);
        let coords = Coordinates::new(85.0, 0.0).unwrap();
        let times = PrayerTimes::new(date(2024, 6, 21), coords, &params).unwrap();
        assert_eq!(times.dhuhr.date_naive(), date(2024, 6, 21));
    }

    #[test]
    fn test_order_violation_is_reported() {
        // Zero-degree twilight puts Fajr after the refracted sunrise.
        let params = CalculationParameters::default();
        let cairo = Coordinates::new(30.0444, 31.2357).unwrap();
        let err = PrayerTimes::new(date(2024, 3, 1), cairo, &params).unwrap_err();
        assert_eq!(
            err,
            MiqatError::OrderViolation { date: date(2024, 3, 1), earlier: Prayer::Fajr, later: Prayer::Sunrise }
        );
    }

    #[test]
    fn test_interval_isha() {
        let params = CalculationMethod::UmmAlQura.parameters();
        let mecca = Coordinates::new(21.4225, 39.8262).unwrap();
        let times = PrayerTimes::new(date(2024, 3, 15), mecca, &params).unwrap();
        assert_eq!(times.isha - times.maghrib, TimeDelta::minutes(90));
    }

    #[test]
    fn test_maghrib_angle_delays_maghrib() {
        let tehran = Coordinates::new(35.6892, 51.3890).unwrap();
        let params = CalculationMethod::Tehran.parameters();
        let mut plain = params.clone();
        plain.maghrib_angle = None;

        let with_angle = PrayerTimes::new(date(2024, 9, 1), tehran, &params).unwrap();
        let without = PrayerTimes::new(date(2024, 9, 1), tehran, &plain).unwrap();
        assert!(with_angle.maghrib > without.maghrib);
        assert_eq!(with_angle.isha, without.isha);
    }

    #[test]
    fn test_adjustments_shift_by_whole_minutes() {
        let coords = Coordinates::new(30.0444, 31.2357).unwrap();
        let base = CalculationMethod::Egyptian.parameters();
        let shifted = base.clone().adjustments(miqat_rules::PrayerAdjustments { asr: 10, ..Default::default() });

        let a = PrayerTimes::new(date(2024, 5, 5), coords, &base).unwrap();
        let b = PrayerTimes::new(date(2024, 5, 5), coords, &shifted).unwrap();
        assert_eq!(b.asr - a.asr, TimeDelta::minutes(10));
        assert_eq!(b.fajr, a.fajr);
    }

    #[test]
    fn test_rounding_none_truncates() {
        let coords = Coordinates::new(30.0444, 31.2357).unwrap();
        let params = CalculationMethod::Egyptian.parameters().rounding(Rounding::None);
        let times = PrayerTimes::new(date(2024, 5, 5), coords, &params).unwrap();
        for prayer in Prayer::ALL {
            assert_eq!(times.time_for_prayer(prayer).second(), 0);
        }
    }

    #[test]
    fn test_current_and_next_prayer() {
        let params = CalculationMethod::Karachi.parameters();
        let karachi = Coordinates::new(24.8607, 67.0011).unwrap();
        let times = PrayerTimes::new(date(2024, 4, 10), karachi, &params).unwrap();

        let before_fajr = times.fajr - TimeDelta::minutes(5);
        assert_eq!(times.current_prayer(before_fajr), None);
        assert_eq!(times.next_prayer(before_fajr), Some(Prayer::Fajr));

        let after_asr = times.asr + TimeDelta::minutes(1);
        assert_eq!(times.current_prayer(after_asr), Some(Prayer::Asr));
        assert_eq!(times.next_prayer(after_asr), Some(Prayer::Maghrib));

        assert_eq!(times.current_prayer(times.isha), Some(Prayer::Isha));
        assert_eq!(times.next_prayer(times.isha), None);
    }

    #[test]
    fn test_time_until_wraps_to_tomorrow() {
        let params = CalculationMethod::Karachi.parameters();
        let karachi = Coordinates::new(24.8607, 67.0011).unwrap();
        let times = PrayerTimes::new(date(2024, 4, 10), karachi, &params).unwrap();

        let at = times.dhuhr - TimeDelta::minutes(65);
        assert_eq!(times.time_until(Prayer::Dhuhr, at), TimeDelta::minutes(65));
        assert_eq!(format_gap(times.time_until(Prayer::Dhuhr, at)), "1h 5m");

        let at = times.fajr + TimeDelta::minutes(10);
        assert_eq!(
            times.time_until(Prayer::Fajr, at),
            TimeDelta::days(1) - TimeDelta::minutes(10)
        );
        assert_eq!(format_gap(TimeDelta::minutes(7)), "7m");
    }

    #[test]
    fn test_instant_truncates_to_seconds() {
        let at = instant(date(2024, 1, 1), 12.5 + 0.7 / 3600.0).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap());
        let late = instant(date(2024, 1, 1), 24.5).unwrap();
        assert_eq!(late, Utc.with_ymd_and_hms(2024, 1, 2, 0, 30, 0).unwrap());
        let early = instant(date(2024, 1, 1), -0.5).unwrap();
        assert_eq!(early, Utc.with_ymd_and_hms(2023, 12, 31, 23, 30, 0).unwrap());
        assert!(instant(date(2024, 1, 1), f64::NAN).is_none());
    }
}
