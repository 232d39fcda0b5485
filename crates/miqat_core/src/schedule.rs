//! Multi-day schedules in local wall-clock time.

use chrono::{NaiveDate, Utc};
use miqat_places::{find_place, Place};
use miqat_rules::{CalculationMethod, CalculationParameters};
use miqat_types::{ClockTime, Coordinates, Madhab, MiqatError};
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;
use tracing::{error, instrument};

use crate::prayer_times::compute_day;

/// Days computed when the caller gives no usable count.
pub const DEFAULT_DAYS: u32 = 100;

/// Longest schedule computed in one call, about ten years.
pub const MAX_DAYS: u32 = 3660;

/// One day's local times in order `[fajr, sunrise, dhuhr, asr, maghrib, isha]`.
/// `None` marks a prayer that could not be resolved.
pub type DayTimes = [Option<ClockTime>; 6];

/// Local times keyed by civil date, in date order.
///
/// Serializes as `{"2024-01-01": ["05:40", "06:58", ...], ...}` with `null`
/// for unresolved prayers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    days: BTreeMap<NaiveDate, DayTimes>,
}

impl Schedule {
    pub fn get(&self, date: &NaiveDate) -> Option<&DayTimes> {
        self.days.get(date)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayTimes)> {
        self.days.iter()
    }

    /// Days with at least one unresolved prayer.
    pub fn unresolved_days(&self) -> impl Iterator<Item = &NaiveDate> {
        self.days
            .iter()
            .filter(|(_, times)| times.iter().any(Option::is_none))
            .map(|(date, _)| date)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Computes `days` consecutive days (clamped to `1..=MAX_DAYS`) from `start`,
/// shifting each instant by `offset_minutes` into local time. A day whose instants come out
/// of order is logged and left fully unresolved; the rest still compute.
#[instrument(level = "debug", skip(params), fields(method = ?params.method))]
pub fn get_times(
    coordinates: Coordinates,
    start: NaiveDate,
    days: u32,
    offset_minutes: i32,
    params: &CalculationParameters,
) -> Schedule {
    let mut schedule = BTreeMap::new();

    for date in start.iter_days().take(days.clamp(1, MAX_DAYS) as usize) {
        let times = match compute_day(date, coordinates, params) {
            Ok(instants) => instants.map(|at| at.map(|at| ClockTime::from_utc(at, offset_minutes))),
            Err(e) => {
                error!(%date, error = %e, "prayer times out of order, day left unresolved");
                [None; 6]
            }
        };
        schedule.insert(date, times);
    }

    Schedule { days: schedule }
}

/// Checks a `YYYY-MM-DD` string with a year between 1000 and 3000.
pub fn validate_date(input: &str) -> Result<NaiveDate, MiqatError> {
    let bytes = input.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !shaped {
        return Err(MiqatError::invalid_date(input));
    }

    let number = |range: std::ops::Range<usize>| input[range].parse::<u32>().ok();
    let (Some(year), Some(month), Some(day)) = (number(0..4), number(5..7), number(8..10)) else {
        return Err(MiqatError::invalid_date(input));
    };
    if !(1000..=3000).contains(&year) {
        return Err(MiqatError::invalid_date(input));
    }

    NaiveDate::from_ymd_opt(year as i32, month, day).ok_or_else(|| MiqatError::invalid_date(input))
}

/// Lenient date: anything [`validate_date`] rejects becomes `today`.
pub fn parse_date(input: Option<&str>, today: NaiveDate) -> NaiveDate {
    input.and_then(|s| validate_date(s).ok()).unwrap_or(today)
}

/// Lenient day count: missing, unparsable or below one becomes [`DEFAULT_DAYS`].
/// Fractions round up; anything above [`MAX_DAYS`] is capped.
pub fn parse_days(input: Option<&str>) -> u32 {
    match input.and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(days) if days.is_finite() && days >= 1.0 => days.ceil().min(f64::from(MAX_DAYS)) as u32,
        _ => DEFAULT_DAYS,
    }
}

/// Lenient UTC offset in minutes: missing or unparsable becomes zero.
pub fn parse_offset(input: Option<&str>) -> i32 {
    match input.and_then(|s| s.trim().parse::<f64>().ok()) {
        Some(offset) if offset.is_finite() => offset.trunc() as i32,
        _ => 0,
    }
}

/// A schedule request as received from the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub start: NaiveDate,
    pub days: u32,
    /// Minutes added to UTC to get local time.
    pub timezone_offset: i32,
    pub parameters: CalculationParameters,
}

/// Nearest known place and the computed schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleResponse {
    pub place: Place,
    pub times: Schedule,
}

impl ScheduleRequest {
    /// Today (UTC), [`DEFAULT_DAYS`] days, UTC, Karachi with the Shafi'i Asr.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            start: Utc::now().date_naive(),
            days: DEFAULT_DAYS,
            timezone_offset: 0,
            parameters: CalculationMethod::Karachi.parameters().madhab(Madhab::Shafi),
        }
    }

    /// Builds a request from query-string values. Coordinates must parse;
    /// the rest fall back to defaults.
    pub fn from_query(
        latitude: &str,
        longitude: &str,
        date: Option<&str>,
        days: Option<&str>,
        timezone_offset: Option<&str>,
    ) -> Result<Self, MiqatError> {
        let lat = latitude.trim().parse::<f64>().unwrap_or(f64::NAN);
        let lng = longitude.trim().parse::<f64>().unwrap_or(f64::NAN);
        Coordinates::new(lat, lng)?;

        let mut request = Self::new(lat, lng);
        request.start = parse_date(date, request.start);
        request.days = parse_days(days);
        request.timezone_offset = parse_offset(timezone_offset);
        Ok(request)
    }

    pub fn start(mut self, start: NaiveDate) -> Self {
        self.start = start;
        self
    }

    pub fn days(mut self, days: u32) -> Self {
        self.days = days;
        self
    }

    pub fn timezone_offset(mut self, minutes: i32) -> Self {
        self.timezone_offset = minutes;
        self
    }

    pub fn parameters(mut self, parameters: CalculationParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn validate(&self) -> Result<Coordinates, MiqatError> {
        self.parameters.validate()?;
        Coordinates::new(self.latitude, self.longitude)
    }

    #[instrument(skip(self), fields(latitude = self.latitude, longitude = self.longitude, days = self.days))]
    pub fn execute(&self) -> Result<ScheduleResponse, MiqatError> {
        let coordinates = self.validate()?;
        Ok(ScheduleResponse {
            place: find_place(self.latitude, self.longitude),
            times: get_times(coordinates, self.start, self.days, self.timezone_offset, &self.parameters),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miqat_types::PolarCircleResolution;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn karachi() -> CalculationParameters {
        CalculationMethod::Karachi.parameters()
    }

    #[test]
    fn test_day_count_and_order() {
        let coords = Coordinates::new(24.8607, 67.0011).unwrap();
        let schedule = get_times(coords, date(2024, 12, 30), 5, 300, &karachi());
        let dates: Vec<_> = schedule.iter().map(|(d, _)| *d).collect();
        assert_eq!(
            dates,
            vec![date(2024, 12, 30), date(2024, 12, 31), date(2025, 1, 1), date(2025, 1, 2), date(2025, 1, 3)]
        );
        assert_eq!(schedule.unresolved_days().count(), 0);
    }

    #[test]
    fn test_zero_days_yields_one() {
        let coords = Coordinates::new(24.8607, 67.0011).unwrap();
        assert_eq!(get_times(coords, date(2024, 1, 1), 0, 0, &karachi()).len(), 1);
    }

    #[test]
    fn test_day_count_is_capped() {
        let coords = Coordinates::new(24.8607, 67.0011).unwrap();
        let schedule = get_times(coords, date(2024, 1, 1), u32::MAX, 0, &karachi());
        assert_eq!(schedule.len(), MAX_DAYS as usize);
    }

    #[test]
    fn test_deterministic() {
        let coords = Coordinates::new(51.5074, -0.1278).unwrap();
        let a = get_times(coords, date(2024, 3, 1), 30, 0, &karachi());
        let b = get_times(coords, date(2024, 3, 1), 30, 0, &karachi());
        assert_eq!(a, b);
    }

    #[test]
    fn test_offset_shifts_every_time() {
        let coords = Coordinates::new(-6.2088, 106.8456).unwrap();
        let utc = get_times(coords, date(2024, 8, 1), 10, 0, &karachi());
        let local = get_times(coords, date(2024, 8, 1), 10, 60, &karachi());

        for ((_, a), (_, b)) in utc.iter().zip(local.iter()) {
            for (a, b) in a.iter().zip(b.iter()) {
                let (a, b) = (a.unwrap(), b.unwrap());
                assert_eq!(a.shifted(60), b);
            }
        }
    }

    #[test]
    fn test_polar_days_are_null_not_fatal() {
        let coords = Coordinates::new(85.0, 0.0).unwrap();
        let schedule = get_times(coords, date(2024, 6, 20), 3, 0, &karachi());
        assert_eq!(schedule.len(), 3);
        let day = schedule.get(&date(2024, 6, 21)).unwrap();
        assert!(day[1].is_none());
        assert!(day[2].is_some());

        let json = schedule.to_json().unwrap();
        assert!(json.starts_with("{\"2024-06-20\":["));
        assert!(json.contains("null"));
    }

    #[test]
    fn test_polar_days_resolved_with_nearest_day() {
        let coords = Coordinates::new(85.0, 0.0).unwrap();
        let params = karachi().polar_circle_resolution(PolarCircleResolution::AqrabYaum);
        let schedule = get_times(coords, date(2024, 6, 20), 3, 0, &params);
        assert_eq!(schedule.unresolved_days().count(), 0);
    }

    #[test]
    fn test_order_violation_marks_day_unresolved() {
        let cairo = Coordinates::new(30.0444, 31.2357).unwrap();
        let schedule = get_times(cairo, date(2024, 3, 1), 2, 0, &CalculationParameters::default());
        assert_eq!(schedule.unresolved_days().count(), 2);
        assert_eq!(schedule.get(&date(2024, 3, 1)).unwrap(), &[None; 6]);
    }

    #[test]
    fn test_json_round_trip_shape() {
        let coords = Coordinates::new(21.4225, 39.8262).unwrap();
        let schedule = get_times(coords, date(2024, 2, 1), 2, 180, &karachi());
        let json = schedule.to_json().unwrap();
        let back: Schedule = serde_json::from_str(&json).unwrap();
        assert_eq!(back, schedule);
    }

    #[test]
    fn test_date_validation() {
        assert_eq!(validate_date("2024-02-29").unwrap(), date(2024, 2, 29));
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("0999-01-01").is_err());
        assert!(validate_date("3001-01-01").is_err());
        assert!(validate_date("2024-1-01").is_err());
        assert!(validate_date("2024-13-01").is_err());
        assert!(validate_date("2024/01/01").is_err());
        assert!(validate_date("+024-01-01").is_err());

        let today = date(2025, 5, 5);
        assert_eq!(parse_date(Some("2024-01-15"), today), date(2024, 1, 15));
        assert_eq!(parse_date(Some("yesterday"), today), today);
        assert_eq!(parse_date(None, today), today);
    }

    #[test]
    fn test_lenient_numbers() {
        assert_eq!(parse_days(Some("7")), 7);
        assert_eq!(parse_days(Some("2.5")), 3);
        assert_eq!(parse_days(Some("0")), DEFAULT_DAYS);
        assert_eq!(parse_days(Some("-3")), DEFAULT_DAYS);
        assert_eq!(parse_days(Some("abc")), DEFAULT_DAYS);
        assert_eq!(parse_days(None), DEFAULT_DAYS);
        assert_eq!(parse_days(Some("1e12")), MAX_DAYS);
        assert_eq!(parse_days(Some("3661")), MAX_DAYS);

        assert_eq!(parse_offset(Some("330")), 330);
        assert_eq!(parse_offset(Some("-240")), -240);
        assert_eq!(parse_offset(Some("x")), 0);
        assert_eq!(parse_offset(None), 0);
    }

    #[test]
    fn test_request_from_query() {
        let request =
            ScheduleRequest::from_query("21.4225", "39.8262", Some("2024-03-10"), Some("3"), Some("180")).unwrap();
        assert_eq!(request.start, date(2024, 3, 10));
        assert_eq!(request.days, 3);
        assert_eq!(request.parameters.method, CalculationMethod::Karachi);
        assert_eq!(request.parameters.madhab, Madhab::Shafi);

        let response = request.execute().unwrap();
        assert_eq!(response.place.city, "Mecca");
        assert_eq!(response.times.len(), 3);

        let err = ScheduleRequest::from_query("91", "0", None, None, None).unwrap_err();
        assert!(matches!(err, MiqatError::InvalidCoordinates { .. }));
        assert!(ScheduleRequest::from_query("north", "0", None, None, None).is_err());
    }

    #[test]
    fn test_execute_rejects_bad_coordinates() {
        let request = ScheduleRequest::new(10.0, 200.0).start(date(2024, 1, 1));
        let err = request.execute().unwrap_err();
        assert_eq!(err.to_string(), "Invalid latitude/longitude values: \"10, 200\"");
        assert!(err.is_client_fault());
    }
}
