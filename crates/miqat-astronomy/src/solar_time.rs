//! Solar transit, sunrise, sunset and twilight for one day at one place.

use chrono::{Datelike, NaiveDate};
use miqat_types::Coordinates;

use crate::astronomical as astro;
use crate::solar_coordinates::SolarCoordinates;

/// Altitude of the sun's upper limb at sunrise/sunset: 34′ refraction + 16′ semi-diameter.
pub const SUNRISE_ALTITUDE: f64 = -50.0 / 60.0;

/// Solar geometry for one civil date at one location.
///
/// All instants are fractional hours from 0h UTC of the date. Transit sits
/// near local mean noon, so near the antimeridian it (and the events around
/// it) can fall outside `[0, 24)`. Any of them is NaN when the event does not
/// happen that day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarTime {
    /// Solar transit (local apparent noon).
    pub transit: f64,
    pub sunrise: f64,
    pub sunset: f64,
    observer: Coordinates,
    solar: SolarCoordinates,
    prev_solar: SolarCoordinates,
    next_solar: SolarCoordinates,
    approx_transit: f64,
}

impl SolarTime {
    pub fn new(date: NaiveDate, coordinates: Coordinates) -> Self {
        let julian_day = astro::julian_day(date.year(), date.month(), date.day(), 0.0);

        let solar = SolarCoordinates::new(julian_day);
        let prev_solar = SolarCoordinates::new(julian_day - 1.0);
        let next_solar = SolarCoordinates::new(julian_day + 1.0);

        let m0 = astro::approximate_transit(
            coordinates.longitude(),
            solar.apparent_sidereal_time,
            solar.right_ascension,
        );

        let transit = astro::corrected_transit(
            m0,
            coordinates.longitude(),
            solar.apparent_sidereal_time,
            solar.right_ascension,
            prev_solar.right_ascension,
            next_solar.right_ascension,
        );

        let mut this = Self {
            transit,
            sunrise: f64::NAN,
            sunset: f64::NAN,
            observer: coordinates,
            solar,
            prev_solar,
            next_solar,
            approx_transit: m0,
        };
        this.sunrise = this.hour_angle(SUNRISE_ALTITUDE, false);
        this.sunset = this.hour_angle(SUNRISE_ALTITUDE, true);
        this
    }

    /// Time the sun reaches `altitude` degrees (negative below the horizon),
    /// before or after transit. NaN if it never does.
    pub fn hour_angle(&self, altitude: f64, after_transit: bool) -> f64 {
        astro::corrected_hour_angle(
            self.approx_transit,
            altitude,
            &self.observer,
            after_transit,
            self.solar.apparent_sidereal_time,
            self.solar.right_ascension,
            self.prev_solar.right_ascension,
            self.next_solar.right_ascension,
            self.solar.declination,
            self.prev_solar.declination,
            self.next_solar.declination,
        )
    }

    /// Time the sun sits `depression` degrees below the horizon (twilight).
    pub fn depression(&self, depression: f64, after_transit: bool) -> f64 {
        self.hour_angle(-depression, after_transit)
    }

    /// Asr: the time after transit when an object's shadow is `shadow_length`
    /// times its height plus its noon shadow.
    pub fn afternoon(&self, shadow_length: f64) -> f64 {
        let tangent = (self.observer.latitude() - self.solar.declination).abs();
        let inverse = shadow_length + tangent.to_radians().tan();
        let angle = (1.0 / inverse).atan().to_degrees();
        self.hour_angle(angle, true)
    }

    /// True when both sunrise and sunset happen on this day.
    pub fn is_valid(&self) -> bool {
        self.sunrise.is_finite() && self.sunset.is_finite()
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.observer
    }

    /// Declination of the sun at 0h UTC in degrees.
    pub fn declination(&self) -> f64 {
        self.solar.declination
    }
}
