use crate::astronomical as astro;
use crate::math::unwind_angle;

/// Equatorial position of the sun and Greenwich sidereal time at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCoordinates {
    /// Declination of the sun in degrees.
    pub declination: f64,
    /// Right ascension of the sun in degrees, `[0, 360)`.
    pub right_ascension: f64,
    /// Apparent sidereal time at Greenwich in degrees.
    pub apparent_sidereal_time: f64,
}

impl SolarCoordinates {
    pub fn new(julian_day: f64) -> Self {
        let t = astro::julian_century(julian_day);
        let l0 = astro::mean_solar_longitude(t);
        let lp = astro::mean_lunar_longitude(t);
        let omega = astro::ascending_lunar_node_longitude(t);
        let lambda = astro::apparent_solar_longitude(t, l0).to_radians();
        let theta0 = astro::mean_sidereal_time(t);
        let d_psi = astro::nutation_in_longitude(l0, lp, omega);
        let d_epsilon = astro::nutation_in_obliquity(l0, lp, omega);
        let epsilon0 = astro::mean_obliquity_of_the_ecliptic(t);
        let epsilon_app = astro::apparent_obliquity_of_the_ecliptic(t, epsilon0).to_radians();

        // Meeus 13.4
        let declination = (epsilon_app.sin() * lambda.sin()).asin().to_degrees();

        // Meeus 25.6, with the apparent obliquity
        let right_ascension = unwind_angle(
            (epsilon_app.cos() * lambda.sin())
                .atan2(lambda.cos())
                .to_degrees(),
        );

        // Meeus 12: equation of the equinoxes
        let apparent_sidereal_time =
            theta0 + (d_psi * 3600.0 * (epsilon0 + d_epsilon).to_radians().cos()) / 3600.0;

        Self {
            declination,
            right_ascension,
            apparent_sidereal_time,
        }
    }
}
