//! Low-precision solar ephemeris.
//!
//! Formulas follow Jean Meeus, *Astronomical Algorithms* (2nd ed.). Every
//! function takes and returns degrees; radians appear only at trigonometric
//! call sites. `T` is the number of Julian centuries since J2000.0.
//!
//! None of these functions fail. Accuracy degrades slowly for dates far from
//! the present, and [`corrected_hour_angle`] returns NaN when the requested
//! altitude is never reached that day.

use miqat_types::Coordinates;

use crate::math::{quadrant_shift_angle, unwind_angle};

/// Julian day of J2000.0.
pub const J2000: f64 = 2_451_545.0;

/// Sidereal rotation in degrees per solar day.
const SIDEREAL_RATE: f64 = 360.985_647;

/// Geometric mean longitude of the sun, λ0 (Meeus 25.2).
pub fn mean_solar_longitude(t: f64) -> f64 {
    let term1 = 280.466_456_7;
    let term2 = 36_000.769_83 * t;
    let term3 = 0.000_303_2 * t.powi(2);
    unwind_angle(term1 + term2 + term3)
}

/// Mean longitude of the moon, L′ (Meeus ch. 22).
pub fn mean_lunar_longitude(t: f64) -> f64 {
    let term1 = 218.316_5;
    let term2 = 481_267.881_3 * t;
    unwind_angle(term1 + term2)
}

/// Longitude of the moon's ascending node, Ω (Meeus ch. 22).
pub fn ascending_lunar_node_longitude(t: f64) -> f64 {
    let term1 = 125.044_52;
    let term2 = 1_934.136_261 * t;
    let term3 = 0.002_070_8 * t.powi(2);
    let term4 = t.powi(3) / 450_000.0;
    unwind_angle(term1 - term2 + term3 + term4)
}

/// Mean anomaly of the sun, M (Meeus 25.3).
pub fn mean_solar_anomaly(t: f64) -> f64 {
    let term1 = 357.529_11;
    let term2 = 35_999.050_29 * t;
    let term3 = 0.000_153_7 * t.powi(2);
    unwind_angle(term1 + term2 - term3)
}

/// Sun's equation of the center, C (Meeus ch. 25).
pub fn solar_equation_of_the_center(t: f64, m: f64) -> f64 {
    let mrad = m.to_radians();
    let term1 = (1.914_602 - 0.004_817 * t - 0.000_014 * t.powi(2)) * mrad.sin();
    let term2 = (0.019_993 - 0.000_101 * t) * (2.0 * mrad).sin();
    let term3 = 0.000_289 * (3.0 * mrad).sin();
    term1 + term2 + term3
}

/// Apparent longitude of the sun, corrected for nutation and aberration (Meeus ch. 25).
pub fn apparent_solar_longitude(t: f64, l0: f64) -> f64 {
    let longitude = l0 + solar_equation_of_the_center(t, mean_solar_anomaly(t));
    let omega = 125.04 - 1_934.136 * t;
    let lambda = longitude - 0.005_69 - 0.004_78 * omega.to_radians().sin();
    unwind_angle(lambda)
}

/// Mean obliquity of the ecliptic, ε0 (Meeus 22.2).
pub fn mean_obliquity_of_the_ecliptic(t: f64) -> f64 {
    let term1 = 23.439_291;
    let term2 = 0.013_004_167 * t;
    let term3 = 0.000_000_163_9 * t.powi(2);
    let term4 = 0.000_000_503_6 * t.powi(3);
    term1 - term2 - term3 + term4
}

/// Apparent obliquity of the ecliptic, ε (Meeus 25.8).
pub fn apparent_obliquity_of_the_ecliptic(t: f64, epsilon0: f64) -> f64 {
    let o = 125.04 - 1_934.136 * t;
    epsilon0 + 0.002_56 * o.to_radians().cos()
}

/// Mean sidereal time at Greenwich, θ0 (Meeus 12.4).
pub fn mean_sidereal_time(t: f64) -> f64 {
    let jd = t * 36_525.0 + J2000;
    let term1 = 280.460_618_37;
    let term2 = 360.985_647_366_29 * (jd - J2000);
    let term3 = 0.000_387_933 * t.powi(2);
    let term4 = t.powi(3) / 38_710_000.0;
    unwind_angle(term1 + term2 + term3 - term4)
}

/// Nutation in longitude, ΔΨ (Meeus ch. 22).
pub fn nutation_in_longitude(l0: f64, lp: f64, omega: f64) -> f64 {
    let term1 = (-17.2 / 3600.0) * omega.to_radians().sin();
    let term2 = (1.32 / 3600.0) * (2.0 * l0).to_radians().sin();
    let term3 = (0.23 / 3600.0) * (2.0 * lp).to_radians().sin();
    let term4 = (0.21 / 3600.0) * (2.0 * omega).to_radians().sin();
    term1 - term2 - term3 + term4
}

/// Nutation in obliquity, Δε (Meeus ch. 22).
pub fn nutation_in_obliquity(l0: f64, lp: f64, omega: f64) -> f64 {
    let term1 = (9.2 / 3600.0) * omega.to_radians().cos();
    let term2 = (0.57 / 3600.0) * (2.0 * l0).to_radians().cos();
    let term3 = (0.1 / 3600.0) * (2.0 * lp).to_radians().cos();
    let term4 = (0.09 / 3600.0) * (2.0 * omega).to_radians().cos();
    term1 + term2 + term3 - term4
}

/// Eccentricity of Earth's orbit (Meeus 25.4).
pub fn earth_orbit_eccentricity(t: f64) -> f64 {
    0.016_708_634 - 0.000_042_037 * t - 0.000_000_126_7 * t.powi(2)
}

/// Declination of the sun in degrees: asin(sin ε · sin λ).
pub fn solar_declination(t: f64) -> f64 {
    let lambda = apparent_solar_longitude(t, mean_solar_longitude(t)).to_radians();
    let epsilon =
        apparent_obliquity_of_the_ecliptic(t, mean_obliquity_of_the_ecliptic(t)).to_radians();
    (epsilon.sin() * lambda.sin()).asin().to_degrees()
}

/// Equation of time in minutes (Meeus 28.3); positive when the sundial is ahead of the clock.
pub fn equation_of_time(t: f64) -> f64 {
    let epsilon =
        apparent_obliquity_of_the_ecliptic(t, mean_obliquity_of_the_ecliptic(t)).to_radians();
    let l0 = mean_solar_longitude(t).to_radians();
    let m = mean_solar_anomaly(t).to_radians();
    let e = earth_orbit_eccentricity(t);
    let y = (epsilon / 2.0).tan().powi(2);

    let eq = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * e * e * (2.0 * m).sin();

    4.0 * eq.to_degrees()
}

/// Altitude of a body with declination `delta` at local hour angle `h` (Meeus 13.6).
pub fn altitude_of_celestial_body(phi: f64, delta: f64, h: f64) -> f64 {
    let (phi, delta, h) = (phi.to_radians(), delta.to_radians(), h.to_radians());
    let term1 = phi.sin() * delta.sin();
    let term2 = phi.cos() * delta.cos() * h.cos();
    (term1 + term2).asin().to_degrees()
}

/// Approximate transit as a fraction of the UTC day (Meeus 15.2).
///
/// Of the solutions one day apart, the one nearest local mean noon
/// (`0.5 - longitude / 360`) is returned. Near the antimeridian that may lie
/// slightly outside `[0, 1)`, which keeps consecutive dates on consecutive
/// solar days.
pub fn approximate_transit(longitude: f64, sidereal_time: f64, right_ascension: f64) -> f64 {
    let lw = -longitude;
    let m0 = crate::math::normalize_to_scale((right_ascension + lw - sidereal_time) / 360.0, 1.0);
    let mean_noon = 0.5 - longitude / 360.0;
    m0 - (m0 - mean_noon).round()
}

/// Transit refined by interpolating right ascension, in fractional UTC hours (Meeus ch. 15).
///
/// `ra`, `prev_ra` and `next_ra` are the sun's right ascension at 0h of the
/// day, the previous day and the next day.
pub fn corrected_transit(
    m0: f64,
    longitude: f64,
    sidereal_time: f64,
    ra: f64,
    prev_ra: f64,
    next_ra: f64,
) -> f64 {
    let lw = -longitude;
    let theta = unwind_angle(sidereal_time + SIDEREAL_RATE * m0);
    let alpha = unwind_angle(interpolate_angles(ra, prev_ra, next_ra, m0));
    let h = quadrant_shift_angle(theta - lw - alpha);
    let dm = h / -360.0;
    (m0 + dm) * 24.0
}

/// Time the sun crosses altitude `h0`, refined once, in fractional UTC hours (Meeus ch. 15).
///
/// Returns NaN when the sun never reaches `h0` on this day: the hour-angle
/// cosine falls outside [-1, 1] and is deliberately not clamped.
#[allow(clippy::too_many_arguments)]
pub fn corrected_hour_angle(
    m0: f64,
    h0: f64,
    coordinates: &Coordinates,
    after_transit: bool,
    sidereal_time: f64,
    ra: f64,
    prev_ra: f64,
    next_ra: f64,
    dec: f64,
    prev_dec: f64,
    next_dec: f64,
) -> f64 {
    let lw = -coordinates.longitude();
    let phi = coordinates.latitude();
    let term1 = h0.to_radians().sin() - phi.to_radians().sin() * dec.to_radians().sin();
    let term2 = phi.to_radians().cos() * dec.to_radians().cos();
    let hour_angle0 = (term1 / term2).acos().to_degrees();
    let m = if after_transit {
        m0 + hour_angle0 / 360.0
    } else {
        m0 - hour_angle0 / 360.0
    };
    let theta = unwind_angle(sidereal_time + SIDEREAL_RATE * m);
    let alpha = unwind_angle(interpolate_angles(ra, prev_ra, next_ra, m));
    let delta = interpolate(dec, prev_dec, next_dec, m);
    let h = theta - lw - alpha;
    let altitude = altitude_of_celestial_body(phi, delta, h);
    let term3 = altitude - h0;
    let term4 = 360.0 * delta.to_radians().cos() * phi.to_radians().cos() * h.to_radians().sin();
    let dm = term3 / term4;
    (m + dm) * 24.0
}

/// Three-point interpolation (Meeus 3.3); `y2` is the central value.
pub fn interpolate(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = y2 - y1;
    let b = y3 - y2;
    let c = b - a;
    y2 + (n / 2.0) * (a + b + n * c)
}

/// Three-point interpolation of angles across the 0°/360° seam.
pub fn interpolate_angles(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = unwind_angle(y2 - y1);
    let b = unwind_angle(y3 - y2);
    let c = b - a;
    y2 + (n / 2.0) * (a + b + n * c)
}

/// Julian day at `hours` past 0h UT on a Gregorian calendar date (Meeus 7.1).
pub fn julian_day(year: i32, month: u32, day: u32, hours: f64) -> f64 {
    let (y, m) = if month > 2 {
        (f64::from(year), f64::from(month))
    } else {
        (f64::from(year - 1), f64::from(month + 12))
    };
    let d = f64::from(day) + hours / 24.0;

    let a = (y / 100.0).trunc();
    let b = (2.0 - a + (a / 4.0).trunc()).trunc();

    let i0 = (365.25 * (y + 4716.0)).trunc();
    let i1 = (30.6001 * (m + 1.0)).trunc();

    i0 + i1 + d + b - 1524.5
}

/// Julian centuries since J2000.0 (Meeus 11.1).
pub fn julian_century(jd: f64) -> f64 {
    (jd - J2000) / 36_525.0
}

pub fn is_leap_year(year: i32) -> bool {
    if year % 4 != 0 {
        return false;
    }
    if year % 100 == 0 && year % 400 != 0 {
        return false;
    }
    true
}

/// Days elapsed since the most recent winter solstice of the hemisphere.
pub fn days_since_solstice(day_of_year: u32, year: i32, latitude: f64) -> u32 {
    let northern_offset = 10;
    let leap = is_leap_year(year);
    let southern_offset = if leap { 173 } else { 172 };
    let days_in_year = if leap { 366 } else { 365 };
    let day_of_year = day_of_year as i32;

    let days = if latitude >= 0.0 {
        let d = day_of_year + northern_offset;
        if d >= days_in_year { d - days_in_year } else { d }
    } else {
        let d = day_of_year - southern_offset;
        if d < 0 { d + days_in_year } else { d }
    };
    days as u32
}

/// Seasonal interpolation between four anchor values (solstice, equinox,
/// solstice, equinox) used by the Moonsighting Committee twilight model.
fn seasonal_interpolation(dyy: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if dyy < 91.0 {
        a + (b - a) / 91.0 * dyy
    } else if dyy < 137.0 {
        b + (c - b) / 46.0 * (dyy - 91.0)
    } else if dyy < 183.0 {
        c + (d - c) / 46.0 * (dyy - 137.0)
    } else if dyy < 229.0 {
        d + (c - d) / 46.0 * (dyy - 183.0)
    } else if dyy < 275.0 {
        c + (b - c) / 46.0 * (dyy - 229.0)
    } else {
        b + (a - b) / 91.0 * (dyy - 275.0)
    }
}

/// Minutes between Fajr and sunrise under the Moonsighting Committee's seasonal model.
pub fn season_adjusted_morning_twilight(latitude: f64, day_of_year: u32, year: i32) -> f64 {
    let lat = latitude.abs();
    let a = 75.0 + 28.65 / 55.0 * lat;
    let b = 75.0 + 19.44 / 55.0 * lat;
    let c = 75.0 + 32.74 / 55.0 * lat;
    let d = 75.0 + 48.10 / 55.0 * lat;

    let dyy = f64::from(days_since_solstice(day_of_year, year, latitude));
    seasonal_interpolation(dyy, a, b, c, d)
}

/// Minutes between sunset and Isha under the Moonsighting Committee's seasonal model.
pub fn season_adjusted_evening_twilight(
    latitude: f64,
    day_of_year: u32,
    year: i32,
    shafaq: miqat_types::Shafaq,
) -> f64 {
    use miqat_types::Shafaq;

    let lat = latitude.abs();
    let (a, b, c, d) = match shafaq {
        Shafaq::Ahmer => (
            62.0 + 17.40 / 55.0 * lat,
            62.0 - 7.16 / 55.0 * lat,
            62.0 + 5.12 / 55.0 * lat,
            62.0 + 19.44 / 55.0 * lat,
        ),
        Shafaq::Abyad => (
            75.0 + 25.60 / 55.0 * lat,
            75.0 + 7.16 / 55.0 * lat,
            75.0 + 36.84 / 55.0 * lat,
            75.0 + 81.84 / 55.0 * lat,
        ),
        Shafaq::General => (
            75.0 + 25.60 / 55.0 * lat,
            75.0 + 2.05 / 55.0 * lat,
            75.0 - 9.21 / 55.0 * lat,
            75.0 + 6.14 / 55.0 * lat,
        ),
    };

    let dyy = f64::from(days_since_solstice(day_of_year, year, latitude));
    seasonal_interpolation(dyy, a, b, c, d)
}
