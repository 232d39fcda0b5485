use miqat_types::Coordinates;

use crate::math::unwind_angle;

/// Location of the Kaaba.
pub const MAKKAH: Coordinates = Coordinates::new_unchecked(21.422_524_1, 39.826_181_8);

/// Great-circle bearing toward the Kaaba in degrees clockwise from true north.
pub fn qibla(coordinates: &Coordinates) -> f64 {
    let lat = coordinates.latitude().to_radians();
    let d_lng = (MAKKAH.longitude() - coordinates.longitude()).to_radians();
    let makkah_lat = MAKKAH.latitude().to_radians();

    let term1 = d_lng.sin();
    let term2 = lat.cos() * makkah_lat.tan();
    let term3 = lat.sin() * d_lng.cos();
    unwind_angle(term1.atan2(term2 - term3).to_degrees())
}
