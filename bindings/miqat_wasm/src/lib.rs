//! WASM bindings for Miqat - astronomical prayer times.
//!
//! Exposes the schedule endpoint, nearest-place lookup and a small
//! location-bound class.

use wasm_bindgen::prelude::*;
use miqat_core::{
    parse_date, qibla, CalculationMethod, CalculationParameters, Coordinates, Madhab, Place, Prayer, PrayerTimes,
    ScheduleRequest, DEFAULT_DAYS,
};
use serde::Serialize;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Karachi/Shafi unless overridden by name.
fn parameters(method: Option<String>, madhab: Option<String>) -> Result<CalculationParameters, JsValue> {
    let method = match method {
        Some(name) => name.parse::<CalculationMethod>().map_err(js_error)?,
        None => CalculationMethod::Karachi,
    };
    let madhab = match madhab {
        Some(name) => name.parse::<Madhab>().map_err(js_error)?,
        None => Madhab::Shafi,
    };
    Ok(method.parameters().madhab(madhab))
}

/// Computes `days` days of local prayer times starting at `date` (YYYY-MM-DD,
/// today if missing or invalid). Returns `{ place, times }` where `times`
/// maps each date to six `"HH:MM"` strings (or `null`).
///
/// # Example (JavaScript)
/// ```js
/// const result = get_times(21.4225, 39.8262, "2024-03-11", 30, 180);
/// console.log(result.times["2024-03-11"]); // ["05:20", "06:36", ...]
/// ```
#[wasm_bindgen]
pub fn get_times(
    lat: f64,
    lng: f64,
    date: Option<String>,
    days: Option<u32>,
    offset: Option<i32>,
    method: Option<String>,
    madhab: Option<String>,
) -> Result<JsValue, JsValue> {
    let mut request = ScheduleRequest::new(lat, lng).parameters(parameters(method, madhab)?);
    request.start = parse_date(date.as_deref(), request.start);
    request.days = days.filter(|d| *d >= 1).unwrap_or(DEFAULT_DAYS);
    request.timezone_offset = offset.unwrap_or(0);

    let response = request.execute().map_err(js_error)?;
    response
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_error)
}

/// Nearest known city to the point.
#[wasm_bindgen]
pub fn find_place(lat: f64, lng: f64) -> WasmPlace {
    WasmPlace::from(miqat_core::find_place(lat, lng))
}

/// Prayer times and qibla for one location.
///
/// # Example (JavaScript)
/// ```js
/// const miqat = new Miqat(51.5074, -0.1278, "MuslimWorldLeague");
/// const day = miqat.times("2024-06-21", 60);
/// console.log(day.isha, miqat.qibla());
/// ```
#[wasm_bindgen]
pub struct Miqat {
    coordinates: Coordinates,
    parameters: CalculationParameters,
}

#[wasm_bindgen]
impl Miqat {
    #[wasm_bindgen(constructor)]
    pub fn new(lat: f64, lng: f64, method: Option<String>, madhab: Option<String>) -> Result<Miqat, JsValue> {
        console_error_panic_hook::set_once();
        let coordinates = Coordinates::new(lat, lng).map_err(js_error)?;
        Ok(Miqat { coordinates, parameters: parameters(method, madhab)? })
    }

    /// Local `"HH:MM"` times for a date at a UTC offset in minutes.
    pub fn times(&self, date: &str, offset: Option<i32>) -> Result<WasmPrayerTimes, JsValue> {
        let date = chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| JsValue::from_str(&format!("Invalid date format: {}", e)))?;
        let times = PrayerTimes::new(date, self.coordinates, &self.parameters).map_err(js_error)?;
        Ok(WasmPrayerTimes::new(&times, offset.unwrap_or(0)))
    }

    /// Bearing to the Kaaba in degrees from true north.
    pub fn qibla(&self) -> f64 {
        qibla(&self.coordinates)
    }
}

/// WASM-friendly representation of Place for TypeScript generation.
#[derive(Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WasmPlace {
    pub country_code: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<Place> for WasmPlace {
    fn from(place: Place) -> Self {
        Self {
            country_code: place.country_code,
            country: place.country,
            region: place.region,
            city: place.city,
            latitude: place.latitude,
            longitude: place.longitude,
        }
    }
}

/// One day's local times as `"HH:MM"` strings.
#[derive(Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
pub struct WasmPrayerTimes {
    pub fajr: String,
    pub sunrise: String,
    pub dhuhr: String,
    pub asr: String,
    pub maghrib: String,
    pub isha: String,
}

impl WasmPrayerTimes {
    fn new(times: &PrayerTimes, offset: i32) -> Self {
        let local = times.local_times(offset);
        let at = |prayer: Prayer| local[prayer.index()].to_string();
        Self {
            fajr: at(Prayer::Fajr),
            sunrise: at(Prayer::Sunrise),
            dhuhr: at(Prayer::Dhuhr),
            asr: at(Prayer::Asr),
            maghrib: at(Prayer::Maghrib),
            isha: at(Prayer::Isha),
        }
    }
}
