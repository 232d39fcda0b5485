use miqat_types::{Coordinates, MiqatError};
use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

/// A named city with its coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub country_code: String,
    pub country: String,
    pub region: String,
    pub city: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Place {
    /// The "no match" place: empty names, city `"null"`, at 0°, 0°.
    fn default() -> Self {
        Self {
            country_code: String::new(),
            country: String::new(),
            region: String::new(),
            city: "null".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

impl Place {
    pub fn coordinates(&self) -> Result<Coordinates, MiqatError> {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// True for the "no match" place.
    pub fn is_unknown(&self) -> bool {
        self.country.is_empty() && self.city == "null"
    }
}

/// One country in the dataset: ISO code plus region → city → `[lat, lng]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryData {
    pub code: String,
    pub regions: BTreeMap<String, BTreeMap<String, [f64; 2]>>,
}
