use miqat_types::{Coordinates, MiqatError};
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::place::{CountryData, Place};

const BUNDLED: &str = include_str!("data/places.json");

static BUNDLED_INDEX: OnceLock<Result<PlaceIndex, MiqatError>> = OnceLock::new();

/// Read-only place dataset.
///
/// Countries, regions and cities are visited in name order, so among equally
/// distant cities the first by name wins.
#[derive(Debug, Clone, Default)]
pub struct PlaceIndex {
    countries: BTreeMap<String, CountryData>,
    places: Vec<Place>,
}

impl PlaceIndex {
    /// Parses a dataset of the form
    /// `{"Country": {"code": "CC", "regions": {"Region": {"City": [lat, lng]}}}}`.
    pub fn from_json(json: &str) -> Result<Self, MiqatError> {
        let countries: BTreeMap<String, CountryData> =
            serde_json::from_str(json).map_err(|e| MiqatError::Dataset(e.to_string()))?;

        let mut places = Vec::new();
        for (country, data) in &countries {
            for (region, cities) in &data.regions {
                for (city, [latitude, longitude]) in cities {
                    if !Coordinates::is_valid(*latitude, *longitude) {
                        return Err(MiqatError::Dataset(format!(
                            "{}/{}/{} has invalid coordinates {}, {}",
                            country, region, city, latitude, longitude
                        )));
                    }
                    places.push(Place {
                        country_code: data.code.clone(),
                        country: country.clone(),
                        region: region.clone(),
                        city: city.clone(),
                        latitude: *latitude,
                        longitude: *longitude,
                    });
                }
            }
        }

        debug!(countries = countries.len(), places = places.len(), "place index loaded");
        Ok(Self { countries, places })
    }

    /// The dataset shipped with the crate, parsed on first use.
    pub fn bundled() -> Result<&'static PlaceIndex, MiqatError> {
        BUNDLED_INDEX
            .get_or_init(|| PlaceIndex::from_json(BUNDLED))
            .as_ref()
            .map_err(Clone::clone)
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Place> {
        self.places.iter()
    }

    /// Closest place by `|Δlat| + |Δlng|`. An empty index yields [`Place::default`].
    pub fn find(&self, latitude: f64, longitude: f64) -> Place {
        let mut best: Option<&Place> = None;
        let mut min_diff = f64::MAX;

        for place in &self.places {
            let diff = (place.latitude - latitude).abs() + (place.longitude - longitude).abs();
            if diff < min_diff {
                min_diff = diff;
                best = Some(place);
            }
        }

        best.cloned().unwrap_or_default()
    }

    /// Exact lookup by names.
    pub fn get(&self, country: &str, region: &str, city: &str) -> Option<Place> {
        let data = self.countries.get(country)?;
        let [latitude, longitude] = *data.regions.get(region)?.get(city)?;
        Some(Place {
            country_code: data.code.clone(),
            country: country.to_string(),
            region: region.to_string(),
            city: city.to_string(),
            latitude,
            longitude,
        })
    }
}

/// Nearest bundled place to the given point.
pub fn find_place(latitude: f64, longitude: f64) -> Place {
    match PlaceIndex::bundled() {
        Ok(index) => index.find(latitude, longitude),
        Err(e) => {
            warn!(error = %e, "bundled place dataset unavailable");
            Place::default()
        }
    }
}

/// Bundled place with exactly these names.
pub fn get_place(country: &str, region: &str, city: &str) -> Option<Place> {
    PlaceIndex::bundled().ok()?.get(country, region, city)
}
