use miqat_types::{Coordinates, HighLatitudeRule, Madhab, MiqatError, PolarCircleResolution, Prayer, Rounding, Shafaq};
use serde::{Serialize, Deserialize};
use std::ops::Add;
use std::str::FromStr;
use tracing::{debug, instrument};

use crate::high_latitude::{self, NightPortions};
use crate::method::CalculationMethod;

/// Largest accepted adjustment, in minutes either way.
pub const MAX_ADJUSTMENT_MINUTES: i32 = 180;

/// Signed minute offsets applied to each prayer after the astronomical computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PrayerAdjustments {
    pub fajr: i32,
    pub sunrise: i32,
    pub dhuhr: i32,
    pub asr: i32,
    pub maghrib: i32,
    pub isha: i32,
}

impl PrayerAdjustments {
    pub fn get(&self, prayer: Prayer) -> i32 {
        match prayer {
            Prayer::Fajr => self.fajr,
            Prayer::Sunrise => self.sunrise,
            Prayer::Dhuhr => self.dhuhr,
            Prayer::Asr => self.asr,
            Prayer::Maghrib => self.maghrib,
            Prayer::Isha => self.isha,
        }
    }

    fn validate(&self, label: &str) -> Result<(), MiqatError> {
        for prayer in Prayer::ALL {
            let minutes = self.get(prayer);
            if minutes.abs() > MAX_ADJUSTMENT_MINUTES {
                return Err(MiqatError::invalid_config(format!(
                    "{} adjustment for {} is {} minutes, outside [-{max}, {max}]",
                    label,
                    prayer,
                    minutes,
                    max = MAX_ADJUSTMENT_MINUTES
                )));
            }
        }
        Ok(())
    }
}

impl Add for PrayerAdjustments {
    type Output = PrayerAdjustments;

    fn add(self, rhs: Self) -> Self::Output {
        PrayerAdjustments {
            fajr: self.fajr + rhs.fajr,
            sunrise: self.sunrise + rhs.sunrise,
            dhuhr: self.dhuhr + rhs.dhuhr,
            asr: self.asr + rhs.asr,
            maghrib: self.maghrib + rhs.maghrib,
            isha: self.isha + rhs.isha,
        }
    }
}

/// How Isha is derived.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IshaRule {
    /// Sun `n` degrees below the horizon after sunset.
    Angle(f64),
    /// Fixed minutes after Maghrib.
    Interval(u32),
}

/// A complete prayer-time convention.
///
/// Start from a preset with [`CalculationMethod::parameters`] and refine it
/// with the chained setters, or use [`CalculationParametersBuilder`] to get
/// validation. Deserializing (and [`FromStr`]) layers the given fields over
/// the preset named by `method` and validates the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "ParametersConfig")]
pub struct CalculationParameters {
    pub method: CalculationMethod,
    /// Fajr depression angle in degrees.
    pub fajr_angle: f64,
    /// Isha depression angle in degrees; ignored while `isha_interval > 0`.
    pub isha_angle: f64,
    /// Minutes after Maghrib; zero means Isha is angle-based.
    pub isha_interval: u32,
    pub maghrib_angle: Option<f64>,
    pub madhab: Madhab,
    /// Twilight fallback; `None` picks [`HighLatitudeRule::recommended`] for the location.
    pub high_latitude_rule: Option<HighLatitudeRule>,
    pub polar_circle_resolution: PolarCircleResolution,
    pub rounding: Rounding,
    pub shafaq: Shafaq,
    /// User adjustments.
    pub adjustments: PrayerAdjustments,
    /// Adjustments that belong to the method itself.
    pub method_adjustments: PrayerAdjustments,
}

impl Default for CalculationParameters {
    fn default() -> Self {
        CalculationMethod::Other.parameters()
    }
}

impl CalculationParameters {
    pub(crate) fn with_angles(method: CalculationMethod, fajr_angle: f64, isha_angle: f64) -> Self {
        Self {
            method,
            fajr_angle,
            isha_angle,
            isha_interval: 0,
            maghrib_angle: None,
            madhab: Madhab::default(),
            high_latitude_rule: None,
            polar_circle_resolution: PolarCircleResolution::default(),
            rounding: Rounding::default(),
            shafaq: Shafaq::default(),
            adjustments: PrayerAdjustments::default(),
            method_adjustments: PrayerAdjustments::default(),
        }
    }

    pub fn madhab(mut self, madhab: Madhab) -> Self {
        self.madhab = madhab;
        self
    }

    pub fn high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self {
        self.high_latitude_rule = Some(rule);
        self
    }

    pub fn polar_circle_resolution(mut self, resolution: PolarCircleResolution) -> Self {
        self.polar_circle_resolution = resolution;
        self
    }

    pub fn rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    pub fn shafaq(mut self, shafaq: Shafaq) -> Self {
        self.shafaq = shafaq;
        self
    }

    pub fn isha_interval(mut self, minutes: u32) -> Self {
        self.isha_interval = minutes;
        self
    }

    pub fn maghrib_angle(mut self, angle: f64) -> Self {
        self.maghrib_angle = Some(angle);
        self
    }

    pub fn adjustments(mut self, adjustments: PrayerAdjustments) -> Self {
        self.adjustments = adjustments;
        self
    }

    pub fn method_adjustments(mut self, adjustments: PrayerAdjustments) -> Self {
        self.method_adjustments = adjustments;
        self
    }

    pub fn isha(&self) -> IshaRule {
        if self.isha_interval > 0 {
            IshaRule::Interval(self.isha_interval)
        } else {
            IshaRule::Angle(self.isha_angle)
        }
    }

    /// User and method adjustments combined.
    pub fn total_adjustments(&self) -> PrayerAdjustments {
        self.adjustments + self.method_adjustments
    }

    /// The configured high-latitude rule, or the one recommended for `coordinates`.
    pub fn high_latitude_rule_for(&self, coordinates: &Coordinates) -> HighLatitudeRule {
        self.high_latitude_rule
            .unwrap_or_else(|| HighLatitudeRule::recommended(coordinates))
    }

    /// Night fractions used by the high-latitude fallback at `coordinates`.
    pub fn night_portions(&self, coordinates: &Coordinates) -> NightPortions {
        high_latitude::night_portions(self.high_latitude_rule_for(coordinates), self)
    }

    /// Checks angles and adjustments.
    #[instrument(level = "debug", skip(self), fields(method = ?self.method))]
    pub fn validate(&self) -> Result<(), MiqatError> {
        check_angle("Fajr", self.fajr_angle)?;
        check_angle("Isha", self.isha_angle)?;
        if let Some(angle) = self.maghrib_angle {
            check_angle("Maghrib", angle)?;
        }
        if self.isha_interval > 24 * 60 {
            return Err(MiqatError::invalid_config(format!(
                "Isha interval {} minutes exceeds one day",
                self.isha_interval
            )));
        }
        self.adjustments.validate("User")?;
        self.method_adjustments.validate("Method")?;
        debug!("parameters valid");
        Ok(())
    }
}

fn check_angle(label: &str, angle: f64) -> Result<(), MiqatError> {
    if !(0.0..90.0).contains(&angle) {
        return Err(MiqatError::invalid_config(format!(
            "{} angle {} outside [0, 90)",
            label, angle
        )));
    }
    Ok(())
}

impl FromStr for CalculationParameters {
    type Err = MiqatError;

    /// Parses a JSON object such as `{"method": "Karachi", "madhab": "Hanafi"}`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(|e| MiqatError::invalid_config(e.to_string()))
    }
}

/// Wire form of [`CalculationParameters`]: every field optional, layered over
/// the preset named by `method` (or `Other`).
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ParametersConfig {
    method: Option<CalculationMethod>,
    fajr_angle: Option<f64>,
    isha_angle: Option<f64>,
    isha_interval: Option<u32>,
    maghrib_angle: Option<f64>,
    madhab: Option<Madhab>,
    high_latitude_rule: Option<HighLatitudeRule>,
    polar_circle_resolution: Option<PolarCircleResolution>,
    rounding: Option<Rounding>,
    shafaq: Option<Shafaq>,
    adjustments: Option<PrayerAdjustments>,
    method_adjustments: Option<PrayerAdjustments>,
}

impl TryFrom<ParametersConfig> for CalculationParameters {
    type Error = MiqatError;

    fn try_from(config: ParametersConfig) -> Result<Self, Self::Error> {
        CalculationParametersBuilder {
            method: config.method,
            fajr_angle: config.fajr_angle,
            isha_angle: config.isha_angle,
            isha_interval: config.isha_interval,
            maghrib_angle: config.maghrib_angle,
            madhab: config.madhab,
            high_latitude_rule: config.high_latitude_rule,
            polar_circle_resolution: config.polar_circle_resolution,
            rounding: config.rounding,
            shafaq: config.shafaq,
            adjustments: config.adjustments,
            method_adjustments: config.method_adjustments,
        }
        .build()
    }
}

/// Builder with validation for `CalculationParameters`.
#[derive(Debug, Default, Clone)]
pub struct CalculationParametersBuilder {
    method: Option<CalculationMethod>,
    fajr_angle: Option<f64>,
    isha_angle: Option<f64>,
    isha_interval: Option<u32>,
    maghrib_angle: Option<f64>,
    madhab: Option<Madhab>,
    high_latitude_rule: Option<HighLatitudeRule>,
    polar_circle_resolution: Option<PolarCircleResolution>,
    rounding: Option<Rounding>,
    shafaq: Option<Shafaq>,
    adjustments: Option<PrayerAdjustments>,
    method_adjustments: Option<PrayerAdjustments>,
}

impl CalculationParametersBuilder {
    pub fn new() -> Self { Self::default() }

    /// Preset the remaining fields start from. Defaults to `Other`.
    pub fn method(mut self, method: CalculationMethod) -> Self { self.method = Some(method); self }
    pub fn fajr_angle(mut self, angle: f64) -> Self { self.fajr_angle = Some(angle); self }
    pub fn isha_angle(mut self, angle: f64) -> Self { self.isha_angle = Some(angle); self }
    pub fn isha_interval(mut self, minutes: u32) -> Self { self.isha_interval = Some(minutes); self }
    pub fn maghrib_angle(mut self, angle: f64) -> Self { self.maghrib_angle = Some(angle); self }
    pub fn madhab(mut self, madhab: Madhab) -> Self { self.madhab = Some(madhab); self }
    pub fn high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self { self.high_latitude_rule = Some(rule); self }
    pub fn polar_circle_resolution(mut self, resolution: PolarCircleResolution) -> Self { self.polar_circle_resolution = Some(resolution); self }
    pub fn rounding(mut self, rounding: Rounding) -> Self { self.rounding = Some(rounding); self }
    pub fn shafaq(mut self, shafaq: Shafaq) -> Self { self.shafaq = Some(shafaq); self }
    pub fn adjustments(mut self, adjustments: PrayerAdjustments) -> Self { self.adjustments = Some(adjustments); self }
    pub fn method_adjustments(mut self, adjustments: PrayerAdjustments) -> Self { self.method_adjustments = Some(adjustments); self }

    /// Builds and validates.
    pub fn build(self) -> Result<CalculationParameters, MiqatError> {
        let mut params = self.method.unwrap_or(CalculationMethod::Other).parameters();

        if let Some(v) = self.fajr_angle { params.fajr_angle = v; }
        if let Some(v) = self.isha_angle { params.isha_angle = v; }
        if let Some(v) = self.isha_interval { params.isha_interval = v; }
        if let Some(v) = self.maghrib_angle { params.maghrib_angle = Some(v); }
        if let Some(v) = self.madhab { params.madhab = v; }
        if let Some(v) = self.high_latitude_rule { params.high_latitude_rule = Some(v); }
        if let Some(v) = self.polar_circle_resolution { params.polar_circle_resolution = v; }
        if let Some(v) = self.rounding { params.rounding = v; }
        if let Some(v) = self.shafaq { params.shafaq = v; }
        if let Some(v) = self.adjustments { params.adjustments = v; }
        if let Some(v) = self.method_adjustments { params.method_adjustments = v; }

        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_layers_over_preset() {
        let params = CalculationParametersBuilder::new()
            .method(CalculationMethod::MuslimWorldLeague)
            .madhab(Madhab::Hanafi)
            .isha_angle(18.0)
            .build()
            .unwrap();
        assert_eq!(params.method, CalculationMethod::MuslimWorldLeague);
        assert_eq!(params.fajr_angle, 18.0);
        assert_eq!(params.isha(), IshaRule::Angle(18.0));
        assert_eq!(params.madhab, Madhab::Hanafi);
        assert_eq!(params.method_adjustments.dhuhr, 1);
    }

    #[test]
    fn test_builder_rejects_bad_values() {
        let err = CalculationParametersBuilder::new().fajr_angle(95.0).build();
        assert!(matches!(err, Err(MiqatError::InvalidConfiguration { .. })));

        let err = CalculationParametersBuilder::new().isha_angle(-1.0).build();
        assert!(matches!(err, Err(MiqatError::InvalidConfiguration { .. })));

        let err = CalculationParametersBuilder::new()
            .adjustments(PrayerAdjustments { asr: 181, ..Default::default() })
            .build();
        assert!(matches!(err, Err(MiqatError::InvalidConfiguration { .. })));

        assert!(CalculationParametersBuilder::new().isha_interval(2000).build().is_err());
    }

    #[test]
    fn test_from_json() {
        let params: CalculationParameters =
            r#"{"method": "UmmAlQura", "madhab": "Hanafi", "adjustments": {"fajr": 2}}"#
                .parse()
                .unwrap();
        assert_eq!(params.isha(), IshaRule::Interval(90));
        assert_eq!(params.madhab, Madhab::Hanafi);
        assert_eq!(params.adjustments.fajr, 2);
        assert_eq!(params.adjustments.isha, 0);

        assert!("{\"fajrAngle\": 120}".parse::<CalculationParameters>().is_err());
        assert!("not json".parse::<CalculationParameters>().is_err());
    }

    #[test]
    fn test_serialized_form_parses_back() {
        let params = CalculationMethod::Dubai
            .parameters()
            .polar_circle_resolution(PolarCircleResolution::AqrabYaum);
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"fajrAngle\":18.2"));
        let back: CalculationParameters = json.parse().unwrap();
        assert_eq!(back, params);
    }

    #[test]
    fn test_total_adjustments() {
        let params = CalculationMethod::Karachi
            .parameters()
            .adjustments(PrayerAdjustments { dhuhr: 2, isha: -1, ..Default::default() });
        let total = params.total_adjustments();
        assert_eq!(total.dhuhr, 3);
        assert_eq!(total.isha, -1);
        assert_eq!(total.get(Prayer::Fajr), 0);
    }
}
