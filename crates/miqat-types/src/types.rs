use serde::{Serialize, Deserialize};
use std::fmt;
use std::str::FromStr;

use crate::coordinates::Coordinates;
use crate::error::MiqatError;

/// One of the six daily instants, in day order.
///
/// Sunrise is not a prayer, but it bounds the Fajr window and is reported
/// alongside the five prayers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All six instants in the order they occur during a day.
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// Position of this instant within [`Prayer::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Prayer::Fajr => "fajr",
            Prayer::Sunrise => "sunrise",
            Prayer::Dhuhr => "dhuhr",
            Prayer::Asr => "asr",
            Prayer::Maghrib => "maghrib",
            Prayer::Isha => "isha",
        }
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Prayer::Fajr => "Fajr",
            Prayer::Sunrise => "Sunrise",
            Prayer::Dhuhr => "Dhuhr",
            Prayer::Asr => "Asr",
            Prayer::Maghrib => "Maghrib",
            Prayer::Isha => "Isha",
        };
        write!(f, "{}", s)
    }
}

/// Jurisprudential school used for the Asr shadow ratio.
///
/// The Maliki and Hanbali schools share the Shafi'i shadow ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Madhab {
    /// Shadow length equal to the object (also Maliki, Hanbali).
    Shafi,
    /// Shadow length twice the object.
    Hanafi,
}

impl Default for Madhab {
    fn default() -> Self {
        Self::Shafi
    }
}

impl Madhab {
    /// Shadow-length multiplier for Asr.
    pub fn shadow_length(self) -> f64 {
        match self {
            Madhab::Shafi => 1.0,
            Madhab::Hanafi => 2.0,
        }
    }
}

impl fmt::Display for Madhab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Madhab::Shafi => "Shafi (standard shadow)",
            Madhab::Hanafi => "Hanafi (double shadow)",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Madhab {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shafi" | "shafii" | "standard" | "maliki" | "hanbali" => Ok(Madhab::Shafi),
            "hanafi" => Ok(Madhab::Hanafi),
            _ => Err(MiqatError::UnknownMadhab { name: s.to_string() }),
        }
    }
}

/// Fallback used when a twilight angle is never reached during the night.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HighLatitudeRule {
    /// Fajr no earlier than half the night before sunrise, Isha no later than half after sunset.
    MiddleOfTheNight,
    /// One seventh of the night.
    SeventhOfTheNight,
    /// A fraction of the night equal to the twilight angle divided by 60.
    TwilightAngle,
}

impl Default for HighLatitudeRule {
    fn default() -> Self {
        Self::MiddleOfTheNight
    }
}

impl HighLatitudeRule {
    /// Rule recommended for a location: seventh of the night above 48°N,
    /// middle of the night elsewhere.
    pub fn recommended(coordinates: &Coordinates) -> Self {
        if coordinates.latitude() > 48.0 {
            HighLatitudeRule::SeventhOfTheNight
        } else {
            HighLatitudeRule::MiddleOfTheNight
        }
    }
}

/// Strategy for days on which the sun never rises or never sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolarCircleResolution {
    /// Nearest location: move toward the equator until the sun rises and sets.
    AqrabBalad,
    /// Nearest day: borrow the solar geometry of the closest day with a sunrise and sunset.
    AqrabYaum,
    /// Leave the day unresolved.
    Unresolved,
}

impl Default for PolarCircleResolution {
    fn default() -> Self {
        Self::Unresolved
    }
}

/// Twilight colour used by the Moonsighting Committee's seasonal Isha model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shafaq {
    /// Blend of red and white twilight; reduces the gap in summer.
    General,
    /// Red twilight.
    Ahmer,
    /// White twilight; later Isha, especially in summer.
    Abyad,
}

impl Default for Shafaq {
    fn default() -> Self {
        Self::General
    }
}
