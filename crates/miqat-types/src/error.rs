use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::types::Prayer;

/// Errors from miqat operations.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum MiqatError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("Invalid latitude/longitude values: \"{latitude}, {longitude}\"")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    /// Date string not in `YYYY-MM-DD` form or outside years 1000-3000.
    #[error("Invalid date: \"{input}\"")]
    InvalidDate { input: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    #[error("Unknown calculation method: \"{name}\"")]
    UnknownMethod { name: String },

    #[error("Unknown madhab: \"{name}\"")]
    UnknownMadhab { name: String },

    /// Instants that stayed unreachable after every fallback.
    #[error("Could not resolve {prayers:?} on {date}")]
    Unresolved {
        date: NaiveDate,
        prayers: SmallVec<[Prayer; 6]>,
    },

    /// Resolved instants out of day order.
    #[error("{later} precedes {earlier} on {date}")]
    OrderViolation {
        date: NaiveDate,
        earlier: Prayer,
        later: Prayer,
    },

    /// Place dataset could not be loaded.
    #[error("Place dataset error: {0}")]
    Dataset(String),
}

impl MiqatError {
    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }

    /// Creates an `InvalidDate` error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        Self::InvalidDate { input: input.into() }
    }

    /// True for failures caused by the caller's input rather than the computation.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Self::InvalidCoordinates { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidConfiguration { .. }
                | Self::UnknownMethod { .. }
                | Self::UnknownMadhab { .. }
        )
    }
}
