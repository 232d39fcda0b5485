//! # Miqat
//!
//! Astronomical Islamic prayer times. Given a location, a date and a
//! calculation convention, computes Fajr, Sunrise, Dhuhr, Asr, Maghrib and
//! Isha, with fallbacks for high latitudes and for days on which the sun
//! never rises or never sets.
//!
//! This crate is a facade that re-exports the `miqat` workspace crates.
//!
//! ## Usage
//!
//! ```rust
//! use miqat::prelude::*;
//! use chrono::NaiveDate;
//!
//! let mecca = Coordinates::new(21.4225, 39.8262)?;
//! let params = CalculationMethod::UmmAlQura.parameters();
//! let date = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
//!
//! let times = date.try_prayer_times(mecca, &params)?;
//! assert!(times.fajr < times.isha);
//!
//! // One hundred days of local (UTC+3) wall-clock times.
//! let schedule = get_times(mecca, date, 100, 180, &params);
//! assert_eq!(schedule.len(), 100);
//! # Ok::<(), MiqatError>(())
//! ```

pub use miqat_core::*;
