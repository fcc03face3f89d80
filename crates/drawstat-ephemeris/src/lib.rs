//! Apparent distances between solar-system bodies.
//!
//! The analysis pipeline only depends on the [`DistanceProvider`] contract:
//! two bodies, a calendar date and a UTC hour map to a distance in
//! astronomical units. [`Ephemeris`] is the bundled implementation, an
//! analytic low-precision model built from mean orbital elements
//! (see [`orbit`]). It is stateless, so one instance can serve any number
//! of worker threads.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use drawstat_ephemeris::{Body, DistanceProvider, Ephemeris};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
//! let au = Ephemeris.distance(Body::Earth, Body::Sun, date, 9).unwrap();
//! assert!((au - 0.9833).abs() < 2e-3);
//! ```

use chrono::{Datelike as _, NaiveDate};

pub use self::body::{Body, BodyPair, ParseBodyError, ParseBodyPairError};

pub mod body;
pub mod orbit;

/// Days from 0001-01-01 (day 1) to 1999-12-31, the ephemeris epoch day 0.
const EPOCH_DAYS_FROM_CE: i32 = 730_119;

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DistanceProviderError {
    #[display("hour {hour} is not a valid UTC hour (0-23)")]
    InvalidHour { hour: u32 },
    #[display("no finite distance between {a} and {b} on {date}")]
    NonFinite { a: Body, b: Body, date: NaiveDate },
}

/// Source of body-to-body distances.
///
/// Implementations must be deterministic for a given `(a, b, date, hour_utc)`
/// and symmetric in `a` and `b`.
pub trait DistanceProvider: Sync {
    /// Distance in astronomical units between `a` and `b` at `hour_utc`:00 UTC on `date`.
    fn distance(
        &self,
        a: Body,
        b: Body,
        date: NaiveDate,
        hour_utc: u32,
    ) -> Result<f64, DistanceProviderError>;
}

impl<P> DistanceProvider for &P
where
    P: DistanceProvider + ?Sized,
{
    fn distance(
        &self,
        a: Body,
        b: Body,
        date: NaiveDate,
        hour_utc: u32,
    ) -> Result<f64, DistanceProviderError> {
        (**self).distance(a, b, date, hour_utc)
    }
}

/// Analytic ephemeris from mean orbital elements.
///
/// Accuracy is in the order of arc-minutes for planetary directions and a
/// fraction of a percent for distances, ample for feature derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ephemeris;

impl Ephemeris {
    /// Day number relative to 2000-01-00.0 UT.
    #[must_use]
    pub fn day_number(date: NaiveDate, hour_utc: u32) -> f64 {
        f64::from(date.num_days_from_ce() - EPOCH_DAYS_FROM_CE) + f64::from(hour_utc) / 24.0
    }
}

impl DistanceProvider for Ephemeris {
    fn distance(
        &self,
        a: Body,
        b: Body,
        date: NaiveDate,
        hour_utc: u32,
    ) -> Result<f64, DistanceProviderError> {
        if hour_utc >= 24 {
            return Err(DistanceProviderError::InvalidHour { hour: hour_utc });
        }
        let d = Self::day_number(date, hour_utc);
        let au = (orbit::heliocentric(a, d) - orbit::heliocentric(b, d)).norm();
        if !au.is_finite() {
            return Err(DistanceProviderError::NonFinite { a, b, date });
        }
        Ok(au)
    }
}
