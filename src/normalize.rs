//! Unit conversion, validity filtering and co-ordinate quantization of raw records.
//!
//! [`standardize`] converts `range` to kilometres and scales `t`, dropping any record
//! whose range is not positive or whose raw timestamp is at or past the validity
//! cutoff. [`round_coordinates`] optionally quantizes positions afterwards.

use crate::error::{Error, Result};
use crate::record::Record;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::{event, Level};

/// Number of decimal digits positions are rounded to when no precision is given
pub const DEFAULT_PRECISION: i32 = 2;

/// Calibration constants for converting raw sensor records into standard units.
///
/// The defaults are fixed properties of the sensor data this crate processes. In
/// particular `time_cutoff` is an opaque validity bound, expressed in the raw
/// timestamp unit, and is compared against `t` *before* it is scaled.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Calibration {
    /// raw range is divided by this (metres to kilometres)
    pub range_divisor: f64,
    /// records with a raw timestamp at or past this value are discarded
    pub time_cutoff: f64,
    /// surviving timestamps are multiplied by this
    pub time_scale: f64,
}

impl Calibration {
    /// The sensor calibration used by [`standardize`]
    pub const SENSOR: Calibration = Calibration {
        range_divisor: 1000.0,
        time_cutoff: 1181241184.0,
        time_scale: 1e-6,
    };
}

impl Default for Calibration {
    fn default() -> Self {
        Calibration::SENSOR
    }
}

/// Converts raw records into standard units, discarding invalid ones.
///
/// In order:
/// 1. every `range` is divided by 1000 (kilometres);
/// 2. only records with `range > 0` and a raw `t < 1181241184` are kept;
/// 3. every surviving `t` is multiplied by 1e-6.
///
/// Surviving records keep their relative order. Calling this on already
/// standardized records converts their units a second time.
///
/// # Examples
///
/// ```rust
/// use kerb::{standardize, Record};
///
/// let raw = vec![
///     Record::new(1500.0, 2_000_000.0, 0.0, 0.0, 0.0),
///     Record::new(0.0, 2_000_000.0, 0.0, 0.0, 0.0),           // no range
///     Record::new(1500.0, 1_181_241_184.0, 0.0, 0.0, 0.0),    // past the cutoff
/// ];
///
/// let standardized = standardize(raw);
///
/// assert_eq!(standardized.len(), 1);
/// assert_eq!(standardized[0].range, 1.5);
/// assert_eq!(standardized[0].t, 2.0);
/// ```
pub fn standardize(records: Vec<Record>) -> Vec<Record> {
    standardize_with(records, &Calibration::SENSOR)
}

/// [`standardize`], with explicit calibration constants.
pub fn standardize_with(records: Vec<Record>, calibration: &Calibration) -> Vec<Record> {
    let input_len = records.len();

    let standardized: Vec<Record> = records
        .into_iter()
        .map(|mut record| {
            record.range /= calibration.range_divisor;
            record
        })
        .filter(|record| record.range > 0.0 && record.t < calibration.time_cutoff)
        .map(|mut record| {
            record.t *= calibration.time_scale;
            record
        })
        .collect();

    #[cfg(feature = "tracing")]
    event!(
        Level::DEBUG,
        kept = standardized.len(),
        dropped = input_len - standardized.len(),
        "standardized records"
    );
    #[cfg(not(feature = "tracing"))]
    let _ = input_len;

    standardized
}

/// Rounds the `x`, `y` and `z` of every record to `precision` decimal digits.
///
/// Halfway cases round to even, so `0.125` becomes `0.12` and `0.135` becomes
/// `0.14` (subject to the binary representation of the scaled value). Records are
/// neither dropped nor reordered, and rounding an already-rounded set is a no-op.
///
/// A co-ordinate too large to scale by `10^precision` without overflowing is
/// returned unchanged.
///
/// # Errors
///
/// [`Error::NegativePrecision`] if `precision < 0`.
///
/// # Examples
///
/// ```rust
/// use kerb::{round_coordinates, Record};
///
/// let rounded = round_coordinates(vec![Record::new(1.0, 0.0, 0.123, 4.5678, -0.005)], 2).unwrap();
///
/// assert_eq!(rounded[0].position(), [0.12, 4.57, -0.0]);
/// ```
pub fn round_coordinates(records: Vec<Record>, precision: i32) -> Result<Vec<Record>> {
    if precision < 0 {
        return Err(Error::NegativePrecision(precision));
    }

    let factor = 10f64.powi(precision);

    Ok(records
        .into_iter()
        .map(|mut record| {
            record.x = round_half_even(record.x, factor);
            record.y = round_half_even(record.y, factor);
            record.z = round_half_even(record.z, factor);
            record
        })
        .collect())
}

#[inline]
fn round_half_even(value: f64, factor: f64) -> f64 {
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round_ties_even() / factor
}
