//! Sensor point observations.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Column holding the range reading
pub const RANGE: &str = "range";
/// Column holding the timestamp
pub const TIME: &str = "t";
/// Column holding the x co-ordinate
pub const X: &str = "x";
/// Column holding the y co-ordinate
pub const Y: &str = "y";
/// Column holding the z co-ordinate
pub const Z: &str = "z";

/// Columns every raw record must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [RANGE, TIME, X, Y, Z];

/// Columns a reference (road) point must carry.
pub const POSITION_COLUMNS: [&str; 3] = [X, Y, Z];

/// One sensor observation: a range reading, a timestamp and a 3D position.
///
/// Any further columns the observation arrived with are kept, in their original
/// order and text form, in `passthrough`, and are never touched by normalization.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    /// distance reading; metres when raw, kilometres once standardized
    pub range: f64,
    /// timestamp; raw sensor units, scaled by 1e-6 once standardized
    pub t: f64,
    /// x co-ordinate
    pub x: f64,
    /// y co-ordinate
    pub y: f64,
    /// z co-ordinate
    pub z: f64,
    /// `(column, value)` pairs for columns other than the five above
    #[cfg_attr(feature = "serde", serde(default))]
    pub passthrough: Vec<(String, String)>,
}

impl Record {
    /// Creates a record with no passthrough columns.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use kerb::Record;
    ///
    /// let record = Record::new(1500.0, 1_000_000.0, 0.5, 1.5, 0.0);
    ///
    /// assert_eq!(record.position(), [0.5, 1.5, 0.0]);
    /// ```
    pub fn new(range: f64, t: f64, x: f64, y: f64, z: f64) -> Self {
        Record {
            range,
            t,
            x,
            y,
            z,
            passthrough: Vec::new(),
        }
    }

    /// Adds a passthrough column.
    pub fn with_passthrough(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.passthrough.push((column.into(), value.into()));
        self
    }

    /// The `(x, y, z)` position of this record
    #[inline]
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// Collects the `(x, y, z)` positions of `records`, in order.
pub fn positions(records: &[Record]) -> Vec<[f64; 3]> {
    records.iter().map(Record::position).collect()
}
