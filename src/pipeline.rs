//! The full normalize, round, classify call chain.

use crate::classify::{RoadIndex, DEFAULT_THRESHOLD};
use crate::error::Result;
use crate::normalize::{round_coordinates, standardize_with, Calibration, DEFAULT_PRECISION};
use crate::record::Record;
use crate::spatial_index::RoadTree;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "tracing")]
use tracing::{span, Level};

/// Fixed numeric parameters for [`label_road_points`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PipelineSettings {
    /// unit conversion and validity constants applied to both point sets
    pub calibration: Calibration,
    /// decimal digits positions are rounded to; `None` skips rounding
    pub precision: Option<i32>,
    /// distance below which a query point is labelled as near the road
    pub threshold: f64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        PipelineSettings {
            calibration: Calibration::SENSOR,
            precision: Some(DEFAULT_PRECISION),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// Standardized query records, each paired with its near-road label.
#[derive(Clone, Debug, PartialEq)]
pub struct LabelledBatch {
    /// the query records that survived standardization, in input order
    pub records: Vec<Record>,
    /// `mask[i]` labels `records[i]`
    pub mask: Vec<bool>,
}

impl LabelledBatch {
    /// Iterates over `(record, near_road)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&Record, bool)> + '_ {
        self.records.iter().zip(self.mask.iter().copied())
    }

    /// The records labelled as near the road
    pub fn near_road(&self) -> impl Iterator<Item = &Record> + '_ {
        self.iter()
            .filter_map(|(record, near)| if near { Some(record) } else { None })
    }
}

/// Standardizes raw road and query records, optionally rounds their positions, and
/// labels each surviving query record with whether it is near the road.
///
/// # Errors
///
/// * [`Error::NegativePrecision`](crate::Error::NegativePrecision) if
///   `settings.precision` is negative.
/// * [`Error::InvalidThreshold`](crate::Error::InvalidThreshold) if `settings.threshold`
///   is negative or NaN.
/// * [`Error::EmptyReferenceSet`](crate::Error::EmptyReferenceSet) if no road record
///   survives standardization.
///
/// # Examples
///
/// ```rust
/// use kerb::{label_road_points, PipelineSettings, Record};
///
/// let road = vec![Record::new(1000.0, 5.0, 0.0, 0.0, 0.0)];
/// let query = vec![
///     Record::new(1000.0, 5.0, 0.101, 0.0, 0.0),
///     Record::new(1000.0, 5.0, 2.0, 0.0, 0.0),
///     Record::new(0.0, 5.0, 0.0, 0.0, 0.0), // dropped: no range
/// ];
///
/// let batch = label_road_points(road, query, &PipelineSettings::default()).unwrap();
///
/// assert_eq!(batch.mask, vec![true, false]);
/// assert_eq!(batch.records[0].x, 0.1);
/// ```
pub fn label_road_points(
    road: Vec<Record>,
    query: Vec<Record>,
    settings: &PipelineSettings,
) -> Result<LabelledBatch> {
    #[cfg(feature = "tracing")]
    let span = span!(
        Level::INFO,
        "label_road_points",
        road = road.len(),
        query = query.len()
    );
    #[cfg(feature = "tracing")]
    let _enter = span.enter();

    let mut road = standardize_with(road, &settings.calibration);
    let mut query = standardize_with(query, &settings.calibration);

    if let Some(precision) = settings.precision {
        road = round_coordinates(road, precision)?;
        query = round_coordinates(query, precision)?;
    }

    let mask = RoadIndex::<RoadTree>::from_records(&road)?
        .classify_records(&query, settings.threshold)?;

    Ok(LabelledBatch {
        records: query,
        mask,
    })
}
