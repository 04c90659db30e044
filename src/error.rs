//! Error type shared by every fallible operation in the crate.

use thiserror::Error;

/// Broad classification of an [`Error`], identifying which contract was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A record lacks a required field, or the reference point set is empty.
    InvalidInput,
    /// A numeric parameter (precision, threshold) is out of its allowed range.
    InvalidParameter,
    /// Reading or writing tabular data failed.
    Io,
}

/// Errors that can occur while normalizing records or classifying points.
#[derive(Debug, Error)]
pub enum Error {
    /// A required column is absent, or one of its cells is empty or not a number
    #[error("required field `{field}` is missing{}", row_suffix(.row))]
    MissingField {
        /// name of the missing column
        field: &'static str,
        /// zero-based data row, when the field was absent from a single row rather than the header
        row: Option<usize>,
    },

    /// No reference points to measure distances against
    #[error("reference point set is empty; nearest neighbour is undefined")]
    EmptyReferenceSet,

    /// More points than an index can address
    #[error("cannot index {0} points; at most {max} are supported", max = u32::MAX)]
    TooManyPoints(usize),

    /// A label mask whose length differs from the records it labels
    #[error("mask has {mask} entries for {records} records")]
    MaskLengthMismatch {
        /// number of records
        records: usize,
        /// number of mask entries
        mask: usize,
    },

    /// Rounding precision below zero
    #[error("precision must be non-negative, got {0}")]
    NegativePrecision(i32),

    /// Proximity threshold that is negative or NaN
    #[error("threshold must be a non-negative distance, got {0}")]
    InvalidThreshold(f64),

    /// Malformed CSV
    #[cfg(feature = "csv")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failure opening, reading or writing a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns which contract this error reports a violation of.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingField { .. }
            | Error::EmptyReferenceSet
            | Error::TooManyPoints(_)
            | Error::MaskLengthMismatch { .. } => ErrorKind::InvalidInput,
            Error::NegativePrecision(_) | Error::InvalidThreshold(_) => ErrorKind::InvalidParameter,
            #[cfg(feature = "csv")]
            Error::Csv(_) => ErrorKind::Io,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

fn row_suffix(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" (row {row})"),
        None => String::new(),
    }
}

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::{Error, ErrorKind};

    #[test]
    fn kinds_follow_the_violated_contract() {
        assert_eq!(
            Error::MissingField {
                field: "t",
                row: None
            }
            .kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(Error::EmptyReferenceSet.kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::TooManyPoints(1 << 33).kind(), ErrorKind::InvalidInput);
        assert_eq!(
            Error::MaskLengthMismatch {
                records: 2,
                mask: 1
            }
            .kind(),
            ErrorKind::InvalidInput
        );
        assert_eq!(Error::NegativePrecision(-1).kind(), ErrorKind::InvalidParameter);
        assert_eq!(Error::InvalidThreshold(-0.4).kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn missing_field_message_names_field_and_row() {
        let header = Error::MissingField {
            field: "range",
            row: None,
        };
        let cell = Error::MissingField {
            field: "z",
            row: Some(4),
        };

        assert_eq!(header.to_string(), "required field `range` is missing");
        assert_eq!(cell.to_string(), "required field `z` is missing (row 4)");
    }
}
