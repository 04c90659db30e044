//! Loading records and reference points from CSV, and writing labelled records back.
//!
//! Columns are located by header name, so their order in the file does not matter.
//! Columns other than `range`, `t`, `x`, `y` and `z` are carried through as
//! [`Record::passthrough`] and written back out unchanged.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Writer};

use crate::error::{Error, Result};
use crate::record::{Record, POSITION_COLUMNS, RANGE, REQUIRED_COLUMNS, TIME, X, Y, Z};

/// Name of the column [`write_labelled`] appends
pub const NEAR_ROAD: &str = "near_road";

/// Header positions of a set of required columns, plus every other column.
struct ColumnMap<const N: usize> {
    required: [usize; N],
    passthrough: Vec<(usize, String)>,
}

impl<const N: usize> ColumnMap<N> {
    fn locate(headers: &StringRecord, names: [&'static str; N]) -> Result<Self> {
        let mut required = [0usize; N];
        for (slot, name) in required.iter_mut().zip(names) {
            *slot = headers
                .iter()
                .position(|header| header.trim() == name)
                .ok_or(Error::MissingField {
                    field: name,
                    row: None,
                })?;
        }

        let passthrough = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !required.contains(idx))
            .map(|(idx, header)| (idx, header.to_string()))
            .collect();

        Ok(ColumnMap {
            required,
            passthrough,
        })
    }

    fn values(
        &self,
        row: &StringRecord,
        row_idx: usize,
        names: [&'static str; N],
    ) -> Result<[f64; N]> {
        let mut values = [0f64; N];
        for ((value, &col), name) in values.iter_mut().zip(self.required.iter()).zip(names) {
            *value = parse_cell(row, col).ok_or(Error::MissingField {
                field: name,
                row: Some(row_idx),
            })?;
        }
        Ok(values)
    }
}

fn parse_cell(row: &StringRecord, col: usize) -> Option<f64> {
    let cell = row.get(col)?.trim();
    if cell.is_empty() {
        return None;
    }
    cell.parse().ok()
}

/// Reads raw records from CSV with a header row.
///
/// # Errors
///
/// * [`Error::MissingField`] with no row if a required column is absent from the
///   header, or with the zero-based data row if a required cell is empty or not a
///   number.
/// * [`Error::Csv`] if the CSV itself is malformed, e.g. a row with the wrong number
///   of fields.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<Record>> {
    let mut reader = ReaderBuilder::new().from_reader(reader);
    let columns = ColumnMap::locate(reader.headers()?, REQUIRED_COLUMNS)?;

    let mut records = Vec::new();
    for (row_idx, row) in reader.records().enumerate() {
        let row = row?;
        let [range, t, x, y, z] = columns.values(&row, row_idx, REQUIRED_COLUMNS)?;

        let mut record = Record::new(range, t, x, y, z);
        record.passthrough = columns
            .passthrough
            .iter()
            .map(|(col, name)| (name.clone(), row.get(*col).unwrap_or_default().to_string()))
            .collect();
        records.push(record);
    }

    #[cfg(feature = "tracing")]
    tracing::event!(tracing::Level::DEBUG, rows = records.len(), "read records");

    Ok(records)
}

/// Reads `(x, y, z)` points from CSV with a header row. Any other columns are ignored.
///
/// # Errors
///
/// As [`read_records`], but only `x`, `y` and `z` are required.
pub fn read_points<R: Read>(reader: R) -> Result<Vec<[f64; 3]>> {
    let mut reader = ReaderBuilder::new().from_reader(reader);
    let columns = ColumnMap::locate(reader.headers()?, POSITION_COLUMNS)?;

    reader
        .records()
        .enumerate()
        .map(|(row_idx, row)| columns.values(&row?, row_idx, POSITION_COLUMNS))
        .collect()
}

/// [`read_records`] from a file.
pub fn read_records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Record>> {
    read_records(File::open(path)?)
}

/// [`read_points`] from a file.
pub fn read_points_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<[f64; 3]>> {
    read_points(File::open(path)?)
}

/// Writes `records` as CSV, each followed by its label from `mask`.
///
/// The header is `range,t,x,y,z`, then the passthrough columns of the first record,
/// then `near_road`. Every record is expected to carry the same passthrough columns,
/// as records read by [`read_records`] do.
///
/// # Errors
///
/// * [`Error::MaskLengthMismatch`] if `mask` does not have exactly one entry per record.
///   Nothing is written in that case.
/// * [`Error::Csv`] or [`Error::Io`] if writing fails.
pub fn write_labelled<W: Write>(writer: W, records: &[Record], mask: &[bool]) -> Result<()> {
    if records.len() != mask.len() {
        return Err(Error::MaskLengthMismatch {
            records: records.len(),
            mask: mask.len(),
        });
    }

    let mut writer = Writer::from_writer(writer);

    let mut header: Vec<&str> = vec![RANGE, TIME, X, Y, Z];
    if let Some(first) = records.first() {
        header.extend(first.passthrough.iter().map(|(name, _)| name.as_str()));
    }
    header.push(NEAR_ROAD);
    writer.write_record(&header)?;

    for (record, near) in records.iter().zip(mask) {
        let mut row: Vec<String> = [record.range, record.t, record.x, record.y, record.z]
            .iter()
            .map(f64::to_string)
            .collect();
        row.extend(record.passthrough.iter().map(|(_, value)| value.clone()));
        row.push(near.to_string());
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}
