use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::{can_cast_types, cast, cast_with_options, CastOptions};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FieldValue, LaptopRecord, RawRow};
use super::source::{FileFormat, RecordSource};
use crate::error::{DataSourceError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// A laptop table exported to a flat file.
///
/// Supported formats:
/// * `.parquet` – one column per table field (recommended)
/// * `.json`    – `[{ "laptop_ID": 1, "Company": "Apple", ... }, ...]`
/// * `.csv`     – header row with the table's column names
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>, format: FileFormat) -> Self {
        FileSource {
            path: path.as_ref().to_path_buf(),
            format,
        }
    }
}

impl RecordSource for FileSource {
    fn fetch_all_records(&self) -> Result<Vec<LaptopRecord>> {
        let rows = match self.format {
            FileFormat::Csv => read_csv(&self.path)?,
            FileFormat::Json => read_json(&self.path)?,
            FileFormat::Parquet => read_parquet(&self.path)?,
        };
        rows.iter()
            .enumerate()
            .map(|(i, row)| LaptopRecord::from_raw_row(row, i))
            .collect()
    }

    fn describe(&self) -> String {
        format!("{}://{}", self.format, self.path.display())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "laptop_ID": 1,
///     "Company": "Apple",
///     "Inches": 13.3,
///     "price_in_rupees": 71378.68,
///     ...
///   },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path)?;
    let root: JsonValue = serde_json::from_str(&text)?;

    let records = root.as_array().ok_or_else(|| DataSourceError::InvalidRow {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<RawRow> {
            let obj = rec.as_object().ok_or_else(|| DataSourceError::InvalidRow {
                row: i,
                message: "not a JSON object".to_string(),
            })?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_field(val)))
                .collect())
        })
        .collect()
}

fn json_to_field(val: &JsonValue) -> FieldValue {
    match val {
        JsonValue::String(s) => FieldValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                FieldValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                FieldValue::Float(f)
            } else {
                FieldValue::String(n.to_string())
            }
        }
        JsonValue::Null => FieldValue::Null,
        other => FieldValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one laptop per line.
/// Cells are kept as text; the record builder types `laptop_ID`, `Inches`
/// and the price. Empty cells become null.
fn read_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(name, cell)| (name.clone(), text_cell(cell)))
            .collect();
        rows.push(row);
    }
    Ok(rows)
}

fn text_cell(s: &str) -> FieldValue {
    if s.is_empty() {
        FieldValue::Null
    } else {
        FieldValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the laptop table.
///
/// Any column order is accepted; columns are matched by name. String,
/// integer, float and boolean columns are read directly; other types
/// (dictionaries, decimals, narrow or unsigned integers, string views, ...)
/// are cast to one of those first.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();
        let names: Vec<&String> = schema.fields().iter().map(|f| f.name()).collect();
        let columns = names
            .iter()
            .zip(batch.columns())
            .map(|(name, col)| normalize_column(name, col))
            .collect::<Result<Vec<ArrayRef>>>()?;

        for row in 0..batch.num_rows() {
            let raw = names
                .iter()
                .zip(&columns)
                .map(|(name, col)| Ok(((*name).clone(), extract_field_value(name, col, row)?)))
                .collect::<Result<RawRow>>()?;
            rows.push(raw);
        }
    }
    Ok(rows)
}

/// Cast a column to a type `extract_field_value` reads directly.
fn normalize_column(name: &str, col: &ArrayRef) -> Result<ArrayRef> {
    let target = match col.data_type() {
        DataType::Utf8
        | DataType::LargeUtf8
        | DataType::Int32
        | DataType::Int64
        | DataType::Float32
        | DataType::Float64
        | DataType::Boolean => return Ok(Arc::clone(col)),
        DataType::Dictionary(_, value_type) => {
            let values = cast(col, value_type)?;
            return normalize_column(name, &values);
        }
        DataType::Int8
        | DataType::Int16
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DataType::Int64,
        DataType::Float16 | DataType::Decimal128(_, _) | DataType::Decimal256(_, _) => {
            DataType::Float64
        }
        _ => DataType::Utf8,
    };

    if !can_cast_types(col.data_type(), &target) {
        return Err(DataSourceError::UnsupportedColumnType {
            column: name.to_string(),
            data_type: col.data_type().to_string(),
        });
    }
    let cast_options = CastOptions {
        safe: false,
        ..Default::default()
    };
    Ok(cast_with_options(col, &target, &cast_options)?)
}

/// Extract a single cell from a normalized Arrow column at a given row.
fn extract_field_value(name: &str, col: &ArrayRef, row: usize) -> Result<FieldValue> {
    if col.is_null(row) {
        return Ok(FieldValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => FieldValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => FieldValue::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => FieldValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => FieldValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => FieldValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => FieldValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => FieldValue::String(col.as_boolean().value(row).to_string()),
        other => {
            return Err(DataSourceError::UnsupportedColumnType {
                column: name.to_string(),
                data_type: other.to_string(),
            })
        }
    };
    Ok(value)
}
