use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Date64Type, Float16Type, Float32Type, Float64Type, Int16Type,
    Int32Type, Int64Type, Int8Type, TimeUnit, TimestampMicrosecondType,
    TimestampMillisecondType, TimestampNanosecondType, TimestampSecondType, UInt16Type,
    UInt32Type, UInt64Type, UInt8Type,
};
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, NaiveDateTime};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;

use super::infer::{infer_column, normalize_headers};
use super::model::{CellValue, Column, DType, DataFrame};
use crate::error::DataError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated text with a header row
/// * `.parquet`      – columns typed from the Arrow schema
pub fn load_file(path: &Path) -> Result<DataFrame> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            load_csv_reader(file)
        }
        "parquet" | "pq" => {
            let file = std::fs::File::open(path)
                .with_context(|| format!("opening {}", path.display()))?;
            load_parquet_reader(file)
        }
        other => Err(DataError::UnsupportedExtension(other.to_string()).into()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV from an in-memory buffer (drag-and-drop without a path).
pub fn load_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
    load_csv_reader(bytes)
}

/// CSV layout: one header row, then data rows.
///
/// Short rows are padded with missing cells; long rows are an error.
/// Column types are inferred once all rows are read.
pub fn load_csv_reader<R: Read>(rdr: R) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(rdr);

    let headers = normalize_headers(reader.headers().context("reading CSV headers")?.iter());
    if headers.is_empty() {
        return Err(DataError::NoColumns.into());
    }

    let n_cols = headers.len();
    let mut raw: Vec<Vec<String>> = vec![Vec::new(); n_cols];

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;

        if record.len() > n_cols {
            let line = record.position().map(|p| p.line()).unwrap_or(row_no as u64 + 2);
            return Err(DataError::RaggedRow {
                line,
                expected: n_cols,
                found: record.len(),
            }
            .into());
        }

        for (col_idx, cells) in raw.iter_mut().enumerate() {
            cells.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let columns = headers
        .iter()
        .zip(raw.iter())
        .map(|(name, cells)| infer_column(name, cells))
        .collect();

    let df = DataFrame::new(columns)?;
    log::debug!("parsed CSV: {} rows x {} columns", df.height(), df.width());
    Ok(df)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Integer, float, boolean, date/timestamp and string
/// columns keep their types; anything else is shown as text.
pub fn load_parquet_reader<R: ChunkReader + 'static>(reader: R) -> Result<DataFrame> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)
        .context("reading parquet metadata")?;
    let schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let headers = normalize_headers(schema.fields().iter().map(|f| f.name().as_str()));
    if headers.is_empty() {
        return Err(DataError::NoColumns.into());
    }

    let dtypes: Vec<DType> = schema
        .fields()
        .iter()
        .map(|f| arrow_dtype(f.data_type()))
        .collect();
    let mut values: Vec<Vec<CellValue>> = vec![Vec::new(); headers.len()];

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, cells) in values.iter_mut().enumerate() {
            let col = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                let cell = extract_cell(col, row)
                    .with_context(|| format!("Row {row}: failed to read '{}'", headers[col_idx]))?;
                cells.push(cell);
            }
        }
    }

    let columns = headers
        .into_iter()
        .zip(dtypes)
        .zip(values)
        .map(|((name, dtype), cells)| Column::new(name, dtype, cells))
        .collect();
    Ok(DataFrame::new(columns)?)
}

// -- Arrow helpers --

fn arrow_dtype(dt: &DataType) -> DType {
    match dt {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64 => DType::Int64,
        DataType::Float16 | DataType::Float32 | DataType::Float64 => DType::Float64,
        DataType::Boolean => DType::Bool,
        DataType::Date32 | DataType::Date64 | DataType::Timestamp(_, _) => DType::DateTime,
        _ => DType::Object,
    }
}

fn from_timestamp(secs: i64, nanos: u32) -> Result<NaiveDateTime> {
    DateTime::from_timestamp(secs, nanos)
        .map(|d| d.naive_utc())
        .with_context(|| format!("timestamp {secs} out of range"))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row) as i64),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row) as i64),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row) as i64),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            CellValue::Integer(i64::try_from(v).context("u64 value exceeds int64")?)
        }
        DataType::Float16 => {
            CellValue::Float(col.as_primitive::<Float16Type>().value(row).to_f64())
        }
        DataType::Float32 => CellValue::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Date32 => {
            let days = col.as_primitive::<Date32Type>().value(row) as i64;
            CellValue::DateTime(from_timestamp(days * 86_400, 0)?)
        }
        DataType::Date64 => {
            let ms = col.as_primitive::<Date64Type>().value(row);
            CellValue::DateTime(from_timestamp(ms.div_euclid(1_000), 0)?)
        }
        DataType::Timestamp(unit, _) => {
            let (secs, nanos) = match unit {
                TimeUnit::Second => (col.as_primitive::<TimestampSecondType>().value(row), 0),
                TimeUnit::Millisecond => {
                    let v = col.as_primitive::<TimestampMillisecondType>().value(row);
                    (v.div_euclid(1_000), (v.rem_euclid(1_000) * 1_000_000) as u32)
                }
                TimeUnit::Microsecond => {
                    let v = col.as_primitive::<TimestampMicrosecondType>().value(row);
                    (v.div_euclid(1_000_000), (v.rem_euclid(1_000_000) * 1_000) as u32)
                }
                TimeUnit::Nanosecond => {
                    let v = col.as_primitive::<TimestampNanosecondType>().value(row);
                    (v.div_euclid(1_000_000_000), v.rem_euclid(1_000_000_000) as u32)
                }
            };
            CellValue::DateTime(from_timestamp(secs, nanos)?)
        }
        _ => CellValue::Text(array_value_to_string(col, row).context("formatting value")?),
    };
    Ok(cell)
}
