use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Dataset, Listing};
use crate::error::{ExplorerError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a listings table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one listing per line (the usual listings export)
/// * `.json`    – `[{ "price": "$120", "room_type": "Private room", ... }, ...]`
/// * `.parquet` – flat scalar columns
///
/// Any failure is reported as [`ExplorerError::Load`].
pub fn load_file(path: &Path) -> Result<Dataset> {
    let loaded = if !path.exists() {
        Err(anyhow::anyhow!("file does not exist"))
    } else {
        load_by_extension(path)
    };

    match loaded {
        Ok(dataset) => {
            log::info!(
                "Loaded {} listings with {} columns from {}",
                dataset.len(),
                dataset.column_names.len(),
                path.display()
            );
            Ok(dataset)
        }
        Err(e) => {
            log::error!("Failed to load {}: {e:#}", path.display());
            Err(ExplorerError::Load {
                path: path.to_path_buf(),
                reason: format!("{e:#}"),
            })
        }
    }
}

fn load_by_extension(path: &Path) -> anyhow::Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, then one listing per record.
///
/// Column types are inferred per column: a column whose non-empty cells
/// all parse as numbers is numeric, otherwise every cell stays text.
/// Empty cells are missing either way.
fn load_csv(path: &Path) -> anyhow::Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if headers.is_empty() {
        bail!("CSV has no header row");
    }

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        for (col_idx, column) in raw_columns.iter_mut().enumerate() {
            column.push(record.get(col_idx).unwrap_or("").to_string());
        }
    }

    let typed: Vec<Vec<CellValue>> = raw_columns.into_iter().map(infer_column).collect();
    Ok(Dataset::new(headers, transpose(typed)))
}

/// Tokens a CSV export uses for "no value". Matched after trimming,
/// case-sensitively.
const NA_TOKENS: [&str; 18] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_na(s: &str) -> bool {
    s.is_empty() || NA_TOKENS.contains(&s)
}

fn infer_column(raw: Vec<String>) -> Vec<CellValue> {
    let numeric = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !is_na(s))
        .all(|s| s.parse::<f64>().is_ok());

    raw.into_iter()
        .map(|s| {
            let trimmed = s.trim();
            if is_na(trimmed) {
                CellValue::Missing
            } else if numeric {
                trimmed
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map_or(CellValue::Missing, CellValue::Number)
            } else {
                CellValue::Text(s)
            }
        })
        .collect()
}

fn transpose(columns: Vec<Vec<CellValue>>) -> Vec<Listing> {
    let n_rows = columns.first().map_or(0, Vec::len);
    let mut rows: Vec<Vec<CellValue>> = (0..n_rows)
        .map(|_| Vec::with_capacity(columns.len()))
        .collect();
    for column in columns {
        for (row, cell) in rows.iter_mut().zip(column) {
            row.push(cell);
        }
    }
    rows.into_iter().map(Listing::new).collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "host_neighbourhood": "Back Bay", "price": "$120.00", "number_of_reviews": 14 },
///   ...
/// ]
/// ```
///
/// Columns are the union of keys in order of first appearance; absent keys
/// are missing.
fn load_json(path: &Path) -> anyhow::Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut column_names: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .into_iter()
        .map(|obj| {
            Listing::new(
                column_names
                    .iter()
                    .map(|col| obj.get(col).map_or(CellValue::Missing, json_to_cell))
                    .collect(),
            )
        })
        .collect();

    Ok(Dataset::new(column_names, rows))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) if s.is_empty() => CellValue::Missing,
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map_or(CellValue::Missing, CellValue::Number),
        JsonValue::Bool(b) => CellValue::Text(b.to_string()),
        JsonValue::Null => CellValue::Missing,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of listings.
///
/// Every column must be a flat scalar: strings, integers, floats or
/// booleans. Works with files written by both **Pandas** and **Polars**.
fn load_parquet(path: &Path) -> anyhow::Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            let cells = (0..batch.num_columns())
                .map(|col| {
                    extract_cell(batch.column(col), row)
                        .with_context(|| format!("column '{}'", column_names[col]))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            rows.push(Listing::new(cells));
        }
    }

    Ok(Dataset::new(column_names, rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> anyhow::Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Missing);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => CellValue::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => CellValue::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => {
            CellValue::Number(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => CellValue::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Text(col.as_boolean().value(row).to_string()),
        other => bail!("unsupported column type {other:?}"),
    };
    Ok(cell)
}

fn text_cell(s: &str) -> CellValue {
    if s.is_empty() {
        CellValue::Missing
    } else {
        CellValue::Text(s.to_string())
    }
}
