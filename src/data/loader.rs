use std::collections::HashSet;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{
    DataType, Float16Type, Float32Type, Float64Type, Int8Type, Int16Type, Int32Type, Int64Type,
    UInt8Type, UInt16Type, UInt32Type, UInt64Type,
};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{Column, Dataset, DatasetError, Value};
use crate::config::PrepConfig;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a file could not be turned into a [`Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("row {row}: {message}")]
    Malformed { row: usize, message: String },
    #[error("file has no header row")]
    Empty,
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-separated with a header row
/// * `.tsv` / `.tab` – tab-separated with a header row
/// * `.json`         – `[{ "col": value, ... }, ...]`
/// * `.parquet`      – flat columns of strings, integers, floats, booleans
pub fn load_file(path: &Path, cfg: &PrepConfig) -> Result<Dataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => read_delimited(open(path)?, b',', cfg),
        "tsv" | "tab" => read_delimited(open(path)?, b'\t', cfg),
        "json" => read_json(open(path)?),
        "parquet" | "pq" => load_parquet(path),
        other => Err(LoadError::UnsupportedExtension(other.to_string())),
    }
}

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Delimited text
// ---------------------------------------------------------------------------

/// Header row then one record per line. Every record must have as many
/// fields as the header; cell types are inferred one cell at a time.
pub fn read_delimited<R: Read>(
    reader: R,
    delimiter: u8,
    cfg: &PrepConfig,
) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        return Err(LoadError::Empty);
    }
    let names = dedupe_names(headers);

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        if record.len() != names.len() {
            return Err(LoadError::Malformed {
                row: row_no + 1,
                message: format!("expected {} fields, found {}", names.len(), record.len()),
            });
        }
        for (col, cell) in values.iter_mut().zip(record.iter()) {
            col.push(infer_cell(cell, cfg));
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Dataset::new(columns)?)
}

/// Repeated header names get `.1`, `.2`, ... suffixes.
fn dedupe_names(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    headers
        .into_iter()
        .map(|h| {
            let mut name = h.clone();
            let mut n = 1;
            while seen.contains(&name) {
                name = format!("{h}.{n}");
                n += 1;
            }
            seen.insert(name.clone());
            name
        })
        .collect()
}

fn infer_cell(raw: &str, cfg: &PrepConfig) -> Value {
    let s = raw.trim();
    if cfg.is_null_marker(s) {
        return Value::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return Value::Float(f);
    }
    match s {
        "True" | "true" | "TRUE" => Value::Bool(true),
        "False" | "false" | "FALSE" => Value::Bool(false),
        _ => Value::Text(raw.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, as written by `to_json(orient='records')`):
///
/// ```json
/// [
///   { "age": 31, "income": 42000.0, "city": "Lyon" },
///   { "age": null, "income": 39000.0, "city": "Nice" }
/// ]
/// ```
///
/// Columns appear in first-seen key order; a key absent from a record is null.
pub fn read_json<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let records = root.as_array().ok_or(LoadError::Malformed {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    let mut names: Vec<String> = Vec::new();
    let mut values: Vec<Vec<Value>> = Vec::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| LoadError::Malformed {
            row: i + 1,
            message: "record is not a JSON object".to_string(),
        })?;

        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
                // Earlier records did not have this key.
                values.push(vec![Value::Null; i]);
            }
        }
        for (name, col) in names.iter().zip(values.iter_mut()) {
            col.push(obj.get(name).map_or(Value::Null, json_to_value));
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Dataset::new(columns)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Value::Bool(*b),
        JsonValue::Null => Value::Null,
        other => Value::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build()?;

    let mut values: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
    for batch_result in reader {
        let batch = batch_result?;
        for (col_idx, col) in values.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            for row in 0..batch.num_rows() {
                col.push(extract_value(array, row)?);
            }
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| Column::new(name, values))
        .collect();
    Ok(Dataset::new(columns)?)
}

/// Extract a single cell from an Arrow column at a given row.
///
/// Every integer width maps to `Integer` (a `u64` beyond `i64::MAX` becomes a
/// `Float`), every float width to `Float`. Anything else (dates, timestamps,
/// dictionary-encoded categories, ...) is kept as the cell's display text.
fn extract_value(col: &ArrayRef, row: usize) -> Result<Value, LoadError> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => Value::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::UInt64 => {
            let v = col.as_primitive::<UInt64Type>().value(row);
            i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer)
        }
        DataType::Float16 => float_or_null(col.as_primitive::<Float16Type>().value(row).to_f64()),
        DataType::Float32 => float_or_null(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => float_or_null(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Value::Bool(col.as_boolean().value(row)),
        _ => Value::Text(array_value_to_string(col, row)?),
    };
    Ok(value)
}

fn float_or_null(v: f64) -> Value {
    if v.is_nan() {
        Value::Null
    } else {
        Value::Float(v)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrow::array::{
        BooleanArray, DictionaryArray, Float64Array, Int16Array, Int64Array, StringArray,
        UInt64Array,
    };
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;

    use super::*;
    use crate::data::model::ColumnKind;

    fn csv(text: &str) -> Result<Dataset, LoadError> {
        read_delimited(text.as_bytes(), b',', &PrepConfig::default())
    }

    #[test]
    fn infers_cell_types() {
        let ds = csv("age,income,city,member\n31,42000.5,Lyon,True\n,39000,Nice,false\n")
            .unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.column_names(), vec!["age", "income", "city", "member"]);
        assert_eq!(ds.value(0, 0), &Value::Integer(31));
        assert_eq!(ds.value(1, 0), &Value::Null);
        assert_eq!(ds.value(0, 1), &Value::Float(42000.5));
        assert_eq!(ds.value(1, 1), &Value::Integer(39000));
        assert_eq!(ds.value(0, 3), &Value::Bool(true));
        assert_eq!(
            ds.kinds(),
            &[
                ColumnKind::Numeric,
                ColumnKind::Numeric,
                ColumnKind::Categorical,
                ColumnKind::Boolean
            ]
        );
    }

    #[test]
    fn null_markers_become_null() {
        let ds = csv("a,b\nNA,1\nN/A,2\nnull,3\nNaN,4\n").unwrap();
        assert!(ds.column(0).values.iter().all(Value::is_null));
        assert_eq!(ds.kind(0), ColumnKind::Numeric);
    }

    #[test]
    fn ragged_row_is_reported() {
        let err = csv("a,b\n1,2\n3\n").unwrap_err();
        match err {
            LoadError::Malformed { row, .. } => assert_eq!(row, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(csv(""), Err(LoadError::Empty)));
    }

    #[test]
    fn header_only_gives_zero_rows() {
        let ds = csv("a,b\n").unwrap();
        assert_eq!(ds.n_cols(), 2);
        assert_eq!(ds.n_rows(), 0);
    }

    #[test]
    fn duplicate_headers_are_suffixed() {
        let ds = csv("a,a,a\n1,2,3\n").unwrap();
        assert_eq!(ds.column_names(), vec!["a", "a.1", "a.2"]);
    }

    #[test]
    fn tab_delimited() {
        let ds = read_delimited("x\ty\n1\tfoo\n".as_bytes(), b'\t', &PrepConfig::default())
            .unwrap();
        assert_eq!(ds.value(0, 1), &Value::Text("foo".into()));
    }

    #[test]
    fn json_records_fill_missing_keys() {
        let text = r#"[{"b": 1, "a": "x"}, {"a": "y", "c": 2.5}, {"b": null}]"#;
        let ds = read_json(text.as_bytes()).unwrap();
        assert_eq!(ds.column_names(), vec!["b", "a", "c"]);
        assert_eq!(ds.column(0).values, vec![Value::Integer(1), Value::Null, Value::Null]);
        assert_eq!(
            ds.column(2).values,
            vec![Value::Null, Value::Float(2.5), Value::Null]
        );
    }

    #[test]
    fn json_must_be_an_array_of_objects() {
        assert!(matches!(
            read_json(r#"{"a": 1}"#.as_bytes()),
            Err(LoadError::Malformed { row: 0, .. })
        ));
        assert!(matches!(
            read_json("[1, 2]".as_bytes()),
            Err(LoadError::Malformed { row: 1, .. })
        ));
    }

    #[test]
    fn load_file_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("people.TSV");
        std::fs::write(&path, "a\tb\n1\t2\n").unwrap();
        let ds = load_file(&path, &PrepConfig::default()).unwrap();
        assert_eq!(ds.n_cols(), 2);

        let bad = dir.path().join("people.xlsx");
        std::fs::write(&bad, "").unwrap();
        assert!(matches!(
            load_file(&bad, &PrepConfig::default()),
            Err(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv"), &PrepConfig::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    fn write_parquet(dir: &tempfile::TempDir, batch: &RecordBatch) -> PathBuf {
        let path = dir.path().join("table.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None).unwrap();
        writer.write(batch).unwrap();
        writer.close().unwrap();
        path
    }

    #[test]
    fn parquet_round_trip() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("id", arrow::datatypes::DataType::Int64, false),
            Field::new("score", arrow::datatypes::DataType::Float64, true),
            Field::new("city", arrow::datatypes::DataType::Utf8, true),
            Field::new("flag", arrow::datatypes::DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int64Array::from(vec![1, 2, 3])),
                Arc::new(Float64Array::from(vec![Some(0.5), None, Some(f64::NAN)])),
                Arc::new(StringArray::from(vec![Some("Oslo"), None, Some("Rome")])),
                Arc::new(BooleanArray::from(vec![true, false, true])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = write_parquet(&dir, &batch);

        let ds = load_file(&path, &PrepConfig::default()).unwrap();
        assert_eq!(ds.column_names(), vec!["id", "score", "city", "flag"]);
        assert_eq!(ds.value(2, 0), &Value::Integer(3));
        assert_eq!(
            ds.column(1).values,
            vec![Value::Float(0.5), Value::Null, Value::Null]
        );
        assert_eq!(ds.value(1, 2), &Value::Null);
        assert_eq!(ds.kind(3), ColumnKind::Boolean);
    }

    #[test]
    fn parquet_narrow_integers_and_dictionary_keep_their_values() {
        let city: DictionaryArray<Int8Type> = ["Paris", "Lyon", "Paris"].into_iter().collect();
        let schema = Arc::new(Schema::new(vec![
            Field::new("qty", DataType::Int16, false),
            Field::new("visits", DataType::UInt64, false),
            Field::new(
                "city",
                DataType::Dictionary(Box::new(DataType::Int8), Box::new(DataType::Utf8)),
                false,
            ),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(Int16Array::from(vec![1, 2, 300])),
                Arc::new(UInt64Array::from(vec![4, 5, u64::MAX])),
                Arc::new(city),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let ds = load_file(&write_parquet(&dir, &batch), &PrepConfig::default()).unwrap();
        assert_eq!(
            ds.column(0).values,
            vec![Value::Integer(1), Value::Integer(2), Value::Integer(300)]
        );
        assert_eq!(ds.value(1, 1), &Value::Integer(5));
        assert_eq!(ds.value(2, 1), &Value::Float(u64::MAX as f64));
        assert_eq!(
            ds.column(2).values,
            vec![
                Value::Text("Paris".into()),
                Value::Text("Lyon".into()),
                Value::Text("Paris".into())
            ]
        );
        assert_eq!(ds.kinds()[0], ColumnKind::Numeric);
        assert_eq!(ds.kinds()[2], ColumnKind::Categorical);

        let encoded = crate::data::transform::encode_categorical(ds).dataset;
        assert_eq!(encoded.column_names(), vec!["qty", "visits", "city_Paris"]);
    }
}
