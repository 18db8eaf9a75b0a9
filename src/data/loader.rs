use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{CellValue, Column, ColumnKind, Dataset, float_cell};

/// Cell texts read as missing values, the same set `pandas.read_csv` uses.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a tabular dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row followed by one record per row
/// * `.json`    – `[{ "col": value, ... }, ...]` (records orientation)
/// * `.parquet` – flat primitive columns
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::debug!(
        "{}: {} rows x {} columns",
        path.display(),
        dataset.n_rows(),
        dataset.n_columns()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Dataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV text with a header row. Each column's type is inferred from all
/// of its non-missing cells.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Dataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut raw: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields, found {}",
                headers.len(),
                record.len()
            );
        }
        for (col_idx, value) in record.iter().enumerate() {
            raw[col_idx].push(value.trim().to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw)
        .map(|(name, cells)| infer_column(name, &cells))
        .collect();

    Ok(Dataset::new(columns)?)
}

/// Pick the narrowest kind every non-missing cell parses as.
fn infer_column(name: String, cells: &[String]) -> Column {
    let present = || cells.iter().filter(|s| !is_missing(s));

    let kind = if present().all(|s| s.parse::<i64>().is_ok()) && present().next().is_some() {
        ColumnKind::Integer
    } else if present().all(|s| s.parse::<f64>().is_ok()) {
        ColumnKind::Float
    } else if present().all(|s| s == "true" || s == "false") {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    };

    let values = cells.iter().map(|s| parse_cell(s, kind)).collect();
    Column::new(name, kind, values)
}

fn parse_cell(s: &str, kind: ColumnKind) -> CellValue {
    if is_missing(s) {
        return CellValue::Null;
    }
    match kind {
        ColumnKind::Integer => s.parse().map_or(CellValue::Null, CellValue::Integer),
        ColumnKind::Float => s.parse().map_or(CellValue::Null, float_cell),
        ColumnKind::Bool => CellValue::Bool(s == "true"),
        ColumnKind::Text => CellValue::String(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "id": 1, "height": 171.2, "group": "A" },
///   ...
/// ]
/// ```
///
/// Column order follows first appearance; keys missing from a record are null.
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut names: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(key) {
                names.push(key.clone());
            }
        }
    }

    let columns = names
        .into_iter()
        .map(|name| {
            let cells: Vec<CellValue> = records
                .iter()
                .map(|rec| rec.get(&name).map_or(CellValue::Null, json_to_cell))
                .collect();
            let kind = kind_of_cells(&cells);
            let cells = match kind {
                // Mixed integer/float columns become float throughout.
                ColumnKind::Float => cells
                    .into_iter()
                    .map(|c| c.as_f64().map_or(CellValue::Null, float_cell))
                    .collect(),
                _ => cells,
            };
            Column::new(name, kind, cells)
        })
        .collect();

    Ok(Dataset::new(columns)?)
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

fn kind_of_cells(cells: &[CellValue]) -> ColumnKind {
    let present = || cells.iter().filter(|c| !c.is_null());
    if present().next().is_none() {
        ColumnKind::Float
    } else if present().all(|c| matches!(c, CellValue::Integer(_))) {
        ColumnKind::Integer
    } else if present().all(|c| c.as_f64().is_some()) {
        ColumnKind::Float
    } else if present().all(|c| matches!(c, CellValue::Bool(_))) {
        ColumnKind::Bool
    } else {
        ColumnKind::Text
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with flat columns.
///
/// Integer columns (Int32/Int64) become Integer, Float32/Float64 become Float,
/// Boolean stays Bool, Utf8/LargeUtf8 become Text. Any other Arrow type is
/// rendered as text.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let schema = builder.schema().clone();
    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|f| Column::new(f.name().clone(), arrow_kind(f.data_type()), Vec::new()))
        .collect();

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = widen_integers(batch.column(col_idx))
                .with_context(|| format!("column '{}'", column.name))?;
            for row in 0..batch.num_rows() {
                let cell = extract_cell(&array, row)
                    .with_context(|| format!("column '{}', row {row}", column.name))?;
                column.cells.push(cell);
            }
        }
    }

    Ok(Dataset::new(columns)?)
}

// -- Parquet / Arrow helpers --

fn arrow_kind(data_type: &DataType) -> ColumnKind {
    match data_type {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32 => ColumnKind::Integer,
        DataType::Float32 | DataType::Float64 => ColumnKind::Float,
        DataType::Boolean => ColumnKind::Bool,
        _ => ColumnKind::Text,
    }
}

/// Cast the narrow integer types to Int64 so cells are read one way.
fn widen_integers(col: &Arc<dyn Array>) -> Result<Arc<dyn Array>> {
    match col.data_type() {
        DataType::Int8 | DataType::Int16 | DataType::UInt8 | DataType::UInt16 | DataType::UInt32 => {
            arrow::compute::cast(col, &DataType::Int64).context("widening integer column")
        }
        _ => Ok(Arc::clone(col)),
    }
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let cell = match col.data_type() {
        DataType::Utf8 => {
            let s = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            CellValue::String(s.value(row).to_string())
        }
        DataType::LargeUtf8 => {
            let s = col.as_string::<i64>();
            CellValue::String(s.value(row).to_string())
        }
        DataType::Int32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int32Array>()
                .context("expected Int32Array")?;
            CellValue::Integer(arr.value(row) as i64)
        }
        DataType::Int64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Int64Array>()
                .context("expected Int64Array")?;
            CellValue::Integer(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float32Array>()
                .context("expected Float32Array")?;
            float_cell(arr.value(row) as f64)
        }
        DataType::Float64 => {
            let arr = col
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            float_cell(arr.value(row))
        }
        DataType::Boolean => {
            let arr = col
                .as_any()
                .downcast_ref::<BooleanArray>()
                .context("expected BooleanArray")?;
            CellValue::Bool(arr.value(row))
        }
        _ => {
            let formatted = arrow::util::display::array_value_to_string(col, row)
                .context("formatting arrow value")?;
            CellValue::String(formatted)
        }
    };
    Ok(cell)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_from(text: &str) -> Dataset {
        read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap()
    }

    #[test]
    fn infers_column_kinds() {
        let ds = csv_from("id,height,flag,label\n1,1.5,true,a\n2,2,false,b\n");
        let kinds: Vec<ColumnKind> = ds.columns().iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ColumnKind::Integer,
                ColumnKind::Float,
                ColumnKind::Bool,
                ColumnKind::Text
            ]
        );
        assert_eq!(ds.numeric_columns(), vec!["id", "height"]);
    }

    #[test]
    fn empty_cells_are_missing() {
        let ds = csv_from("x,y\n1,\n,2.5\n3,4\n");
        assert_eq!(ds.column("x").unwrap().kind, ColumnKind::Integer);
        assert_eq!(ds.column("x").unwrap().cells[1], CellValue::Null);
        assert_eq!(ds.column("y").unwrap().kind, ColumnKind::Float);
        assert!(ds.numeric_values("y").unwrap()[0].is_nan());
    }

    #[test]
    fn all_empty_column_is_float() {
        let ds = csv_from("a,b\n1,\n2,\n");
        assert_eq!(ds.column("b").unwrap().kind, ColumnKind::Float);
    }

    #[test]
    fn missing_tokens_do_not_block_numeric_inference() {
        let ds = csv_from("x,y,label\n1.5,1,a\nNA,null,N/A\n2.5,3,c\nnan,None,\n");
        assert_eq!(ds.column("x").unwrap().kind, ColumnKind::Float);
        assert_eq!(ds.column("y").unwrap().kind, ColumnKind::Integer);
        assert_eq!(ds.numeric_columns(), vec!["x", "y"]);

        let x = &ds.column("x").unwrap().cells;
        assert_eq!(x[1], CellValue::Null);
        assert_eq!(x[3], CellValue::Null);
        assert_eq!(ds.column("y").unwrap().cells[1], CellValue::Null);
        assert_eq!(ds.column("label").unwrap().cells[1], CellValue::Null);
    }

    #[test]
    fn nan_spellings_parse_to_missing() {
        // Not in the token set, but still NaN once parsed.
        let ds = csv_from("x,k\n1.5,a\nNAN,b\n2.5,c\n");
        let col = ds.column("x").unwrap();
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.cells[1], CellValue::Null);

        let mut buf = Vec::new();
        crate::data::export::write_csv(&ds, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "x,k\n1.5,a\n,b\n2.5,c\n");
    }

    #[test]
    fn preserves_header_order() {
        let ds = csv_from("zeta,alpha,mid\n1,2,3\n");
        assert_eq!(ds.column_names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn short_row_is_an_error() {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader("a,b\n1\n".as_bytes());
        assert!(read_csv(reader).is_err());
    }

    #[test]
    fn json_records_with_mixed_numbers() {
        let ds = parse_json(r#"[{"a": 1, "b": "x"}, {"a": 2.5}, {"b": "y", "c": true}]"#).unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b", "c"]);
        let a = ds.column("a").unwrap();
        assert_eq!(a.kind, ColumnKind::Float);
        assert_eq!(a.cells, vec![CellValue::Float(1.0), CellValue::Float(2.5), CellValue::Null]);
        assert_eq!(ds.column("c").unwrap().kind, ColumnKind::Bool);
    }

    #[test]
    fn json_column_order_follows_the_file() {
        let ds = parse_json(r#"[{"zeta": 1, "alpha": 2, "mid": 3}]"#).unwrap();
        assert_eq!(ds.column_names(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn rejects_unknown_extension() {
        assert!(load_file(Path::new("data.xlsx")).is_err());
    }

    #[test]
    fn loads_csv_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.csv");
        std::fs::write(&path, "v,w\n1,a\n2,b\n").unwrap();
        let ds = load_file(&path).unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.numeric_columns(), vec!["v"]);
    }
}
