use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v:.4}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Declared type of a column, fixed when the dataset is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

impl ColumnKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnKind::Integer | ColumnKind::Float)
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnKind::Integer => "int64",
            ColumnKind::Float => "float64",
            ColumnKind::Bool => "bool",
            ColumnKind::Text => "object",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DataError {
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

// ---------------------------------------------------------------------------
// Column / Dataset
// ---------------------------------------------------------------------------

/// One named column of the table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, kind: ColumnKind, cells: Vec<CellValue>) -> Self {
        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    /// Build a Float column from raw values; NaN becomes a missing cell.
    pub fn from_f64(name: impl Into<String>, values: &[f64]) -> Self {
        let cells = values.iter().map(|&v| float_cell(v)).collect();
        Column::new(name, ColumnKind::Float, cells)
    }

    /// Numeric view of the column. Missing and non-numeric cells map to NaN.
    pub fn to_f64(&self) -> Vec<f64> {
        self.cells
            .iter()
            .map(|c| c.as_f64().unwrap_or(f64::NAN))
            .collect()
    }
}

/// A Float cell, or `Null` for NaN.
pub fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::Float(v)
    }
}

/// The full in-memory table. Rows are aligned by position across columns and
/// every column has the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, checking that names are unique and columns aligned.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let n_rows = columns.first().map_or(0, |c| c.cells.len());
        let mut seen = BTreeSet::new();
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DataError::DuplicateColumn(col.name.clone()));
            }
            if col.cells.len() != n_rows {
                return Err(DataError::RaggedColumn {
                    column: col.name.clone(),
                    expected: n_rows,
                    actual: col.cells.len(),
                });
            }
        }
        Ok(Dataset { columns, n_rows })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Names of the numeric columns, in schema order.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.kind.is_numeric())
            .map(|c| c.name.as_str())
            .collect()
    }

    /// Values of a column as `f64`, missing cells as NaN.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<f64>> {
        self.column(name).map(Column::to_f64)
    }

    /// Keep only the rows where `keep[i]` is true, across every column.
    pub fn retain_rows(&self, keep: &[bool]) -> Dataset {
        debug_assert_eq!(keep.len(), self.n_rows);
        let columns: Vec<Column> = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                kind: col.kind,
                cells: col
                    .cells
                    .iter()
                    .zip(keep)
                    .filter(|(_, &k)| k)
                    .map(|(c, _)| c.clone())
                    .collect(),
            })
            .collect();
        let n_rows = keep.iter().filter(|&&k| k).count();
        Dataset { columns, n_rows }
    }

    /// Return a copy with the named numeric column replaced by `values`.
    ///
    /// An Integer column keeps its type only while every value stays integral;
    /// otherwise it is promoted to Float. Unknown names leave the data as is.
    pub fn with_numeric_column(&self, name: &str, values: &[f64]) -> Dataset {
        debug_assert_eq!(values.len(), self.n_rows);
        let mut out = self.clone();
        if let Some(col) = out.columns.iter_mut().find(|c| c.name == name) {
            let integral = values
                .iter()
                .all(|v| v.is_nan() || (v.fract() == 0.0 && v.abs() < i64::MAX as f64));
            if col.kind == ColumnKind::Integer && integral {
                col.cells = values
                    .iter()
                    .map(|&v| {
                        if v.is_nan() {
                            CellValue::Null
                        } else {
                            CellValue::Integer(v as i64)
                        }
                    })
                    .collect();
            } else {
                col.kind = ColumnKind::Float;
                col.cells = values.iter().map(|&v| float_cell(v)).collect();
            }
        }
        out
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Dataset {
        let keep: Vec<bool> = (0..self.n_rows).map(|i| i < n).collect();
        self.retain_rows(&keep)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::new(vec![
            Column::new(
                "id",
                ColumnKind::Integer,
                vec![CellValue::Integer(1), CellValue::Integer(2), CellValue::Integer(3)],
            ),
            Column::new(
                "name",
                ColumnKind::Text,
                vec![
                    CellValue::String("a".into()),
                    CellValue::String("b".into()),
                    CellValue::Null,
                ],
            ),
            Column::from_f64("score", &[0.5, f64::NAN, 2.5]),
        ])
        .unwrap()
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Dataset::new(vec![
            Column::from_f64("a", &[1.0, 2.0]),
            Column::from_f64("b", &[1.0]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DataError::RaggedColumn {
                column: "b".into(),
                expected: 2,
                actual: 1
            }
        );
    }

    #[test]
    fn rejects_duplicate_names() {
        let err = Dataset::new(vec![
            Column::from_f64("a", &[1.0]),
            Column::from_f64("a", &[2.0]),
        ])
        .unwrap_err();
        assert_eq!(err, DataError::DuplicateColumn("a".into()));
    }

    #[test]
    fn numeric_columns_follow_schema_order() {
        assert_eq!(sample().numeric_columns(), vec!["id", "score"]);
    }

    #[test]
    fn missing_cells_read_as_nan() {
        let values = sample().numeric_values("score").unwrap();
        assert_eq!(values[0], 0.5);
        assert!(values[1].is_nan());
    }

    #[test]
    fn retain_rows_drops_whole_rows() {
        let ds = sample().retain_rows(&[true, false, true]);
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(
            ds.column("name").unwrap().cells,
            vec![CellValue::String("a".into()), CellValue::Null]
        );
        assert_eq!(ds.numeric_values("id").unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn integer_column_promoted_only_when_needed() {
        let ds = sample();
        let kept = ds.with_numeric_column("id", &[1.0, 2.0, 2.0]);
        assert_eq!(kept.column("id").unwrap().kind, ColumnKind::Integer);

        let promoted = ds.with_numeric_column("id", &[1.0, 2.0, 2.5]);
        let col = promoted.column("id").unwrap();
        assert_eq!(col.kind, ColumnKind::Float);
        assert_eq!(col.cells[2], CellValue::Float(2.5));
        assert_eq!(ds.column("id").unwrap().kind, ColumnKind::Integer);
    }

    #[test]
    fn cell_display() {
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5000");
        assert_eq!(CellValue::Integer(-3).to_string(), "-3");
        assert_eq!(CellValue::Null.to_string(), "<null>");
        assert_eq!(float_cell(f64::NAN), CellValue::Null);
    }

    #[test]
    fn head_truncates() {
        assert_eq!(sample().head(2).n_rows(), 2);
        assert_eq!(sample().head(10).n_rows(), 3);
    }
}
