use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// Value – a single cell of the table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the usual dataframe dtypes.
/// Distinct values are collected in `BTreeSet`s downstream, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    Null,
}

// -- Manual Eq/Ord so we can put Value in BTreeSet --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                Text(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(a), Text(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Text(s) => s.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(f) => f.to_bits().hash(state),
            Value::Bool(b) => b.hash(state),
            Value::Null => {}
        }
    }
}

/// Table rendering: floats are shown with four decimals.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:.4}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Numeric view of the value; `None` for non-numbers and nulls.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Missing cell: an explicit null or a NaN float.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Full-precision text used for derived column names (`city_Paris`, `code_1.5`,
    /// `flag_True`).
    pub fn label(&self) -> String {
        match self {
            Value::Float(v) => format!("{v}"),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            other => other.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnKind – cached classification of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// Every non-null value is an integer or a float.
    Numeric,
    /// Every value is a boolean, with no missing cells (one-hot indicators
    /// land here).
    Boolean,
    /// Anything else.
    Categorical,
}

impl ColumnKind {
    /// Classify a column from its values. An all-null column counts as numeric;
    /// a boolean column with a missing cell is categorical.
    pub fn infer(values: &[Value]) -> Self {
        let mut numeric = true;
        let mut boolean = true;
        let mut has_null = false;
        for v in values {
            if v.is_null() {
                has_null = true;
                continue;
            }
            match v {
                Value::Integer(_) | Value::Float(_) => boolean = false,
                Value::Bool(_) => numeric = false,
                _ => return ColumnKind::Categorical,
            }
            if !numeric && !boolean {
                return ColumnKind::Categorical;
            }
        }
        if numeric {
            ColumnKind::Numeric
        } else if has_null {
            ColumnKind::Categorical
        } else {
            ColumnKind::Boolean
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Categorical => "categorical",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// Column / Dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DatasetError {
    #[error("column '{column}' has {actual} rows, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),
}

/// The table currently held by the application: named columns of equal length.
///
/// Column kinds are computed when the column set is built and kept across
/// row filtering, so a step that only drops rows never reclassifies a column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<Column>,
    kinds: Vec<ColumnKind>,
    n_rows: usize,
}

impl Dataset {
    /// Build a dataset, checking equal column lengths and unique names.
    pub fn new(columns: Vec<Column>) -> Result<Self, DatasetError> {
        let n_rows = columns.first().map_or(0, |c| c.values.len());
        let mut seen = HashSet::with_capacity(columns.len());
        for col in &columns {
            if !seen.insert(col.name.as_str()) {
                return Err(DatasetError::DuplicateColumn(col.name.clone()));
            }
            if col.values.len() != n_rows {
                return Err(DatasetError::LengthMismatch {
                    column: col.name.clone(),
                    expected: n_rows,
                    actual: col.values.len(),
                });
            }
        }
        let kinds = columns.iter().map(|c| ColumnKind::infer(&c.values)).collect();
        Ok(Self {
            columns,
            kinds,
            n_rows,
        })
    }

    /// Number of rows.
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns.
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the dataset has no columns at all.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, idx: usize) -> &Column {
        &self.columns[idx]
    }

    pub fn column_by_name(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn kind(&self, idx: usize) -> ColumnKind {
        self.kinds[idx]
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    /// Indices of the columns classified as `kind`, in column order.
    pub fn indices_of(&self, kind: ColumnKind) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// Cell at (`row`, `col`).
    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.columns[col].values[row]
    }

    /// Total number of null cells.
    pub fn null_count(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.values.iter().filter(|v| v.is_null()).count())
            .sum()
    }

    /// Keep the rows whose flag in `keep` is set. Kinds are preserved.
    pub fn retain_rows(mut self, keep: &[bool]) -> Self {
        debug_assert_eq!(keep.len(), self.n_rows);
        for col in &mut self.columns {
            let mut flags = keep.iter();
            col.values.retain(|_| flags.next().copied().unwrap_or(false));
        }
        self.n_rows = keep.iter().filter(|k| **k).count();
        self
    }

    /// Assemble a dataset from columns already known to be `n_rows` long with
    /// unique names (output of a transform step). `n_rows` survives even when
    /// no column is left.
    pub(crate) fn from_columns_unchecked(columns: Vec<Column>, n_rows: usize) -> Self {
        debug_assert!(columns.iter().all(|c| c.values.len() == n_rows));
        let kinds = columns.iter().map(|c| ColumnKind::infer(&c.values)).collect();
        Self {
            columns,
            kinds,
            n_rows,
        }
    }

    /// Rewrite every cell of one column through `f` and reclassify it.
    pub fn map_column(&mut self, idx: usize, f: impl FnMut(&Value) -> Value) {
        let values: Vec<Value> = self.columns[idx].values.iter().map(f).collect();
        self.kinds[idx] = ColumnKind::infer(&values);
        self.columns[idx].values = values;
    }

    pub fn into_columns(self) -> Vec<Column> {
        self.columns
    }
}
