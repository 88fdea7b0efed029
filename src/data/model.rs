use std::fmt;

use chrono::NaiveDateTime;

use crate::error::DataError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a column
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common dataframe dtypes.
/// Grouping keys a `HashMap` on it, so equality and hashing treat `-0.0` as
/// `0.0` and every NaN as one value.
#[derive(Debug, Clone)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Text(String),
    Null,
}

/// Bit pattern used for float equality and hashing.
fn float_key(v: f64) -> u64 {
    if v.is_nan() {
        f64::NAN.to_bits()
    } else if v == 0.0 {
        0.0f64.to_bits()
    } else {
        v.to_bits()
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        use CellValue::*;
        match (self, other) {
            (Integer(a), Integer(b)) => a == b,
            (Float(a), Float(b)) => float_key(*a) == float_key(*b),
            (Bool(a), Bool(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (Text(a), Text(b)) => a == b,
            (Null, Null) => true,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => float_key(*f).hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::DateTime(d) => d.hash(state),
            CellValue::Text(s) => s.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(true) => write!(f, "True"),
            CellValue::Bool(false) => write!(f, "False"),
            CellValue::DateTime(d) => {
                if d.time() == chrono::NaiveTime::MIN {
                    write!(f, "{}", d.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", d.format("%Y-%m-%d %H:%M:%S"))
                }
            }
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Null => write!(f, "None"),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell. Datetimes map to seconds since the Unix epoch.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if v.is_finite() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            CellValue::DateTime(d) => Some(d.and_utc().timestamp() as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

// ---------------------------------------------------------------------------
// DType – the inferred element type of a column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int64,
    Float64,
    Bool,
    DateTime,
    Object,
}

impl DType {
    /// Integer and floating-point columns are the ones charts can measure.
    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }

    pub fn label(self) -> &'static str {
        match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Bool => "bool",
            DType::DateTime => "datetime64[ns]",
            DType::Object => "object",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Column
// ---------------------------------------------------------------------------

/// A named, homogeneously typed sequence of cells. Missing cells are `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub dtype: DType,
    pub values: Vec<CellValue>,
}

impl Column {
    /// Build a column, widening `int64` to `float64` when any cell is missing.
    pub fn new(name: impl Into<String>, dtype: DType, values: Vec<CellValue>) -> Self {
        let name = name.into();
        if dtype == DType::Int64 && values.iter().any(CellValue::is_null) {
            let values = values
                .into_iter()
                .map(|v| match v {
                    CellValue::Integer(i) => CellValue::Float(i as f64),
                    other => other,
                })
                .collect();
            return Column {
                name,
                dtype: DType::Float64,
                values,
            };
        }
        Column {
            name,
            dtype,
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Cell at `row`; out-of-range rows read as missing.
    pub fn get(&self, row: usize) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.values.get(row).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// DataFrame – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered set of equal-length columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
    n_rows: usize,
}

impl DataFrame {
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        let n_rows = columns.first().map(Column::len).unwrap_or(0);
        if let Some(bad) = columns.iter().find(|c| c.len() != n_rows) {
            return Err(DataError::ColumnLength {
                column: bad.name.clone(),
                expected: n_rows,
                found: bad.len(),
            });
        }
        Ok(DataFrame { columns, n_rows })
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.columns.len())
    }

    pub fn height(&self) -> usize {
        self.n_rows
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    pub fn dtypes(&self) -> Vec<(String, DType)> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.dtype))
            .collect()
    }

    /// Names of the int64 / float64 columns, in column order.
    pub fn numeric_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| c.dtype.is_numeric())
            .map(|c| c.name.clone())
            .collect()
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.column(name).is_some_and(|c| c.dtype.is_numeric())
    }

    /// The first `n` rows as a new frame.
    pub fn head(&self, n: usize) -> DataFrame {
        let n = n.min(self.n_rows);
        DataFrame {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    dtype: c.dtype,
                    values: c.values[..n].to_vec(),
                })
                .collect(),
            n_rows: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new(
                "id",
                DType::Int64,
                (0..25).map(CellValue::Integer).collect(),
            ),
            Column::new(
                "name",
                DType::Object,
                (0..25).map(|i| CellValue::Text(format!("row {i}"))).collect(),
            ),
        ])
        .unwrap()
    }

    #[test]
    fn head_caps_rows() {
        let df = frame();
        assert_eq!(df.head(10).shape(), (10, 2));
        assert_eq!(df.head(100).shape(), (25, 2));
        assert_eq!(df.head(10).column("id").unwrap().get(9), &CellValue::Integer(9));
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = DataFrame::new(vec![
            Column::new("a", DType::Int64, vec![CellValue::Integer(1)]),
            Column::new("b", DType::Int64, vec![]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            DataError::ColumnLength {
                column: "b".into(),
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn int_column_with_nulls_widens_to_float() {
        let col = Column::new(
            "n",
            DType::Int64,
            vec![CellValue::Integer(3), CellValue::Null],
        );
        assert_eq!(col.dtype, DType::Float64);
        assert_eq!(col.values, vec![CellValue::Float(3.0), CellValue::Null]);
    }

    #[test]
    fn numeric_columns_in_order() {
        let df = frame();
        assert_eq!(df.numeric_columns(), vec!["id".to_string()]);
        assert!(df.is_numeric("id"));
        assert!(!df.is_numeric("name"));
        assert!(!df.is_numeric("missing"));
    }

    #[test]
    fn datetime_display_drops_midnight() {
        let d = chrono::NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(CellValue::DateTime(d).to_string(), "2025-01-02");
        assert_eq!(CellValue::Float(f64::NAN).as_f64(), None);
    }

    #[test]
    fn signed_zeros_and_nans_are_one_key() {
        use std::collections::HashSet;

        assert_eq!(CellValue::Float(0.0), CellValue::Float(-0.0));
        assert_eq!(CellValue::Float(f64::NAN), CellValue::Float(-f64::NAN));
        assert_ne!(CellValue::Float(1.0), CellValue::Integer(1));

        let keys: HashSet<CellValue> = [0.0, -0.0, f64::NAN, -f64::NAN, 0.5]
            .into_iter()
            .map(CellValue::Float)
            .collect();
        assert_eq!(keys.len(), 3);
    }
}
