use super::model::{DType, DataFrame};

// ---------------------------------------------------------------------------
// Summary – what the "Data Overview" section reports
// ---------------------------------------------------------------------------

/// Shape, per-column dtype, and the numeric columns charts may measure.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub rows: usize,
    pub columns: usize,
    pub dtypes: Vec<(String, DType)>,
    pub numeric_columns: Vec<String>,
}

impl Summary {
    pub fn of(df: &DataFrame) -> Self {
        let (rows, columns) = df.shape();
        Summary {
            rows,
            columns,
            dtypes: df.dtypes(),
            numeric_columns: df.numeric_columns(),
        }
    }

    /// Charts are only offered when at least one column is numeric.
    pub fn has_numeric(&self) -> bool {
        !self.numeric_columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;
    use crate::data::sample::sample_frame;

    #[test]
    fn sample_dataset_shape() {
        let summary = Summary::of(&sample_frame());
        assert_eq!(summary.rows, 5);
        assert_eq!(summary.columns, 5);
        assert_eq!(summary.numeric_columns, vec!["Sales", "Quantity", "Profit"]);
        assert_eq!(summary.dtypes[0], ("Date".to_string(), DType::DateTime));
    }

    #[test]
    fn text_only_file_has_no_numeric_columns() {
        let df = load_csv_bytes(b"name,city\nann,oslo\nbob,rome\n").unwrap();
        let summary = Summary::of(&df);
        assert!(!summary.has_numeric());
        assert_eq!((summary.rows, summary.columns), (2, 2));
    }
}
