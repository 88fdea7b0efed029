use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::model::{CellValue, Column, DType};

/// Cell texts read as missing values.
pub const NA_TOKENS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "#N/A N/A", "#NA", "<NA>", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

pub fn is_na(s: &str) -> bool {
    NA_TOKENS.contains(&s)
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

/// Fill blank header names and de-duplicate repeated ones.
///
/// `["a", "", "a"]` becomes `["a", "Unnamed: 1", "a.1"]`.
pub fn normalize_headers<'a>(raw: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<String> = Vec::new();

    for (i, h) in raw.into_iter().enumerate() {
        let base = if h.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            h.to_string()
        };

        let mut name = base.clone();
        while out.contains(&name) {
            let n = seen.entry(base.clone()).or_insert(0);
            *n += 1;
            name = format!("{base}.{n}");
        }
        out.push(name);
    }
    out
}

// ---------------------------------------------------------------------------
// Column type inference
// ---------------------------------------------------------------------------

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Parse every present cell with `parse`; `None` as soon as one fails.
fn parse_all<T>(
    cells: &[Option<&str>],
    parse: impl Fn(&str) -> Option<T>,
    wrap: impl Fn(T) -> CellValue,
) -> Option<Vec<CellValue>> {
    cells
        .iter()
        .map(|cell| match cell {
            None => Some(CellValue::Null),
            Some(s) => parse(*s).map(&wrap),
        })
        .collect()
}

/// Infer the dtype of a column of raw cell texts and convert the cells.
///
/// Tried in order: int64, float64, bool, datetime, object. A column with
/// no present cells at all is float64, unless it has no rows.
pub fn infer_column(name: &str, raw: &[String]) -> Column {
    let cells: Vec<Option<&str>> = raw
        .iter()
        .map(|s| if is_na(s) { None } else { Some(s.as_str()) })
        .collect();
    let any_missing = cells.iter().any(Option::is_none);

    if raw.is_empty() {
        return Column::new(name, DType::Object, Vec::new());
    }
    if cells.iter().all(Option::is_none) {
        return Column::new(name, DType::Float64, vec![CellValue::Null; cells.len()]);
    }

    if let Some(values) = parse_all(&cells, |s| s.trim().parse::<i64>().ok(), CellValue::Integer) {
        return Column::new(name, DType::Int64, values);
    }
    if let Some(values) = parse_all(&cells, |s| s.trim().parse::<f64>().ok(), CellValue::Float) {
        return Column::new(name, DType::Float64, values);
    }
    if !any_missing {
        if let Some(values) = parse_all(&cells, parse_bool, CellValue::Bool) {
            return Column::new(name, DType::Bool, values);
        }
    }
    if let Some(values) = parse_all(&cells, |s| parse_datetime(s.trim()), CellValue::DateTime) {
        return Column::new(name, DType::DateTime, values);
    }

    let values = cells
        .iter()
        .map(|c| match c {
            Some(s) => CellValue::Text(s.to_string()),
            None => CellValue::Null,
        })
        .collect();
    Column::new(name, DType::Object, values)
}
