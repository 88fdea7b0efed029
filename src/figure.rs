use std::collections::{HashMap, HashSet};

use chrono::DateTime;

use crate::data::model::{CellValue, Column, DType, DataFrame};
use crate::error::ChartError;
use crate::selection::{AxisSelection, ChartKind};

// ---------------------------------------------------------------------------
// Plot-ready figure description
// ---------------------------------------------------------------------------

/// How X values map onto the plot axis.
#[derive(Debug, Clone, PartialEq)]
pub enum XScale {
    Numeric,
    /// Seconds since the Unix epoch.
    Temporal,
    /// Category `i` sits at `x = i`, in order of first appearance.
    Categorical(Vec<String>),
}

impl XScale {
    /// Tick label for an axis position.
    pub fn format_tick(&self, value: f64) -> String {
        match self {
            XScale::Numeric => format!("{value}"),
            XScale::Temporal => match DateTime::from_timestamp(value.round() as i64, 0) {
                Some(dt) if dt.timestamp() % 86_400 == 0 => dt.format("%Y-%m-%d").to_string(),
                Some(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
                None => String::new(),
            },
            XScale::Categorical(labels) => {
                let idx = value.round();
                if (value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            }
        }
    }
}

/// One coloured trace. `group` is the colour-column value it stands for.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub group: Option<CellValue>,
    pub points: Vec<[f64; 2]>,
    /// Bottom of each bar once the series is stacked on the ones before it.
    /// Empty for points and lines.
    pub bases: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub kind: ChartKind,
    pub x_label: String,
    pub y_label: String,
    pub x_scale: XScale,
    /// Width of a single bar in axis units (bar charts only).
    pub bar_width: f64,
    pub series: Vec<Series>,
}

impl Figure {
    pub fn is_grouped(&self) -> bool {
        self.series.iter().any(|s| s.group.is_some())
    }
}

// ---------------------------------------------------------------------------
// Encoders
// ---------------------------------------------------------------------------

struct XEncoder {
    scale: XScale,
    index: HashMap<CellValue, usize>,
}

impl XEncoder {
    fn for_column(col: &Column) -> Self {
        let scale = match col.dtype {
            DType::Int64 | DType::Float64 => XScale::Numeric,
            DType::DateTime => XScale::Temporal,
            DType::Bool | DType::Object => XScale::Categorical(Vec::new()),
        };
        XEncoder {
            scale,
            index: HashMap::new(),
        }
    }

    fn encode(&mut self, value: &CellValue) -> Option<f64> {
        match &mut self.scale {
            XScale::Numeric | XScale::Temporal => value.as_f64(),
            XScale::Categorical(labels) => {
                if value.is_null() {
                    return None;
                }
                let next = self.index.len();
                let idx = *self.index.entry(value.clone()).or_insert_with(|| {
                    labels.push(value.to_string());
                    next
                });
                Some(idx as f64)
            }
        }
    }
}

/// Assigns each row to a series, in order of first appearance of the group value.
struct Grouper<'a> {
    column: Option<&'a Column>,
    order: Vec<CellValue>,
    index: HashMap<CellValue, usize>,
}

impl<'a> Grouper<'a> {
    fn new(column: Option<&'a Column>) -> Self {
        Grouper {
            column,
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn group_of(&mut self, row: usize) -> usize {
        let Some(col) = self.column else {
            return 0;
        };
        let value = col.get(row);
        if let Some(&idx) = self.index.get(value) {
            return idx;
        }
        let idx = self.order.len();
        self.order.push(value.clone());
        self.index.insert(value.clone(), idx);
        idx
    }

    fn into_series(self, default_name: &str, points: Vec<Vec<[f64; 2]>>) -> Vec<Series> {
        if self.column.is_none() {
            return vec![Series {
                name: default_name.to_string(),
                group: None,
                points: points.into_iter().next().unwrap_or_default(),
                bases: Vec::new(),
            }];
        }
        self.order
            .into_iter()
            .zip(points)
            .map(|(group, points)| Series {
                name: group.to_string(),
                group: Some(group),
                points,
                bases: Vec::new(),
            })
            .collect()
    }
}

fn push_point(points: &mut Vec<Vec<[f64; 2]>>, group: usize, point: [f64; 2]) {
    if points.len() <= group {
        points.resize_with(group + 1, Vec::new);
    }
    points[group].push(point);
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

fn lookup<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ChartError> {
    df.column(name)
        .ok_or_else(|| ChartError::UnknownColumn(name.to_string()))
}

fn numeric<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ChartError> {
    let col = lookup(df, name)?;
    if !col.dtype.is_numeric() {
        return Err(ChartError::NotNumeric(name.to_string()));
    }
    Ok(col)
}

/// Turn a chart selection into plot-ready series.
pub fn build(kind: ChartKind, df: &DataFrame, sel: &AxisSelection) -> Result<Figure, ChartError> {
    let x_name = sel.x.as_deref().ok_or(ChartError::MissingSelection("X-axis"))?;
    let x_col = lookup(df, x_name)?;
    let color_col = sel.color.as_deref().map(|c| lookup(df, c)).transpose()?;

    let y_col = match kind {
        ChartKind::Bar if x_col.dtype.is_numeric() => None,
        _ => {
            let y_name = sel.y.as_deref().ok_or(ChartError::MissingSelection("Y-axis"))?;
            Some(numeric(df, y_name)?)
        }
    };
    if kind == ChartKind::Scatter && !x_col.dtype.is_numeric() {
        return Err(ChartError::NotNumeric(x_name.to_string()));
    }

    let mut encoder = XEncoder::for_column(x_col);
    let mut grouper = Grouper::new(color_col);

    let (series_points, bar_width) = match kind {
        ChartKind::Bar => bar_points(df.height(), x_col, y_col, &mut encoder, &mut grouper),
        ChartKind::Scatter | ChartKind::Line => {
            let mut points = Vec::new();
            if let Some(y_col) = y_col {
                for row in 0..df.height() {
                    let (Some(x), Some(y)) = (encoder.encode(x_col.get(row)), y_col.get(row).as_f64())
                    else {
                        continue;
                    };
                    let group = grouper.group_of(row);
                    push_point(&mut points, group, [x, y]);
                }
            }
            (points, 0.0)
        }
    };

    let y_label = y_col
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "count".to_string());
    let mut series = grouper.into_series(&y_label, series_points);
    if kind == ChartKind::Bar {
        stack(&mut series);
    }

    log::debug!(
        "built {:?} figure: x={x_name}, y={y_label}, {} series",
        kind,
        series.len()
    );

    Ok(Figure {
        kind,
        x_label: x_name.to_string(),
        y_label,
        x_scale: encoder.scale,
        bar_width,
        series,
    })
}

/// Bars per distinct X value within each group: the row count when `y_col`
/// is `None`, otherwise the sum of Y. A group only gets bars at the positions
/// its rows occupy.
fn bar_points(
    n_rows: usize,
    x_col: &Column,
    y_col: Option<&Column>,
    encoder: &mut XEncoder,
    grouper: &mut Grouper<'_>,
) -> (Vec<Vec<[f64; 2]>>, f64) {
    let mut xs: Vec<f64> = Vec::new();
    let mut seen_x: HashSet<u64> = HashSet::new();
    let mut points: Vec<Vec<[f64; 2]>> = Vec::new();
    let mut slot: HashMap<(usize, u64), usize> = HashMap::new();

    for row in 0..n_rows {
        let Some(x) = encoder.encode(x_col.get(row)) else {
            continue;
        };
        let amount = match y_col {
            None => 1.0,
            Some(col) => match col.get(row).as_f64() {
                Some(y) => y,
                None => continue,
            },
        };
        if seen_x.insert(x.to_bits()) {
            xs.push(x);
        }
        let group = grouper.group_of(row);
        let key = (group, x.to_bits());
        match slot.get(&key).copied() {
            Some(i) => points[group][i][1] += amount,
            None => {
                push_point(&mut points, group, [x, amount]);
                slot.insert(key, points[group].len() - 1);
            }
        }
    }

    (points, bar_width(&xs))
}

/// Stack bar series in order: positive bars grow up from the running top at
/// their X, negative bars grow down from the running bottom.
fn stack(series: &mut [Series]) {
    let mut tops: HashMap<u64, f64> = HashMap::new();
    let mut bottoms: HashMap<u64, f64> = HashMap::new();
    for s in series {
        s.bases = s
            .points
            .iter()
            .map(|&[x, y]| {
                let edge = if y < 0.0 { &mut bottoms } else { &mut tops };
                let base = edge.entry(x.to_bits()).or_insert(0.0);
                let start = *base;
                *base += y;
                start
            })
            .collect();
    }
}

/// 80% of the smallest gap between neighbouring X positions.
fn bar_width(xs: &[f64]) -> f64 {
    let mut sorted = xs.to_vec();
    sorted.sort_by(f64::total_cmp);
    let min_gap = sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .fold(f64::INFINITY, f64::min);
    if min_gap.is_finite() {
        min_gap * 0.8
    } else {
        0.8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;
    use crate::data::sample::sample_frame;

    fn sel(x: &str, y: Option<&str>, color: Option<&str>) -> AxisSelection {
        AxisSelection {
            x: Some(x.into()),
            y: y.map(Into::into),
            color: color.map(Into::into),
        }
    }

    #[test]
    fn ungrouped_scatter_is_one_series() {
        let fig = build(
            ChartKind::Scatter,
            &sample_frame(),
            &sel("Sales", Some("Profit"), None),
        )
        .unwrap();
        assert_eq!(fig.series.len(), 1);
        assert!(!fig.is_grouped());
        assert_eq!(fig.series[0].name, "Profit");
        assert_eq!(fig.series[0].points[0], [100.0, 20.0]);
        assert_eq!(fig.series[0].points.len(), 5);
    }

    #[test]
    fn grouped_scatter_has_one_series_per_value() {
        let fig = build(
            ChartKind::Scatter,
            &sample_frame(),
            &sel("Sales", Some("Profit"), Some("Category")),
        )
        .unwrap();
        let names: Vec<&str> = fig.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(fig.series[0].points, vec![[100.0, 20.0], [90.0, 18.0]]);
        assert_eq!(fig.series[2].group, Some(CellValue::Text("C".into())));
    }

    #[test]
    fn bar_sums_y_per_category() {
        let fig = build(
            ChartKind::Bar,
            &sample_frame(),
            &sel("Category", Some("Sales"), None),
        )
        .unwrap();
        assert_eq!(
            fig.x_scale,
            XScale::Categorical(vec!["A".into(), "B".into(), "C".into()])
        );
        assert_eq!(
            fig.series[0].points,
            vec![[0.0, 190.0], [1.0, 230.0], [2.0, 140.0]]
        );
        assert!((fig.bar_width - 0.8).abs() < 1e-9);
    }

    #[test]
    fn grouped_bars_stack_only_where_groups_have_rows() {
        let fig = build(
            ChartKind::Bar,
            &sample_frame(),
            &sel("Category", Some("Sales"), Some("Quantity")),
        )
        .unwrap();
        let names: Vec<&str> = fig.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["5", "6", "4", "7"]);

        // Quantity 5 appears for rows A/100 and B/110
        assert_eq!(fig.series[0].points, vec![[0.0, 100.0], [1.0, 110.0]]);
        assert_eq!(fig.series[0].bases, vec![0.0, 0.0]);
        assert_eq!(fig.series[1].points, vec![[1.0, 120.0]]);
        assert_eq!(fig.series[1].bases, vec![110.0]);
        assert_eq!(fig.series[2].points, vec![[0.0, 90.0]]);
        assert_eq!(fig.series[2].bases, vec![100.0]);
        assert_eq!(fig.series[3].points, vec![[2.0, 140.0]]);
        assert_eq!(fig.series[3].bases, vec![0.0]);
    }

    #[test]
    fn bar_count_stays_within_row_count() {
        let mut csv = String::from("id,v\n");
        for i in 0..2000 {
            csv.push_str(&format!("id{i},{i}\n"));
        }
        let df = load_csv_bytes(csv.as_bytes()).unwrap();
        let fig = build(ChartKind::Bar, &df, &sel("id", Some("v"), Some("id"))).unwrap();
        assert_eq!(fig.series.len(), 2000);
        let bars: usize = fig.series.iter().map(|s| s.points.len()).sum();
        assert!(bars <= df.height());
    }

    #[test]
    fn negative_bars_stack_downwards() {
        let df = load_csv_bytes(b"k,v,g\na,5,x\na,-2,y\na,3,z\na,-4,w\n").unwrap();
        let fig = build(ChartKind::Bar, &df, &sel("k", Some("v"), Some("g"))).unwrap();
        let bases: Vec<f64> = fig.series.iter().map(|s| s.bases[0]).collect();
        assert_eq!(bases, vec![0.0, 0.0, 5.0, -2.0]);
    }

    #[test]
    fn bar_with_numeric_x_counts_rows() {
        let fig = build(
            ChartKind::Bar,
            &sample_frame(),
            &sel("Quantity", Some("Sales"), None),
        )
        .unwrap();
        assert_eq!(fig.y_label, "count");
        assert_eq!(fig.x_scale, XScale::Numeric);
        assert_eq!(
            fig.series[0].points,
            vec![[5.0, 2.0], [6.0, 1.0], [4.0, 1.0], [7.0, 1.0]]
        );
    }

    #[test]
    fn line_keeps_row_order_and_skips_missing() {
        let df = load_csv_bytes(b"t,v\n3,1.5\n1,\n2,2.5\n").unwrap();
        let fig = build(ChartKind::Line, &df, &sel("t", Some("v"), None)).unwrap();
        assert_eq!(fig.series[0].points, vec![[3.0, 1.5], [2.0, 2.5]]);
    }

    #[test]
    fn grouped_line_keeps_row_order_per_group() {
        let df = load_csv_bytes(b"t,v,g\n1,10,b\n2,20,a\n3,30,b\n4,40,a\n5,50,b\n").unwrap();
        let fig = build(ChartKind::Line, &df, &sel("t", Some("v"), Some("g"))).unwrap();
        let names: Vec<&str> = fig.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
        assert_eq!(
            fig.series[0].points,
            vec![[1.0, 10.0], [3.0, 30.0], [5.0, 50.0]]
        );
        assert_eq!(fig.series[1].points, vec![[2.0, 20.0], [4.0, 40.0]]);
        assert!(fig.series.iter().all(|s| s.bases.is_empty()));
    }

    #[test]
    fn signed_zero_groups_share_a_series() {
        let df = load_csv_bytes(b"x,y,g\n1,2,0.0\n2,3,-0.0\n3,4,0.5\n").unwrap();
        let fig = build(ChartKind::Scatter, &df, &sel("x", Some("y"), Some("g"))).unwrap();
        let names: Vec<&str> = fig.series.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["0", "0.5"]);
        assert_eq!(fig.series[0].points, vec![[1.0, 2.0], [2.0, 3.0]]);
    }

    #[test]
    fn line_over_dates_is_temporal() {
        let df = load_csv_bytes(b"day,v\n2025-01-01,1\n2025-01-02,2\n").unwrap();
        let fig = build(ChartKind::Line, &df, &sel("day", Some("v"), None)).unwrap();
        assert_eq!(fig.x_scale, XScale::Temporal);
        let x0 = fig.series[0].points[0][0];
        assert_eq!(fig.x_scale.format_tick(x0), "2025-01-01");
    }

    #[test]
    fn categorical_ticks() {
        let scale = XScale::Categorical(vec!["A".into(), "B".into()]);
        assert_eq!(scale.format_tick(1.0), "B");
        assert_eq!(scale.format_tick(0.5), "");
        assert_eq!(scale.format_tick(2.0), "");
        assert_eq!(scale.format_tick(-1.0), "");
    }

    #[test]
    fn invalid_selections_are_errors() {
        let df = sample_frame();
        assert_eq!(
            build(ChartKind::Scatter, &df, &sel("Sales", None, None)),
            Err(ChartError::MissingSelection("Y-axis"))
        );
        assert_eq!(
            build(ChartKind::Line, &df, &sel("Date", Some("Category"), None)),
            Err(ChartError::NotNumeric("Category".into()))
        );
        assert_eq!(
            build(ChartKind::Line, &df, &sel("Nope", Some("Sales"), None)),
            Err(ChartError::UnknownColumn("Nope".into()))
        );
        assert_eq!(
            build(ChartKind::Scatter, &df, &AxisSelection::default()),
            Err(ChartError::MissingSelection("X-axis"))
        );
    }
}
