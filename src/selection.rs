use crate::data::model::DataFrame;

// ---------------------------------------------------------------------------
// Chart kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Bar,
    Scatter,
    Line,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Scatter, ChartKind::Line];

    pub fn title(self) -> &'static str {
        match self {
            ChartKind::Bar => "Bar Chart",
            ChartKind::Scatter => "Scatter Plot",
            ChartKind::Line => "Line Chart",
        }
    }
}

// ---------------------------------------------------------------------------
// Candidate lists per axis
// ---------------------------------------------------------------------------

/// The Y dropdown either is not shown at all or offers a list (possibly empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum YOptions {
    Omitted,
    Choices(Vec<String>),
}

/// What each dropdown of a chart panel offers. The colour list excludes
/// the leading "None" entry, which the UI always adds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxisOptions {
    pub x: Vec<String>,
    pub y: YOptions,
    pub color: Vec<String>,
}

/// Candidate columns for `kind` given the currently chosen X.
///
/// * Bar: X is any column; Y is omitted when X is numeric, else numeric columns.
/// * Scatter: X and Y are numeric columns and Y never offers X itself.
/// * Line: X is any column, Y is numeric columns.
pub fn options(kind: ChartKind, df: &DataFrame, x: Option<&str>) -> AxisOptions {
    let all = df.column_names();
    let numeric = df.numeric_columns();

    let (x_opts, y) = match kind {
        ChartKind::Bar => {
            let y = match x {
                Some(x) if df.is_numeric(x) => YOptions::Omitted,
                _ => YOptions::Choices(numeric),
            };
            (all.clone(), y)
        }
        ChartKind::Scatter => {
            let y = numeric.iter().filter(|c| Some(c.as_str()) != x).cloned().collect();
            (numeric, YOptions::Choices(y))
        }
        ChartKind::Line => (all.clone(), YOptions::Choices(numeric)),
    };

    AxisOptions {
        x: x_opts,
        y,
        color: all,
    }
}

// ---------------------------------------------------------------------------
// Current selection of one chart panel
// ---------------------------------------------------------------------------

/// Chosen columns of one chart. `color == None` means no grouping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AxisSelection {
    pub x: Option<String>,
    pub y: Option<String>,
    pub color: Option<String>,
}

/// Keep `current` if it is still offered, otherwise fall back to the first option.
fn default_to_first(current: &mut Option<String>, candidates: &[String]) {
    let valid = current
        .as_ref()
        .is_some_and(|c| candidates.iter().any(|o| o == c));
    if !valid {
        *current = candidates.first().cloned();
    }
}

impl AxisSelection {
    /// Bring the selection back in line with what the dropdowns offer, the
    /// same way a widget snaps to its first entry when its value disappears.
    /// Returns `true` when anything changed.
    pub fn reconcile(&mut self, kind: ChartKind, df: &DataFrame) -> bool {
        let before = self.clone();

        let x_opts = options(kind, df, None).x;
        default_to_first(&mut self.x, &x_opts);

        let opts = options(kind, df, self.x.as_deref());
        match &opts.y {
            YOptions::Omitted => self.y = None,
            YOptions::Choices(ys) => default_to_first(&mut self.y, ys),
        }

        if let Some(c) = &self.color {
            if !opts.color.contains(c) {
                self.color = None;
            }
        }

        *self != before
    }
}

/// Selections for the three chart panels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub bar: AxisSelection,
    pub scatter: AxisSelection,
    pub line: AxisSelection,
}

impl Selections {
    pub fn get(&self, kind: ChartKind) -> &AxisSelection {
        match kind {
            ChartKind::Bar => &self.bar,
            ChartKind::Scatter => &self.scatter,
            ChartKind::Line => &self.line,
        }
    }

    pub fn get_mut(&mut self, kind: ChartKind) -> &mut AxisSelection {
        match kind {
            ChartKind::Bar => &mut self.bar,
            ChartKind::Scatter => &mut self.scatter,
            ChartKind::Line => &mut self.line,
        }
    }

    /// Fresh defaults for a newly loaded frame.
    pub fn for_frame(df: &DataFrame) -> Self {
        let mut sel = Selections::default();
        for kind in ChartKind::ALL {
            sel.get_mut(kind).reconcile(kind, df);
        }
        sel
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;
    use crate::data::sample::sample_frame;

    #[test]
    fn bar_with_category_requires_numeric_y() {
        let df = sample_frame();
        let opts = options(ChartKind::Bar, &df, Some("Category"));
        assert_eq!(
            opts.y,
            YOptions::Choices(vec!["Sales".into(), "Quantity".into(), "Profit".into()])
        );
        assert_eq!(opts.x.len(), 5);
    }

    #[test]
    fn bar_with_numeric_x_omits_y() {
        let df = sample_frame();
        assert_eq!(options(ChartKind::Bar, &df, Some("Sales")).y, YOptions::Omitted);
    }

    #[test]
    fn scatter_y_excludes_x() {
        let df = sample_frame();
        let opts = options(ChartKind::Scatter, &df, Some("Quantity"));
        assert_eq!(opts.x, vec!["Sales", "Quantity", "Profit"]);
        assert_eq!(
            opts.y,
            YOptions::Choices(vec!["Sales".into(), "Profit".into()])
        );
    }

    #[test]
    fn scatter_with_one_numeric_column_has_no_y() {
        let df = load_csv_bytes(b"label,value\na,1\nb,2\n").unwrap();
        let mut sel = AxisSelection::default();
        sel.reconcile(ChartKind::Scatter, &df);
        assert_eq!(sel.x.as_deref(), Some("value"));
        assert_eq!(sel.y, None);
        assert_eq!(
            options(ChartKind::Scatter, &df, sel.x.as_deref()).y,
            YOptions::Choices(vec![])
        );
    }

    #[test]
    fn defaults_follow_first_candidates() {
        let sel = Selections::for_frame(&sample_frame());
        assert_eq!(sel.bar.x.as_deref(), Some("Date"));
        assert_eq!(sel.bar.y.as_deref(), Some("Sales"));
        assert_eq!(sel.scatter.x.as_deref(), Some("Sales"));
        assert_eq!(sel.scatter.y.as_deref(), Some("Quantity"));
        assert_eq!(sel.line.x.as_deref(), Some("Date"));
        assert_eq!(sel.line.color, None);
    }

    #[test]
    fn reconcile_snaps_scatter_y_when_x_takes_it() {
        let df = sample_frame();
        let mut sel = AxisSelection {
            x: Some("Sales".into()),
            y: Some("Profit".into()),
            color: Some("Category".into()),
        };
        assert!(!sel.reconcile(ChartKind::Scatter, &df));

        sel.x = Some("Profit".into());
        assert!(sel.reconcile(ChartKind::Scatter, &df));
        assert_eq!(sel.y.as_deref(), Some("Sales"));
        assert_eq!(sel.color.as_deref(), Some("Category"));
    }

    #[test]
    fn reconcile_drops_y_for_numeric_bar_x() {
        let df = sample_frame();
        let mut sel = AxisSelection {
            x: Some("Quantity".into()),
            y: Some("Sales".into()),
            color: Some("Gone".into()),
        };
        sel.reconcile(ChartKind::Bar, &df);
        assert_eq!(sel.y, None);
        assert_eq!(sel.color, None);
    }
}
