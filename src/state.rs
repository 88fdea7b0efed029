use std::collections::HashMap;
use std::path::Path;

use crate::config::DashboardConfig;
use crate::data::loader;
use crate::data::model::DataFrame;
use crate::data::sample::sample_frame;
use crate::data::summary::Summary;
use crate::error::ChartError;
use crate::figure::{self, Figure};
use crate::selection::{AxisSelection, ChartKind, Selections};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// A successfully loaded file.
pub struct Dataset {
    /// File name shown next to the upload control.
    pub source: String,
    pub frame: DataFrame,
    pub summary: Summary,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Column choices of the three chart panels.
    pub selections: Selections,

    /// Figures for the current selections (cached). Empty when there is no
    /// dataset or it has no numeric columns.
    pub figures: HashMap<ChartKind, Result<Figure, ChartError>>,

    /// Table shown while no file is loaded.
    pub sample: DataFrame,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            config,
            dataset: None,
            selections: Selections::default(),
            figures: HashMap::new(),
            sample: sample_frame(),
            status_message: None,
        }
    }

    /// Ingest a newly loaded frame, reset selections and rebuild figures.
    pub fn set_dataset(&mut self, source: impl Into<String>, frame: DataFrame) {
        let summary = Summary::of(&frame);
        log::info!(
            "Loaded {} rows x {} columns, numeric columns {:?}",
            summary.rows,
            summary.columns,
            summary.numeric_columns
        );
        if !summary.has_numeric() {
            log::warn!("No numeric columns; charts disabled");
        }

        self.selections = Selections::for_frame(&frame);
        self.dataset = Some(Dataset {
            source: source.into(),
            frame,
            summary,
        });
        self.status_message = None;
        self.rebuild_figures();
    }

    /// Forget the loaded file and go back to the onboarding page.
    pub fn clear(&mut self) {
        self.dataset = None;
        self.selections = Selections::default();
        self.figures.clear();
        self.status_message = None;
    }

    pub fn load_path(&mut self, path: &Path) {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let result = loader::load_file(path);
        self.finish_load(source, result);
    }

    /// Load CSV content that arrived without a path (e.g. a drop on the web).
    pub fn load_bytes(&mut self, name: &str, bytes: &[u8]) {
        let result = loader::load_csv_bytes(bytes);
        self.finish_load(name.to_string(), result);
    }

    fn finish_load(&mut self, source: String, result: anyhow::Result<DataFrame>) {
        match result {
            Ok(frame) => self.set_dataset(source, frame),
            Err(e) => {
                log::error!("Failed to load {source}: {e:#}");
                self.clear();
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Recompute every figure from the current selections.
    pub fn rebuild_figures(&mut self) {
        self.figures.clear();
        let Some(ds) = &self.dataset else {
            return;
        };
        if !ds.summary.has_numeric() {
            return;
        }
        for kind in ChartKind::ALL {
            let fig = figure::build(kind, &ds.frame, self.selections.get(kind));
            if let Err(e) = &fig {
                log::debug!("{} not drawn: {e}", kind.title());
            }
            self.figures.insert(kind, fig);
        }
    }

    /// Apply a selection edited in the UI. Snaps it back to valid choices and
    /// rebuilds that chart's figure when anything changed.
    pub fn set_selection(&mut self, kind: ChartKind, mut selection: AxisSelection) {
        let Some(ds) = &self.dataset else {
            return;
        };
        selection.reconcile(kind, &ds.frame);
        if *self.selections.get(kind) == selection {
            return;
        }
        log::debug!("{} selection: {selection:?}", kind.title());

        let fig = figure::build(kind, &ds.frame, &selection);
        *self.selections.get_mut(kind) = selection;
        if ds.summary.has_numeric() {
            self.figures.insert(kind, fig);
        }
    }

    pub fn figure(&self, kind: ChartKind) -> Option<&Result<Figure, ChartError>> {
        self.figures.get(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(state: &mut AppState, csv: &str) {
        state.load_bytes("test.csv", csv.as_bytes());
    }

    #[test]
    fn starts_empty() {
        let state = AppState::default();
        assert!(state.dataset.is_none());
        assert!(state.figures.is_empty());
        assert_eq!(state.sample.shape(), (5, 5));
    }

    #[test]
    fn no_numeric_columns_builds_no_figures() {
        let mut state = AppState::default();
        load(&mut state, "name,city\nann,oslo\nbob,rome\n");
        assert!(state.dataset.is_some());
        assert!(state.figures.is_empty());
        for kind in ChartKind::ALL {
            assert!(state.figure(kind).is_none());
        }
    }

    #[test]
    fn single_numeric_column_leaves_scatter_unbuilt() {
        let mut state = AppState::default();
        load(&mut state, "label,value\na,1\nb,2\n");
        assert_eq!(
            state.figure(ChartKind::Scatter),
            Some(&Err(ChartError::MissingSelection("Y-axis")))
        );
        assert!(matches!(state.figure(ChartKind::Bar), Some(Ok(_))));
        assert!(matches!(state.figure(ChartKind::Line), Some(Ok(_))));
    }

    #[test]
    fn color_selection_groups_series() {
        let mut state = AppState::default();
        load(
            &mut state,
            "Category,Sales,Profit\nA,100,20\nB,120,24\nA,90,18\n",
        );

        let mut sel = state.selections.scatter.clone();
        sel.color = Some("Category".into());
        state.set_selection(ChartKind::Scatter, sel);

        let fig = state.figure(ChartKind::Scatter).unwrap().as_ref().unwrap();
        assert_eq!(fig.series.len(), 2);

        let mut sel = state.selections.scatter.clone();
        sel.color = None;
        state.set_selection(ChartKind::Scatter, sel);
        let fig = state.figure(ChartKind::Scatter).unwrap().as_ref().unwrap();
        assert_eq!(fig.series.len(), 1);
    }

    #[test]
    fn failed_load_returns_to_empty_with_message() {
        let mut state = AppState::default();
        load(&mut state, "a,b\n1,2\n");
        assert!(state.dataset.is_some());

        load(&mut state, "");
        assert!(state.dataset.is_none());
        assert!(state.figures.is_empty());
        assert_eq!(
            state.status_message.as_deref(),
            Some("Error: No columns to parse from file")
        );
    }

    #[test]
    fn preview_is_capped_at_ten_rows() {
        let mut state = AppState::default();
        let csv: String = std::iter::once("n\n".to_string())
            .chain((0..40).map(|i| format!("{i}\n")))
            .collect();
        load(&mut state, &csv);

        let ds = state.dataset.as_ref().unwrap();
        assert_eq!(ds.summary.rows, 40);
        assert_eq!(ds.frame.head(state.config.preview_rows).height(), 10);
    }

    #[test]
    fn clear_resets_everything() {
        let mut state = AppState::default();
        load(&mut state, "x,y\n1,2\n3,4\n");
        assert!(!state.figures.is_empty());
        state.clear();
        assert!(state.dataset.is_none());
        assert_eq!(state.selections, Selections::default());
    }
}
