use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, Plot, PlotPoints, Points};

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::error::ChartError;
use crate::figure::{Figure, XScale};
use crate::selection::{self, ChartKind, YOptions};
use crate::state::AppState;

const WARNING_COLOR: Color32 = Color32::from_rgb(230, 160, 40);
const NONE_LABEL: &str = "None";

// ---------------------------------------------------------------------------
// "Create Visualizations" section
// ---------------------------------------------------------------------------

/// Bar and scatter side by side, the line chart below them.
pub fn visualizations(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Create Visualizations");

    let has_numeric = state
        .dataset
        .as_ref()
        .is_some_and(|ds| ds.summary.has_numeric());
    if !has_numeric {
        ui.colored_label(
            WARNING_COLOR,
            "No numeric columns found in the CSV. Cannot create visualizations.",
        );
        return;
    }

    ui.columns(2, |cols: &mut [Ui]| {
        chart_panel(&mut cols[0], state, ChartKind::Bar);
        chart_panel(&mut cols[1], state, ChartKind::Scatter);
    });
    ui.add_space(8.0);
    chart_panel(ui, state, ChartKind::Line);
}

// ---------------------------------------------------------------------------
// One chart panel: dropdowns + plot
// ---------------------------------------------------------------------------

fn chart_panel(ui: &mut Ui, state: &mut AppState, kind: ChartKind) {
    let Some(ds) = &state.dataset else {
        return;
    };
    let title = kind.title();
    ui.strong(title);

    let mut sel = state.selections.get(kind).clone();
    let opts = selection::options(kind, &ds.frame, sel.x.as_deref());

    column_combo(
        ui,
        (kind, "x"),
        &format!("Select X-axis for {title}"),
        &mut sel.x,
        &opts.x,
    );
    match &opts.y {
        YOptions::Omitted => {}
        YOptions::Choices(ys) if ys.is_empty() => {
            ui.weak("No other numeric column is available for the Y-axis.");
        }
        YOptions::Choices(ys) => {
            column_combo(
                ui,
                (kind, "y"),
                &format!("Select Y-axis for {title}"),
                &mut sel.y,
                ys,
            );
        }
    }
    color_combo(
        ui,
        (kind, "color"),
        &format!("Select Color (Group) for {title}"),
        &mut sel.color,
        &opts.color,
    );

    state.set_selection(kind, sel);

    match state.figure(kind) {
        Some(Ok(fig)) => draw_figure(ui, fig, &state.config),
        Some(Err(e)) => {
            if let Some(msg) = unavailable_message(&opts.y, e) {
                ui.weak(msg);
            }
        }
        None => {}
    }
}

/// Text shown in place of a chart that could not be built. Nothing when the
/// Y notice above already explains it.
fn unavailable_message(y: &YOptions, err: &ChartError) -> Option<String> {
    match (y, err) {
        (YOptions::Choices(ys), ChartError::MissingSelection(_)) if ys.is_empty() => None,
        _ => Some(format!("Chart unavailable: {err}")),
    }
}

fn column_combo(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    label: &str,
    current: &mut Option<String>,
    options: &[String],
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_deref().unwrap_or(""))
        .width(ui.available_width().min(280.0))
        .show_ui(ui, |ui: &mut Ui| {
            for opt in options {
                ui.selectable_value(current, Some(opt.clone()), opt.as_str());
            }
        });
}

/// Like [`column_combo`] with a leading "None" entry meaning no grouping.
fn color_combo(
    ui: &mut Ui,
    id: impl std::hash::Hash,
    label: &str,
    current: &mut Option<String>,
    options: &[String],
) {
    ui.label(label);
    egui::ComboBox::from_id_salt(id)
        .selected_text(current.as_deref().unwrap_or(NONE_LABEL))
        .width(ui.available_width().min(280.0))
        .show_ui(ui, |ui: &mut Ui| {
            ui.selectable_value(current, None, NONE_LABEL);
            for opt in options {
                ui.selectable_value(current, Some(opt.clone()), opt.as_str());
            }
        });
}

// ---------------------------------------------------------------------------
// Plotting
// ---------------------------------------------------------------------------

/// Draw a figure. Grouped figures get a legend with one entry per series.
pub fn draw_figure(ui: &mut Ui, fig: &Figure, config: &DashboardConfig) {
    let colors = ColorMap::for_figure(fig);

    let mut plot = Plot::new(("chart", fig.kind))
        .height(config.chart_height)
        .x_axis_label(fig.x_label.as_str())
        .y_axis_label(fig.y_label.as_str())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    if fig.is_grouped() {
        plot = plot.legend(Legend::default());
    }
    if !matches!(fig.x_scale, XScale::Numeric) {
        let scale = fig.x_scale.clone();
        plot = plot.x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            scale.format_tick(mark.value)
        });
    }

    plot.show(ui, |plot_ui| match fig.kind {
        ChartKind::Bar => {
            for s in &fig.series {
                let bars = s
                    .points
                    .iter()
                    .zip(&s.bases)
                    .map(|(&[x, y], &base)| {
                        Bar::new(x, y).base_offset(base).width(fig.bar_width)
                    })
                    .collect();
                let chart = BarChart::new(bars)
                    .name(&s.name)
                    .color(colors.color_for(s.group.as_ref()));
                plot_ui.bar_chart(chart);
            }
        }
        ChartKind::Scatter => {
            for s in &fig.series {
                let points = Points::new(PlotPoints::from(s.points.clone()))
                    .name(&s.name)
                    .color(colors.color_for(s.group.as_ref()))
                    .radius(config.point_radius);
                plot_ui.points(points);
            }
        }
        ChartKind::Line => {
            for s in &fig.series {
                let line = Line::new(PlotPoints::from(s.points.clone()))
                    .name(&s.name)
                    .color(colors.color_for(s.group.as_ref()))
                    .width(config.line_width);
                plot_ui.line(line);
            }
        }
    });
}
