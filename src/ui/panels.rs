use eframe::egui::{self, Color32, RichText, Ui};

use crate::data::sample::REQUIREMENTS;
use crate::state::{AppState, Dataset};
use crate::ui::table::data_table;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.dataset.is_some(), egui::Button::new("Clear"))
                .clicked()
            {
                state.clear();
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{}: {} rows, {} columns",
                ds.source, ds.summary.rows, ds.summary.columns
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Page sections
// ---------------------------------------------------------------------------

pub fn header(ui: &mut Ui) {
    ui.heading(RichText::new("Interactive CSV Data Dashboard").size(26.0));
    ui.label("Upload your CSV file to generate interactive visualizations.");
    ui.add_space(8.0);
}

/// The "upload" control: file picker button, current file, drop hint.
pub fn upload_control(ui: &mut Ui, state: &mut AppState) {
    ui.label("Choose a CSV file");
    ui.horizontal(|ui: &mut Ui| {
        if ui.button("Browse files").clicked() {
            open_file_dialog(state);
        }
        match &state.dataset {
            Some(ds) => {
                ui.label(RichText::new(&ds.source).strong());
                if ui.small_button("Remove").clicked() {
                    state.clear();
                }
            }
            None => {
                ui.weak("Drag and drop a file here");
            }
        }
    });

    let hovering = ui.ctx().input(|i| !i.raw.hovered_files.is_empty());
    if hovering {
        ui.colored_label(Color32::LIGHT_BLUE, "Drop the file to load it");
    }

    if let Some(msg) = &state.status_message {
        ui.add_space(4.0);
        ui.label(RichText::new(msg).color(Color32::RED).monospace());
    }
}

/// Row/column counts next to the per-column dtypes.
pub fn overview(ui: &mut Ui, ds: &Dataset) {
    ui.heading("Data Overview");
    ui.columns(2, |cols: &mut [Ui]| {
        cols[0].label(RichText::new(format!("Number of rows: {}", ds.summary.rows)).strong());
        cols[0].label(RichText::new(format!("Number of columns: {}", ds.summary.columns)).strong());

        cols[1].strong("Column types:");
        egui::Grid::new("column_types")
            .striped(true)
            .num_columns(2)
            .show(&mut cols[1], |ui: &mut Ui| {
                for (name, dtype) in &ds.summary.dtypes {
                    ui.label(name.as_str());
                    ui.monospace(dtype.label());
                    ui.end_row();
                }
            });
    });
    ui.add_space(8.0);
}

pub fn data_sample(ui: &mut Ui, ds: &Dataset, preview_rows: usize) {
    ui.heading("Data Sample");
    data_table(ui, "data_sample", &ds.frame.head(preview_rows));
    ui.add_space(8.0);
}

/// Onboarding content shown while no file is loaded.
pub fn empty_state(ui: &mut Ui, state: &AppState) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_width(ui.available_width());
        ui.colored_label(
            Color32::LIGHT_BLUE,
            "Please upload a CSV file to get started.",
        );
    });
    ui.add_space(8.0);

    ui.heading("Sample CSV Format");
    data_table(ui, "sample_table", &state.sample);
    ui.add_space(8.0);

    ui.heading("Requirements for This Dashboard");
    ui.code(REQUIREMENTS);
}

pub fn footer(ui: &mut Ui) {
    ui.add_space(12.0);
    ui.separator();
    ui.weak("Created with eframe • Simple CSV Dashboard");
}

// ---------------------------------------------------------------------------
// File dialog / drag and drop
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Choose a CSV file")
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Opening {}", path.display());
        state.load_path(&path);
    }
}

/// Load the first file dropped onto the window this frame.
pub fn handle_dropped_files(ctx: &egui::Context, state: &mut AppState) {
    let dropped = ctx.input(|i| i.raw.dropped_files.clone());
    let Some(file) = dropped.into_iter().next() else {
        return;
    };

    if let Some(path) = &file.path {
        log::info!("Dropped {}", path.display());
        state.load_path(path);
    } else if let Some(bytes) = &file.bytes {
        log::info!("Dropped {} ({} bytes)", file.name, bytes.len());
        state.load_bytes(&file.name, bytes);
    }
}
