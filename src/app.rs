use eframe::egui;

use crate::config::DashboardConfig;
use crate::state::AppState;
use crate::ui::{charts, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

/// The whole page is rebuilt top to bottom on every frame; only the parsed
/// dataset, the selections and their figures persist between frames.
pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        panels::handle_dropped_files(ctx, &mut self.state);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: the dashboard page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    panels::header(ui);
                    panels::upload_control(ui, &mut self.state);
                    ui.separator();

                    if let Some(ds) = &self.state.dataset {
                        panels::overview(ui, ds);
                        panels::data_sample(ui, ds, self.state.config.preview_rows);
                        charts::visualizations(ui, &mut self.state);
                    } else {
                        panels::empty_state(ui, &self.state);
                    }

                    panels::footer(ui);
                });
        });
    }
}
