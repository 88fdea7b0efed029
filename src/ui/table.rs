use eframe::egui::{ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{CellValue, Column, DataFrame};

const ROW_HEIGHT: f32 = 18.0;

/// Missing numbers read as `NaN`, other missing cells as `None`.
fn cell_text(col: &Column, row: usize) -> String {
    match col.get(row) {
        CellValue::Null if col.dtype.is_numeric() => "NaN".to_string(),
        value => value.to_string(),
    }
}

/// Render every row of `df` with a leading row-index column.
pub fn data_table(ui: &mut Ui, id: &str, df: &DataFrame) {
    let n_rows = df.height();
    let columns = df.columns();

    ui.push_id(id, |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .vscroll(false)
                .column(TableColumn::auto())
                .columns(TableColumn::auto().at_least(60.0), columns.len())
                .header(ROW_HEIGHT + 2.0, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.label("");
                    });
                    for col in columns {
                        header.col(|ui: &mut Ui| {
                            ui.strong(col.name.as_str());
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, n_rows, |mut row| {
                        let i = row.index();
                        row.col(|ui: &mut Ui| {
                            ui.weak(i.to_string());
                        });
                        for col in columns {
                            row.col(|ui: &mut Ui| {
                                ui.label(cell_text(col, i));
                            });
                        }
                    });
                });
        });
    });
}
