use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::Value;
use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;

// ---------------------------------------------------------------------------
// Data table (central panel)
// ---------------------------------------------------------------------------

/// Render the current dataset. Rows are virtualised, so large tables only
/// lay out what is on screen.
pub fn data_table(ui: &mut Ui, state: &AppState) {
    let ds = state.store.get();
    if ds.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Load a dataset to begin  (File → Open…)");
        });
        return;
    }

    egui::ScrollArea::horizontal()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .resizable(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .columns(Column::initial(100.0).at_least(40.0).clip(true), ds.n_cols())
                .min_scrolled_height(0.0)
                .header(36.0, |mut header| {
                    for (col, kind) in ds.columns().iter().zip(ds.kinds()) {
                        header.col(|ui: &mut Ui| {
                            ui.vertical(|ui: &mut Ui| {
                                ui.strong(&col.name);
                                ui.small(kind.to_string());
                            });
                        });
                    }
                })
                .body(|body| {
                    body.rows(ROW_HEIGHT, ds.n_rows(), |mut row| {
                        let r = row.index();
                        for c in 0..ds.n_cols() {
                            row.col(|ui: &mut Ui| {
                                let value = ds.value(r, c);
                                if value.is_null() {
                                    ui.label(RichText::new("NaN").color(Color32::GRAY));
                                } else {
                                    ui.label(cell_text(value));
                                }
                            });
                        }
                    });
                });
        });
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}
