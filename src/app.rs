use eframe::egui;

use crate::state::{AppState, View};
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RustyScrubApp {
    pub state: AppState,
}

impl eframe::App for RustyScrubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: actions + output ----
        egui::SidePanel::left("action_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: table or plots ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.view {
            View::Table => table::data_table(ui, &self.state),
            View::Distribution => plot::distribution_grid(ui, &self.state),
            View::Boxplot => plot::boxplot(ui, &self.state),
        });
    }
}
