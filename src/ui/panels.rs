use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::transform::Step;
use crate::state::{AppState, View};

const BUTTON_SIZE: [f32; 2] = [220.0, 32.0];

// ---------------------------------------------------------------------------
// Left side panel – actions and output
// ---------------------------------------------------------------------------

/// Render the action buttons and the output log.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Preprocessing");
    ui.separator();

    if action_button(ui, "Load Dataset", Color32::from_rgb(0x00, 0x33, 0x66)).clicked() {
        if let Some(path) = pick_file("Open dataset") {
            state.open(&path);
        }
    }

    for step in Step::PIPELINE {
        if action_button(ui, step.label(), step_color(step)).clicked() {
            state.apply(step);
        }
    }

    ui.add_space(6.0);
    if action_button(
        ui,
        "Data Distribution After Scaling",
        Color32::from_rgb(0x99, 0x00, 0x33),
    )
    .clicked()
    {
        state.show_distribution();
    }
    if action_button(
        ui,
        "Boxplot After Removing Outliers",
        Color32::from_rgb(0x66, 0x00, 0x00),
    )
    .clicked()
    {
        state.show_boxplot();
    }

    ui.add_space(6.0);
    if action_button(ui, "Preprocess All", Color32::from_rgb(0x00, 0x66, 0x00)).clicked() {
        run_preprocess_all(state);
    }

    ui.separator();
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Output");
        if !state.history.is_empty() && ui.small_button("Copy step log").clicked() {
            match state.history_json() {
                Ok(json) => ui.ctx().copy_text(json),
                Err(e) => log::warn!("Could not serialise step log: {e}"),
            }
        }
    });

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui: &mut Ui| {
            for line in &state.output {
                ui.label(line);
            }
            if let Some(msg) = &state.status_message {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
        });
}

fn action_button(ui: &mut Ui, text: &str, fill: Color32) -> egui::Response {
    ui.add_sized(
        BUTTON_SIZE,
        egui::Button::new(RichText::new(text).strong().color(Color32::WHITE)).fill(fill),
    )
}

fn step_color(step: Step) -> Color32 {
    match step {
        Step::DropMissing => Color32::from_rgb(0x33, 0x66, 0x00),
        Step::RemoveOutliers => Color32::from_rgb(0xFF, 0x66, 0x00),
        Step::Normalize => Color32::from_rgb(0x66, 0x00, 0x66),
        Step::EncodeCategorical => Color32::from_rgb(0x00, 0x66, 0x66),
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = pick_file("Open dataset") {
                    state.open(&path);
                }
                ui.close_menu();
            }
            if ui.button("Preprocess All…").clicked() {
                run_preprocess_all(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.selectable_value(&mut state.view, View::Table, "Table");
        ui.selectable_value(&mut state.view, View::Distribution, "Distribution");
        ui.selectable_value(&mut state.view, View::Boxplot, "Boxplot");
        ui.separator();

        let ds = state.store.get();
        if state.store.source().is_some() {
            let source = state
                .store
                .source()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            ui.label(format!(
                "{source}: {} rows × {} columns, {} missing cells",
                ds.n_rows(),
                ds.n_cols(),
                state.missing_cells
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

fn pick_file(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "tsv", "tab", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("TSV", &["tsv", "tab"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

fn run_preprocess_all(state: &mut AppState) {
    if let Some(path) = pick_file("Select Cleaned Dataset for Preprocessing") {
        state.preprocess_all(&path);
    }
}
