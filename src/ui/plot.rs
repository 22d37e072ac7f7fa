use eframe::egui::{self, Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Density grid (distribution view)
// ---------------------------------------------------------------------------

/// One small KDE plot per numeric column, `grid_columns` plots per row.
pub fn distribution_grid(ui: &mut Ui, state: &AppState) {
    let dist = &state.distribution;
    if dist.series.is_empty() {
        empty_hint(ui, "No numeric columns with spread to plot.");
        return;
    }

    let per_row = state.config.grid_columns.max(1);
    let spacing = ui.spacing().item_spacing.x;
    let width = (ui.available_width() - spacing * per_row as f32) / per_row as f32;
    let height = (width * 0.66).clamp(120.0, 260.0);

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("density_grid")
                .num_columns(per_row)
                .show(ui, |ui: &mut Ui| {
                    for (i, series) in dist.series.iter().enumerate() {
                        let color = state.palette.color_for(&series.column);
                        ui.vertical(|ui: &mut Ui| {
                            ui.strong(&series.column);
                            Plot::new(format!("kde_{}", series.column))
                                .width(width)
                                .height(height)
                                .allow_drag(false)
                                .allow_scroll(false)
                                .allow_zoom(false)
                                .y_axis_label("Density")
                                .show(ui, |plot_ui| {
                                    let points: PlotPoints =
                                        series.points.iter().copied().collect();
                                    plot_ui.line(
                                        Line::new(points)
                                            .name(&series.column)
                                            .color(color)
                                            .width(1.5),
                                    );
                                });
                        });
                        if (i + 1) % per_row == 0 {
                            ui.end_row();
                        }
                    }
                });

            if !dist.skipped.is_empty() {
                ui.separator();
                ui.label(format!("No spread to estimate: {}", dist.skipped.join(", ")));
            }
        });
}

// ---------------------------------------------------------------------------
// Boxplot view
// ---------------------------------------------------------------------------

/// One box per numeric column, fliers drawn as points.
pub fn boxplot(ui: &mut Ui, state: &AppState) {
    if state.boxes.is_empty() {
        empty_hint(ui, "No numeric columns to plot.");
        return;
    }

    Plot::new("boxplot")
        .legend(Legend::default())
        .x_axis_label("Column")
        .y_axis_label("Value")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, b) in state.boxes.iter().enumerate() {
                let x = i as f64;
                let color = state.palette.color_for(&b.column);
                let spread = BoxSpread::new(
                    b.lower_whisker,
                    b.q1,
                    b.median,
                    b.q3,
                    b.upper_whisker,
                );
                let elem = BoxElem::new(x, spread)
                    .name(&b.column)
                    .box_width(0.5)
                    .whisker_width(0.25)
                    .fill(color.linear_multiply(0.3))
                    .stroke(Stroke::new(1.5, color));
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&b.column).color(color));

                if !b.fliers.is_empty() {
                    let fliers: PlotPoints = b.fliers.iter().map(|&y| [x, y]).collect();
                    plot_ui.points(
                        Points::new(fliers)
                            .name(&b.column)
                            .shape(MarkerShape::Circle)
                            .radius(2.5)
                            .color(color),
                    );
                }
            }
        });
}

fn empty_hint(ui: &mut Ui, text: &str) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(text);
    });
}
