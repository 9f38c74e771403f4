use eframe::egui::{Color32, Ui};
use egui_plot::{Line, LineStyle, Plot, PlotPoints};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Tuning-curve plot (central panel)
// ---------------------------------------------------------------------------

fn curve_points(orientations: &[f64], values: &[f64]) -> PlotPoints<'static> {
    orientations
        .iter()
        .zip(values.iter())
        .map(|(&x, &y)| [x, y])
        .collect()
}

/// Render control (solid) and laser (dashed) curves of the visible units.
pub fn tuning_plot(ui: &mut Ui, state: &AppState) {
    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Open a file to view tuning curves  (File → Open…)");
            });
            return;
        }
    };

    let color_map = &state.color_map;
    let color_col = state.color_column.as_str();

    Plot::new("tuning_plot")
        .legend(egui_plot::Legend::default())
        .x_axis_label("Orientation (deg)")
        .y_axis_label("Response")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for &idx in &state.visible_indices {
                let unit = &dataset.units[idx];
                let value = unit.field(color_col);

                let color = color_map
                    .as_ref()
                    .map(|cm| cm.color_for(&value))
                    .unwrap_or(Color32::LIGHT_BLUE);
                let width = if state.selected_unit == Some(unit.id) {
                    3.0
                } else {
                    1.2
                };
                let name = value.to_string();

                plot_ui.line(
                    Line::new(curve_points(&state.orientations, &unit.control))
                        .name(&name)
                        .color(color)
                        .width(width),
                );

                if state.show_laser {
                    plot_ui.line(
                        Line::new(curve_points(&state.orientations, &unit.laser))
                            .name(format!("{name} (laser)"))
                            .color(color.gamma_multiply(0.7))
                            .style(LineStyle::dashed_dense())
                            .width(width),
                    );
                }
            }

            if !state.population_curve.is_empty() {
                plot_ui.line(
                    Line::new(curve_points(&state.orientations, &state.population_curve))
                        .name("population mean (control)")
                        .color(Color32::WHITE)
                        .width(2.5),
                );
            }
        });
}
