use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use tuning_panda::analysis::{pearson, GroupBy, GroupValues, Label, SummaryStat};
use tuning_panda::data::filter::FilterCriteria;
use tuning_panda::data::model::FieldValue;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let (layers, groups) = match &state.dataset {
        Some(ds) => (ds.layers.clone(), ds.groups.clone()),
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };
    // Only the recognized labels filter; other values would be ignored.
    let group_options: Vec<String> = groups
        .iter()
        .filter_map(|g| match g {
            FieldValue::String(s) if s.parse::<Label>().is_ok() => Some(s.clone()),
            _ => None,
        })
        .collect();
    let columns = state.columns();
    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Colour-by selector ----
            ui.strong("Color by");
            let current_color_col = state.color_column.clone();
            egui::ComboBox::from_id_salt("color_by")
                .selected_text(&current_color_col)
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &columns {
                        if ui
                            .selectable_label(current_color_col == *col, col)
                            .clicked()
                        {
                            state.set_color_column(col.clone());
                        }
                    }
                });
            if let Some(cm) = &state.color_map {
                for (label, color) in cm.legend_entries() {
                    ui.label(RichText::new(format!("■ {label}")).color(color));
                }
            }
            ui.separator();

            // ---- Layer membership ----
            let header_text = format!("layer  ({}/{})", state.selected_layers.len(), layers.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("layer_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_layers();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_layers();
                        }
                    });

                    for layer in &layers {
                        let mut text = RichText::new(layer);
                        if state.color_column == "layer" {
                            if let Some(cm) = &state.color_map {
                                text = text.color(cm.color_for(&FieldValue::String(layer.clone())));
                            }
                        }

                        let mut checked = state.selected_layers.contains(layer);
                        if ui.checkbox(&mut checked, text).changed() {
                            state.toggle_layer(layer);
                        }
                    }
                });
            ui.separator();

            // ---- Group ----
            ui.strong("Group");
            let current_group = state.criteria.group.clone().unwrap_or_else(|| "Any".into());
            egui::ComboBox::from_id_salt("group_filter")
                .selected_text(&current_group)
                .show_ui(ui, |ui: &mut Ui| {
                    let options = std::iter::once(None).chain(group_options.iter().map(Some));
                    for option in options {
                        let value = option.cloned();
                        let text = option.map_or("Any", String::as_str);
                        if ui
                            .selectable_label(state.criteria.group == value, text)
                            .clicked()
                        {
                            state.criteria.group = value;
                            changed = true;
                        }
                    }
                });
            ui.separator();

            // ---- Numeric ranges ----
            changed |= range_editor(ui, "OSI range", &mut state.criteria.osi, (0.0, 1.0), 1.0, 0.01);
            changed |= range_editor(
                ui,
                "Half-bandwidth range",
                &mut state.criteria.hbw,
                (0.0, 180.0),
                180.0,
                1.0,
            );

            if ui.button("Default ranges").clicked() {
                let defaults = FilterCriteria::with_default_ranges();
                state.criteria.osi = defaults.osi;
                state.criteria.hbw = defaults.hbw;
                changed = true;
            }
        });

    if changed {
        state.refilter();
    }
}

/// Checkbox enabling an inclusive `(lo, hi)` range plus two drag values.
fn range_editor(
    ui: &mut Ui,
    label: &str,
    range: &mut Option<(f64, f64)>,
    default: (f64, f64),
    max: f64,
    speed: f64,
) -> bool {
    let mut changed = false;
    let mut enabled = range.is_some();
    if ui.checkbox(&mut enabled, label).changed() {
        *range = enabled.then_some(default);
        changed = true;
    }
    if let Some((lo, hi)) = range.as_mut() {
        ui.horizontal(|ui: &mut Ui| {
            changed |= ui
                .add(egui::DragValue::new(&mut *lo).speed(speed).range(0.0..=max).prefix("min "))
                .changed();
            changed |= ui
                .add(egui::DragValue::new(&mut *hi).speed(speed).range(0.0..=max).prefix("max "))
                .changed();
        });
    }
    changed
}

// ---------------------------------------------------------------------------
// Right side panel – unit list
// ---------------------------------------------------------------------------

/// Render the list of visible units with their labels.
pub fn unit_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Units");
    ui.separator();

    let Some(ds) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    let mut clicked = None;
    ScrollArea::vertical()
        .id_salt("unit_list")
        .max_height(ui.available_height() * 0.7)
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for &idx in &state.visible_indices {
                let unit = &ds.units[idx];
                let label = state.labels.get(&unit.id).map_or("?", |l| l.as_str());
                let text = format!(
                    "#{}  {}  {}  osi {:.2}",
                    unit.id, unit.layer, label, unit.osi_control
                );
                if ui
                    .selectable_label(state.selected_unit == Some(unit.id), text)
                    .clicked()
                {
                    clicked = Some(unit.id);
                }
            }
        });

    ui.separator();
    if let Some(unit) = state.selected_unit.and_then(|id| ds.unit(id)) {
        ui.strong(format!("Unit {}", unit.id));
        ui.label(format!("layer {}", unit.layer));
        ui.label(format!("group {}", unit.group.as_deref().unwrap_or("<null>")));
        ui.label(format!("OSI {:.3}", unit.osi_control));
        match unit.hbw_control {
            Some(hbw) => ui.label(format!("HBW {hbw:.1}°")),
            None => ui.label("HBW <null>"),
        };
        if let Ok(r) = pearson(&unit.control, &unit.laser) {
            ui.label(format!("control/laser r = {r:.3}"));
        }
        if let Some(label) = state.labels.get(&unit.id) {
            ui.label(RichText::new(format!("classified {label}")).strong());
        }
    }

    if let Some(id) = clicked {
        state.selected_unit = if state.selected_unit == Some(id) {
            None
        } else {
            Some(id)
        };
    }
}

// ---------------------------------------------------------------------------
// Bottom panel – group summary
// ---------------------------------------------------------------------------

/// Render the summary controls and table for the visible units.
pub fn summary_panel(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        return;
    }

    let mut changed = false;
    ui.horizontal(|ui: &mut Ui| {
        ui.strong("Summary by");
        let current = state.group_by.to_string();
        egui::ComboBox::from_id_salt("group_by")
            .selected_text(&current)
            .show_ui(ui, |ui: &mut Ui| {
                for col in state.columns() {
                    if ui.selectable_label(current == col, &col).clicked() {
                        if let Ok(by) = col.parse::<GroupBy>() {
                            state.group_by = by;
                            changed = true;
                        }
                    }
                }
            });

        egui::ComboBox::from_id_salt("summary_stat")
            .selected_text(state.stat.as_str())
            .show_ui(ui, |ui: &mut Ui| {
                for stat in SummaryStat::ALL {
                    if ui
                        .selectable_label(state.stat == stat, stat.as_str())
                        .clicked()
                    {
                        state.stat = stat;
                        changed = true;
                    }
                }
            });
    });

    if changed {
        state.refilter();
    }

    let Some(summary) = &state.summary else {
        return;
    };

    let headers: &[&str] = match summary.stat {
        SummaryStat::Count => &["count"],
        SummaryStat::Mean | SummaryStat::Median => &["osi_control", "hbw_control", "mean_control"],
    };

    TableBuilder::new(ui)
        .striped(true)
        .column(Column::auto().at_least(100.0))
        .columns(Column::remainder(), headers.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong(summary.group_by.column());
            });
            for h in headers {
                header.col(|ui| {
                    ui.strong(*h);
                });
            }
        })
        .body(|mut body| {
            for row in &summary.rows {
                body.row(18.0, |mut cells| {
                    cells.col(|ui| {
                        ui.label(row.key.to_string());
                    });
                    match &row.values {
                        GroupValues::Count(n) => {
                            cells.col(|ui| {
                                ui.label(n.to_string());
                            });
                        }
                        GroupValues::Aggregates(agg) => {
                            for v in [agg.osi_control, agg.hbw_control, agg.mean_control] {
                                cells.col(|ui| {
                                    ui.label(v.map_or("<null>".to_string(), |v| format!("{v:.3}")));
                                });
                            }
                        }
                    }
                });
            }
        });
}

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
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} units loaded, {} visible, {} orientations",
                ds.len(),
                state.visible_indices.len(),
                state.orientations.len()
            ));
        }

        ui.separator();

        if ui
            .selectable_label(state.show_laser, "Laser curves")
            .clicked()
        {
            state.show_laser = !state.show_laser;
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open tuning data")
        .add_filter("Supported files", &["json", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.load_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
