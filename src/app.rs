use eframe::egui;

use crate::state::AppState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct TuningPandaApp {
    pub state: AppState,
}

impl TuningPandaApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for TuningPandaApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Right side panel: units ----
        egui::SidePanel::right("unit_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::unit_panel(ui, &mut self.state);
            });

        // ---- Bottom panel: group summary ----
        egui::TopBottomPanel::bottom("summary_panel")
            .default_height(180.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::summary_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::tuning_plot(ui, &self.state);
        });
    }
}
