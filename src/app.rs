use eframe::egui;

use crate::state::AppState;
use crate::ui::{charts, panels, table};

const SIDEBAR_WIDTH: f32 = 240.0;

/// Window shell: menu bar on top, filters on the left, dashboard or table in the middle.
pub struct DashboardApp {
    state: AppState,
}

impl DashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let state = &mut self.state;

        egui::TopBottomPanel::top("menu").show(ctx, |ui| panels::top_bar(ui, state));

        egui::SidePanel::left("filters")
            .default_width(SIDEBAR_WIDTH)
            .resizable(true)
            .show(ctx, |ui| panels::side_panel(ui, state));

        egui::CentralPanel::default().show(ctx, |ui| {
            if state.show_table {
                table::records_table(ui, state);
            } else {
                charts::dashboard(ui, state);
            }
        });
    }
}
