use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use big4_dashboard::data::loader;
use big4_dashboard::data::model::{Dimension, FieldValue};

use crate::state::AppState;

const DATA_EXTENSIONS: [&str; 4] = ["csv", "json", "parquet", "pq"];

/// Sidebar with one multi-select block per filterable dimension.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter data");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("Load a dataset to enable filters.");
        return;
    };
    // Owned copy; the checkboxes below need `state` mutably.
    let blocks: Vec<(Dimension, Vec<FieldValue>)> = Dimension::ALL
        .into_iter()
        .map(|dim| (dim, dataset.options(dim).to_vec()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (dim, choices) in &blocks {
                dimension_filter(ui, state, *dim, choices);
            }
        });
}

fn dimension_filter(ui: &mut Ui, state: &mut AppState, dim: Dimension, choices: &[FieldValue]) {
    let title = format!(
        "{}  ({}/{})",
        dim.label(),
        state.selection.len(dim),
        choices.len()
    );

    egui::CollapsingHeader::new(RichText::new(title).strong())
        .id_salt(dim.label())
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dim);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dim);
                }
            });

            for choice in choices {
                let label = match dim {
                    Dimension::FirmName => {
                        RichText::new(choice.to_string()).color(state.firm_colors.color_for(choice))
                    }
                    _ => RichText::new(choice.to_string()),
                };
                let mut selected = state.selection.contains(dim, choice);
                if ui.checkbox(&mut selected, label).changed() {
                    state.toggle_filter_value(dim, choice);
                }
            }
        });
}

/// Menu bar: file menu, title, record counts and the Charts / Table switch.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                ui.close_menu();
                if let Some(path) = pick_dataset_file() {
                    open_dataset(state, path);
                }
            }
        });

        ui.separator();
        ui.strong("Big 4 Financial Risk & Compliance Dashboard");

        if let Some(dataset) = &state.dataset {
            ui.separator();
            ui.label(format!(
                "{} of {} records match",
                state.visible_indices.len(),
                dataset.len()
            ));
        }

        ui.separator();
        ui.selectable_value(&mut state.show_table, false, "Charts");
        ui.selectable_value(&mut state.show_table, true, "Table");

        if let Some(status) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(status).color(Color32::RED));
        }
    });
}

fn pick_dataset_file() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open audit data")
        .add_filter("Audit data", &DATA_EXTENSIONS)
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

/// Load `path` into the dashboard. On failure the current dataset stays.
pub fn open_dataset(state: &mut AppState, path: PathBuf) {
    match loader::load_file(&path) {
        Ok(dataset) => state.set_dataset(dataset, path),
        Err(err) => {
            log::error!("Could not open {}: {err}", path.display());
            state.status_message = Some(format!("Could not open {}: {err}", path.display()));
        }
    }
}
