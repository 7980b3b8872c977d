use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use laptop_lens::FilterColumn;

use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – main menu and filter widgets
// ---------------------------------------------------------------------------

/// Render the left panel: page menu, then one multiselect per filter column.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Main Menu");
    for (page, label) in [
        (Page::Home, "🏠 Home"),
        (Page::Charts, "📊 Charts"),
        (Page::Data, "📋 Data"),
    ] {
        if ui.selectable_label(state.page == page, label).clicked() {
            state.page = page;
        }
    }
    ui.separator();

    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = &state.dataset else {
        ui.label("No dataset loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the loop.
    let unique = dataset.unique_values.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for column in FilterColumn::ALL {
                let Some(all_values) = unique.get(&column) else {
                    continue;
                };

                let n_selected = all_values
                    .iter()
                    .filter(|v| state.selection.is_selected(column, v))
                    .count();
                let n_total = all_values.len();
                let header_text = format!("Filter {}  ({n_selected}/{n_total})", column.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(column.label())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(column);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(column);
                            }
                        });

                        for val in all_values {
                            let mut checked = state.selection.is_selected(column, val);
                            if ui.checkbox(&mut checked, val.to_string()).changed() {
                                state.toggle_filter_value(column, val);
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
            let can_export = state.snapshot.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export snapshot…"))
                .clicked()
            {
                export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let (Some(ds), Some(snap)) = (&state.dataset, &state.snapshot) {
            ui.label(format!(
                "{} laptops loaded, {} visible",
                ds.len(),
                snap.record_count
            ));
        }
        if let Some(label) = &state.source_label {
            ui.separator();
            ui.weak(label);
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open laptop data")
        .add_filter("Supported files", &["duckdb", "db", "parquet", "pq", "json", "csv"])
        .add_filter("DuckDB", &["duckdb", "db"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .pick_file();

    if let Some(path) = file {
        state.load_path(&path);
    }
}

fn export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export dashboard snapshot")
        .set_file_name("snapshot.json")
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_snapshot(&path) {
            log::error!("Export failed: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
