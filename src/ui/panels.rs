use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::state::AppState;
use crate::theme::Theme;

// ---------------------------------------------------------------------------
// Left side panel – filter controls
// ---------------------------------------------------------------------------

/// Render the control panel. Any widget change triggers exactly one
/// synchronous recompute of all three views.
pub fn control_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Controls");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Clone what we need so we can mutate the selection inside the loop.
    let countries = dataset.countries.clone();
    let indicator_columns = dataset.indicator_columns.clone();
    let (year_min, year_max) = (dataset.year_min, dataset.year_max);

    let mut changed = false;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Welfare type ----
            ui.strong("Welfare type");
            egui::ComboBox::from_id_salt("welfare_type")
                .selected_text(state.selection.welfare_type.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for wt in crate::data::model::WelfareType::ALL {
                        if ui
                            .selectable_label(state.selection.welfare_type == wt, wt.as_str())
                            .clicked()
                        {
                            state.selection.welfare_type = wt;
                            changed = true;
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- Reporting level ----
            ui.strong("Reporting level");
            egui::ComboBox::from_id_salt("reporting_level")
                .selected_text(state.selection.reporting_level.as_str())
                .show_ui(ui, |ui: &mut Ui| {
                    for rl in crate::data::model::ReportingLevel::ALL {
                        if ui
                            .selectable_label(state.selection.reporting_level == rl, rl.as_str())
                            .clicked()
                        {
                            state.selection.reporting_level = rl;
                            changed = true;
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- PPP version ----
            ui.strong("PPP version");
            egui::ComboBox::from_id_salt("ppp_version")
                .selected_text(state.selection.ppp_version.to_string())
                .show_ui(ui, |ui: &mut Ui| {
                    for ppp in crate::data::model::PppVersion::ALL {
                        if ui
                            .selectable_label(
                                state.selection.ppp_version == ppp,
                                ppp.to_string(),
                            )
                            .clicked()
                        {
                            state.selection.ppp_version = ppp;
                            changed = true;
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- Indicator (y-axis) ----
            ui.strong("Indicator (y-axis)");
            let current = state.selection.indicator.clone().unwrap_or_default();
            egui::ComboBox::from_id_salt("indicator")
                .selected_text(&current)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for col in &indicator_columns {
                        if ui.selectable_label(current == *col, col).clicked() {
                            state.selection.indicator = Some(col.clone());
                            changed = true;
                        }
                    }
                });
            ui.add_space(8.0);

            // ---- Year range ----
            ui.strong("Years");
            let (mut lo, mut hi) = state.selection.year_range;
            if ui
                .add(Slider::new(&mut lo, year_min..=year_max).text("from"))
                .changed()
            {
                changed = true;
            }
            if ui
                .add(Slider::new(&mut hi, year_min..=year_max).text("to"))
                .changed()
            {
                changed = true;
            }
            // min ≤ max is restored by normalize_years inside recompute
            state.selection.year_range = (lo, hi);
            ui.add_space(8.0);

            // ---- Country checklist ----
            let n_selected = state.selection.countries.len();
            ui.strong(format!("Countries  ({n_selected}/{})", countries.len()));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_countries();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_countries();
                }
            });
            for country in &countries {
                let mut ticked = state.selection.countries.contains(country);
                let mut text = RichText::new(country);
                if ticked {
                    text = text.color(state.country_colors.get(country));
                }
                if ui.checkbox(&mut ticked, text).changed() {
                    state.toggle_country(country);
                }
            }
        });

    if changed {
        state.recompute();
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
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} matching",
                ds.len(),
                state.views.rows.len()
            ));
        }

        ui.separator();

        ui.label("Theme:");
        egui::ComboBox::from_id_salt("theme")
            .selected_text(state.theme.label())
            .show_ui(ui, |ui: &mut Ui| {
                for theme in Theme::ALL {
                    if ui
                        .selectable_label(state.theme == theme, theme.label())
                        .clicked()
                    {
                        state.theme = theme;
                        theme.apply(ui.ctx());
                    }
                }
            });

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open poverty dataset")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load_from_path(&path);
    }
}
