use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data table – the row projection as an editable grid
// ---------------------------------------------------------------------------

/// Render the filtered rows. Cells are editable in place; edits live only in
/// the cached projection and are discarded on the next selection change. The
/// loaded dataset itself is never mutated.
pub fn data_table(ui: &mut Ui, state: &mut AppState) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a dataset to view rows  (File → Open…)");
        });
        return;
    }
    if state.views.rows.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No rows match the current selection.");
        });
        return;
    }

    let columns = state.views.columns.clone();
    let rows = &mut state.views.rows;

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(Column::auto().at_least(60.0), columns.len())
        .header(22.0, |mut header| {
            for col in &columns {
                header.col(|ui: &mut Ui| {
                    ui.strong(col);
                });
            }
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let row_idx = row.index();
                for cell in rows[row_idx].iter_mut() {
                    row.col(|ui: &mut Ui| {
                        ui.add(
                            egui::TextEdit::singleline(cell)
                                .frame(false)
                                .desired_width(f32::INFINITY),
                        );
                    });
                }
            });
        });
}
